//! Behavioural checks shared by every [`UserStore`] backend
//!
//! Each check expects an empty store. [`run_all`] builds a fresh one per
//! check through the supplied factory.

use roster_core::{NewUser, RosterError, UserStore};
use std::collections::HashSet;
use std::future::Future;

pub fn new_user(first_name: &str, email: &str) -> NewUser {
    NewUser {
        first_name: first_name.to_string(),
        last_name: "Lovelace".to_string(),
        email: email.to_string(),
        password: "x".to_string(),
    }
}

pub async fn run_all<F, Fut, S>(make_store: F)
where
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
    S: UserStore,
{
    create_assigns_unique_ids(&make_store().await).await;
    get_after_create_round_trips(&make_store().await).await;
    duplicate_email_conflicts(&make_store().await).await;
    get_missing_is_not_found(&make_store().await).await;
    email_lookup_is_exact(&make_store().await).await;
    list_newest_first_with_paging(&make_store().await).await;
    update_replaces_mutable_fields(&make_store().await).await;
    update_missing_is_not_found(&make_store().await).await;
    update_to_taken_email_conflicts(&make_store().await).await;
    delete_then_get_is_not_found(&make_store().await).await;
    delete_missing_is_not_found(&make_store().await).await;
}

async fn create_assigns_unique_ids(store: &dyn UserStore) {
    let mut ids = HashSet::new();
    for i in 0..10 {
        let id = store
            .create(new_user("Ada", &format!("ada{}@example.com", i)))
            .await
            .unwrap();
        assert!(!id.is_empty());
        assert!(ids.insert(id), "identifier handed out twice");
    }
}

async fn get_after_create_round_trips(store: &dyn UserStore) {
    let input = new_user("Ada", "ada@example.com");
    let id = store.create(input.clone()).await.unwrap();

    let user = store.get_by_id(&id).await.unwrap();
    assert_eq!(user.id, id);
    assert_eq!(user.first_name, input.first_name);
    assert_eq!(user.last_name, input.last_name);
    assert_eq!(user.email, input.email);
    assert_eq!(user.password, input.password);
}

async fn duplicate_email_conflicts(store: &dyn UserStore) {
    store
        .create(new_user("Ada", "ada@example.com"))
        .await
        .unwrap();

    let err = store
        .create(new_user("Augusta", "ada@example.com"))
        .await
        .unwrap_err();
    assert!(err.is_conflict(), "expected conflict, got {:?}", err);

    let all = store.list(0, 0).await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].first_name, "Ada");
}

async fn get_missing_is_not_found(store: &dyn UserStore) {
    let err = store.get_by_id("no-such-id").await.unwrap_err();
    assert!(err.is_not_found());

    let err = store.get_by_email("nobody@example.com").await.unwrap_err();
    assert!(err.is_not_found());
}

async fn email_lookup_is_exact(store: &dyn UserStore) {
    let id = store
        .create(new_user("Ada", "ada@example.com"))
        .await
        .unwrap();

    assert_eq!(store.get_by_email("ada@example.com").await.unwrap().id, id);
    assert!(store
        .get_by_email("ADA@example.com")
        .await
        .unwrap_err()
        .is_not_found());
}

async fn list_newest_first_with_paging(store: &dyn UserStore) {
    let mut ids = Vec::new();
    for name in ["first", "second", "third"] {
        ids.push(
            store
                .create(new_user(name, &format!("{}@example.com", name)))
                .await
                .unwrap(),
        );
    }

    let all: Vec<String> = store
        .list(0, 0)
        .await
        .unwrap()
        .into_iter()
        .map(|u| u.id)
        .collect();
    assert_eq!(all, vec![ids[2].clone(), ids[1].clone(), ids[0].clone()]);

    let newest = store.list(1, 0).await.unwrap();
    assert_eq!(newest.len(), 1);
    assert_eq!(newest[0].id, ids[2]);

    let page = store.list(1, 1).await.unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].id, ids[1]);

    let tail = store.list(-1, 2).await.unwrap();
    assert_eq!(tail.len(), 1);
    assert_eq!(tail[0].id, ids[0]);

    assert!(store.list(10, 5).await.unwrap().is_empty());
    assert_eq!(store.list(0, -3).await.unwrap().len(), 3);
}

async fn update_replaces_mutable_fields(store: &dyn UserStore) {
    let id = store
        .create(new_user("Ada", "ada@example.com"))
        .await
        .unwrap();
    let before = store.get_by_id(&id).await.unwrap();

    let mut changed = before.clone();
    changed.id = "client-supplied".to_string();
    changed.first_name = "Augusta".to_string();
    changed.email = "augusta@example.com".to_string();
    changed.password = "y".to_string();
    store.update(&id, changed).await.unwrap();

    let after = store.get_by_id(&id).await.unwrap();
    assert_eq!(after.id, id);
    assert_eq!(after.created_at, before.created_at);
    assert_eq!(after.first_name, "Augusta");
    assert_eq!(after.email, "augusta@example.com");
    assert_eq!(after.password, "y");
    assert!(store
        .get_by_id("client-supplied")
        .await
        .unwrap_err()
        .is_not_found());

    // Keeping its own email is not a conflict.
    store.update(&id, after.clone()).await.unwrap();
}

async fn update_missing_is_not_found(store: &dyn UserStore) {
    let id = store
        .create(new_user("Ada", "ada@example.com"))
        .await
        .unwrap();
    let mut user = store.get_by_id(&id).await.unwrap();
    user.first_name = "Ghost".to_string();

    let err = store.update("no-such-id", user).await.unwrap_err();
    assert_eq!(err, RosterError::NotFound("no-such-id".to_string()));

    let all = store.list(0, 0).await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].first_name, "Ada");
}

async fn update_to_taken_email_conflicts(store: &dyn UserStore) {
    store
        .create(new_user("Ada", "ada@example.com"))
        .await
        .unwrap();
    let id = store
        .create(new_user("Charles", "charles@example.com"))
        .await
        .unwrap();

    let mut user = store.get_by_id(&id).await.unwrap();
    user.email = "ada@example.com".to_string();
    assert!(store.update(&id, user).await.unwrap_err().is_conflict());

    assert_eq!(
        store.get_by_id(&id).await.unwrap().email,
        "charles@example.com"
    );
}

async fn delete_then_get_is_not_found(store: &dyn UserStore) {
    let id = store
        .create(new_user("Ada", "ada@example.com"))
        .await
        .unwrap();

    store.delete(&id).await.unwrap();
    assert!(store.get_by_id(&id).await.unwrap_err().is_not_found());

    // The email is free again.
    store
        .create(new_user("Ada", "ada@example.com"))
        .await
        .unwrap();
}

async fn delete_missing_is_not_found(store: &dyn UserStore) {
    assert!(store
        .delete("no-such-id")
        .await
        .unwrap_err()
        .is_not_found());
}
