//! User handlers

use crate::error::ApiError;
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use roster_core::{validate_for_create, validate_for_update, NewUser, RosterError, User, UserPatch};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    limit: i64,
    #[serde(default)]
    offset: i64,
}

#[derive(Debug, Serialize)]
pub struct UserListResponse {
    users: Vec<User>,
}

pub(crate) fn invalid_json(rejection: JsonRejection) -> ApiError {
    RosterError::Validation(rejection.body_text()).into()
}

pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<NewUser>, JsonRejection>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let Json(new_user) = payload.map_err(invalid_json)?;
    validate_for_create(&new_user)?;

    let id = state.store.create(new_user).await?;
    let user = state.store.get_by_id(&id).await?;

    info!("Created user {}", id);
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<UserListResponse>, ApiError> {
    let Query(query) =
        query.map_err(|e| ApiError::from(RosterError::Validation(e.body_text())))?;

    let users = state.store.list(query.limit, query.offset).await?;
    Ok(Json(UserListResponse { users }))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<User>, ApiError> {
    let user = state.store.get_by_id(&id).await?;
    Ok(Json(user))
}

/// Full replace of the mutable fields
pub async fn replace(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<NewUser>, JsonRejection>,
) -> Result<Json<User>, ApiError> {
    let Json(new_user) = payload.map_err(invalid_json)?;

    let user = state.store.get_by_id(&id).await?.replace_with(new_user);
    validate_for_update(&user)?;
    state.store.update(&id, user.clone()).await?;

    info!("Replaced user {}", id);
    Ok(Json(user))
}

pub async fn patch(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UserPatch>, JsonRejection>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let Json(patch) = payload.map_err(invalid_json)?;

    let user = state.store.get_by_id(&id).await?.apply_patch(patch);
    validate_for_update(&user)?;
    state.store.update(&id, user.clone()).await?;

    info!("Updated user {}", id);
    Ok((StatusCode::ACCEPTED, Json(user)))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.store.delete(&id).await?;

    info!("Deleted user {}", id);
    Ok(StatusCode::NO_CONTENT)
}
