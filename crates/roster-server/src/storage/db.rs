//! SQLite user store (embedded, no external dependencies)

use anyhow::{Context, Result as AnyResult};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use roster_core::{NewUser, Result, RosterError, User, UserStore};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::future::Future;
use std::path::Path;
use std::time::Duration;

/// Persistent [`UserStore`] backed by a SQLite file
pub struct SqliteUserStore {
    pool: SqlitePool,
    op_timeout: Duration,
}

impl SqliteUserStore {
    /// Open (or create) the database at `database_path` and make sure the
    /// schema exists. Every later operation is bounded by `op_timeout`.
    pub async fn open(database_path: &Path, op_timeout: Duration) -> AnyResult<Self> {
        tracing::info!("Opening SQLite database at: {}", database_path.display());

        if let Some(parent) = database_path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.with_context(|| {
                    format!("Failed to create database directory: {}", parent.display())
                })?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(database_path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(op_timeout)
            .connect_with(options)
            .await
            .with_context(|| {
                format!(
                    "Failed to connect to SQLite database at: {}",
                    database_path.display()
                )
            })?;

        Self::run_migrations(&pool)
            .await
            .context("Failed to run database migrations")?;

        tracing::info!("Database initialization complete");

        Ok(Self { pool, op_timeout })
    }

    async fn run_migrations(pool: &SqlitePool) -> std::result::Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                first_name TEXT NOT NULL DEFAULT '',
                last_name TEXT NOT NULL DEFAULT '',
                email TEXT NOT NULL UNIQUE,
                password TEXT NOT NULL DEFAULT '',
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_users_created_at ON users (created_at)
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Run `fut` under the operation timeout and translate its error.
    async fn timed<T, F>(&self, fut: F) -> Result<T>
    where
        F: Future<Output = std::result::Result<T, sqlx::Error>>,
    {
        match tokio::time::timeout(self.op_timeout, fut).await {
            Ok(result) => result.map_err(map_sqlx_error),
            Err(_) => Err(RosterError::Storage(format!(
                "operation timed out after {:?}",
                self.op_timeout
            ))),
        }
    }
}

#[async_trait]
impl UserStore for SqliteUserStore {
    async fn create(&self, user: NewUser) -> Result<String> {
        let user = User::new(user);

        self.timed(
            sqlx::query(
                r#"
                INSERT INTO users (id, first_name, last_name, email, password, created_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
            )
            .bind(&user.id)
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(&user.email)
            .bind(&user.password)
            .bind(format_timestamp(&user.created_at))
            .execute(&self.pool),
        )
        .await?;

        Ok(user.id)
    }

    async fn get_by_id(&self, id: &str) -> Result<User> {
        let row: Option<UserRow> = self
            .timed(
                sqlx::query_as(
                    r#"
                    SELECT id, first_name, last_name, email, password, created_at
                    FROM users WHERE id = ?1
                    "#,
                )
                .bind(id)
                .fetch_optional(&self.pool),
            )
            .await?;

        row.map(Into::into)
            .ok_or_else(|| RosterError::NotFound(id.to_string()))
    }

    async fn get_by_email(&self, email: &str) -> Result<User> {
        let row: Option<UserRow> = self
            .timed(
                sqlx::query_as(
                    r#"
                    SELECT id, first_name, last_name, email, password, created_at
                    FROM users WHERE email = ?1
                    "#,
                )
                .bind(email)
                .fetch_optional(&self.pool),
            )
            .await?;

        row.map(Into::into)
            .ok_or_else(|| RosterError::NotFound(email.to_string()))
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<User>> {
        // SQLite reads a negative LIMIT as "no limit".
        let limit = if limit > 0 { limit } else { -1 };
        let offset = offset.max(0);

        let rows: Vec<UserRow> = self
            .timed(
                sqlx::query_as(
                    r#"
                    SELECT id, first_name, last_name, email, password, created_at
                    FROM users
                    ORDER BY created_at DESC, rowid DESC
                    LIMIT ?1 OFFSET ?2
                    "#,
                )
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool),
            )
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update(&self, id: &str, user: User) -> Result<()> {
        let result = self
            .timed(
                sqlx::query(
                    r#"
                    UPDATE users
                    SET first_name = ?1, last_name = ?2, email = ?3, password = ?4
                    WHERE id = ?5
                    "#,
                )
                .bind(&user.first_name)
                .bind(&user.last_name)
                .bind(&user.email)
                .bind(&user.password)
                .bind(id)
                .execute(&self.pool),
            )
            .await?;

        if result.rows_affected() == 0 {
            return Err(RosterError::NotFound(id.to_string()));
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let result = self
            .timed(
                sqlx::query(
                    r#"
                    DELETE FROM users WHERE id = ?1
                    "#,
                )
                .bind(id)
                .execute(&self.pool),
            )
            .await?;

        if result.rows_affected() == 0 {
            return Err(RosterError::NotFound(id.to_string()));
        }
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        self.pool.close().await;
        Ok(())
    }
}

fn map_sqlx_error(err: sqlx::Error) -> RosterError {
    match err {
        sqlx::Error::RowNotFound => RosterError::NotFound("no matching user".to_string()),
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            RosterError::Conflict(format!("email already exists: {}", db_err.message()))
        }
        other => RosterError::Storage(other.to_string()),
    }
}

/// Fixed-width RFC 3339 so that text ordering matches time ordering.
fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

// Helper struct for sqlx query_as
#[derive(sqlx::FromRow)]
struct UserRow {
    id: String,
    first_name: String,
    last_name: String,
    email: String,
    password: String,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(r: UserRow) -> Self {
        User {
            id: r.id,
            first_name: r.first_name,
            last_name: r.last_name,
            email: r.email,
            password: r.password,
            created_at: r.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::conformance;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const TIMEOUT: Duration = Duration::from_secs(5);

    #[tokio::test]
    async fn test_conformance() {
        let dir = tempfile::tempdir().unwrap();
        let counter = AtomicUsize::new(0);

        conformance::run_all(|| {
            let path = dir
                .path()
                .join(format!("conformance-{}.db", counter.fetch_add(1, Ordering::SeqCst)));
            async move { SqliteUserStore::open(&path, TIMEOUT).await.unwrap() }
        })
        .await;
    }

    #[tokio::test]
    async fn test_list_limit_one_returns_most_recent() {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteUserStore::open(&dir.path().join("users.db"), TIMEOUT)
            .await
            .unwrap();

        let mut last = String::new();
        for i in 0..3 {
            last = store
                .create(conformance::new_user("Ada", &format!("ada{}@example.com", i)))
                .await
                .unwrap();
        }

        let users = store.list(1, 0).await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].id, last);
    }

    #[tokio::test]
    async fn test_data_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("users.db");

        let store = SqliteUserStore::open(&path, TIMEOUT).await.unwrap();
        let id = store
            .create(conformance::new_user("Ada", "ada@example.com"))
            .await
            .unwrap();
        let created = store.get_by_id(&id).await.unwrap();
        store.close().await.unwrap();

        let reopened = SqliteUserStore::open(&path, TIMEOUT).await.unwrap();
        let user = reopened.get_by_email("ada@example.com").await.unwrap();
        assert_eq!(user, created);
    }

    #[tokio::test]
    async fn test_close_is_idempotent_and_stops_operations() {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteUserStore::open(&dir.path().join("users.db"), TIMEOUT)
            .await
            .unwrap();

        store.close().await.unwrap();
        store.close().await.unwrap();

        let err = store.get_by_id("anything").await.unwrap_err();
        assert!(matches!(err, RosterError::Storage(_)));
    }

    #[test]
    fn test_timestamp_format_is_fixed_width() {
        let a = DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let b = DateTime::parse_from_rfc3339("2024-01-01T00:00:00.5Z")
            .unwrap()
            .with_timezone(&Utc);

        assert_eq!(format_timestamp(&a), "2024-01-01T00:00:00.000000Z");
        assert!(format_timestamp(&a) < format_timestamp(&b));
    }
}
