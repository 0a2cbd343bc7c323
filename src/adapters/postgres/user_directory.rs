//! PostgreSQL implementation of UserDirectory.
//!
//! Reads the `users` table maintained by the login service. The password
//! hash column is never selected.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::foundation::{ActorHandle, DomainError, ErrorCode};
use crate::domain::user::UserProfile;
use crate::ports::UserDirectory;

#[derive(Clone)]
pub struct PostgresUserDirectory {
    pool: PgPool,
}

impl PostgresUserDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    login: String,
    first_name: String,
    last_name: String,
    email: String,
}

#[async_trait]
impl UserDirectory for PostgresUserDirectory {
    async fn find_by_login(&self, login: &ActorHandle) -> Result<Option<UserProfile>, DomainError> {
        let row: Option<UserRow> = sqlx::query_as(
            "SELECT login, first_name, last_name, email FROM users WHERE login = $1",
        )
        .bind(login.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to fetch user: {}", e),
            )
        })?;

        row.map(|row| {
            let login = ActorHandle::new(row.login).map_err(|e| {
                DomainError::new(ErrorCode::DatabaseError, format!("Invalid login: {}", e))
            })?;
            Ok(UserProfile::new(login, row.first_name, row.last_name, row.email))
        })
        .transpose()
    }
}
