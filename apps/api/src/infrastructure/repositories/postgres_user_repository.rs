use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::db_error::{database_error, is_unique_violation};
use super::rows::UserRow;
use crate::domain::errors::{RepositoryError, RepositoryResult};
use crate::domain::repositories::UserRepository;
use crate::domain::user::{Email, User};

/// PostgreSQL implementation of UserRepository
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Creates a new PostgresUserRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: &User) -> RepositoryResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, email, name, avatar, password_hash, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(user.id)
        .bind(user.email.as_str())
        .bind(&user.name)
        .bind(user.avatar.as_deref())
        .bind(&user.password_hash)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                RepositoryError::Conflict("Email already registered".to_string())
            } else {
                database_error("Failed to create user", e)
            }
        })?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<User> {
        sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, name, avatar, password_hash, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| database_error("Failed to find user by id", e))?
        .ok_or_else(|| RepositoryError::not_found("User", id))?
        .try_into()
    }

    async fn find_by_email(&self, email: &Email) -> RepositoryResult<Option<User>> {
        sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, name, avatar, password_hash, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| database_error("Failed to find user by email", e))?
        .map(User::try_from)
        .transpose()
    }
}
