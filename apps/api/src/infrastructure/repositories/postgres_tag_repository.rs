use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::db_error::{database_error, is_unique_violation};
use super::rows::TagRow;
use crate::domain::errors::{RepositoryError, RepositoryResult};
use crate::domain::repositories::TagRepository;
use crate::domain::Tag;

/// PostgreSQL implementation of TagRepository
pub struct PostgresTagRepository {
    pool: PgPool,
}

impl PostgresTagRepository {
    /// Creates a new PostgresTagRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TagRepository for PostgresTagRepository {
    async fn save(&self, tag: &Tag) -> RepositoryResult<()> {
        sqlx::query("INSERT INTO tags (id, title) VALUES ($1, $2)")
            .bind(tag.id())
            .bind(tag.title())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    RepositoryError::Conflict(format!("Tag '{}' already exists", tag.title()))
                } else {
                    database_error("Failed to save tag", e)
                }
            })?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Tag> {
        sqlx::query_as::<_, TagRow>("SELECT id, title FROM tags WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| database_error("Failed to find tag by id", e))?
            .map(Tag::from)
            .ok_or_else(|| RepositoryError::not_found("Tag", id))
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> RepositoryResult<Vec<Tag>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, TagRow>(
            "SELECT id, title FROM tags WHERE id = ANY($1) ORDER BY title",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| database_error("Failed to find tags by ids", e))?;

        Ok(rows.into_iter().map(Tag::from).collect())
    }

    async fn find_all(&self) -> RepositoryResult<Vec<Tag>> {
        let rows = sqlx::query_as::<_, TagRow>("SELECT id, title FROM tags ORDER BY title")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| database_error("Failed to list tags", e))?;

        Ok(rows.into_iter().map(Tag::from).collect())
    }
}
