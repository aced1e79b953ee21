use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::db_error::{database_error, is_foreign_key_violation};
use super::rows::CommentRow;
use crate::domain::errors::{RepositoryError, RepositoryResult};
use crate::domain::repositories::CommentRepository;
use crate::domain::Comment;

/// PostgreSQL implementation of CommentRepository
pub struct PostgresCommentRepository {
    pool: PgPool,
}

impl PostgresCommentRepository {
    /// Creates a new PostgresCommentRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn save(&self, comment: &Comment) -> RepositoryResult<()> {
        sqlx::query(
            r#"
            INSERT INTO comments (id, post_id, message, user_id, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(comment.id())
        .bind(comment.post_id())
        .bind(comment.message())
        .bind(comment.user_id())
        .bind(comment.created_at())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                RepositoryError::not_found("Post", comment.post_id())
            } else {
                database_error("Failed to save comment", e)
            }
        })?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Comment> {
        sqlx::query_as::<_, CommentRow>(
            r#"
            SELECT id, post_id, message, user_id, created_at
            FROM comments
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| database_error("Failed to find comment by id", e))?
        .map(Comment::from)
        .ok_or_else(|| RepositoryError::not_found("Comment", id))
    }

    async fn find_by_post(&self, post_id: Uuid) -> RepositoryResult<Vec<Comment>> {
        let rows = sqlx::query_as::<_, CommentRow>(
            r#"
            SELECT id, post_id, message, user_id, created_at
            FROM comments
            WHERE post_id = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| database_error("Failed to find comments by post", e))?;

        Ok(rows.into_iter().map(Comment::from).collect())
    }

    async fn delete_by_id(&self, id: Uuid) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| database_error("Failed to delete comment", e))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::not_found("Comment", id));
        }

        Ok(())
    }
}
