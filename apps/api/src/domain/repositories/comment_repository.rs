use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::comment::Comment;
use crate::domain::errors::RepositoryResult;

/// Repository trait for comments
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Insert a comment; `InvalidReference` when the post is gone
    async fn save(&self, comment: &Comment) -> RepositoryResult<()>;

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Comment>;

    /// Comments of a post, oldest first
    async fn find_by_post(&self, post_id: Uuid) -> RepositoryResult<Vec<Comment>>;

    async fn delete_by_id(&self, id: Uuid) -> RepositoryResult<()>;
}
