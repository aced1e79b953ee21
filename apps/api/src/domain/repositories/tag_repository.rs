use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::errors::RepositoryResult;
use crate::domain::tag::Tag;

/// Repository trait for tags
#[async_trait]
pub trait TagRepository: Send + Sync {
    /// Insert a tag; `Conflict` when the title is taken
    async fn save(&self, tag: &Tag) -> RepositoryResult<()>;

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Tag>;

    /// Tags matching the given ids; unknown ids are skipped
    async fn find_by_ids(&self, ids: &[Uuid]) -> RepositoryResult<Vec<Tag>>;

    /// All tags ordered by title
    async fn find_all(&self) -> RepositoryResult<Vec<Tag>>;
}
