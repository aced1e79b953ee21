use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::errors::RepositoryResult;
use crate::domain::post::Post;
use crate::domain::query::{PaginationResult, PostQuery, SearchQuery};

/// Repository trait for the Post aggregate
///
/// Posts are always returned with their tags and comments loaded.
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Insert a new post together with its tag links
    async fn save(&self, post: &Post) -> RepositoryResult<()>;

    /// Find a post by id, `NotFound` when it does not exist
    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Post>;

    /// Persist the title, tags and update timestamp of an existing post
    async fn update(&self, post: &Post) -> RepositoryResult<()>;

    /// Delete a post with its comments and tag links
    async fn delete_by_id(&self, id: Uuid) -> RepositoryResult<()>;

    /// One page of posts, filtered by tags and ordered by creation date
    async fn find(&self, query: &PostQuery) -> RepositoryResult<PaginationResult<Post>>;

    /// Posts whose title contains the search string
    async fn search(&self, query: &SearchQuery) -> RepositoryResult<Vec<Post>>;
}
