// Domain layer module exports
// Entities, value objects and repository contracts for the blog.
// Nothing in here knows about HTTP or SQL.

pub mod comment;
pub mod errors;
pub mod post;
pub mod query;
pub mod repositories;
pub mod tag;
pub mod user;

pub use comment::Comment;
pub use errors::{DomainError, RepositoryError, RepositoryResult};
pub use post::{Post, PostContent, PostType};
pub use query::{PaginationResult, PostQuery, SearchQuery, SortDirection};
pub use tag::Tag;
pub use user::User;
