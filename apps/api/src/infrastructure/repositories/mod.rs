// Repository implementations (data access layer)
// Adapters that implement domain repository interfaces

pub(crate) mod db_error;
pub mod in_memory;
pub mod postgres_comment_repository;
pub mod postgres_post_repository;
pub mod postgres_tag_repository;
pub mod postgres_user_repository;
mod rows;

pub use in_memory::InMemoryStore;
pub use postgres_comment_repository::PostgresCommentRepository;
pub use postgres_post_repository::PostgresPostRepository;
pub use postgres_tag_repository::PostgresTagRepository;
pub use postgres_user_repository::PostgresUserRepository;
