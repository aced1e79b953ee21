// Repository contracts (ports)
// Implemented by the infrastructure layer

pub mod comment_repository;
pub mod post_repository;
pub mod tag_repository;
pub mod user_repository;

pub use comment_repository::CommentRepository;
pub use post_repository::PostRepository;
pub use tag_repository::TagRepository;
pub use user_repository::UserRepository;
