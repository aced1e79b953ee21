use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::errors::RepositoryResult;
use crate::domain::user::{Email, User};

/// Repository trait for users
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create a new user; `Conflict` when the email is registered
    async fn create(&self, user: &User) -> RepositoryResult<()>;

    /// Find a user by id, `NotFound` when it does not exist
    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<User>;

    /// Find a user by email address
    async fn find_by_email(&self, email: &Email) -> RepositoryResult<Option<User>>;
}
