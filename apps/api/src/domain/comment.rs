use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::errors::DomainError;

pub const COMMENT_MESSAGE_MIN: usize = 10;
pub const COMMENT_MESSAGE_MAX: usize = 300;

/// A reader's comment on a post
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    id: Uuid,
    post_id: Uuid,
    message: String,
    user_id: Uuid,
    created_at: DateTime<Utc>,
}

impl Comment {
    /// Creates a comment on `post_id` written by `user_id`
    ///
    /// The message is trimmed and must be 10..=300 characters long.
    pub fn new(post_id: Uuid, user_id: Uuid, message: impl Into<String>) -> Result<Self, DomainError> {
        let message = message.into().trim().to_string();
        DomainError::check_length("message", &message, COMMENT_MESSAGE_MIN, COMMENT_MESSAGE_MAX)?;

        Ok(Self {
            id: Uuid::new_v4(),
            post_id,
            message,
            user_id,
            created_at: Utc::now(),
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn post_id(&self) -> Uuid {
        self.post_id
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn is_authored_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }

    /// Rebuilds a comment from stored data without validation
    pub fn from_persistence(
        id: Uuid,
        post_id: Uuid,
        message: String,
        user_id: Uuid,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            post_id,
            message,
            user_id,
            created_at,
        }
    }
}
