use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::value_objects::Email;
use crate::domain::errors::DomainError;

pub const USER_NAME_MIN: usize = 3;
pub const USER_NAME_MAX: usize = 50;

/// Registered blog user
///
/// Plain data carrier; `created_at` is the registration date.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub email: Email,
    pub name: String,
    pub avatar: Option<String>,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Creates a user from an already hashed password
    pub fn new(
        email: Email,
        name: impl Into<String>,
        avatar: Option<String>,
        password_hash: String,
    ) -> Result<Self, DomainError> {
        let name = name.into().trim().to_string();
        DomainError::check_length("name", &name, USER_NAME_MIN, USER_NAME_MAX)?;

        Ok(Self {
            id: Uuid::new_v4(),
            email,
            name,
            avatar: avatar.filter(|a| !a.trim().is_empty()),
            password_hash,
            created_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_user() {
        let email = Email::new("keks@user.local").unwrap();
        let user = User::new(email.clone(), " Keks ", Some("/images/user.png".into()), "hash".into())
            .unwrap();

        assert_eq!(user.email, email);
        assert_eq!(user.name, "Keks");
        assert_eq!(user.avatar.as_deref(), Some("/images/user.png"));
    }

    #[test]
    fn blank_avatar_is_dropped() {
        let email = Email::new("keks@user.local").unwrap();
        let user = User::new(email, "Keks", Some("   ".into()), "hash".into()).unwrap();
        assert!(user.avatar.is_none());
    }

    #[test]
    fn short_name_fails() {
        let email = Email::new("keks@user.local").unwrap();
        assert!(User::new(email, "K", None, "hash".into()).is_err());
    }
}
