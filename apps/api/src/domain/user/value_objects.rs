use serde::{Deserialize, Serialize};
use std::fmt;
use validator::ValidateEmail;

/// Email value object
///
/// # Invariants
/// - Trimmed and lower-cased
/// - Syntactically valid address
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Creates a new Email value object
    ///
    /// # Example
    /// ```
    /// use blog_api::domain::user::value_objects::Email;
    ///
    /// let email = Email::new(" Keks@User.Local ").expect("valid email");
    /// assert_eq!(email.as_str(), "keks@user.local");
    /// ```
    pub fn new(email: impl AsRef<str>) -> Result<Self, String> {
        let email = email.as_ref().trim().to_lowercase();
        if email.validate_email() {
            Ok(Email(email))
        } else {
            Err(format!("Invalid email: {}", email))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for Email {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Email::new(value)
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_email() {
        assert!(Email::new("user@user.local").is_ok());
    }

    #[test]
    fn valid_email_with_subdomain() {
        assert!(Email::new("user@mail.example.com").is_ok());
    }

    #[test]
    fn email_is_normalized() {
        let email = Email::new("  User@Example.COM ").unwrap();
        assert_eq!(email.as_str(), "user@example.com");
    }

    #[test]
    fn invalid_email_no_at_symbol() {
        assert!(Email::new("invalid").is_err());
    }

    #[test]
    fn invalid_email_no_user() {
        assert!(Email::new("@example.com").is_err());
    }

    #[test]
    fn invalid_email_empty() {
        assert!(Email::new("").is_err());
    }

    #[test]
    fn email_display() {
        let email = Email::new("test@example.com").unwrap();
        assert_eq!(format!("{}", email), "test@example.com");
    }

    #[test]
    fn deserialize_validates() {
        let ok: Result<Email, _> = serde_json::from_str("\"a@example.com\"");
        let bad: Result<Email, _> = serde_json::from_str("\"nope\"");
        assert!(ok.is_ok());
        assert!(bad.is_err());
    }
}
