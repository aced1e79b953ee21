use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::DomainError;

pub const TAG_TITLE_MIN: usize = 3;
pub const TAG_TITLE_MAX: usize = 10;

/// Tag attached to posts
///
/// # Invariants
/// - Title is trimmed and lower-cased
/// - Title is 3..=10 characters, starts with a letter, has no whitespace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    id: Uuid,
    title: String,
}

impl Tag {
    /// Creates a new tag with a fresh id
    ///
    /// # Example
    /// ```
    /// use blog_api::domain::Tag;
    ///
    /// let tag = Tag::new("  Books ").expect("valid tag");
    /// assert_eq!(tag.title(), "books");
    /// ```
    pub fn new(title: impl AsRef<str>) -> Result<Self, DomainError> {
        let title = Self::normalize(title.as_ref())?;
        Ok(Self {
            id: Uuid::new_v4(),
            title,
        })
    }

    /// Normalizes and validates a tag title
    pub fn normalize(title: &str) -> Result<String, DomainError> {
        let title = title.trim().to_lowercase();
        DomainError::check_length("tag title", &title, TAG_TITLE_MIN, TAG_TITLE_MAX)?;

        if !title.chars().next().is_some_and(char::is_alphabetic) {
            return Err(DomainError::Invalid(
                "tag title must start with a letter".to_string(),
            ));
        }
        if title.chars().any(char::is_whitespace) {
            return Err(DomainError::Invalid(
                "tag title must not contain spaces".to_string(),
            ));
        }

        Ok(title)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Rebuilds a tag from stored data without validation
    pub fn from_persistence(id: Uuid, title: String) -> Self {
        Self { id, title }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_is_normalized() {
        let tag = Tag::new("  Rust ").unwrap();
        assert_eq!(tag.title(), "rust");
    }

    #[test]
    fn cyrillic_title_is_accepted() {
        assert!(Tag::new("Компьютеры").is_ok());
    }

    #[test]
    fn too_short_title_fails() {
        assert!(matches!(
            Tag::new("ab"),
            Err(DomainError::InvalidLength { .. })
        ));
    }

    #[test]
    fn too_long_title_fails() {
        assert!(Tag::new("abcdefghijk").is_err());
    }

    #[test]
    fn title_must_start_with_letter() {
        assert!(Tag::new("1password").is_err());
    }

    #[test]
    fn title_with_space_fails() {
        assert!(Tag::new("two words").is_err());
    }

    #[test]
    fn new_tags_get_distinct_ids() {
        let a = Tag::new("books").unwrap();
        let b = Tag::new("books").unwrap();
        assert_ne!(a.id(), b.id());
    }
}
