use serde::{Deserialize, Serialize};
use validator::ValidateUrl;

use crate::domain::errors::DomainError;

/// Kind of a post, stored as the `post_type` database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "post_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PostType {
    Text,
    Video,
    Quote,
    Photo,
    Link,
}

impl std::fmt::Display for PostType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PostType::Text => write!(f, "text"),
            PostType::Video => write!(f, "video"),
            PostType::Quote => write!(f, "quote"),
            PostType::Photo => write!(f, "photo"),
            PostType::Link => write!(f, "link"),
        }
    }
}

/// Per-type body of a post
///
/// Serialized flattened into the post with a `type` discriminator:
/// ```
/// use blog_api::domain::PostContent;
///
/// let content: PostContent = serde_json::from_str(
///     r#"{"type":"photo","photoUrl":"https://example.com/cat.png"}"#,
/// ).unwrap();
/// assert!(content.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum PostContent {
    Text {
        description: String,
        content: String,
    },
    Video {
        video_url: String,
    },
    Quote {
        quote: String,
        quote_author: String,
    },
    Photo {
        photo_url: String,
    },
    Link {
        link_url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
}

impl PostContent {
    pub fn post_type(&self) -> PostType {
        match self {
            PostContent::Text { .. } => PostType::Text,
            PostContent::Video { .. } => PostType::Video,
            PostContent::Quote { .. } => PostType::Quote,
            PostContent::Photo { .. } => PostType::Photo,
            PostContent::Link { .. } => PostType::Link,
        }
    }

    /// Checks the per-type field rules
    ///
    /// # Validation Rules
    /// - text: description 50..=255, content 100..=1024 characters
    /// - quote: quote 20..=300, author 3..=50 characters
    /// - video, photo, link: the URL must be valid
    /// - link: optional description up to 300 characters
    pub fn validate(&self) -> Result<(), DomainError> {
        match self {
            PostContent::Text {
                description,
                content,
            } => {
                DomainError::check_length("description", description, 50, 255)?;
                DomainError::check_length("content", content, 100, 1024)
            }
            PostContent::Video { video_url } => check_url("videoUrl", video_url),
            PostContent::Quote {
                quote,
                quote_author,
            } => {
                DomainError::check_length("quote", quote, 20, 300)?;
                DomainError::check_length("quoteAuthor", quote_author, 3, 50)
            }
            PostContent::Photo { photo_url } => check_url("photoUrl", photo_url),
            PostContent::Link {
                link_url,
                description,
            } => {
                check_url("linkUrl", link_url)?;
                match description {
                    Some(description) => {
                        DomainError::check_length("description", description, 0, 300)
                    }
                    None => Ok(()),
                }
            }
        }
    }
}

fn check_url(field: &'static str, value: &str) -> Result<(), DomainError> {
    if value.validate_url() {
        Ok(())
    } else {
        Err(DomainError::InvalidUrl { field })
    }
}
