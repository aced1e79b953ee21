// Row types shared by the PostgreSQL repositories

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::errors::{RepositoryError, RepositoryResult};
use crate::domain::post::{PostContent, PostParts, PostType};
use crate::domain::user::{Email, User};
use crate::domain::{Comment, Post, Tag};

/// Column list matching [`PostRow`], posts aliased as `p`
pub(crate) const POST_COLUMNS: &str = "p.id, p.original_id, p.is_repost, p.is_draft, \
     p.type AS post_type, p.title, p.description, p.content, p.video_url, p.quote, \
     p.quote_author, p.photo_url, p.link_url, p.likes_count, p.user_id, \
     p.original_author, p.created_at, p.updated_at";

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct PostRow {
    pub id: Uuid,
    pub original_id: Uuid,
    pub is_repost: bool,
    pub is_draft: bool,
    pub post_type: PostType,
    pub title: String,
    pub description: Option<String>,
    pub content: Option<String>,
    pub video_url: Option<String>,
    pub quote: Option<String>,
    pub quote_author: Option<String>,
    pub photo_url: Option<String>,
    pub link_url: Option<String>,
    pub likes_count: i32,
    pub user_id: Uuid,
    pub original_author: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PostRow {
    /// Builds the aggregate; fails when a column required by the type is NULL
    pub fn into_post(self, tags: Vec<Tag>, comments: Vec<Comment>) -> RepositoryResult<Post> {
        let (id, post_type) = (self.id, self.post_type);
        let missing = |column: &str| {
            RepositoryError::Database(format!(
                "post {} of type {} has no {}",
                id, post_type, column
            ))
        };

        let content = match post_type {
            PostType::Text => PostContent::Text {
                description: self.description.ok_or_else(|| missing("description"))?,
                content: self.content.ok_or_else(|| missing("content"))?,
            },
            PostType::Video => PostContent::Video {
                video_url: self.video_url.ok_or_else(|| missing("video_url"))?,
            },
            PostType::Quote => PostContent::Quote {
                quote: self.quote.ok_or_else(|| missing("quote"))?,
                quote_author: self.quote_author.ok_or_else(|| missing("quote_author"))?,
            },
            PostType::Photo => PostContent::Photo {
                photo_url: self.photo_url.ok_or_else(|| missing("photo_url"))?,
            },
            PostType::Link => PostContent::Link {
                link_url: self.link_url.ok_or_else(|| missing("link_url"))?,
                description: self.description,
            },
        };

        Ok(Post::from_persistence(PostParts {
            id: self.id,
            original_id: self.original_id,
            is_repost: self.is_repost,
            is_draft: self.is_draft,
            title: self.title,
            content,
            likes_count: self.likes_count,
            tags,
            comments,
            user_id: self.user_id,
            original_author: self.original_author,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }))
    }
}

/// Per-type columns of a post, NULL where the type has no such field
#[derive(Debug, Default)]
pub(crate) struct ContentColumns<'a> {
    pub description: Option<&'a str>,
    pub content: Option<&'a str>,
    pub video_url: Option<&'a str>,
    pub quote: Option<&'a str>,
    pub quote_author: Option<&'a str>,
    pub photo_url: Option<&'a str>,
    pub link_url: Option<&'a str>,
}

impl<'a> From<&'a PostContent> for ContentColumns<'a> {
    fn from(content: &'a PostContent) -> Self {
        match content {
            PostContent::Text {
                description,
                content,
            } => Self {
                description: Some(description),
                content: Some(content),
                ..Default::default()
            },
            PostContent::Video { video_url } => Self {
                video_url: Some(video_url),
                ..Default::default()
            },
            PostContent::Quote {
                quote,
                quote_author,
            } => Self {
                quote: Some(quote),
                quote_author: Some(quote_author),
                ..Default::default()
            },
            PostContent::Photo { photo_url } => Self {
                photo_url: Some(photo_url),
                ..Default::default()
            },
            PostContent::Link {
                link_url,
                description,
            } => Self {
                link_url: Some(link_url),
                description: description.as_deref(),
                ..Default::default()
            },
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct PostTagRow {
    pub post_id: Uuid,
    pub id: Uuid,
    pub title: String,
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct TagRow {
    pub id: Uuid,
    pub title: String,
}

impl From<TagRow> for Tag {
    fn from(row: TagRow) -> Self {
        Tag::from_persistence(row.id, row.title)
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct CommentRow {
    pub id: Uuid,
    pub post_id: Uuid,
    pub message: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<CommentRow> for Comment {
    fn from(row: CommentRow) -> Self {
        Comment::from_persistence(row.id, row.post_id, row.message, row.user_id, row.created_at)
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub avatar: Option<String>,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let email = Email::new(&row.email)
            .map_err(|e| RepositoryError::Database(format!("Invalid email from database: {}", e)))?;

        Ok(User {
            id: row.id,
            email,
            name: row.name,
            avatar: row.avatar,
            password_hash: row.password_hash,
            created_at: row.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(post_type: PostType) -> PostRow {
        let id = Uuid::new_v4();
        let user_id = Uuid::new_v4();
        PostRow {
            id,
            original_id: id,
            is_repost: false,
            is_draft: false,
            post_type,
            title: "A title that is long enough".to_string(),
            description: None,
            content: None,
            video_url: None,
            quote: None,
            quote_author: None,
            photo_url: None,
            link_url: None,
            likes_count: 3,
            user_id,
            original_author: user_id,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn photo_row_becomes_photo_post() {
        let mut r = row(PostType::Photo);
        r.photo_url = Some("https://example.com/a.png".to_string());

        let post = r.into_post(vec![], vec![]).unwrap();

        assert_eq!(post.post_type(), PostType::Photo);
        assert_eq!(post.likes_count(), 3);
    }

    #[test]
    fn link_description_is_optional() {
        let mut r = row(PostType::Link);
        r.link_url = Some("https://example.com".to_string());

        let post = r.into_post(vec![], vec![]).unwrap();
        assert_eq!(
            post.content(),
            &PostContent::Link {
                link_url: "https://example.com".to_string(),
                description: None
            }
        );
    }

    #[test]
    fn missing_required_column_is_an_error() {
        let r = row(PostType::Quote);
        let err = r.into_post(vec![], vec![]).unwrap_err();
        assert!(err.to_string().contains("has no quote"));
    }

    #[test]
    fn content_columns_only_fill_own_fields() {
        let content = PostContent::Quote {
            quote: "q".to_string(),
            quote_author: "a".to_string(),
        };
        let columns = ContentColumns::from(&content);

        assert_eq!(columns.quote, Some("q"));
        assert_eq!(columns.quote_author, Some("a"));
        assert!(columns.description.is_none());
        assert!(columns.link_url.is_none());
    }
}
