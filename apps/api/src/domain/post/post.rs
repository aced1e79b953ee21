use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::value_objects::{PostContent, PostType};
use crate::domain::comment::Comment;
use crate::domain::errors::DomainError;
use crate::domain::tag::Tag;

pub const POST_TITLE_MIN: usize = 20;
pub const POST_TITLE_MAX: usize = 50;
pub const POST_TAGS_MAX: usize = 8;

/// Post aggregate root
///
/// A post is either an original publication or a repost of one. Reposts keep
/// pointing at the first original through `original_id` and `original_author`.
///
/// # Invariants
/// - Title is 20..=50 characters
/// - Content satisfies its per-type rules
/// - At most 8 distinct tags
/// - An original post has `original_id == id` and `original_author == user_id`
///
/// # Example
/// ```
/// use blog_api::domain::{Post, PostContent};
/// use uuid::Uuid;
///
/// let author = Uuid::new_v4();
/// let post = Post::new(
///     author,
///     "Notes on ownership in Rust".to_string(),
///     PostContent::Photo { photo_url: "https://example.com/p.png".to_string() },
///     vec![],
///     false,
/// ).expect("valid post");
///
/// assert_eq!(post.original_id(), post.id());
/// assert!(!post.is_repost());
/// ```
#[derive(Debug, Clone)]
pub struct Post {
    id: Uuid,
    original_id: Uuid,
    is_repost: bool,
    is_draft: bool,
    title: String,
    content: PostContent,
    likes_count: i32,
    tags: Vec<Tag>,
    comments: Vec<Comment>,
    user_id: Uuid,
    original_author: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Stored state of a post, used to rebuild the aggregate
#[derive(Debug, Clone)]
pub struct PostParts {
    pub id: Uuid,
    pub original_id: Uuid,
    pub is_repost: bool,
    pub is_draft: bool,
    pub title: String,
    pub content: PostContent,
    pub likes_count: i32,
    pub tags: Vec<Tag>,
    pub comments: Vec<Comment>,
    pub user_id: Uuid,
    pub original_author: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Creates a new original post
    ///
    /// # Returns
    /// * `Ok(Post)` - New post authored by `user_id`
    /// * `Err(DomainError)` - If title, content or tags are invalid
    pub fn new(
        user_id: Uuid,
        title: String,
        content: PostContent,
        tags: Vec<Tag>,
        is_draft: bool,
    ) -> Result<Self, DomainError> {
        let title = validate_title(title)?;
        content.validate()?;
        let tags = validate_tags(tags)?;

        let id = Uuid::new_v4();
        let now = Utc::now();

        Ok(Self {
            id,
            original_id: id,
            is_repost: false,
            is_draft,
            title,
            content,
            likes_count: 0,
            tags,
            comments: Vec::new(),
            user_id,
            original_author: user_id,
            created_at: now,
            updated_at: now,
        })
    }

    /// Changes the title and/or tags
    ///
    /// Nothing is modified when validation fails.
    pub fn update(&mut self, title: Option<String>, tags: Option<Vec<Tag>>) -> Result<(), DomainError> {
        let title = title.map(validate_title).transpose()?;
        let tags = tags.map(validate_tags).transpose()?;

        if let Some(title) = title {
            self.title = title;
        }
        if let Some(tags) = tags {
            self.tags = tags;
        }
        self.updated_at = Utc::now();

        Ok(())
    }

    /// Creates a repost of this post for `user_id`
    ///
    /// # Business Rules
    /// - Users cannot repost their own posts, directly or through
    ///   someone else's repost
    /// - Drafts cannot be reposted
    /// - The repost references the first original, not an intermediate repost
    pub fn repost(&self, user_id: Uuid) -> Result<Post, DomainError> {
        if self.user_id == user_id || self.original_author == user_id {
            return Err(DomainError::Invalid(
                "You cannot repost your own post".to_string(),
            ));
        }
        if self.is_draft {
            return Err(DomainError::Invalid(
                "Drafts cannot be reposted".to_string(),
            ));
        }

        let now = Utc::now();
        Ok(Post {
            id: Uuid::new_v4(),
            original_id: self.original_id,
            is_repost: true,
            is_draft: false,
            title: self.title.clone(),
            content: self.content.clone(),
            likes_count: 0,
            tags: self.tags.clone(),
            comments: Vec::new(),
            user_id,
            original_author: self.original_author,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn is_authored_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }

    // ===== Getters =====

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn original_id(&self) -> Uuid {
        self.original_id
    }

    pub fn is_repost(&self) -> bool {
        self.is_repost
    }

    pub fn is_draft(&self) -> bool {
        self.is_draft
    }

    pub fn post_type(&self) -> PostType {
        self.content.post_type()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &PostContent {
        &self.content
    }

    pub fn likes_count(&self) -> i32 {
        self.likes_count
    }

    pub fn comments_count(&self) -> usize {
        self.comments.len()
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn tag_ids(&self) -> Vec<Uuid> {
        self.tags.iter().map(Tag::id).collect()
    }

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn original_author(&self) -> Uuid {
        self.original_author
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Reconstructs a Post from persistence layer data
    ///
    /// Skips validation. Only for repository implementations.
    pub fn from_persistence(parts: PostParts) -> Self {
        Self {
            id: parts.id,
            original_id: parts.original_id,
            is_repost: parts.is_repost,
            is_draft: parts.is_draft,
            title: parts.title,
            content: parts.content,
            likes_count: parts.likes_count,
            tags: parts.tags,
            comments: parts.comments,
            user_id: parts.user_id,
            original_author: parts.original_author,
            created_at: parts.created_at,
            updated_at: parts.updated_at,
        }
    }

    /// Replaces the loaded comments
    pub fn with_comments(mut self, comments: Vec<Comment>) -> Self {
        self.comments = comments;
        self
    }
}

fn validate_title(title: String) -> Result<String, DomainError> {
    let title = title.trim().to_string();
    DomainError::check_length("title", &title, POST_TITLE_MIN, POST_TITLE_MAX)?;
    Ok(title)
}

fn validate_tags(tags: Vec<Tag>) -> Result<Vec<Tag>, DomainError> {
    let mut unique: Vec<Tag> = Vec::with_capacity(tags.len());
    for tag in tags {
        if !unique.iter().any(|t| t.id() == tag.id()) {
            unique.push(tag);
        }
    }

    if unique.len() > POST_TAGS_MAX {
        return Err(DomainError::TooManyTags { max: POST_TAGS_MAX });
    }

    Ok(unique)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote() -> PostContent {
        PostContent::Quote {
            quote: "Premature optimization is the root of all evil".to_string(),
            quote_author: "Donald Knuth".to_string(),
        }
    }

    fn title() -> String {
        "Quotes worth remembering".to_string()
    }

    #[test]
    fn create_original_post() {
        let author = Uuid::new_v4();
        let tag = Tag::new("quotes").unwrap();

        let post = Post::new(author, title(), quote(), vec![tag.clone()], false).unwrap();

        assert_eq!(post.title(), "Quotes worth remembering");
        assert_eq!(post.post_type(), PostType::Quote);
        assert_eq!(post.original_id(), post.id());
        assert_eq!(post.original_author(), author);
        assert_eq!(post.user_id(), author);
        assert_eq!(post.likes_count(), 0);
        assert_eq!(post.comments_count(), 0);
        assert_eq!(post.tag_ids(), vec![tag.id()]);
        assert!(!post.is_repost());
        assert!(!post.is_draft());
        assert_eq!(post.created_at(), post.updated_at());
    }

    #[test]
    fn short_title_fails() {
        let result = Post::new(Uuid::new_v4(), "Short".to_string(), quote(), vec![], false);
        assert!(matches!(
            result,
            Err(DomainError::InvalidLength { field: "title", .. })
        ));
    }

    #[test]
    fn invalid_content_fails() {
        let content = PostContent::Video {
            video_url: "youtube".to_string(),
        };
        let result = Post::new(Uuid::new_v4(), title(), content, vec![], false);
        assert!(result.is_err());
    }

    #[test]
    fn duplicate_tags_are_collapsed() {
        let tag = Tag::new("quotes").unwrap();
        let post = Post::new(
            Uuid::new_v4(),
            title(),
            quote(),
            vec![tag.clone(), tag.clone()],
            false,
        )
        .unwrap();

        assert_eq!(post.tags().len(), 1);
    }

    #[test]
    fn more_than_eight_tags_fails() {
        let tags = (0..9)
            .map(|i| Tag::new(format!("tag{}", i)).unwrap())
            .collect();
        let result = Post::new(Uuid::new_v4(), title(), quote(), tags, false);
        assert_eq!(result.unwrap_err(), DomainError::TooManyTags { max: 8 });
    }

    #[test]
    fn update_changes_title_and_tags() {
        let mut post = Post::new(Uuid::new_v4(), title(), quote(), vec![], false).unwrap();
        let tag = Tag::new("wisdom").unwrap();

        post.update(Some("Quotes I keep coming back to".to_string()), Some(vec![tag]))
            .unwrap();

        assert_eq!(post.title(), "Quotes I keep coming back to");
        assert_eq!(post.tags().len(), 1);
        assert!(post.updated_at() >= post.created_at());
    }

    #[test]
    fn failed_update_leaves_post_unchanged() {
        let mut post = Post::new(Uuid::new_v4(), title(), quote(), vec![], false).unwrap();
        let tags = (0..9)
            .map(|i| Tag::new(format!("tag{}", i)).unwrap())
            .collect();

        let result = post.update(Some("Another valid title here".to_string()), Some(tags));

        assert!(result.is_err());
        assert_eq!(post.title(), "Quotes worth remembering");
        assert!(post.tags().is_empty());
    }

    #[test]
    fn repost_points_at_original() {
        let author = Uuid::new_v4();
        let reader = Uuid::new_v4();
        let post = Post::new(author, title(), quote(), vec![], false).unwrap();

        let repost = post.repost(reader).unwrap();

        assert_ne!(repost.id(), post.id());
        assert_eq!(repost.original_id(), post.id());
        assert_eq!(repost.original_author(), author);
        assert_eq!(repost.user_id(), reader);
        assert!(repost.is_repost());
        assert_eq!(repost.content(), post.content());
    }

    #[test]
    fn repost_of_repost_keeps_first_original() {
        let post = Post::new(Uuid::new_v4(), title(), quote(), vec![], false).unwrap();
        let first = post.repost(Uuid::new_v4()).unwrap();
        let second = first.repost(Uuid::new_v4()).unwrap();

        assert_eq!(second.original_id(), post.id());
        assert_eq!(second.original_author(), post.user_id());
    }

    #[test]
    fn cannot_repost_a_repost_of_own_post() {
        let author = Uuid::new_v4();
        let post = Post::new(author, title(), quote(), vec![], false).unwrap();
        let repost = post.repost(Uuid::new_v4()).unwrap();

        assert!(repost.repost(author).is_err());
    }

    #[test]
    fn cannot_repost_own_post() {
        let author = Uuid::new_v4();
        let post = Post::new(author, title(), quote(), vec![], false).unwrap();
        assert!(post.repost(author).is_err());
    }

    #[test]
    fn cannot_repost_draft() {
        let post = Post::new(Uuid::new_v4(), title(), quote(), vec![], true).unwrap();
        assert!(post.repost(Uuid::new_v4()).is_err());
    }

    #[test]
    fn comments_count_follows_loaded_comments() {
        let post = Post::new(Uuid::new_v4(), title(), quote(), vec![], false).unwrap();
        let comment = Comment::new(post.id(), Uuid::new_v4(), "Knuth is always right").unwrap();

        let post = post.with_comments(vec![comment]);
        assert_eq!(post.comments_count(), 1);
    }
}
