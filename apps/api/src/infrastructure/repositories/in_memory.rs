// In-memory repository implementations
// Back the HTTP tests and the `STORAGE=memory` mode

use std::cmp::Ordering;
use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::errors::{RepositoryError, RepositoryResult};
use crate::domain::query::{PaginationResult, PostQuery, SearchQuery, SortDirection};
use crate::domain::repositories::{
    CommentRepository, PostRepository, TagRepository, UserRepository,
};
use crate::domain::user::{Email, User};
use crate::domain::{Comment, Post, Tag};
use crate::infrastructure::seed;

#[derive(Default)]
struct StoreData {
    /// Posts are kept without comments; comments are attached on read
    posts: HashMap<Uuid, Post>,
    comments: Vec<Comment>,
    tags: HashMap<Uuid, Tag>,
    users: HashMap<Uuid, User>,
}

impl StoreData {
    fn with_comments(&self, post: &Post) -> Post {
        let mut comments: Vec<Comment> = self
            .comments
            .iter()
            .filter(|c| c.post_id() == post.id())
            .cloned()
            .collect();
        comments.sort_by_key(|c| (c.created_at(), c.id()));
        post.clone().with_comments(comments)
    }

    fn check_tags(&self, post: &Post) -> RepositoryResult<()> {
        if post.tags().iter().all(|t| self.tags.contains_key(&t.id())) {
            Ok(())
        } else {
            Err(RepositoryError::InvalidReference("Unknown tag".to_string()))
        }
    }
}

/// Blog storage held in process memory
///
/// A single store implements every repository trait so that posts, comments
/// and tags stay consistent with each other.
#[derive(Default)]
pub struct InMemoryStore {
    data: RwLock<StoreData>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-filled with the demo tags, posts and comments
    pub fn seeded() -> Self {
        let mut data = StoreData::default();
        for tag in seed::tags() {
            data.tags.insert(tag.id(), tag);
        }
        for (post, comments) in seed::posts() {
            data.comments.extend(comments);
            data.posts.insert(post.id(), post);
        }

        Self {
            data: RwLock::new(data),
        }
    }
}

fn compare_created(a: &Post, b: &Post, direction: SortDirection) -> Ordering {
    let ordering = a
        .created_at()
        .cmp(&b.created_at())
        .then_with(|| a.id().cmp(&b.id()));
    match direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}

#[async_trait]
impl PostRepository for InMemoryStore {
    async fn save(&self, post: &Post) -> RepositoryResult<()> {
        let mut data = self.data.write().await;
        if data.posts.contains_key(&post.id()) {
            return Err(RepositoryError::Conflict(format!(
                "Post with id {} already exists",
                post.id()
            )));
        }
        data.check_tags(post)?;
        data.posts
            .insert(post.id(), post.clone().with_comments(Vec::new()));
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Post> {
        let data = self.data.read().await;
        data.posts
            .get(&id)
            .map(|post| data.with_comments(post))
            .ok_or_else(|| RepositoryError::not_found("Post", id))
    }

    async fn update(&self, post: &Post) -> RepositoryResult<()> {
        let mut data = self.data.write().await;
        if !data.posts.contains_key(&post.id()) {
            return Err(RepositoryError::not_found("Post", post.id()));
        }
        data.check_tags(post)?;
        data.posts
            .insert(post.id(), post.clone().with_comments(Vec::new()));
        Ok(())
    }

    async fn delete_by_id(&self, id: Uuid) -> RepositoryResult<()> {
        let mut data = self.data.write().await;
        if data.posts.remove(&id).is_none() {
            return Err(RepositoryError::not_found("Post", id));
        }
        data.comments.retain(|c| c.post_id() != id);
        Ok(())
    }

    async fn find(&self, query: &PostQuery) -> RepositoryResult<PaginationResult<Post>> {
        let data = self.data.read().await;

        let mut matching: Vec<&Post> = data
            .posts
            .values()
            .filter(|post| {
                query.tags.is_empty() || post.tags().iter().any(|t| query.tags.contains(&t.id()))
            })
            .collect();
        matching.sort_by(|a, b| compare_created(a, b, query.sort_direction));

        let total = matching.len() as u64;
        let offset = usize::try_from(query.offset()).unwrap_or(usize::MAX);
        let entities = matching
            .into_iter()
            .skip(offset)
            .take(query.limit as usize)
            .map(|post| data.with_comments(post))
            .collect();

        Ok(PaginationResult::new(entities, query, total))
    }

    async fn search(&self, query: &SearchQuery) -> RepositoryResult<Vec<Post>> {
        let data = self.data.read().await;

        let mut matching: Vec<&Post> = data
            .posts
            .values()
            .filter(|post| post.title().contains(query.title.as_str()))
            .collect();
        matching.sort_by(|a, b| compare_created(a, b, SortDirection::Desc));

        Ok(matching
            .into_iter()
            .take(query.limit as usize)
            .map(|post| data.with_comments(post))
            .collect())
    }
}

#[async_trait]
impl CommentRepository for InMemoryStore {
    async fn save(&self, comment: &Comment) -> RepositoryResult<()> {
        let mut data = self.data.write().await;
        if !data.posts.contains_key(&comment.post_id()) {
            return Err(RepositoryError::not_found("Post", comment.post_id()));
        }
        data.comments.push(comment.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Comment> {
        let data = self.data.read().await;
        data.comments
            .iter()
            .find(|c| c.id() == id)
            .cloned()
            .ok_or_else(|| RepositoryError::not_found("Comment", id))
    }

    async fn find_by_post(&self, post_id: Uuid) -> RepositoryResult<Vec<Comment>> {
        let data = self.data.read().await;
        let mut comments: Vec<Comment> = data
            .comments
            .iter()
            .filter(|c| c.post_id() == post_id)
            .cloned()
            .collect();
        comments.sort_by_key(|c| (c.created_at(), c.id()));
        Ok(comments)
    }

    async fn delete_by_id(&self, id: Uuid) -> RepositoryResult<()> {
        let mut data = self.data.write().await;
        let before = data.comments.len();
        data.comments.retain(|c| c.id() != id);
        if data.comments.len() == before {
            return Err(RepositoryError::not_found("Comment", id));
        }
        Ok(())
    }
}

#[async_trait]
impl TagRepository for InMemoryStore {
    async fn save(&self, tag: &Tag) -> RepositoryResult<()> {
        let mut data = self.data.write().await;
        if data.tags.values().any(|t| t.title() == tag.title()) {
            return Err(RepositoryError::Conflict(format!(
                "Tag '{}' already exists",
                tag.title()
            )));
        }
        data.tags.insert(tag.id(), tag.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Tag> {
        let data = self.data.read().await;
        data.tags
            .get(&id)
            .cloned()
            .ok_or_else(|| RepositoryError::not_found("Tag", id))
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> RepositoryResult<Vec<Tag>> {
        let data = self.data.read().await;
        let mut tags: Vec<Tag> = data
            .tags
            .values()
            .filter(|t| ids.contains(&t.id()))
            .cloned()
            .collect();
        tags.sort_by(|a, b| a.title().cmp(b.title()));
        Ok(tags)
    }

    async fn find_all(&self) -> RepositoryResult<Vec<Tag>> {
        let data = self.data.read().await;
        let mut tags: Vec<Tag> = data.tags.values().cloned().collect();
        tags.sort_by(|a, b| a.title().cmp(b.title()));
        Ok(tags)
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create(&self, user: &User) -> RepositoryResult<()> {
        let mut data = self.data.write().await;
        if data.users.values().any(|u| u.email == user.email) {
            return Err(RepositoryError::Conflict(
                "Email already registered".to_string(),
            ));
        }
        data.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<User> {
        let data = self.data.read().await;
        data.users
            .get(&id)
            .cloned()
            .ok_or_else(|| RepositoryError::not_found("User", id))
    }

    async fn find_by_email(&self, email: &Email) -> RepositoryResult<Option<User>> {
        let data = self.data.read().await;
        Ok(data.users.values().find(|u| &u.email == email).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PostContent;

    fn photo_post(user_id: Uuid, title: &str, tags: Vec<Tag>) -> Post {
        Post::new(
            user_id,
            title.to_string(),
            PostContent::Photo {
                photo_url: "https://example.com/photo.png".to_string(),
            },
            tags,
            false,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn save_and_find_post() {
        let store = InMemoryStore::new();
        let post = photo_post(Uuid::new_v4(), "Sunset over the harbour", vec![]);

        PostRepository::save(&store, &post).await.unwrap();
        let found = PostRepository::find_by_id(&store, post.id()).await.unwrap();

        assert_eq!(found.id(), post.id());
        assert_eq!(found.title(), "Sunset over the harbour");
    }

    #[tokio::test]
    async fn missing_post_is_not_found() {
        let store = InMemoryStore::new();
        let id = Uuid::new_v4();

        let err = PostRepository::find_by_id(&store, id).await.unwrap_err();
        assert_eq!(err.to_string(), format!("Post with id {} not found.", id));
    }

    #[tokio::test]
    async fn save_with_unknown_tag_fails() {
        let store = InMemoryStore::new();
        let tag = Tag::new("ghost").unwrap();
        let post = photo_post(Uuid::new_v4(), "Sunset over the harbour", vec![tag]);

        let err = PostRepository::save(&store, &post).await.unwrap_err();
        assert!(matches!(err, RepositoryError::InvalidReference(_)));
    }

    #[tokio::test]
    async fn find_filters_by_any_tag_and_pages() {
        let store = InMemoryStore::new();
        let sea = Tag::new("sea").unwrap();
        let city = Tag::new("city").unwrap();
        TagRepository::save(&store, &sea).await.unwrap();
        TagRepository::save(&store, &city).await.unwrap();

        let user = Uuid::new_v4();
        for title in ["First photo of the sea", "Second photo of the sea", "Third photo of the sea"] {
            let post = photo_post(user, title, vec![sea.clone()]);
            PostRepository::save(&store, &post).await.unwrap();
        }
        let untagged = photo_post(user, "A photo without any tags", vec![]);
        PostRepository::save(&store, &untagged).await.unwrap();

        let query = PostQuery {
            page: 2,
            limit: 2,
            tags: vec![sea.id(), city.id()],
            sort_direction: SortDirection::Asc,
        };
        let page = store.find(&query).await.unwrap();

        assert_eq!(page.total_items, 3);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.current_page, 2);
        assert_eq!(page.entities.len(), 1);
    }

    #[tokio::test]
    async fn delete_removes_comments() {
        let store = InMemoryStore::new();
        let post = photo_post(Uuid::new_v4(), "Sunset over the harbour", vec![]);
        PostRepository::save(&store, &post).await.unwrap();
        let comment = Comment::new(post.id(), Uuid::new_v4(), "Beautiful colours here").unwrap();
        CommentRepository::save(&store, &comment).await.unwrap();

        PostRepository::delete_by_id(&store, post.id()).await.unwrap();

        assert!(store.find_by_post(post.id()).await.unwrap().is_empty());
        assert!(PostRepository::delete_by_id(&store, post.id()).await.is_err());
    }

    #[tokio::test]
    async fn search_is_case_sensitive_substring() {
        let store = InMemoryStore::new();
        let post = photo_post(Uuid::new_v4(), "Sunset over the harbour", vec![]);
        PostRepository::save(&store, &post).await.unwrap();

        let hits = store.search(&SearchQuery::new("over the", None)).await.unwrap();
        let misses = store.search(&SearchQuery::new("SUNSET", None)).await.unwrap();

        assert_eq!(hits.len(), 1);
        assert!(misses.is_empty());
    }

    #[tokio::test]
    async fn search_treats_wildcards_literally() {
        let store = InMemoryStore::new();
        let user = Uuid::new_v4();
        for title in ["Giving 100% on every shot", "Sunset over the harbour"] {
            PostRepository::save(&store, &photo_post(user, title, vec![]))
                .await
                .unwrap();
        }

        let percent = store.search(&SearchQuery::new("0%", None)).await.unwrap();
        let underscore = store.search(&SearchQuery::new("_", None)).await.unwrap();
        let everything = store.search(&SearchQuery::new("%", None)).await.unwrap();

        assert_eq!(percent.len(), 1);
        assert_eq!(percent[0].title(), "Giving 100% on every shot");
        assert!(underscore.is_empty());
        assert_eq!(everything.len(), 1);
    }

    #[tokio::test]
    async fn duplicate_tag_title_conflicts() {
        let store = InMemoryStore::new();
        TagRepository::save(&store, &Tag::new("books").unwrap()).await.unwrap();

        let err = TagRepository::save(&store, &Tag::new("Books").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn seeded_store_has_demo_data() {
        let store = InMemoryStore::seeded();

        let tags = store.find_all().await.unwrap();
        let page = store.find(&PostQuery::default()).await.unwrap();

        assert_eq!(tags.len(), 2);
        assert_eq!(page.total_items, 2);
        assert_eq!(page.entities.iter().map(Post::comments_count).sum::<usize>(), 2);
    }
}
