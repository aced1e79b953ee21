use std::collections::HashSet;

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::comments::CommentResponse;
use super::tags::TagResponse;
use crate::api::errors::ApiError;
use crate::api::extract::{ApiJson, ApiPath, ApiQuery};
use crate::api::middleware::JwtAuth;
use crate::api::state::AppState;
use crate::domain::query::{DEFAULT_PAGE, DEFAULT_POST_LIMIT};
use crate::domain::{PaginationResult, Post, PostContent, PostQuery, SearchQuery, SortDirection, Tag};

/// Request body for creating a post
///
/// Per-type fields sit next to the common ones, selected by `type`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    #[validate(length(min = 20, max = 50))]
    pub title: String,
    /// Duplicates are collapsed before the tag limit applies
    #[serde(default)]
    pub tags: Vec<Uuid>,
    #[serde(default)]
    pub is_draft: bool,
    #[serde(flatten)]
    pub content: PostContent,
}

/// Request body for editing a post; absent fields stay unchanged
#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePostRequest {
    #[validate(length(min = 20, max = 50))]
    pub title: Option<String>,
    pub tags: Option<Vec<Uuid>>,
}

/// Feed query string: `?page=2&limit=10&tags=<id>,<id>&sortDirection=asc`
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ListPostsParams {
    #[validate(range(min = 1))]
    pub page: Option<u32>,
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<u32>,
    /// Comma-separated tag ids
    pub tags: Option<String>,
    pub sort_direction: Option<SortDirection>,
}

impl ListPostsParams {
    pub fn into_query(self) -> Result<PostQuery, ApiError> {
        self.validate()?;

        let tags = match self.tags.as_deref() {
            None => Vec::new(),
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| {
                    Uuid::parse_str(s)
                        .map_err(|_| ApiError::bad_request(format!("Invalid tag id: {}", s)))
                })
                .collect::<Result<Vec<_>, _>>()?,
        };

        Ok(PostQuery {
            page: self.page.unwrap_or(DEFAULT_PAGE),
            limit: self.limit.unwrap_or(DEFAULT_POST_LIMIT),
            tags,
            sort_direction: self.sort_direction.unwrap_or_default(),
        })
    }
}

/// Search query string: `?title=rust&limit=5`
#[derive(Debug, Deserialize, Validate)]
pub struct SearchParams {
    #[validate(length(min = 1, max = 50))]
    pub title: String,
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: Uuid,
    pub original_id: Uuid,
    pub is_repost: bool,
    pub is_draft: bool,
    pub title: String,
    #[serde(flatten)]
    pub content: PostContent,
    pub likes_count: i32,
    pub comments_count: usize,
    pub tags: Vec<TagResponse>,
    pub comments: Vec<CommentResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub original_author: Uuid,
    pub user_id: Uuid,
}

impl From<&Post> for PostResponse {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id(),
            original_id: post.original_id(),
            is_repost: post.is_repost(),
            is_draft: post.is_draft(),
            title: post.title().to_string(),
            content: post.content().clone(),
            likes_count: post.likes_count(),
            comments_count: post.comments_count(),
            tags: post.tags().iter().map(TagResponse::from).collect(),
            comments: post.comments().iter().map(CommentResponse::from).collect(),
            created_at: post.created_at(),
            updated_at: post.updated_at(),
            original_author: post.original_author(),
            user_id: post.user_id(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostPageResponse {
    pub entities: Vec<PostResponse>,
    pub current_page: u32,
    pub total_pages: u64,
    pub items_per_page: u32,
    pub total_items: u64,
}

impl From<PaginationResult<Post>> for PostPageResponse {
    fn from(page: PaginationResult<Post>) -> Self {
        let page = page.map(|post| PostResponse::from(&post));
        Self {
            entities: page.entities,
            current_page: page.current_page,
            total_pages: page.total_pages,
            items_per_page: page.items_per_page,
            total_items: page.total_items,
        }
    }
}

/// Loads the tags for a create/update request, rejecting unknown ids
async fn resolve_tags(state: &AppState, ids: &[Uuid]) -> Result<Vec<Tag>, ApiError> {
    let requested: HashSet<Uuid> = ids.iter().copied().collect();
    if requested.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<Uuid> = requested.iter().copied().collect();
    let tags = state.tags.find_by_ids(&ids).await?;

    if tags.len() != requested.len() {
        let mut unknown: Vec<String> = requested
            .iter()
            .filter(|id| !tags.iter().any(|t| t.id() == **id))
            .map(Uuid::to_string)
            .collect();
        unknown.sort();
        return Err(ApiError::bad_request(format!(
            "Unknown tag id(s): {}",
            unknown.join(", ")
        )));
    }

    Ok(tags)
}

/// Loads a post and checks that `user_id` wrote it
async fn find_own_post(state: &AppState, id: Uuid, user_id: Uuid) -> Result<Post, ApiError> {
    let post = state.posts.find_by_id(id).await?;
    if !post.is_authored_by(user_id) {
        tracing::warn!(post_id = %id, %user_id, "Rejected change to another user's post");
        return Err(ApiError::forbidden("You can only modify your own posts"));
    }
    Ok(post)
}

/// List posts, one page at a time
///
/// GET /api/posts
pub async fn list_posts(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<ListPostsParams>,
) -> Result<Json<PostPageResponse>, ApiError> {
    let query = params.into_query()?;
    let page = state.posts.find(&query).await?;

    Ok(Json(PostPageResponse::from(page)))
}

/// Search posts by a substring of their title
///
/// GET /api/posts/search
pub async fn search_posts(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<SearchParams>,
) -> Result<Json<Vec<PostResponse>>, ApiError> {
    params.validate()?;

    let posts = state
        .posts
        .search(&SearchQuery::new(params.title, params.limit))
        .await?;

    Ok(Json(posts.iter().map(PostResponse::from).collect()))
}

/// Create a new post
///
/// POST /api/posts
pub async fn create_post(
    State(state): State<AppState>,
    JwtAuth(user_id): JwtAuth,
    ApiJson(req): ApiJson<CreatePostRequest>,
) -> Result<(StatusCode, Json<PostResponse>), ApiError> {
    req.validate()?;

    let tags = resolve_tags(&state, &req.tags).await?;
    let post = Post::new(user_id, req.title, req.content, tags, req.is_draft)?;
    state.posts.save(&post).await?;

    tracing::info!(post_id = %post.id(), %user_id, post_type = %post.post_type(), "Post created");

    Ok((StatusCode::CREATED, Json(PostResponse::from(&post))))
}

/// Get a post by ID
///
/// GET /api/posts/:id
pub async fn get_post(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<PostResponse>, ApiError> {
    let post = state.posts.find_by_id(id).await?;
    Ok(Json(PostResponse::from(&post)))
}

/// Change the title and/or tags of one's own post
///
/// PATCH /api/posts/:id
pub async fn update_post(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    JwtAuth(user_id): JwtAuth,
    ApiJson(req): ApiJson<UpdatePostRequest>,
) -> Result<Json<PostResponse>, ApiError> {
    req.validate()?;

    let mut post = find_own_post(&state, id, user_id).await?;

    let tags = match req.tags.as_deref() {
        Some(ids) => Some(resolve_tags(&state, ids).await?),
        None => None,
    };
    post.update(req.title, tags)?;
    state.posts.update(&post).await?;

    tracing::info!(post_id = %id, %user_id, "Post updated");

    Ok(Json(PostResponse::from(&post)))
}

/// Delete one's own post together with its comments
///
/// DELETE /api/posts/:id
pub async fn delete_post(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    JwtAuth(user_id): JwtAuth,
) -> Result<StatusCode, ApiError> {
    find_own_post(&state, id, user_id).await?;
    state.posts.delete_by_id(id).await?;

    tracing::info!(post_id = %id, %user_id, "Post deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// Repost someone else's post
///
/// POST /api/posts/:id/repost
pub async fn repost(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    JwtAuth(user_id): JwtAuth,
) -> Result<(StatusCode, Json<PostResponse>), ApiError> {
    let source = state.posts.find_by_id(id).await?;
    let post = source.repost(user_id)?;
    state.posts.save(&post).await?;

    tracing::info!(post_id = %post.id(), original_id = %post.original_id(), %user_id, "Post reposted");

    Ok((StatusCode::CREATED, Json(PostResponse::from(&post))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_params_defaults() {
        let query = ListPostsParams::default().into_query().unwrap();
        assert_eq!(query, PostQuery::default());
    }

    #[test]
    fn list_params_parse_tags() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let params = ListPostsParams {
            tags: Some(format!("{}, {},", a, b)),
            sort_direction: Some(SortDirection::Asc),
            ..Default::default()
        };

        let query = params.into_query().unwrap();
        assert_eq!(query.tags, vec![a, b]);
        assert_eq!(query.sort_direction, SortDirection::Asc);
    }

    #[test]
    fn list_params_reject_bad_tag() {
        let params = ListPostsParams {
            tags: Some("not-a-uuid".to_string()),
            ..Default::default()
        };
        let err = params.into_query().unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn list_params_reject_out_of_range_limit() {
        let params = ListPostsParams {
            limit: Some(101),
            ..Default::default()
        };
        assert!(params.into_query().is_err());

        let params = ListPostsParams {
            page: Some(0),
            ..Default::default()
        };
        assert!(params.into_query().is_err());
    }

    #[test]
    fn create_request_reads_flattened_content() {
        let req: CreatePostRequest = serde_json::from_value(serde_json::json!({
            "type": "link",
            "title": "A link worth sharing today",
            "linkUrl": "https://doc.rust-lang.org/book/",
            "isDraft": true
        }))
        .unwrap();

        assert!(req.is_draft);
        assert!(req.tags.is_empty());
        assert_eq!(
            req.content,
            PostContent::Link {
                link_url: "https://doc.rust-lang.org/book/".to_string(),
                description: None,
            }
        );
    }
}
