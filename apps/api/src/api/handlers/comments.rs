use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::extract::{ApiJson, ApiPath};
use crate::api::middleware::JwtAuth;
use crate::api::state::AppState;
use crate::domain::Comment;

/// Request body for commenting on a post
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCommentRequest {
    #[validate(length(min = 10, max = 300))]
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: Uuid,
    pub post_id: Uuid,
    pub message: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<&Comment> for CommentResponse {
    fn from(comment: &Comment) -> Self {
        Self {
            id: comment.id(),
            post_id: comment.post_id(),
            message: comment.message().to_string(),
            user_id: comment.user_id(),
            created_at: comment.created_at(),
        }
    }
}

/// List the comments of a post, oldest first
///
/// GET /api/posts/:id/comments
pub async fn list_comments(
    State(state): State<AppState>,
    ApiPath(post_id): ApiPath<Uuid>,
) -> Result<Json<Vec<CommentResponse>>, ApiError> {
    // 404 for a missing post rather than an empty list
    state.posts.find_by_id(post_id).await?;

    let comments = state.comments.find_by_post(post_id).await?;
    Ok(Json(comments.iter().map(CommentResponse::from).collect()))
}

/// Comment on a post
///
/// POST /api/posts/:id/comments
pub async fn create_comment(
    State(state): State<AppState>,
    ApiPath(post_id): ApiPath<Uuid>,
    JwtAuth(user_id): JwtAuth,
    ApiJson(req): ApiJson<CreateCommentRequest>,
) -> Result<(StatusCode, Json<CommentResponse>), ApiError> {
    req.validate()?;

    state.posts.find_by_id(post_id).await?;

    let comment = Comment::new(post_id, user_id, req.message)?;
    state.comments.save(&comment).await?;

    tracing::info!(comment_id = %comment.id(), %post_id, %user_id, "Comment created");

    Ok((StatusCode::CREATED, Json(CommentResponse::from(&comment))))
}

/// Delete one's own comment
///
/// DELETE /api/posts/:id/comments/:comment_id
pub async fn delete_comment(
    State(state): State<AppState>,
    ApiPath((post_id, comment_id)): ApiPath<(Uuid, Uuid)>,
    JwtAuth(user_id): JwtAuth,
) -> Result<StatusCode, ApiError> {
    let comment = state.comments.find_by_id(comment_id).await?;

    if comment.post_id() != post_id {
        return Err(ApiError::not_found(format!(
            "Comment with id {} not found.",
            comment_id
        )));
    }
    if !comment.is_authored_by(user_id) {
        return Err(ApiError::forbidden("You can only delete your own comments"));
    }

    state.comments.delete_by_id(comment_id).await?;

    tracing::info!(%comment_id, %post_id, %user_id, "Comment deleted");

    Ok(StatusCode::NO_CONTENT)
}
