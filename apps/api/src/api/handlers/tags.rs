use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::extract::{ApiJson, ApiPath};
use crate::api::middleware::JwtAuth;
use crate::api::state::AppState;
use crate::domain::Tag;

/// Request body for creating a tag
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTagRequest {
    #[validate(length(min = 1, max = 32))]
    pub title: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct TagResponse {
    pub id: Uuid,
    pub title: String,
}

impl From<&Tag> for TagResponse {
    fn from(tag: &Tag) -> Self {
        Self {
            id: tag.id(),
            title: tag.title().to_string(),
        }
    }
}

/// List all tags
///
/// GET /api/tags
pub async fn list_tags(State(state): State<AppState>) -> Result<Json<Vec<TagResponse>>, ApiError> {
    let tags = state.tags.find_all().await?;
    Ok(Json(tags.iter().map(TagResponse::from).collect()))
}

/// Create a tag
///
/// POST /api/tags
pub async fn create_tag(
    State(state): State<AppState>,
    JwtAuth(user_id): JwtAuth,
    ApiJson(req): ApiJson<CreateTagRequest>,
) -> Result<(StatusCode, Json<TagResponse>), ApiError> {
    req.validate()?;

    let tag = Tag::new(&req.title)?;
    state.tags.save(&tag).await?;

    tracing::info!(tag_id = %tag.id(), title = tag.title(), %user_id, "Tag created");

    Ok((StatusCode::CREATED, Json(TagResponse::from(&tag))))
}

/// Get a tag by ID
///
/// GET /api/tags/:id
pub async fn get_tag(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<TagResponse>, ApiError> {
    let tag = state.tags.find_by_id(id).await?;
    Ok(Json(TagResponse::from(&tag)))
}
