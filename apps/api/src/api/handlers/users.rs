use axum::{
    extract::State,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::extract::ApiPath;
use crate::api::state::AppState;
use crate::domain::User;

/// Public profile of a user
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub avatar: Option<String>,
    pub email: String,
    pub name: String,
    pub date_register: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            avatar: user.avatar.clone(),
            email: user.email.to_string(),
            name: user.name.clone(),
            date_register: user.created_at,
        }
    }
}

/// Get a user's profile
///
/// GET /api/users/:id
pub async fn get_user(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state.users.find_by_id(id).await?;
    Ok(Json(UserResponse::from(&user)))
}
