use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use validator::ValidationErrors;

use crate::domain::errors::{DomainError, RepositoryError};

/// API error type with HTTP status code and message
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    /// Creates a new API error
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Creates a 400 Bad Request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Creates a 401 Unauthorized error
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    /// Creates a 403 Forbidden error
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    /// Creates a 404 Not Found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// Creates a 409 Conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    /// Creates a 500 Internal Server Error
    pub fn internal_server_error(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { .. } => Self::not_found(err.to_string()),
            RepositoryError::Conflict(message) => Self::conflict(message),
            RepositoryError::InvalidReference(message) => Self::bad_request(message),
            // Details were logged where the error was raised
            RepositoryError::Database(_) => Self::internal_server_error("Internal server error"),
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self::bad_request(err.to_string())
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields: Vec<String> = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| {
                let codes: Vec<&str> = errs.iter().map(|e| e.code.as_ref()).collect();
                format!("{} ({})", field, codes.join(", "))
            })
            .collect();
        fields.sort();

        Self::bad_request(format!("Validation failed: {}", fields.join("; ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;
    use validator::Validate;

    #[derive(Validate)]
    struct Probe {
        #[validate(length(min = 3))]
        name: String,
    }

    #[test]
    fn not_found_maps_to_404() {
        let err: ApiError = RepositoryError::not_found("Post", Uuid::nil()).into();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(
            err.message,
            "Post with id 00000000-0000-0000-0000-000000000000 not found."
        );
    }

    #[test]
    fn conflict_maps_to_409() {
        let err: ApiError = RepositoryError::Conflict("taken".to_string()).into();
        assert_eq!(err.status, StatusCode::CONFLICT);
    }

    #[test]
    fn database_error_hides_details() {
        let err: ApiError = RepositoryError::Database("connection refused".to_string()).into();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.message.contains("connection refused"));
    }

    #[test]
    fn domain_error_maps_to_400() {
        let err: ApiError = DomainError::TooManyTags { max: 8 }.into();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "A post can have at most 8 tags");
    }

    #[test]
    fn validation_errors_name_fields() {
        let probe = Probe {
            name: "ab".to_string(),
        };
        let err: ApiError = probe.validate().unwrap_err().into();

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "Validation failed: name (length)");
    }
}
