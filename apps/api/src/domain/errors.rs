use thiserror::Error;
use uuid::Uuid;

/// Violations of entity invariants
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("{field} must be between {min} and {max} characters")]
    InvalidLength {
        field: &'static str,
        min: usize,
        max: usize,
    },

    #[error("{field} must be a valid URL")]
    InvalidUrl { field: &'static str },

    #[error("A post can have at most {max} tags")]
    TooManyTags { max: usize },

    #[error("{0}")]
    Invalid(String),
}

impl DomainError {
    /// Checks that `value` is within `min..=max` characters
    pub(crate) fn check_length(
        field: &'static str,
        value: &str,
        min: usize,
        max: usize,
    ) -> Result<(), DomainError> {
        let len = value.chars().count();
        if len < min || len > max {
            return Err(DomainError::InvalidLength { field, min, max });
        }
        Ok(())
    }
}

/// Errors returned by repository implementations
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("{entity} with id {id} not found.")]
    NotFound { entity: &'static str, id: Uuid },

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    InvalidReference(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl RepositoryError {
    pub fn not_found(entity: &'static str, id: Uuid) -> Self {
        Self::NotFound { entity, id }
    }
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;
