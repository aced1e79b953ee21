use crate::domain::errors::RepositoryError;

/// Wraps an unexpected SQLx error, logging it once at the boundary
pub(crate) fn database_error(context: &str, error: sqlx::Error) -> RepositoryError {
    tracing::error!(error = %error, "{}", context);
    RepositoryError::Database(format!("{}: {}", context, error))
}

pub(crate) fn is_unique_violation(error: &sqlx::Error) -> bool {
    matches!(error, sqlx::Error::Database(db) if db.is_unique_violation())
}

pub(crate) fn is_foreign_key_violation(error: &sqlx::Error) -> bool {
    matches!(error, sqlx::Error::Database(db) if db.is_foreign_key_violation())
}
