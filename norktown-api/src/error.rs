/// Error handling for the web server
///
/// This module provides a unified error type that maps to HTTP responses.
/// Handlers return `Result<T, AppError>`, which converts into a small
/// server-rendered error page with the appropriate status code.
///
/// # Example
///
/// ```
/// use norktown_api::error::{AppError, AppResult};
/// use axum::response::Html;
///
/// async fn handler() -> AppResult<Html<String>> {
///     Err(AppError::NotFound("No such person".to_string()))
/// }
/// ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use norktown_shared::auth::password::PasswordError;

use crate::pages;

/// Handler result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Unified application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Bad request (400)
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Forbidden (403) - admin-only routes
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Not found (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Conflict (409) - e.g., duplicate email
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Internal server error (500)
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::InternalError(msg) => {
                // Log internal errors but don't expose details to clients
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        (status, pages::error_page(status, &message)).into_response()
    }
}

/// Convert sqlx errors to application errors
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::NotFound("Resource not found".to_string()),
            sqlx::Error::Database(db_err) => {
                // SQLite reports unique violations through the error message
                let msg = db_err.message().to_string();
                if msg.contains("UNIQUE constraint failed") {
                    if msg.contains("person.email") {
                        return AppError::Conflict("Email already exists".to_string());
                    }
                    return AppError::Conflict(format!("Constraint violation: {}", msg));
                }

                AppError::InternalError(format!("Database error: {}", msg))
            }
            _ => AppError::InternalError(format!("Database error: {}", err)),
        }
    }
}

/// Convert password hashing errors to application errors
impl From<PasswordError> for AppError {
    fn from(err: PasswordError) -> Self {
        AppError::InternalError(format!("Password operation failed: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AppError::BadRequest("Invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: Invalid input");

        let err = AppError::NotFound("Person not found".to_string());
        assert_eq!(err.to_string(), "Not found: Person not found");
    }

    #[test]
    fn test_row_not_found_maps_to_404() {
        let err: AppError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
