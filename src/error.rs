//! Error types for Murmur
//!
//! All errors in the application are converted to `AppError`,
//! which implements `IntoResponse` so every failure leaves a service
//! as a response envelope with `errors` populated.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::api::WebResponse;
use crate::client::ClientError;

/// Application-wide error type
///
/// The first seven variants are the business taxonomy shared by every
/// service. The rest are infrastructure failures; their details are
/// logged but never sent to the caller.
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing, unknown or expired token (401)
    #[error("Authentication required")]
    Unauthenticated,

    /// Login with an unknown username or wrong password (401)
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Authenticated but not the owner of the resource (403)
    #[error("Access denied")]
    Forbidden,

    /// Resource or edge absent (404)
    #[error("{0}")]
    NotFound(String),

    /// Duplicate registration, like or follow (409)
    #[error("{0}")]
    Conflict(String),

    /// Empty or oversized required field (400)
    #[error("Validation error: {0}")]
    Validation(String),

    /// A required call to another service failed (502)
    #[error("Downstream service unavailable: {0}")]
    DownstreamUnavailable(#[from] ClientError),

    /// Database error (500)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema migration error (500)
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Password hashing error (500)
    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    /// Configuration error (500)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal server error (500)
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl AppError {
    pub fn not_found(message: impl Into<String>) -> Self {
        AppError::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        AppError::Conflict(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation(message.into())
    }

    /// Label used for the error metric and logs
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::Unauthenticated | AppError::InvalidCredentials => "unauthenticated",
            AppError::Forbidden => "forbidden",
            AppError::NotFound(_) => "not_found",
            AppError::Conflict(_) => "conflict",
            AppError::Validation(_) => "validation",
            AppError::DownstreamUnavailable(_) => "downstream_unavailable",
            AppError::Database(_) => "database",
            AppError::Migration(_) => "migration",
            AppError::PasswordHash(_) => "password_hash",
            AppError::Config(_) => "config",
            AppError::Internal(_) => "internal",
        }
    }

    /// HTTP status for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthenticated | AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::DownstreamUnavailable(_) => StatusCode::BAD_GATEWAY,
            AppError::Database(_)
            | AppError::Migration(_)
            | AppError::PasswordHash(_)
            | AppError::Config(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    /// Convert error to HTTP response
    ///
    /// Maps each error variant to its status code and an envelope whose
    /// `errors` field carries a human-readable message.
    fn into_response(self) -> Response {
        use axum::Json;

        let status = self.status_code();
        let error_type = self.error_type();

        let message = match &self {
            AppError::Unauthenticated => "Unauthorized access. Invalid or missing token.".to_string(),
            AppError::InvalidCredentials => "Username or password wrong".to_string(),
            AppError::Forbidden => "You are not allowed to modify this resource.".to_string(),
            AppError::NotFound(msg) | AppError::Conflict(msg) | AppError::Validation(msg) => {
                msg.clone()
            }
            AppError::DownstreamUnavailable(err) => {
                tracing::warn!(error = %err, "downstream call failed");
                "A required service is unavailable. Please try again later.".to_string()
            }
            AppError::Database(_)
            | AppError::Migration(_)
            | AppError::PasswordHash(_)
            | AppError::Config(_)
            | AppError::Internal(_) => {
                tracing::error!(error = %self, error_type, "internal failure");
                "Internal server error".to_string()
            }
        };

        use crate::metrics::ERRORS_TOTAL;
        ERRORS_TOTAL.with_label_values(&[error_type]).inc();

        (status, Json(WebResponse::<()>::error(message))).into_response()
    }
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn business_errors_map_to_distinct_statuses() {
        assert_eq!(AppError::Unauthenticated.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AppError::InvalidCredentials.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(AppError::Forbidden.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            AppError::not_found("Post not found.").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::conflict("already").status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::validation("empty").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::DownstreamUnavailable(ClientError::EmptyPayload {
                service: "comments",
            })
            .status_code(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[tokio::test]
    async fn database_errors_do_not_leak_details() {
        let response = AppError::Database(sqlx::Error::RowNotFound).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["errors"], "Internal server error");
        assert!(json["data"].is_null());
    }
}
