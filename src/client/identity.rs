//! Identity lookups: token resolution and user profiles

use async_trait::async_trait;
use reqwest::StatusCode;

use super::ServiceClient;
use crate::data::UserProfile;
use crate::error::AppError;

/// Turns an opaque token into a caller identity
///
/// Implemented over HTTP for every service except identity itself, which
/// resolves against its own store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    /// Resolve a token to the owning user's id.
    ///
    /// Fails with `Unauthenticated` for an absent, unknown or expired token.
    async fn resolve_token(&self, token: &str) -> Result<String, AppError>;

    /// Fetch the public profile of a user
    async fn get_user(&self, user_id: &str) -> Result<UserProfile, AppError>;
}

pub struct HttpIdentityClient {
    client: ServiceClient,
}

impl HttpIdentityClient {
    pub fn new(client: ServiceClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl IdentityResolver for HttpIdentityClient {
    async fn resolve_token(&self, token: &str) -> Result<String, AppError> {
        if token.is_empty() {
            return Err(AppError::Unauthenticated);
        }

        self.client
            .get::<String>("/api/users/me", Some(token))
            .await
            .map_err(|error| {
                if error.is_rejected_with(StatusCode::UNAUTHORIZED) {
                    AppError::Unauthenticated
                } else {
                    AppError::DownstreamUnavailable(error)
                }
            })
    }

    async fn get_user(&self, user_id: &str) -> Result<UserProfile, AppError> {
        self.client
            .get::<UserProfile>(&format!("/api/users/{}", user_id), None)
            .await
            .map_err(|error| {
                if error.is_rejected_with(StatusCode::NOT_FOUND) {
                    AppError::not_found("User not found.")
                } else {
                    AppError::DownstreamUnavailable(error)
                }
            })
    }
}
