//! Request authentication
//!
//! Every service resolves the caller's token through an
//! [`IdentityResolver`] on each request; nothing is cached.

use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{HeaderMap, HeaderName, request::Parts},
};

use crate::client::IdentityResolver;
use crate::error::AppError;

/// Token extraction and resolution shared by a service's handlers
#[derive(Clone)]
pub struct Authenticator {
    resolver: Arc<dyn IdentityResolver>,
    token_header: HeaderName,
}

impl Authenticator {
    /// # Errors
    /// Returns a config error if `token_header` is not a valid header name
    pub fn new(resolver: Arc<dyn IdentityResolver>, token_header: &str) -> Result<Self, AppError> {
        let token_header = HeaderName::from_bytes(token_header.trim().as_bytes()).map_err(|e| {
            AppError::Config(format!("invalid auth.token_header {:?}: {}", token_header, e))
        })?;

        Ok(Self {
            resolver,
            token_header,
        })
    }

    /// Read the token from the configured header, falling back to
    /// `Authorization: Bearer`
    pub fn token_from_headers(&self, headers: &HeaderMap) -> Option<String> {
        headers
            .get(&self.token_header)
            .and_then(|h| h.to_str().ok())
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(ToOwned::to_owned)
            .or_else(|| {
                headers
                    .get(axum::http::header::AUTHORIZATION)
                    .and_then(|h| h.to_str().ok())
                    .and_then(|h| h.split_once(' '))
                    .filter(|(scheme, _)| scheme.eq_ignore_ascii_case("bearer"))
                    .map(|(_, token)| token.trim())
                    .filter(|token| !token.is_empty())
                    .map(ToOwned::to_owned)
            })
    }

    /// Resolve the request's token to a user id
    pub async fn authenticate(&self, headers: &HeaderMap) -> Result<String, AppError> {
        let token = self
            .token_from_headers(headers)
            .ok_or(AppError::Unauthenticated)?;
        self.resolver.resolve_token(&token).await
    }
}

/// Extractor for the authenticated caller's user id
///
/// # Usage
/// ```ignore
/// async fn handler(CurrentUser(user_id): CurrentUser) -> impl IntoResponse {
///     format!("Hello, {}", user_id)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentUser(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    Authenticator: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<CurrentUser>().cloned() {
            return Ok(user);
        }

        let authenticator = Authenticator::from_ref(state);
        let user_id = authenticator.authenticate(&parts.headers).await?;
        let user = CurrentUser(user_id);
        parts.extensions.insert(user.clone());

        Ok(user)
    }
}

/// Raw token of the request, if any, without resolving it
#[derive(Debug, Clone)]
pub struct RequestToken(pub Option<String>);

#[async_trait]
impl<S> FromRequestParts<S> for RequestToken
where
    Authenticator: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let authenticator = Authenticator::from_ref(state);
        Ok(RequestToken(authenticator.token_from_headers(&parts.headers)))
    }
}
