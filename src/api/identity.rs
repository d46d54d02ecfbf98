//! Identity service endpoints
//!
//! Users, login/logout and token resolution (`GET /users/me`).

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{FromRef, Path, State},
    routing::{delete, get, post},
};

use super::dto::{LoginRequest, RegisterUserRequest, TokenResponse, UpdateUserRequest};
use super::envelope::WebResponse;
use super::extract::JsonBody;
use crate::auth::{Authenticator, CurrentUser, RequestToken};
use crate::data::UserProfile;
use crate::error::AppError;
use crate::service::{IdentityService, LogoutOutcome, ProfileInput};

#[derive(Clone, FromRef)]
pub struct IdentityState {
    pub service: Arc<IdentityService>,
    pub auth: Authenticator,
}

impl IdentityState {
    /// Handlers authenticate against the same service they call.
    pub fn new(service: Arc<IdentityService>, token_header: &str) -> Result<Self, AppError> {
        let auth = Authenticator::new(service.clone(), token_header)?;
        Ok(Self { service, auth })
    }
}

pub fn router(state: IdentityState) -> Router {
    Router::new()
        .route("/users", post(register))
        .route("/users/me", get(current_user_id))
        .route("/users/:id", get(get_user).put(update_user))
        .route("/auth/login", post(login))
        .route("/auth/logout", delete(logout))
        .with_state(state)
}

async fn register(
    State(service): State<Arc<IdentityService>>,
    JsonBody(req): JsonBody<RegisterUserRequest>,
) -> Result<Json<WebResponse<String>>, AppError> {
    service
        .register(
            &req.username,
            ProfileInput {
                email: &req.email,
                password: &req.password,
                name: &req.name,
                bio: req.bio.as_deref(),
            },
        )
        .await?;

    Ok(Json(WebResponse::ok("OK".to_string())))
}

/// Token resolution endpoint used by every other service
async fn current_user_id(CurrentUser(user_id): CurrentUser) -> Json<WebResponse<String>> {
    Json(WebResponse::ok(user_id))
}

async fn get_user(
    State(service): State<Arc<IdentityService>>,
    Path(id): Path<String>,
) -> Result<Json<WebResponse<UserProfile>>, AppError> {
    let profile = service.get_user(&id).await?;
    Ok(Json(WebResponse::ok(profile)))
}

async fn update_user(
    State(service): State<Arc<IdentityService>>,
    CurrentUser(caller_id): CurrentUser,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<UpdateUserRequest>,
) -> Result<Json<WebResponse<UserProfile>>, AppError> {
    let profile = service
        .update_profile(
            &caller_id,
            &id,
            ProfileInput {
                email: &req.email,
                password: &req.password,
                name: &req.name,
                bio: req.bio.as_deref(),
            },
        )
        .await?;

    Ok(Json(WebResponse::ok(profile)))
}

async fn login(
    State(service): State<Arc<IdentityService>>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> Result<Json<WebResponse<TokenResponse>>, AppError> {
    let grant = service.login(&req.username, &req.password).await?;
    Ok(Json(WebResponse::ok(TokenResponse {
        token: grant.token,
        expired_at: grant.expired_at,
    })))
}

async fn logout(
    State(service): State<Arc<IdentityService>>,
    RequestToken(token): RequestToken,
) -> Result<Json<WebResponse<String>>, AppError> {
    let response = match service.logout(token.as_deref()).await? {
        LogoutOutcome::LoggedOut => WebResponse::ok("OK".to_string()),
        LogoutOutcome::NoActiveToken => WebResponse::ok_with_message(
            "OK".to_string(),
            "No active session for this token; nothing to log out.",
        ),
    };
    Ok(Json(response))
}
