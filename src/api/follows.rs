//! Follow service endpoints

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{FromRef, Path, State},
    routing::{get, post},
};

use super::envelope::WebResponse;
use crate::auth::{Authenticator, CurrentUser};
use crate::data::UserProfile;
use crate::error::AppError;
use crate::service::FollowService;

#[derive(Clone, FromRef)]
pub struct FollowsState {
    pub service: Arc<FollowService>,
    pub auth: Authenticator,
}

pub fn router(state: FollowsState) -> Router {
    Router::new()
        .route("/users/:id/follow", post(follow).delete(unfollow))
        .route("/users/:id/followers", get(followers))
        .route("/users/:id/following", get(following))
        .with_state(state)
}

async fn follow(
    State(service): State<Arc<FollowService>>,
    CurrentUser(caller_id): CurrentUser,
    Path(user_id): Path<String>,
) -> Result<Json<WebResponse<String>>, AppError> {
    let message = service.follow(&caller_id, &user_id).await?;
    Ok(Json(WebResponse::ok(message)))
}

async fn unfollow(
    State(service): State<Arc<FollowService>>,
    CurrentUser(caller_id): CurrentUser,
    Path(user_id): Path<String>,
) -> Result<Json<WebResponse<String>>, AppError> {
    let message = service.unfollow(&caller_id, &user_id).await?;
    Ok(Json(WebResponse::ok(message)))
}

async fn followers(
    State(service): State<Arc<FollowService>>,
    Path(user_id): Path<String>,
) -> Result<Json<WebResponse<Vec<UserProfile>>>, AppError> {
    let profiles = service.followers(&user_id).await?;
    Ok(Json(WebResponse::ok(profiles)))
}

async fn following(
    State(service): State<Arc<FollowService>>,
    Path(user_id): Path<String>,
) -> Result<Json<WebResponse<Vec<UserProfile>>>, AppError> {
    let profiles = service.following(&user_id).await?;
    Ok(Json(WebResponse::ok(profiles)))
}
