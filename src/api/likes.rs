//! Like service endpoints

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{FromRef, Path, State},
    routing::{get, post},
};

use super::envelope::WebResponse;
use crate::auth::{Authenticator, CurrentUser};
use crate::data::LikeTarget;
use crate::error::AppError;
use crate::service::LikeService;

#[derive(Clone, FromRef)]
pub struct LikesState {
    pub service: Arc<LikeService>,
    pub auth: Authenticator,
}

pub fn router(state: LikesState) -> Router {
    Router::new()
        .route("/posts/:id/like", post(like_post).delete(unlike_post))
        .route("/posts/:id/likes", get(post_likes))
        .route(
            "/comments/:id/like",
            post(like_comment).delete(unlike_comment),
        )
        .route("/comments/:id/likes", get(comment_likes))
        .with_state(state)
}

async fn like_post(
    State(service): State<Arc<LikeService>>,
    CurrentUser(caller_id): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<WebResponse<String>>, AppError> {
    let message = service.like(&caller_id, LikeTarget::Post, &id).await?;
    Ok(Json(WebResponse::ok(message)))
}

async fn unlike_post(
    State(service): State<Arc<LikeService>>,
    CurrentUser(caller_id): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<WebResponse<String>>, AppError> {
    let message = service.unlike(&caller_id, LikeTarget::Post, &id).await?;
    Ok(Json(WebResponse::ok(message)))
}

/// Also consumed by the post service when assembling post details
async fn post_likes(
    State(service): State<Arc<LikeService>>,
    Path(id): Path<String>,
) -> Result<Json<WebResponse<i64>>, AppError> {
    let count = service.count(LikeTarget::Post, &id).await?;
    Ok(Json(WebResponse::ok(count)))
}

async fn like_comment(
    State(service): State<Arc<LikeService>>,
    CurrentUser(caller_id): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<WebResponse<String>>, AppError> {
    let message = service.like(&caller_id, LikeTarget::Comment, &id).await?;
    Ok(Json(WebResponse::ok(message)))
}

async fn unlike_comment(
    State(service): State<Arc<LikeService>>,
    CurrentUser(caller_id): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<WebResponse<String>>, AppError> {
    let message = service
        .unlike(&caller_id, LikeTarget::Comment, &id)
        .await?;
    Ok(Json(WebResponse::ok(message)))
}

async fn comment_likes(
    State(service): State<Arc<LikeService>>,
    Path(id): Path<String>,
) -> Result<Json<WebResponse<i64>>, AppError> {
    let count = service.count(LikeTarget::Comment, &id).await?;
    Ok(Json(WebResponse::ok(count)))
}
