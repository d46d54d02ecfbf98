//! Post service endpoints

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{FromRef, Path, State},
    http::StatusCode,
    routing::{get, post},
};

use super::dto::CreatePostRequest;
use super::envelope::WebResponse;
use super::extract::JsonBody;
use crate::auth::{Authenticator, CurrentUser};
use crate::data::{Post, PostDetail};
use crate::error::AppError;
use crate::service::PostService;

#[derive(Clone, FromRef)]
pub struct PostsState {
    pub service: Arc<PostService>,
    pub auth: Authenticator,
}

pub fn router(state: PostsState) -> Router {
    Router::new()
        .route("/posts", post(create_post))
        .route("/posts/:id", get(get_post_detail).delete(delete_post))
        .route("/users/:id/posts", get(user_posts))
        .with_state(state)
}

async fn create_post(
    State(service): State<Arc<PostService>>,
    CurrentUser(caller_id): CurrentUser,
    JsonBody(req): JsonBody<CreatePostRequest>,
) -> Result<(StatusCode, Json<WebResponse<Post>>), AppError> {
    let post = service.create_post(&caller_id, &req.content).await?;
    Ok((StatusCode::CREATED, Json(WebResponse::ok(post))))
}

/// Post with its comments and like count, fetched from the other services
async fn get_post_detail(
    State(service): State<Arc<PostService>>,
    Path(id): Path<String>,
) -> Result<Json<WebResponse<PostDetail>>, AppError> {
    let detail = service.get_post_detail(&id).await?;
    Ok(Json(WebResponse::ok(detail)))
}

async fn delete_post(
    State(service): State<Arc<PostService>>,
    CurrentUser(caller_id): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<WebResponse<String>>, AppError> {
    service.delete_post(&caller_id, &id).await?;
    Ok(Json(WebResponse::ok("Post deleted successfully.".to_string())))
}

async fn user_posts(
    State(service): State<Arc<PostService>>,
    Path(user_id): Path<String>,
) -> Result<Json<WebResponse<Vec<Post>>>, AppError> {
    let posts = service.user_posts(&user_id).await?;
    Ok(Json(WebResponse::ok(posts)))
}
