//! Comment service endpoints

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{FromRef, Path, State},
    http::StatusCode,
    routing::{delete, get},
};

use super::dto::CreateCommentRequest;
use super::envelope::WebResponse;
use super::extract::JsonBody;
use crate::auth::{Authenticator, CurrentUser};
use crate::data::Comment;
use crate::error::AppError;
use crate::service::CommentService;

#[derive(Clone, FromRef)]
pub struct CommentsState {
    pub service: Arc<CommentService>,
    pub auth: Authenticator,
}

pub fn router(state: CommentsState) -> Router {
    Router::new()
        .route(
            "/posts/:post_id/comments",
            get(list_comments).post(create_comment),
        )
        .route(
            "/posts/:post_id/comments/:comment_id",
            delete(delete_comment),
        )
        .with_state(state)
}

async fn create_comment(
    State(service): State<Arc<CommentService>>,
    CurrentUser(caller_id): CurrentUser,
    Path(post_id): Path<String>,
    JsonBody(req): JsonBody<CreateCommentRequest>,
) -> Result<(StatusCode, Json<WebResponse<Comment>>), AppError> {
    let comment = service
        .create_comment(&caller_id, &post_id, &req.comment)
        .await?;
    Ok((StatusCode::CREATED, Json(WebResponse::ok(comment))))
}

/// Also consumed by the post service when assembling post details
async fn list_comments(
    State(service): State<Arc<CommentService>>,
    Path(post_id): Path<String>,
) -> Result<Json<WebResponse<Vec<Comment>>>, AppError> {
    let comments = service.comments_for_post(&post_id).await?;
    Ok(Json(WebResponse::ok(comments)))
}

async fn delete_comment(
    State(service): State<Arc<CommentService>>,
    CurrentUser(caller_id): CurrentUser,
    Path((post_id, comment_id)): Path<(String, String)>,
) -> Result<Json<WebResponse<String>>, AppError> {
    service
        .delete_comment(&caller_id, &post_id, &comment_id)
        .await?;
    Ok(Json(WebResponse::ok(
        "Comment deleted successfully.".to_string(),
    )))
}
