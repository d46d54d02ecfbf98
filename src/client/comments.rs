//! Comment lookups used by post detail assembly

use async_trait::async_trait;

use super::ServiceClient;
use crate::data::Comment;
use crate::error::AppError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentSource: Send + Sync {
    /// All comments on a post, oldest first. An empty list is a valid answer.
    async fn comments_for_post(&self, post_id: &str) -> Result<Vec<Comment>, AppError>;
}

pub struct HttpCommentClient {
    client: ServiceClient,
}

impl HttpCommentClient {
    pub fn new(client: ServiceClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CommentSource for HttpCommentClient {
    async fn comments_for_post(&self, post_id: &str) -> Result<Vec<Comment>, AppError> {
        Ok(self
            .client
            .get::<Vec<Comment>>(&format!("/api/posts/{}/comments", post_id), None)
            .await?)
    }
}
