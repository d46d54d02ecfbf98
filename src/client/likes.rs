//! Like counts used by post detail assembly

use async_trait::async_trait;

use super::ServiceClient;
use crate::error::AppError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LikeSource: Send + Sync {
    async fn post_like_count(&self, post_id: &str) -> Result<i64, AppError>;
}

pub struct HttpLikeClient {
    client: ServiceClient,
}

impl HttpLikeClient {
    pub fn new(client: ServiceClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl LikeSource for HttpLikeClient {
    async fn post_like_count(&self, post_id: &str) -> Result<i64, AppError> {
        Ok(self
            .client
            .get::<i64>(&format!("/api/posts/{}/likes", post_id), None)
            .await?)
    }
}
