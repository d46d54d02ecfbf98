//! Post service

use chrono::Utc;

use super::aggregator::PostDetailAggregator;
use super::ownership::authorize_mutation;
use crate::data::{EntityId, Post, PostDetail, PostStore};
use crate::error::AppError;

pub struct PostService {
    posts: PostStore,
    aggregator: PostDetailAggregator,
}

impl PostService {
    pub fn new(posts: PostStore, aggregator: PostDetailAggregator) -> Self {
        Self { posts, aggregator }
    }

    pub async fn create_post(&self, caller_id: &str, content: &str) -> Result<Post, AppError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(AppError::validation("Content cannot be empty."));
        }

        let post = Post {
            id: EntityId::new().0,
            user_id: caller_id.to_string(),
            content: content.to_string(),
            created_at: Utc::now(),
        };
        self.posts.insert(&post).await?;

        tracing::info!(post_id = %post.id, user_id = caller_id, "post created");
        Ok(post)
    }

    /// Delete a post owned by the caller
    pub async fn delete_post(&self, caller_id: &str, post_id: &str) -> Result<(), AppError> {
        let post = self
            .posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| AppError::not_found("Post not found."))?;
        authorize_mutation(caller_id, &post.user_id).into_result()?;

        if self.posts.delete(&post.id).await? == 0 {
            return Err(AppError::not_found("Post not found."));
        }

        tracing::info!(post_id, user_id = caller_id, "post deleted");
        Ok(())
    }

    pub async fn get_post_detail(&self, post_id: &str) -> Result<PostDetail, AppError> {
        self.aggregator.assemble(post_id).await
    }

    /// Posts by one user, newest first; an empty list is a valid answer
    pub async fn user_posts(&self, user_id: &str) -> Result<Vec<Post>, AppError> {
        self.posts.list_by_user(user_id).await
    }
}
