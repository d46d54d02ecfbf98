//! Comment service

use chrono::Utc;

use super::ownership::authorize_mutation;
use crate::data::{Comment, CommentStore, EntityId};
use crate::error::AppError;

pub struct CommentService {
    comments: CommentStore,
}

impl CommentService {
    pub fn new(comments: CommentStore) -> Self {
        Self { comments }
    }

    pub async fn create_comment(
        &self,
        caller_id: &str,
        post_id: &str,
        text: &str,
    ) -> Result<Comment, AppError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AppError::validation("Comment cannot be empty."));
        }

        let comment = Comment {
            id: EntityId::new().0,
            user_id: caller_id.to_string(),
            post_id: post_id.to_string(),
            comment: text.to_string(),
            created_at: Utc::now(),
        };
        self.comments.insert(&comment).await?;

        tracing::info!(comment_id = %comment.id, post_id, user_id = caller_id, "comment created");
        Ok(comment)
    }

    /// Comments on a post, oldest first. No comments is an empty list.
    pub async fn comments_for_post(&self, post_id: &str) -> Result<Vec<Comment>, AppError> {
        self.comments.list_by_post(post_id).await
    }

    /// Delete a comment owned by the caller.
    ///
    /// A comment that belongs to a different post than `post_id` is
    /// treated as missing.
    pub async fn delete_comment(
        &self,
        caller_id: &str,
        post_id: &str,
        comment_id: &str,
    ) -> Result<(), AppError> {
        let comment = self
            .comments
            .find_by_id(comment_id)
            .await?
            .filter(|comment| comment.post_id == post_id)
            .ok_or_else(|| AppError::not_found("Comment not found."))?;
        authorize_mutation(caller_id, &comment.user_id).into_result()?;

        if self.comments.delete(&comment.id).await? == 0 {
            return Err(AppError::not_found("Comment not found."));
        }

        tracing::info!(comment_id, post_id, user_id = caller_id, "comment deleted");
        Ok(())
    }
}
