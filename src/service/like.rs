//! Like service
//!
//! Likes on posts and on comments, one per (user, target).

use super::toggle::{ToggleOff, ToggleOn, toggle_off, toggle_on};
use crate::data::{LikeStore, LikeTarget};
use crate::error::AppError;

pub struct LikeService {
    likes: LikeStore,
}

fn capitalized(target: LikeTarget) -> &'static str {
    match target {
        LikeTarget::Post => "Post",
        LikeTarget::Comment => "Comment",
    }
}

impl LikeService {
    pub fn new(likes: LikeStore) -> Self {
        Self { likes }
    }

    /// Like a post or comment. Returns a confirmation message.
    ///
    /// # Errors
    /// `Conflict` when the caller already likes the target
    pub async fn like(
        &self,
        caller_id: &str,
        target: LikeTarget,
        target_id: &str,
    ) -> Result<String, AppError> {
        match toggle_on(&self.likes.edges(target), caller_id, target_id).await? {
            ToggleOn::Created => {
                tracing::info!(user_id = caller_id, target = target.as_str(), target_id, "liked");
                Ok(format!("{} liked successfully.", capitalized(target)))
            }
            ToggleOn::AlreadyExists => Err(AppError::conflict(format!(
                "You have already liked this {}.",
                target.as_str()
            ))),
        }
    }

    /// Remove the caller's like.
    ///
    /// # Errors
    /// `NotFound` when the caller does not like the target
    pub async fn unlike(
        &self,
        caller_id: &str,
        target: LikeTarget,
        target_id: &str,
    ) -> Result<String, AppError> {
        match toggle_off(&self.likes.edges(target), caller_id, target_id).await? {
            ToggleOff::Deleted => {
                tracing::info!(user_id = caller_id, target = target.as_str(), target_id, "unliked");
                Ok(format!("{} unliked successfully.", capitalized(target)))
            }
            ToggleOff::NotFound => Err(AppError::not_found(format!(
                "You have not liked this {}.",
                target.as_str()
            ))),
        }
    }

    pub async fn count(&self, target: LikeTarget, target_id: &str) -> Result<i64, AppError> {
        self.likes.count(target, target_id).await
    }
}
