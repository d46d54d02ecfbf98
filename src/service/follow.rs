//! Follow service
//!
//! Follow lists are stored as user ids and hydrated into profiles through
//! the identity service when read.

use std::sync::Arc;

use super::toggle::{ToggleOff, ToggleOn, toggle_off, toggle_on};
use crate::client::IdentityResolver;
use crate::data::{FollowStore, UserProfile};
use crate::error::AppError;

pub struct FollowService {
    follows: FollowStore,
    identity: Arc<dyn IdentityResolver>,
}

impl FollowService {
    pub fn new(follows: FollowStore, identity: Arc<dyn IdentityResolver>) -> Self {
        Self { follows, identity }
    }

    /// Start following `user_id`
    ///
    /// # Errors
    /// `Validation` when following yourself, `NotFound` when the user does not
    /// exist, `Conflict` when already following
    pub async fn follow(&self, caller_id: &str, user_id: &str) -> Result<String, AppError> {
        if caller_id == user_id {
            return Err(AppError::validation("You cannot follow yourself."));
        }

        // Only edges to existing users are stored, so hydration never meets
        // an unknown id.
        self.identity.get_user(user_id).await?;

        match toggle_on(&self.follows, caller_id, user_id).await? {
            ToggleOn::Created => {
                tracing::info!(follower_id = caller_id, user_id, "followed");
                Ok(format!("You are now following user-{}.", user_id))
            }
            ToggleOn::AlreadyExists => Err(AppError::conflict(
                "You are already following this user.",
            )),
        }
    }

    pub async fn unfollow(&self, caller_id: &str, user_id: &str) -> Result<String, AppError> {
        match toggle_off(&self.follows, caller_id, user_id).await? {
            ToggleOff::Deleted => {
                tracing::info!(follower_id = caller_id, user_id, "unfollowed");
                Ok(format!("You have unfollowed user-{}.", user_id))
            }
            ToggleOff::NotFound => Err(AppError::not_found("You are not following this user.")),
        }
    }

    /// Profiles of the users following `user_id`
    pub async fn followers(&self, user_id: &str) -> Result<Vec<UserProfile>, AppError> {
        let ids = self
            .follows
            .followers_of(user_id)
            .await?
            .into_iter()
            .map(|follow| follow.follower_id);
        self.hydrate(ids).await
    }

    /// Profiles of the users `user_id` follows
    pub async fn following(&self, user_id: &str) -> Result<Vec<UserProfile>, AppError> {
        let ids = self
            .follows
            .following_of(user_id)
            .await?
            .into_iter()
            .map(|follow| follow.user_id);
        self.hydrate(ids).await
    }

    /// Any failed lookup fails the whole list.
    async fn hydrate(
        &self,
        user_ids: impl Iterator<Item = String>,
    ) -> Result<Vec<UserProfile>, AppError> {
        let mut profiles = Vec::new();
        for user_id in user_ids {
            profiles.push(self.identity.get_user(&user_id).await?);
        }
        Ok(profiles)
    }
}
