//! Identity service
//!
//! Owns users and their tokens. Everything else in the system learns who
//! a caller is by asking this service to resolve a token.

use async_trait::async_trait;
use chrono::Utc;

use super::ownership::authorize_mutation;
use super::validate;
use crate::auth::token;
use crate::client::IdentityResolver;
use crate::data::{EntityId, User, UserProfile, UserStore};
use crate::error::AppError;

const MAX_FIELD_CHARS: usize = 255;
const MAX_BIO_CHARS: usize = 500;

/// Registration or profile fields as submitted
#[derive(Debug, Clone)]
pub struct ProfileInput<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub name: &'a str,
    pub bio: Option<&'a str>,
}

/// Token handed out on login
#[derive(Debug, Clone)]
pub struct TokenGrant {
    pub token: String,
    pub expired_at: chrono::DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoutOutcome {
    LoggedOut,
    /// No active token matched; nothing was cleared
    NoActiveToken,
}

pub struct IdentityService {
    users: UserStore,
    token_ttl_days: i64,
}

impl IdentityService {
    pub fn new(users: UserStore, token_ttl_days: i64) -> Self {
        Self {
            users,
            token_ttl_days,
        }
    }

    /// Register a new user
    ///
    /// # Errors
    /// `Validation` for blank or oversized fields, `Conflict` when the
    /// username or email is taken
    pub async fn register(
        &self,
        username: &str,
        input: ProfileInput<'_>,
    ) -> Result<UserProfile, AppError> {
        let username = validate::required("Username", username, MAX_FIELD_CHARS)?;
        let email = validate::required("Email", input.email, MAX_FIELD_CHARS)?;
        validate::required("Password", input.password, MAX_FIELD_CHARS)?;
        let password = input.password.to_string();
        let name = validate::required("Name", input.name, MAX_FIELD_CHARS)?;
        let bio = validate::optional("Bio", input.bio, MAX_BIO_CHARS)?;

        if self.users.username_taken(&username).await? {
            tracing::warn!(%username, "registration rejected: username taken");
            return Err(AppError::conflict("Username already registered"));
        }
        if self.users.email_taken(&email, None).await? {
            tracing::warn!(%username, "registration rejected: email taken");
            return Err(AppError::conflict("Email already registered"));
        }

        let password_hash = hash_password_blocking(password).await?;
        let now = Utc::now();
        let user = User {
            id: EntityId::new().0,
            username,
            email,
            password_hash,
            name,
            bio,
            token_hash: None,
            token_expires_at: None,
            created_at: now,
            updated_at: now,
        };

        // A concurrent registration can still win between the checks and here.
        if !self.users.insert(&user).await? {
            return Err(AppError::conflict("Username or email already registered"));
        }

        tracing::info!(user_id = %user.id, username = %user.username, "user registered");
        Ok(user.into())
    }

    /// Verify credentials and issue a fresh token, replacing any previous one
    pub async fn login(&self, username: &str, password: &str) -> Result<TokenGrant, AppError> {
        let Some(user) = self.users.find_by_username(username.trim()).await? else {
            tracing::warn!(username, "login failed: unknown username");
            return Err(AppError::InvalidCredentials);
        };

        let password = password.to_string();
        let stored_hash = user.password_hash.clone();
        let verified = tokio::task::spawn_blocking(move || {
            token::verify_password(&password, &stored_hash)
        })
        .await
        .map_err(|e| AppError::Internal(e.into()))??;

        if !verified {
            tracing::warn!(username, "login failed: wrong password");
            return Err(AppError::InvalidCredentials);
        }

        let raw_token = token::generate_token();
        let expired_at = token::token_expiry(Utc::now(), self.token_ttl_days);
        self.users
            .set_token(&user.id, &token::hash_token(&raw_token), expired_at)
            .await?;

        tracing::info!(user_id = %user.id, %expired_at, "user logged in");
        Ok(TokenGrant {
            token: raw_token,
            expired_at,
        })
    }

    /// Clear the caller's token.
    ///
    /// An absent, unknown or expired token is not an error.
    pub async fn logout(&self, raw_token: Option<&str>) -> Result<LogoutOutcome, AppError> {
        let Some(raw_token) = raw_token else {
            tracing::info!("logout without a token");
            return Ok(LogoutOutcome::NoActiveToken);
        };

        let token_hash = token::hash_token(raw_token);
        let Some(user) = self.users.find_by_token_hash(&token_hash).await? else {
            tracing::info!("logout with an unknown token");
            return Ok(LogoutOutcome::NoActiveToken);
        };

        let was_active = user
            .token_expires_at
            .is_some_and(|expires_at| expires_at > Utc::now());
        self.users.clear_token(&token_hash).await?;

        if was_active {
            tracing::info!(user_id = %user.id, "user logged out");
            Ok(LogoutOutcome::LoggedOut)
        } else {
            tracing::info!(user_id = %user.id, "cleared an expired token on logout");
            Ok(LogoutOutcome::NoActiveToken)
        }
    }

    pub async fn get_user(&self, user_id: &str) -> Result<UserProfile, AppError> {
        self.users
            .find_by_id(user_id)
            .await?
            .map(UserProfile::from)
            .ok_or_else(|| AppError::not_found("User not found."))
    }

    /// Overwrite a profile; only its owner may do so
    pub async fn update_profile(
        &self,
        caller_id: &str,
        user_id: &str,
        input: ProfileInput<'_>,
    ) -> Result<UserProfile, AppError> {
        let mut user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found."))?;
        authorize_mutation(caller_id, &user.id).into_result()?;

        let email = validate::required("Email", input.email, MAX_FIELD_CHARS)?;
        validate::required("Password", input.password, MAX_FIELD_CHARS)?;
        let password = input.password.to_string();
        let name = validate::required("Name", input.name, MAX_FIELD_CHARS)?;
        let bio = validate::optional("Bio", input.bio, MAX_BIO_CHARS)?;

        if self.users.email_taken(&email, Some(&user.id)).await? {
            return Err(AppError::conflict("Email already registered"));
        }

        user.email = email;
        user.password_hash = hash_password_blocking(password).await?;
        user.name = name;
        user.bio = bio;
        user.updated_at = Utc::now();

        if !self.users.update_profile(&user).await? {
            return Err(AppError::conflict("Email already registered"));
        }

        tracing::info!(user_id = %user.id, "profile updated");
        Ok(user.into())
    }
}

#[async_trait]
impl IdentityResolver for IdentityService {
    async fn resolve_token(&self, raw_token: &str) -> Result<String, AppError> {
        let user = self
            .users
            .find_by_token_hash(&token::hash_token(raw_token))
            .await?
            .ok_or(AppError::Unauthenticated)?;

        match user.token_expires_at {
            Some(expires_at) if expires_at > Utc::now() => Ok(user.id),
            _ => {
                tracing::debug!(user_id = %user.id, "token expired");
                Err(AppError::Unauthenticated)
            }
        }
    }

    async fn get_user(&self, user_id: &str) -> Result<UserProfile, AppError> {
        IdentityService::get_user(self, user_id).await
    }
}

async fn hash_password_blocking(password: String) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || token::hash_password(&password))
        .await
        .map_err(|e| AppError::Internal(e.into()))?
}
