//! User records and tokens (identity service)

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use super::database::is_unique_violation;
use super::models::User;
use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct UserStore {
    pool: SqlitePool,
}

impl UserStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new user.
    ///
    /// Returns `false` when the username or email is already taken.
    pub async fn insert(&self, user: &User) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (
                id, username, email, password_hash, name, bio,
                token_hash, token_expires_at, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.name)
        .bind(&user.bio)
        .bind(&user.token_hash)
        .bind(user.token_expires_at)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(true),
            Err(e) if is_unique_violation(&e) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// Find the user holding a token, by the token's digest
    pub async fn find_by_token_hash(&self, token_hash: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE token_hash = ?")
            .bind(token_hash)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    pub async fn username_taken(&self, username: &str) -> Result<bool, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE username = ?")
            .bind(username)
            .fetch_one(&self.pool)
            .await?;

        Ok(count > 0)
    }

    /// Check whether an email is used by anyone other than `except_id`
    pub async fn email_taken(
        &self,
        email: &str,
        except_id: Option<&str>,
    ) -> Result<bool, AppError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = ? AND id != ?")
                .bind(email)
                .bind(except_id.unwrap_or(""))
                .fetch_one(&self.pool)
                .await?;

        Ok(count > 0)
    }

    /// Replace the user's token; any previous token stops resolving
    pub async fn set_token(
        &self,
        user_id: &str,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE users SET token_hash = ?, token_expires_at = ?, updated_at = ? WHERE id = ?",
        )
        .bind(token_hash)
        .bind(expires_at)
        .bind(Utc::now())
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Clear the token matching `token_hash`. Returns rows affected.
    pub async fn clear_token(&self, token_hash: &str) -> Result<u64, AppError> {
        let result = sqlx::query(
            "UPDATE users SET token_hash = NULL, token_expires_at = NULL, updated_at = ? WHERE token_hash = ?",
        )
        .bind(Utc::now())
        .bind(token_hash)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Overwrite the mutable profile fields.
    ///
    /// Returns `false` when the new email belongs to another user.
    pub async fn update_profile(&self, user: &User) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET email = ?, password_hash = ?, name = ?, bio = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.name)
        .bind(&user.bio)
        .bind(user.updated_at)
        .bind(&user.id)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(true),
            Err(e) if is_unique_violation(&e) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
