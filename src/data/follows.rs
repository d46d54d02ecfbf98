//! Follow edges (follow service)
//!
//! The actor is the follower, the target is the followed user.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

use super::database::is_unique_violation;
use super::edge::{EdgeInsert, EdgeStore};
use super::models::{EntityId, Follow};
use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct FollowStore {
    pool: SqlitePool,
}

impl FollowStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Edges pointing at `user_id`, oldest first
    pub async fn followers_of(&self, user_id: &str) -> Result<Vec<Follow>, AppError> {
        let follows = sqlx::query_as::<_, Follow>(
            "SELECT * FROM follows WHERE user_id = ? ORDER BY created_at ASC, id ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(follows)
    }

    /// Edges leaving `follower_id`, oldest first
    pub async fn following_of(&self, follower_id: &str) -> Result<Vec<Follow>, AppError> {
        let follows = sqlx::query_as::<_, Follow>(
            "SELECT * FROM follows WHERE follower_id = ? ORDER BY created_at ASC, id ASC",
        )
        .bind(follower_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(follows)
    }
}

#[async_trait]
impl EdgeStore for FollowStore {
    fn edge_name(&self) -> &'static str {
        "follow"
    }

    async fn exists(&self, actor: &str, target: &str) -> Result<bool, AppError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM follows WHERE follower_id = ? AND user_id = ?")
                .bind(actor)
                .bind(target)
                .fetch_one(&self.pool)
                .await?;

        Ok(count > 0)
    }

    async fn insert(&self, actor: &str, target: &str) -> Result<EdgeInsert, AppError> {
        let result = sqlx::query(
            "INSERT INTO follows (id, user_id, follower_id, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(EntityId::new().0)
        .bind(target)
        .bind(actor)
        .bind(Utc::now())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(EdgeInsert::Inserted),
            Err(e) if is_unique_violation(&e) => Ok(EdgeInsert::Duplicate),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, actor: &str, target: &str) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM follows WHERE follower_id = ? AND user_id = ?")
            .bind(actor)
            .bind(target)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
