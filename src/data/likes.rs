//! Like edges on posts and comments (like service)

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

use super::database::is_unique_violation;
use super::edge::{EdgeInsert, EdgeStore};
use super::models::EntityId;
use crate::error::AppError;

/// What a like points at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeTarget {
    Post,
    Comment,
}

impl LikeTarget {
    fn table(self) -> &'static str {
        match self {
            LikeTarget::Post => "post_likes",
            LikeTarget::Comment => "comment_likes",
        }
    }

    fn column(self) -> &'static str {
        match self {
            LikeTarget::Post => "post_id",
            LikeTarget::Comment => "comment_id",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LikeTarget::Post => "post",
            LikeTarget::Comment => "comment",
        }
    }
}

#[derive(Debug, Clone)]
pub struct LikeStore {
    pool: SqlitePool,
}

impl LikeStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Edge view over one like table
    pub fn edges(&self, target: LikeTarget) -> LikeEdges {
        LikeEdges {
            pool: self.pool.clone(),
            target,
        }
    }

    pub async fn count(&self, target: LikeTarget, target_id: &str) -> Result<i64, AppError> {
        let sql = format!(
            "SELECT COUNT(*) FROM {} WHERE {} = ?",
            target.table(),
            target.column()
        );
        let count: i64 = sqlx::query_scalar(&sql)
            .bind(target_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// `(user_id, post_id)` or `(user_id, comment_id)` pairs
#[derive(Debug, Clone)]
pub struct LikeEdges {
    pool: SqlitePool,
    target: LikeTarget,
}

#[async_trait]
impl EdgeStore for LikeEdges {
    fn edge_name(&self) -> &'static str {
        match self.target {
            LikeTarget::Post => "post_like",
            LikeTarget::Comment => "comment_like",
        }
    }

    async fn exists(&self, actor: &str, target: &str) -> Result<bool, AppError> {
        let sql = format!(
            "SELECT COUNT(*) FROM {} WHERE user_id = ? AND {} = ?",
            self.target.table(),
            self.target.column()
        );
        let count: i64 = sqlx::query_scalar(&sql)
            .bind(actor)
            .bind(target)
            .fetch_one(&self.pool)
            .await?;

        Ok(count > 0)
    }

    async fn insert(&self, actor: &str, target: &str) -> Result<EdgeInsert, AppError> {
        let sql = format!(
            "INSERT INTO {} (id, user_id, {}, created_at) VALUES (?, ?, ?, ?)",
            self.target.table(),
            self.target.column()
        );
        let result = sqlx::query(&sql)
            .bind(EntityId::new().0)
            .bind(actor)
            .bind(target)
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
        let sql = format!(
            "DELETE FROM {} WHERE user_id = ? AND {} = ?",
            self.target.table(),
            self.target.column()
        );
        let result = sqlx::query(&sql)
            .bind(actor)
            .bind(target)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
