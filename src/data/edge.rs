//! Engagement edges: likes and follows
//!
//! An edge links an actor (the user doing the liking/following) to a
//! target. Each table has a UNIQUE constraint on the pair, so `insert`
//! reports a lost race instead of writing a duplicate row.

use async_trait::async_trait;

use crate::error::AppError;

/// Result of inserting an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeInsert {
    Inserted,
    /// The pair already existed (UNIQUE constraint hit)
    Duplicate,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EdgeStore: Send + Sync {
    /// Label for logs and metrics ("post_like", "follow", ...)
    fn edge_name(&self) -> &'static str;

    async fn exists(&self, actor: &str, target: &str) -> Result<bool, AppError>;

    async fn insert(&self, actor: &str, target: &str) -> Result<EdgeInsert, AppError>;

    /// Delete the edge and return the number of rows removed
    async fn delete(&self, actor: &str, target: &str) -> Result<u64, AppError>;
}
