//! Data layer module
//!
//! Each service owns its own SQLite database:
//! - identity: users and tokens
//! - posts, comments: resources owned by one user
//! - likes, follows: engagement edges behind [`EdgeStore`]

mod comments;
mod database;
mod edge;
mod follows;
mod likes;
mod models;
mod posts;
mod users;

pub use comments::CommentStore;
pub use database::{Database, is_unique_violation};
pub use edge::{EdgeInsert, EdgeStore};
#[cfg(test)]
pub use edge::MockEdgeStore;
pub use follows::FollowStore;
pub use likes::{LikeEdges, LikeStore, LikeTarget};
pub use models::*;
pub use posts::PostStore;
pub use users::UserStore;
