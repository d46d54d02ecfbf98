//! API layer
//!
//! One router per service, mounted under `/api`:
//! - identity: users, login/logout, token resolution
//! - posts: posts and post details
//! - comments, likes, follows
//! - metrics (Prometheus), served by every service

pub mod comments;
mod dto;
mod envelope;
mod extract;
pub mod follows;
pub mod identity;
pub mod likes;
pub mod metrics;
pub mod posts;

pub use dto::*;
pub use envelope::WebResponse;
pub use extract::JsonBody;
pub use metrics::metrics_router;
