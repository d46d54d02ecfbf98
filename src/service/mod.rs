//! Service layer
//!
//! Contains business logic separated from HTTP handlers.
//! Services receive the already-resolved caller id and orchestrate their
//! own store plus any remote collaborators handed to them at construction.

mod aggregator;
mod comment;
mod follow;
mod identity;
mod like;
pub mod ownership;
mod post;
pub mod toggle;
mod validate;

pub use aggregator::PostDetailAggregator;
pub use comment::CommentService;
pub use follow::FollowService;
pub use identity::{IdentityService, LogoutOutcome, ProfileInput, TokenGrant};
pub use like::LikeService;
pub use post::PostService;
