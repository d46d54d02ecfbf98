//! Token authentication
//!
//! Handles:
//! - Token generation and hashing
//! - Password hashing
//! - Caller resolution for handlers

mod middleware;
pub mod token;

pub use middleware::{Authenticator, CurrentUser, RequestToken};
