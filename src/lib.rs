//! Murmur - social network backend split into five small services
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      API Layer (Axum)                        │
//! │  - One router per service under /api                        │
//! │  - Token extraction (CurrentUser / RequestToken)            │
//! │  - /health and /metrics on every service                    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Service Layer                            │
//! │  - Identity, posts, comments, likes, follows                │
//! │  - Ownership guard and idempotent toggles                   │
//! │  - Post detail aggregation                                  │
//! └─────────────────────────────────────────────────────────────┘
//!            │                                   │
//! ┌──────────────────────────┐   ┌──────────────────────────────┐
//! │       Data Layer          │   │       Service Clients         │
//! │  - SQLite per service     │   │  - identity / comment / like  │
//! │    (sqlx + migrations)    │   │  - timeout, no retries        │
//! └──────────────────────────┘   └──────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - `api`: HTTP handlers and the response envelope
//! - `service`: Business logic layer
//! - `client`: Calls from one service to another
//! - `data`: SQLite stores
//! - `auth`: Tokens, password hashing and request authentication
//! - `config`: Configuration management
//! - `error`: Error types
//! - `metrics`: Prometheus collectors

pub mod api;
pub mod auth;
pub mod client;
pub mod config;
pub mod data;
pub mod error;
pub mod metrics;
pub mod service;

use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use config::ServiceKind;

use api::{
    comments::CommentsState, follows::FollowsState, identity::IdentityState, likes::LikesState,
    posts::PostsState,
};
use auth::Authenticator;
use client::{HttpCommentClient, HttpIdentityClient, HttpLikeClient, IdentityResolver, ServiceClient};
use config::AppConfig;
use data::{CommentStore, Database, FollowStore, LikeStore, PostStore, UserStore};
use error::AppError;
use service::{
    CommentService, FollowService, IdentityService, LikeService, PostDetailAggregator,
    PostService,
};

/// Client for calls from this process to `target`
fn service_client(config: &AppConfig, http: &reqwest::Client, target: ServiceKind) -> ServiceClient {
    ServiceClient::new(
        http.clone(),
        target,
        config.services.endpoint(target).base_url.clone(),
        config.auth.token_header.clone(),
        config.client.timeout(),
    )
}

fn remote_identity(config: &AppConfig, http: &reqwest::Client) -> Arc<dyn IdentityResolver> {
    Arc::new(HttpIdentityClient::new(service_client(
        config,
        http,
        ServiceKind::Identity,
    )))
}

/// Build the router of one service.
///
/// Opens (and migrates) the service's own database, wires its collaborators
/// and mounts the handlers under `/api` next to `/health` and `/metrics`.
/// Shared by the binary and integration tests.
///
/// # Errors
/// Fails when the database cannot be opened or migrated, or when the token
/// header name is invalid
pub async fn build_router(
    kind: ServiceKind,
    config: &AppConfig,
    http: reqwest::Client,
) -> Result<Router, AppError> {
    let db = Database::connect(&config.database.path_for(kind), kind).await?;
    let pool = db.pool().clone();
    let token_header = config.auth.token_header.as_str();

    let routes = match kind {
        ServiceKind::Identity => {
            let service = Arc::new(IdentityService::new(
                UserStore::new(pool),
                config.auth.token_ttl_days,
            ));
            api::identity::router(IdentityState::new(service, token_header)?)
        }
        ServiceKind::Posts => {
            let posts = PostStore::new(pool);
            let aggregator = PostDetailAggregator::new(
                posts.clone(),
                Arc::new(HttpCommentClient::new(service_client(
                    config,
                    &http,
                    ServiceKind::Comments,
                ))),
                Arc::new(HttpLikeClient::new(service_client(
                    config,
                    &http,
                    ServiceKind::Likes,
                ))),
            );
            api::posts::router(PostsState {
                service: Arc::new(PostService::new(posts, aggregator)),
                auth: Authenticator::new(remote_identity(config, &http), token_header)?,
            })
        }
        ServiceKind::Comments => api::comments::router(CommentsState {
            service: Arc::new(CommentService::new(CommentStore::new(pool))),
            auth: Authenticator::new(remote_identity(config, &http), token_header)?,
        }),
        ServiceKind::Likes => api::likes::router(LikesState {
            service: Arc::new(LikeService::new(LikeStore::new(pool))),
            auth: Authenticator::new(remote_identity(config, &http), token_header)?,
        }),
        ServiceKind::Follows => {
            let identity = remote_identity(config, &http);
            api::follows::router(FollowsState {
                service: Arc::new(FollowService::new(
                    FollowStore::new(pool),
                    identity.clone(),
                )),
                auth: Authenticator::new(identity, token_header)?,
            })
        }
    };

    tracing::info!(service = %kind, "Router built");

    Ok(Router::new()
        .route("/health", axum::routing::get(health_check))
        .nest("/api", routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .merge(api::metrics_router()))
}

/// Serve one service on an already-bound listener until the server stops.
pub async fn serve(kind: ServiceKind, listener: TcpListener, router: Router) -> Result<(), AppError> {
    let addr = listener
        .local_addr()
        .map_err(|e| AppError::Internal(e.into()))?;
    tracing::info!(service = %kind, %addr, "Service listening");

    axum::serve(listener, router)
        .await
        .map_err(|e| AppError::Internal(e.into()))
}

/// HTTP client shared by every service client in the process.
///
/// Per-call timeouts are applied by [`ServiceClient`]; this client only
/// carries connection settings.
pub fn http_client() -> Result<reqwest::Client, AppError> {
    reqwest::Client::builder()
        .user_agent(concat!("murmur/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| AppError::Internal(e.into()))
}

async fn health_check() -> &'static str {
    "OK"
}
