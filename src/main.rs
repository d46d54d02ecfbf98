//! Murmur binary entry point

use murmur::config;
use tokio::task::JoinSet;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Application entry point
///
/// # Setup
/// 1. Initialize tracing/logging
/// 2. Initialize metrics
/// 3. Load configuration from file and environment
/// 4. Bind and build every enabled service
/// 5. Serve until one of them stops
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let log_format =
        std::env::var("MURMUR__LOGGING__FORMAT").unwrap_or_else(|_| "pretty".to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "murmur=info,tower_http=debug".into());

    if log_format == "json" {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }

    tracing::info!("Starting Murmur...");

    murmur::metrics::init_metrics();

    let config = config::AppConfig::load()?;
    let enabled: Vec<String> = config
        .services
        .enabled
        .iter()
        .map(ToString::to_string)
        .collect();
    tracing::info!(
        host = %config.server.host,
        services = ?enabled,
        "Configuration loaded"
    );

    let http = murmur::http_client()?;
    let mut servers = JoinSet::new();

    for kind in config.services.enabled.iter().copied() {
        let endpoint = config.services.endpoint(kind);
        let addr = format!("{}:{}", config.server.host, endpoint.port);
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        let router = murmur::build_router(kind, &config, http.clone()).await?;

        tracing::info!(service = %kind, base_url = %endpoint.base_url, "Service ready");
        servers.spawn(async move { (kind, murmur::serve(kind, listener, router).await) });
    }

    // Any service stopping takes the process down with it.
    if let Some(joined) = servers.join_next().await {
        let (kind, outcome) = joined?;
        match outcome {
            Ok(()) => tracing::warn!(service = %kind, "Service stopped"),
            Err(error) => {
                tracing::error!(service = %kind, %error, "Service failed");
                return Err(error.into());
            }
        }
    }

    Ok(())
}
