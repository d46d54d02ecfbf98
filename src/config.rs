//! Configuration management
//!
//! Loads configuration from:
//! 1. Default values
//! 2. Configuration files (config/default.toml, config/local.toml)
//! 3. Environment variables (override)

use serde::Deserialize;
use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub services: ServicesConfig,
    pub database: DatabaseConfig,
    pub client: ClientConfig,
    pub auth: AuthConfig,
    pub logging: LoggingConfig,
}

/// The five independently-owned services
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceKind {
    Identity,
    Posts,
    Comments,
    Likes,
    Follows,
}

impl ServiceKind {
    pub const ALL: [ServiceKind; 5] = [
        ServiceKind::Identity,
        ServiceKind::Posts,
        ServiceKind::Comments,
        ServiceKind::Likes,
        ServiceKind::Follows,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Identity => "identity",
            Self::Posts => "posts",
            Self::Comments => "comments",
            Self::Likes => "likes",
            Self::Follows => "follows",
        }
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Server configuration shared by all services in this process
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0")
    pub host: String,
}

/// Which services run in this process and where every service lives
#[derive(Debug, Clone, Deserialize)]
pub struct ServicesConfig {
    /// Services hosted by this process
    pub enabled: Vec<ServiceKind>,
    pub identity: EndpointConfig,
    pub posts: EndpointConfig,
    pub comments: EndpointConfig,
    pub likes: EndpointConfig,
    pub follows: EndpointConfig,
}

impl ServicesConfig {
    pub fn endpoint(&self, kind: ServiceKind) -> &EndpointConfig {
        match kind {
            ServiceKind::Identity => &self.identity,
            ServiceKind::Posts => &self.posts,
            ServiceKind::Comments => &self.comments,
            ServiceKind::Likes => &self.likes,
            ServiceKind::Follows => &self.follows,
        }
    }
}

/// Listen port and public base URL of one service
#[derive(Debug, Clone, Deserialize)]
pub struct EndpointConfig {
    /// Port this service binds when hosted locally
    pub port: u16,
    /// URL other services use to reach it (e.g., "http://127.0.0.1:8081")
    pub base_url: String,
}

/// Database configuration (SQLite only)
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Directory holding one database file per service
    pub dir: PathBuf,
}

impl DatabaseConfig {
    /// Path to the database file owned by a service
    pub fn path_for(&self, kind: ServiceKind) -> PathBuf {
        self.dir.join(format!("{}.db", kind.as_str()))
    }
}

/// Service client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// Per-call timeout in milliseconds
    pub timeout_ms: u64,
}

impl ClientConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Token configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Token lifetime in days (default: 30)
    pub token_ttl_days: i64,
    /// Header carrying the token (default: "X-API-TOKEN")
    pub token_header: String,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    pub level: String,
    /// Log format: "pretty" or "json"
    pub format: String,
}

impl AppConfig {
    /// Load configuration from file and environment
    ///
    /// # Loading Order
    /// 1. Default values
    /// 2. config/default.toml (if exists)
    /// 3. config/local.toml (if exists)
    /// 4. Environment variables (MURMUR__*)
    ///
    /// # Errors
    /// Returns error if configuration is invalid
    pub fn load() -> Result<Self, crate::error::AppError> {
        use config::{Config, Environment, File};

        let config = Config::builder()
            // Start with default values
            .set_default("server.host", "127.0.0.1")?
            .set_default(
                "services.enabled",
                vec!["identity", "posts", "comments", "likes", "follows"],
            )?
            .set_default("services.identity.port", 8081)?
            .set_default("services.identity.base_url", "http://127.0.0.1:8081")?
            .set_default("services.posts.port", 8082)?
            .set_default("services.posts.base_url", "http://127.0.0.1:8082")?
            .set_default("services.follows.port", 8083)?
            .set_default("services.follows.base_url", "http://127.0.0.1:8083")?
            .set_default("services.comments.port", 8084)?
            .set_default("services.comments.base_url", "http://127.0.0.1:8084")?
            .set_default("services.likes.port", 8085)?
            .set_default("services.likes.base_url", "http://127.0.0.1:8085")?
            .set_default("database.dir", "data")?
            .set_default("client.timeout_ms", 5000)?
            .set_default("auth.token_ttl_days", 30)?
            .set_default("auth.token_header", "X-API-TOKEN")?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "pretty")?
            // Load from config/default.toml if it exists
            .add_source(File::with_name("config/default").required(false))
            // Load from config/local.toml if it exists (overrides default)
            .add_source(File::with_name("config/local").required(false))
            // Load from environment variables (MURMUR__*)
            .add_source(
                Environment::with_prefix("MURMUR")
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("services.enabled")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| crate::error::AppError::Config(e.to_string()))?;

        let app_config: Self = config
            .try_deserialize()
            .map_err(|e| crate::error::AppError::Config(e.to_string()))?;
        app_config.validate()?;
        Ok(app_config)
    }

    fn validate(&self) -> Result<(), crate::error::AppError> {
        use crate::error::AppError;

        if self.services.enabled.is_empty() {
            return Err(AppError::Config(
                "services.enabled must name at least one service".to_string(),
            ));
        }

        if self.client.timeout_ms == 0 {
            return Err(AppError::Config(
                "client.timeout_ms must be greater than 0".to_string(),
            ));
        }

        if self.auth.token_ttl_days <= 0 {
            return Err(AppError::Config(
                "auth.token_ttl_days must be greater than 0".to_string(),
            ));
        }

        if self.auth.token_header.trim().is_empty() {
            return Err(AppError::Config(
                "auth.token_header must not be empty".to_string(),
            ));
        }

        let mut ports = HashSet::new();
        for kind in &self.services.enabled {
            let endpoint = self.services.endpoint(*kind);
            if !ports.insert(endpoint.port) {
                return Err(AppError::Config(format!(
                    "services.{}.port {} is already used by another enabled service",
                    kind, endpoint.port
                )));
            }
        }

        for kind in ServiceKind::ALL {
            let base_url = &self.services.endpoint(kind).base_url;
            url::Url::parse(base_url).map_err(|e| {
                AppError::Config(format!("services.{}.base_url is invalid: {}", kind, e))
            })?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoint(port: u16) -> EndpointConfig {
        EndpointConfig {
            port,
            base_url: format!("http://127.0.0.1:{}", port),
        }
    }

    fn valid_config() -> AppConfig {
        AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
            },
            services: ServicesConfig {
                enabled: ServiceKind::ALL.to_vec(),
                identity: endpoint(8081),
                posts: endpoint(8082),
                comments: endpoint(8084),
                likes: endpoint(8085),
                follows: endpoint(8083),
            },
            database: DatabaseConfig {
                dir: PathBuf::from("/tmp/murmur-test"),
            },
            client: ClientConfig { timeout_ms: 5000 },
            auth: AuthConfig {
                token_ttl_days: 30,
                token_header: "X-API-TOKEN".to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
            },
        }
    }

    #[test]
    fn validate_accepts_defaults() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn validate_rejects_zero_timeout() {
        let mut config = valid_config();
        config.client.timeout_ms = 0;

        let error = config.validate().expect_err("zero timeout must fail");
        assert!(matches!(
            error,
            crate::error::AppError::Config(message) if message.contains("client.timeout_ms")
        ));
    }

    #[test]
    fn validate_rejects_shared_ports() {
        let mut config = valid_config();
        config.services.likes.port = 8081;

        let error = config.validate().expect_err("port clash must fail");
        assert!(matches!(
            error,
            crate::error::AppError::Config(message) if message.contains("services.likes.port")
        ));
    }

    #[test]
    fn shared_ports_are_fine_when_one_service_runs_elsewhere() {
        let mut config = valid_config();
        config.services.enabled = vec![ServiceKind::Identity];
        config.services.likes.port = 8081;

        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_unparsable_base_url() {
        let mut config = valid_config();
        config.services.comments.base_url = "not a url".to_string();

        assert!(config.validate().is_err());
    }

    #[test]
    fn each_service_gets_its_own_database_file() {
        let config = valid_config();
        assert_eq!(
            config.database.path_for(ServiceKind::Likes),
            PathBuf::from("/tmp/murmur-test/likes.db")
        );
    }
}
