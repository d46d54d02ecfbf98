//! SQLite connection setup
//!
//! Each service owns one database file with its own migration set.
//! Stores share the pool opened here.

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};

use crate::config::ServiceKind;
use crate::error::AppError;

static IDENTITY_MIGRATIONS: Migrator = sqlx::migrate!("./migrations/identity");
static POSTS_MIGRATIONS: Migrator = sqlx::migrate!("./migrations/posts");
static COMMENTS_MIGRATIONS: Migrator = sqlx::migrate!("./migrations/comments");
static LIKES_MIGRATIONS: Migrator = sqlx::migrate!("./migrations/likes");
static FOLLOWS_MIGRATIONS: Migrator = sqlx::migrate!("./migrations/follows");

fn migrator_for(kind: ServiceKind) -> &'static Migrator {
    match kind {
        ServiceKind::Identity => &IDENTITY_MIGRATIONS,
        ServiceKind::Posts => &POSTS_MIGRATIONS,
        ServiceKind::Comments => &COMMENTS_MIGRATIONS,
        ServiceKind::Likes => &LIKES_MIGRATIONS,
        ServiceKind::Follows => &FOLLOWS_MIGRATIONS,
    }
}

/// True when the error is a UNIQUE constraint violation
pub fn is_unique_violation(error: &sqlx::Error) -> bool {
    match error {
        sqlx::Error::Database(db_error) => db_error.is_unique_violation(),
        _ => false,
    }
}

/// Database connection pool of one service
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect to a service's SQLite database
    ///
    /// Creates the database file if it doesn't exist.
    /// Runs the service's pending migrations.
    ///
    /// # Errors
    /// Returns error if connection or migration fails
    pub async fn connect(path: &Path, service: ServiceKind) -> Result<Self, AppError> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| AppError::Database(sqlx::Error::Io(e)))?;
        }

        let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.display()))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(8)
            .connect_with(options)
            .await?;

        migrator_for(service).run(&pool).await.map_err(|e| {
            tracing::error!(service = %service, error = %e, "Migration failed");
            AppError::Migration(e)
        })?;

        tracing::info!(
            service = %service,
            path = %path.display(),
            "Database connected and migrated successfully"
        );

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
