use std::path::{Path, PathBuf};

use async_trait::async_trait;
use eyre::{Result, WrapErr};
use notifybot_core::collaborators::NotificationStore;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode};
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::{DbPool, create_pool};

/// Owns the SQLite database the bot stores notifications in.
///
/// Construction only records where the database lives; nothing touches the
/// filesystem until [`initialize`](Self::initialize) runs.
pub struct DatabaseManager {
    path: PathBuf,
    options: SqliteConnectOptions,
    pool: OnceCell<DbPool>,
}

impl DatabaseManager {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let options = SqliteConnectOptions::new()
            .filename(&path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true);

        Self {
            path,
            options,
            pool: OnceCell::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open the connection pool, creating the database file if needed.
    ///
    /// Calling this again after a successful run only re-checks the
    /// connection.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be created or opened, e.g. when its
    /// directory does not exist.
    pub async fn initialize(&self) -> Result<()> {
        let pool = self
            .pool
            .get_or_try_init(|| async {
                debug!("Opening database at {}", self.path.display());
                create_pool(self.options.clone()).await
            })
            .await
            .wrap_err_with(|| format!("Failed to open database at {}", self.path.display()))?;

        sqlx::query("SELECT 1")
            .execute(pool)
            .await
            .wrap_err("Database did not answer a ping")?;

        info!("Database initialized at {}", self.path.display());
        Ok(())
    }

    /// The connection pool, once [`initialize`](Self::initialize) succeeded.
    pub fn pool(&self) -> Option<&DbPool> {
        self.pool.get()
    }

    /// Close all pooled connections. A no-op before initialization.
    pub async fn close(&self) {
        if let Some(pool) = self.pool.get() {
            pool.close().await;
        }
    }
}

#[async_trait]
impl NotificationStore for DatabaseManager {
    async fn initialize(&self) -> Result<()> {
        DatabaseManager::initialize(self).await
    }
}
