use std::process::ExitCode;
use std::sync::Arc;

use color_eyre::eyre::Result;
use notifybot_core::collaborators::Collaborators;
use notifybot_core::{Bootstrap, BootstrapError, LoggingContext, Outcome, Settings};
use notifybot_db::DatabaseManager;
use notifybot_discord_bot::NotificationBot;
use tracing::warn;

/// The SQLite store and the serenity client.
struct Production;

impl Collaborators for Production {
    type Store = DatabaseManager;
    type Bot = NotificationBot;

    fn open_store(&self, path: &str) -> Result<DatabaseManager> {
        Ok(DatabaseManager::new(path))
    }

    fn build_bot(&self, settings: Arc<Settings>, store: DatabaseManager) -> Result<NotificationBot> {
        Ok(NotificationBot::new(settings, store))
    }
}

/// Resolves on Ctrl-C. Never resolves if the signal cannot be watched.
async fn interrupted() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Unable to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize error handling
    if let Err(e) = color_eyre::install() {
        eprintln!("Failed to install error reporting: {e}");
    }

    // Route library logs (serenity, sqlx) through the same sinks
    let logging = LoggingContext::new();
    if let Err(e) = logging.install_global() {
        eprintln!("{e}");
    }

    let outcome = Bootstrap::new(&logging, Production).run(interrupted()).await;

    // No sink exists to report this one
    if let Outcome::Failed(BootstrapError::Logging(e)) = &outcome {
        eprintln!("{e}");
    }

    ExitCode::from(outcome.exit_code())
}
