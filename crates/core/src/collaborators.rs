use std::sync::Arc;

use async_trait::async_trait;
use eyre::Result;

use crate::settings::Settings;

/// Local store the bot keeps its notifications in.
#[async_trait]
pub trait NotificationStore: Send + Sync {
    /// Prepare the store for use. Called once, before the bot is built.
    async fn initialize(&self) -> Result<()>;
}

/// Discord client that runs for the lifetime of the process.
#[async_trait]
pub trait NotificationClient: Send {
    /// Connect with `token` and process events until the session ends.
    async fn run(&mut self, token: &str) -> Result<()>;
}

/// Builds the store and bot the bootstrap drives.
///
/// Production wires the SQLite store and the serenity client; tests plug in
/// doubles.
pub trait Collaborators {
    type Store: NotificationStore;
    type Bot: NotificationClient;

    /// Open the store at `path` without touching it yet.
    fn open_store(&self, path: &str) -> Result<Self::Store>;

    /// Build the bot around the loaded settings and an initialized store.
    fn build_bot(&self, settings: Arc<Settings>, store: Self::Store) -> Result<Self::Bot>;
}
