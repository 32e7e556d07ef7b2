use std::sync::Arc;

use async_trait::async_trait;
use eyre::Result;
use notifybot_core::collaborators::NotificationClient;
use notifybot_core::settings::Settings;
use notifybot_db::DatabaseManager;
use serenity::Client;
use tracing::info;

pub mod handlers;
pub mod intents;

/// The Discord side of the notification bot.
///
/// Holds the loaded settings and the initialized store for the lifetime of
/// the gateway session.
pub struct NotificationBot {
    settings: Arc<Settings>,
    store: Arc<DatabaseManager>,
}

impl NotificationBot {
    pub fn new(settings: Arc<Settings>, store: DatabaseManager) -> Self {
        Self {
            settings,
            store: Arc::new(store),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Connect to Discord with `token` and process events until the
    /// connection ends.
    ///
    /// # Returns
    ///
    /// * `Ok(())` if the bot shut down gracefully
    /// * `Err` if the client could not be built, authentication failed, or
    ///   the gateway connection failed fatally
    pub async fn start(&self, token: &str) -> Result<()> {
        info!("Starting Discord bot");

        let handler = handlers::Handler::new(Arc::clone(&self.settings), Arc::clone(&self.store));
        let intents = intents::intents_from_config(&self.settings.intents);

        let mut client = Client::builder(token, intents)
            .event_handler(handler)
            .await?;

        info!("Connecting to Discord...");
        client.start().await?;

        Ok(())
    }
}

#[async_trait]
impl NotificationClient for NotificationBot {
    async fn run(&mut self, token: &str) -> Result<()> {
        self.start(token).await
    }
}
