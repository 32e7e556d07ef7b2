use std::sync::Arc;

use notifybot_core::settings::Settings;
use notifybot_db::DatabaseManager;
use serenity::{
    async_trait,
    model::{event::ResumedEvent, gateway::Ready},
    prelude::*,
};
use tracing::{info, warn};

/// Gateway event handler of the notification bot.
///
/// It holds the bot settings and the store so they stay alive for the
/// whole gateway session.
pub struct Handler {
    settings: Arc<Settings>,
    store: Arc<DatabaseManager>,
}

impl Handler {
    /// Create a new handler
    pub fn new(settings: Arc<Settings>, store: Arc<DatabaseManager>) -> Self {
        Self { settings, store }
    }
}

#[async_trait]
impl EventHandler for Handler {
    /// Handle ready events (when bot connects to Discord)
    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!("{} is connected!", ready.user.name);
        info!(
            "Serving {} guild(s) with prefix {:?}, watching {} keyword(s)",
            ready.guilds.len(),
            self.settings.command_prefix,
            self.settings.notification_keywords.len()
        );

        if self.store.pool().is_none() {
            warn!(
                "Database at {} is not initialized; notifications will not be stored",
                self.store.path().display()
            );
        }
    }

    async fn resume(&self, _ctx: Context, _resumed: ResumedEvent) {
        info!("Gateway session resumed");
    }
}
