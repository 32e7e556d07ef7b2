//! Startup sequence of the bot.
//!
//! Steps run strictly in order, each attempted once:
//!
//! 1. install logging with default settings
//! 2. load [`Settings`] (and re-apply logging if it asks for a different
//!    level or file)
//! 3. check that a Discord token is present
//! 4. open and initialize the store
//! 5. build the bot and run it until the session ends
//!
//! A shutdown signal arriving during steps 2-5 stops the sequence cleanly.

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

use crate::collaborators::{Collaborators, NotificationClient, NotificationStore};
use crate::errors::{BootstrapError, BootstrapResult};
use crate::logging::{Logger, LoggingContext};
use crate::settings::{DEFAULT_LOG_FILE, EnvSource, LogLevel, ProcessEnv, Settings};

/// How the startup sequence ended.
#[derive(Debug)]
pub enum Outcome {
    /// The bot session ended on its own.
    Completed,
    /// The user asked the process to stop.
    Interrupted,
    Failed(BootstrapError),
}

impl Outcome {
    /// Process exit code: `0` for a clean stop, `1` for any failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            Outcome::Completed | Outcome::Interrupted => 0,
            Outcome::Failed(_) => 1,
        }
    }

    pub fn is_success(&self) -> bool {
        self.exit_code() == 0
    }
}

/// Drives the startup sequence against a set of [`Collaborators`].
pub struct Bootstrap<'a, C, E = ProcessEnv> {
    logging: &'a LoggingContext,
    collaborators: C,
    env: E,
    log_file: PathBuf,
}

impl<'a, C> Bootstrap<'a, C, ProcessEnv>
where
    C: Collaborators,
{
    /// A bootstrap reading settings from the process environment and `.env`.
    pub fn new(logging: &'a LoggingContext, collaborators: C) -> Self {
        Self {
            logging,
            collaborators,
            env: ProcessEnv,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

impl<'a, C, E> Bootstrap<'a, C, E>
where
    C: Collaborators,
    E: EnvSource,
{
    /// Read settings from `env` instead of the process environment.
    pub fn with_env<F: EnvSource>(self, env: F) -> Bootstrap<'a, C, F> {
        Bootstrap {
            logging: self.logging,
            collaborators: self.collaborators,
            env,
            log_file: self.log_file,
        }
    }

    /// Log file used before settings are loaded.
    pub fn with_log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_file = path.into();
        self
    }

    /// Run the whole sequence.
    ///
    /// `shutdown` resolving before the sequence finishes counts as a user
    /// interrupt. Failures are logged before being returned.
    pub async fn run<F>(self, shutdown: F) -> Outcome
    where
        F: Future<Output = ()>,
    {
        let logger = match self.logging.setup(LogLevel::default(), &self.log_file) {
            Ok(logger) => logger,
            Err(e) => return Outcome::Failed(e.into()),
        };

        tokio::select! {
            result = self.sequence(&logger) => match result {
                Ok(()) => Outcome::Completed,
                // Already reported with its own messages.
                Err(BootstrapError::MissingToken) => Outcome::Failed(BootstrapError::MissingToken),
                Err(e) => {
                    logger.error(format_args!("An error occurred: {e}"));
                    Outcome::Failed(e)
                }
            },
            () = shutdown => {
                logger.info("Bot stopped by user.");
                Outcome::Interrupted
            }
        }
    }

    async fn sequence(&self, logger: &Logger) -> BootstrapResult<()> {
        let settings = Settings::from_source(&self.env)?;
        self.apply_log_settings(&settings, logger)?;

        if !settings.validate() {
            logger.error("Discord token is not set in the configuration.");
            logger.error("Please set DISCORD_TOKEN in the environment or .env file.");
            return Err(BootstrapError::MissingToken);
        }
        let settings = Arc::new(settings);

        let store = self
            .collaborators
            .open_store(&settings.database_path)
            .map_err(BootstrapError::Database)?;
        store.initialize().await.map_err(BootstrapError::Database)?;

        let mut bot = self
            .collaborators
            .build_bot(Arc::clone(&settings), store)
            .map_err(BootstrapError::Bot)?;
        logger.info("Starting Discord Notification Bot...");

        bot.run(&settings.discord_token)
            .await
            .map_err(BootstrapError::Bot)
    }

    /// Re-install the sinks when the settings ask for a non-default level or file.
    fn apply_log_settings(&self, settings: &Settings, logger: &Logger) -> BootstrapResult<()> {
        if settings.log_level == LogLevel::default() && settings.log_file == DEFAULT_LOG_FILE {
            return Ok(());
        }

        self.logging.setup(settings.log_level, &settings.log_file)?;
        logger.debug(format_args!(
            "Logging to {} at {}",
            settings.log_file, settings.log_level
        ));
        Ok(())
    }
}
