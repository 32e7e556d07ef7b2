use std::path::PathBuf;

use thiserror::Error;

/// A typed setting was present in the environment but could not be parsed.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?} is not an integer")]
    InvalidInteger {
        key: &'static str,
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    #[error("Invalid value for {key}: {value:?} is not one of DEBUG, INFO, WARNING, ERROR, CRITICAL")]
    InvalidLogLevel { key: &'static str, value: String },
}

#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("Failed to create log directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to open log file {path}: {source}")]
    OpenFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to replace log sinks: {0}")]
    Reload(#[from] tracing_subscriber::reload::Error),

    #[error("Failed to install global logger: {0}")]
    InstallGlobal(#[from] tracing::dispatcher::SetGlobalDefaultError),
}

/// Every way the startup sequence can fail.
///
/// A user interrupt is not an error; see [`crate::bootstrap::Outcome`].
#[derive(Error, Debug)]
pub enum BootstrapError {
    #[error("Logging setup failed: {0}")]
    Logging(#[from] LoggingError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Discord token is not set")]
    MissingToken,

    #[error("Database initialization failed: {0}")]
    Database(#[source] eyre::Report),

    #[error("Bot error: {0}")]
    Bot(#[source] eyre::Report),
}

pub type BootstrapResult<T> = Result<T, BootstrapError>;
