//! # Settings Module
//!
//! Loads the bot configuration from environment variables in a single
//! validated pass. A `.env` file in the working directory, when present, is
//! merged into the process environment first.
//!
//! ## Environment Variables
//!
//! - `DISCORD_TOKEN`: Discord bot token (default: empty, which fails validation)
//! - `COMMAND_PREFIX`: Prefix for text commands (default: "!")
//! - `DATABASE_PATH`: SQLite database file (default: "notification.db")
//! - `MAX_NOTIFICATIONS_DISPLAY`: Notifications shown per listing (default: 25)
//! - `CLEANUP_DAYS`: Age in days after which notifications are pruned (default: 7)
//! - `NOTIFICATION_KEYWORDS`: Comma-separated keywords (default: "urgent,important,reminder,help,@everyone,@here")
//! - `LOG_LEVEL`: DEBUG, INFO, WARNING, ERROR or CRITICAL (default: "INFO")
//! - `LOG_FILE`: Log file path (default: "bot.log")

use std::collections::HashMap;
use std::env;
use std::fmt;
use std::str::FromStr;

use tracing::level_filters::LevelFilter;

use crate::errors::ConfigError;

pub const DEFAULT_COMMAND_PREFIX: &str = "!";
pub const DEFAULT_DATABASE_PATH: &str = "notification.db";
pub const DEFAULT_MAX_NOTIFICATIONS_DISPLAY: i64 = 25;
pub const DEFAULT_CLEANUP_DAYS: i64 = 7;
pub const DEFAULT_NOTIFICATION_KEYWORDS: &str = "urgent,important,reminder,help,@everyone,@here";
pub const DEFAULT_LOG_FILE: &str = "bot.log";

/// Where settings are read from.
///
/// The process environment is the production source; tests use a plain map.
pub trait EnvSource {
    /// Merge any outside sources into this one before the first read.
    fn prepare(&self) {}

    fn var(&self, key: &str) -> Option<String>;
}

/// Reads from the current process environment, after merging `.env`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn prepare(&self) {
        // A missing .env file is fine; variables already set win.
        dotenv::dotenv().ok();
    }

    fn var(&self, key: &str) -> Option<String> {
        env::var(key).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// Severity threshold accepted by `LOG_LEVEL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warning,
    Error,
    Critical,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
            LogLevel::Critical => "CRITICAL",
        }
    }

    /// The tracing filter matching this threshold.
    ///
    /// tracing has no level above `ERROR`, so `Critical` shares its filter.
    pub fn level_filter(&self) -> LevelFilter {
        match self {
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warning => LevelFilter::WARN,
            LogLevel::Error | LogLevel::Critical => LevelFilter::ERROR,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses a level name case-insensitively. The error carries the rejected input.
impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARNING" => Ok(LogLevel::Warning),
            "ERROR" => Ok(LogLevel::Error),
            "CRITICAL" => Ok(LogLevel::Critical),
            _ => Err(s.to_string()),
        }
    }
}

/// Discord gateway capabilities the bot asks for. All enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntentsConfig {
    pub message_content: bool,
    pub guilds: bool,
    pub members: bool,
    pub guild_messages: bool,
    pub dm_messages: bool,
}

impl Default for IntentsConfig {
    fn default() -> Self {
        Self {
            message_content: true,
            guilds: true,
            members: true,
            guild_messages: true,
            dm_messages: true,
        }
    }
}

impl IntentsConfig {
    /// Capability names paired with their flag, in declaration order.
    pub fn entries(&self) -> [(&'static str, bool); 5] {
        [
            ("message_content", self.message_content),
            ("guilds", self.guilds),
            ("members", self.members),
            ("guild_messages", self.guild_messages),
            ("dm_messages", self.dm_messages),
        ]
    }
}

/// Configuration for the notification bot.
///
/// Built once at startup and never mutated afterwards; share it behind an
/// `Arc` when collaborators need it.
#[derive(Clone, PartialEq, Eq)]
pub struct Settings {
    /// Discord bot token; empty means unset
    pub discord_token: String,
    /// Prefix for text commands
    pub command_prefix: String,
    /// SQLite database file
    pub database_path: String,
    /// Maximum notifications shown in one listing
    pub max_notifications_display: i64,
    /// Age in days after which stored notifications are pruned
    pub cleanup_days: i64,
    /// Lower-cased keywords that mark a message as a notification
    pub notification_keywords: Vec<String>,
    /// Threshold for the log file
    pub log_level: LogLevel,
    /// Log file path
    pub log_file: String,
    /// Gateway intents requested from Discord
    pub intents: IntentsConfig,
}

impl Settings {
    /// Load settings from the process environment, merging `.env` first.
    ///
    /// A missing `.env` file is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if an integer or log level variable is set to
    /// a value that cannot be parsed.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_source(&ProcessEnv)
    }

    /// Build settings from any [`EnvSource`].
    ///
    /// Absent or empty variables fall back to their defaults; malformed
    /// values are reported instead of being replaced by the default.
    pub fn from_source(source: &impl EnvSource) -> Result<Self, ConfigError> {
        source.prepare();

        Ok(Self {
            discord_token: read(source, "DISCORD_TOKEN").unwrap_or_default(),
            command_prefix: read(source, "COMMAND_PREFIX")
                .unwrap_or_else(|| DEFAULT_COMMAND_PREFIX.to_string()),
            database_path: read(source, "DATABASE_PATH")
                .unwrap_or_else(|| DEFAULT_DATABASE_PATH.to_string()),
            max_notifications_display: read_integer(
                source,
                "MAX_NOTIFICATIONS_DISPLAY",
                DEFAULT_MAX_NOTIFICATIONS_DISPLAY,
            )?,
            cleanup_days: read_integer(source, "CLEANUP_DAYS", DEFAULT_CLEANUP_DAYS)?,
            notification_keywords: parse_keywords(
                &read(source, "NOTIFICATION_KEYWORDS")
                    .unwrap_or_else(|| DEFAULT_NOTIFICATION_KEYWORDS.to_string()),
            ),
            log_level: read_log_level(source, "LOG_LEVEL")?,
            log_file: read(source, "LOG_FILE").unwrap_or_else(|| DEFAULT_LOG_FILE.to_string()),
            intents: IntentsConfig::default(),
        })
    }

    /// Whether the settings allow the bot to start: the token must be set.
    pub fn validate(&self) -> bool {
        !self.discord_token.is_empty()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            discord_token: String::new(),
            command_prefix: DEFAULT_COMMAND_PREFIX.to_string(),
            database_path: DEFAULT_DATABASE_PATH.to_string(),
            max_notifications_display: DEFAULT_MAX_NOTIFICATIONS_DISPLAY,
            cleanup_days: DEFAULT_CLEANUP_DAYS,
            notification_keywords: parse_keywords(DEFAULT_NOTIFICATION_KEYWORDS),
            log_level: LogLevel::default(),
            log_file: DEFAULT_LOG_FILE.to_string(),
            intents: IntentsConfig::default(),
        }
    }
}

// The token never ends up in logs or panic messages.
impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = if self.discord_token.is_empty() {
            "<unset>"
        } else {
            "<redacted>"
        };

        f.debug_struct("Settings")
            .field("discord_token", &token)
            .field("command_prefix", &self.command_prefix)
            .field("database_path", &self.database_path)
            .field("max_notifications_display", &self.max_notifications_display)
            .field("cleanup_days", &self.cleanup_days)
            .field("notification_keywords", &self.notification_keywords)
            .field("log_level", &self.log_level)
            .field("log_file", &self.log_file)
            .field("intents", &self.intents)
            .finish()
    }
}

/// Split a comma-separated keyword list, trimming and lower-casing each entry.
///
/// Blank entries are dropped; order is preserved.
pub fn parse_keywords(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|keyword| keyword.trim().to_lowercase())
        .filter(|keyword| !keyword.is_empty())
        .collect()
}

fn read(source: &impl EnvSource, key: &str) -> Option<String> {
    source.var(key).filter(|value| !value.is_empty())
}

fn read_integer(source: &impl EnvSource, key: &'static str, default: i64) -> Result<i64, ConfigError> {
    match read(source, key) {
        Some(value) => value
            .trim()
            .parse::<i64>()
            .map_err(|source| ConfigError::InvalidInteger { key, value, source }),
        None => Ok(default),
    }
}

fn read_log_level(source: &impl EnvSource, key: &'static str) -> Result<LogLevel, ConfigError> {
    match read(source, key) {
        Some(value) => value
            .parse::<LogLevel>()
            .map_err(|value| ConfigError::InvalidLogLevel { key, value }),
        None => Ok(LogLevel::default()),
    }
}
