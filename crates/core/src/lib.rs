//! Startup core of the notification bot: settings, logging, and the
//! bootstrap sequence that wires the store and the Discord client together.

pub mod bootstrap;
pub mod collaborators;
pub mod errors;
pub mod logging;
pub mod settings;

pub use bootstrap::{Bootstrap, Outcome};
pub use errors::{BootstrapError, ConfigError, LoggingError};
pub use logging::{Logger, LoggingContext, setup_logging};
pub use settings::{LogLevel, Settings};
