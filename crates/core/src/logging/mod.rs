//! # Logging Module
//!
//! Console and rotating-file sinks behind an explicit [`LoggingContext`].
//!
//! Both sinks share one line format:
//!
//! ```text
//! 2024-05-01 12:00:00 | INFO     | root                 | Starting Discord Notification Bot...
//! ```
//!
//! The console sink always uses an `INFO` threshold; the file sink follows the
//! requested level. Re-running [`LoggingContext::setup`] replaces the sinks
//! rather than adding to them.

mod format;
mod rotating;

use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::level_filters::LevelFilter;
use tracing::{Dispatch, Metadata};
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriter, MakeWriterExt};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{Layer, Registry, fmt, reload};

use crate::errors::LoggingError;
use crate::settings::LogLevel;

use format::{PipeFormat, SinkFilter};

pub use format::{QUIET_TARGETS, TIMESTAMP_FORMAT, level_name, write_record};
pub use rotating::{LOG_BACKUP_COUNT, MAX_LOG_BYTES, RotatingFile};

/// Name of the logger returned by [`LoggingContext::setup`].
pub const ROOT_LOGGER: &str = "root";

type SinkLayer = Box<dyn Layer<Registry> + Send + Sync>;
type ConsoleFactory = Box<dyn Fn() -> BoxMakeWriter + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkKind {
    Console,
    File,
}

/// Description of one installed sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkInfo {
    pub kind: SinkKind,
    pub threshold: LevelFilter,
    pub path: Option<PathBuf>,
}

/// Owns the log sinks of the process.
///
/// Created once at startup and handed to whatever needs to log. The sinks
/// live behind a reload handle, so [`setup`](Self::setup) can be called again
/// without stacking duplicate outputs.
pub struct LoggingContext {
    dispatch: Dispatch,
    handle: reload::Handle<Vec<SinkLayer>, Registry>,
    console: ConsoleFactory,
    sinks: Mutex<Vec<SinkInfo>>,
    max_bytes: u64,
    backup_count: usize,
}

impl LoggingContext {
    /// A context whose console sink writes to stdout. No sinks are active
    /// until [`setup`](Self::setup) runs.
    pub fn new() -> Self {
        Self::with_console_writer(std::io::stdout)
    }

    /// A context whose console sink writes to `writer` instead of stdout.
    pub fn with_console_writer<W>(writer: W) -> Self
    where
        W: for<'a> MakeWriter<'a> + Clone + Send + Sync + 'static,
    {
        let (layer, handle) = reload::Layer::new(Vec::<SinkLayer>::new());
        let dispatch = Dispatch::new(Registry::default().with(layer));

        Self {
            dispatch,
            handle,
            console: Box::new(move || BoxMakeWriter::new(writer.clone())),
            sinks: Mutex::new(Vec::new()),
            max_bytes: MAX_LOG_BYTES,
            backup_count: LOG_BACKUP_COUNT,
        }
    }

    /// Roll the log file over at `max_bytes`, keeping `backup_count` old files.
    /// Applies from the next [`setup`](Self::setup).
    pub fn with_rotation(mut self, max_bytes: u64, backup_count: usize) -> Self {
        self.max_bytes = max_bytes;
        self.backup_count = backup_count;
        self
    }

    /// Install the console and rotating file sinks, replacing any previous ones.
    ///
    /// # Arguments
    ///
    /// * `level` - Root threshold, also used by the file sink
    /// * `log_file` - Log file path; its parent directory is created if missing
    ///
    /// # Returns
    ///
    /// * `Ok(Logger)` - The root logger of this context
    /// * `Err` - If the directory or file cannot be created
    pub fn setup(
        &self,
        level: LogLevel,
        log_file: impl AsRef<Path>,
    ) -> Result<Logger, LoggingError> {
        let path = log_file.as_ref();
        ensure_parent_dir(path)?;

        let file = RotatingFile::open(path, self.max_bytes, self.backup_count).map_err(|source| {
            LoggingError::OpenFile {
                path: path.to_path_buf(),
                source,
            }
        })?;

        let root = level.level_filter();
        let console_filter = SinkFilter::new(root, LevelFilter::INFO);
        let file_filter = SinkFilter::new(root, root);

        let console_writer =
            (self.console)().with_filter(move |meta: &Metadata<'_>| console_filter.allows(meta));
        let file_writer =
            Mutex::new(file).with_filter(move |meta: &Metadata<'_>| file_filter.allows(meta));

        let sinks: Vec<SinkLayer> = vec![
            fmt::layer::<Registry>()
                .event_format(PipeFormat)
                .with_writer(console_writer)
                .boxed(),
            fmt::layer::<Registry>()
                .event_format(PipeFormat)
                .with_writer(file_writer)
                .boxed(),
        ];
        // Callsite interest is rebuilt against the current default dispatcher,
        // so this context has to be it while the layers are swapped.
        tracing::dispatcher::with_default(&self.dispatch, || self.handle.reload(sinks))?;

        *self.sinks.lock().unwrap_or_else(PoisonError::into_inner) = vec![
            SinkInfo {
                kind: SinkKind::Console,
                threshold: LevelFilter::INFO,
                path: None,
            },
            SinkInfo {
                kind: SinkKind::File,
                threshold: root,
                path: Some(path.to_path_buf()),
            },
        ];

        Ok(self.logger(ROOT_LOGGER))
    }

    /// The sinks currently installed, console first.
    pub fn sinks(&self) -> Vec<SinkInfo> {
        self.sinks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// A named logger writing through this context.
    pub fn logger(&self, name: &str) -> Logger {
        Logger {
            name: Arc::from(name),
            dispatch: self.dispatch.clone(),
        }
    }

    pub fn dispatch(&self) -> &Dispatch {
        &self.dispatch
    }

    /// Make this context the process-wide default, so plain `tracing` macros
    /// from other crates reach the same sinks. Can only succeed once per process.
    pub fn install_global(&self) -> Result<(), LoggingError> {
        tracing::dispatcher::set_global_default(self.dispatch.clone())?;
        Ok(())
    }
}

impl Default for LoggingContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a context and install its sinks in one step.
pub fn setup_logging(
    level: LogLevel,
    log_file: impl AsRef<Path>,
) -> Result<LoggingContext, LoggingError> {
    let context = LoggingContext::new();
    context.setup(level, log_file)?;
    Ok(context)
}

fn ensure_parent_dir(path: &Path) -> Result<(), LoggingError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(|source| LoggingError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })
        }
        _ => Ok(()),
    }
}

/// Named handle for emitting records into a [`LoggingContext`].
///
/// The name is printed in the name column instead of the module path.
#[derive(Clone)]
pub struct Logger {
    name: Arc<str>,
    dispatch: Dispatch,
}

impl Logger {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn debug(&self, message: impl Display) {
        tracing::dispatcher::with_default(&self.dispatch, || {
            tracing::debug!(logger = %self.name, "{}", message)
        });
    }

    pub fn info(&self, message: impl Display) {
        tracing::dispatcher::with_default(&self.dispatch, || {
            tracing::info!(logger = %self.name, "{}", message)
        });
    }

    pub fn warning(&self, message: impl Display) {
        tracing::dispatcher::with_default(&self.dispatch, || {
            tracing::warn!(logger = %self.name, "{}", message)
        });
    }

    pub fn error(&self, message: impl Display) {
        tracing::dispatcher::with_default(&self.dispatch, || {
            tracing::error!(logger = %self.name, "{}", message)
        });
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger").field("name", &self.name).finish()
    }
}
