use std::fmt::{self, Write as _};

use chrono::Local;
use tracing::field::{Field, Visit};
use tracing::level_filters::LevelFilter;
use tracing::{Event, Level, Metadata, Subscriber};
use tracing_subscriber::fmt::format::{FormatEvent, FormatFields, Writer};
use tracing_subscriber::fmt::FmtContext;
use tracing_subscriber::registry::LookupSpan;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Field carrying the name of a [`super::Logger`]; printed in the name column.
pub(crate) const LOGGER_FIELD: &str = "logger";

/// Third-party targets that only get through at `WARN` or above.
pub const QUIET_TARGETS: &[&str] = &["serenity", "serenity::http"];
const QUIET_LEVEL: LevelFilter = LevelFilter::WARN;

/// Level name in the DEBUG/INFO/WARNING/ERROR vocabulary.
pub fn level_name(level: &Level) -> &'static str {
    match *level {
        Level::TRACE | Level::DEBUG => "DEBUG",
        Level::INFO => "INFO",
        Level::WARN => "WARNING",
        Level::ERROR => "ERROR",
    }
}

/// Write one record as `timestamp | LEVEL | name | message`, without newline.
pub fn write_record(
    out: &mut impl fmt::Write,
    timestamp: &str,
    level: &Level,
    name: &str,
    message: &str,
) -> fmt::Result {
    write!(out, "{} | {:<8} | {:<20} | {}", timestamp, level_name(level), name, message)
}

fn is_quiet(target: &str) -> bool {
    QUIET_TARGETS.iter().any(|quiet| {
        target
            .strip_prefix(*quiet)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with("::"))
    })
}

/// Decides whether a record reaches one sink.
///
/// A record passes its logger's threshold first (the root level, or `WARN`
/// for the quiet third-party targets) and then the sink's own threshold.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SinkFilter {
    root: LevelFilter,
    sink: LevelFilter,
}

impl SinkFilter {
    pub(crate) fn new(root: LevelFilter, sink: LevelFilter) -> Self {
        Self { root, sink }
    }

    pub(crate) fn allows(&self, metadata: &Metadata<'_>) -> bool {
        let logger_level = if is_quiet(metadata.target()) {
            QUIET_LEVEL
        } else {
            self.root
        };

        logger_level >= *metadata.level() && self.sink >= *metadata.level()
    }
}

#[derive(Default)]
struct RecordFields {
    message: String,
    logger: Option<String>,
    extra: String,
}

impl Visit for RecordFields {
    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "message" => self.message.push_str(value),
            LOGGER_FIELD => self.logger = Some(value.to_string()),
            name => {
                let _ = write!(self.extra, " {name}={value}");
            }
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        match field.name() {
            "message" => {
                let _ = write!(self.message, "{value:?}");
            }
            LOGGER_FIELD => self.logger = Some(format!("{value:?}")),
            name => {
                let _ = write!(self.extra, " {name}={value:?}");
            }
        }
    }
}

/// Event formatter shared by the console and file sinks.
pub(crate) struct PipeFormat;

impl<S, N> FormatEvent<S, N> for PipeFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let mut fields = RecordFields::default();
        event.record(&mut fields);

        let metadata = event.metadata();
        let name = fields.logger.as_deref().unwrap_or_else(|| metadata.target());
        let timestamp = Local::now().format(TIMESTAMP_FORMAT).to_string();

        write_record(&mut writer, &timestamp, metadata.level(), name, &fields.message)?;
        writer.write_str(&fields.extra)?;
        writeln!(writer)
    }
}
