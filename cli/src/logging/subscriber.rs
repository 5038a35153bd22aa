//! Global `tracing` subscriber: one console layer and one log-file layer.
//!
//! Both layers render an event the same way up to decoration: its
//! [`Style`] is derived from level and target once, then drawn with colors
//! on the console or with a timestamp in the file.
use std::fs;
use std::io::Write as _;
use std::sync::Mutex;

use tracing::Level;
use tracing::field::{Field, Visit};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use super::utils::{format_datetime, format_time, log_file_path, strip_ansi};

/// Target used by [`Logger::stage`](super::Logger::stage).
pub(super) const STAGE_TARGET: &str = "punkt::stage";

/// Target used by [`Logger::dry_run`](super::Logger::dry_run).
pub(super) const DRY_RUN_TARGET: &str = "punkt::dry_run";

/// Environment variable holding an `EnvFilter` directive for the console,
/// e.g. `PUNKT_LOG=debug` or `PUNKT_LOG=punkt_cli::tasks=debug`.
const CONSOLE_FILTER_ENV: &str = "PUNKT_LOG";

/// How one event is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Style {
    Stage,
    DryRun,
    Error,
    Warn,
    Plain,
    Detail,
}

impl Style {
    fn of(level: Level, target: &str) -> Self {
        match level {
            Level::ERROR => Self::Error,
            Level::WARN => Self::Warn,
            Level::INFO => match target {
                STAGE_TARGET => Self::Stage,
                DRY_RUN_TARGET => Self::DryRun,
                _ => Self::Plain,
            },
            _ => Self::Detail,
        }
    }

    fn console(self, msg: &str) -> String {
        match self {
            Self::Stage => format!("\x1b[1;34m==>\x1b[0m \x1b[1m{msg}\x1b[0m"),
            Self::DryRun => format!("  \x1b[33m[DRY RUN]\x1b[0m {msg}"),
            Self::Error => format!("\x1b[31mERROR\x1b[0m {msg}"),
            Self::Warn => format!("\x1b[33mWARN\x1b[0m  {msg}"),
            Self::Plain => format!("  {msg}"),
            Self::Detail => format!("  \x1b[2m{msg}\x1b[0m"),
        }
    }

    fn file(self, timestamp: &str, msg: &str) -> String {
        let tag = match self {
            Self::Stage => return format!("[{timestamp}] ==> {msg}"),
            Self::DryRun => "[dry run] ",
            Self::Error => "[error] ",
            Self::Warn => "[warn] ",
            Self::Plain => "",
            Self::Detail => "[debug] ",
        };
        format!("[{timestamp}]     {tag}{msg}")
    }
}

/// Collects the `message` field of an event; other fields are ignored.
#[derive(Default)]
struct Message(String);

impl Visit for Message {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            value.clone_into(&mut self.0);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{value:?}");
        }
    }
}

fn style_and_message(event: &tracing::Event<'_>) -> (Style, String) {
    let metadata = event.metadata();
    let mut message = Message::default();
    event.record(&mut message);
    (Style::of(*metadata.level(), metadata.target()), message.0)
}

/// First lines of every log file.
fn run_header(version: &str, command: &str, started: &str) -> String {
    let rule = "=".repeat(42);
    format!("{rule}\npunkt {version} {command} {started}\n{rule}\n")
}

/// Appends every event to `<cache>/punkt/<command>.log`, timestamped and
/// with ANSI codes stripped.  The file is truncated when the layer is built.
#[derive(Debug)]
pub(super) struct FileLayer {
    file: Mutex<fs::File>,
}

impl FileLayer {
    /// Start a fresh log for `command`.
    ///
    /// Returns `None` when the cache directory or the file is unavailable;
    /// logging to the console still works in that case.
    pub(super) fn new(command: &str) -> Option<Self> {
        let path = log_file_path(command)?;
        let version =
            option_env!("PUNKT_VERSION").unwrap_or(concat!("dev-", env!("CARGO_PKG_VERSION")));
        fs::write(&path, run_header(version, command, &format_datetime())).ok()?;
        let file = fs::OpenOptions::new().append(true).open(&path).ok()?;
        Some(Self {
            file: Mutex::new(file),
        })
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for FileLayer {
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let (style, msg) = style_and_message(event);
        let line = style.file(&format_time(), &strip_ansi(&msg));
        if let Ok(mut file) = self.file.lock() {
            writeln!(file, "{line}").ok();
        }
    }
}

/// Console [`FormatEvent`](tracing_subscriber::fmt::FormatEvent) drawing
/// each event in its [`Style`].
struct ConsoleFormatter;

impl<S, N> tracing_subscriber::fmt::FormatEvent<S, N> for ConsoleFormatter
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    N: for<'a> tracing_subscriber::fmt::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &tracing_subscriber::fmt::FmtContext<'_, S, N>,
        mut writer: tracing_subscriber::fmt::format::Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        let (style, msg) = style_and_message(event);
        writeln!(writer, "{}", style.console(&msg))
    }
}

/// Console verbosity: `PUNKT_LOG` when set, otherwise `debug` with
/// `--verbose` and `info` without.
fn console_filter(verbose: bool) -> EnvFilter {
    let default = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    EnvFilter::builder()
        .with_default_directive(default.into())
        .with_env_var(CONSOLE_FILTER_ENV)
        .from_env_lossy()
}

/// Install the global subscriber.  Call once, before anything logs.
///
/// Warnings and errors go to stderr, everything else to stdout.  The log
/// file records `DEBUG` and above regardless of console verbosity.
pub fn init_subscriber(verbose: bool, command: &str) {
    use tracing_subscriber::fmt::writer::MakeWriterExt as _;
    use tracing_subscriber::{
        Layer as _, fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _,
    };

    let console = fmt::layer()
        .event_format(ConsoleFormatter)
        .with_writer(
            std::io::stderr
                .with_max_level(Level::WARN)
                .and(std::io::stdout.with_min_level(Level::INFO)),
        )
        .with_filter(console_filter(verbose));

    let file = FileLayer::new(command).map(|layer| layer.with_filter(LevelFilter::DEBUG));

    tracing_subscriber::registry().with(console).with(file).init();
}
