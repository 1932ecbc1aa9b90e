use std::{
    fmt::{self, Display, Formatter},
    fs::{File, OpenOptions},
    path::PathBuf,
    str::FromStr,
    sync::Mutex,
};

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};
use snafu::{ResultExt, Snafu};
use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, registry::LookupSpan, util::SubscriberInitExt,
    EnvFilter, Layer,
};

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("Could not open log file {}, error: {source}", path.display()))]
    OpenLogFile { path: PathBuf, source: std::io::Error },

    #[snafu(display("Could not connect to journald, error: {source}"))]
    ConnectJournald { source: std::io::Error },

    #[snafu(display("Could not install tracing subscriber, error: {source}"))]
    InstallSubscriber { source: tracing_subscriber::util::TryInitError },

    #[snafu(display("Unknown log formatter `{value}`, expected `pretty` or `json`"))]
    UnknownFormatter { value: String },
}

/// Where and how log events are written.
///
/// Every field has a default so an empty `log:` section is valid.
// SAFETY: each sink is an independent on/off switch in the config file.
#[allow(clippy::struct_excessive_bools)]
#[serde_as]
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct LogConfig {
    #[serde(default = "LogConfig::default_filters")]
    pub filters: String,

    #[serde(default = "LogConfig::default_formatter")]
    #[serde_as(as = "DisplayFromStr")]
    pub formatter: LogFormatter,

    #[serde(default = "LogConfig::default_stdout")]
    pub stdout: bool,

    #[serde(default)]
    pub stderr: bool,

    #[serde(default)]
    pub journald: bool,

    #[serde(default)]
    pub file_path: Option<PathBuf>,

    /// Emit a span-close event carrying `time.busy` and `time.idle`.
    #[serde(default)]
    pub span_latency: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filters: Self::default_filters(),
            formatter: Self::default_formatter(),
            stdout: Self::default_stdout(),
            stderr: false,
            journald: false,
            file_path: None,
            span_latency: false,
        }
    }
}

impl LogConfig {
    #[inline]
    #[must_use]
    pub fn default_filters() -> String {
        "info,candidate_relay=info,candidate_relay_server=info,notification=info".to_string()
    }

    #[inline]
    #[must_use]
    pub const fn default_formatter() -> LogFormatter { LogFormatter::Pretty }

    #[inline]
    #[must_use]
    pub const fn default_stdout() -> bool { true }

    /// Install the global tracing subscriber described by this config.
    ///
    /// # Errors
    ///
    /// Returns an error if the log file cannot be opened, journald is
    /// unreachable, or a global subscriber is already installed.
    pub fn init(&self) -> Result<(), Error> {
        let span_events = if self.span_latency { FmtSpan::CLOSE } else { FmtSpan::NONE };

        let file = self
            .file_path
            .as_ref()
            .map(|path| {
                OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .context(OpenLogFileSnafu { path: path.clone() })
            })
            .transpose()?;

        let journald = if self.journald {
            Some(tracing_journald::layer().context(ConnectJournaldSnafu)?)
        } else {
            None
        };

        tracing_subscriber::registry()
            .with(EnvFilter::new(self.filters.as_str()))
            .with(journald)
            .with(file.map(|file| Sink::File(file).layer(self.formatter, span_events.clone())))
            .with(self.stdout.then(|| Sink::Stdout.layer(self.formatter, span_events.clone())))
            .with(self.stderr.then(|| Sink::Stderr.layer(self.formatter, span_events)))
            .try_init()
            .context(InstallSubscriberSnafu)
    }
}

enum Sink {
    Stdout,
    Stderr,
    File(File),
}

impl Sink {
    fn layer<S>(
        self,
        formatter: LogFormatter,
        span_events: FmtSpan,
    ) -> Box<dyn Layer<S> + Send + Sync + 'static>
    where
        S: tracing::Subscriber,
        for<'a> S: LookupSpan<'a>,
    {
        let fmt = tracing_subscriber::fmt::layer()
            .with_thread_ids(true)
            .with_target(true)
            .with_span_events(span_events);

        match (self, formatter) {
            (Self::Stdout, LogFormatter::Pretty) => {
                fmt.with_writer(std::io::stdout).pretty().boxed()
            }
            (Self::Stdout, LogFormatter::Json) => {
                fmt.with_writer(std::io::stdout).json().flatten_event(true).boxed()
            }
            (Self::Stderr, LogFormatter::Pretty) => {
                fmt.with_writer(std::io::stderr).pretty().boxed()
            }
            (Self::Stderr, LogFormatter::Json) => {
                fmt.with_writer(std::io::stderr).json().flatten_event(true).boxed()
            }
            (Self::File(file), LogFormatter::Pretty) => {
                fmt.with_writer(Mutex::new(file)).with_ansi(false).pretty().boxed()
            }
            (Self::File(file), LogFormatter::Json) => fmt
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .json()
                .flatten_event(true)
                .boxed(),
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum LogFormatter {
    Pretty,
    Json,
}

impl FromStr for LogFormatter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            _ => UnknownFormatterSnafu { value: s.to_string() }.fail(),
        }
    }
}

impl Display for LogFormatter {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pretty => f.write_str("pretty"),
            Self::Json => f.write_str("json"),
        }
    }
}
