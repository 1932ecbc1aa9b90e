use std::path::PathBuf;

use snafu::Snafu;

use crate::config;

/// Result type alias for the CLI.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Error type for the CLI.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("{source}"))]
    Application { source: candidate_relay_server::Error },

    #[snafu(display("Could not initialize tokio runtime, error: {source}"))]
    InitializeTokioRuntime { source: tokio::io::Error },

    #[snafu(display("Could not initialize logger, error: {source}"))]
    InitializeLogger { source: relay_cli_common::config::LogError },

    #[snafu(display("{source}"))]
    Config { source: config::Error },

    #[snafu(display("Could not read file {}, error: {source}", path.display()))]
    ReadFile { path: PathBuf, source: std::io::Error },

    #[snafu(display("Could not parse JSON from {}, error: {source}", path.display()))]
    ParseJson { path: PathBuf, source: serde_json::Error },

    #[snafu(display("{source}"))]
    RenderEmail { source: candidate_relay_core::Error },

    #[snafu(display("Could not serialize rendered emails, error: {source}"))]
    SerializeOutput { source: serde_json::Error },
}

impl From<config::Error> for Error {
    fn from(source: config::Error) -> Self { Self::Config { source } }
}

impl From<candidate_relay_server::Error> for Error {
    fn from(source: candidate_relay_server::Error) -> Self { Self::Application { source } }
}

pub trait CommandError {
    fn exit_code(&self) -> exitcode::ExitCode;
}

impl CommandError for Error {
    fn exit_code(&self) -> exitcode::ExitCode {
        match self {
            Self::Application { .. }
            | Self::RenderEmail { .. }
            | Self::SerializeOutput { .. } => exitcode::SOFTWARE,
            Self::Config { .. } | Self::InitializeLogger { .. } => exitcode::CONFIG,
            Self::InitializeTokioRuntime { .. } => exitcode::IOERR,
            Self::ReadFile { .. } => exitcode::NOINPUT,
            Self::ParseJson { .. } => exitcode::DATAERR,
        }
    }
}
