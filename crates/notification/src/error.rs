use snafu::Snafu;

/// Errors that can occur in the notification crate.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    /// Failed to create mailer client.
    #[snafu(display("Failed to create mailer client: {message}"))]
    CreateMailer { message: String },

    /// The mail provider refused to issue an access token.
    #[snafu(display("Failed to obtain an access token from the mail provider: {message}"))]
    Authorize { message: String },

    /// An address could not be parsed as a mailbox.
    #[snafu(display("Invalid email address `{address}`"))]
    InvalidAddress { address: String },

    #[snafu(display("An email needs at least one `To` recipient"))]
    NoRecipient,

    /// Failed to build email.
    #[snafu(display("Failed to build email message: {source}"))]
    BuildEmail { source: lettre::error::Error },

    /// HTTP request failed.
    #[snafu(display("HTTP request failed: {source}"))]
    HttpRequest {
        /// The underlying reqwest error.
        source: reqwest::Error,
    },

    /// The mail provider answered 401 or 403.
    #[snafu(display("Mail provider denied access (status {status}): {message}"))]
    AccessDenied { status: u16, message: String },

    /// Failed to send email.
    #[snafu(display("Failed to send email (status {status}): {message}"))]
    SendEmail { status: u16, message: String },
}

impl Error {
    /// Whether the sender lacks authorization toward the mail provider.
    #[must_use]
    pub const fn is_access_denied(&self) -> bool {
        matches!(self, Self::Authorize { .. } | Self::AccessDenied { .. })
    }

    /// Short label describing the failure, suitable for metric labels.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::CreateMailer { .. } => "create_mailer",
            Self::Authorize { .. } | Self::AccessDenied { .. } => "access_denied",
            Self::InvalidAddress { .. } | Self::NoRecipient => "invalid_address",
            Self::BuildEmail { .. } => "build_email",
            Self::HttpRequest { .. } => "http_request",
            Self::SendEmail { .. } => "send_email",
        }
    }
}
