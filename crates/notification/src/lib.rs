//! # Notification Crate
//!
//! Delivers the HTML emails produced by Candidate Relay. Two clients are
//! provided:
//!
//! - [`gmail::Client`] posts RFC 5322 messages to the Gmail API using a
//!   service account with domain-wide delegation.
//! - [`console::Client`] writes the message to the tracing output, for
//!   development.

pub mod console;
mod error;
pub mod gmail;
mod message;

use async_trait::async_trait;

pub use self::error::Error;

/// Represents different types of notifications that can be sent.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Notification {
    /// An HTML email with explicit To, Cc and Bcc recipients.
    HtmlEmail {
        to: Vec<String>,
        cc: Vec<String>,
        bcc: Vec<String>,
        subject: String,
        /// Complete HTML document used as the message body.
        html: String,
    },
}

/// Trait for notification clients that can send notifications.
#[async_trait]
pub trait NotificationClient: Send + Sync {
    /// Sends a notification.
    ///
    /// # Errors
    ///
    /// Returns an error if the notification fails to send.
    async fn send_notification(&self, notification: &Notification) -> Result<(), Error>;
}
