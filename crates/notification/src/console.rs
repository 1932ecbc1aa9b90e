//! Development client that logs emails instead of delivering them.

use async_trait::async_trait;

use crate::{message::build_html_email, Error, Notification, NotificationClient};

#[derive(Clone, Debug)]
pub struct Client {
    from_address: String,
}

impl Client {
    #[must_use]
    pub fn new(from_address: impl Into<String>) -> Self {
        Self { from_address: from_address.into() }
    }
}

#[async_trait]
impl NotificationClient for Client {
    async fn send_notification(&self, notification: &Notification) -> Result<(), Error> {
        let message = build_html_email(&self.from_address, notification)?;
        let Notification::HtmlEmail { to, cc, bcc, subject, .. } = notification;

        tracing::info!(
            to = ?to,
            cc = ?cc,
            bcc = ?bcc,
            subject = %subject,
            "--- EMAIL (console) ---\n{}\n--- END EMAIL ---",
            String::from_utf8_lossy(&message.formatted())
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn console_client_validates_before_logging() {
        let client = Client::new("recruiter@example.com");
        let notification = Notification::HtmlEmail {
            to: vec!["client@example.com".to_string()],
            cc: Vec::new(),
            bcc: Vec::new(),
            subject: "Internal Review: Jane Doe - Go, Rust, SQL".to_string(),
            html: "<p>hello</p>".to_string(),
        };
        client.send_notification(&notification).await.unwrap();

        let bad = Notification::HtmlEmail {
            to: vec!["also bad".to_string()],
            cc: Vec::new(),
            bcc: Vec::new(),
            subject: String::new(),
            html: String::new(),
        };
        assert!(client.send_notification(&bad).await.is_err());
    }
}
