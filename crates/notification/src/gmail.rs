//! Gmail API client sending HTML emails via domain-wide delegation.

use std::sync::Arc;

use async_trait::async_trait;
use base64::{engine::general_purpose::URL_SAFE, Engine as _};
use google_cloud_token::{TokenSource, TokenSourceProvider};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use snafu::ResultExt;

use crate::{error, message::build_html_email, Error, Notification, NotificationClient};

/// Gmail API scopes required for sending emails.
const SCOPES: [&str; 1] = ["https://www.googleapis.com/auth/gmail.send"];

const SEND_ENDPOINT: &str = "https://gmail.googleapis.com/gmail/v1/users/me/messages/send";

/// Configuration for the Gmail client.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Config {
    /// Google Workspace user to impersonate for domain-wide delegation.
    /// This will also be used as the sender address.
    pub impersonate_user: String,
}

/// Gmail API client for sending emails.
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    token_source: Arc<dyn TokenSource>,
    from_address: String,
}

impl Client {
    /// Creates a new Gmail client with domain-wide delegation.
    ///
    /// Credentials are discovered the way Google client libraries do it,
    /// `GOOGLE_APPLICATION_CREDENTIALS` first.
    ///
    /// # Errors
    ///
    /// Returns an error if no usable service account credentials are found.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use notification::gmail::{Client, Config};
    ///
    /// # async fn example() -> Result<(), notification::Error> {
    /// let config = Config { impersonate_user: "recruiter@example.com".to_string() };
    ///
    /// let client = Client::new(config).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn new(config: Config) -> Result<Self, Error> {
        tracing::info!(
            impersonate_user = %config.impersonate_user,
            "Using domain-wide delegation for Gmail API"
        );

        let auth_config = google_cloud_auth::project::Config::default()
            .with_scopes(&SCOPES)
            .with_sub(&config.impersonate_user);

        let token_source_provider =
            google_cloud_auth::token::DefaultTokenSourceProvider::new(auth_config)
                .await
                .map_err(|err| Error::CreateMailer { message: err.to_string() })?;

        Ok(Self {
            http: reqwest::Client::new(),
            token_source: token_source_provider.token_source(),
            from_address: config.impersonate_user,
        })
    }

    async fn authorization_header(&self) -> Result<String, Error> {
        let token = self
            .token_source
            .token()
            .await
            .map_err(|err| Error::Authorize { message: err.to_string() })?;

        Ok(if token.starts_with("Bearer ") { token } else { format!("Bearer {token}") })
    }
}

#[async_trait]
impl NotificationClient for Client {
    async fn send_notification(&self, notification: &Notification) -> Result<(), Error> {
        let email = build_html_email(&self.from_address, notification)?;
        let encoded_email = URL_SAFE.encode(email.formatted());

        let auth_header = self.authorization_header().await?;

        let response = self
            .http
            .post(SEND_ENDPOINT)
            .header(reqwest::header::AUTHORIZATION, auth_header)
            .json(&serde_json::json!({ "raw": encoded_email }))
            .send()
            .await
            .context(error::HttpRequestSnafu)?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), "Failed to send email: {message}");
            return Err(classify_failure(status, message));
        }

        let Notification::HtmlEmail { to, subject, .. } = notification;
        tracing::info!(to = ?to, subject = %subject, "Successfully sent email");
        Ok(())
    }
}

fn classify_failure(status: StatusCode, message: String) -> Error {
    if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
        Error::AccessDenied { status: status.as_u16(), message }
    } else {
        Error::SendEmail { status: status.as_u16(), message }
    }
}
