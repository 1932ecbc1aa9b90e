//! Sends a short candidate profile through the Gmail API.
//!
//! ```bash
//! export GOOGLE_APPLICATION_CREDENTIALS="/path/to/service-account-key.json"
//! cargo run -p notification --example send_candidate_profile -- sender@yourdomain.com client@example.com
//! ```

use notification::{
    gmail::{Client, Config},
    Notification, NotificationClient,
};

#[tokio::main]
async fn main() -> Result<(), notification::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let impersonate_user = args.next().unwrap_or_else(|| "noreply@yourdomain.com".to_string());
    let to = args.next().unwrap_or_else(|| "client@example.com".to_string());

    let client = Client::new(Config { impersonate_user }).await?;

    let notification = Notification::HtmlEmail {
        to: vec![to],
        cc: Vec::new(),
        bcc: Vec::new(),
        subject: "Candidate Profile: Jane Doe - Acme".to_string(),
        html: "<div><h2>Candidate Information</h2><p>Please find below the details for Jane \
               Doe:</p></div>"
            .to_string(),
    };

    client.send_notification(&notification).await?;

    tracing::info!("Email sent");
    Ok(())
}
