use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MailerConfig {
    /// Write emails to the log instead of sending them.
    Console {
        #[serde(default = "MailerConfig::default_from")]
        from: String,
    },

    /// Send through the Gmail API. Credentials come from
    /// `GOOGLE_APPLICATION_CREDENTIALS`.
    Gmail { impersonate_user: String },
}

impl MailerConfig {
    #[inline]
    pub fn default_from() -> String { "recruiter@example.com".to_string() }
}

impl Default for MailerConfig {
    fn default() -> Self { Self::Console { from: Self::default_from() } }
}

impl From<MailerConfig> for candidate_relay_core::config::MailerConfig {
    fn from(config: MailerConfig) -> Self {
        match config {
            MailerConfig::Console { from } => Self::Console { from },
            MailerConfig::Gmail { impersonate_user } => Self::Gmail { impersonate_user },
        }
    }
}
