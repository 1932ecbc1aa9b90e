use candidate_relay_core::model::RecipientClass;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Addressing of a candidate email.
///
/// Each list is a comma-separated string of addresses.
#[derive(Clone, Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct SendEmailRequest {
    #[schema(example = "client@example.com, hiring@example.com")]
    pub to: String,

    #[serde(default)]
    pub cc: Option<String>,

    #[serde(default)]
    pub bcc: Option<String>,

    /// Replaces the generated subject line when not blank
    #[serde(default)]
    pub subject: Option<String>,
}

/// What was handed to the mail provider
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendEmailResponse {
    pub recipient: RecipientClass,
    pub subject: String,
    pub to: Vec<String>,
    pub cc: Vec<String>,
    pub bcc: Vec<String>,
}
