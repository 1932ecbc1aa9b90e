use candidate_relay_core::model::VisibilityMatrix;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Stored visibility matrix of one candidate. Its record id is the candidate id.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipientSelection {
    pub candidate_id: String,
    pub field_visibility: VisibilityMatrix,
}

/// Flip one field for one recipient class
#[derive(Clone, Debug, Deserialize, Serialize, ToSchema)]
pub struct ToggleVisibilityRequest {
    #[schema(example = "skills")]
    pub field: String,

    #[schema(example = "internal")]
    pub recipient: String,
}

/// Show or hide every field for one recipient class
#[derive(Clone, Debug, Deserialize, Serialize, ToSchema)]
pub struct BulkVisibilityRequest {
    #[schema(example = "client")]
    pub recipient: String,

    #[schema(example = false)]
    pub visible: bool,
}
