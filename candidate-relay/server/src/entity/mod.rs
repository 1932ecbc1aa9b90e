mod email;
mod visibility;

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

pub use self::{
    email::{SendEmailRequest, SendEmailResponse},
    visibility::{BulkVisibilityRequest, RecipientSelection, ToggleVisibilityRequest},
};

/// Query of `GET /api/v1/candidates`.
#[derive(Clone, Debug, Default, Deserialize, IntoParams, Serialize)]
#[into_params(parameter_in = Query)]
pub struct CandidateListParams {
    /// Case-insensitive filter over name, email, company, location and skills
    pub search: Option<String>,
}

/// Identifier of a deleted candidate
#[derive(Clone, Debug, Deserialize, Serialize, ToSchema)]
pub struct DeleteCandidateResponse {
    pub id: String,
}
