use axum::{
    extract::{Path, State},
    Json,
};
use candidate_relay_core::model::{CandidateField, RecipientClass, VisibilityMatrix};
use relay_axum::EnvelopeJson;

use crate::{
    entity::{BulkVisibilityRequest, ToggleVisibilityRequest},
    web::controller::Result,
    ServiceState,
};

#[utoipa::path(
    get,
    operation_id = "get_visibility",
    path = "/api/v1/candidates/{id}/visibility",
    params(("id" = String, Path, description = "Candidate id")),
    responses(
        (status = 200, description = "Field to `{client, internal, superiors}` map", body = VisibilityMatrix),
        (status = 404, description = "Candidate or visibility settings not found")
    ),
    tag = "Visibility"
)]
pub async fn get_visibility(
    State(state): State<ServiceState>,
    Path(id): Path<String>,
) -> Result<EnvelopeJson<VisibilityMatrix>> {
    Ok(EnvelopeJson::ok(state.candidate_service.visibility(&id).await?))
}

/// Replace the visibility settings
///
/// Fields without an entry are hidden from every recipient class.
#[utoipa::path(
    put,
    operation_id = "replace_visibility",
    path = "/api/v1/candidates/{id}/visibility",
    params(("id" = String, Path, description = "Candidate id")),
    request_body(content = VisibilityMatrix, description = "Field to `{client, internal, superiors}` map"),
    responses(
        (status = 200, body = VisibilityMatrix),
        (status = 404, description = "Candidate not found")
    ),
    tag = "Visibility"
)]
pub async fn replace_visibility(
    State(state): State<ServiceState>,
    Path(id): Path<String>,
    Json(matrix): Json<VisibilityMatrix>,
) -> Result<EnvelopeJson<VisibilityMatrix>> {
    Ok(EnvelopeJson::ok(state.candidate_service.replace_visibility(&id, matrix).await?))
}

#[utoipa::path(
    post,
    operation_id = "toggle_visibility",
    path = "/api/v1/candidates/{id}/visibility/toggle",
    params(("id" = String, Path, description = "Candidate id")),
    request_body = ToggleVisibilityRequest,
    responses(
        (status = 200, body = VisibilityMatrix),
        (status = 400, description = "Unknown field or recipient class"),
        (status = 404, description = "Candidate or visibility settings not found")
    ),
    tag = "Visibility"
)]
pub async fn toggle_visibility(
    State(state): State<ServiceState>,
    Path(id): Path<String>,
    Json(ToggleVisibilityRequest { field, recipient }): Json<ToggleVisibilityRequest>,
) -> Result<EnvelopeJson<VisibilityMatrix>> {
    let field = field.parse::<CandidateField>()?;
    let recipient = recipient.parse::<RecipientClass>()?;

    let matrix = state.candidate_service.toggle_visibility(&id, field, recipient).await?;
    Ok(EnvelopeJson::ok(matrix))
}

/// Select or deselect every field for one recipient class
#[utoipa::path(
    post,
    operation_id = "set_visibility_for_class",
    path = "/api/v1/candidates/{id}/visibility/bulk",
    params(("id" = String, Path, description = "Candidate id")),
    request_body = BulkVisibilityRequest,
    responses(
        (status = 200, body = VisibilityMatrix),
        (status = 400, description = "Unknown recipient class"),
        (status = 404, description = "Candidate or visibility settings not found")
    ),
    tag = "Visibility"
)]
pub async fn set_visibility_for_class(
    State(state): State<ServiceState>,
    Path(id): Path<String>,
    Json(BulkVisibilityRequest { recipient, visible }): Json<BulkVisibilityRequest>,
) -> Result<EnvelopeJson<VisibilityMatrix>> {
    let recipient = recipient.parse::<RecipientClass>()?;

    let matrix = state.candidate_service.set_visibility_for_class(&id, recipient, visible).await?;
    Ok(EnvelopeJson::ok(matrix))
}
