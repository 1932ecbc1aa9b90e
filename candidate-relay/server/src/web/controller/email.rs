use axum::{
    extract::{Path, State},
    Json,
};
use candidate_relay_core::{content::EmailContent, model::RecipientClass};
use relay_axum::EnvelopeJson;

use crate::{
    entity::{SendEmailRequest, SendEmailResponse},
    web::controller::Result,
    ServiceState,
};

/// Preview the email of every recipient class
#[utoipa::path(
    get,
    operation_id = "preview_all_emails",
    path = "/api/v1/candidates/{id}/emails",
    params(("id" = String, Path, description = "Candidate id")),
    responses(
        (status = 200, body = Vec<EmailContent>),
        (status = 404, description = "Candidate or visibility settings not found")
    ),
    tag = "Emails"
)]
pub async fn preview_all_emails(
    State(state): State<ServiceState>,
    Path(id): Path<String>,
) -> Result<EnvelopeJson<Vec<EmailContent>>> {
    Ok(EnvelopeJson::ok(state.candidate_service.preview_all(&id).await?))
}

#[utoipa::path(
    get,
    operation_id = "preview_email",
    path = "/api/v1/candidates/{id}/emails/{recipient}",
    params(
        ("id" = String, Path, description = "Candidate id"),
        ("recipient" = String, Path, description = "`client`, `internal` or `superiors`")
    ),
    responses(
        (status = 200, body = EmailContent),
        (status = 400, description = "Unknown recipient class"),
        (status = 404, description = "Candidate or visibility settings not found")
    ),
    tag = "Emails"
)]
pub async fn preview_email(
    State(state): State<ServiceState>,
    Path((id, recipient)): Path<(String, String)>,
) -> Result<EnvelopeJson<EmailContent>> {
    let recipient = recipient.parse::<RecipientClass>()?;
    Ok(EnvelopeJson::ok(state.candidate_service.preview(&id, recipient).await?))
}

/// Send the email of one recipient class
///
/// All addresses are validated before anything is sent. The body is always
/// generated from the stored candidate and visibility settings.
#[utoipa::path(
    post,
    operation_id = "send_email",
    path = "/api/v1/candidates/{id}/emails/{recipient}/send",
    params(
        ("id" = String, Path, description = "Candidate id"),
        ("recipient" = String, Path, description = "`client`, `internal` or `superiors`")
    ),
    request_body = SendEmailRequest,
    responses(
        (status = 200, body = SendEmailResponse),
        (status = 400, description = "Malformed or missing addresses"),
        (status = 403, description = "Mail provider denied access"),
        (status = 404, description = "Candidate or visibility settings not found"),
        (status = 502, description = "Mail provider failed")
    ),
    tag = "Emails"
)]
pub async fn send_email(
    State(state): State<ServiceState>,
    Path((id, recipient)): Path<(String, String)>,
    Json(request): Json<SendEmailRequest>,
) -> Result<EnvelopeJson<SendEmailResponse>> {
    let recipient = recipient.parse::<RecipientClass>()?;
    Ok(EnvelopeJson::ok(state.candidate_service.send(&id, recipient, request).await?))
}
