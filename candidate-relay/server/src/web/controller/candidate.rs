use axum::{
    extract::{Path, Query, State},
    Json,
};
use candidate_relay_core::model::{Candidate, CandidateUpdate, NewCandidate};
use relay_axum::EnvelopeJson;

use crate::{
    entity::{CandidateListParams, DeleteCandidateResponse},
    web::controller::Result,
    ServiceState,
};

/// Capture a candidate
///
/// The candidate gets a fresh id and a visibility matrix showing every field
/// to every recipient class.
#[utoipa::path(
    post,
    operation_id = "create_candidate",
    path = "/api/v1/candidates",
    request_body = NewCandidate,
    responses(
        (status = 201, description = "Candidate created", body = Candidate),
        (status = 400, description = "Missing name, or missing or malformed email")
    ),
    tag = "Candidates"
)]
pub async fn create_candidate(
    State(state): State<ServiceState>,
    Json(request): Json<NewCandidate>,
) -> Result<EnvelopeJson<Candidate>> {
    let candidate = state.candidate_service.create(request).await?;
    Ok(EnvelopeJson::created(candidate))
}

/// List candidates, oldest first
#[utoipa::path(
    get,
    operation_id = "list_candidates",
    path = "/api/v1/candidates",
    params(CandidateListParams),
    responses(
        (status = 200, body = Vec<Candidate>)
    ),
    tag = "Candidates"
)]
pub async fn list_candidates(
    State(state): State<ServiceState>,
    Query(params): Query<CandidateListParams>,
) -> Result<EnvelopeJson<Vec<Candidate>>> {
    let candidates = state.candidate_service.list(params.search.as_deref()).await?;
    Ok(EnvelopeJson::ok(candidates))
}

#[utoipa::path(
    get,
    operation_id = "get_candidate",
    path = "/api/v1/candidates/{id}",
    params(("id" = String, Path, description = "Candidate id")),
    responses(
        (status = 200, body = Candidate),
        (status = 404, description = "Candidate not found")
    ),
    tag = "Candidates"
)]
pub async fn get_candidate(
    State(state): State<ServiceState>,
    Path(id): Path<String>,
) -> Result<EnvelopeJson<Candidate>> {
    Ok(EnvelopeJson::ok(state.candidate_service.get(&id).await?))
}

/// Edit a candidate
///
/// Members left out are unchanged; an empty string clears an optional field.
#[utoipa::path(
    patch,
    operation_id = "update_candidate",
    path = "/api/v1/candidates/{id}",
    params(("id" = String, Path, description = "Candidate id")),
    request_body = CandidateUpdate,
    responses(
        (status = 200, body = Candidate),
        (status = 400, description = "Invalid edit"),
        (status = 404, description = "Candidate not found")
    ),
    tag = "Candidates"
)]
pub async fn update_candidate(
    State(state): State<ServiceState>,
    Path(id): Path<String>,
    Json(request): Json<CandidateUpdate>,
) -> Result<EnvelopeJson<Candidate>> {
    Ok(EnvelopeJson::ok(state.candidate_service.update(&id, request).await?))
}

/// Delete a candidate and its visibility settings
#[utoipa::path(
    delete,
    operation_id = "delete_candidate",
    path = "/api/v1/candidates/{id}",
    params(("id" = String, Path, description = "Candidate id")),
    responses(
        (status = 200, body = DeleteCandidateResponse),
        (status = 404, description = "Candidate not found")
    ),
    tag = "Candidates"
)]
pub async fn delete_candidate(
    State(state): State<ServiceState>,
    Path(id): Path<String>,
) -> Result<EnvelopeJson<DeleteCandidateResponse>> {
    state.candidate_service.delete(&id).await?;
    Ok(EnvelopeJson::ok(DeleteCandidateResponse { id }))
}
