// FIXME: remove this after this utoipa issue is fixed: https://github.com/juhaku/utoipa/pull/1423
#![allow(clippy::needless_for_each)]
mod candidate;
mod email;
mod error;
mod visibility;

use axum::{routing, Extension, Router};
use candidate_relay_core::{
    content::EmailContent,
    model::{
        Candidate, CandidateUpdate, NewCandidate, RecipientClass, VisibilityMatrix,
        VisibilityToggle,
    },
    ServerInfo,
};
use relay_axum::EnvelopeJson;
use utoipa::OpenApi;

pub use self::error::{Error, Result};
use crate::{
    entity::{
        BulkVisibilityRequest, DeleteCandidateResponse, SendEmailRequest, SendEmailResponse,
        ToggleVisibilityRequest,
    },
    ServiceState,
};

pub fn api_v1_router(service_state: &ServiceState) -> Router {
    let routes = Router::new()
        .route("/v1/info", routing::get(server_info))
        .route(
            "/v1/candidates",
            routing::post(candidate::create_candidate).get(candidate::list_candidates),
        )
        .route(
            "/v1/candidates/:id",
            routing::get(candidate::get_candidate)
                .patch(candidate::update_candidate)
                .delete(candidate::delete_candidate),
        )
        .route(
            "/v1/candidates/:id/visibility",
            routing::get(visibility::get_visibility).put(visibility::replace_visibility),
        )
        .route(
            "/v1/candidates/:id/visibility/toggle",
            routing::post(visibility::toggle_visibility),
        )
        .route(
            "/v1/candidates/:id/visibility/bulk",
            routing::post(visibility::set_visibility_for_class),
        )
        .route("/v1/candidates/:id/emails", routing::get(email::preview_all_emails))
        .route("/v1/candidates/:id/emails/:recipient", routing::get(email::preview_email))
        .route("/v1/candidates/:id/emails/:recipient/send", routing::post(email::send_email));

    Router::new().nest("/api", routes).with_state(service_state.clone())
}

/// Get server info
#[utoipa::path(
    get,
    operation_id = "get_server_info",
    path = "/api/v1/info",
    responses(
        (status = 200, body = ServerInfo)
    )
)]
pub async fn server_info(
    Extension(server_info): Extension<ServerInfo>,
) -> Result<EnvelopeJson<ServerInfo>> {
    Ok(EnvelopeJson::ok(server_info))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        server_info,
        candidate::create_candidate,
        candidate::list_candidates,
        candidate::get_candidate,
        candidate::update_candidate,
        candidate::delete_candidate,
        visibility::get_visibility,
        visibility::replace_visibility,
        visibility::toggle_visibility,
        visibility::set_visibility_for_class,
        email::preview_all_emails,
        email::preview_email,
        email::send_email,
    ),
    components(schemas(
        ServerInfo,
        Candidate,
        NewCandidate,
        CandidateUpdate,
        DeleteCandidateResponse,
        RecipientClass,
        VisibilityMatrix,
        VisibilityToggle,
        ToggleVisibilityRequest,
        BulkVisibilityRequest,
        EmailContent,
        SendEmailRequest,
        SendEmailResponse,
    )),
    tags(
        (name = "Candidates", description = "Candidate capture and search"),
        (name = "Visibility", description = "Per-recipient field visibility"),
        (name = "Emails", description = "Email preview and delivery")
    )
)]
pub struct ApiDoc;
