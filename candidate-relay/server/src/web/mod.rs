pub mod controller;
pub mod error;

use std::{future::Future, net::SocketAddr};

use axum::{extract::Request, http, routing, Extension, Json, Router, ServiceExt};
use candidate_relay_core::ServerInfo;
use relay_axum::{envelope_response, ApiError, ErrorKind};
use snafu::ResultExt;
use tokio::net::TcpListener;
use tower::{Layer, ServiceBuilder};
use tower_http::{
    compression::CompressionLayer, normalize_path::NormalizePathLayer, trace::TraceLayer,
};
use utoipa::OpenApi;

pub use self::{controller::ApiDoc, error::Error};
use crate::service::CandidateService;

pub async fn new_api_server<ShutdownSignal>(
    socket_address: SocketAddr,
    service_state: ServiceState,
    server_info: ServerInfo,
    shutdown_signal: ShutdownSignal,
) -> Result<(), Error>
where
    ShutdownSignal: Future<Output = ()> + Send + 'static,
{
    let router = NormalizePathLayer::trim_trailing_slash()
        .layer(new_router(&service_state, server_info));
    let router = ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(router);

    let listener = TcpListener::bind(&socket_address).await.context(error::BindTcpServerSnafu)?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal)
        .await
        .map_err(|err| Error::ServeHttpServer { message: err.to_string() })
}

/// Every route of the HTTP API, with tracing and compression.
pub fn new_router(service_state: &ServiceState, server_info: ServerInfo) -> Router {
    let middleware_stack =
        ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(CompressionLayer::new());

    Router::new()
        // For load balancer default health check
        .route("/", routing::get(controller::server_info))
        .route("/openapi.json", routing::get(openapi_json))
        .merge(controller::api_v1_router(service_state))
        .layer(Extension(server_info))
        .layer(middleware_stack)
        .fallback(fallback)
}

// SAFETY: `axum` handler must be async
#[allow(clippy::unused_async)]
async fn fallback(uri: http::Uri) -> axum::response::Response {
    envelope_response! {
        status: http::StatusCode::NOT_FOUND,
        error: ApiError::new(ErrorKind::NotFound, format!("No route for {uri}"))
    }
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> { Json(ApiDoc::openapi()) }

#[derive(Clone)]
pub struct ServiceState {
    pub candidate_service: CandidateService,
}

impl ServiceState {
    #[must_use]
    pub const fn new(candidate_service: CandidateService) -> Self { Self { candidate_service } }
}
