use std::{future::Future, net::SocketAddr};

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing, Router,
};
use prometheus::{Encoder, TextEncoder};
use snafu::ResultExt;
use tower_http::trace::TraceLayer;

use crate::{error, Error, Metrics};

/// Serve `GET /metrics` in the Prometheus text format until `shutdown` resolves.
///
/// # Errors
///
/// Returns an error if the listener cannot be bound or the server fails.
pub async fn start_metrics_server<M, S>(
    listen_address: SocketAddr,
    metrics: M,
    shutdown: S,
) -> Result<(), Error>
where
    M: Metrics + 'static,
    S: Future<Output = ()> + Send + 'static,
{
    let listener = tokio::net::TcpListener::bind(listen_address)
        .await
        .context(error::BindMetricsListenerSnafu { listen_address })?;

    axum::serve(listener, router(metrics))
        .with_graceful_shutdown(shutdown)
        .await
        .context(error::ServeMetricsSnafu)
}

pub(crate) fn router<M>(metrics: M) -> Router
where
    M: Metrics + 'static,
{
    Router::new()
        .route("/metrics", routing::get(gather::<M>))
        .with_state(metrics)
        .layer(TraceLayer::new_for_http())
}

async fn gather<M>(State(metrics): State<M>) -> Response
where
    M: Metrics,
{
    let mut buffer = Vec::new();
    match TextEncoder::new().encode(&metrics.gather(), &mut buffer) {
        Ok(()) => ([(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)], buffer).into_response(),
        Err(err) => {
            tracing::error!("Failed to encode metrics, error: {err}");
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
        }
    }
}
