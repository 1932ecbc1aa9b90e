pub mod error;
mod server;
mod traits;

use prometheus::{IntCounter, IntCounterVec, Opts, Registry};
use snafu::ResultExt;

pub use self::{error::Error, server::start_metrics_server, traits::Metrics};

const CANDIDATES_CREATED: &str = "candidate_relay_candidates_created_total";
const EMAILS_SENT: &str = "candidate_relay_emails_sent_total";
const EMAILS_FAILED: &str = "candidate_relay_emails_failed_total";

/// Counters recorded by the candidate service.
///
/// Cloning is cheap; all clones share one registry.
#[derive(Clone, Debug)]
pub struct RelayMetrics {
    registry: Registry,
    candidates_created: IntCounter,
    emails_sent: IntCounterVec,
    emails_failed: IntCounterVec,
}

impl RelayMetrics {
    /// # Errors
    ///
    /// Returns an error if a counter cannot be created or registered.
    pub fn new() -> Result<Self, Error> {
        let registry = Registry::new();

        let candidates_created =
            IntCounter::new(CANDIDATES_CREATED, "Number of candidates captured")
                .context(error::CreateMetricSnafu { name: CANDIDATES_CREATED })?;
        let emails_sent = IntCounterVec::new(
            Opts::new(EMAILS_SENT, "Number of candidate emails accepted by the mail provider"),
            &["recipient"],
        )
        .context(error::CreateMetricSnafu { name: EMAILS_SENT })?;
        let emails_failed = IntCounterVec::new(
            Opts::new(EMAILS_FAILED, "Number of candidate emails that failed to send"),
            &["recipient", "reason"],
        )
        .context(error::CreateMetricSnafu { name: EMAILS_FAILED })?;

        registry
            .register(Box::new(candidates_created.clone()))
            .context(error::RegisterMetricSnafu { name: CANDIDATES_CREATED })?;
        registry
            .register(Box::new(emails_sent.clone()))
            .context(error::RegisterMetricSnafu { name: EMAILS_SENT })?;
        registry
            .register(Box::new(emails_failed.clone()))
            .context(error::RegisterMetricSnafu { name: EMAILS_FAILED })?;

        Ok(Self { registry, candidates_created, emails_sent, emails_failed })
    }

    pub fn candidate_created(&self) { self.candidates_created.inc(); }

    pub fn email_sent(&self, recipient: &str) {
        self.emails_sent.with_label_values(&[recipient]).inc();
    }

    pub fn email_failed(&self, recipient: &str, reason: &str) {
        self.emails_failed.with_label_values(&[recipient, reason]).inc();
    }
}

impl Metrics for RelayMetrics {
    fn gather(&self) -> Vec<prometheus::proto::MetricFamily> { self.registry.gather() }
}

#[cfg(test)]
mod tests {
    use axum::{body::Body, http::Request};
    use tower::ServiceExt;

    use super::*;

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn counter_value(metrics: &RelayMetrics, name: &str) -> u64 {
        metrics
            .gather()
            .into_iter()
            .filter(|family| family.get_name() == name)
            .flat_map(|family| {
                family
                    .get_metric()
                    .iter()
                    .map(|metric| metric.get_counter().get_value() as u64)
                    .collect::<Vec<_>>()
            })
            .sum()
    }

    #[test]
    fn counters_are_registered_once() {
        let metrics = RelayMetrics::new().unwrap();
        metrics.candidate_created();
        metrics.candidate_created();
        metrics.email_sent("client");
        metrics.email_failed("internal", "access_denied");

        assert_eq!(counter_value(&metrics, CANDIDATES_CREATED), 2);
        assert_eq!(counter_value(&metrics, EMAILS_SENT), 1);
        assert_eq!(counter_value(&metrics, EMAILS_FAILED), 1);
    }

    #[tokio::test]
    async fn metrics_endpoint_renders_text_format() {
        let metrics = RelayMetrics::new().unwrap();
        metrics.email_sent("superiors");

        let response = server::router(metrics)
            .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), axum::http::StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = String::from_utf8(body.to_vec()).unwrap();
        assert!(body.contains(r#"candidate_relay_emails_sent_total{recipient="superiors"} 1"#));
    }
}
