use prometheus::proto::MetricFamily;

pub trait Metrics: Clone + Send + Sync {
    fn gather(&self) -> Vec<MetricFamily>;
}
