//! Request observability for the server.
//!
//! The three metric families the service exposes, registered once at
//! startup, plus the timing middleware that feeds two of them.

pub mod middleware;

use std::sync::Arc;

use sentio_core::error::Result;
use sentio_core::metrics::{CounterHandle, HistogramHandle, MetricsRegistry};

/// Latency buckets in seconds, spanning sub-10ms cache hits up to slow
/// model inference.
const LATENCY_BUCKETS_SECONDS: [f64; 11] = [
    0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

/// Metric families for the API, with handles registered up front.
pub struct ApiMetrics {
    registry: Arc<MetricsRegistry>,
    /// Requests completed, by endpoint path and method.
    pub requests_total: CounterHandle,
    /// Wall-clock request latency in seconds, by endpoint path.
    pub request_latency: HistogramHandle,
    /// Predictions served, by sentiment label.
    pub predictions_total: CounterHandle,
}

impl ApiMetrics {
    pub fn new() -> Result<Self> {
        let registry = Arc::new(MetricsRegistry::new());

        let requests_total = registry.register_counter(
            "sentio_requests_total",
            "Total number of HTTP requests",
            &["endpoint", "method"],
        )?;
        let request_latency = registry.register_histogram(
            "sentio_request_latency_seconds",
            "Request latency in seconds",
            &["endpoint"],
            &LATENCY_BUCKETS_SECONDS,
        )?;
        let predictions_total = registry.register_counter(
            "sentio_predictions_total",
            "Sentiment predictions made",
            &["sentiment"],
        )?;

        Ok(Self {
            registry,
            requests_total,
            request_latency,
            predictions_total,
        })
    }

    /// Render all registered metrics in exposition format.
    pub fn render(&self) -> String {
        self.registry.render()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn families_register_cleanly() {
        let m = ApiMetrics::new().unwrap();
        m.requests_total.inc(&["/predict", "POST"]);
        m.request_latency.observe(&["/predict"], 0.02);
        m.predictions_total.inc(&["NEGATIVE"]);

        let out = m.render();
        assert!(out.contains("sentio_requests_total{endpoint=\"/predict\",method=\"POST\"} 1"));
        assert!(out.contains("sentio_request_latency_seconds_count{endpoint=\"/predict\"} 1"));
        assert!(out.contains("sentio_predictions_total{sentiment=\"NEGATIVE\"} 1"));
    }
}
