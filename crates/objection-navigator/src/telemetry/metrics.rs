//! Prometheus metrics for the rebuttal endpoint
//!
//! - `objection_navigator_requests_total` (counter) - requests by outcome
//! - `objection_navigator_completion_failures_total` (counter) - fallbacks by reason
//! - `objection_navigator_completion_duration_seconds` (histogram) - completion latency

use prometheus::{CounterVec, Encoder, Histogram, HistogramOpts, Opts, Registry, TextEncoder};

use super::RequestOutcome;

const NAMESPACE: &str = "objection_navigator";

/// Metrics owned by one service instance
///
/// Each instance holds its own [`Registry`], so several routers can live in
/// one process (as they do in tests).
pub struct RebuttalMetrics {
    registry: Registry,
    requests_total: CounterVec,
    completion_failures_total: CounterVec,
    completion_duration_seconds: Histogram,
}

impl RebuttalMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let requests_total = CounterVec::new(
            Opts::new("requests_total", "Rebuttal requests by outcome").namespace(NAMESPACE),
            &["outcome"],
        )?;

        let completion_failures_total = CounterVec::new(
            Opts::new(
                "completion_failures_total",
                "Completion calls replaced by the fallback, by reason",
            )
            .namespace(NAMESPACE),
            &["reason"],
        )?;

        let completion_duration_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "completion_duration_seconds",
                "Completion service call duration in seconds",
            )
            .namespace(NAMESPACE)
            .buckets(vec![0.25, 0.5, 1.0, 2.0, 4.0, 8.0, 12.0, 16.0, 20.0]),
        )?;

        registry.register(Box::new(requests_total.clone()))?;
        registry.register(Box::new(completion_failures_total.clone()))?;
        registry.register(Box::new(completion_duration_seconds.clone()))?;

        Ok(Self {
            registry,
            requests_total,
            completion_failures_total,
            completion_duration_seconds,
        })
    }

    pub fn record_request(&self, outcome: RequestOutcome) {
        self.requests_total
            .with_label_values(&[outcome.as_str()])
            .inc();
    }

    pub fn record_completion_failure(&self, reason: &str) {
        self.completion_failures_total
            .with_label_values(&[reason])
            .inc();
    }

    pub fn observe_completion(&self, duration_secs: f64) {
        self.completion_duration_seconds.observe(duration_secs);
    }

    pub fn request_count(&self, outcome: RequestOutcome) -> u64 {
        self.requests_total
            .with_label_values(&[outcome.as_str()])
            .get() as u64
    }

    /// Render all metrics in the Prometheus text exposition format
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_by_outcome() {
        let metrics = RebuttalMetrics::new().unwrap();
        metrics.record_request(RequestOutcome::Success);
        metrics.record_request(RequestOutcome::Fallback);
        metrics.record_request(RequestOutcome::Fallback);

        assert_eq!(metrics.request_count(RequestOutcome::Success), 1);
        assert_eq!(metrics.request_count(RequestOutcome::Fallback), 2);
        assert_eq!(metrics.request_count(RequestOutcome::Invalid), 0);
    }

    #[test]
    fn test_render_text_format() {
        let metrics = RebuttalMetrics::new().unwrap();
        metrics.record_request(RequestOutcome::Misconfigured);
        metrics.record_completion_failure("network");
        metrics.observe_completion(0.42);

        let text = metrics.render().unwrap();
        assert!(text.contains("objection_navigator_requests_total{outcome=\"misconfigured\"} 1"));
        assert!(text.contains("objection_navigator_completion_failures_total{reason=\"network\"} 1"));
        assert!(text.contains("objection_navigator_completion_duration_seconds_count 1"));
    }

    #[test]
    fn test_instances_are_independent() {
        let a = RebuttalMetrics::new().unwrap();
        let b = RebuttalMetrics::new().unwrap();
        a.record_request(RequestOutcome::Success);
        assert_eq!(b.request_count(RequestOutcome::Success), 0);
    }
}
