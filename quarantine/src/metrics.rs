//! Metrics interface (spec §6): counters, histograms, gauges, each
//! taking a name plus label pairs.

use std::collections::HashMap;

use parking_lot::Mutex;

pub type Labels = Vec<(&'static str, String)>;

/// Counter names are dotted (`typhon.quarantine.success`); histogram
/// names are snake_case seconds (`*_seconds`).
pub trait MetricsSink: Send + Sync {
    fn incr_counter(&self, name: &str, labels: &Labels);
    fn observe_histogram(&self, name: &str, value: f64, labels: &Labels);
    fn set_gauge(&self, name: &str, value: f64, labels: &Labels);
}

/// Forwards every call through `tracing` as a structured event, for
/// deployments with no dedicated metrics backend wired in yet.
#[derive(Default)]
pub struct TracingMetricsSink;

impl MetricsSink for TracingMetricsSink {
    fn incr_counter(&self, name: &str, _labels: &Labels) {
        tracing::debug!(metric = name, "counter incremented");
    }

    fn observe_histogram(&self, name: &str, value: f64, _labels: &Labels) {
        tracing::debug!(metric = name, value, "histogram observed");
    }

    fn set_gauge(&self, name: &str, value: f64, _labels: &Labels) {
        tracing::debug!(metric = name, value, "gauge set");
    }
}

/// In-memory test double: records the last gauge value and running
/// counter totals per metric name, ignoring labels.
#[derive(Default)]
pub struct InMemoryMetricsSink {
    counters: Mutex<HashMap<String, u64>>,
    gauges: Mutex<HashMap<String, f64>>,
    histograms: Mutex<HashMap<String, Vec<f64>>>,
}

impl InMemoryMetricsSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn counter(&self, name: &str) -> u64 {
        self.counters.lock().get(name).copied().unwrap_or(0)
    }

    pub fn gauge(&self, name: &str) -> Option<f64> {
        self.gauges.lock().get(name).copied()
    }

    pub fn histogram_samples(&self, name: &str) -> Vec<f64> {
        self.histograms.lock().get(name).cloned().unwrap_or_default()
    }
}

impl MetricsSink for InMemoryMetricsSink {
    fn incr_counter(&self, name: &str, _labels: &Labels) {
        *self.counters.lock().entry(name.to_string()).or_insert(0) += 1;
    }

    fn observe_histogram(&self, name: &str, value: f64, _labels: &Labels) {
        self.histograms.lock().entry(name.to_string()).or_default().push(value);
    }

    fn set_gauge(&self, name: &str, value: f64, _labels: &Labels) {
        self.gauges.lock().insert(name.to_string(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate_per_name() {
        let sink = InMemoryMetricsSink::new();
        sink.incr_counter("quarantine.success", &Labels::new());
        sink.incr_counter("quarantine.success", &Labels::new());
        sink.incr_counter("quarantine.failed", &Labels::new());
        assert_eq!(sink.counter("quarantine.success"), 2);
        assert_eq!(sink.counter("quarantine.failed"), 1);
        assert_eq!(sink.counter("never.touched"), 0);
    }

    #[test]
    fn gauge_set_overwrites_previous_value() {
        let sink = InMemoryMetricsSink::new();
        sink.set_gauge("routing_slo_compliance", 1.0, &Labels::new());
        sink.set_gauge("routing_slo_compliance", 0.0, &Labels::new());
        assert_eq!(sink.gauge("routing_slo_compliance"), Some(0.0));
    }
}
