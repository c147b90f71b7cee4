//! C6 — SLO harness: latency sample recording, percentiles, target checks.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use quarantine_shared::errors::{QuarantineError, QuarantineResult};

use crate::metrics::{Labels, MetricsSink};

/// One declared latency budget. `percentile` is in `[0.0, 1.0]`.
#[derive(Debug, Clone)]
pub struct SloTarget {
    pub name: &'static str,
    pub metric: &'static str,
    pub target: Duration,
    pub percentile: f64,
    pub description: &'static str,
}

/// The four baseline targets (spec §4.5). Only `quarantine_routing_overhead`
/// is measured by this crate; the other three describe subsystems outside
/// this core and are declared here purely so [`SloHarness::report`] can
/// list them alongside the one this process actually enforces.
pub fn baseline_targets() -> Vec<SloTarget> {
    vec![
        SloTarget {
            name: "cold_start",
            metric: "cold_start_seconds",
            target: Duration::from_millis(200),
            percentile: 0.99,
            description: "sandbox cold-start latency",
        },
        SloTarget {
            name: "oci_conversion",
            metric: "oci_conversion_seconds",
            target: Duration::from_secs(30),
            percentile: 0.99,
            description: "OCI image conversion latency",
        },
        SloTarget {
            name: "quarantine_routing_overhead",
            metric: "quarantine_routing_overhead_seconds",
            target: Duration::from_millis(50),
            percentile: 0.99,
            description: "classify+route overhead added by the quarantine decision path",
        },
        SloTarget {
            name: "wake_from_hibernate",
            metric: "wake_from_hibernate_seconds",
            target: Duration::from_millis(100),
            percentile: 0.99,
            description: "snapshot resume latency",
        },
    ]
}

#[derive(Default)]
struct MetricSamples {
    successes: Vec<Duration>,
    errors: u64,
}

/// Per-metric summary produced by [`SloHarness::report`].
#[derive(Debug, Clone)]
pub struct MetricReport {
    pub metric: String,
    pub min: Duration,
    pub max: Duration,
    pub avg: Duration,
    pub p50: Duration,
    pub p95: Duration,
    pub p99: Duration,
    pub pass: Option<bool>,
    pub sample_count: usize,
    pub error_count: u64,
}

pub struct SloHarness {
    targets: HashMap<&'static str, SloTarget>,
    samples: Mutex<HashMap<String, MetricSamples>>,
    sink: Arc<dyn MetricsSink>,
}

impl SloHarness {
    pub fn new(sink: Arc<dyn MetricsSink>) -> Self {
        Self::with_targets(sink, baseline_targets())
    }

    pub fn with_targets(sink: Arc<dyn MetricsSink>, targets: Vec<SloTarget>) -> Self {
        Self {
            targets: targets.into_iter().map(|t| (t.metric, t)).collect(),
            samples: Mutex::new(HashMap::new()),
            sink,
        }
    }

    /// Appends a sample, forwards it as a histogram observation, and sets
    /// a `<metric>_slo_compliance` gauge to `1.0`/`0.0` depending on
    /// whether the sample was under the declared target (no-op if this
    /// metric has no declared target).
    pub fn record(&self, metric: &str, duration: Duration, labels: &Labels) {
        self.sink
            .observe_histogram(metric, duration.as_secs_f64(), labels);
        self.samples
            .lock()
            .entry(metric.to_string())
            .or_default()
            .successes
            .push(duration);

        if let Some(target) = self.targets.get(metric) {
            let compliant = if duration <= target.target { 1.0 } else { 0.0 };
            self.sink
                .set_gauge(&format!("{metric}_slo_compliance"), compliant, labels);
        }
    }

    pub fn record_error(&self, metric: &str, _error: &QuarantineError, labels: &Labels) {
        self.sink.incr_counter(&format!("{metric}_errors_total"), labels);
        self.samples.lock().entry(metric.to_string()).or_default().errors += 1;
    }

    /// Exact percentile (nearest-rank) over successful samples only.
    /// Errors on an empty sample set.
    pub fn percentile(&self, metric: &str, p: f64) -> QuarantineResult<Duration> {
        let samples = self.samples.lock();
        let Some(entry) = samples.get(metric) else {
            return Err(QuarantineError::NotFound(format!("no samples recorded for '{metric}'")));
        };
        if entry.successes.is_empty() {
            return Err(QuarantineError::NotFound(format!("no samples recorded for '{metric}'")));
        }
        let mut sorted = entry.successes.clone();
        sorted.sort();
        Ok(nearest_rank(&sorted, p))
    }

    /// Compares the declared percentile for `metric` against its target.
    pub fn check_slo(&self, metric: &str) -> QuarantineResult<(bool, String)> {
        let target = self
            .targets
            .get(metric)
            .ok_or_else(|| QuarantineError::NotFound(format!("no SLO target declared for '{metric}'")))?;
        let observed = self.percentile(metric, target.percentile)?;
        let pass = observed <= target.target;
        let message = format!(
            "{} p{:.0}: observed {:?}, target {:?} — {}",
            target.name,
            target.percentile * 100.0,
            observed,
            target.target,
            if pass { "PASS" } else { "FAIL" },
        );
        Ok((pass, message))
    }

    /// Per-metric report, sorted by metric name for stable output.
    pub fn report(&self) -> Vec<MetricReport> {
        let samples = self.samples.lock();
        let mut names: Vec<&String> = samples.keys().collect();
        names.sort();

        names
            .into_iter()
            .map(|metric| {
                let entry = &samples[metric];
                let mut sorted = entry.successes.clone();
                sorted.sort();
                let pass = self
                    .targets
                    .get(metric.as_str())
                    .filter(|_| !sorted.is_empty())
                    .map(|target| nearest_rank(&sorted, target.percentile) <= target.target);

                MetricReport {
                    metric: metric.clone(),
                    min: sorted.first().copied().unwrap_or_default(),
                    max: sorted.last().copied().unwrap_or_default(),
                    avg: average(&sorted),
                    p50: nearest_rank(&sorted, 0.50),
                    p95: nearest_rank(&sorted, 0.95),
                    p99: nearest_rank(&sorted, 0.99),
                    pass,
                    sample_count: sorted.len(),
                    error_count: entry.errors,
                }
            })
            .collect()
    }
}

fn nearest_rank(sorted: &[Duration], p: f64) -> Duration {
    if sorted.is_empty() {
        return Duration::ZERO;
    }
    let rank = ((p * sorted.len() as f64).ceil() as usize).clamp(1, sorted.len());
    sorted[rank - 1]
}

fn average(sorted: &[Duration]) -> Duration {
    if sorted.is_empty() {
        return Duration::ZERO;
    }
    let total: Duration = sorted.iter().sum();
    total / sorted.len() as u32
}
