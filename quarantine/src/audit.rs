//! Logger interface (spec §6): a string-keyed event sink for
//! security-relevant actions.

use std::collections::BTreeMap;

use serde_json::Value;

/// A single log field value. `BTreeMap` keeps field order stable for
/// tests and for the `TracingAuditLogger`'s rendered output.
pub type Fields = BTreeMap<String, Value>;

/// Expected event names (spec §6): `quarantine_request`,
/// `quarantine_release`, `auto_classification_triggered`,
/// `security_event`. Callers are not restricted to these, but the
/// manager only ever emits these four.
pub trait AuditLogger: Send + Sync {
    fn info(&self, event_name: &str, fields: Fields);
}

/// Routes audit events through `tracing`, one structured event per call.
/// Audit emission is best-effort: this implementation never returns an
/// error and never blocks on I/O beyond what the configured `tracing`
/// subscriber does.
#[derive(Default)]
pub struct TracingAuditLogger;

impl AuditLogger for TracingAuditLogger {
    fn info(&self, event_name: &str, fields: Fields) {
        let rendered = serde_json::to_string(&fields).unwrap_or_default();
        tracing::info!(event = event_name, fields = %rendered, "audit event");
    }
}

/// Captures emitted events in memory, for assertions in tests that
/// depend on audit ordering (spec §8 scenario 5).
#[derive(Default)]
pub struct RecordingAuditLogger {
    events: parking_lot::Mutex<Vec<(String, Fields)>>,
}

impl RecordingAuditLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn event_names(&self) -> Vec<String> {
        self.events.lock().iter().map(|(name, _)| name.clone()).collect()
    }

    pub fn events(&self) -> Vec<(String, Fields)> {
        self.events.lock().clone()
    }
}

impl AuditLogger for RecordingAuditLogger {
    fn info(&self, event_name: &str, fields: Fields) {
        self.events.lock().push((event_name.to_string(), fields));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_logger_preserves_emission_order() {
        let logger = RecordingAuditLogger::new();
        logger.info("quarantine_request", Fields::new());
        logger.info("network_override", Fields::new());
        logger.info("quarantine_release", Fields::new());
        assert_eq!(
            logger.event_names(),
            vec!["quarantine_request", "network_override", "quarantine_release"]
        );
    }
}
