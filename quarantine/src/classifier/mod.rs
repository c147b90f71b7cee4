//! C3 — evaluates auto-quarantine triggers over a fact snapshot.

use crate::evidence::Evidence;
use crate::facts::WorkloadFacts;
use crate::reason::QuarantineReason;
use crate::trigger::AutoQuarantineTrigger;

/// The verdict returned by a classifier: either "not quarantine" or a
/// quarantine reason plus the evidence that justifies it.
#[derive(Debug, Clone)]
pub struct ClassifierOutcome {
    pub quarantine: bool,
    pub reason: Option<QuarantineReason>,
    pub evidence: Vec<Evidence>,
}

impl ClassifierOutcome {
    pub fn not_quarantined() -> Self {
        Self {
            quarantine: false,
            reason: None,
            evidence: Vec::new(),
        }
    }

    fn triggered(reason: QuarantineReason, evidence: Evidence) -> Self {
        Self {
            quarantine: true,
            reason: Some(reason),
            evidence: vec![evidence],
        }
    }
}

/// A classifier is a pure function of a fact snapshot: no I/O, no shared
/// mutable state beyond its own (immutable-after-construction) trigger
/// list, safe to call concurrently from any number of threads.
pub trait Classifier: Send + Sync {
    fn classify(&self, facts: &WorkloadFacts) -> ClassifierOutcome;
}

/// Evaluates a fixed, ordered list of [`AutoQuarantineTrigger`]s.
///
/// Triggers are tried in declared order; the first one whose predicate
/// evaluates to `true` wins outright, even if a later trigger would also
/// match. Disabled triggers are never evaluated. A trigger whose
/// predicate failed to compile, or raises during evaluation, is treated
/// as a non-match and the scan continues — it never aborts the loop and
/// is never surfaced as an error to the caller.
pub struct TriggerClassifier {
    triggers: Vec<AutoQuarantineTrigger>,
}

impl TriggerClassifier {
    pub fn new(triggers: Vec<AutoQuarantineTrigger>) -> Self {
        Self { triggers }
    }

    /// The trigger set shipped by the library (spec §4.2).
    pub fn default_triggers() -> Vec<AutoQuarantineTrigger> {
        vec![
            AutoQuarantineTrigger::new("cpu > 8000", QuarantineReason::ResourceAbuse, true),
            AutoQuarantineTrigger::new("mem > 16384", QuarantineReason::ResourceAbuse, true),
            AutoQuarantineTrigger::new(
                r#"metadata["untrusted"] == "true""#,
                QuarantineReason::UntrustedSource,
                true,
            ),
            AutoQuarantineTrigger::new(
                "network_egress > 1000000000",
                QuarantineReason::NetworkAnomaly,
                true,
            ),
            AutoQuarantineTrigger::new(
                r#"metadata["security_scan_failed"] == "true""#,
                QuarantineReason::SecurityScan,
                true,
            ),
        ]
    }

    pub fn with_defaults() -> Self {
        Self::new(Self::default_triggers())
    }

    pub fn triggers(&self) -> &[AutoQuarantineTrigger] {
        &self.triggers
    }
}

impl Classifier for TriggerClassifier {
    fn classify(&self, facts: &WorkloadFacts) -> ClassifierOutcome {
        for trigger in &self.triggers {
            if !trigger.is_armed() {
                continue;
            }
            let Some(compiled) = trigger.compiled() else {
                continue;
            };
            match compiled.evaluate(facts) {
                Ok(true) => {
                    let evidence = Evidence::from_trigger(compiled.source());
                    return ClassifierOutcome::triggered(trigger.reason(), evidence);
                }
                Ok(false) => continue,
                Err(err) => {
                    tracing::debug!(
                        predicate = compiled.source(),
                        error = %err,
                        "predicate raised during evaluation, skipping trigger"
                    );
                    continue;
                }
            }
        }
        ClassifierOutcome::not_quarantined()
    }
}

/// Always returns "not quarantine". Callers inject this when
/// classification is disabled entirely.
pub struct NoopClassifier;

impl Classifier for NoopClassifier {
    fn classify(&self, _facts: &WorkloadFacts) -> ClassifierOutcome {
        ClassifierOutcome::not_quarantined()
    }
}
