use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use quarantine_shared::cancellation::CancellationToken;
use quarantine_shared::errors::{QuarantineError, QuarantineResult};

use super::{ExaminationReport, QuarantineManager, QuarantineRequest};
use crate::audit::{AuditLogger, Fields};
use crate::facts::WorkloadFacts;
use crate::metrics::{Labels, MetricsSink};
use crate::policy::{IsolationConfig, QuarantinePolicy};
use crate::profiles::ProfileLibrary;
use crate::reason::QuarantineReason;
use crate::record::{QuarantineRecord, ReleaseApproval};
use crate::store::RecordFilter;
use crate::evidence::Evidence;

/// Decorator over any [`QuarantineManager`] that adds default isolation
/// lookups, audit emission, and counters — the "hardened" half of the
/// spec's base/hardened split (spec §9). The inner manager remains
/// responsible for preconditions and the state machine; this layer never
/// re-derives them, it only reacts to the inner call's outcome.
pub struct HardenedQuarantineManager {
    inner: Arc<dyn QuarantineManager>,
    audit: Arc<dyn AuditLogger>,
    metrics: Arc<dyn MetricsSink>,
    profiles: ProfileLibrary,
}

impl HardenedQuarantineManager {
    pub fn new(
        inner: Arc<dyn QuarantineManager>,
        audit: Arc<dyn AuditLogger>,
        metrics: Arc<dyn MetricsSink>,
        profiles: ProfileLibrary,
    ) -> Self {
        Self {
            inner,
            audit,
            metrics,
            profiles,
        }
    }

    fn security_event(&self, event_type: &str, mut fields: Fields) {
        fields.insert("event_type".to_string(), event_type.into());
        fields.insert("timestamp".to_string(), Utc::now().to_rfc3339().into());
        self.audit.info("security_event", fields);
    }
}

#[async_trait]
impl QuarantineManager for HardenedQuarantineManager {
    async fn quarantine(
        &self,
        req: QuarantineRequest,
        cancel: &CancellationToken,
    ) -> QuarantineResult<QuarantineRecord> {
        let id = req.id.clone();
        let reason = req.reason;
        let auto = req.auto;
        let isolation = self.isolation_config();

        let result = self.inner.quarantine(req, cancel).await;
        match &result {
            Ok(_) => {
                self.metrics.incr_counter("quarantine.success", &Labels::new());
                self.metrics.incr_counter(
                    if auto { "quarantine.auto" } else { "quarantine.manual" },
                    &Labels::new(),
                );
                let mut fields = Fields::new();
                fields.insert("event_type".to_string(), "quarantine".into());
                fields.insert("sandbox_id".to_string(), id.into());
                fields.insert("reason".to_string(), reason.as_str().into());
                fields.insert("auto".to_string(), auto.into());
                fields.insert("network_mode".to_string(), isolation.network_mode.as_str().into());
                fields.insert("seccomp".to_string(), isolation.seccomp_profile.clone().into());
                fields.insert("storage_dir".to_string(), isolation.storage.isolated_dir.clone().into());
                fields.insert("timestamp".to_string(), Utc::now().to_rfc3339().into());
                if let Ok(profile) = self.profiles.get_by_name(&isolation.seccomp_profile) {
                    fields.insert(
                        "seccomp_rule_count".to_string(),
                        (profile.syscall_count() as u64).into(),
                    );
                }
                self.audit.info("quarantine_request", fields);
            }
            Err(QuarantineError::Validation(_)) | Err(QuarantineError::Cancelled) => {
                // surfaces immediately, before any counter or audit emission
            }
            Err(_) => {
                self.metrics.incr_counter("quarantine.failed", &Labels::new());
            }
        }
        result
    }

    async fn release(
        &self,
        id: &str,
        approval: ReleaseApproval,
        cancel: &CancellationToken,
    ) -> QuarantineResult<()> {
        approval.validate()?;

        // Overrides are audited before the underlying release call, even
        // if that call later fails — an attempted override must never be
        // lost (spec §7).
        if let Some(network) = &approval.network_override {
            let mut fields = Fields::new();
            fields.insert("network_mode".to_string(), network.network_mode.clone().into());
            fields.insert("allowed_egress".to_string(), network.allowed_egress.clone().into());
            fields.insert("justification".to_string(), network.justification.clone().into());
            fields.insert("approved_by".to_string(), approval.approved_by.clone().into());
            fields.insert("sandbox_id".to_string(), id.into());
            self.security_event("network_override", fields);
            self.metrics.incr_counter("quarantine.network_override", &Labels::new());
        }
        if let Some(security) = &approval.security_override {
            let mut fields = Fields::new();
            fields.insert("seccomp_profile".to_string(), security.seccomp_profile.clone().into());
            fields.insert("justification".to_string(), security.justification.clone().into());
            fields.insert("approved_by".to_string(), approval.approved_by.clone().into());
            fields.insert("sandbox_id".to_string(), id.into());
            self.security_event("security_override", fields);
            self.metrics.incr_counter("quarantine.security_override", &Labels::new());
        }

        let result = self.inner.release(id, approval, cancel).await;
        match &result {
            Ok(()) => self.metrics.incr_counter("release_success", &Labels::new()),
            Err(_) => self.metrics.incr_counter("release_failed", &Labels::new()),
        }

        // A release audit event is emitted regardless of whether the id
        // was known (release is idempotent for missing ids, spec §4.4).
        let mut fields = Fields::new();
        fields.insert("event_type".to_string(), "release".into());
        fields.insert("sandbox_id".to_string(), id.into());
        fields.insert("timestamp".to_string(), Utc::now().to_rfc3339().into());
        self.audit.info("quarantine_release", fields);

        result
    }

    async fn examine(&self, id: &str, cancel: &CancellationToken) -> QuarantineResult<ExaminationReport> {
        self.inner.examine(id, cancel).await
    }

    async fn list(
        &self,
        filter: &RecordFilter,
        cancel: &CancellationToken,
    ) -> QuarantineResult<Vec<QuarantineRecord>> {
        self.inner.list(filter, cancel).await
    }

    async fn set_policy(&self, policy: QuarantinePolicy, cancel: &CancellationToken) -> QuarantineResult<()> {
        self.inner.set_policy(policy, cancel).await
    }

    async fn classify(
        &self,
        facts: &WorkloadFacts,
        cancel: &CancellationToken,
    ) -> QuarantineResult<(bool, Option<QuarantineReason>, Vec<Evidence>)> {
        let outcome = self.inner.classify(facts, cancel).await?;
        let (quarantine, reason, evidence) = &outcome;
        if *quarantine {
            self.metrics.incr_counter("classification.triggered", &Labels::new());
            if let Some(reason) = reason {
                self.metrics
                    .incr_counter(&format!("classification.reason.{}", reason.as_str()), &Labels::new());
            }
            let mut fields = Fields::new();
            fields.insert("event_type".to_string(), "auto_classification_triggered".into());
            fields.insert("sandbox_id".to_string(), facts.id.clone().into());
            fields.insert("timestamp".to_string(), Utc::now().to_rfc3339().into());
            if let Some(reason) = reason {
                fields.insert("reason".to_string(), reason.as_str().into());
            }
            self.audit.info("auto_classification_triggered", fields);
        } else {
            self.metrics.incr_counter("classification.passed", &Labels::new());
        }
        Ok(outcome)
    }

    fn isolation_config(&self) -> IsolationConfig {
        self.inner.isolation_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::RecordingAuditLogger;
    use crate::classifier::TriggerClassifier;
    use crate::evidence::EvidenceType;
    use crate::manager::BaseQuarantineManager;
    use crate::metrics::InMemoryMetricsSink;
    use crate::policy::QuarantinePolicy;
    use crate::record::{NetworkOverride, QuarantineStatus};
    use crate::store::MemoryQuarantineStore;

    fn hardened() -> (HardenedQuarantineManager, Arc<RecordingAuditLogger>, Arc<InMemoryMetricsSink>) {
        let base = BaseQuarantineManager::new(
            Arc::new(MemoryQuarantineStore::new()),
            Arc::new(TriggerClassifier::with_defaults()),
            QuarantinePolicy::with_defaults(),
        );
        let audit = Arc::new(RecordingAuditLogger::new());
        let metrics = Arc::new(InMemoryMetricsSink::new());
        let manager = HardenedQuarantineManager::new(
            Arc::new(base),
            audit.clone(),
            metrics.clone(),
            ProfileLibrary::new(),
        );
        (manager, audit, metrics)
    }

    #[tokio::test]
    async fn quarantine_emits_audit_event_and_counters() {
        let (manager, audit, metrics) = hardened();
        let cancel = CancellationToken::new();
        let req = QuarantineRequest::manual(
            "w1",
            QuarantineReason::ManualFlag,
            Vec::new(),
            "operator",
        );
        manager.quarantine(req, &cancel).await.unwrap();
        assert_eq!(audit.event_names(), vec!["quarantine_request"]);
        assert_eq!(metrics.counter("quarantine.success"), 1);
        assert_eq!(metrics.counter("quarantine.manual"), 1);
    }

    #[tokio::test]
    async fn failed_validation_emits_no_audit_or_counters() {
        let (manager, audit, metrics) = hardened();
        let cancel = CancellationToken::new();
        let req = QuarantineRequest::auto("w1", QuarantineReason::ResourceAbuse, Vec::new(), "scheduler");
        let err = manager.quarantine(req, &cancel).await.unwrap_err();
        assert!(matches!(err, QuarantineError::Validation(_)));
        assert!(audit.event_names().is_empty());
        assert_eq!(metrics.counter("quarantine.failed"), 0);
    }

    #[tokio::test]
    async fn release_with_network_override_audits_in_spec_order() {
        let (manager, audit, metrics) = hardened();
        let cancel = CancellationToken::new();
        let req = QuarantineRequest::manual(
            "w1",
            QuarantineReason::ManualFlag,
            vec![Evidence::new(EvidenceType::NetworkLog, "capture", vec![])],
            "operator",
        );
        manager.quarantine(req, &cancel).await.unwrap();

        let approval = ReleaseApproval::new("security-team", "reviewed").with_network_override(NetworkOverride {
            network_mode: "monitored".to_string(),
            allowed_egress: vec!["a.example".to_string()],
            justification: "analysis".to_string(),
        });
        manager.release("w1", approval, &cancel).await.unwrap();

        assert_eq!(
            audit.event_names(),
            vec!["quarantine_request", "security_event", "quarantine_release"]
        );
        assert_eq!(metrics.counter("quarantine.network_override"), 1);

        let override_fields = &audit.events()[1].1;
        assert_eq!(
            override_fields.get("event_type").and_then(|v| v.as_str()),
            Some("network_override")
        );
    }

    #[tokio::test]
    async fn release_of_unknown_id_still_emits_release_audit_event() {
        let (manager, audit, _metrics) = hardened();
        let cancel = CancellationToken::new();
        let approval = ReleaseApproval::new("security-team", "no-op release");
        manager.release("never-quarantined", approval, &cancel).await.unwrap();
        assert_eq!(audit.event_names(), vec!["quarantine_release"]);
    }

    #[tokio::test]
    async fn override_without_justification_is_rejected_before_any_audit() {
        let (manager, audit, _metrics) = hardened();
        let cancel = CancellationToken::new();
        let approval = ReleaseApproval::new("security-team", "reviewed").with_network_override(NetworkOverride {
            network_mode: "monitored".to_string(),
            allowed_egress: Vec::new(),
            justification: String::new(),
        });
        let err = manager.release("w1", approval, &cancel).await.unwrap_err();
        assert!(matches!(err, QuarantineError::Validation(_)));
        assert!(audit.event_names().is_empty());
    }

    #[tokio::test]
    async fn classify_trigger_emits_audit_event_and_reason_counter() {
        let (manager, audit, metrics) = hardened();
        let cancel = CancellationToken::new();
        let facts = WorkloadFacts::new("w1", "blaze").with_cpu(9000.0);
        let (quarantined, reason, _evidence) = manager.classify(&facts, &cancel).await.unwrap();
        assert!(quarantined);
        assert_eq!(reason, Some(QuarantineReason::ResourceAbuse));
        assert_eq!(audit.event_names(), vec!["auto_classification_triggered"]);
        assert_eq!(metrics.counter("classification.triggered"), 1);
        assert_eq!(metrics.counter("classification.reason.resource_abuse"), 1);
    }

    #[tokio::test]
    async fn classify_no_match_emits_passed_counter_only() {
        let (manager, audit, metrics) = hardened();
        let cancel = CancellationToken::new();
        let facts = WorkloadFacts::new("w1", "blaze");
        let (quarantined, _reason, _evidence) = manager.classify(&facts, &cancel).await.unwrap();
        assert!(!quarantined);
        assert!(audit.event_names().is_empty());
        assert_eq!(metrics.counter("classification.passed"), 1);
    }

    #[tokio::test]
    async fn record_persists_through_hardened_wrapper() {
        let (manager, _audit, _metrics) = hardened();
        let cancel = CancellationToken::new();
        let req = QuarantineRequest::manual("w1", QuarantineReason::ManualFlag, Vec::new(), "operator");
        manager.quarantine(req, &cancel).await.unwrap();
        let records = manager.list(&RecordFilter::default(), &cancel).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].status, QuarantineStatus::Active);
    }
}
