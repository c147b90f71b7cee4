use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use quarantine_shared::cancellation::CancellationToken;
use quarantine_shared::errors::{QuarantineError, QuarantineResult};

use super::{ExaminationReport, QuarantineManager, QuarantineRequest};
use crate::classifier::Classifier;
use crate::facts::WorkloadFacts;
use crate::policy::{IsolationConfig, QuarantinePolicy};
use crate::reason::QuarantineReason;
use crate::record::{QuarantineRecord, QuarantineStatus, ReleaseApproval};
use crate::store::{QuarantineStore, RecordFilter};
use crate::evidence::Evidence;

/// Plain in-memory-grade manager: enforces the core preconditions and
/// state machine from the component contract, but emits no audit events
/// and applies no counters. [`super::HardenedQuarantineManager`] wraps
/// this to add both.
pub struct BaseQuarantineManager {
    store: Arc<dyn QuarantineStore>,
    classifier: Arc<dyn Classifier>,
    policy: RwLock<Arc<QuarantinePolicy>>,
}

impl BaseQuarantineManager {
    pub fn new(
        store: Arc<dyn QuarantineStore>,
        classifier: Arc<dyn Classifier>,
        policy: QuarantinePolicy,
    ) -> Self {
        let mut policy = policy;
        policy.enforce_defaults();
        Self {
            store,
            classifier,
            policy: RwLock::new(Arc::new(policy)),
        }
    }
}

#[async_trait]
impl QuarantineManager for BaseQuarantineManager {
    async fn quarantine(
        &self,
        req: QuarantineRequest,
        cancel: &CancellationToken,
    ) -> QuarantineResult<QuarantineRecord> {
        cancel.check()?;
        if req.auto && req.evidence.is_empty() {
            return Err(QuarantineError::Validation(
                "auto-quarantine requires evidence".to_string(),
            ));
        }
        let record = QuarantineRecord::new(req.id, req.reason, req.evidence, req.requester, req.auto);
        self.store.put(record.clone())?;
        Ok(record)
    }

    async fn release(
        &self,
        id: &str,
        approval: ReleaseApproval,
        cancel: &CancellationToken,
    ) -> QuarantineResult<()> {
        cancel.check()?;
        approval.validate()?;
        if let Some(mut record) = self.store.get(id)? {
            if !record.status.is_terminal() {
                record.transition_to(QuarantineStatus::Released);
                self.store.put(record)?;
            }
        }
        Ok(())
    }

    async fn examine(&self, id: &str, cancel: &CancellationToken) -> QuarantineResult<ExaminationReport> {
        cancel.check()?;
        if let Some(mut record) = self.store.get(id)? {
            if record.status == QuarantineStatus::Active {
                record.transition_to(QuarantineStatus::Examining);
            }
            record.examination_count += 1;
            self.store.put(record)?;
        }
        Ok(ExaminationReport::neutral())
    }

    async fn list(
        &self,
        filter: &RecordFilter,
        cancel: &CancellationToken,
    ) -> QuarantineResult<Vec<QuarantineRecord>> {
        cancel.check()?;
        self.store.list(filter)
    }

    async fn set_policy(&self, policy: QuarantinePolicy, cancel: &CancellationToken) -> QuarantineResult<()> {
        cancel.check()?;
        let mut policy = policy;
        policy.enforce_defaults();
        *self.policy.write() = Arc::new(policy);
        Ok(())
    }

    async fn classify(
        &self,
        facts: &WorkloadFacts,
        cancel: &CancellationToken,
    ) -> QuarantineResult<(bool, Option<QuarantineReason>, Vec<Evidence>)> {
        cancel.check()?;
        let outcome = self.classifier.classify(facts);
        Ok((outcome.quarantine, outcome.reason, outcome.evidence))
    }

    fn isolation_config(&self) -> IsolationConfig {
        self.policy.read().isolation.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::TriggerClassifier;
    use crate::evidence::EvidenceType;
    use crate::store::MemoryQuarantineStore;

    fn manager() -> BaseQuarantineManager {
        BaseQuarantineManager::new(
            Arc::new(MemoryQuarantineStore::new()),
            Arc::new(TriggerClassifier::with_defaults()),
            QuarantinePolicy::with_defaults(),
        )
    }

    #[tokio::test]
    async fn auto_quarantine_without_evidence_is_rejected() {
        let manager = manager();
        let cancel = CancellationToken::new();
        let req = QuarantineRequest::auto("w1", QuarantineReason::ResourceAbuse, Vec::new(), "scheduler");
        let err = manager.quarantine(req, &cancel).await.unwrap_err();
        assert!(matches!(err, QuarantineError::Validation(_)));
        assert!(manager.list(&RecordFilter::default(), &cancel).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn manual_quarantine_with_no_evidence_succeeds() {
        let manager = manager();
        let cancel = CancellationToken::new();
        let req = QuarantineRequest::manual("w1", QuarantineReason::ManualFlag, Vec::new(), "operator");
        let record = manager.quarantine(req, &cancel).await.unwrap();
        assert_eq!(record.status, QuarantineStatus::Active);
    }

    #[tokio::test]
    async fn release_of_unknown_id_is_not_an_error() {
        let manager = manager();
        let cancel = CancellationToken::new();
        let approval = ReleaseApproval::new("security-team", "false positive");
        manager.release("never-quarantined", approval, &cancel).await.unwrap();
    }

    #[tokio::test]
    async fn release_requires_approved_by() {
        let manager = manager();
        let cancel = CancellationToken::new();
        let approval = ReleaseApproval::new("", "reason");
        let err = manager.release("w1", approval, &cancel).await.unwrap_err();
        assert!(matches!(err, QuarantineError::Validation(_)));
    }

    #[tokio::test]
    async fn release_transitions_active_record_to_released() {
        let manager = manager();
        let cancel = CancellationToken::new();
        let req = QuarantineRequest::manual(
            "w1",
            QuarantineReason::ManualFlag,
            vec![Evidence::new(EvidenceType::FileAccess, "flagged", vec![])],
            "operator",
        );
        manager.quarantine(req, &cancel).await.unwrap();
        let approval = ReleaseApproval::new("security-team", "reviewed");
        manager.release("w1", approval, &cancel).await.unwrap();
        let record = manager.list(&RecordFilter::default(), &cancel).await.unwrap();
        assert_eq!(record[0].status, QuarantineStatus::Released);
    }

    #[tokio::test]
    async fn cancelled_token_short_circuits_before_any_mutation() {
        let manager = manager();
        let cancel = CancellationToken::new();
        cancel.cancel();
        let req = QuarantineRequest::manual("w1", QuarantineReason::ManualFlag, Vec::new(), "operator");
        let err = manager.quarantine(req, &cancel).await.unwrap_err();
        assert!(matches!(err, QuarantineError::Cancelled));
    }

    #[tokio::test]
    async fn set_policy_applies_default_enforcement_invariant() {
        let manager = manager();
        let cancel = CancellationToken::new();
        let empty_isolation = crate::policy::IsolationConfig {
            network_mode: crate::policy::NetworkMode::None,
            allowed_egress: Vec::new(),
            seccomp_profile: String::new(),
            storage: crate::policy::StorageBackend {
                isolated_dir: String::new(),
                snapshot_based: false,
            },
            monitoring: crate::policy::MonitoringToggles::default(),
        };
        manager
            .set_policy(QuarantinePolicy::new(Vec::new(), Vec::new(), empty_isolation, 0), &cancel)
            .await
            .unwrap();
        assert_eq!(manager.isolation_config().seccomp_profile, "quarantine");
    }
}
