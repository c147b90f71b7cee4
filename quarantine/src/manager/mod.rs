//! C5 — Quarantine Manager: the capability set {Quarantine, Release,
//! Examine, List, SetPolicy} plus classification routing, specified over
//! a base implementation and a hardened decorator (spec §9: "use tagged
//! variants or interface abstractions; avoid deep inheritance chains").

mod base;
mod hardened;
mod report;

pub use base::BaseQuarantineManager;
pub use hardened::HardenedQuarantineManager;
pub use report::{ExaminationReport, Recommendation};

use async_trait::async_trait;
use quarantine_shared::cancellation::CancellationToken;
use quarantine_shared::errors::QuarantineResult;

use crate::facts::WorkloadFacts;
use crate::policy::{IsolationConfig, QuarantinePolicy};
use crate::reason::QuarantineReason;
use crate::record::{QuarantineRecord, ReleaseApproval};
use crate::store::RecordFilter;
use crate::evidence::Evidence;

/// Input to [`QuarantineManager::quarantine`].
#[derive(Debug, Clone)]
pub struct QuarantineRequest {
    pub id: String,
    pub reason: QuarantineReason,
    pub evidence: Vec<Evidence>,
    pub requester: String,
    pub auto: bool,
}

impl QuarantineRequest {
    pub fn manual(
        id: impl Into<String>,
        reason: QuarantineReason,
        evidence: Vec<Evidence>,
        requester: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            reason,
            evidence,
            requester: requester.into(),
            auto: false,
        }
    }

    pub fn auto(
        id: impl Into<String>,
        reason: QuarantineReason,
        evidence: Vec<Evidence>,
        requester: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            reason,
            evidence,
            requester: requester.into(),
            auto: true,
        }
    }
}

/// The capability set implemented by both [`BaseQuarantineManager`] and
/// [`HardenedQuarantineManager`].
#[async_trait]
pub trait QuarantineManager: Send + Sync {
    async fn quarantine(
        &self,
        req: QuarantineRequest,
        cancel: &CancellationToken,
    ) -> QuarantineResult<QuarantineRecord>;

    async fn release(
        &self,
        id: &str,
        approval: ReleaseApproval,
        cancel: &CancellationToken,
    ) -> QuarantineResult<()>;

    async fn examine(&self, id: &str, cancel: &CancellationToken) -> QuarantineResult<ExaminationReport>;

    async fn list(
        &self,
        filter: &RecordFilter,
        cancel: &CancellationToken,
    ) -> QuarantineResult<Vec<QuarantineRecord>>;

    async fn set_policy(&self, policy: QuarantinePolicy, cancel: &CancellationToken) -> QuarantineResult<()>;

    async fn classify(
        &self,
        facts: &WorkloadFacts,
        cancel: &CancellationToken,
    ) -> QuarantineResult<(bool, Option<QuarantineReason>, Vec<Evidence>)>;

    fn isolation_config(&self) -> IsolationConfig;
}
