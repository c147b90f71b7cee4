//! C2 — quarantine record lifecycle and release approvals.

use chrono::{DateTime, Utc};
use quarantine_shared::errors::{QuarantineError, QuarantineResult};
use serde::{Deserialize, Serialize};

use crate::evidence::Evidence;
use crate::reason::QuarantineReason;

/// Lifecycle state of a [`QuarantineRecord`].
///
/// Valid transitions: `active → examining → (released | destroyed)` and
/// `active → (released | destroyed)` directly. `released` and
/// `destroyed` are terminal — [`can_transition_to`](QuarantineStatus::can_transition_to)
/// returns `false` for any transition out of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuarantineStatus {
    Active,
    Examining,
    Released,
    Destroyed,
}

impl QuarantineStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, QuarantineStatus::Released | QuarantineStatus::Destroyed)
    }

    pub fn can_transition_to(&self, target: QuarantineStatus) -> bool {
        use QuarantineStatus::*;
        match (self, target) {
            (Active, Examining | Released | Destroyed) => true,
            (Examining, Released | Destroyed) => true,
            _ => false,
        }
    }
}

/// A quarantined workload, keyed by workload id. A re-quarantine of the
/// same id replaces this record wholesale; the prior audit trail is
/// untouched since the audit log is append-only and separate from the
/// record store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuarantineRecord {
    pub id: String,
    pub reason: QuarantineReason,
    pub evidence: Vec<Evidence>,
    pub status: QuarantineStatus,
    pub quarantined_at: DateTime<Utc>,
    pub quarantined_by: String,
    pub examination_count: u32,
    pub auto: bool,
}

impl QuarantineRecord {
    pub fn new(
        id: impl Into<String>,
        reason: QuarantineReason,
        evidence: Vec<Evidence>,
        requester: impl Into<String>,
        auto: bool,
    ) -> Self {
        Self {
            id: id.into(),
            reason,
            evidence,
            status: QuarantineStatus::Active,
            quarantined_at: Utc::now(),
            quarantined_by: requester.into(),
            examination_count: 0,
            auto,
        }
    }

    /// Attempts the given transition, returning `false` (and leaving the
    /// record unchanged) if it is not a legal move from the current
    /// status.
    pub fn transition_to(&mut self, target: QuarantineStatus) -> bool {
        if !self.status.can_transition_to(target) {
            return false;
        }
        self.status = target;
        true
    }
}

/// A network-regime deviation granted at release time. Always audited,
/// always requires a justification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkOverride {
    pub network_mode: String,
    pub allowed_egress: Vec<String>,
    pub justification: String,
}

/// A seccomp-regime deviation granted at release time. Always audited,
/// always requires a justification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityOverride {
    pub seccomp_profile: String,
    pub justification: String,
}

/// The artifact authorizing a release. Append-only: once constructed, a
/// manager never mutates it, only records it in the audit log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseApproval {
    pub approved_by: String,
    pub reason: String,
    pub conditions: Option<String>,
    pub expiry: Option<DateTime<Utc>>,
    pub network_override: Option<NetworkOverride>,
    pub security_override: Option<SecurityOverride>,
}

impl ReleaseApproval {
    pub fn new(approved_by: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            approved_by: approved_by.into(),
            reason: reason.into(),
            conditions: None,
            expiry: None,
            network_override: None,
            security_override: None,
        }
    }

    pub fn with_network_override(mut self, o: NetworkOverride) -> Self {
        self.network_override = Some(o);
        self
    }

    pub fn with_security_override(mut self, o: SecurityOverride) -> Self {
        self.security_override = Some(o);
        self
    }

    /// Checks the preconditions every release must satisfy regardless of
    /// which manager layer enforces them: a non-empty approver, and a
    /// non-empty justification on any override that's present.
    pub fn validate(&self) -> QuarantineResult<()> {
        if self.approved_by.trim().is_empty() {
            return Err(QuarantineError::Validation(
                "release requires a non-empty approved_by".to_string(),
            ));
        }
        if let Some(network) = &self.network_override {
            if network.justification.trim().is_empty() {
                return Err(QuarantineError::Validation(
                    "network override requires a non-empty justification".to_string(),
                ));
            }
        }
        if let Some(security) = &self.security_override {
            if security.justification.trim().is_empty() {
                return Err(QuarantineError::Validation(
                    "security override requires a non-empty justification".to_string(),
                ));
            }
        }
        Ok(())
    }
}
