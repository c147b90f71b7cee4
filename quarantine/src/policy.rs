//! C5 — quarantine policy and isolation configuration (spec §3).

use serde::{Deserialize, Serialize};

use crate::trigger::AutoQuarantineTrigger;

/// Network posture applied to a quarantined workload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NetworkMode {
    None,
    Restricted,
    Monitored,
}

impl NetworkMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            NetworkMode::None => "none",
            NetworkMode::Restricted => "restricted",
            NetworkMode::Monitored => "monitored",
        }
    }
}

/// Per-workload monitoring toggles applied while quarantined.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct MonitoringToggles {
    pub strace: bool,
    pub auditd: bool,
    pub record_network: bool,
}

/// Where quarantined-workload state is kept on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageBackend {
    pub isolated_dir: String,
    pub snapshot_based: bool,
}

impl Default for StorageBackend {
    fn default() -> Self {
        Self {
            isolated_dir: "/var/lib/quarantine".to_string(),
            snapshot_based: true,
        }
    }
}

/// The isolation regime applied by default to quarantined workloads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IsolationConfig {
    pub network_mode: NetworkMode,
    pub allowed_egress: Vec<String>,
    pub seccomp_profile: String,
    pub storage: StorageBackend,
    pub monitoring: MonitoringToggles,
}

impl IsolationConfig {
    /// An empty-string constructor, used to model "the caller didn't
    /// specify anything" before [`QuarantinePolicy::enforce_defaults`]
    /// normalizes it.
    fn unset() -> Self {
        Self {
            network_mode: NetworkMode::None,
            allowed_egress: Vec::new(),
            seccomp_profile: String::new(),
            storage: StorageBackend {
                isolated_dir: String::new(),
                snapshot_based: false,
            },
            monitoring: MonitoringToggles::default(),
        }
    }
}

/// The active quarantine policy: triggers, dedicated quarantine nodes,
/// isolation defaults, and retention.
pub struct QuarantinePolicy {
    pub auto_triggers: Vec<AutoQuarantineTrigger>,
    pub quarantine_nodes: Vec<String>,
    pub isolation: IsolationConfig,
    pub max_retention_secs: u64,
}

impl QuarantinePolicy {
    /// Builds a policy from caller-supplied (possibly partially empty)
    /// isolation settings, applying the default-enforcement invariant
    /// (spec §3): an empty profile name becomes `quarantine`, an empty
    /// storage dir gets a default isolated directory plus snapshot-based
    /// isolation. `network_mode` has no "empty" representation in this
    /// typed model — it is already one of the three variants, and `None`
    /// is itself the spec's default, so no further normalization is
    /// needed for it.
    pub fn new(
        auto_triggers: Vec<AutoQuarantineTrigger>,
        quarantine_nodes: Vec<String>,
        isolation: IsolationConfig,
        max_retention_secs: u64,
    ) -> Self {
        let mut policy = Self {
            auto_triggers,
            quarantine_nodes,
            isolation,
            max_retention_secs,
        };
        policy.enforce_defaults();
        policy
    }

    pub fn with_defaults() -> Self {
        Self::new(
            crate::classifier::TriggerClassifier::default_triggers(),
            Vec::new(),
            IsolationConfig::unset(),
            0,
        )
    }

    /// Applies the default-enforcement invariant in place. Called both
    /// at construction time and from `set_policy` (spec §8: "After
    /// set_policy(p) with empty defaults, the stored policy has network
    /// mode none and profile name quarantine").
    pub fn enforce_defaults(&mut self) {
        if self.isolation.seccomp_profile.is_empty() {
            self.isolation.seccomp_profile = "quarantine".to_string();
        }
        if self.isolation.storage.isolated_dir.is_empty() {
            self.isolation.storage = StorageBackend::default();
        }
    }
}
