//! Closed enum of reasons a workload can be quarantined.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuarantineReason {
    SuspiciousBehavior,
    PolicyViolation,
    NetworkAnomaly,
    ResourceAbuse,
    UntrustedSource,
    ManualFlag,
    SecurityScan,
}

impl QuarantineReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuarantineReason::SuspiciousBehavior => "suspicious_behavior",
            QuarantineReason::PolicyViolation => "policy_violation",
            QuarantineReason::NetworkAnomaly => "network_anomaly",
            QuarantineReason::ResourceAbuse => "resource_abuse",
            QuarantineReason::UntrustedSource => "untrusted_source",
            QuarantineReason::ManualFlag => "manual_flag",
            QuarantineReason::SecurityScan => "security_scan",
        }
    }
}

impl std::fmt::Display for QuarantineReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
