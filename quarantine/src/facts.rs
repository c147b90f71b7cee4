//! Workload fact bundle — the input to the classifier.
//!
//! Facts are a snapshot handed in by the caller; the classifier never
//! reaches out for telemetry on its own (spec Non-goal: no dynamic
//! runtime telemetry ingestion).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A point-in-time snapshot of a workload's resource usage and metadata,
/// as observed by the caller (scheduler, registry, submission queue).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkloadFacts {
    /// Caller-assigned workload identifier.
    pub id: String,

    /// Template or image name the workload was instantiated from.
    pub template: String,

    /// Requested CPU, in millicores.
    pub cpu: f64,

    /// Requested memory, in MiB.
    pub mem: f64,

    /// Arbitrary string metadata attached to the workload.
    pub metadata: HashMap<String, String>,

    /// Cumulative egress bytes observed so far, if known.
    pub network_egress: Option<f64>,

    /// Cumulative ingress bytes observed so far, if known.
    pub network_ingress: Option<f64>,
}

impl WorkloadFacts {
    pub fn new(id: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            template: template.into(),
            cpu: 0.0,
            mem: 0.0,
            metadata: HashMap::new(),
            network_egress: None,
            network_ingress: None,
        }
    }

    pub fn with_cpu(mut self, cpu: f64) -> Self {
        self.cpu = cpu;
        self
    }

    pub fn with_mem(mut self, mem: f64) -> Self {
        self.mem = mem;
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn with_network_egress(mut self, bytes: f64) -> Self {
        self.network_egress = Some(bytes);
        self
    }

    pub fn with_network_ingress(mut self, bytes: f64) -> Self {
        self.network_ingress = Some(bytes);
        self
    }
}
