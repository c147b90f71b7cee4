//! Evidence typed data model (spec §3).

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceType {
    NetworkLog,
    SyscallTrace,
    FileAccess,
    ResourceSpike,
    Screenshot,
}

/// A single piece of corroboration attached to a quarantine request.
///
/// Payload contents are opaque and not retained long-term by this engine
/// (spec Non-goal); the `payload` field exists so a caller can attach a
/// pointer-sized blob (a hash, a short excerpt) without the core caring
/// about its structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evidence {
    #[serde(rename = "type")]
    pub kind: EvidenceType,
    pub description: String,
    #[serde(with = "base64_bytes")]
    pub payload: Vec<u8>,
    pub timestamp: DateTime<Utc>,
}

impl Evidence {
    pub fn new(
        kind: EvidenceType,
        description: impl Into<String>,
        payload: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            kind,
            description: description.into(),
            payload: payload.into(),
            timestamp: Utc::now(),
        }
    }

    /// Evidence synthesized by the classifier for an auto-quarantine
    /// trigger match (spec §4.2): always a `syscall_trace` entry whose
    /// description names the predicate source.
    pub fn from_trigger(predicate_source: &str) -> Self {
        Self {
            kind: EvidenceType::SyscallTrace,
            description: format!("Auto-classification trigger: {}", predicate_source),
            payload: Vec::new(),
            timestamp: Utc::now(),
        }
    }
}

mod base64_bytes {
    use super::*;

    pub fn serialize<S: Serializer>(bytes: &[u8], s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&BASE64.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(d)?;
        BASE64
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trigger_evidence_has_expected_shape() {
        let ev = Evidence::from_trigger("cpu > 8000");
        assert_eq!(ev.kind, EvidenceType::SyscallTrace);
        assert_eq!(ev.description, "Auto-classification trigger: cpu > 8000");
        assert!(ev.payload.is_empty());
    }

    #[test]
    fn payload_round_trips_through_json() {
        let ev = Evidence::new(EvidenceType::NetworkLog, "capture", vec![1, 2, 3, 255]);
        let json = serde_json::to_string(&ev).unwrap();
        let back: Evidence = serde_json::from_str(&json).unwrap();
        assert_eq!(back.payload, vec![1, 2, 3, 255]);
        assert_eq!(back.kind, EvidenceType::NetworkLog);
    }
}
