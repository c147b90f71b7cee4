//! Examination report shape (spec §4.4).

use chrono::{DateTime, Utc};

/// What an examination recommends doing with a quarantined workload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recommendation {
    Release,
    Monitor,
    Destroy,
    Escalate,
}

#[derive(Debug, Clone)]
pub struct ExaminationReport {
    pub timestamp: DateTime<Utc>,
    pub findings: Vec<String>,
    pub risk_score: f64,
    pub recommendation: Recommendation,
}

impl ExaminationReport {
    /// The base manager's report: no findings derived from evidence, a
    /// neutral risk score, recommendation `monitor`. Richer
    /// implementations attach findings derived from the record's
    /// evidence (spec §4.4, §9 open question (b)).
    pub fn neutral() -> Self {
        Self {
            timestamp: Utc::now(),
            findings: Vec::new(),
            risk_score: 0.5,
            recommendation: Recommendation::Monitor,
        }
    }
}
