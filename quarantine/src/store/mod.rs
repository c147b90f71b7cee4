//! C4 — quarantine record store: a pure data-structure component.

mod memory;
mod sqlite;

pub use memory::MemoryQuarantineStore;
pub use sqlite::SqliteQuarantineStore;

use chrono::{DateTime, Utc};
use quarantine_shared::errors::QuarantineResult;

use crate::record::{QuarantineRecord, QuarantineStatus};
use crate::reason::QuarantineReason;

/// Filter applied by [`QuarantineStore::list`]. Unset fields are
/// wildcards.
#[derive(Debug, Clone, Default)]
pub struct RecordFilter {
    pub id: Option<String>,
    pub status: Option<QuarantineStatus>,
    pub reason: Option<QuarantineReason>,
    pub time_from: Option<DateTime<Utc>>,
    pub time_to: Option<DateTime<Utc>>,
}

impl RecordFilter {
    pub fn matches(&self, record: &QuarantineRecord) -> bool {
        if let Some(id) = &self.id {
            if &record.id != id {
                return false;
            }
        }
        if let Some(status) = self.status {
            if record.status != status {
                return false;
            }
        }
        if let Some(reason) = self.reason {
            if record.reason != reason {
                return false;
            }
        }
        if let Some(from) = self.time_from {
            if record.quarantined_at < from {
                return false;
            }
        }
        if let Some(to) = self.time_to {
            if record.quarantined_at > to {
                return false;
            }
        }
        true
    }
}

/// C4: an index of quarantine records by workload id. Concurrent reads
/// are safe; concurrent writes are serialized by the owning manager, not
/// by this trait's implementations.
pub trait QuarantineStore: Send + Sync {
    fn put(&self, record: QuarantineRecord) -> QuarantineResult<()>;
    fn get(&self, id: &str) -> QuarantineResult<Option<QuarantineRecord>>;
    fn list(&self, filter: &RecordFilter) -> QuarantineResult<Vec<QuarantineRecord>>;
}
