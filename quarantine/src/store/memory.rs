use std::collections::HashMap;

use parking_lot::RwLock;
use quarantine_shared::errors::QuarantineResult;

use super::{QuarantineStore, RecordFilter};
use crate::record::QuarantineRecord;

/// Reference in-memory implementation of [`QuarantineStore`]. A single
/// lock suffices: the spec requires linearizable `put`/`get`/`list`, not
/// lock-free concurrency.
#[derive(Default)]
pub struct MemoryQuarantineStore {
    records: RwLock<HashMap<String, QuarantineRecord>>,
}

impl MemoryQuarantineStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl QuarantineStore for MemoryQuarantineStore {
    fn put(&self, record: QuarantineRecord) -> QuarantineResult<()> {
        self.records.write().insert(record.id.clone(), record);
        Ok(())
    }

    fn get(&self, id: &str) -> QuarantineResult<Option<QuarantineRecord>> {
        Ok(self.records.read().get(id).cloned())
    }

    fn list(&self, filter: &RecordFilter) -> QuarantineResult<Vec<QuarantineRecord>> {
        let mut matches: Vec<QuarantineRecord> = self
            .records
            .read()
            .values()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();
        matches.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(matches)
    }
}
