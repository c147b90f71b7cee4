use parking_lot::Mutex;
use quarantine_shared::errors::QuarantineResult;
use rusqlite::{params, Connection, OptionalExtension};

use super::{QuarantineStore, RecordFilter};
use crate::record::QuarantineRecord;

/// Durable implementation of [`QuarantineStore`] backed by SQLite. Each
/// record is kept twice over: as a JSON blob (the source of truth,
/// round-tripped through serde) and as queryable columns (`status`,
/// `reason`, `quarantined_at`) so `list` can filter without deserializing
/// every row — the same split `boxlite`'s box store uses for its own
/// records.
pub struct SqliteQuarantineStore {
    conn: Mutex<Connection>,
}

impl SqliteQuarantineStore {
    pub fn open(path: &str) -> QuarantineResult<Self> {
        let conn = Connection::open(path)?;
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn open_in_memory() -> QuarantineResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn init_schema(conn: &Connection) -> QuarantineResult<()> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS quarantine_records (
                id TEXT PRIMARY KEY,
                status TEXT NOT NULL,
                reason TEXT NOT NULL,
                quarantined_at TEXT NOT NULL,
                blob TEXT NOT NULL
            );",
        )?;
        Ok(())
    }
}

impl QuarantineStore for SqliteQuarantineStore {
    fn put(&self, record: QuarantineRecord) -> QuarantineResult<()> {
        let blob = serde_json::to_string(&record)?;
        let status = serde_json::to_value(record.status)?
            .as_str()
            .unwrap_or_default()
            .to_string();
        let reason = serde_json::to_value(record.reason)?
            .as_str()
            .unwrap_or_default()
            .to_string();
        self.conn.lock().execute(
            "INSERT INTO quarantine_records (id, status, reason, quarantined_at, blob)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(id) DO UPDATE SET
                status = excluded.status,
                reason = excluded.reason,
                quarantined_at = excluded.quarantined_at,
                blob = excluded.blob",
            params![
                record.id,
                status,
                reason,
                record.quarantined_at.to_rfc3339(),
                blob,
            ],
        )?;
        Ok(())
    }

    fn get(&self, id: &str) -> QuarantineResult<Option<QuarantineRecord>> {
        let conn = self.conn.lock();
        let blob: Option<String> = conn
            .query_row(
                "SELECT blob FROM quarantine_records WHERE id = ?1",
                params![id],
                |row| row.get(0),
            )
            .optional()?;
        match blob {
            Some(blob) => Ok(Some(serde_json::from_str(&blob)?)),
            None => Ok(None),
        }
    }

    fn list(&self, filter: &RecordFilter) -> QuarantineResult<Vec<QuarantineRecord>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare("SELECT blob FROM quarantine_records ORDER BY id ASC")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let mut out = Vec::new();
        for row in rows {
            let blob = row?;
            let record: QuarantineRecord = serde_json::from_str(&blob)?;
            if filter.matches(&record) {
                out.push(record);
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evidence::Evidence;
    use crate::reason::QuarantineReason;

    fn rec(id: &str) -> QuarantineRecord {
        QuarantineRecord::new(id, QuarantineReason::ManualFlag, Vec::<Evidence>::new(), "op", false)
    }

    #[test]
    fn put_then_get_round_trips_through_sqlite() {
        let store = SqliteQuarantineStore::open_in_memory().unwrap();
        store.put(rec("w1")).unwrap();
        let fetched = store.get("w1").unwrap().unwrap();
        assert_eq!(fetched.id, "w1");
        assert_eq!(fetched.reason, QuarantineReason::ManualFlag);
    }

    #[test]
    fn upsert_replaces_record_for_same_id() {
        let store = SqliteQuarantineStore::open_in_memory().unwrap();
        store.put(rec("w1")).unwrap();
        let mut replacement = rec("w1");
        replacement.examination_count = 3;
        store.put(replacement).unwrap();
        assert_eq!(store.get("w1").unwrap().unwrap().examination_count, 3);
        assert_eq!(store.list(&RecordFilter::default()).unwrap().len(), 1);
    }

    #[test]
    fn list_applies_filter() {
        let store = SqliteQuarantineStore::open_in_memory().unwrap();
        store.put(rec("w1")).unwrap();
        store.put(rec("w2")).unwrap();
        let filter = RecordFilter {
            id: Some("w2".to_string()),
            ..Default::default()
        };
        let matches = store.list(&filter).unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].id, "w2");
    }
}
