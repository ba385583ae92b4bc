//! Idempotent webhook event storage using SQLite.

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Utc;
use rusqlite::{params, Connection};
use serde_json::Value;

use crate::error::{BridgeError, BridgeResult};
use crate::webhook::event::{EventKind, EventSummary};

/// SQLite-backed append-only event store.
///
/// The unique index on `delivery_id` is the idempotency guarantee: a
/// repeated insert with the same id is a no-op, enforced by the storage
/// engine itself rather than application-level locking. Rows are never
/// mutated or deleted.
#[derive(Clone)]
pub struct EventStore {
    conn: Arc<Mutex<Connection>>,
}

impl EventStore {
    /// Open (or create) the event database and initialize the schema.
    ///
    /// Schema creation is idempotent, so calling this on every startup
    /// is safe. `:memory:` is supported for tests.
    pub fn open(db_path: impl AsRef<Path>) -> BridgeResult<Self> {
        if let Some(parent) = db_path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = if db_path.as_ref().to_str() == Some(":memory:") {
            Connection::open_in_memory()
        } else {
            Connection::open(db_path.as_ref())
        }
        .map_err(|e| BridgeError::database(e.to_string()))?;

        // Bound waits on a locked database instead of stalling a request.
        conn.busy_timeout(Duration::from_secs(5))
            .map_err(|e| BridgeError::database(e.to_string()))?;

        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };

        store.create_table()?;

        Ok(store)
    }

    fn create_table(&self) -> BridgeResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS webhook_events (
                id           INTEGER PRIMARY KEY AUTOINCREMENT,
                delivery_id  TEXT UNIQUE,
                event_type   TEXT NOT NULL,
                action       TEXT NOT NULL,
                issue_number INTEGER,
                payload      TEXT NOT NULL,
                received_at  TEXT NOT NULL
            )
            "#,
            [],
        )
        .map_err(|e| BridgeError::database(e.to_string()))?;

        Ok(())
    }

    /// Insert an event unless a row with the same delivery id exists.
    ///
    /// Returns whether a new row was written: a duplicate delivery id is
    /// a silent no-op, not an error, and the first delivery's data wins.
    /// A `None` delivery id is stored as NULL and never deduplicated.
    pub fn insert_if_absent(
        &self,
        delivery_id: Option<&str>,
        kind: EventKind,
        action: &str,
        issue_number: Option<i64>,
        payload: &Value,
    ) -> BridgeResult<bool> {
        let conn = self.conn.lock().unwrap();
        let received_at = Utc::now().to_rfc3339();

        let inserted = conn
            .execute(
                r#"
                INSERT OR IGNORE INTO webhook_events
                    (delivery_id, event_type, action, issue_number, payload, received_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
                params![
                    delivery_id,
                    kind.as_str(),
                    action,
                    issue_number,
                    payload.to_string(),
                    received_at,
                ],
            )
            .map_err(|e| BridgeError::database(e.to_string()))?;

        Ok(inserted > 0)
    }

    /// Most recent events, newest first, bounded by `limit`.
    ///
    /// Ordering follows insertion order, which is monotonic within a
    /// single store instance.
    pub fn recent(&self, limit: i64) -> BridgeResult<Vec<EventSummary>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare(
                r#"
                SELECT delivery_id, event_type, action, issue_number, received_at
                FROM webhook_events
                ORDER BY id DESC
                LIMIT ?1
                "#,
            )
            .map_err(|e| BridgeError::database(e.to_string()))?;

        let rows = stmt
            .query_map([limit], |row| {
                Ok(EventSummary {
                    delivery_id: row.get(0)?,
                    event_type: row.get(1)?,
                    action: row.get(2)?,
                    issue_number: row.get(3)?,
                    received_at: row.get(4)?,
                })
            })
            .map_err(|e| BridgeError::database(e.to_string()))?;

        rows.collect::<Result<Vec<_>, _>>()
            .map_err(|e| BridgeError::database(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn open_memory() -> EventStore {
        EventStore::open(":memory:").unwrap()
    }

    #[test]
    fn insert_and_recent_round_trip() {
        let store = open_memory();

        let inserted = store
            .insert_if_absent(
                Some("delivery-1"),
                EventKind::Issues,
                "opened",
                Some(42),
                &json!({"action": "opened"}),
            )
            .unwrap();
        assert!(inserted);

        let events = store.recent(10).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].delivery_id.as_deref(), Some("delivery-1"));
        assert_eq!(events[0].event_type, "issues");
        assert_eq!(events[0].action, "opened");
        assert_eq!(events[0].issue_number, Some(42));
        assert!(!events[0].received_at.is_empty());
    }

    #[test]
    fn duplicate_delivery_id_keeps_first_row() {
        let store = open_memory();

        assert!(store
            .insert_if_absent(
                Some("dup"),
                EventKind::Issues,
                "opened",
                Some(1),
                &json!({"first": true}),
            )
            .unwrap());
        // Same id, different content: must be dropped, not error.
        assert!(!store
            .insert_if_absent(
                Some("dup"),
                EventKind::IssueComment,
                "created",
                Some(2),
                &json!({"second": true}),
            )
            .unwrap());

        let events = store.recent(10).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type, "issues");
        assert_eq!(events[0].action, "opened");
        assert_eq!(events[0].issue_number, Some(1));
    }

    #[test]
    fn missing_delivery_ids_are_not_deduplicated() {
        let store = open_memory();

        assert!(store
            .insert_if_absent(None, EventKind::Issues, "opened", Some(1), &json!({}))
            .unwrap());
        assert!(store
            .insert_if_absent(None, EventKind::Issues, "closed", Some(1), &json!({}))
            .unwrap());

        assert_eq!(store.recent(10).unwrap().len(), 2);
    }

    #[test]
    fn recent_is_newest_first_and_bounded() {
        let store = open_memory();

        for n in 0..5 {
            store
                .insert_if_absent(
                    Some(&format!("delivery-{}", n)),
                    EventKind::Issues,
                    "opened",
                    Some(n),
                    &json!({}),
                )
                .unwrap();
        }

        let events = store.recent(3).unwrap();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].issue_number, Some(4));
        assert_eq!(events[1].issue_number, Some(3));
        assert_eq!(events[2].issue_number, Some(2));
    }

    #[test]
    fn null_issue_number_round_trips() {
        let store = open_memory();

        store
            .insert_if_absent(Some("d"), EventKind::IssueComment, "created", None, &json!({}))
            .unwrap();

        assert_eq!(store.recent(1).unwrap()[0].issue_number, None);
    }

    #[test]
    fn reopen_preserves_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.db");

        {
            let store = EventStore::open(&path).unwrap();
            store
                .insert_if_absent(Some("d1"), EventKind::Issues, "opened", Some(1), &json!({}))
                .unwrap();
        }

        // Second open re-runs schema creation against the existing file.
        let store = EventStore::open(&path).unwrap();
        assert_eq!(store.recent(10).unwrap().len(), 1);
    }
}
