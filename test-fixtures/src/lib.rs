//! Shared test harness for the Pulse workspace: tempfile-backed database
//! setup, a pinnable clock, an in-memory catalog, and recording/failing
//! notification sinks.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, TimeZone, Utc};

use pulse_core::models::{ContentItem, ContentType, MembershipTier};
use pulse_core::traits::{ICatalog, IClock, INotificationSink, Notification};
use pulse_storage::pool::{ReadPool, WriteConnection};

/// A migrated tempfile-backed database opened through the pool types.
pub struct TestDb {
    pub writer: Arc<WriteConnection>,
    pub readers: Arc<ReadPool>,
}

/// Open a fresh database: migrations run on a raw connection first, then
/// the file is reopened via WriteConnection + ReadPool, matching how
/// production wires the pool.
pub fn setup_db() -> TestDb {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("pulse_test.db");
    let _dir = Box::leak(Box::new(dir)); // prevent cleanup while DB is open

    {
        let conn = rusqlite::Connection::open(&db_path).unwrap();
        pulse_storage::migrations::run_migrations(&conn).unwrap();
    }

    TestDb {
        writer: Arc::new(WriteConnection::open(&db_path).unwrap()),
        readers: Arc::new(ReadPool::open(&db_path, 2).unwrap()),
    }
}

/// A clock tests can pin and advance.
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Pinned to 2025-01-01 09:00:00 UTC.
    pub fn default_epoch() -> Self {
        Self::at(Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).unwrap())
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock().unwrap() = now;
    }

    pub fn advance_days(&self, days: i64) {
        let mut now = self.now.lock().unwrap();
        *now += Duration::days(days);
    }
}

impl IClock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

/// Immutable in-memory catalog. Build it, wrap it in an Arc, hand it to
/// the resolver.
#[derive(Default)]
pub struct InMemoryCatalog {
    items: HashMap<(ContentType, String), ContentItem>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_item(mut self, item: ContentItem) -> Self {
        self.items
            .insert((item.content_type, item.id.clone()), item);
        self
    }
}

impl ICatalog for InMemoryCatalog {
    fn find_content(&self, content_type: ContentType, id: &str) -> Option<ContentItem> {
        self.items.get(&(content_type, id.to_string())).cloned()
    }

    fn list_content(&self, content_type: ContentType) -> Vec<ContentItem> {
        let mut items: Vec<_> = self
            .items
            .values()
            .filter(|item| item.content_type == content_type)
            .cloned()
            .collect();
        items.sort_by(|a, b| a.id.cmp(&b.id));
        items
    }
}

/// Catalog item shorthand.
pub fn content_item(
    content_type: ContentType,
    id: &str,
    title: &str,
    visible_tiers: &[MembershipTier],
) -> ContentItem {
    ContentItem {
        id: id.to_string(),
        content_type,
        title: title.to_string(),
        thumbnail: None,
        visible_tiers: visible_tiers.to_vec(),
        unit_count: 7,
    }
}

/// Sink that records everything it is asked to deliver.
#[derive(Default)]
pub struct RecordingSink {
    notes: Mutex<Vec<Notification>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notes(&self) -> Vec<Notification> {
        self.notes.lock().unwrap().clone()
    }
}

impl INotificationSink for RecordingSink {
    fn notify(&self, note: Notification) -> anyhow::Result<()> {
        self.notes.lock().unwrap().push(note);
        Ok(())
    }
}

/// Sink that always fails, for asserting delivery problems never
/// propagate.
pub struct FailingSink;

impl INotificationSink for FailingSink {
    fn notify(&self, _note: Notification) -> anyhow::Result<()> {
        anyhow::bail!("transport down")
    }
}

/// Insert a user row directly.
pub async fn seed_user(db: &TestDb, id: &str) {
    let id = id.to_string();
    db.writer
        .with_conn(move |conn| {
            pulse_storage::queries::user_ops::insert_user(
                conn,
                &id,
                "member",
                "2025-01-01T00:00:00Z",
            )
        })
        .await
        .unwrap();
}
