//! Storage-layer tests: migrations, pool wiring, and the idempotency
//! constraints the upper layers rely on.

use std::sync::Arc;

use pulse_storage::pool::{ReadPool, WriteConnection};
use pulse_storage::queries::{achievement_ops, completion_ops, user_ops};

/// Test harness: file-backed DB with migrations applied on a raw
/// connection, then reopened via WriteConnection + ReadPool.
fn setup() -> (Arc<WriteConnection>, Arc<ReadPool>) {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("test_pulse.db");
    let _dir = Box::leak(Box::new(dir)); // prevent cleanup while DB is open

    {
        let conn = rusqlite::Connection::open(&db_path).unwrap();
        pulse_storage::migrations::run_migrations(&conn).unwrap();
    }

    let writer = Arc::new(WriteConnection::open(&db_path).unwrap());
    let readers = Arc::new(ReadPool::open(&db_path, 2).unwrap());
    (writer, readers)
}

async fn seed_user(writer: &Arc<WriteConnection>, id: &str) {
    let id = id.to_string();
    writer
        .with_conn(move |conn| {
            user_ops::insert_user(conn, &id, "member", "2025-01-01T00:00:00Z")
        })
        .await
        .unwrap();
}

#[test]
fn migrations_are_idempotent_and_versioned() {
    let conn = rusqlite::Connection::open_in_memory().unwrap();
    let applied = pulse_storage::migrations::run_migrations(&conn).unwrap();
    assert_eq!(applied, pulse_storage::migrations::LATEST_VERSION);
    assert_eq!(
        pulse_storage::migrations::current_version(&conn).unwrap(),
        pulse_storage::migrations::LATEST_VERSION
    );

    // Second run is a no-op.
    assert_eq!(pulse_storage::migrations::run_migrations(&conn).unwrap(), 0);
}

#[tokio::test]
async fn completion_insert_is_idempotent_per_key() {
    let (writer, readers) = setup();
    seed_user(&writer, "u1").await;

    let insert = |id: &'static str| {
        let writer = writer.clone();
        async move {
            writer
                .with_conn(move |conn| {
                    completion_ops::insert_completion(
                        conn,
                        id,
                        "u1",
                        "program",
                        "p1",
                        "day-1",
                        "2025-01-01",
                        "2025-01-01T09:00:00Z",
                        None,
                    )
                })
                .await
                .unwrap()
        }
    };

    assert!(insert("c1").await);
    assert!(!insert("c2").await); // same key, conflict absorbed

    let count = readers
        .with_conn(|conn| completion_ops::count_completions(conn, "u1", "program", "p1"))
        .unwrap();
    assert_eq!(count, 1);

    // The surviving row is the first one.
    let row = readers
        .with_conn(|conn| {
            completion_ops::get_completion(conn, "u1", "program", "p1", "day-1", "2025-01-01")
        })
        .unwrap()
        .unwrap();
    assert_eq!(row.id, "c1");
}

#[tokio::test]
async fn same_unit_on_a_new_day_creates_a_second_row() {
    let (writer, readers) = setup();
    seed_user(&writer, "u1").await;

    for (id, day) in [("c1", "2025-01-01"), ("c2", "2025-01-02")] {
        let created = writer
            .with_conn(move |conn| {
                completion_ops::insert_completion(
                    conn,
                    id,
                    "u1",
                    "program",
                    "p1",
                    "day-1",
                    day,
                    "2025-01-01T09:00:00Z",
                    None,
                )
            })
            .await
            .unwrap();
        assert!(created);
    }

    let days = readers
        .with_conn(|conn| completion_ops::distinct_days(conn, "u1", "program", "p1"))
        .unwrap();
    assert_eq!(days, vec!["2025-01-02", "2025-01-01"]); // newest first
}

#[tokio::test]
async fn duplicate_grants_are_absorbed() {
    let (writer, readers) = setup();
    seed_user(&writer, "u1").await;

    for expect_created in [true, false] {
        let created = writer
            .with_conn(|conn| {
                user_ops::insert_grant(conn, "u1", "program", "p1", "purchased", "2025-01-01T00:00:00Z")
            })
            .await
            .unwrap();
        assert_eq!(created, expect_created);
    }

    let grants = readers
        .with_conn(|conn| user_ops::get_grants(conn, "u1", "program"))
        .unwrap();
    assert_eq!(grants.len(), 1);
}

#[tokio::test]
async fn achievement_insert_is_monotonic() {
    let (writer, readers) = setup();
    seed_user(&writer, "u1").await;

    let unlocked = writer
        .with_conn(|conn| {
            achievement_ops::insert_achievement(
                conn,
                "u1",
                "program",
                "p1",
                "first_completion",
                "2025-01-01T09:00:00Z",
            )
        })
        .await
        .unwrap();
    assert!(unlocked);

    let again = writer
        .with_conn(|conn| {
            achievement_ops::insert_achievement(
                conn,
                "u1",
                "program",
                "p1",
                "first_completion",
                "2025-01-02T09:00:00Z",
            )
        })
        .await
        .unwrap();
    assert!(!again);

    let keys = readers
        .with_conn(|conn| achievement_ops::get_achievements(conn, "u1", "program", "p1"))
        .unwrap();
    assert_eq!(keys, vec!["first_completion"]);
}
