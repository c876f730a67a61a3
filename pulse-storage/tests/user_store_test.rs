//! UserStore tests: the validated store boundary and profile loading.

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};

use pulse_core::models::{ContentRef, ContentType, Membership, MembershipTier};
use pulse_core::PulseError;
use pulse_storage::pool::{ReadPool, WriteConnection};
use pulse_storage::queries::user_ops;
use pulse_storage::UserStore;

fn setup() -> (Arc<WriteConnection>, Arc<ReadPool>) {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("test_pulse.db");
    let _dir = Box::leak(Box::new(dir));

    {
        let conn = rusqlite::Connection::open(&db_path).unwrap();
        pulse_storage::migrations::run_migrations(&conn).unwrap();
    }

    let writer = Arc::new(WriteConnection::open(&db_path).unwrap());
    let readers = Arc::new(ReadPool::open(&db_path, 2).unwrap());
    (writer, readers)
}

#[tokio::test]
async fn profile_reflects_grants_and_membership() {
    let (writer, readers) = setup();
    let store = UserStore::new(writer, readers);
    let now = Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).unwrap();

    assert!(store.create_user("u1", "member", now).await.unwrap());
    assert!(!store.create_user("u1", "member", now).await.unwrap());

    store
        .grant_purchase("u1", ContentRef::new(ContentType::Program, "p1"), now)
        .await
        .unwrap();
    store
        .grant_assignment("u1", ContentRef::new(ContentType::Challenge, "c1"), now)
        .await
        .unwrap();
    store
        .set_membership(
            "u1",
            Membership {
                tier: MembershipTier::Pro,
                is_active: true,
                started_at: now,
                expires_at: Some(now + Duration::days(90)),
            },
        )
        .await
        .unwrap();

    let profile = store.get_profile("u1").await.unwrap();
    assert_eq!(profile.role, "member");
    assert_eq!(
        profile.purchased,
        vec![ContentRef::new(ContentType::Program, "p1")]
    );
    assert_eq!(
        profile.assigned,
        vec![ContentRef::new(ContentType::Challenge, "c1")]
    );
    assert_eq!(profile.membership.unwrap().tier, MembershipTier::Pro);
}

#[tokio::test]
async fn profile_skips_rows_with_unknown_tags() {
    let (writer, readers) = setup();
    let store = UserStore::new(writer.clone(), readers);
    let now = Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).unwrap();
    store.create_user("u1", "member", now).await.unwrap();
    store
        .grant_purchase("u1", ContentRef::new(ContentType::Program, "p1"), now)
        .await
        .unwrap();

    // Plant rows the typed API cannot produce.
    writer
        .with_conn(|conn| {
            user_ops::insert_grant(conn, "u1", "workout", "x1", "purchased", "2025-01-01T00:00:00Z")?;
            user_ops::upsert_membership(conn, "u1", "platinum", true, "2025-01-01T00:00:00Z", None)
        })
        .await
        .unwrap();

    let profile = store.get_profile("u1").await.unwrap();
    assert_eq!(profile.purchased.len(), 1);
    assert!(profile.membership.is_none());
}

#[tokio::test]
async fn grants_to_unknown_users_are_rejected() {
    let (writer, readers) = setup();
    let store = UserStore::new(writer, readers);
    let now = Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).unwrap();

    let err = store
        .grant_purchase("ghost", ContentRef::new(ContentType::Program, "p1"), now)
        .await
        .unwrap_err();
    assert!(matches!(err, PulseError::UserNotFound { .. }));

    let err = store.get_profile("ghost").await.unwrap_err();
    assert!(matches!(err, PulseError::UserNotFound { .. }));
}
