//! Entitlement resolver tests: source merging, dedup, expiry, and
//! malformed-reference tolerance.

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};

use pulse_core::models::{
    AccessReason, ContentRef, ContentType, Membership, MembershipTier,
};
use pulse_core::traits::IEntitlementResolver;
use pulse_core::PulseError;
use pulse_entitlements::EntitlementResolver;
use pulse_storage::queries::user_ops;
use pulse_storage::UserStore;
use test_fixtures::{content_item, seed_user, setup_db, FixedClock, InMemoryCatalog, TestDb};

fn catalog() -> InMemoryCatalog {
    use ContentType::*;
    use MembershipTier::*;
    InMemoryCatalog::new()
        .with_item(content_item(Program, "p1", "Strength Builder", &[]))
        .with_item(content_item(Program, "p2", "Morning Mobility", &[Basic]))
        .with_item(content_item(Program, "p3", "Elite Block", &[Pro]))
        .with_item(content_item(Challenge, "c1", "30-Day Core", &[]))
        .with_item(content_item(Class, "cl1", "Spin Live", &[Premium]))
}

fn resolver(db: &TestDb, clock: Arc<FixedClock>) -> EntitlementResolver {
    EntitlementResolver::new(db.readers.clone(), Arc::new(catalog()), clock)
}

async fn seed_premium_user(db: &TestDb, clock: &FixedClock) -> UserStore {
    let store = UserStore::new(db.writer.clone(), db.readers.clone());
    seed_user(db, "u1").await;
    let now = pulse_core::traits::IClock::now(clock);
    store
        .grant_purchase(
            "u1",
            ContentRef::new(ContentType::Program, "p1"),
            now,
        )
        .await
        .unwrap();
    store
        .grant_assignment(
            "u1",
            ContentRef::new(ContentType::Challenge, "c1"),
            now,
        )
        .await
        .unwrap();
    store
        .set_membership(
            "u1",
            Membership {
                tier: MembershipTier::Premium,
                is_active: true,
                started_at: now,
                expires_at: Some(now + Duration::days(30)),
            },
        )
        .await
        .unwrap();
    store
}

fn ids(cards: &[pulse_core::models::ContentCard]) -> Vec<&str> {
    cards.iter().map(|c| c.id.as_str()).collect()
}

#[tokio::test]
async fn merges_purchases_assignments_and_tier_closure() {
    let db = setup_db();
    let clock = Arc::new(FixedClock::default_epoch());
    seed_premium_user(&db, &clock).await;
    let resolver = resolver(&db, clock);

    // Premium closure = {Basic, Premium}: p2 via Basic, never p3 (Pro).
    let programs = resolver
        .resolve_entitlements("u1", ContentType::Program)
        .await
        .unwrap();
    assert_eq!(ids(&programs), vec!["p1", "p2"]);

    let classes = resolver
        .resolve_entitlements("u1", ContentType::Class)
        .await
        .unwrap();
    assert_eq!(ids(&classes), vec!["cl1"]);
    assert_eq!(classes[0].reason, AccessReason::Membership);

    let challenges = resolver
        .resolve_entitlements("u1", ContentType::Challenge)
        .await
        .unwrap();
    assert_eq!(ids(&challenges), vec!["c1"]);
    assert_eq!(challenges[0].reason, AccessReason::Assigned);
}

#[tokio::test]
async fn overlapping_sources_yield_one_entry() {
    let db = setup_db();
    let clock = Arc::new(FixedClock::default_epoch());
    let store = seed_premium_user(&db, &clock).await;

    // p2 is Basic-visible and now also purchased.
    store
        .grant_purchase(
            "u1",
            ContentRef::new(ContentType::Program, "p2"),
            pulse_core::traits::IClock::now(clock.as_ref()),
        )
        .await
        .unwrap();

    let resolver = resolver(&db, clock);
    let programs = resolver
        .resolve_entitlements("u1", ContentType::Program)
        .await
        .unwrap();
    assert_eq!(ids(&programs), vec!["p1", "p2"]);
    let p2 = programs.iter().find(|c| c.id == "p2").unwrap();
    assert_eq!(p2.reason, AccessReason::Purchased);
}

#[tokio::test]
async fn expired_membership_stops_granting_at_the_clock() {
    let db = setup_db();
    let clock = Arc::new(FixedClock::default_epoch());
    seed_premium_user(&db, &clock).await;
    let resolver = resolver(&db, clock.clone());

    // Alive now.
    let before = resolver
        .resolve_entitlements("u1", ContentType::Program)
        .await
        .unwrap();
    assert_eq!(ids(&before), vec!["p1", "p2"]);

    // Jump past expires_at: tier content vanishes, purchases stay.
    clock.set(Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap());
    let after = resolver
        .resolve_entitlements("u1", ContentType::Program)
        .await
        .unwrap();
    assert_eq!(ids(&after), vec!["p1"]);
}

#[tokio::test]
async fn inactive_membership_grants_nothing() {
    let db = setup_db();
    let clock = Arc::new(FixedClock::default_epoch());
    let store = seed_premium_user(&db, &clock).await;
    let now = pulse_core::traits::IClock::now(clock.as_ref());
    store
        .set_membership(
            "u1",
            Membership {
                tier: MembershipTier::Premium,
                is_active: false,
                started_at: now,
                expires_at: None,
            },
        )
        .await
        .unwrap();

    let resolver = resolver(&db, clock);
    let programs = resolver
        .resolve_entitlements("u1", ContentType::Program)
        .await
        .unwrap();
    assert_eq!(ids(&programs), vec!["p1"]);
}

#[tokio::test]
async fn malformed_references_are_skipped_not_fatal() {
    let db = setup_db();
    let clock = Arc::new(FixedClock::default_epoch());
    seed_premium_user(&db, &clock).await;

    // Two corrupt rows planted straight into the store: an unknown
    // content tag and a reference to content the catalog no longer has.
    db.writer
        .with_conn(|conn| {
            user_ops::insert_grant(conn, "u1", "program", "deleted-program", "purchased", "2025-01-01T00:00:00Z")?;
            user_ops::insert_grant(conn, "u1", "workout", "x9", "purchased", "2025-01-01T00:00:00Z")
        })
        .await
        .unwrap();

    let resolver = resolver(&db, clock);
    let programs = resolver
        .resolve_entitlements("u1", ContentType::Program)
        .await
        .unwrap();
    assert_eq!(ids(&programs), vec!["p1", "p2"]);
}

#[tokio::test]
async fn unknown_user_is_an_error() {
    let db = setup_db();
    let clock = Arc::new(FixedClock::default_epoch());
    let resolver = resolver(&db, clock);

    let err = resolver
        .resolve_entitlements("ghost", ContentType::Program)
        .await
        .unwrap_err();
    assert!(matches!(err, PulseError::UserNotFound { .. }));
}

#[tokio::test]
async fn result_set_ignores_grant_insertion_order() {
    let clock_a = Arc::new(FixedClock::default_epoch());
    let clock_b = Arc::new(FixedClock::default_epoch());

    // Same grants, opposite insertion order.
    let db_a = setup_db();
    let db_b = setup_db();
    for (db, reversed) in [(&db_a, false), (&db_b, true)] {
        seed_user(db, "u1").await;
        let store = UserStore::new(db.writer.clone(), db.readers.clone());
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).unwrap();
        let mut refs = vec![
            ContentRef::new(ContentType::Program, "p1"),
            ContentRef::new(ContentType::Program, "p2"),
        ];
        if reversed {
            refs.reverse();
        }
        for r in refs {
            store.grant_purchase("u1", r, now).await.unwrap();
        }
    }

    let programs_a = resolver(&db_a, clock_a)
        .resolve_entitlements("u1", ContentType::Program)
        .await
        .unwrap();
    let programs_b = resolver(&db_b, clock_b)
        .resolve_entitlements("u1", ContentType::Program)
        .await
        .unwrap();
    assert_eq!(ids(&programs_a), ids(&programs_b));
}
