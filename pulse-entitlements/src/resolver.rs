//! EntitlementResolver — merges the three authorization sources.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, warn};

use pulse_core::errors::PulseResult;
use pulse_core::models::{
    validate_id, AccessReason, ContentCard, ContentSource, ContentType,
};
use pulse_core::traits::{ICatalog, IClock, IEntitlementResolver};
use pulse_core::PulseError;
use pulse_storage::pool::ReadPool;
use pulse_storage::queries::user_ops;
use pulse_storage::user_store::{parse_grant, parse_membership};

/// Read-only resolver over the user store and catalog. No locking:
/// entitlement resolution tolerates a just-landed purchase being briefly
/// invisible, but membership expiry is always checked against the
/// injected clock at call time.
pub struct EntitlementResolver {
    readers: Arc<ReadPool>,
    catalog: Arc<dyn ICatalog>,
    clock: Arc<dyn IClock>,
}

impl EntitlementResolver {
    pub fn new(readers: Arc<ReadPool>, catalog: Arc<dyn ICatalog>, clock: Arc<dyn IClock>) -> Self {
        Self {
            readers,
            catalog,
            clock,
        }
    }
}

impl IEntitlementResolver for EntitlementResolver {
    async fn resolve_entitlements(
        &self,
        user_id: &str,
        content_type: ContentType,
    ) -> PulseResult<Vec<ContentCard>> {
        validate_id("user_id", user_id)?;

        let exists = self
            .readers
            .with_conn(|conn| user_ops::user_exists(conn, user_id))?;
        if !exists {
            return Err(PulseError::UserNotFound {
                id: user_id.to_string(),
            });
        }

        let grants = self
            .readers
            .with_conn(|conn| user_ops::get_grants(conn, user_id, content_type.as_str()))?;
        let raw_membership = self
            .readers
            .with_conn(|conn| user_ops::get_membership(conn, user_id))?;

        // Keyed by content id: one entry per item no matter how many
        // sources grant it. The first source to land wins the displayed
        // reason (purchases sort before assignments, both before
        // membership); the set itself is source-order independent.
        let mut merged: BTreeMap<String, ContentCard> = BTreeMap::new();

        for raw in &grants {
            let Some((content, source)) = parse_grant(raw) else {
                warn!(
                    user_id,
                    content_type = %raw.content_type,
                    content_id = %raw.content_id,
                    "skipping malformed grant reference"
                );
                continue;
            };
            match self.catalog.find_content(content.content_type, &content.content_id) {
                Some(item) => {
                    let reason = match source {
                        ContentSource::Purchased => AccessReason::Purchased,
                        ContentSource::Assigned => AccessReason::Assigned,
                    };
                    merged
                        .entry(item.id.clone())
                        .or_insert_with(|| ContentCard::from_item(&item, reason));
                }
                None => {
                    // A grant pointing at deleted/nonexistent content must
                    // never block the user's other entitlements.
                    warn!(
                        user_id,
                        content_id = %content.content_id,
                        "skipping grant for unresolvable content"
                    );
                }
            }
        }

        let membership = raw_membership
            .as_ref()
            .and_then(|m| parse_membership(user_id, m));
        if let Some(m) = membership {
            if m.is_current(self.clock.now()) {
                let closure = m.tier.downward_closure();
                for item in self.catalog.list_content(content_type) {
                    if item.visible_to_any(closure) {
                        merged
                            .entry(item.id.clone())
                            .or_insert_with(|| {
                                ContentCard::from_item(&item, AccessReason::Membership)
                            });
                    }
                }
            } else {
                debug!(user_id, "membership inactive or expired, tier content excluded");
            }
        }

        Ok(merged.into_values().collect())
    }
}
