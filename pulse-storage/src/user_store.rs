//! UserStore — validated write/read facade over the user-state tables.
//!
//! Purchase and assignment references are validated once here, at the
//! store boundary; downstream code never re-parses them ad hoc. Rows
//! that still come back unparseable (legacy corruption) are skipped with
//! a warning on the way out.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::warn;

use pulse_core::errors::PulseResult;
use pulse_core::models::{
    validate_id, ContentRef, ContentSource, ContentType, Membership, MembershipTier, UserProfile,
};
use pulse_core::PulseError;

use crate::pool::{ReadPool, WriteConnection};
use crate::queries::user_ops;
use crate::queries::user_ops::{RawGrant, RawMembership};

pub struct UserStore {
    writer: Arc<WriteConnection>,
    readers: Arc<ReadPool>,
}

impl UserStore {
    pub fn new(writer: Arc<WriteConnection>, readers: Arc<ReadPool>) -> Self {
        Self { writer, readers }
    }

    /// Create a user row if absent. Returns true when created.
    pub async fn create_user(&self, id: &str, role: &str, now: DateTime<Utc>) -> PulseResult<bool> {
        validate_id("user_id", id)?;
        let id = id.to_string();
        let role = role.to_string();
        let created_at = now.to_rfc3339();
        self.writer
            .with_conn(move |conn| user_ops::insert_user(conn, &id, &role, &created_at))
            .await
    }

    /// Record a purchase. Idempotent; returns true on first grant.
    pub async fn grant_purchase(
        &self,
        user_id: &str,
        content: ContentRef,
        now: DateTime<Utc>,
    ) -> PulseResult<bool> {
        self.grant(user_id, content, ContentSource::Purchased, now).await
    }

    /// Record an admin assignment. Idempotent; returns true on first grant.
    pub async fn grant_assignment(
        &self,
        user_id: &str,
        content: ContentRef,
        now: DateTime<Utc>,
    ) -> PulseResult<bool> {
        self.grant(user_id, content, ContentSource::Assigned, now).await
    }

    async fn grant(
        &self,
        user_id: &str,
        content: ContentRef,
        source: ContentSource,
        now: DateTime<Utc>,
    ) -> PulseResult<bool> {
        validate_id("user_id", user_id)?;
        validate_id("content_id", &content.content_id)?;
        self.require_user(user_id)?;

        let user_id = user_id.to_string();
        let granted_at = now.to_rfc3339();
        self.writer
            .with_conn(move |conn| {
                user_ops::insert_grant(
                    conn,
                    &user_id,
                    content.content_type.as_str(),
                    &content.content_id,
                    source.as_str(),
                    &granted_at,
                )
            })
            .await
    }

    /// Set or replace the user's membership.
    pub async fn set_membership(&self, user_id: &str, membership: Membership) -> PulseResult<()> {
        validate_id("user_id", user_id)?;
        self.require_user(user_id)?;

        let user_id = user_id.to_string();
        let started_at = membership.started_at.to_rfc3339();
        let expires_at = membership.expires_at.map(|e| e.to_rfc3339());
        self.writer
            .with_conn(move |conn| {
                user_ops::upsert_membership(
                    conn,
                    &user_id,
                    membership.tier.as_str(),
                    membership.is_active,
                    &started_at,
                    expires_at.as_deref(),
                )
            })
            .await
    }

    /// Load a user's full resolver-relevant state.
    pub async fn get_profile(&self, user_id: &str) -> PulseResult<UserProfile> {
        validate_id("user_id", user_id)?;

        let role = self
            .readers
            .with_conn(|conn| user_ops::get_user_role(conn, user_id))?
            .ok_or_else(|| PulseError::UserNotFound {
                id: user_id.to_string(),
            })?;

        let grants = self
            .readers
            .with_conn(|conn| user_ops::get_all_grants(conn, user_id))?;
        let raw_membership = self
            .readers
            .with_conn(|conn| user_ops::get_membership(conn, user_id))?;

        let mut purchased = Vec::new();
        let mut assigned = Vec::new();
        for raw in grants {
            match parse_grant(&raw) {
                Some((content, ContentSource::Purchased)) => purchased.push(content),
                Some((content, ContentSource::Assigned)) => assigned.push(content),
                None => warn!(
                    user_id,
                    content_type = %raw.content_type,
                    content_id = %raw.content_id,
                    "skipping malformed content grant"
                ),
            }
        }

        Ok(UserProfile {
            id: user_id.to_string(),
            role,
            purchased,
            assigned,
            membership: raw_membership.as_ref().and_then(|m| parse_membership(user_id, m)),
        })
    }

    fn require_user(&self, user_id: &str) -> PulseResult<()> {
        let exists = self
            .readers
            .with_conn(|conn| user_ops::user_exists(conn, user_id))?;
        if exists {
            Ok(())
        } else {
            Err(PulseError::UserNotFound {
                id: user_id.to_string(),
            })
        }
    }
}

/// Parse a raw grant row. None means the row is malformed.
pub fn parse_grant(raw: &RawGrant) -> Option<(ContentRef, ContentSource)> {
    let content_type = ContentType::parse(&raw.content_type)?;
    let source = ContentSource::parse(&raw.source)?;
    if raw.content_id.is_empty() {
        return None;
    }
    Some((ContentRef::new(content_type, raw.content_id.clone()), source))
}

/// Parse a raw membership row. Malformed rows are logged and dropped —
/// a corrupt membership must not block the rest of the user's state.
pub fn parse_membership(user_id: &str, raw: &RawMembership) -> Option<Membership> {
    let tier = match MembershipTier::parse(&raw.tier) {
        Some(t) => t,
        None => {
            warn!(user_id, tier = %raw.tier, "skipping membership with unknown tier");
            return None;
        }
    };
    let started_at = match DateTime::parse_from_rfc3339(&raw.started_at) {
        Ok(ts) => ts.with_timezone(&Utc),
        Err(_) => {
            warn!(user_id, "skipping membership with invalid started_at");
            return None;
        }
    };
    let expires_at = match &raw.expires_at {
        None => None,
        Some(s) => match DateTime::parse_from_rfc3339(s) {
            Ok(ts) => Some(ts.with_timezone(&Utc)),
            Err(_) => {
                warn!(user_id, "skipping membership with invalid expires_at");
                return None;
            }
        },
    };
    Some(Membership {
        tier,
        is_active: raw.is_active,
        started_at,
        expires_at,
    })
}
