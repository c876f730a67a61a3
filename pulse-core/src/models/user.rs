//! User-state types: content grants, membership, profile.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ContentType, MembershipTier};

/// How a content grant reached the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentSource {
    Purchased,
    Assigned,
}

impl ContentSource {
    pub fn as_str(self) -> &'static str {
        match self {
            ContentSource::Purchased => "purchased",
            ContentSource::Assigned => "assigned",
        }
    }

    pub fn parse(tag: &str) -> Option<ContentSource> {
        match tag {
            "purchased" => Some(ContentSource::Purchased),
            "assigned" => Some(ContentSource::Assigned),
            _ => None,
        }
    }
}

/// A tagged reference to a catalog item, as stored in a user's purchase
/// or assignment list. Validated once at the store boundary; rows that
/// fail to re-parse on the way out are skipped, never fatal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentRef {
    pub content_type: ContentType,
    pub content_id: String,
}

impl ContentRef {
    pub fn new(content_type: ContentType, content_id: impl Into<String>) -> Self {
        ContentRef {
            content_type,
            content_id: content_id.into(),
        }
    }
}

/// Membership subscription state for one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Membership {
    pub tier: MembershipTier,
    pub is_active: bool,
    pub started_at: DateTime<Utc>,
    /// None means no scheduled expiry.
    pub expires_at: Option<DateTime<Utc>>,
}

impl Membership {
    /// Whether the membership grants tier content at `now`.
    ///
    /// Expiry is always evaluated against the clock supplied by the
    /// caller — never cached — so a membership that lapsed a moment ago
    /// stops granting content on the very next resolution.
    pub fn is_current(&self, now: DateTime<Utc>) -> bool {
        self.is_active && self.expires_at.map_or(true, |exp| exp > now)
    }
}

/// A user's resolver-relevant state, as loaded from the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub role: String,
    pub purchased: Vec<ContentRef>,
    pub assigned: Vec<ContentRef>,
    pub membership: Option<Membership>,
}
