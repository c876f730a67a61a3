//! Catalog-facing types: ContentType, MembershipTier, ContentItem,
//! ContentCard, AccessReason.

use serde::{Deserialize, Serialize};

/// The four content families the catalog serves. Everything in the
/// entitlement and progress core is namespaced by one of these tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Program,
    Challenge,
    Class,
    NutritionPlan,
}

impl ContentType {
    /// Stable storage tag for this content type.
    pub fn as_str(self) -> &'static str {
        match self {
            ContentType::Program => "program",
            ContentType::Challenge => "challenge",
            ContentType::Class => "class",
            ContentType::NutritionPlan => "nutrition_plan",
        }
    }

    /// Parse a storage tag. Returns None for unknown tags — stored rows
    /// with an unknown tag are treated as malformed and skipped upstream.
    pub fn parse(tag: &str) -> Option<ContentType> {
        match tag {
            "program" => Some(ContentType::Program),
            "challenge" => Some(ContentType::Challenge),
            "class" => Some(ContentType::Class),
            "nutrition_plan" => Some(ContentType::NutritionPlan),
            _ => None,
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Membership tiers, ordered. A tier is entitled to its own content plus
/// everything below it (`downward_closure`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipTier {
    Basic,
    Premium,
    Pro,
}

impl MembershipTier {
    /// The ordered set of tiers this tier includes.
    ///
    /// Basic → {Basic}; Premium → {Basic, Premium};
    /// Pro → {Basic, Premium, Pro}. Total function, no other inputs.
    pub fn downward_closure(self) -> &'static [MembershipTier] {
        use MembershipTier::*;
        match self {
            Basic => &[Basic],
            Premium => &[Basic, Premium],
            Pro => &[Basic, Premium, Pro],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MembershipTier::Basic => "basic",
            MembershipTier::Premium => "premium",
            MembershipTier::Pro => "pro",
        }
    }

    pub fn parse(tag: &str) -> Option<MembershipTier> {
        match tag {
            "basic" => Some(MembershipTier::Basic),
            "premium" => Some(MembershipTier::Premium),
            "pro" => Some(MembershipTier::Pro),
            _ => None,
        }
    }
}

/// A catalog row as the core sees it. Read-only; authoring, body content
/// (exercise lists, meals), and media live outside this system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: String,
    pub content_type: ContentType,
    pub title: String,
    pub thumbnail: Option<String>,
    /// Which membership tiers include this item by default. Empty means
    /// purchase/assignment only.
    pub visible_tiers: Vec<MembershipTier>,
    /// Number of completable units (days, meals, sessions).
    pub unit_count: u32,
}

impl ContentItem {
    /// True if any of `tiers` grants default visibility of this item.
    pub fn visible_to_any(&self, tiers: &[MembershipTier]) -> bool {
        self.visible_tiers.iter().any(|t| tiers.contains(t))
    }
}

/// Why an item appears in a user's entitlement set. Non-normative — the
/// set itself is the contract; the reason is display metadata only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessReason {
    Purchased,
    Assigned,
    Membership,
}

/// Caller-facing projection of an entitled catalog item. Deliberately
/// narrower than `ContentItem`: internal catalog fields never leak here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentCard {
    pub id: String,
    pub title: String,
    pub thumbnail: Option<String>,
    pub unit_count: u32,
    pub reason: AccessReason,
}

impl ContentCard {
    pub fn from_item(item: &ContentItem, reason: AccessReason) -> Self {
        ContentCard {
            id: item.id.clone(),
            title: item.title.clone(),
            thumbnail: item.thumbnail.clone(),
            unit_count: item.unit_count,
            reason,
        }
    }
}
