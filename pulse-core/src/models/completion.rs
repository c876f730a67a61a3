//! Progress types: CompletionRecord, CompletionOutcome, ProgressScope,
//! StreakState, AchievementKey.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::ContentType;

/// Optional metrics attached to a completion. Stored as a JSON column;
/// all fields optional so partial trackers round-trip cleanly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompletionMetrics {
    pub minutes: Option<u32>,
    pub heart_rate: Option<u32>,
    pub weight: Option<f64>,
    pub calories: Option<u32>,
}

/// One ledger row: unit `unit` of content `(content_type, content_id)`
/// was completed by `user_id` on calendar day `completed_on`.
///
/// Immutable once written. The idempotency key is
/// `(user_id, content_type, content_id, unit, completed_on)` — at most
/// one row per key, enforced by a UNIQUE index in storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRecord {
    pub id: String,
    pub user_id: String,
    pub content_type: ContentType,
    pub content_id: String,
    /// Which unit was completed: a day number ("day-3"), a meal id, or a
    /// challenge-instance marker. Opaque to the ledger.
    pub unit: String,
    /// Calendar day under the system-wide day-boundary policy.
    pub completed_on: NaiveDate,
    /// Wall-clock transaction time.
    pub recorded_at: DateTime<Utc>,
    pub metrics: Option<CompletionMetrics>,
}

/// Result of `record_completion`. `created: false` is the idempotent
/// "already completed today" outcome, not an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionOutcome {
    pub created: bool,
    pub record: CompletionRecord,
}

/// Streak/achievement namespace: one specific program or challenge (or
/// class or plan). Streaks are never cross-content.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProgressScope {
    pub content_type: ContentType,
    pub content_id: String,
}

impl ProgressScope {
    pub fn new(content_type: ContentType, content_id: impl Into<String>) -> Self {
        ProgressScope {
            content_type,
            content_id: content_id.into(),
        }
    }
}

/// Derived consecutive-day streak for a scope. Always reproducible from
/// the ledger; the stored copy is a display cache, never a source of
/// truth.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakState {
    pub count: u32,
    pub last_counted_day: Option<NaiveDate>,
}

/// Fixed achievement rule set. Monotonic: once unlocked for a scope, a
/// key is never removed, even if the triggering condition later fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementKey {
    FirstCompletion,
    TenCompletions,
    SevenDayStreak,
}

impl AchievementKey {
    pub fn as_str(self) -> &'static str {
        match self {
            AchievementKey::FirstCompletion => "first_completion",
            AchievementKey::TenCompletions => "ten_completions",
            AchievementKey::SevenDayStreak => "seven_day_streak",
        }
    }

    pub fn parse(tag: &str) -> Option<AchievementKey> {
        match tag {
            "first_completion" => Some(AchievementKey::FirstCompletion),
            "ten_completions" => Some(AchievementKey::TenCompletions),
            "seven_day_streak" => Some(AchievementKey::SevenDayStreak),
            _ => None,
        }
    }
}
