//! Achievement evaluator: a fixed table of monotone predicates over
//! (completion count, streak count).

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::warn;

use pulse_core::errors::PulseResult;
use pulse_core::models::{AchievementKey, ProgressScope};
use pulse_storage::pool::{ReadPool, WriteConnection};
use pulse_storage::queries::achievement_ops;

/// A rule is satisfied or not for a given (total completions, streak).
/// Rules must be monotone in their inputs; unlocks are never revoked.
type RuleFn = fn(total: u64, streak: u32) -> bool;

pub struct AchievementRule {
    pub key: AchievementKey,
    pub satisfied: RuleFn,
}

fn first_completion(total: u64, _streak: u32) -> bool {
    total >= 1
}

fn ten_completions(total: u64, _streak: u32) -> bool {
    total >= 10
}

fn seven_day_streak(_total: u64, streak: u32) -> bool {
    streak >= 7
}

/// The fixed rule set. New rules follow the same shape: add a predicate
/// and a key, nothing else changes.
pub const RULES: [AchievementRule; 3] = [
    AchievementRule {
        key: AchievementKey::FirstCompletion,
        satisfied: first_completion,
    },
    AchievementRule {
        key: AchievementKey::TenCompletions,
        satisfied: ten_completions,
    },
    AchievementRule {
        key: AchievementKey::SevenDayStreak,
        satisfied: seven_day_streak,
    },
];

/// Keys whose predicate holds for the given state. Pure.
pub fn satisfied_keys(total: u64, streak: u32) -> Vec<AchievementKey> {
    RULES
        .iter()
        .filter(|rule| (rule.satisfied)(total, streak))
        .map(|rule| rule.key)
        .collect()
}

/// Evaluate every rule and union newly satisfied keys into the stored
/// set. Returns only the keys this call unlocked — evaluating twice with
/// unchanged state returns an empty list the second time.
pub async fn evaluate(
    writer: &Arc<WriteConnection>,
    user_id: &str,
    scope: &ProgressScope,
    total: u64,
    streak: u32,
    now: DateTime<Utc>,
) -> PulseResult<Vec<AchievementKey>> {
    let candidates = satisfied_keys(total, streak);
    if candidates.is_empty() {
        return Ok(Vec::new());
    }

    let user_id = user_id.to_string();
    let scope_type = scope.content_type.as_str();
    let scope_id = scope.content_id.clone();
    let unlocked_at = now.to_rfc3339();

    writer
        .with_conn(move |conn| {
            let mut unlocked = Vec::new();
            for key in candidates {
                let created = achievement_ops::insert_achievement(
                    conn,
                    &user_id,
                    scope_type,
                    &scope_id,
                    key.as_str(),
                    &unlocked_at,
                )?;
                if created {
                    unlocked.push(key);
                }
            }
            Ok(unlocked)
        })
        .await
}

/// The stored achievement set for a scope. Rows with tags this build
/// doesn't know are skipped with a warning rather than failing the read.
pub fn stored(
    readers: &Arc<ReadPool>,
    user_id: &str,
    scope: &ProgressScope,
) -> PulseResult<Vec<AchievementKey>> {
    let raw = readers.with_conn(|conn| {
        achievement_ops::get_achievements(
            conn,
            user_id,
            scope.content_type.as_str(),
            &scope.content_id,
        )
    })?;

    Ok(raw
        .into_iter()
        .filter_map(|tag| {
            let parsed = AchievementKey::parse(&tag);
            if parsed.is_none() {
                warn!(user_id, tag = %tag, "skipping unknown achievement key");
            }
            parsed
        })
        .collect())
}
