//! IProgressEngine — the completion/streak/achievement interface.

use crate::errors::PulseResult;
use crate::models::{
    AchievementKey, CompletionMetrics, CompletionOutcome, CompletionRecord, ContentType,
    ProgressScope, StreakState,
};

/// The write path of the progress core plus its derived reads.
///
/// `record_completion` is idempotent per
/// `(user, content, unit, calendar day)`: the second call on the same day
/// returns `created: false` with the existing record. Streaks and
/// achievements are recomputed from the ledger after every created row.
#[allow(async_fn_in_trait)]
pub trait IProgressEngine: Send + Sync {
    async fn record_completion(
        &self,
        user_id: &str,
        content_type: ContentType,
        content_id: &str,
        unit: &str,
        metrics: Option<CompletionMetrics>,
    ) -> PulseResult<CompletionOutcome>;

    /// Consecutive-day streak for a scope, measured against the injected
    /// clock. Always recomputed from the ledger, never the cache.
    async fn compute_streak(
        &self,
        user_id: &str,
        scope: &ProgressScope,
    ) -> PulseResult<StreakState>;

    /// The stored (monotonic) achievement set for a scope.
    async fn get_achievements(
        &self,
        user_id: &str,
        scope: &ProgressScope,
    ) -> PulseResult<Vec<AchievementKey>>;

    /// Total ledger rows in a scope.
    async fn completion_count(&self, user_id: &str, scope: &ProgressScope) -> PulseResult<u64>;

    /// Full ledger history for a scope, oldest first.
    async fn completion_history(
        &self,
        user_id: &str,
        scope: &ProgressScope,
    ) -> PulseResult<Vec<CompletionRecord>>;
}
