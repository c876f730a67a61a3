//! ProgressEngine — orchestrates the completion write path.

use std::sync::Arc;

use tracing::{debug, warn};
use uuid::Uuid;

use pulse_core::config::ProgressConfig;
use pulse_core::errors::PulseResult;
use pulse_core::models::{
    validate_id, AchievementKey, CompletionMetrics, CompletionOutcome, CompletionRecord,
    ContentType, ProgressScope, StreakState,
};
use pulse_core::traits::{IClock, INotificationSink, IProgressEngine, Notification};
use pulse_core::PulseError;
use pulse_storage::pool::{ReadPool, WriteConnection};
use pulse_storage::queries::{streak_ops, user_ops};

use crate::achievements;
use crate::ledger;
use crate::streak;

/// The progress orchestrator.
///
/// A created ledger row triggers, in order: streak recomputation from
/// the ledger, streak-cache refresh, achievement evaluation, and
/// best-effort notifications. An idempotent hit (`created: false`) stops
/// after the ledger lookup — no derived state moves, nothing fires.
pub struct ProgressEngine {
    writer: Arc<WriteConnection>,
    readers: Arc<ReadPool>,
    config: ProgressConfig,
    clock: Arc<dyn IClock>,
    sink: Option<Arc<dyn INotificationSink>>,
}

impl ProgressEngine {
    pub fn new(
        writer: Arc<WriteConnection>,
        readers: Arc<ReadPool>,
        config: ProgressConfig,
        clock: Arc<dyn IClock>,
    ) -> Self {
        Self {
            writer,
            readers,
            config,
            clock,
            sink: None,
        }
    }

    /// Attach a notification sink. Without one, completion and unlock
    /// notices are silently skipped.
    pub fn with_sink(mut self, sink: Arc<dyn INotificationSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// The cached streak for display reads. May lag the ledger; use
    /// `compute_streak` for the authoritative value.
    pub async fn cached_streak(
        &self,
        user_id: &str,
        scope: &ProgressScope,
    ) -> PulseResult<Option<StreakState>> {
        let raw = self.readers.with_conn(|conn| {
            streak_ops::get_streak(
                conn,
                user_id,
                scope.content_type.as_str(),
                &scope.content_id,
            )
        })?;
        Ok(raw.map(|r| StreakState {
            count: r.count.max(0) as u32,
            last_counted_day: r
                .last_counted_day
                .as_deref()
                .and_then(|s| chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()),
        }))
    }

    fn require_user(&self, user_id: &str) -> PulseResult<String> {
        self.readers
            .with_conn(|conn| user_ops::get_user_role(conn, user_id))?
            .ok_or_else(|| PulseError::UserNotFound {
                id: user_id.to_string(),
            })
    }

    fn notify_best_effort(&self, note: Notification) {
        if let Some(sink) = &self.sink {
            if let Err(e) = sink.notify(note) {
                // Delivery problems never fail the completion.
                warn!("notification sink failed: {e}");
            }
        }
    }

    async fn refresh_streak_cache(
        &self,
        user_id: &str,
        scope: &ProgressScope,
        state: &StreakState,
    ) -> PulseResult<()> {
        let user_id = user_id.to_string();
        let scope_type = scope.content_type.as_str();
        let scope_id = scope.content_id.clone();
        let count = i64::from(state.count);
        let last = state.last_counted_day.map(|d| d.to_string());
        let updated_at = self.clock.now().to_rfc3339();
        self.writer
            .with_conn(move |conn| {
                streak_ops::upsert_streak(
                    conn,
                    &user_id,
                    scope_type,
                    &scope_id,
                    count,
                    last.as_deref(),
                    &updated_at,
                )
            })
            .await
    }
}

impl IProgressEngine for ProgressEngine {
    async fn record_completion(
        &self,
        user_id: &str,
        content_type: ContentType,
        content_id: &str,
        unit: &str,
        metrics: Option<CompletionMetrics>,
    ) -> PulseResult<CompletionOutcome> {
        validate_id("user_id", user_id)?;
        validate_id("content_id", content_id)?;
        validate_id("unit", unit)?;
        let role = self.require_user(user_id)?;

        let now = self.clock.now();
        let today = self.config.calendar_day(now);

        let record = CompletionRecord {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            content_type,
            content_id: content_id.to_string(),
            unit: unit.to_string(),
            completed_on: today,
            recorded_at: now,
            metrics,
        };

        let (created, record) = ledger::append::append(&self.writer, record).await?;
        if !created {
            debug!(user_id, content_id, unit, "already completed today");
            return Ok(CompletionOutcome { created, record });
        }

        let scope = ProgressScope::new(content_type, content_id);
        let streak = streak::compute(
            &self.readers,
            user_id,
            &scope,
            today,
            self.config.streak_grace_days,
        )?;
        self.refresh_streak_cache(user_id, &scope, &streak).await?;

        let total = ledger::query::count(&self.readers, user_id, &scope)?;
        let unlocked =
            achievements::evaluate(&self.writer, user_id, &scope, total, streak.count, now)
                .await?;

        self.notify_best_effort(Notification {
            user_id: user_id.to_string(),
            role: role.clone(),
            title: "Workout logged".to_string(),
            message: format!("{unit} of {content_id} completed"),
            category: "progress".to_string(),
            icon: "check".to_string(),
        });
        for key in &unlocked {
            self.notify_best_effort(Notification {
                user_id: user_id.to_string(),
                role: role.clone(),
                title: "Achievement unlocked".to_string(),
                message: achievement_message(*key).to_string(),
                category: "achievement".to_string(),
                icon: "trophy".to_string(),
            });
        }

        Ok(CompletionOutcome { created, record })
    }

    async fn compute_streak(
        &self,
        user_id: &str,
        scope: &ProgressScope,
    ) -> PulseResult<StreakState> {
        validate_id("user_id", user_id)?;
        let today = self.config.calendar_day(self.clock.now());
        streak::compute(
            &self.readers,
            user_id,
            scope,
            today,
            self.config.streak_grace_days,
        )
    }

    async fn get_achievements(
        &self,
        user_id: &str,
        scope: &ProgressScope,
    ) -> PulseResult<Vec<AchievementKey>> {
        validate_id("user_id", user_id)?;
        achievements::stored(&self.readers, user_id, scope)
    }

    async fn completion_count(&self, user_id: &str, scope: &ProgressScope) -> PulseResult<u64> {
        validate_id("user_id", user_id)?;
        ledger::query::count(&self.readers, user_id, scope)
    }

    async fn completion_history(
        &self,
        user_id: &str,
        scope: &ProgressScope,
    ) -> PulseResult<Vec<CompletionRecord>> {
        validate_id("user_id", user_id)?;
        ledger::query::history(&self.readers, user_id, scope)
    }
}

fn achievement_message(key: AchievementKey) -> &'static str {
    match key {
        AchievementKey::FirstCompletion => "First workout in the books",
        AchievementKey::TenCompletions => "10 workouts completed",
        AchievementKey::SevenDayStreak => "7 days in a row",
    }
}
