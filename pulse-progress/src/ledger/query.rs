//! Ledger reads: distinct days, counts, history.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};

use pulse_core::errors::{ProgressError, PulseResult};
use pulse_core::models::{CompletionMetrics, CompletionRecord, ContentType, ProgressScope};
use pulse_storage::pool::ReadPool;
use pulse_storage::queries::completion_ops;
use pulse_storage::queries::completion_ops::RawCompletion;

/// Distinct calendar days with a completion in `scope`, newest first.
pub fn distinct_days(
    readers: &Arc<ReadPool>,
    user_id: &str,
    scope: &ProgressScope,
) -> PulseResult<Vec<NaiveDate>> {
    let raw = readers.with_conn(|conn| {
        completion_ops::distinct_days(
            conn,
            user_id,
            scope.content_type.as_str(),
            &scope.content_id,
        )
    })?;

    raw.into_iter()
        .map(|s| {
            NaiveDate::parse_from_str(&s, "%Y-%m-%d")
                .map_err(|_| ProgressError::InvalidDay(s).into())
        })
        .collect()
}

/// Total completions in `scope`.
pub fn count(readers: &Arc<ReadPool>, user_id: &str, scope: &ProgressScope) -> PulseResult<u64> {
    readers.with_conn(|conn| {
        completion_ops::count_completions(
            conn,
            user_id,
            scope.content_type.as_str(),
            &scope.content_id,
        )
    })
}

/// Full history for `scope`, oldest first.
pub fn history(
    readers: &Arc<ReadPool>,
    user_id: &str,
    scope: &ProgressScope,
) -> PulseResult<Vec<CompletionRecord>> {
    let raw = readers.with_conn(|conn| {
        completion_ops::get_history(
            conn,
            user_id,
            scope.content_type.as_str(),
            &scope.content_id,
        )
    })?;

    raw.into_iter().map(parse_completion).collect()
}

/// Parse a raw ledger row back into the model. Failures here mean the
/// table holds something this system never writes.
pub fn parse_completion(raw: RawCompletion) -> PulseResult<CompletionRecord> {
    let content_type = ContentType::parse(&raw.content_type)
        .ok_or_else(|| ProgressError::UnknownContentTag(raw.content_type.clone()))?;
    let completed_on = NaiveDate::parse_from_str(&raw.completed_on, "%Y-%m-%d")
        .map_err(|_| ProgressError::InvalidDay(raw.completed_on.clone()))?;
    let recorded_at = DateTime::parse_from_rfc3339(&raw.recorded_at)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|_| ProgressError::InvalidTimestamp(raw.recorded_at.clone()))?;
    let metrics: Option<CompletionMetrics> = raw
        .metrics
        .as_deref()
        .map(serde_json::from_str)
        .transpose()
        .map_err(|e| ProgressError::InvalidMetrics(e.to_string()))?;

    Ok(CompletionRecord {
        id: raw.id,
        user_id: raw.user_id,
        content_type,
        content_id: raw.content_id,
        unit: raw.unit,
        completed_on,
        recorded_at,
        metrics,
    })
}
