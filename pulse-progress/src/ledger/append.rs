//! Idempotent ledger append.

use std::sync::Arc;

use pulse_core::errors::PulseResult;
use pulse_core::models::CompletionRecord;
use pulse_storage::pool::WriteConnection;
use pulse_storage::queries::completion_ops;
use pulse_storage::to_storage_err;

use super::query::parse_completion;

/// Append a completion. Returns `(true, record)` when a new row landed,
/// `(false, existing)` when the idempotency key already had one.
///
/// The insert and the conflict-path fetch run inside a single
/// `with_conn` call, so a racing duplicate either wins the insert or
/// reads the winner's row.
pub async fn append(
    writer: &Arc<WriteConnection>,
    record: CompletionRecord,
) -> PulseResult<(bool, CompletionRecord)> {
    let metrics_json = record
        .metrics
        .as_ref()
        .map(serde_json::to_string)
        .transpose()?;

    let id = record.id.clone();
    let user_id = record.user_id.clone();
    let content_type = record.content_type;
    let content_id = record.content_id.clone();
    let unit = record.unit.clone();
    let completed_on = record.completed_on.to_string();
    let recorded_at = record.recorded_at.to_rfc3339();

    let (created, existing) = writer
        .with_conn(move |conn| {
            let created = completion_ops::insert_completion(
                conn,
                &id,
                &user_id,
                content_type.as_str(),
                &content_id,
                &unit,
                &completed_on,
                &recorded_at,
                metrics_json.as_deref(),
            )?;
            if created {
                Ok((true, None))
            } else {
                let existing = completion_ops::get_completion(
                    conn,
                    &user_id,
                    content_type.as_str(),
                    &content_id,
                    &unit,
                    &completed_on,
                )?;
                Ok((false, existing))
            }
        })
        .await?;

    if created {
        return Ok((true, record));
    }
    match existing {
        Some(raw) => Ok((false, parse_completion(raw)?)),
        None => Err(to_storage_err(
            "completion insert conflicted but existing row is missing".to_string(),
        )),
    }
}
