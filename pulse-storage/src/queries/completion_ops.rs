//! Raw SQL operations for the completions ledger table.

use rusqlite::{params, Connection, OptionalExtension};

use pulse_core::errors::PulseResult;

use crate::to_storage_err;

/// Raw ledger row.
#[derive(Debug, Clone)]
pub struct RawCompletion {
    pub id: String,
    pub user_id: String,
    pub content_type: String,
    pub content_id: String,
    pub unit: String,
    pub completed_on: String,
    pub recorded_at: String,
    pub metrics: Option<String>,
}

const SELECT_COLS: &str =
    "id, user_id, content_type, content_id, unit, completed_on, recorded_at, metrics";

fn row_to_completion(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawCompletion> {
    Ok(RawCompletion {
        id: row.get(0)?,
        user_id: row.get(1)?,
        content_type: row.get(2)?,
        content_id: row.get(3)?,
        unit: row.get(4)?,
        completed_on: row.get(5)?,
        recorded_at: row.get(6)?,
        metrics: row.get(7)?,
    })
}

/// Idempotent ledger append. The UNIQUE index on
/// (user_id, content_type, content_id, unit, completed_on) absorbs the
/// conflict; returns true only when a new row was written.
#[allow(clippy::too_many_arguments)]
pub fn insert_completion(
    conn: &Connection,
    id: &str,
    user_id: &str,
    content_type: &str,
    content_id: &str,
    unit: &str,
    completed_on: &str,
    recorded_at: &str,
    metrics: Option<&str>,
) -> PulseResult<bool> {
    let changed = conn
        .execute(
            "INSERT INTO completions
                (id, user_id, content_type, content_id, unit, completed_on, recorded_at, metrics)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
             ON CONFLICT(user_id, content_type, content_id, unit, completed_on) DO NOTHING",
            params![
                id,
                user_id,
                content_type,
                content_id,
                unit,
                completed_on,
                recorded_at,
                metrics,
            ],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(changed == 1)
}

/// Fetch the ledger row for one idempotency key, if present.
pub fn get_completion(
    conn: &Connection,
    user_id: &str,
    content_type: &str,
    content_id: &str,
    unit: &str,
    completed_on: &str,
) -> PulseResult<Option<RawCompletion>> {
    conn.query_row(
        &format!(
            "SELECT {SELECT_COLS} FROM completions
             WHERE user_id = ?1 AND content_type = ?2 AND content_id = ?3
               AND unit = ?4 AND completed_on = ?5"
        ),
        params![user_id, content_type, content_id, unit, completed_on],
        row_to_completion,
    )
    .optional()
    .map_err(|e| to_storage_err(e.to_string()))
}

/// Distinct calendar days with at least one completion in a scope,
/// newest first. This is the streak engine's entire input.
pub fn distinct_days(
    conn: &Connection,
    user_id: &str,
    content_type: &str,
    content_id: &str,
) -> PulseResult<Vec<String>> {
    let mut stmt = conn
        .prepare(
            "SELECT DISTINCT completed_on FROM completions
             WHERE user_id = ?1 AND content_type = ?2 AND content_id = ?3
             ORDER BY completed_on DESC",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    let rows = stmt
        .query_map(params![user_id, content_type, content_id], |row| {
            row.get::<_, String>(0)
        })
        .map_err(|e| to_storage_err(e.to_string()))?;

    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| to_storage_err(e.to_string()))
}

/// Total ledger rows in a scope.
pub fn count_completions(
    conn: &Connection,
    user_id: &str,
    content_type: &str,
    content_id: &str,
) -> PulseResult<u64> {
    conn.query_row(
        "SELECT COUNT(*) FROM completions
         WHERE user_id = ?1 AND content_type = ?2 AND content_id = ?3",
        params![user_id, content_type, content_id],
        |row| row.get::<_, i64>(0),
    )
    .map(|n| n as u64)
    .map_err(|e| to_storage_err(e.to_string()))
}

/// Full history for a scope, oldest first.
pub fn get_history(
    conn: &Connection,
    user_id: &str,
    content_type: &str,
    content_id: &str,
) -> PulseResult<Vec<RawCompletion>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {SELECT_COLS} FROM completions
             WHERE user_id = ?1 AND content_type = ?2 AND content_id = ?3
             ORDER BY completed_on ASC, recorded_at ASC"
        ))
        .map_err(|e| to_storage_err(e.to_string()))?;

    let rows = stmt
        .query_map(params![user_id, content_type, content_id], row_to_completion)
        .map_err(|e| to_storage_err(e.to_string()))?;

    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| to_storage_err(e.to_string()))
}
