//! Raw SQL operations for the streak display cache.
//!
//! Cache only: the streak engine recomputes from the ledger on every
//! authoritative read; this table exists for cheap list-view reads.

use rusqlite::{params, Connection, OptionalExtension};

use pulse_core::errors::PulseResult;

use crate::to_storage_err;

/// Raw cached streak row.
#[derive(Debug, Clone)]
pub struct RawStreak {
    pub count: i64,
    pub last_counted_day: Option<String>,
    pub updated_at: String,
}

pub fn upsert_streak(
    conn: &Connection,
    user_id: &str,
    scope_type: &str,
    scope_id: &str,
    count: i64,
    last_counted_day: Option<&str>,
    updated_at: &str,
) -> PulseResult<()> {
    conn.execute(
        "INSERT INTO streak_cache
            (user_id, scope_type, scope_id, count, last_counted_day, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)
         ON CONFLICT(user_id, scope_type, scope_id) DO UPDATE SET
            count = excluded.count,
            last_counted_day = excluded.last_counted_day,
            updated_at = excluded.updated_at",
        params![user_id, scope_type, scope_id, count, last_counted_day, updated_at],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn get_streak(
    conn: &Connection,
    user_id: &str,
    scope_type: &str,
    scope_id: &str,
) -> PulseResult<Option<RawStreak>> {
    conn.query_row(
        "SELECT count, last_counted_day, updated_at FROM streak_cache
         WHERE user_id = ?1 AND scope_type = ?2 AND scope_id = ?3",
        params![user_id, scope_type, scope_id],
        |row| {
            Ok(RawStreak {
                count: row.get(0)?,
                last_counted_day: row.get(1)?,
                updated_at: row.get(2)?,
            })
        },
    )
    .optional()
    .map_err(|e| to_storage_err(e.to_string()))
}
