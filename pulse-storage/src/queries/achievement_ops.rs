//! Raw SQL operations for the achievements table.
//!
//! Write path is INSERT OR IGNORE only — the set is monotonic and rows
//! are never updated or deleted.

use rusqlite::{params, Connection};

use pulse_core::errors::PulseResult;

use crate::to_storage_err;

/// Record an unlocked achievement. Returns true if this call unlocked it
/// (false when it was already present).
pub fn insert_achievement(
    conn: &Connection,
    user_id: &str,
    scope_type: &str,
    scope_id: &str,
    achievement_key: &str,
    unlocked_at: &str,
) -> PulseResult<bool> {
    let changed = conn
        .execute(
            "INSERT OR IGNORE INTO achievements
                (user_id, scope_type, scope_id, achievement_key, unlocked_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![user_id, scope_type, scope_id, achievement_key, unlocked_at],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(changed == 1)
}

/// All achievement keys stored for a scope, in unlock order.
pub fn get_achievements(
    conn: &Connection,
    user_id: &str,
    scope_type: &str,
    scope_id: &str,
) -> PulseResult<Vec<String>> {
    let mut stmt = conn
        .prepare(
            "SELECT achievement_key FROM achievements
             WHERE user_id = ?1 AND scope_type = ?2 AND scope_id = ?3
             ORDER BY unlocked_at ASC, achievement_key ASC",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    let rows = stmt
        .query_map(params![user_id, scope_type, scope_id], |row| {
            row.get::<_, String>(0)
        })
        .map_err(|e| to_storage_err(e.to_string()))?;

    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| to_storage_err(e.to_string()))
}
