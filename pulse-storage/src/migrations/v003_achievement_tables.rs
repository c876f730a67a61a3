//! v003: achievement set + streak display cache.

use rusqlite::Connection;

use pulse_core::errors::PulseResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> PulseResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS achievements (
            user_id         TEXT NOT NULL,
            scope_type      TEXT NOT NULL,
            scope_id        TEXT NOT NULL,
            achievement_key TEXT NOT NULL,
            unlocked_at     TEXT NOT NULL,
            PRIMARY KEY (user_id, scope_type, scope_id, achievement_key),
            FOREIGN KEY (user_id) REFERENCES users(id)
        );

        CREATE TABLE IF NOT EXISTS streak_cache (
            user_id          TEXT NOT NULL,
            scope_type       TEXT NOT NULL,
            scope_id         TEXT NOT NULL,
            count            INTEGER NOT NULL,
            last_counted_day TEXT,
            updated_at       TEXT NOT NULL,
            PRIMARY KEY (user_id, scope_type, scope_id),
            FOREIGN KEY (user_id) REFERENCES users(id)
        );
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
