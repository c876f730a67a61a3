//! v002: the append-only completion ledger.

use rusqlite::Connection;

use pulse_core::errors::PulseResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> PulseResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS completions (
            id           TEXT PRIMARY KEY,
            user_id      TEXT NOT NULL,
            content_type TEXT NOT NULL,
            content_id   TEXT NOT NULL,
            unit         TEXT NOT NULL,
            completed_on TEXT NOT NULL,
            recorded_at  TEXT NOT NULL,
            metrics      TEXT,
            UNIQUE(user_id, content_type, content_id, unit, completed_on),
            FOREIGN KEY (user_id) REFERENCES users(id)
        );

        CREATE INDEX IF NOT EXISTS idx_completions_scope_day
            ON completions(user_id, content_type, content_id, completed_on);
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
