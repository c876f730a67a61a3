//! v001: schema_version, users, content grants, memberships.

use rusqlite::Connection;

use pulse_core::errors::PulseResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> PulseResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS schema_version (
            version    INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        );

        CREATE TABLE IF NOT EXISTS users (
            id         TEXT PRIMARY KEY,
            role       TEXT NOT NULL DEFAULT 'member',
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS user_content (
            entry_id     INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id      TEXT NOT NULL,
            content_type TEXT NOT NULL,
            content_id   TEXT NOT NULL,
            source       TEXT NOT NULL,
            granted_at   TEXT NOT NULL,
            UNIQUE(user_id, content_type, content_id, source),
            FOREIGN KEY (user_id) REFERENCES users(id)
        );

        CREATE INDEX IF NOT EXISTS idx_user_content_user_type
            ON user_content(user_id, content_type);

        CREATE TABLE IF NOT EXISTS memberships (
            user_id    TEXT PRIMARY KEY,
            tier       TEXT NOT NULL,
            is_active  INTEGER NOT NULL DEFAULT 1,
            started_at TEXT NOT NULL,
            expires_at TEXT,
            FOREIGN KEY (user_id) REFERENCES users(id)
        );
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
