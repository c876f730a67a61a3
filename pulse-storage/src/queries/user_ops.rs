//! Raw SQL operations for the users, user_content, and memberships tables.

use rusqlite::{params, Connection, OptionalExtension};

use pulse_core::errors::PulseResult;

use crate::to_storage_err;

/// Raw content-grant row (purchase or assignment).
#[derive(Debug, Clone)]
pub struct RawGrant {
    pub content_type: String,
    pub content_id: String,
    pub source: String,
    pub granted_at: String,
}

/// Raw membership row.
#[derive(Debug, Clone)]
pub struct RawMembership {
    pub tier: String,
    pub is_active: bool,
    pub started_at: String,
    pub expires_at: Option<String>,
}

/// Insert a user if absent. Returns true if the row was created.
pub fn insert_user(conn: &Connection, id: &str, role: &str, created_at: &str) -> PulseResult<bool> {
    let changed = conn
        .execute(
            "INSERT OR IGNORE INTO users (id, role, created_at) VALUES (?1, ?2, ?3)",
            params![id, role, created_at],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(changed == 1)
}

pub fn user_exists(conn: &Connection, id: &str) -> PulseResult<bool> {
    conn.prepare("SELECT 1 FROM users WHERE id = ?1")
        .and_then(|mut stmt| stmt.exists([id]))
        .map_err(|e| to_storage_err(e.to_string()))
}

pub fn get_user_role(conn: &Connection, id: &str) -> PulseResult<Option<String>> {
    conn.query_row("SELECT role FROM users WHERE id = ?1", [id], |row| {
        row.get(0)
    })
    .optional()
    .map_err(|e| to_storage_err(e.to_string()))
}

/// Insert a content grant. Idempotent per (user, type, id, source);
/// returns true if a new row was created.
pub fn insert_grant(
    conn: &Connection,
    user_id: &str,
    content_type: &str,
    content_id: &str,
    source: &str,
    granted_at: &str,
) -> PulseResult<bool> {
    let changed = conn
        .execute(
            "INSERT OR IGNORE INTO user_content
                (user_id, content_type, content_id, source, granted_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![user_id, content_type, content_id, source, granted_at],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(changed == 1)
}

/// Grants of one content type for a user, purchases before assignments,
/// then oldest first — a stable order for reason attribution.
pub fn get_grants(
    conn: &Connection,
    user_id: &str,
    content_type: &str,
) -> PulseResult<Vec<RawGrant>> {
    let mut stmt = conn
        .prepare(
            "SELECT content_type, content_id, source, granted_at
             FROM user_content
             WHERE user_id = ?1 AND content_type = ?2
             ORDER BY source DESC, entry_id ASC",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    let rows = stmt
        .query_map(params![user_id, content_type], |row| {
            Ok(RawGrant {
                content_type: row.get(0)?,
                content_id: row.get(1)?,
                source: row.get(2)?,
                granted_at: row.get(3)?,
            })
        })
        .map_err(|e| to_storage_err(e.to_string()))?;

    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| to_storage_err(e.to_string()))
}

/// Every grant for a user across content types.
pub fn get_all_grants(conn: &Connection, user_id: &str) -> PulseResult<Vec<RawGrant>> {
    let mut stmt = conn
        .prepare(
            "SELECT content_type, content_id, source, granted_at
             FROM user_content WHERE user_id = ?1
             ORDER BY entry_id ASC",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    let rows = stmt
        .query_map([user_id], |row| {
            Ok(RawGrant {
                content_type: row.get(0)?,
                content_id: row.get(1)?,
                source: row.get(2)?,
                granted_at: row.get(3)?,
            })
        })
        .map_err(|e| to_storage_err(e.to_string()))?;

    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| to_storage_err(e.to_string()))
}

/// Insert or replace the user's membership row.
pub fn upsert_membership(
    conn: &Connection,
    user_id: &str,
    tier: &str,
    is_active: bool,
    started_at: &str,
    expires_at: Option<&str>,
) -> PulseResult<()> {
    conn.execute(
        "INSERT INTO memberships (user_id, tier, is_active, started_at, expires_at)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(user_id) DO UPDATE SET
            tier = excluded.tier,
            is_active = excluded.is_active,
            started_at = excluded.started_at,
            expires_at = excluded.expires_at",
        params![user_id, tier, is_active as i64, started_at, expires_at],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn get_membership(conn: &Connection, user_id: &str) -> PulseResult<Option<RawMembership>> {
    conn.query_row(
        "SELECT tier, is_active, started_at, expires_at FROM memberships WHERE user_id = ?1",
        [user_id],
        |row| {
            Ok(RawMembership {
                tier: row.get(0)?,
                is_active: row.get::<_, i64>(1)? != 0,
                started_at: row.get(2)?,
                expires_at: row.get(3)?,
            })
        },
    )
    .optional()
    .map_err(|e| to_storage_err(e.to_string()))
}
