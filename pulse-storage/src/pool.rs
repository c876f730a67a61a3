//! Connection management: one serialized writer, a small read pool.
//!
//! SQLite under WAL tolerates a single writer and many readers. The
//! `WriteConnection` is a tokio-mutexed connection so all mutations —
//! including the idempotent completion insert — are serialized in
//! process; the UNIQUE ledger index covers whatever races remain across
//! processes. Readers never block the writer.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex as StdMutex;

use rusqlite::Connection;
use tokio::sync::Mutex;

use pulse_core::errors::{PulseResult, StorageError};

fn apply_pragmas(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        "PRAGMA journal_mode = WAL;
         PRAGMA synchronous = NORMAL;
         PRAGMA foreign_keys = ON;
         PRAGMA busy_timeout = 5000;",
    )
}

/// The single write connection. All mutations go through `with_conn`.
pub struct WriteConnection {
    conn: Mutex<Connection>,
}

impl WriteConnection {
    /// Open the database for writing and apply pragmas (WAL,
    /// foreign_keys ON, busy_timeout).
    pub fn open(path: impl AsRef<Path>) -> PulseResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| StorageError::ConnectionFailed(e.to_string()))?;
        apply_pragmas(&conn).map_err(|e| StorageError::ConnectionFailed(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Run a closure against the writer. Serialized: concurrent callers
    /// queue on the lock.
    pub async fn with_conn<T, F>(&self, f: F) -> PulseResult<T>
    where
        F: FnOnce(&Connection) -> PulseResult<T> + Send,
        T: Send,
    {
        let conn = self.conn.lock().await;
        f(&conn)
    }
}

/// Round-robin pool of read-only connections.
pub struct ReadPool {
    conns: Vec<StdMutex<Connection>>,
    next: AtomicUsize,
}

impl ReadPool {
    /// Open `size` read connections (minimum 1) against the same file.
    pub fn open(path: impl AsRef<Path>, size: usize) -> PulseResult<Self> {
        let size = size.max(1);
        let mut conns = Vec::with_capacity(size);
        for _ in 0..size {
            let conn = Connection::open(path.as_ref())
                .map_err(|e| StorageError::ConnectionFailed(e.to_string()))?;
            apply_pragmas(&conn).map_err(|e| StorageError::ConnectionFailed(e.to_string()))?;
            conns.push(StdMutex::new(conn));
        }
        Ok(Self {
            conns,
            next: AtomicUsize::new(0),
        })
    }

    /// Run a closure against the next reader in rotation.
    pub fn with_conn<T>(
        &self,
        f: impl FnOnce(&Connection) -> PulseResult<T>,
    ) -> PulseResult<T> {
        let idx = self.next.fetch_add(1, Ordering::Relaxed) % self.conns.len();
        let conn = self.conns[idx]
            .lock()
            .map_err(|_| StorageError::ConnectionFailed("read connection poisoned".to_string()))?;
        f(&conn)
    }
}
