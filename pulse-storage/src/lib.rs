//! # pulse-storage
//!
//! SQLite persistence layer for the Pulse entitlement and progress core.
//! Single write connection + read pool (WAL mode), forward-only
//! migrations, and raw query modules over the user, ledger, achievement,
//! and streak-cache tables.

pub mod migrations;
pub mod pool;
pub mod queries;
pub mod user_store;

pub use user_store::UserStore;

/// Helper to convert a string message into a PulseError::StorageError.
pub fn to_storage_err(msg: String) -> pulse_core::PulseError {
    pulse_core::PulseError::StorageError(pulse_core::errors::StorageError::SqliteError {
        message: msg,
    })
}
