//! The completion ledger: idempotent append plus derived reads.

pub mod append;
pub mod query;
