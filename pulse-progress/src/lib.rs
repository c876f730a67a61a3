//! # pulse-progress
//!
//! The write path of the Pulse core: an idempotent completion ledger,
//! the consecutive-day streak engine derived from it, and the monotonic
//! achievement evaluator. Orchestrated by [`ProgressEngine`]: a created
//! ledger row triggers streak recomputation, cache refresh, achievement
//! evaluation, and best-effort notifications.

pub mod achievements;
pub mod engine;
pub mod ledger;
pub mod streak;

pub use engine::ProgressEngine;
