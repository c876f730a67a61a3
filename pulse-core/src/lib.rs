//! # pulse-core
//!
//! Shared types for the Pulse entitlement and progress core.
//! Data model, error taxonomy, configuration, and the trait seams
//! (`ICatalog`, `IEntitlementResolver`, `IProgressEngine`, ...) that the
//! other Pulse crates implement or consume.

pub mod config;
pub mod errors;
pub mod models;
pub mod traits;

pub use errors::{PulseError, PulseResult};
