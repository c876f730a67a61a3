//! # pulse-entitlements
//!
//! The read-path entitlement resolver: given a user's purchases,
//! assignments, and membership state, produce the deduplicated set of
//! content they may see. Malformed references are skipped, expired
//! memberships contribute nothing, and the result is stable regardless
//! of source ordering.

pub mod resolver;

pub use resolver::EntitlementResolver;
