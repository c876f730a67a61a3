mod completion;
mod content;
mod user;

pub use completion::{
    AchievementKey, CompletionMetrics, CompletionOutcome, CompletionRecord, ProgressScope,
    StreakState,
};
pub use content::{AccessReason, ContentCard, ContentItem, ContentType, MembershipTier};
pub use user::{ContentRef, ContentSource, Membership, UserProfile};

use crate::errors::{PulseError, PulseResult};

/// Maximum accepted length for caller-supplied identifiers.
pub const MAX_ID_LEN: usize = 128;

/// Validate a caller-supplied identifier (user id, content id, unit).
///
/// Structural check only: non-empty, bounded length, no control
/// characters. Whether the id *resolves* is a separate question answered
/// by the catalog or user store.
pub fn validate_id(label: &str, value: &str) -> PulseResult<()> {
    if value.is_empty() {
        return Err(PulseError::ValidationError(format!("{label} is empty")));
    }
    if value.len() > MAX_ID_LEN {
        return Err(PulseError::ValidationError(format!(
            "{label} exceeds {MAX_ID_LEN} bytes"
        )));
    }
    if value.chars().any(char::is_control) {
        return Err(PulseError::ValidationError(format!(
            "{label} contains control characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_id_accepts_normal_ids() {
        assert!(validate_id("user_id", "user-42").is_ok());
        assert!(validate_id("unit", "day-3").is_ok());
    }

    #[test]
    fn validate_id_rejects_empty_and_oversized() {
        assert!(validate_id("user_id", "").is_err());
        assert!(validate_id("user_id", &"x".repeat(MAX_ID_LEN + 1)).is_err());
    }

    #[test]
    fn validate_id_rejects_control_characters() {
        assert!(validate_id("unit", "day\n1").is_err());
    }
}
