//! IEntitlementResolver — the read-path entitlement interface.

use crate::errors::PulseResult;
use crate::models::{ContentCard, ContentType};

/// Resolves which content of one type a user may currently see, merging
/// purchases, admin assignments, and active-membership tier visibility.
///
/// Guarantees: no duplicate content ids; expired or inactive memberships
/// contribute nothing; unresolvable purchase/assignment rows are skipped,
/// never fatal. The only error paths are an unknown user and
/// structurally invalid arguments.
#[allow(async_fn_in_trait)]
pub trait IEntitlementResolver: Send + Sync {
    async fn resolve_entitlements(
        &self,
        user_id: &str,
        content_type: ContentType,
    ) -> PulseResult<Vec<ContentCard>>;
}
