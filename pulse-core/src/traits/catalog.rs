//! ICatalog — the external content-catalog collaborator.

use crate::models::{ContentItem, ContentType};

/// Read-only catalog lookup. Implemented outside this core (the catalog
/// service owns authoring, bodies, and media); the resolver only needs
/// these two calls.
///
/// Object-safe on purpose: engines hold it as `Arc<dyn ICatalog>`.
pub trait ICatalog: Send + Sync {
    /// Resolve one item. None for unknown or deleted ids — the resolver
    /// treats that as a skippable malformed reference, never a failure.
    fn find_content(&self, content_type: ContentType, id: &str) -> Option<ContentItem>;

    /// All catalog items of one type, for membership-tier visibility.
    fn list_content(&self, content_type: ContentType) -> Vec<ContentItem>;
}
