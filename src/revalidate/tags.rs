use std::fmt;

use serde::{Deserialize, Serialize};

/// Cache partitions that rendered content is labelled with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CacheTag {
    Pages,
    News,
    Politicians,
    Events,
    Politics,
    ListingPages,
    /// Header, footer and global settings shared by every page.
    Layout,
}

impl CacheTag {
    pub fn as_str(self) -> &'static str {
        match self {
            CacheTag::Pages => "pages",
            CacheTag::News => "news",
            CacheTag::Politicians => "politicians",
            CacheTag::Events => "events",
            CacheTag::Politics => "politics",
            CacheTag::ListingPages => "listing-pages",
            CacheTag::Layout => "layout",
        }
    }
}

impl fmt::Display for CacheTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Singleton configuration documents. Their `_id` equals their `_type`.
pub const LAYOUT_SINGLETONS: [&str; 3] = ["navigationHeader", "navigationFooter", "globalSettings"];

const DRAFT_PREFIX: &str = "drafts.";

/// Whether the notification concerns a layout singleton.
///
/// Matches the document type, or the document id with any draft prefix
/// removed.
pub fn is_layout_singleton(document_type: &str, document_id: Option<&str>) -> bool {
    if LAYOUT_SINGLETONS.contains(&document_type) {
        return true;
    }
    document_id
        .map(|id| id.strip_prefix(DRAFT_PREFIX).unwrap_or(id))
        .is_some_and(|id| LAYOUT_SINGLETONS.contains(&id))
}

/// Map a changed document to the cache tags it invalidates.
///
/// Pure and total: unknown types yield no tags, singletons always yield
/// `[Layout]`.
pub fn tags_for(document_type: &str, document_id: Option<&str>) -> Vec<CacheTag> {
    if is_layout_singleton(document_type, document_id) {
        return vec![CacheTag::Layout];
    }

    match document_type {
        "page" => vec![CacheTag::Pages],
        "news" => vec![CacheTag::News],
        "politician" => vec![CacheTag::Politicians],
        "event" => vec![CacheTag::Events],
        "politicalArea" | "geographicalArea" | "politicalIssue" => vec![CacheTag::Politics],
        "listingPage" => vec![CacheTag::ListingPages],
        _ => Vec::new(),
    }
}
