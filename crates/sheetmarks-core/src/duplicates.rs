//! Duplicate detection
//!
//! Records are grouped by a normalized URL key: the URL lowercased, then
//! trimmed. Nothing else is folded, so `https://a.com` and `https://a.com/`
//! are different keys.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::{BookmarkRecord, IndexedBookmark};

/// Identity key used to detect duplicates
pub fn normalize_url(url: &str) -> String {
    url.to_lowercase().trim().to_string()
}

/// Records sharing one normalized URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateGroup {
    /// The shared normalized URL
    pub key: String,
    /// Members in store order, each with its logical index
    pub entries: Vec<IndexedBookmark>,
}

impl DuplicateGroup {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Group records (in store order) whose normalized URLs collide
///
/// Groups come back ordered by key; records with a unique key are left out.
pub fn find_groups(records: &[BookmarkRecord]) -> Vec<DuplicateGroup> {
    let mut by_key: BTreeMap<String, Vec<IndexedBookmark>> = BTreeMap::new();
    for (index, record) in records.iter().enumerate() {
        by_key
            .entry(normalize_url(&record.url))
            .or_default()
            .push(IndexedBookmark::new(index, record.clone()));
    }

    by_key
        .into_iter()
        .filter(|(_, entries)| entries.len() >= 2)
        .map(|(key, entries)| DuplicateGroup { key, entries })
        .collect()
}

/// Total number of records that belong to some duplicate group
pub fn duplicate_entry_count(groups: &[DuplicateGroup]) -> usize {
    groups.iter().map(DuplicateGroup::len).sum()
}
