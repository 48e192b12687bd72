//! Bookmark service
//!
//! The entry point for user-facing operations. Each call makes fresh
//! round trips to the row store; nothing is kept between calls.
//!
//! ```ignore
//! let sheet = SheetsWorksheet::from_config(&config)?;
//! let mut service = BookmarkService::new(RowStore::new(sheet));
//!
//! service.add(BookmarkCandidate::new("Rust", "https://rust-lang.org", "Documentation"))?;
//! let newest_first = service.list(None)?;
//! ```

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::duplicates::{self, DuplicateGroup};
use crate::models::{validate, BookmarkCandidate, BookmarkRecord, IndexedBookmark, ValidationError};
use crate::storage::{RowStore, StoreError, Worksheet};

/// Errors surfaced by service operations
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ServiceError {
    /// Get a recovery suggestion for this error
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            ServiceError::Validation(_) => None,
            ServiceError::Store(e) => e.recovery_suggestion(),
        }
    }
}

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Counts shown in status views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BookmarkStats {
    pub total: usize,
    pub duplicate_groups: usize,
    pub duplicate_entries: usize,
}

/// Add, list, search, and delete bookmarks kept in a row store
pub struct BookmarkService<W: Worksheet> {
    store: RowStore<W>,
}

impl<W: Worksheet> BookmarkService<W> {
    pub fn new(store: RowStore<W>) -> Self {
        Self { store }
    }

    /// The underlying row store
    pub fn store(&self) -> &RowStore<W> {
        &self.store
    }

    /// Bookmarks newest first, optionally filtered
    ///
    /// A filter keeps records where the text appears, ignoring case, in any
    /// field (date included). The text is used as given, surrounding spaces
    /// included; only an empty filter lists everything.
    pub fn list(&self, filter: Option<&str>) -> ServiceResult<Vec<IndexedBookmark>> {
        let records = self.store.fetch_all()?;
        let filter = filter.filter(|f| !f.is_empty());

        let listed: Vec<IndexedBookmark> = records
            .into_iter()
            .enumerate()
            .rev()
            .filter(|(_, record)| filter.map_or(true, |f| record.matches(f)))
            .map(|(index, record)| IndexedBookmark::new(index, record))
            .collect();

        debug!("Listed {} bookmark(s) (filter: {:?})", listed.len(), filter);
        Ok(listed)
    }

    /// The bookmark at a logical index
    pub fn get(&self, index: usize) -> ServiceResult<BookmarkRecord> {
        let mut records = self.store.fetch_all()?;
        if index >= records.len() {
            return Err(StoreError::IndexOutOfRange {
                index,
                len: records.len(),
            }
            .into());
        }
        Ok(records.swap_remove(index))
    }

    /// Validate and append a bookmark
    ///
    /// Duplicate URLs are accepted; [`duplicates`](Self::duplicates) reports
    /// them for manual cleanup.
    pub fn add(&mut self, candidate: BookmarkCandidate) -> ServiceResult<BookmarkRecord> {
        let record = validate(candidate)?;
        self.store.append(&record)?;
        Ok(record)
    }

    /// Delete the bookmark at a logical index, returning it
    pub fn remove(&mut self, index: usize) -> ServiceResult<BookmarkRecord> {
        Ok(self.store.delete_at(index)?)
    }

    /// Groups of bookmarks sharing a normalized URL
    pub fn duplicates(&self) -> ServiceResult<Vec<DuplicateGroup>> {
        let records = self.store.fetch_all()?;
        Ok(duplicates::find_groups(&records))
    }

    /// Total and duplicate counts from one fetch
    pub fn stats(&self) -> ServiceResult<BookmarkStats> {
        let records = self.store.fetch_all()?;
        let groups = duplicates::find_groups(&records);
        Ok(BookmarkStats {
            total: records.len(),
            duplicate_groups: groups.len(),
            duplicate_entries: duplicates::duplicate_entry_count(&groups),
        })
    }
}
