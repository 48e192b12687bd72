//! Record-oriented access to a worksheet
//!
//! [`RowStore`] is the only code that knows how logical bookmark positions
//! relate to the worksheet's physical rows. Logical index `i` (zero-based,
//! in [`RowStore::fetch_all`] order) lives on physical row `i + 2`: rows are
//! numbered from 1 and row 1 holds the header.

use tracing::{debug, info};

use super::error::{StoreError, StoreResult};
use super::schema::{self, HEADER_ROWS};
use super::worksheet::Worksheet;
use crate::models::BookmarkRecord;

/// Bookmark persistence on top of a [`Worksheet`]
///
/// Nothing is cached: every call reads the worksheet again.
pub struct RowStore<W: Worksheet> {
    sheet: W,
}

impl<W: Worksheet> RowStore<W> {
    pub fn new(sheet: W) -> Self {
        Self { sheet }
    }

    /// The underlying worksheet
    pub fn worksheet(&self) -> &W {
        &self.sheet
    }

    /// Physical 1-based row number of a logical index
    pub fn physical_row(index: usize) -> usize {
        index + HEADER_ROWS + 1
    }

    /// All records in store order, oldest first
    pub fn fetch_all(&self) -> StoreResult<Vec<BookmarkRecord>> {
        let rows = self.sheet.read_rows()?;
        let records = schema::rows_to_records(&rows);
        debug!(
            "Fetched {} record(s) from {}",
            records.len(),
            self.sheet.describe()
        );
        Ok(records)
    }

    /// Append one record after the last row
    ///
    /// A worksheet without any rows gets the header written first, so the
    /// record lands on physical row 2.
    pub fn append(&mut self, record: &BookmarkRecord) -> StoreResult<()> {
        if self.sheet.read_rows()?.is_empty() {
            info!("Writing header row to empty {}", self.sheet.describe());
            self.sheet.append_row(schema::header_row())?;
        }

        self.sheet.append_row(schema::record_to_row(record))?;
        info!("Appended bookmark '{}' ({})", record.title, record.url);
        Ok(())
    }

    /// Delete the record at a logical index and return it
    ///
    /// Bounds are checked against a fresh read, since the sheet may have
    /// changed since the caller listed it. The check and the delete are two
    /// separate calls; a concurrent writer in between can still shift rows.
    pub fn delete_at(&mut self, index: usize) -> StoreResult<BookmarkRecord> {
        let mut records = self.fetch_all()?;
        if index >= records.len() {
            return Err(StoreError::IndexOutOfRange {
                index,
                len: records.len(),
            });
        }

        let physical = Self::physical_row(index);
        self.sheet.delete_row(physical)?;

        let removed = records.swap_remove(index);
        info!(
            "Deleted bookmark '{}' at index {} (row {})",
            removed.title, index, physical
        );
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Timestamp;
    use crate::storage::schema::{header_row, record_to_row};
    use crate::storage::worksheet::MemoryWorksheet;

    fn record(title: &str) -> BookmarkRecord {
        BookmarkRecord {
            created_at: Timestamp::from_raw("2025-01-01 00:00:00"),
            title: title.to_string(),
            url: format!("https://{}.example.com", title),
            category: "Tools".to_string(),
            tags: String::new(),
            notes: String::new(),
        }
    }

    fn store_with(titles: &[&str]) -> RowStore<MemoryWorksheet> {
        let mut rows = vec![header_row()];
        rows.extend(titles.iter().map(|t| record_to_row(&record(t))));
        RowStore::new(MemoryWorksheet::with_rows(rows))
    }

    fn titles(store: &RowStore<MemoryWorksheet>) -> Vec<String> {
        store
            .fetch_all()
            .unwrap()
            .into_iter()
            .map(|r| r.title)
            .collect()
    }

    #[test]
    fn test_physical_row_mapping() {
        assert_eq!(RowStore::<MemoryWorksheet>::physical_row(0), 2);
        assert_eq!(RowStore::<MemoryWorksheet>::physical_row(1), 3);
        assert_eq!(RowStore::<MemoryWorksheet>::physical_row(41), 43);
    }

    #[test]
    fn test_fetch_all_in_store_order() {
        let store = store_with(&["one", "two", "three"]);
        assert_eq!(titles(&store), vec!["one", "two", "three"]);
    }

    #[test]
    fn test_fetch_all_is_idempotent() {
        let store = store_with(&["one", "two"]);
        assert_eq!(store.fetch_all().unwrap(), store.fetch_all().unwrap());
    }

    #[test]
    fn test_append_places_record_last() {
        let mut store = store_with(&["one", "two"]);
        store.append(&record("three")).unwrap();
        assert_eq!(titles(&store), vec!["one", "two", "three"]);
    }

    #[test]
    fn test_append_to_empty_sheet_writes_header() {
        let mut store = RowStore::new(MemoryWorksheet::new());
        store.append(&record("first")).unwrap();

        let rows = store.worksheet().rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], header_row());
        assert_eq!(titles(&store), vec!["first"]);
    }

    #[test]
    fn test_delete_first_removes_physical_row_two() {
        let mut store = store_with(&["a", "b", "c"]);

        let removed = store.delete_at(0).unwrap();
        assert_eq!(removed.title, "a");
        assert_eq!(store.worksheet().deleted_rows(), &[2]);
        assert_eq!(titles(&store), vec!["b", "c"]);
    }

    #[test]
    fn test_delete_last_removes_physical_row_four() {
        let mut store = store_with(&["a", "b", "c"]);

        let removed = store.delete_at(2).unwrap();
        assert_eq!(removed.title, "c");
        assert_eq!(store.worksheet().deleted_rows(), &[4]);
        assert_eq!(titles(&store), vec!["a", "b"]);
    }

    #[test]
    fn test_delete_middle_keeps_neighbours() {
        let mut store = store_with(&["a", "b", "c", "d"]);

        store.delete_at(1).unwrap();
        assert_eq!(store.worksheet().deleted_rows(), &[3]);
        assert_eq!(titles(&store), vec!["a", "c", "d"]);
        // Header untouched
        assert_eq!(store.worksheet().rows()[0], header_row());
    }

    #[test]
    fn test_repeated_delete_at_zero_walks_the_sheet() {
        let mut store = store_with(&["a", "b", "c"]);

        for expected in ["a", "b", "c"] {
            assert_eq!(store.delete_at(0).unwrap().title, expected);
        }
        assert_eq!(store.worksheet().deleted_rows(), &[2, 2, 2]);
        assert!(store.fetch_all().unwrap().is_empty());
    }

    #[test]
    fn test_delete_out_of_range_leaves_store_unchanged() {
        let mut store = store_with(&["a", "b", "c"]);

        let err = store.delete_at(3).unwrap_err();
        assert!(matches!(err, StoreError::IndexOutOfRange { index: 3, len: 3 }));

        let err = store.delete_at(usize::MAX).unwrap_err();
        assert!(matches!(err, StoreError::IndexOutOfRange { .. }));

        assert!(store.worksheet().deleted_rows().is_empty());
        assert_eq!(titles(&store), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_delete_on_empty_store() {
        let mut store = RowStore::new(MemoryWorksheet::new());
        let err = store.delete_at(0).unwrap_err();
        assert!(matches!(err, StoreError::IndexOutOfRange { index: 0, len: 0 }));
    }

    #[test]
    fn test_delete_rechecks_bounds_after_external_change() {
        let mut store = store_with(&["a", "b", "c"]);
        let listed = store.fetch_all().unwrap();
        assert_eq!(listed.len(), 3);

        // Someone else removes a row directly in the sheet
        let mut sheet = store.worksheet().clone();
        sheet.delete_row(4).unwrap();
        let mut store = RowStore::new(sheet);

        let err = store.delete_at(2).unwrap_err();
        assert!(matches!(err, StoreError::IndexOutOfRange { index: 2, len: 2 }));
    }

    #[test]
    fn test_unavailable_store() {
        let mut sheet = MemoryWorksheet::with_rows(vec![header_row()]);
        sheet.set_offline(true);
        let mut store = RowStore::new(sheet);

        assert!(store.fetch_all().unwrap_err().is_unavailable());
        assert!(store.append(&record("x")).unwrap_err().is_unavailable());
        assert!(store.delete_at(0).unwrap_err().is_unavailable());
    }
}
