//! Worksheet schema
//!
//! The worksheet holds exactly one header row naming the columns, followed by
//! one bookmark per row. Columns are located by header name, so their order
//! in the sheet does not matter; rows are always written in [`COLUMNS`] order.

use tracing::warn;

use crate::models::{BookmarkRecord, Timestamp};

/// Column names, in the order rows are written
pub const COLUMNS: [&str; 6] = ["date", "title", "url", "category", "tags", "notes"];

/// Number of header rows above the first bookmark
pub const HEADER_ROWS: usize = 1;

const DATE: usize = 0;
const TITLE: usize = 1;
const URL: usize = 2;
const CATEGORY: usize = 3;
const TAGS: usize = 4;
const NOTES: usize = 5;

/// The header row as written to a fresh worksheet
pub fn header_row() -> Vec<String> {
    COLUMNS.iter().map(|c| c.to_string()).collect()
}

/// Position of each known column within a header row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMap {
    positions: [Option<usize>; 6],
}

impl ColumnMap {
    /// Locate the known columns in a header row
    ///
    /// Names are matched exactly after trimming surrounding whitespace. When
    /// a name repeats, the first occurrence wins.
    pub fn from_header(header: &[String]) -> Self {
        let mut positions = [None; 6];
        for (slot, name) in positions.iter_mut().zip(COLUMNS) {
            *slot = header.iter().position(|cell| cell.trim() == name);
        }
        Self { positions }
    }

    /// Columns absent from the header
    pub fn missing(&self) -> Vec<&'static str> {
        COLUMNS
            .iter()
            .zip(self.positions.iter())
            .filter(|(_, pos)| pos.is_none())
            .map(|(name, _)| *name)
            .collect()
    }

    fn cell(&self, row: &[String], column: usize) -> String {
        self.positions[column]
            .and_then(|pos| row.get(pos))
            .cloned()
            .unwrap_or_default()
    }

    /// Convert one data row; absent columns and short rows read as empty
    pub fn row_to_record(&self, row: &[String]) -> BookmarkRecord {
        BookmarkRecord {
            created_at: Timestamp::from_raw(self.cell(row, DATE)),
            title: self.cell(row, TITLE),
            url: self.cell(row, URL),
            category: self.cell(row, CATEGORY),
            tags: self.cell(row, TAGS),
            notes: self.cell(row, NOTES),
        }
    }
}

/// Convert a record to a row in [`COLUMNS`] order
pub fn record_to_row(record: &BookmarkRecord) -> Vec<String> {
    vec![
        record.created_at.as_str().to_string(),
        record.title.clone(),
        record.url.clone(),
        record.category.clone(),
        record.tags.clone(),
        record.notes.clone(),
    ]
}

/// Convert every worksheet row (header included) into records
///
/// An empty worksheet yields no records. Every row below the header becomes
/// a record, blank rows included, so that record positions keep matching
/// physical rows.
pub fn rows_to_records(rows: &[Vec<String>]) -> Vec<BookmarkRecord> {
    let Some((header, data)) = rows.split_first() else {
        return Vec::new();
    };

    let columns = ColumnMap::from_header(header);
    let missing = columns.missing();
    if !missing.is_empty() {
        warn!(
            "Worksheet header is missing column(s) {:?}; reading them as empty",
            missing
        );
    }

    data.iter().map(|row| columns.row_to_record(row)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_header_row_matches_columns() {
        assert_eq!(
            header_row(),
            vec!["date", "title", "url", "category", "tags", "notes"]
        );
    }

    #[test]
    fn test_empty_sheet_has_no_records() {
        assert!(rows_to_records(&[]).is_empty());
        assert!(rows_to_records(&[header_row()]).is_empty());
    }

    #[test]
    fn test_row_round_trip_in_column_order() {
        let rows = vec![
            header_row(),
            row(&["2025-01-02 03:04:05", "Rust", "https://rust-lang.org", "Documentation", "lang", "book"]),
        ];
        let records = rows_to_records(&rows);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "Rust");
        assert_eq!(records[0].notes, "book");
        assert_eq!(record_to_row(&records[0]), rows[1]);
    }

    #[test]
    fn test_columns_found_by_name_in_any_order() {
        let rows = vec![
            row(&["url", "title", "notes", "date", "category", "tags"]),
            row(&["https://a.com", "A", "n", "2025-01-01 00:00:00", "Tools", "x"]),
        ];
        let records = rows_to_records(&rows);
        assert_eq!(records[0].url, "https://a.com");
        assert_eq!(records[0].title, "A");
        assert_eq!(records[0].created_at.as_str(), "2025-01-01 00:00:00");
        assert_eq!(records[0].category, "Tools");
    }

    #[test]
    fn test_missing_columns_and_short_rows_fill_empty() {
        let rows = vec![
            row(&["date", "title", "url"]),
            row(&["2025-01-01 00:00:00", "Only title"]),
        ];
        let map = ColumnMap::from_header(&rows[0]);
        assert_eq!(map.missing(), vec!["category", "tags", "notes"]);

        let records = rows_to_records(&rows);
        assert_eq!(records[0].title, "Only title");
        assert_eq!(records[0].url, "");
        assert_eq!(records[0].category, "");
        assert_eq!(records[0].notes, "");
    }

    #[test]
    fn test_header_names_are_case_sensitive() {
        let map = ColumnMap::from_header(&row(&["Date", "title", " url ", "category", "tags", "notes"]));
        assert_eq!(map.missing(), vec!["date"]);
    }

    #[test]
    fn test_blank_rows_keep_their_position() {
        let rows = vec![
            header_row(),
            row(&["d1", "first", "https://1.com", "", "", ""]),
            Vec::new(),
            row(&["d3", "third", "https://3.com", "", "", ""]),
        ];
        let records = rows_to_records(&rows);
        assert_eq!(records.len(), 3);
        assert_eq!(records[1].title, "");
        assert_eq!(records[2].title, "third");
    }
}
