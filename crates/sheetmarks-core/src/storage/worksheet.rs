//! Raw worksheet access
//!
//! A [`Worksheet`] is the tabular boundary the row store sits on: ordered
//! rows of text cells, addressed by 1-based physical row number, header row
//! included. It knows nothing about bookmarks.

use super::error::{StoreError, StoreResult};

/// An ordered, 1-indexed table of text cells
pub trait Worksheet {
    /// Read every row, header included, in physical order
    fn read_rows(&self) -> StoreResult<Vec<Vec<String>>>;

    /// Append one row after the last row
    fn append_row(&mut self, row: Vec<String>) -> StoreResult<()>;

    /// Remove the row with the given 1-based physical number
    fn delete_row(&mut self, physical_row: usize) -> StoreResult<()>;

    /// Human-readable location, used in logs and status output
    fn describe(&self) -> String;
}

/// In-process worksheet
///
/// Behaves like a remote sheet with 1-based rows. Every deleted physical row
/// number is recorded, and the sheet can be switched offline to simulate a
/// transport failure.
#[derive(Debug, Clone, Default)]
pub struct MemoryWorksheet {
    rows: Vec<Vec<String>>,
    deleted: Vec<usize>,
    offline: bool,
}

impl MemoryWorksheet {
    /// An empty worksheet with no header
    pub fn new() -> Self {
        Self::default()
    }

    /// A worksheet pre-filled with the given rows (header included)
    pub fn with_rows(rows: Vec<Vec<String>>) -> Self {
        Self {
            rows,
            ..Default::default()
        }
    }

    /// Current rows, header included
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Physical row numbers deleted so far, in order
    pub fn deleted_rows(&self) -> &[usize] {
        &self.deleted
    }

    /// Make every subsequent call fail as unavailable (or recover)
    pub fn set_offline(&mut self, offline: bool) {
        self.offline = offline;
    }

    fn check_online(&self) -> StoreResult<()> {
        if self.offline {
            Err(StoreError::unavailable("memory worksheet is offline"))
        } else {
            Ok(())
        }
    }
}

impl Worksheet for MemoryWorksheet {
    fn read_rows(&self) -> StoreResult<Vec<Vec<String>>> {
        self.check_online()?;
        Ok(self.rows.clone())
    }

    fn append_row(&mut self, row: Vec<String>) -> StoreResult<()> {
        self.check_online()?;
        self.rows.push(row);
        Ok(())
    }

    fn delete_row(&mut self, physical_row: usize) -> StoreResult<()> {
        self.check_online()?;
        if physical_row == 0 || physical_row > self.rows.len() {
            return Err(StoreError::unavailable(format!(
                "row {} does not exist (sheet has {} rows)",
                physical_row,
                self.rows.len()
            )));
        }
        self.rows.remove(physical_row - 1);
        self.deleted.push(physical_row);
        Ok(())
    }

    fn describe(&self) -> String {
        format!("in-memory worksheet ({} rows)", self.rows.len())
    }
}
