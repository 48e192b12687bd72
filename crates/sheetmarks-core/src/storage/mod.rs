//! Storage layer
//!
//! Bookmarks live in a spreadsheet worksheet used as a row store.
//!
//! ## Architecture
//!
//! - **Worksheet**: raw rows of text cells, 1-indexed, header row first
//!   (`SheetsWorksheet` for Google Sheets, `MemoryWorksheet` in-process)
//! - **RowStore**: bookmark records on top of a worksheet; owns the mapping
//!   from logical index to physical row
//!
//! Every read goes to the worksheet; there is no local copy to invalidate.

pub mod error;
pub mod row_store;
pub mod schema;
pub mod sheets;
pub mod worksheet;

pub use error::{StoreError, StoreResult};
pub use row_store::RowStore;
pub use schema::{COLUMNS, HEADER_ROWS};
pub use sheets::{SheetsSettings, SheetsWorksheet};
pub use worksheet::{MemoryWorksheet, Worksheet};
