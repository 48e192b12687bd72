//! sheetmarks core library
//!
//! A personal bookmark manager that keeps its data in a spreadsheet
//! worksheet: one header row, then one bookmark per row.
//!
//! # Quick Start
//!
//! ```text
//! let config = Config::load()?;
//! let sheet = SheetsWorksheet::from_config(&config)?;
//! let mut service = BookmarkService::new(RowStore::new(sheet));
//!
//! service.add(BookmarkCandidate::new("Sliver", "https://sliver.sh", "Tools"))?;
//! let newest_first = service.list(None)?;
//! let groups = service.duplicates()?;
//! ```
//!
//! # Modules
//!
//! - `models`: bookmark record, categories, validation
//! - `storage`: worksheet access and the row store adapter
//! - `duplicates`: normalized-URL duplicate grouping
//! - `service`: add/list/search/remove operations
//! - `config`: application configuration

pub mod config;
pub mod duplicates;
pub mod models;
pub mod service;
pub mod storage;

pub use config::Config;
pub use duplicates::{find_groups, normalize_url, DuplicateGroup};
pub use models::{
    validate, BookmarkCandidate, BookmarkRecord, Category, IndexedBookmark, Timestamp,
    ValidationError,
};
pub use service::{BookmarkService, BookmarkStats, ServiceError, ServiceResult};
pub use storage::{
    MemoryWorksheet, RowStore, SheetsWorksheet, StoreError, StoreResult, Worksheet,
};
