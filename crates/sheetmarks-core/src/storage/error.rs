//! Storage error handling
//!
//! Provides typed errors for row store operations with descriptive messages
//! and recovery suggestions.

use thiserror::Error;

/// Errors that can occur talking to the row store
#[derive(Error, Debug)]
pub enum StoreError {
    /// Transport failure, timeout, or unexpected server status
    #[error("Row store unavailable: {reason}")]
    Unavailable { reason: String },

    /// Credentials rejected or missing editor access
    #[error("Permission denied by the spreadsheet service (HTTP {status}): {details}")]
    PermissionDenied { status: u16, details: String },

    /// The spreadsheet or the named worksheet tab does not exist
    #[error("Worksheet '{worksheet}' not found: {details}")]
    WorksheetNotFound { worksheet: String, details: String },

    /// No spreadsheet identifier was configured
    #[error("No spreadsheet configured. Set spreadsheet_id in the config file or SHEETMARKS_SPREADSHEET_ID.")]
    SpreadsheetNotConfigured,

    /// The service answered with a body we could not understand
    #[error("Malformed response from the spreadsheet service: {details}")]
    MalformedResponse { details: String },

    /// Delete target is outside the current set of rows
    #[error("No bookmark at index {index} (the store holds {len}). Refresh the list and try again.")]
    IndexOutOfRange { index: usize, len: usize },
}

impl StoreError {
    /// Build an `Unavailable` error from anything displayable
    pub fn unavailable(reason: impl std::fmt::Display) -> Self {
        StoreError::Unavailable {
            reason: reason.to_string(),
        }
    }

    /// Whether this error means the store could not be reached or used
    ///
    /// Everything except a stale index falls in this class; callers show an
    /// empty view for it but still report the diagnostic.
    pub fn is_unavailable(&self) -> bool {
        !matches!(self, StoreError::IndexOutOfRange { .. })
    }

    /// Get a recovery suggestion for this error
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            StoreError::PermissionDenied { .. } => Some(
                "Share the spreadsheet with the account behind your access token and grant it Editor access.",
            ),
            StoreError::WorksheetNotFound { .. } => Some(
                "Check the spreadsheet id and that the sheet has a tab named exactly as the configured worksheet (default: main).",
            ),
            StoreError::SpreadsheetNotConfigured => {
                Some("Run `sheetmarks config set spreadsheet_id <id>`.")
            }
            StoreError::Unavailable { .. } | StoreError::MalformedResponse { .. } => Some(
                "Checklist: 1. share the sheet with Editor access, 2. tab name matches the configured worksheet, 3. first row has headers: date, title, url, category, tags, notes.",
            ),
            StoreError::IndexOutOfRange { .. } => {
                Some("The sheet changed since it was listed. List again and retry with the new index.")
            }
        }
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            StoreError::unavailable(format!("request timed out: {}", error))
        } else {
            StoreError::unavailable(error)
        }
    }
}

/// Result type for row store operations
pub type StoreResult<T> = Result<T, StoreError>;
