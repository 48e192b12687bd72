//! Data models for sheetmarks
//!
//! Defines the bookmark record as it is persisted in the worksheet, the
//! unvalidated candidate a user submits, and the validation that turns one
//! into the other.

use std::fmt;
use std::str::FromStr;

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Timestamp pattern stored in the `date` column
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Creation time of a bookmark, kept in its persisted string form
///
/// Rows edited by hand may hold text that is not a valid timestamp, so the
/// raw cell value is preserved and parsing is best-effort.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(String);

impl Timestamp {
    /// Current local time in `YYYY-MM-DD HH:MM:SS` form
    pub fn now() -> Self {
        Self(Local::now().format(DATE_FORMAT).to_string())
    }

    /// Wrap a raw cell value
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse the stored value, if it follows [`DATE_FORMAT`]
    pub fn parse(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(self.0.trim(), DATE_FORMAT).ok()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The fixed set of categories offered when adding a bookmark
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Offensive Security")]
    OffensiveSecurity,
    Finance,
    #[serde(rename = "Real Estate")]
    RealEstate,
    YouTube,
    Tools,
    Articles,
    Documentation,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::OffensiveSecurity,
        Category::Finance,
        Category::RealEstate,
        Category::YouTube,
        Category::Tools,
        Category::Articles,
        Category::Documentation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::OffensiveSecurity => "Offensive Security",
            Category::Finance => "Finance",
            Category::RealEstate => "Real Estate",
            Category::YouTube => "YouTube",
            Category::Tools => "Tools",
            Category::Articles => "Articles",
            Category::Documentation => "Documentation",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Category {
    type Err = ValidationError;

    /// Matches a category name case-insensitively
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ValidationError::UnknownCategory {
                value: s.to_string(),
            })
    }
}

/// A bookmark as stored in one worksheet row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkRecord {
    /// When the bookmark was added (`date` column)
    #[serde(rename = "date")]
    pub created_at: Timestamp,
    pub title: String,
    pub url: String,
    /// Category name; rows read back may hold any text
    pub category: String,
    /// Free-text tags, conventionally comma-separated
    pub tags: String,
    /// Free-text notes, empty when absent
    pub notes: String,
}

impl BookmarkRecord {
    /// Split the tag text on commas, dropping empty entries
    pub fn tag_list(&self) -> Vec<String> {
        self.tags
            .split(',')
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect()
    }

    /// Case-insensitive substring match over every field, the date included
    pub fn matches(&self, query: &str) -> bool {
        let needle = query.to_lowercase();
        [
            self.created_at.as_str(),
            self.title.as_str(),
            self.url.as_str(),
            self.category.as_str(),
            self.tags.as_str(),
            self.notes.as_str(),
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
    }
}

/// A record together with its logical index in store order
///
/// The index is what `remove` takes, so every view keeps it next to the
/// record it refers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexedBookmark {
    pub index: usize,
    #[serde(flatten)]
    pub record: BookmarkRecord,
}

impl IndexedBookmark {
    pub fn new(index: usize, record: BookmarkRecord) -> Self {
        Self { index, record }
    }
}

/// Unvalidated bookmark input
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkCandidate {
    pub title: String,
    pub url: String,
    pub category: String,
    #[serde(default)]
    pub tags: String,
    #[serde(default)]
    pub notes: String,
    /// Preset creation time; assigned at validation when absent
    #[serde(default)]
    pub created_at: Option<Timestamp>,
}

impl BookmarkCandidate {
    /// Create a candidate with the required fields
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            category: category.into(),
            ..Default::default()
        }
    }

    pub fn with_tags(mut self, tags: impl Into<String>) -> Self {
        self.tags = tags.into();
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// Validate into a persistable record
    pub fn validate(self) -> Result<BookmarkRecord, ValidationError> {
        validate(self)
    }
}

/// Reasons a candidate cannot be persisted
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is empty
    #[error("{field} is required")]
    MissingField { field: &'static str },

    /// The URL lacks a scheme or host
    #[error("Invalid URL '{url}': {reason}. Include the scheme, e.g. https://")]
    InvalidUrl { url: String, reason: String },

    /// The category is not one of the known names
    #[error("Unknown category '{value}'. Expected one of: {}", category_names())]
    UnknownCategory { value: String },
}

fn category_names() -> String {
    Category::ALL
        .iter()
        .map(Category::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Validate a candidate and stamp its creation time
///
/// Title and URL are trimmed and must be non-empty, the URL must carry a
/// scheme and a host, and the category must be one of [`Category::ALL`].
pub fn validate(candidate: BookmarkCandidate) -> Result<BookmarkRecord, ValidationError> {
    let title = candidate.title.trim();
    if title.is_empty() {
        return Err(ValidationError::MissingField { field: "title" });
    }

    let url = candidate.url.trim();
    if url.is_empty() {
        return Err(ValidationError::MissingField { field: "url" });
    }
    check_url(url)?;

    let category: Category = candidate.category.parse()?;

    Ok(BookmarkRecord {
        created_at: candidate.created_at.unwrap_or_else(Timestamp::now),
        title: title.to_string(),
        url: url.to_string(),
        category: category.as_str().to_string(),
        tags: candidate.tags.trim().to_string(),
        notes: candidate.notes.trim().to_string(),
    })
}

/// Check that a URL is absolute with a non-empty scheme and host
pub fn check_url(url: &str) -> Result<(), ValidationError> {
    let invalid = |reason: &str| ValidationError::InvalidUrl {
        url: url.to_string(),
        reason: reason.to_string(),
    };

    let parsed = Url::parse(url).map_err(|e| invalid(&e.to_string()))?;
    if parsed.scheme().is_empty() {
        return Err(invalid("missing scheme"));
    }
    match parsed.host_str() {
        Some(host) if !host.is_empty() => Ok(()),
        _ => Err(invalid("missing host")),
    }
}
