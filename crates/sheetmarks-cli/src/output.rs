//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use sheetmarks_core::duplicates::duplicate_entry_count;
use sheetmarks_core::{BookmarkRecord, BookmarkStats, DuplicateGroup, IndexedBookmark};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Check if output is in quiet mode
    pub fn is_quiet(&self) -> bool {
        matches!(self.format, OutputFormat::Quiet)
    }

    /// Print a single bookmark in full
    pub fn print_bookmark(&self, record: &BookmarkRecord) {
        match self.format {
            OutputFormat::Human => {
                println!("Title:    {}", record.title);
                println!("URL:      {}", record.url);
                println!("Category: {}", record.category);
                match record.created_at.parse() {
                    Some(_) => println!("Date:     {}", record.created_at),
                    None => println!("Date:     {} (not a recognized date)", record.created_at),
                }
                let tags = record.tag_list();
                if !tags.is_empty() {
                    println!("Tags:     {}", tags.join(", "));
                }
                if !record.notes.is_empty() {
                    println!();
                    println!("── Notes ──");
                    println!("{}", record.notes);
                }
            }
            OutputFormat::Json => {
                println!("{}", pretty(record));
            }
            OutputFormat::Quiet => {
                println!("{}", record.url);
            }
        }
    }

    /// Print a list of bookmarks, newest first as given
    pub fn print_bookmarks(&self, bookmarks: &[IndexedBookmark], query: Option<&str>) {
        match self.format {
            OutputFormat::Human => {
                if bookmarks.is_empty() {
                    match query {
                        Some(q) => println!("No bookmarks match '{}'.", q),
                        None => println!("No bookmarks found. Add one with `sheetmarks add <url> --title <title>`."),
                    }
                    return;
                }
                for bookmark in bookmarks {
                    println!("{}", summary_line(bookmark));
                }
                println!("\n{} bookmark(s)", bookmarks.len());
            }
            OutputFormat::Json => {
                println!("{}", pretty(&bookmarks));
            }
            OutputFormat::Quiet => {
                for bookmark in bookmarks {
                    println!("{}\t{}", bookmark.index, bookmark.record.url);
                }
            }
        }
    }

    /// Print duplicate groups
    pub fn print_duplicates(&self, groups: &[DuplicateGroup]) {
        match self.format {
            OutputFormat::Human => {
                if groups.is_empty() {
                    println!("No duplicate bookmarks found.");
                    return;
                }
                for group in groups {
                    println!("URL: {}  ({} copies)", group.key, group.len());
                    for entry in &group.entries {
                        println!("  {}", summary_line(entry));
                    }
                    println!();
                }
                println!(
                    "{} duplicate entries in {} group(s). Keep one and delete the others with `sheetmarks delete <index>`.",
                    duplicate_entry_count(groups),
                    groups.len()
                );
            }
            OutputFormat::Json => {
                println!("{}", pretty(&groups));
            }
            OutputFormat::Quiet => {
                for group in groups {
                    let indices: Vec<String> =
                        group.entries.iter().map(|e| e.index.to_string()).collect();
                    println!("{}\t{}", group.key, indices.join(","));
                }
            }
        }
    }

    /// Print bookmark counts
    pub fn print_stats(&self, location: &str, stats: &BookmarkStats) {
        match self.format {
            OutputFormat::Human => {
                println!("sheetmarks Status");
                println!("=================");
                println!();
                println!("Store:     {}", location);
                println!("Bookmarks: {}", stats.total);
                if stats.duplicate_entries > 0 {
                    println!(
                        "Duplicate URLs: {} ({} group(s))",
                        stats.duplicate_entries, stats.duplicate_groups
                    );
                }
            }
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({
                        "store": location,
                        "total": stats.total,
                        "duplicate_groups": stats.duplicate_groups,
                        "duplicate_entries": stats.duplicate_entries
                    })
                );
            }
            OutputFormat::Quiet => {
                println!("{}", stats.total);
            }
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Check if we should prompt for confirmation
    pub fn should_prompt(&self) -> bool {
        self.format == OutputFormat::Human
    }

    /// Print an informational message
    pub fn message(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", msg),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"message": msg}));
            }
            OutputFormat::Quiet => {}
        }
    }
}

/// One-line summary: index, title, category, url
fn summary_line(bookmark: &IndexedBookmark) -> String {
    let record = &bookmark.record;
    format!(
        "{:>4} | {} | {} | {}",
        bookmark.index,
        pad(&truncate(&record.title, 35), 35),
        pad(&truncate(&record.category, 18), 18),
        truncate(&record.url, 50)
    )
}

fn pretty<T: serde::Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
}

/// Truncate a string to max characters, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Right-pad to a width counted in characters
fn pad(s: &str, width: usize) -> String {
    let len = s.chars().count();
    if len >= width {
        s.to_string()
    } else {
        format!("{}{}", s, " ".repeat(width - len))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheetmarks_core::Timestamp;

    #[test]
    fn test_format_from_flags() {
        assert_eq!(OutputFormat::from_flags(false, false), OutputFormat::Human);
        assert_eq!(OutputFormat::from_flags(true, false), OutputFormat::Json);
        assert_eq!(OutputFormat::from_flags(false, true), OutputFormat::Quiet);
        // Quiet takes precedence
        assert_eq!(OutputFormat::from_flags(true, true), OutputFormat::Quiet);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("this is a long string", 10), "this is...");
        // Multi-byte characters are counted, not sliced
        assert_eq!(truncate("ééééééééééé", 6), "ééé...");
    }

    #[test]
    fn test_pad() {
        assert_eq!(pad("ab", 4), "ab  ");
        assert_eq!(pad("abcdef", 4), "abcdef");
    }

    #[test]
    fn test_summary_line() {
        let bookmark = IndexedBookmark::new(
            12,
            BookmarkRecord {
                created_at: Timestamp::from_raw("2025-01-01 00:00:00"),
                title: "Rust".to_string(),
                url: "https://rust-lang.org".to_string(),
                category: "Documentation".to_string(),
                tags: String::new(),
                notes: String::new(),
            },
        );
        let line = summary_line(&bookmark);
        assert!(line.starts_with("  12 | Rust"));
        assert!(line.ends_with("| https://rust-lang.org"));
    }

    #[test]
    fn test_print_duplicates_all_formats() {
        let records: Vec<BookmarkRecord> = ["https://a.com", "https://A.com", "https://b.com"]
            .iter()
            .map(|url| BookmarkRecord {
                created_at: Timestamp::from_raw("2025-01-01 00:00:00"),
                title: "t".to_string(),
                url: url.to_string(),
                category: "Tools".to_string(),
                tags: String::new(),
                notes: String::new(),
            })
            .collect();
        let groups = sheetmarks_core::find_groups(&records);
        assert_eq!(duplicate_entry_count(&groups), 2);

        for format in [OutputFormat::Human, OutputFormat::Json, OutputFormat::Quiet] {
            Output::new(format).print_duplicates(&groups);
        }
        Output::new(OutputFormat::Human).print_duplicates(&[]);
    }

    #[test]
    fn test_should_prompt_only_for_humans() {
        assert!(Output::new(OutputFormat::Human).should_prompt());
        assert!(!Output::new(OutputFormat::Json).should_prompt());
        assert!(!Output::new(OutputFormat::Quiet).should_prompt());
        assert!(Output::new(OutputFormat::Quiet).is_quiet());
    }
}
