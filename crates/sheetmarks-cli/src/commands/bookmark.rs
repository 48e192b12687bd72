//! Bookmark command handlers

use anyhow::{Context, Result};

use sheetmarks_core::{BookmarkCandidate, BookmarkService, Category, ServiceError, Worksheet};

use crate::prompt::confirm_delete;
use crate::metadata::fetch_title;
use crate::output::{Output, OutputFormat};

/// Input for `add`
#[derive(Debug, Clone, Default)]
pub struct AddArgs {
    pub url: String,
    pub title: Option<String>,
    pub category: String,
    pub tags: Vec<String>,
    pub notes: Option<String>,
    /// Look up the page title when none was given
    pub fetch_title: bool,
}

/// Save a new bookmark
pub fn add<W: Worksheet>(
    service: &mut BookmarkService<W>,
    args: AddArgs,
    output: &Output,
) -> Result<()> {
    let title = match args.title {
        Some(title) => title,
        None if args.fetch_title => fetch_title(&args.url).unwrap_or_default(),
        None => String::new(),
    };

    let candidate = BookmarkCandidate::new(title, args.url, args.category)
        .with_tags(join_tags(&args.tags))
        .with_notes(args.notes.unwrap_or_default());

    let record = service.add(candidate)?;

    output.success("Bookmark saved");
    output.print_bookmark(&record);
    Ok(())
}

/// List bookmarks, newest first
pub fn list<W: Worksheet>(service: &BookmarkService<W>, output: &Output) -> Result<()> {
    show_listing(service, None, output)
}

/// Search bookmarks across every field
pub fn search<W: Worksheet>(
    service: &BookmarkService<W>,
    query: String,
    output: &Output,
) -> Result<()> {
    show_listing(service, Some(&query), output)
}

/// An unreachable store lists as empty, but the error is still returned
fn show_listing<W: Worksheet>(
    service: &BookmarkService<W>,
    query: Option<&str>,
    output: &Output,
) -> Result<()> {
    match service.list(query) {
        Ok(bookmarks) => {
            output.print_bookmarks(&bookmarks, query);
            Ok(())
        }
        Err(ServiceError::Store(e)) if e.is_unavailable() => {
            output.print_bookmarks(&[], None);
            Err(ServiceError::Store(e)).context("Could not load bookmarks")
        }
        Err(e) => Err(e.into()),
    }
}

/// Delete a bookmark by index
pub fn delete<W: Worksheet>(
    service: &mut BookmarkService<W>,
    index: usize,
    yes: bool,
    output: &Output,
) -> Result<()> {
    if !yes && output.should_prompt() {
        let record = service.get(index)?;
        if !confirm_delete(index, &record)? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let removed = service.remove(index)?;
    output.success(&format!("Deleted bookmark: {}", removed.title));
    Ok(())
}

/// Open a bookmark in the default browser
pub fn open<W: Worksheet>(
    service: &BookmarkService<W>,
    index: usize,
    output: &Output,
) -> Result<()> {
    let record = service.get(index)?;
    open::that(&record.url).with_context(|| format!("Failed to open {}", record.url))?;
    output.message(&format!("Opened {}", record.url));
    Ok(())
}

/// Show bookmarks that share a URL
pub fn duplicates<W: Worksheet>(service: &BookmarkService<W>, output: &Output) -> Result<()> {
    let groups = service.duplicates()?;
    output.print_duplicates(&groups);
    Ok(())
}

/// List the categories accepted by `add`
pub fn categories(output: &Output) -> Result<()> {
    match output.format {
        OutputFormat::Json => {
            let names: Vec<&str> = Category::ALL.iter().map(Category::as_str).collect();
            println!("{}", serde_json::json!(names));
        }
        _ => {
            for category in Category::ALL {
                println!("{}", category);
            }
        }
    }
    Ok(())
}

/// Join tag arguments into the stored comma-separated form
fn join_tags(tags: &[String]) -> String {
    tags.iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheetmarks_core::storage::schema::header_row;
    use sheetmarks_core::{MemoryWorksheet, RowStore, StoreError, ValidationError};

    fn quiet() -> Output {
        Output::new(OutputFormat::Quiet)
    }

    fn empty_service() -> BookmarkService<MemoryWorksheet> {
        BookmarkService::new(RowStore::new(MemoryWorksheet::with_rows(vec![header_row()])))
    }

    fn add_args(url: &str, title: &str) -> AddArgs {
        AddArgs {
            url: url.to_string(),
            title: Some(title.to_string()),
            category: "Tools".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_join_tags() {
        let tags = vec!["c2".to_string(), " redteam ".to_string(), "".to_string()];
        assert_eq!(join_tags(&tags), "c2, redteam");
        assert_eq!(join_tags(&[]), "");
    }

    #[test]
    fn test_add_then_list() {
        let mut service = empty_service();
        let mut args = add_args("https://sliver.sh", "Sliver");
        args.tags = vec!["c2".to_string(), "golang".to_string()];
        add(&mut service, args, &quiet()).unwrap();

        let listed = service.list(None).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].record.tags, "c2, golang");
        list(&service, &quiet()).unwrap();
    }

    #[test]
    fn test_add_without_title_is_rejected() {
        let mut service = empty_service();
        let mut args = add_args("https://sliver.sh", "");
        args.title = None;

        let err = add(&mut service, args, &quiet()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ServiceError>(),
            Some(ServiceError::Validation(ValidationError::MissingField { field: "title" }))
        ));
        assert!(service.list(None).unwrap().is_empty());
    }

    #[test]
    fn test_delete_with_yes_skips_prompt() {
        let mut service = empty_service();
        add(&mut service, add_args("https://a.com", "A"), &quiet()).unwrap();
        add(&mut service, add_args("https://b.com", "B"), &quiet()).unwrap();

        delete(&mut service, 0, true, &Output::new(OutputFormat::Human)).unwrap();
        let left = service.list(None).unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].record.title, "B");
    }

    #[test]
    fn test_delete_out_of_range() {
        let mut service = empty_service();
        let err = delete(&mut service, 3, true, &quiet()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ServiceError>(),
            Some(ServiceError::Store(StoreError::IndexOutOfRange { .. }))
        ));
    }

    #[test]
    fn test_search_on_offline_store_reports_error() {
        let mut sheet = MemoryWorksheet::with_rows(vec![header_row()]);
        sheet.set_offline(true);
        let service = BookmarkService::new(RowStore::new(sheet));

        let err = search(&service, "rust".to_string(), &quiet()).unwrap_err();
        match err.downcast_ref::<ServiceError>() {
            Some(ServiceError::Store(e)) => assert!(e.is_unavailable()),
            other => panic!("expected store error, got {other:?}"),
        }
    }

    #[test]
    fn test_duplicates_command() {
        let mut service = empty_service();
        add(&mut service, add_args("https://a.com", "A"), &quiet()).unwrap();
        add(&mut service, add_args("https://A.com ", "A again"), &quiet()).unwrap();
        duplicates(&service, &quiet()).unwrap();
        assert_eq!(service.duplicates().unwrap().len(), 1);
    }
}
