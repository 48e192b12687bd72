//! Status command handler

use anyhow::Result;

use sheetmarks_core::{BookmarkService, Worksheet};

use crate::output::Output;

/// Show bookmark and duplicate counts
pub fn show<W: Worksheet>(service: &BookmarkService<W>, output: &Output) -> Result<()> {
    let stats = service.stats()?;
    let location = service.store().worksheet().describe();
    output.print_stats(&location, &stats);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;
    use sheetmarks_core::storage::schema::header_row;
    use sheetmarks_core::{MemoryWorksheet, RowStore};

    #[test]
    fn test_status_on_empty_store() {
        let service =
            BookmarkService::new(RowStore::new(MemoryWorksheet::with_rows(vec![header_row()])));
        show(&service, &Output::new(OutputFormat::Quiet)).unwrap();
    }

    #[test]
    fn test_status_on_offline_store() {
        let mut sheet = MemoryWorksheet::new();
        sheet.set_offline(true);
        let service = BookmarkService::new(RowStore::new(sheet));
        assert!(show(&service, &Output::new(OutputFormat::Quiet)).is_err());
    }
}
