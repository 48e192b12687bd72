//! Delete confirmation
//!
//! `delete` shows the bookmark it is about to remove and waits for a y/N
//! answer. Without a terminal on stdin the answer is always no, so scripts
//! must pass `--yes`.

use std::io::{self, BufRead, Write};

use anyhow::Result;

use sheetmarks_core::BookmarkRecord;

/// Ask whether the bookmark at `index` should be deleted
pub fn confirm_delete(index: usize, record: &BookmarkRecord) -> Result<bool> {
    if !atty::is(atty::Stream::Stdin) {
        return Ok(false);
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    Ok(ask_delete(index, record, &mut stdin.lock(), &mut stdout.lock())?)
}

fn ask_delete<R: BufRead, W: Write>(
    index: usize,
    record: &BookmarkRecord,
    input: &mut R,
    out: &mut W,
) -> io::Result<bool> {
    writeln!(out, "Delete bookmark {}: {}", index, record.title)?;
    writeln!(out, "  {}", record.url)?;
    write!(out, "Are you sure? [y/N] ")?;
    out.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
