//! Reads source files into raw rows of cells or plain lines.

use std::{
    fs::File,
    io::{self, BufRead, Read},
    path::Path,
};

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::reading::Cell;

/// Load a CSV file from the file system and split it into rows of cells
pub fn read_rows(path: &Path) -> Result<Vec<Vec<Cell>>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    read_rows_from(file)
}

/// Rows keep their ragged shape; the normalizers decide what a valid row is.
pub fn read_rows_from<R: Read>(reader: R) -> Result<Vec<Vec<Cell>>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut rows = Vec::new();
    let mut skipped = 0usize;
    for (index, record) in reader.records().enumerate() {
        match record {
            Ok(record) => rows.push(record.iter().map(Cell::from).collect()),
            Err(e) if e.is_io_error() => return Err(e).context("reading CSV input"),
            Err(e) => {
                warn!(row = index, error = %e, "skipping unreadable CSV record");
                skipped += 1;
            }
        }
    }
    debug!(rows = rows.len(), skipped, "CSV input read");

    Ok(rows)
}

pub fn read_lines(path: &Path) -> Result<Vec<String>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    read_lines_from(file)
}

pub fn read_lines_from<R: Read>(reader: R) -> Result<Vec<String>> {
    io::BufReader::new(reader)
        .lines()
        .collect::<Result<Vec<_>, io::Error>>()
        .context("reading text input")
}

// -- Tests -------------------------------------------------------------------
