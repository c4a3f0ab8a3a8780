//! Raw time-series blocks.
//!
//! The variable header is read once, relative to the first raw block, and
//! applied to every block in the file. Each data row becomes one record
//! tagged with its 0-based position inside the block. Variable names must
//! be unique and may not reuse the prefix or `idx` columns.

use super::sample_record;
use crate::coerce::coerce;
use crate::config::{ColumnNumber, RawHeader};
use crate::constants::{OBSERVATION_INDEX_COLUMN, SAMPLE_KEY_COLUMNS};
use crate::error::{ParseError, Result};
use crate::grid::{Cell, Grid};
use crate::models::{Identifiers, SampleBlock, Value};
use crate::table::Record;
use std::collections::HashSet;
use tracing::debug;

/// Variable names from the header row, left to right until the first empty
/// cell or the end of the row. Names are trimmed; a repeated or reserved
/// name is a format error.
pub fn read_var_names(
    grid: &Grid,
    first_block_start: usize,
    header: &RawHeader,
) -> Result<Vec<String>> {
    let row = first_block_start as i64 + header.row_offset;
    let start = header.start_column.index();

    // Validates the header position before walking the row
    grid.checked_cell(row, start as i64)?;
    let row = row as usize;

    let names: Vec<String> = grid
        .row(row)
        .unwrap_or_default()
        .iter()
        .skip(start)
        .map_while(Cell::as_text)
        .map(|name| name.trim().to_string())
        .collect();

    if names.is_empty() {
        return Err(ParseError::NoVariableNames { row });
    }

    let mut seen = HashSet::with_capacity(names.len());
    for name in &names {
        if name == OBSERVATION_INDEX_COLUMN || SAMPLE_KEY_COLUMNS.contains(&name.as_str()) {
            return Err(ParseError::ReservedColumn {
                name: name.clone(),
                row,
            });
        }
        if !seen.insert(name.as_str()) {
            return Err(ParseError::DuplicateColumn {
                name: name.clone(),
                row,
            });
        }
    }

    debug!("Raw variables from row {}: {:?}", row, names);
    Ok(names)
}

/// Read every raw block into one record per observation row
pub fn read_all(
    grid: &Grid,
    blocks: &[SampleBlock],
    ids: &Identifiers,
    start_column: ColumnNumber,
    var_names: &[String],
) -> Result<Vec<Record>> {
    let mut records = Vec::with_capacity(blocks.iter().map(|b| b.range.height()).sum());
    for block in blocks {
        for (idx, row) in block.range.rows().enumerate() {
            let mut record = sample_record(ids, block.sample_id);
            record.insert(OBSERVATION_INDEX_COLUMN, Value::Integer(idx as i64));
            for (offset, name) in var_names.iter().enumerate() {
                let column = start_column.offset_index(offset as i64);
                let cell = grid.checked_cell(row as i64, column)?;
                record.insert(name.as_str(), coerce(cell));
            }
            records.push(record);
        }
        debug!(
            "Sample {}: {} observations",
            block.sample_id,
            block.range.height()
        );
    }
    Ok(records)
}
