//! Sentinel marker scanning and block pairing.
//!
//! Block boundaries are found by scanning one column for an exact sentinel
//! string. Start and end scans are paired positionally in exactly one
//! place, [`pair_blocks`], which refuses to guess when the counts differ.

use crate::config::{ColumnNumber, MarkerLocator};
use crate::error::{ParseError, Result};
use crate::grid::{Cell, Grid};
use crate::models::BlockRange;
use tracing::debug;

/// Rows whose `column` cell equals `sentinel`, each shifted by `offset`.
///
/// Comparison is exact string equality; no trimming or case folding.
pub fn find_rows(grid: &Grid, sentinel: &str, column: usize, offset: i64) -> Vec<i64> {
    grid.column(column)
        .enumerate()
        .filter(|(_, cell)| matches!(cell, Cell::Text(text) if text == sentinel))
        .map(|(row, _)| row as i64 + offset)
        .collect()
}

/// [`find_rows`] driven by a locator from the parse definition
pub fn find_marker_rows(grid: &Grid, locator: &MarkerLocator) -> Vec<i64> {
    find_rows(
        grid,
        &locator.sentinel,
        locator.column.index(),
        locator.row_offset,
    )
}

/// Zip start and end rows into inclusive block ranges.
///
/// Fails when the lists differ in length, when a range leaves the grid,
/// or when `end` lies more than one row before `start`.
pub fn pair_blocks(
    block: &str,
    starts: &[i64],
    ends: &[i64],
    height: usize,
) -> Result<Vec<BlockRange>> {
    if starts.len() != ends.len() {
        return Err(ParseError::BlockCountMismatch {
            block: block.to_string(),
            starts: starts.len(),
            ends: ends.len(),
        });
    }

    starts
        .iter()
        .zip(ends)
        .map(|(&start, &end)| {
            let out_of_bounds = ParseError::BlockOutOfBounds { start, end, height };
            if start < 0 || end >= height as i64 || end < start - 1 {
                return Err(out_of_bounds);
            }
            Ok(BlockRange::new(start as usize, (end - start + 1) as usize))
        })
        .collect()
}

/// Scan start and end markers and pair them into block ranges
pub fn scan_blocks(
    grid: &Grid,
    block: &str,
    start: &MarkerLocator,
    end: &MarkerLocator,
) -> Result<Vec<BlockRange>> {
    let starts = find_marker_rows(grid, start);
    let ends = find_marker_rows(grid, end);
    debug!("{} blocks: starts={:?} ends={:?}", block, starts, ends);
    pair_blocks(block, &starts, &ends, grid.height())
}

/// Like [`scan_blocks`], but at least one block must exist
pub fn scan_required_blocks(
    grid: &Grid,
    block: &str,
    start: &MarkerLocator,
    end: &MarkerLocator,
) -> Result<Vec<BlockRange>> {
    let blocks = scan_blocks(grid, block, start, end)?;
    if blocks.is_empty() {
        return Err(sentinel_not_found(
            &format!("{}_start", block),
            &start.sentinel,
            start.column,
        ));
    }
    Ok(blocks)
}

pub(crate) fn sentinel_not_found(field: &str, sentinel: &str, column: ColumnNumber) -> ParseError {
    ParseError::SentinelNotFound {
        field: field.to_string(),
        sentinel: sentinel.to_string(),
        column: column.number(),
    }
}
