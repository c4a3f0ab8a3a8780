//! Delimited file loading into an untyped cell grid.
//!
//! Export files carry no header row and mix metadata lines, parameter
//! blocks and data tables in one flat layout, so every line is kept as a
//! row of opaque cells and interpretation is left to the block readers.

use crate::config::GridOptions;
use crate::error::{ParseError, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// One untyped grid cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Empty,
    Text(String),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            Cell::Empty => None,
        }
    }
}

impl From<&str> for Cell {
    fn from(field: &str) -> Self {
        if field.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(field.to_string())
        }
    }
}

static EMPTY: Cell = Cell::Empty;

/// Rows x columns of cells; every row is padded to the grid width
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    rows: Vec<Vec<Cell>>,
    width: usize,
}

impl Grid {
    /// Build a grid, padding short rows with empty cells
    pub fn from_rows(mut rows: Vec<Vec<Cell>>) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        for row in &mut rows {
            row.resize(width, Cell::Empty);
        }
        Self { rows, width }
    }

    /// Build a grid from string fields; `""` becomes an empty cell
    pub fn from_fields<R, F>(rows: R) -> Self
    where
        R: IntoIterator<Item = F>,
        F: IntoIterator,
        F::Item: AsRef<str>,
    {
        Self::from_rows(
            rows.into_iter()
                .map(|row| row.into_iter().map(|f| Cell::from(f.as_ref())).collect())
                .collect(),
        )
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.height(), self.width)
    }

    pub fn row(&self, row: usize) -> Option<&[Cell]> {
        self.rows.get(row).map(Vec::as_slice)
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|r| r.get(column))
    }

    /// Cell lookup with signed coordinates, as produced by offset arithmetic
    pub fn checked_cell(&self, row: i64, column: i64) -> Result<&Cell> {
        let out_of_bounds = || ParseError::CellOutOfBounds {
            row,
            column,
            height: self.height(),
            width: self.width,
        };
        let r = usize::try_from(row).map_err(|_| out_of_bounds())?;
        let c = usize::try_from(column).map_err(|_| out_of_bounds())?;
        self.cell(r, c).ok_or_else(out_of_bounds)
    }

    /// Cells of one column, top to bottom
    pub fn column(&self, column: usize) -> impl Iterator<Item = &Cell> + '_ {
        self.rows.iter().map(move |r| r.get(column).unwrap_or(&EMPTY))
    }
}

/// Load a delimited file into a grid
pub fn load(path: &Path, options: &GridOptions) -> Result<Grid> {
    let file = File::open(path).map_err(|e| ParseError::io(path, e))?;
    let grid = parse_reader(file, options, path)?;
    debug!(
        "Loaded grid from {}: {} rows x {} columns",
        path.display(),
        grid.height(),
        grid.width()
    );
    Ok(grid)
}

/// Read delimited text from any source; `source` names it in errors
pub fn parse_reader<R: Read>(reader: R, options: &GridOptions, source: &Path) -> Result<Grid> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(options.delimiter)
        .from_reader(reader);

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record.map_err(|e| csv_error(source, e))?;
        rows.push(record.iter().map(Cell::from).collect::<Vec<_>>());
    }

    if rows.is_empty() {
        return Err(ParseError::EmptyFile {
            path: source.to_path_buf(),
        });
    }

    if let Some(tolerance) = options.ragged_tolerance {
        check_ragged(&rows, tolerance, source)?;
    }

    Ok(Grid::from_rows(rows))
}

/// Reject rows wider than the first row by more than `tolerance` columns
fn check_ragged(rows: &[Vec<Cell>], tolerance: usize, source: &Path) -> Result<()> {
    let expected = rows.first().map(Vec::len).unwrap_or(0);
    match rows
        .iter()
        .enumerate()
        .find(|(_, row)| row.len() > expected + tolerance)
    {
        Some((row, cells)) => Err(ParseError::RaggedRows {
            path: source.to_path_buf(),
            row,
            found: cells.len(),
            expected,
            tolerance,
        }),
        None => Ok(()),
    }
}

fn csv_error(source: &Path, error: csv::Error) -> ParseError {
    if error.is_io_error() {
        match error.into_kind() {
            csv::ErrorKind::Io(io) => ParseError::io(source, io),
            other => ParseError::configuration(format!("unexpected csv error: {:?}", other)),
        }
    } else {
        ParseError::Csv {
            path: source.to_path_buf(),
            source: error,
        }
    }
}
