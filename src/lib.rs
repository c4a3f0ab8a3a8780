//! Curve Parser Library
//!
//! Extracts per-sample scalar parameters and raw time-series curves from
//! sentinel-marked materials-testing exports into two tables.
//!
//! This library provides tools for:
//! - Loading header-less delimited exports into an untyped cell grid
//! - Locating parameter and data blocks by sentinel markers
//! - Extracting run and analysis identifiers from the file metadata
//! - Building schema-less params and raw tables across many files
//! - Writing both tables to CSV or Parquet through polars
//!
//! ```no_run
//! use curve_parser::{ParserConfig, RunCoordinator};
//! use std::path::Path;
//!
//! let mut coordinator = RunCoordinator::new(ParserConfig::default())?;
//! coordinator.process_folder(Path::new("exports"))?;
//! coordinator.write_tables(Path::new("exports"))?;
//! # Ok::<(), curve_parser::ParseError>(())
//! ```

pub mod blocks;
pub mod cli {
    pub mod args;
    pub mod commands;
}
pub mod coerce;
pub mod config;
pub mod constants;
pub mod error;
pub mod grid;
pub mod identifiers;
pub mod models;
pub mod processor;
pub mod scanner;
pub mod table;

// Re-export commonly used types
pub use config::{ErrorPolicy, GridOptions, OutputFormat, ParseDefinition, ParserConfig};
pub use error::{ErrorKind, ParseError, Result};
pub use grid::{Cell, Grid};
pub use models::{Identifiers, ProcessingStats, Value};
pub use processor::{FileParser, ParsedFile, RunCoordinator};
pub use table::{ParamsTable, RawTable, Record, Table};
