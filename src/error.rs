//! Error handling for curve export parsing.
//!
//! Provides error types with context for file loading, marker lookup,
//! block pairing, identifier extraction and table output failures.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed delimited data in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("No rows found in file: {path}")]
    EmptyFile { path: PathBuf },

    #[error(
        "Inconsistent column counts in {path}: row {row} has {found} columns, first row has {expected} (tolerance {tolerance})"
    )]
    RaggedRows {
        path: PathBuf,
        row: usize,
        found: usize,
        expected: usize,
        tolerance: usize,
    },

    #[error("Sentinel '{sentinel}' for {field} not found in column {column}")]
    SentinelNotFound {
        field: String,
        sentinel: String,
        column: usize,
    },

    #[error("Mismatched {block} blocks: {starts} start markers but {ends} end markers")]
    BlockCountMismatch {
        block: String,
        starts: usize,
        ends: usize,
    },

    #[error("Block [{start}, {end}] lies outside the grid of {height} rows")]
    BlockOutOfBounds { start: i64, end: i64, height: usize },

    #[error("Cell ({row}, {column}) lies outside the grid of {height} rows x {width} columns")]
    CellOutOfBounds {
        row: i64,
        column: i64,
        height: usize,
        width: usize,
    },

    #[error("Identifier '{value}' has {found} '_' segments, expected at least {expected}")]
    IdentifierSegments {
        value: String,
        expected: usize,
        found: usize,
    },

    #[error("Identifier {field} is empty in the row flagged '{sentinel}'")]
    EmptyIdentifier { field: String, sentinel: String },

    #[error("No variable names found in raw header row {row}")]
    NoVariableNames { row: usize },

    #[error("Column '{name}' in row {row} repeats an earlier column of the same block")]
    DuplicateColumn { name: String, row: usize },

    #[error("Column '{name}' in row {row} clashes with a reserved output column")]
    ReservedColumn { name: String, row: usize },

    #[error(
        "Sample count mismatch: {params} parameter blocks but {raw} raw data blocks"
    )]
    SampleCountMismatch { params: usize, raw: usize },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Failed to parse {path}: {source}")]
    FileFailed {
        path: PathBuf,
        #[source]
        source: Box<ParseError>,
    },
}

/// Broad failure classes, for callers deciding whether to skip a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Io,
    Format,
    Configuration,
    Output,
}

impl ParseError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Attach the source file to a failure raised while parsing it
    pub fn in_file(self, path: impl Into<PathBuf>) -> Self {
        match self {
            already @ Self::FileFailed { .. } => already,
            other => Self::FileFailed {
                path: path.into(),
                source: Box::new(other),
            },
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Io { .. } => ErrorKind::Io,
            Self::Csv { .. }
            | Self::EmptyFile { .. }
            | Self::RaggedRows { .. }
            | Self::SentinelNotFound { .. }
            | Self::BlockCountMismatch { .. }
            | Self::BlockOutOfBounds { .. }
            | Self::CellOutOfBounds { .. }
            | Self::IdentifierSegments { .. }
            | Self::EmptyIdentifier { .. }
            | Self::NoVariableNames { .. }
            | Self::DuplicateColumn { .. }
            | Self::ReservedColumn { .. }
            | Self::SampleCountMismatch { .. } => ErrorKind::Format,
            Self::Configuration { .. } => ErrorKind::Configuration,
            Self::Polars(_) => ErrorKind::Output,
            Self::FileFailed { source, .. } => source.kind(),
        }
    }

    pub fn is_format(&self) -> bool {
        self.kind() == ErrorKind::Format
    }

    pub fn is_io(&self) -> bool {
        self.kind() == ErrorKind::Io
    }
}

pub type Result<T> = std::result::Result<T, ParseError>;
