//! Core data structures for curve parsing.
//!
//! Defines typed output values, block ranges, file identifiers and
//! processing statistics used throughout the library.

use std::fmt;
use std::path::PathBuf;

/// A single output cell after coercion
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Missing,
    Integer(i64),
    Number(f64),
    Text(String),
}

impl Value {
    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Missing => Ok(()),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

/// Row range of one block within a grid.
///
/// Blocks are written as inclusive `[start, end]` pairs in the file layout;
/// an `end` one row before `start` describes an empty block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockRange {
    start: usize,
    height: usize,
}

impl BlockRange {
    pub fn new(start: usize, height: usize) -> Self {
        Self { start, height }
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.height == 0
    }

    pub fn rows(&self) -> std::ops::Range<usize> {
        self.start..self.start + self.height
    }
}

/// One physical test sample's block, numbered by position in the file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleBlock {
    /// 1-based ordinal, written as SampleID
    pub sample_id: i64,
    pub range: BlockRange,
}

impl SampleBlock {
    /// Number blocks 1..=N in file order
    pub fn number(ranges: Vec<BlockRange>) -> Vec<SampleBlock> {
        ranges
            .into_iter()
            .zip(1..)
            .map(|(range, sample_id)| SampleBlock { sample_id, range })
            .collect()
    }
}

/// Whole-file identifiers stamped on every output row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifiers {
    pub run_id: String,
    pub analysis_id: String,
}

/// Processing statistics for one run
#[derive(Debug, Clone, Default)]
pub struct ProcessingStats {
    pub files_processed: usize,
    pub files_failed: usize,
    pub samples_parsed: usize,
    pub params_rows: usize,
    pub raw_rows: usize,
    pub failures: Vec<(PathBuf, String)>,
    pub processing_time_ms: u128,
}

impl ProcessingStats {
    pub fn files_seen(&self) -> usize {
        self.files_processed + self.files_failed
    }
}
