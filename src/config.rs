//! Configuration management and validation.
//!
//! Provides the layout grammar of an export file ([`ParseDefinition`]),
//! grid loading options and the run-level [`ParserConfig`]. Column numbers
//! in a definition are 1-based, as a user reads them off a spreadsheet;
//! [`ColumnNumber::index`] is the only place they become 0-based.

use crate::constants::{
    DEFAULT_DELIMITER, DEFAULT_EXTENSION, DEFAULT_RAGGED_TOLERANCE, default_layout,
};
use crate::error::{ParseError, Result};
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::Path;
use tracing::debug;

/// A 1-based spreadsheet column number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct ColumnNumber(NonZeroUsize);

impl ColumnNumber {
    pub fn new(number: usize) -> Result<Self> {
        NonZeroUsize::new(number)
            .map(Self)
            .ok_or_else(|| ParseError::configuration("column numbers are 1-based, got 0"))
    }

    /// 1-based number as written in the definition
    pub fn number(self) -> usize {
        self.0.get()
    }

    /// 0-based grid index
    pub fn index(self) -> usize {
        self.0.get() - 1
    }

    /// 0-based index of the column `offset` columns away
    pub fn offset_index(self, offset: i64) -> i64 {
        self.index() as i64 + offset
    }
}

impl TryFrom<usize> for ColumnNumber {
    type Error = ParseError;

    fn try_from(number: usize) -> Result<Self> {
        Self::new(number)
    }
}

impl From<ColumnNumber> for usize {
    fn from(column: ColumnNumber) -> usize {
        column.number()
    }
}

/// Locates a block boundary: every row whose `column` holds `sentinel`,
/// shifted by `row_offset`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerLocator {
    pub sentinel: String,
    pub column: ColumnNumber,
    #[serde(default)]
    pub row_offset: i64,
}

/// Locates a whole-file metadata value: the first row whose flag column
/// holds `sentinel`, read `value_offset` columns to the right
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifierLocator {
    pub sentinel: String,
    pub column: ColumnNumber,
    #[serde(default)]
    pub row_offset: i64,
    #[serde(default = "default_value_offset")]
    pub value_offset: i64,
}

fn default_value_offset() -> i64 {
    1
}

/// Name/value column pair inside a parameter block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamColumns {
    pub names_column: ColumnNumber,
    #[serde(default = "default_value_offset")]
    pub value_offset: i64,
}

/// Header row of the raw data section, relative to the first raw block start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawHeader {
    pub start_column: ColumnNumber,
    pub row_offset: i64,
}

/// Layout grammar of one family of sentinel-marked export files
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseDefinition {
    pub run_id: IdentifierLocator,
    pub analysis_id: IdentifierLocator,
    pub params_start: MarkerLocator,
    pub params_end: MarkerLocator,
    pub params_columns: ParamColumns,
    pub raw_start: MarkerLocator,
    pub raw_end: MarkerLocator,
    pub raw_var_names: RawHeader,
}

impl Default for ParseDefinition {
    fn default() -> Self {
        let first = ColumnNumber(NonZeroUsize::MIN);
        let analysis_name = IdentifierLocator {
            sentinel: default_layout::ANALYSIS_NAME_FLAG.to_string(),
            column: first,
            row_offset: 0,
            value_offset: 1,
        };

        Self {
            run_id: analysis_name.clone(),
            analysis_id: analysis_name,
            params_start: MarkerLocator {
                sentinel: default_layout::BEGIN_SAMPLE_FLAG.to_string(),
                column: first,
                row_offset: 1,
            },
            params_end: MarkerLocator {
                sentinel: default_layout::BEGIN_DATA_FLAG.to_string(),
                column: first,
                row_offset: -1,
            },
            params_columns: ParamColumns {
                names_column: first,
                value_offset: 1,
            },
            raw_start: MarkerLocator {
                sentinel: default_layout::BEGIN_DATA_FLAG.to_string(),
                column: first,
                row_offset: default_layout::RAW_START_OFFSET,
            },
            raw_end: MarkerLocator {
                sentinel: default_layout::END_DATA_FLAG.to_string(),
                column: first,
                row_offset: -1,
            },
            raw_var_names: RawHeader {
                start_column: first,
                row_offset: default_layout::VAR_NAMES_OFFSET,
            },
        }
    }
}

impl ParseDefinition {
    /// Load a definition from a TOML file
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ParseError::io(path, e))?;
        let definition = Self::from_toml_str(&content).map_err(|e| match e {
            ParseError::Configuration { message } => ParseError::configuration(format!(
                "{} in {}",
                message,
                path.display()
            )),
            other => other,
        })?;
        debug!("Loaded parse definition from {}", path.display());
        Ok(definition)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let definition: Self = toml::from_str(content)
            .map_err(|e| ParseError::configuration(format!("invalid parse definition: {}", e)))?;
        definition.validate()?;
        Ok(definition)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| ParseError::configuration(format!("cannot serialize definition: {}", e)))
    }

    /// Reject definitions that can never match a grid
    pub fn validate(&self) -> Result<()> {
        let sentinels = [
            ("run_id", &self.run_id.sentinel),
            ("analysis_id", &self.analysis_id.sentinel),
            ("params_start", &self.params_start.sentinel),
            ("params_end", &self.params_end.sentinel),
            ("raw_start", &self.raw_start.sentinel),
            ("raw_end", &self.raw_end.sentinel),
        ];
        for (field, sentinel) in sentinels {
            if sentinel.is_empty() {
                return Err(ParseError::configuration(format!(
                    "{} sentinel must not be empty",
                    field
                )));
            }
        }

        for (field, locator) in [("run_id", &self.run_id), ("analysis_id", &self.analysis_id)] {
            if locator.column.offset_index(locator.value_offset) < 0 {
                return Err(ParseError::configuration(format!(
                    "{} value offset {} points left of the first column",
                    field, locator.value_offset
                )));
            }
        }

        if self
            .params_columns
            .names_column
            .offset_index(self.params_columns.value_offset)
            < 0
        {
            return Err(ParseError::configuration(format!(
                "params value offset {} points left of the first column",
                self.params_columns.value_offset
            )));
        }

        Ok(())
    }
}

/// Options for reading a delimited file into a grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridOptions {
    /// Field delimiter byte
    pub delimiter: u8,

    /// Extra columns a row may carry beyond the width of the first row.
    /// Shorter rows are always padded; `None` accepts any width
    pub ragged_tolerance: Option<usize>,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER,
            ragged_tolerance: Some(DEFAULT_RAGGED_TOLERANCE),
        }
    }
}

/// What the coordinator does when one file fails to parse
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorPolicy {
    /// Abort the run on the first failure
    #[default]
    FailFast,
    /// Log the failure, count it and continue with the next file
    SkipFile,
}

/// Serialization format for the output tables
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    #[default]
    Csv,
    Parquet,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Parquet => "parquet",
        }
    }
}

/// Run-level configuration for folder parsing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParserConfig {
    /// Layout grammar applied to every file
    pub definition: ParseDefinition,

    /// Grid loading options
    pub grid: GridOptions,

    /// File extension (without dot) of candidate files; case-sensitive
    pub extension: String,

    /// Descend into sub-folders when discovering files
    pub recursive: bool,

    /// Failure handling across files
    pub error_policy: ErrorPolicy,

    /// Output table format
    pub output_format: OutputFormat,

    /// Show a progress bar while processing a folder
    pub show_progress: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            definition: ParseDefinition::default(),
            grid: GridOptions::default(),
            extension: DEFAULT_EXTENSION.to_string(),
            recursive: false,
            error_policy: ErrorPolicy::FailFast,
            output_format: OutputFormat::Csv,
            show_progress: false,
        }
    }
}

impl ParserConfig {
    pub fn with_definition(mut self, definition: ParseDefinition) -> Self {
        self.definition = definition;
        self
    }

    pub fn with_grid_options(mut self, grid: GridOptions) -> Self {
        self.grid = grid;
        self
    }

    pub fn with_ragged_tolerance(mut self, tolerance: Option<usize>) -> Self {
        self.grid.ragged_tolerance = tolerance;
        self
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn with_recursive(mut self) -> Self {
        self.recursive = true;
        self
    }

    pub fn with_error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.error_policy = policy;
        self
    }

    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    pub fn with_progress(mut self) -> Self {
        self.show_progress = true;
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.definition.validate()?;
        if self.extension.is_empty() || self.extension.starts_with('.') {
            return Err(ParseError::configuration(format!(
                "extension must be non-empty and given without a leading dot, got '{}'",
                self.extension
            )));
        }
        Ok(())
    }
}
