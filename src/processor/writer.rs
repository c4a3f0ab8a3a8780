//! Table output for parsed runs.
//!
//! Converts accumulated tables to polars frames and writes them as CSV or
//! Snappy-compressed Parquet, one file per table.

use crate::config::OutputFormat;
use crate::error::{ParseError, Result};
use crate::table::Table;

use polars::prelude::{CsvWriter, ParquetCompression, ParquetWriter, SerWriter};
use std::fs::{self, File};
use std::path::PathBuf;
use tracing::info;

/// Writes tables into one output directory
#[derive(Debug, Clone)]
pub struct TableWriter {
    output_dir: PathBuf,
    format: OutputFormat,
}

impl TableWriter {
    pub fn new(output_dir: impl Into<PathBuf>, format: OutputFormat) -> Self {
        Self {
            output_dir: output_dir.into(),
            format,
        }
    }

    /// Target path for a table stem, e.g. `out/df_params.csv`
    pub fn path_for(&self, stem: &str) -> PathBuf {
        let file_name = format!("{}.{}", stem, self.format.extension());
        self.output_dir.join(file_name)
    }

    /// Write one table, creating the output directory if needed
    pub fn write(&self, table: &Table, stem: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir).map_err(|e| ParseError::io(&self.output_dir, e))?;

        let path = self.path_for(stem);
        let mut df = table.to_dataframe()?;
        let mut file = File::create(&path).map_err(|e| ParseError::io(&path, e))?;

        match self.format {
            OutputFormat::Csv => {
                CsvWriter::new(&mut file)
                    .include_header(true)
                    .finish(&mut df)?;
            }
            OutputFormat::Parquet => {
                ParquetWriter::new(file)
                    .with_compression(ParquetCompression::Snappy)
                    .finish(&mut df)?;
            }
        }

        info!(
            "Wrote {} rows x {} columns to {}",
            df.height(),
            df.width(),
            path.display()
        );
        Ok(path)
    }
}
