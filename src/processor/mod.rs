//! Per-file parsing and run coordination.
//!
//! [`FileParser`] turns one grid into parameter and raw records without
//! touching any shared state. [`RunCoordinator`] drives it over many files,
//! owns the two accumulating tables and applies the configured
//! [`ErrorPolicy`] when a file fails.

pub mod discovery;
pub mod writer;

#[cfg(test)]
pub mod tests;

use self::{discovery::FileDiscovery, writer::TableWriter};

use crate::blocks::{params, raw};
use crate::config::{ErrorPolicy, ParseDefinition, ParserConfig};
use crate::constants::{PARAMS_FILE_STEM, RAW_FILE_STEM};
use crate::error::{ParseError, Result};
use crate::grid::{self, Grid};
use crate::identifiers::read_identifiers;
use crate::models::{Identifiers, ProcessingStats, SampleBlock};
use crate::scanner::scan_required_blocks;
use crate::table::{ParamsTable, RawTable, Record};

use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Records extracted from one file, not yet appended anywhere
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedFile {
    pub identifiers: Identifiers,
    pub params: Vec<Record>,
    pub raw: Vec<Record>,
    pub samples: usize,
}

/// Applies a [`ParseDefinition`] to single grids
#[derive(Debug, Clone)]
pub struct FileParser {
    definition: ParseDefinition,
}

impl FileParser {
    pub fn new(definition: ParseDefinition) -> Self {
        Self { definition }
    }

    pub fn definition(&self) -> &ParseDefinition {
        &self.definition
    }

    /// Extract identifiers, both block families and their records from a grid
    pub fn parse(&self, grid: &Grid) -> Result<ParsedFile> {
        let definition = &self.definition;
        let identifiers = read_identifiers(grid, definition)?;

        let params_blocks = SampleBlock::number(scan_required_blocks(
            grid,
            "params",
            &definition.params_start,
            &definition.params_end,
        )?);
        let raw_blocks = SampleBlock::number(scan_required_blocks(
            grid,
            "raw",
            &definition.raw_start,
            &definition.raw_end,
        )?);

        if params_blocks.len() != raw_blocks.len() {
            return Err(ParseError::SampleCountMismatch {
                params: params_blocks.len(),
                raw: raw_blocks.len(),
            });
        }

        // scan_required_blocks guarantees at least one raw block
        let first_raw_start = raw_blocks[0].range.start();
        let var_names = raw::read_var_names(grid, first_raw_start, &definition.raw_var_names)?;

        let params = params::read_all(
            grid,
            &params_blocks,
            &identifiers,
            &definition.params_columns,
        )?;
        let raw = raw::read_all(
            grid,
            &raw_blocks,
            &identifiers,
            definition.raw_var_names.start_column,
            &var_names,
        )?;

        Ok(ParsedFile {
            identifiers,
            params,
            raw,
            samples: params_blocks.len(),
        })
    }
}

/// Drives file parsing over a run and owns the output tables
#[derive(Debug)]
pub struct RunCoordinator {
    config: ParserConfig,
    parser: FileParser,
    params: ParamsTable,
    raw: RawTable,
    stats: ProcessingStats,
}

impl RunCoordinator {
    /// Create a coordinator with empty tables
    pub fn new(config: ParserConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            parser: FileParser::new(config.definition.clone()),
            config,
            params: ParamsTable::new(),
            raw: RawTable::new(),
            stats: ProcessingStats::default(),
        })
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    pub fn params(&self) -> &ParamsTable {
        &self.params
    }

    pub fn raw(&self) -> &RawTable {
        &self.raw
    }

    pub fn stats(&self) -> &ProcessingStats {
        &self.stats
    }

    /// Hand over both tables, consuming the coordinator
    pub fn into_tables(self) -> (ParamsTable, RawTable) {
        (self.params, self.raw)
    }

    /// Parse one file and append its rows to both tables.
    ///
    /// Nothing is appended unless the whole file parses.
    pub fn process_file(&mut self, path: &Path) -> Result<()> {
        let start = Instant::now();
        let parsed = grid::load(path, &self.config.grid)
            .and_then(|grid| self.parser.parse(&grid))
            .map_err(|e| e.in_file(path))?;

        info!(
            "Parsed {}: run {} analysis {}, {} samples, {} raw rows",
            path.display(),
            parsed.identifiers.run_id,
            parsed.identifiers.analysis_id,
            parsed.samples,
            parsed.raw.len()
        );

        self.stats.files_processed += 1;
        self.stats.samples_parsed += parsed.samples;
        self.stats.params_rows += parsed.params.len();
        self.stats.raw_rows += parsed.raw.len();
        self.params.append(parsed.params);
        self.raw.append(parsed.raw);
        self.stats.processing_time_ms += start.elapsed().as_millis();
        Ok(())
    }

    /// Process files in the given order, applying the error policy
    pub fn process_files<I, P>(&mut self, paths: I) -> Result<&ProcessingStats>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let paths: Vec<PathBuf> = paths
            .into_iter()
            .map(|p| p.as_ref().to_path_buf())
            .collect();
        let progress = self.progress_bar(paths.len());

        for path in &paths {
            if let Some(name) = path.file_name() {
                progress.set_message(name.to_string_lossy().to_string());
            }

            if let Err(error) = self.process_file(path) {
                match self.config.error_policy {
                    ErrorPolicy::FailFast => {
                        progress.abandon();
                        return Err(error);
                    }
                    ErrorPolicy::SkipFile => {
                        warn!("Skipping {}: {}", path.display(), error);
                        self.stats.files_failed += 1;
                        self.stats.failures.push((path.clone(), error.to_string()));
                    }
                }
            }
            progress.inc(1);
        }

        progress.finish_with_message("Done");
        debug!(
            "Run totals: {} files processed, {} failed, params {:?}, raw {:?}",
            self.stats.files_processed,
            self.stats.files_failed,
            self.params.shape(),
            self.raw.shape()
        );
        Ok(&self.stats)
    }

    /// Discover matching files in `folder` and process them in sorted order
    pub fn process_folder(&mut self, folder: &Path) -> Result<&ProcessingStats> {
        let discovery = FileDiscovery::new(folder, &self.config.extension)
            .with_recursive(self.config.recursive);
        let files = discovery.discover()?;

        if files.is_empty() {
            warn!(
                "No .{} files found in {}",
                self.config.extension,
                folder.display()
            );
        }

        self.process_files(files)
    }

    /// Write both tables to `output_dir`; returns the paths written
    pub fn write_tables(&self, output_dir: &Path) -> Result<Vec<PathBuf>> {
        let writer = TableWriter::new(output_dir, self.config.output_format);
        let mut written = Vec::new();
        for (table, stem) in [(&self.params, PARAMS_FILE_STEM), (&self.raw, RAW_FILE_STEM)] {
            if table.is_empty() {
                warn!("Table {} is empty, not writing it", stem);
                continue;
            }
            written.push(writer.write(table, stem)?);
        }
        Ok(written)
    }

    fn progress_bar(&self, len: usize) -> ProgressBar {
        if !self.config.show_progress {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new(len as u64);
        let style = ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}",
            )
            .map(|style| style.progress_chars("#>-"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        pb.set_style(style);
        pb
    }
}
