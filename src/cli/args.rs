//! Command-line arguments and their mapping onto a run configuration.

use crate::config::{ErrorPolicy, OutputFormat, ParseDefinition, ParserConfig};
use crate::constants::{DEFAULT_EXTENSION, DEFAULT_RAGGED_TOLERANCE};
use crate::error::{ParseError, Result};
use clap::{ArgAction, Parser, ValueEnum};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Parser, Debug, Clone)]
#[command(name = "curve-parser")]
#[command(about = "Extract per-sample parameters and raw curves from test exports")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
    /// Folder containing the export files
    #[arg(value_name = "FOLDER")]
    pub folder: PathBuf,

    /// TOML file describing the export layout (defaults to the tensile peel layout)
    #[arg(short, long, value_name = "FILE")]
    pub definition: Option<PathBuf>,

    /// Output directory for the params and raw tables (defaults to FOLDER)
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Output table format
    #[arg(short, long, value_enum, default_value_t = FormatArg::Csv)]
    pub format: FormatArg,

    /// Extension of export files, without the dot
    #[arg(short, long, default_value = DEFAULT_EXTENSION)]
    pub extension: String,

    /// Also search sub-folders
    #[arg(short, long)]
    pub recursive: bool,

    /// Log failed files and continue instead of aborting the run
    #[arg(long)]
    pub skip_failed: bool,

    /// Extra columns a row may have beyond the first row of its file
    #[arg(long, value_name = "N", default_value_t = DEFAULT_RAGGED_TOLERANCE)]
    pub ragged_tolerance: usize,

    /// Accept rows of any width
    #[arg(long, conflicts_with = "ragged_tolerance")]
    pub allow_ragged: bool,

    /// Increase logging verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only report errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Csv,
    Parquet,
}

impl From<FormatArg> for OutputFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Csv => OutputFormat::Csv,
            FormatArg::Parquet => OutputFormat::Parquet,
        }
    }
}

impl Args {
    /// Check that the input folder exists
    pub fn validate(&self) -> Result<()> {
        if !self.folder.is_dir() {
            return Err(ParseError::configuration(format!(
                "Input folder does not exist or is not a directory: {}",
                self.folder.display()
            )));
        }
        Ok(())
    }

    /// Output directory, defaulting to the input folder
    pub fn output_dir(&self) -> &Path {
        self.output.as_deref().unwrap_or(&self.folder)
    }

    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Check if we should show progress bars (not in quiet mode)
    pub fn show_progress(&self) -> bool {
        !self.quiet
    }

    /// Build the run configuration, loading the definition file if given
    pub fn to_config(&self) -> Result<ParserConfig> {
        let definition = match &self.definition {
            Some(path) => ParseDefinition::from_toml_file(path)?,
            None => ParseDefinition::default(),
        };

        let policy = if self.skip_failed {
            ErrorPolicy::SkipFile
        } else {
            ErrorPolicy::FailFast
        };

        let tolerance = if self.allow_ragged {
            None
        } else {
            Some(self.ragged_tolerance)
        };

        let mut config = ParserConfig::default()
            .with_definition(definition)
            .with_ragged_tolerance(tolerance)
            .with_extension(self.extension.clone())
            .with_error_policy(policy)
            .with_output_format(self.format.into());
        if self.recursive {
            config = config.with_recursive();
        }
        if self.show_progress() {
            config = config.with_progress();
        }

        config.validate()?;
        debug!("Run configuration: {:?}", config);
        Ok(config)
    }
}
