//! Application constants for curve parsing
//!
//! Output column names, default file naming and the default layout
//! grammar of the tensile peel export.

// =============================================================================
// Output Columns
// =============================================================================

/// Run identifier column (shared by both tables)
pub const RUN_ID_COLUMN: &str = "RunID";

/// Analysis identifier column (shared by both tables)
pub const ANALYSIS_ID_COLUMN: &str = "AnalysisID";

/// 1-based sample ordinal within a file
pub const SAMPLE_ID_COLUMN: &str = "SampleID";

/// 0-based observation index within a raw block
pub const OBSERVATION_INDEX_COLUMN: &str = "idx";

/// Prefix columns of every output row; block-derived names may not reuse them
pub const SAMPLE_KEY_COLUMNS: [&str; 3] = [RUN_ID_COLUMN, ANALYSIS_ID_COLUMN, SAMPLE_ID_COLUMN];

// =============================================================================
// Input Discovery
// =============================================================================

/// Extension of export files picked up from a folder
pub const DEFAULT_EXTENSION: &str = "csv";

/// Field delimiter of export files
pub const DEFAULT_DELIMITER: u8 = b',';

/// Extra columns a row may carry beyond the width of the first row
pub const DEFAULT_RAGGED_TOLERANCE: usize = 0;

// =============================================================================
// Output Files
// =============================================================================

/// File stem of the per-sample parameters table
pub const PARAMS_FILE_STEM: &str = "df_params";

/// File stem of the per-observation raw table
pub const RAW_FILE_STEM: &str = "df_raw";

// =============================================================================
// Default Layout (tensile peel export)
// =============================================================================

pub mod default_layout {
    /// Metadata row carrying the analysis file name
    pub const ANALYSIS_NAME_FLAG: &str = "_AnalysisName";

    /// Row opening a sample; parameters start on the next row
    pub const BEGIN_SAMPLE_FLAG: &str = "BeginSample";

    /// Row opening a sample's data section
    pub const BEGIN_DATA_FLAG: &str = "BeginData";

    /// Row closing a sample's data section
    pub const END_DATA_FLAG: &str = "EndData";

    /// Data rows start this many rows after `BeginData` (names, units, then data)
    pub const RAW_START_OFFSET: i64 = 3;

    /// Variable name row relative to the first data row
    pub const VAR_NAMES_OFFSET: i64 = -2;
}

// =============================================================================
// Identifier Parsing
// =============================================================================

/// Separator between run, material and analysis parts of the analysis name
pub const IDENTIFIER_SEPARATOR: char = '_';

/// Position of the analysis part within the analysis name
pub const ANALYSIS_SEGMENT_INDEX: usize = 2;
