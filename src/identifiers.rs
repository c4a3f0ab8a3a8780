//! Run and analysis identifier extraction.
//!
//! Both identifiers come from one metadata cell holding the analysis file
//! name, e.g. ` "Run101620-1_Material X_Analysis 94623.mss"`. The run id is
//! the part before the first underscore; the analysis id is the third
//! underscore-separated part without its extension.

use crate::config::{IdentifierLocator, ParseDefinition};
use crate::constants::{ANALYSIS_SEGMENT_INDEX, IDENTIFIER_SEPARATOR};
use crate::error::{ParseError, Result};
use crate::grid::{Cell, Grid};
use crate::models::Identifiers;
use crate::scanner::{find_rows, sentinel_not_found};
use tracing::{debug, warn};

/// Read the raw identifier cell for `field`.
///
/// Uses the first row whose flag column holds the sentinel; later matches
/// are ignored.
pub fn read_identifier<'g>(
    grid: &'g Grid,
    field: &str,
    locator: &IdentifierLocator,
) -> Result<&'g Cell> {
    let rows = find_rows(
        grid,
        &locator.sentinel,
        locator.column.index(),
        locator.row_offset,
    );

    let row = *rows
        .first()
        .ok_or_else(|| sentinel_not_found(field, &locator.sentinel, locator.column))?;

    if rows.len() > 1 {
        warn!(
            "{} sentinel '{}' matched {} rows, using the first",
            field,
            locator.sentinel,
            rows.len()
        );
    }

    grid.checked_cell(row, locator.column.offset_index(locator.value_offset))
}

/// Trim whitespace, then drop one leading and one trailing double quote
pub fn clean(value: &str) -> String {
    let trimmed = value.trim();
    let trimmed = trimmed.strip_prefix('"').unwrap_or(trimmed);
    let trimmed = trimmed.strip_suffix('"').unwrap_or(trimmed);
    trimmed.to_string()
}

/// First underscore-separated segment
pub fn extract_run_id(cleaned: &str) -> String {
    cleaned
        .split(IDENTIFIER_SEPARATOR)
        .next()
        .unwrap_or_default()
        .to_string()
}

/// Third underscore-separated segment, up to its first `.`
pub fn extract_analysis_id(cleaned: &str) -> Result<String> {
    let segments: Vec<&str> = cleaned.split(IDENTIFIER_SEPARATOR).collect();
    let segment = segments
        .get(ANALYSIS_SEGMENT_INDEX)
        .ok_or_else(|| ParseError::IdentifierSegments {
            value: cleaned.to_string(),
            expected: ANALYSIS_SEGMENT_INDEX + 1,
            found: segments.len(),
        })?;
    Ok(segment.split('.').next().unwrap_or_default().to_string())
}

/// Cleaned identifier text; an empty or blank cell is a format error
fn read_identifier_text(grid: &Grid, field: &str, locator: &IdentifierLocator) -> Result<String> {
    let cleaned = read_identifier(grid, field, locator)?
        .as_text()
        .map(clean)
        .unwrap_or_default();

    if cleaned.is_empty() {
        return Err(ParseError::EmptyIdentifier {
            field: field.to_string(),
            sentinel: locator.sentinel.clone(),
        });
    }
    Ok(cleaned)
}

/// Read, clean and split both identifiers of a file
pub fn read_identifiers(grid: &Grid, definition: &ParseDefinition) -> Result<Identifiers> {
    let run_id = extract_run_id(&read_identifier_text(grid, "run_id", &definition.run_id)?);
    let analysis_id = extract_analysis_id(&read_identifier_text(
        grid,
        "analysis_id",
        &definition.analysis_id,
    )?)?;

    debug!("Identifiers: run_id={} analysis_id={}", run_id, analysis_id);
    Ok(Identifiers {
        run_id,
        analysis_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const ANALYSIS_NAME: &str = "Run101620-1_Material X_Analysis 94623.mss";

    fn header_grid() -> Grid {
        Grid::from_fields(vec![
            vec!["_FileType", "Export", ""],
            vec!["_AnalysisName", " \"Run101620-1_Material X_Analysis 94623.mss\"", ""],
            vec!["_Operator", "JDL", ""],
            vec!["_AnalysisName", "\"Other_Run_Analysis 1.mss\"", ""],
        ])
    }

    #[test]
    fn test_clean_strips_whitespace_then_quotes() {
        assert_eq!(clean(" \"X\" "), "X");
        assert_eq!(
            clean(" \"Run101620-1_Material X_Analysis 94623.mss\""),
            ANALYSIS_NAME
        );
        assert_eq!(clean("plain"), "plain");
        assert_eq!(clean("\"left only"), "left only");
        assert_eq!(clean("\"\"twice\"\""), "\"twice\"");
    }

    #[test]
    fn test_extract_run_id() {
        assert_eq!(extract_run_id(ANALYSIS_NAME), "Run101620-1");
        assert_eq!(extract_run_id("NoUnderscore"), "NoUnderscore");
        assert_eq!(extract_run_id(""), "");
    }

    #[test]
    fn test_extract_analysis_id() {
        assert_eq!(extract_analysis_id(ANALYSIS_NAME).unwrap(), "Analysis 94623");
        assert_eq!(extract_analysis_id("a_b_c_d.txt").unwrap(), "c");
    }

    #[test]
    fn test_extract_analysis_id_too_few_segments() {
        match extract_analysis_id("Run101620-1_Analysis.mss").unwrap_err() {
            ParseError::IdentifierSegments {
                expected, found, ..
            } => {
                assert_eq!(expected, 3);
                assert_eq!(found, 2);
            }
            other => panic!("Expected IdentifierSegments, got {:?}", other),
        }
    }

    #[test]
    fn test_read_identifier_uses_first_match() {
        let grid = header_grid();
        let definition = ParseDefinition::default();
        let cell = read_identifier(&grid, "run_id", &definition.run_id).unwrap();
        assert_eq!(
            cell.as_text(),
            Some(" \"Run101620-1_Material X_Analysis 94623.mss\"")
        );
    }

    #[test]
    fn test_read_identifiers() {
        let grid = header_grid();
        let ids = read_identifiers(&grid, &ParseDefinition::default()).unwrap();
        assert_eq!(ids.run_id, "Run101620-1");
        assert_eq!(ids.analysis_id, "Analysis 94623");
    }

    #[test]
    fn test_missing_sentinel_is_format_error() {
        let grid = Grid::from_fields(vec![vec!["_Operator", "JDL"]]);
        let err = read_identifiers(&grid, &ParseDefinition::default()).unwrap_err();

        assert!(err.is_format());
        assert!(matches!(err, ParseError::SentinelNotFound { .. }));
    }

    #[test]
    fn test_empty_identifier_cell_is_format_error() {
        for value in ["", " \"\" ", "  "] {
            let grid = Grid::from_fields(vec![vec!["_AnalysisName", value, ""]]);
            let err = read_identifiers(&grid, &ParseDefinition::default()).unwrap_err();

            assert!(err.is_format());
            match err {
                ParseError::EmptyIdentifier { field, sentinel } => {
                    assert_eq!(field, "run_id");
                    assert_eq!(sentinel, "_AnalysisName");
                }
                other => panic!("Expected EmptyIdentifier, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_value_column_outside_grid() {
        let grid = Grid::from_fields(vec![vec!["_AnalysisName"]]);
        let err = read_identifiers(&grid, &ParseDefinition::default()).unwrap_err();
        assert!(matches!(err, ParseError::CellOutOfBounds { .. }));
    }
}
