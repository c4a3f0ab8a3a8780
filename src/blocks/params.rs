//! Scalar parameter blocks.
//!
//! A parameter block is a run of `name, value[, unit]` rows. Each block
//! becomes one wide record with the parameter names as columns. A name that
//! repeats inside a block keeps its first position and takes the last
//! value; a name that reuses a prefix column is a format error.

use super::sample_record;
use crate::coerce::coerce;
use crate::config::ParamColumns;
use crate::constants::SAMPLE_KEY_COLUMNS;
use crate::error::{ParseError, Result};
use crate::grid::Grid;
use crate::models::{Identifiers, SampleBlock};
use crate::table::Record;
use tracing::debug;

/// Read every parameter block into one record per sample
pub fn read_all(
    grid: &Grid,
    blocks: &[SampleBlock],
    ids: &Identifiers,
    columns: &ParamColumns,
) -> Result<Vec<Record>> {
    blocks
        .iter()
        .map(|block| read_block(grid, block, ids, columns))
        .collect()
}

fn read_block(
    grid: &Grid,
    block: &SampleBlock,
    ids: &Identifiers,
    columns: &ParamColumns,
) -> Result<Record> {
    let name_column = columns.names_column.index() as i64;
    let value_column = columns.names_column.offset_index(columns.value_offset);

    let mut record = sample_record(ids, block.sample_id);
    for row in block.range.rows() {
        let row = row as i64;
        let name = grid
            .checked_cell(row, name_column)?
            .as_text()
            .unwrap_or_default();
        if SAMPLE_KEY_COLUMNS.contains(&name) {
            return Err(ParseError::ReservedColumn {
                name: name.to_string(),
                row: row as usize,
            });
        }
        let value = coerce(grid.checked_cell(row, value_column)?);
        record.insert(name, value);
    }

    debug!(
        "Sample {}: {} parameters",
        block.sample_id,
        block.range.height()
    );
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ColumnNumber;
    use crate::models::{BlockRange, Value};

    fn ids() -> Identifiers {
        Identifiers {
            run_id: "Run101620-1".to_string(),
            analysis_id: "Analysis 94623".to_string(),
        }
    }

    fn columns() -> ParamColumns {
        ParamColumns {
            names_column: ColumnNumber::new(1).unwrap(),
            value_offset: 1,
        }
    }

    fn two_block_grid() -> Grid {
        Grid::from_fields(vec![
            vec!["BeginSample", "1", ""],
            vec!["A", "1", "lbf"],
            vec!["B", "2", "in"],
            vec!["BeginData", "", ""],
            vec!["BeginSample", "2", ""],
            vec!["A", "3", "lbf"],
            vec!["B", "4", "in"],
            vec!["BeginData", "", ""],
        ])
    }

    fn blocks() -> Vec<SampleBlock> {
        SampleBlock::number(vec![BlockRange::new(1, 2), BlockRange::new(5, 2)])
    }

    #[test]
    fn test_one_record_per_block() {
        let records = read_all(&two_block_grid(), &blocks(), &ids(), &columns()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(
            records[0].names().collect::<Vec<_>>(),
            vec!["RunID", "AnalysisID", "SampleID", "A", "B"]
        );
        assert_eq!(records[0].get("SampleID"), Some(&Value::Integer(1)));
        assert_eq!(records[0].get("A"), Some(&Value::Number(1.0)));
        assert_eq!(records[0].get("B"), Some(&Value::Number(2.0)));
        assert_eq!(records[1].get("SampleID"), Some(&Value::Integer(2)));
        assert_eq!(records[1].get("A"), Some(&Value::Number(3.0)));
        assert_eq!(records[1].get("RunID"), Some(&Value::from("Run101620-1")));
    }

    #[test]
    fn test_value_offset_selects_unit_column() {
        let columns = ParamColumns {
            names_column: ColumnNumber::new(1).unwrap(),
            value_offset: 2,
        };
        let records = read_all(&two_block_grid(), &blocks(), &ids(), &columns).unwrap();
        assert_eq!(records[0].get("A"), Some(&Value::from("lbf")));
    }

    #[test]
    fn test_repeated_name_keeps_first_position_last_value() {
        let grid = Grid::from_fields(vec![
            vec!["A", "1"],
            vec!["B", "2"],
            vec!["A", "5"],
        ]);
        let blocks = SampleBlock::number(vec![BlockRange::new(0, 3)]);
        let records = read_all(&grid, &blocks, &ids(), &columns()).unwrap();

        assert_eq!(
            records[0].names().skip(3).collect::<Vec<_>>(),
            vec!["A", "B"]
        );
        assert_eq!(records[0].get("A"), Some(&Value::Number(5.0)));
    }

    #[test]
    fn test_reserved_parameter_name_rejected() {
        let grid = Grid::from_fields(vec![vec!["A", "1"], vec!["SampleID", "7"]]);
        let blocks = SampleBlock::number(vec![BlockRange::new(0, 2)]);

        match read_all(&grid, &blocks, &ids(), &columns()).unwrap_err() {
            ParseError::ReservedColumn { name, row } => {
                assert_eq!(name, "SampleID");
                assert_eq!(row, 1);
            }
            other => panic!("Expected ReservedColumn, got {:?}", other),
        }
    }

    #[test]
    fn test_idx_is_an_ordinary_parameter_name() {
        let grid = Grid::from_fields(vec![vec!["idx", "3"]]);
        let blocks = SampleBlock::number(vec![BlockRange::new(0, 1)]);
        let records = read_all(&grid, &blocks, &ids(), &columns()).unwrap();
        assert_eq!(records[0].get("idx"), Some(&Value::Number(3.0)));
    }

    #[test]
    fn test_non_numeric_value_kept_as_text() {
        let grid = Grid::from_fields(vec![vec!["Operator", "JDL"], vec!["Peak", "2.58"]]);
        let blocks = SampleBlock::number(vec![BlockRange::new(0, 2)]);
        let records = read_all(&grid, &blocks, &ids(), &columns()).unwrap();

        assert_eq!(records[0].get("Operator"), Some(&Value::from("JDL")));
        assert_eq!(records[0].get("Peak"), Some(&Value::Number(2.58)));
    }

    #[test]
    fn test_empty_block_yields_prefix_only() {
        let blocks = SampleBlock::number(vec![BlockRange::new(3, 0)]);
        let records = read_all(&two_block_grid(), &blocks, &ids(), &columns()).unwrap();
        assert_eq!(records[0].len(), 3);
    }

    #[test]
    fn test_value_column_outside_grid() {
        let columns = ParamColumns {
            names_column: ColumnNumber::new(1).unwrap(),
            value_offset: 5,
        };
        let result = read_all(&two_block_grid(), &blocks(), &ids(), &columns);
        assert!(matches!(result, Err(ParseError::CellOutOfBounds { .. })));
    }
}
