//! Schema-less output tables.
//!
//! Block readers emit [`Record`]s, ordered name/value rows. A [`Table`]
//! accumulates records from many files and unions their columns by name,
//! so a parameter that only some files report simply leaves gaps in the
//! other rows. Conversion to a polars [`DataFrame`] happens once, at
//! output time.

use crate::error::Result;
use crate::models::Value;
use polars::prelude::{Column, DataFrame};
use std::collections::HashSet;
use tracing::debug;

/// One output row: column name to value, in insertion order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, Value)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field. An existing name keeps its position and takes the new value.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        let name = name.into();
        match self.fields.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((name, value)),
        }
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.fields.iter().map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

static MISSING: Value = Value::Missing;

/// Append-only table with columns unioned by name in first-seen order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Record>,
}

/// One row per (file, sample)
pub type ParamsTable = Table;

/// One row per (file, sample, observation)
pub type RawTable = Table;

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append records, extending the column set with any new names
    pub fn append<I>(&mut self, records: I)
    where
        I: IntoIterator<Item = Record>,
    {
        let mut known: HashSet<String> = self.columns.iter().cloned().collect();
        for record in records {
            for name in record.names() {
                if !known.contains(name) {
                    known.insert(name.to_string());
                    self.columns.push(name.to_string());
                }
            }
            self.rows.push(record);
        }
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.height(), self.width())
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    /// Cell at `row` in column `name`; absent fields read as missing
    pub fn value(&self, row: usize, name: &str) -> Option<&Value> {
        self.rows
            .get(row)
            .map(|record| record.get(name).unwrap_or(&MISSING))
    }

    /// Every row's value for one column, top to bottom
    pub fn column_values(&self, name: &str) -> Vec<&Value> {
        self.rows
            .iter()
            .map(|record| record.get(name).unwrap_or(&MISSING))
            .collect()
    }

    /// Row values in column order, missing fields filled in
    pub fn row(&self, row: usize) -> Option<Vec<&Value>> {
        let record = self.rows.get(row)?;
        Some(
            self.columns
                .iter()
                .map(|name| record.get(name).unwrap_or(&MISSING))
                .collect(),
        )
    }

    /// Build a typed polars frame.
    ///
    /// A column holding only integers becomes Int64, only numbers Float64,
    /// and any text forces the whole column to String.
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let columns = self
            .columns
            .iter()
            .map(|name| build_column(name, &self.column_values(name)))
            .collect::<Vec<_>>();
        let df = DataFrame::new(columns)?;
        debug!("Built DataFrame with shape {:?}", df.shape());
        Ok(df)
    }
}

fn build_column(name: &str, values: &[&Value]) -> Column {
    let any_text = values.iter().any(|v| matches!(v, Value::Text(_)));
    let integers_only = values
        .iter()
        .all(|v| matches!(v, Value::Integer(_) | Value::Missing))
        && values.iter().any(|v| !v.is_missing());

    if any_text {
        let strings: Vec<Option<String>> = values
            .iter()
            .map(|v| (!v.is_missing()).then(|| v.to_string()))
            .collect();
        Column::new(name.into(), strings)
    } else if integers_only {
        let integers: Vec<Option<i64>> = values.iter().map(|v| v.as_i64()).collect();
        Column::new(name.into(), integers)
    } else {
        let numbers: Vec<Option<f64>> = values.iter().map(|v| v.as_f64()).collect();
        Column::new(name.into(), numbers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::DataType;

    fn param_row(sample_id: i64, a: f64, b: f64) -> Record {
        Record::new()
            .with("RunID", "Run1")
            .with("AnalysisID", "Analysis 1")
            .with("SampleID", sample_id)
            .with("A", a)
            .with("B", b)
    }

    #[test]
    fn test_record_insert_replaces_in_place() {
        let mut record = Record::new().with("A", 1.0).with("B", 2.0);
        record.insert("A", Value::Number(9.0));

        assert_eq!(record.names().collect::<Vec<_>>(), vec!["A", "B"]);
        assert_eq!(record.get("A"), Some(&Value::Number(9.0)));
        assert_eq!(record.len(), 2);
    }

    #[test]
    fn test_two_block_table_shape() {
        let mut table = Table::new();
        table.append(vec![param_row(1, 1.0, 2.0), param_row(2, 3.0, 4.0)]);

        assert_eq!(table.shape(), (2, 5));
        assert_eq!(
            table.row(0).unwrap(),
            vec![
                &Value::from("Run1"),
                &Value::from("Analysis 1"),
                &Value::Integer(1),
                &Value::Number(1.0),
                &Value::Number(2.0),
            ]
        );
    }

    #[test]
    fn test_columns_union_by_name() {
        let mut table = Table::new();
        table.append(vec![Record::new().with("RunID", "R1").with("A", 1.0)]);
        table.append(vec![Record::new().with("RunID", "R2").with("C", 3.0)]);

        assert_eq!(table.columns(), &["RunID", "A", "C"]);
        assert_eq!(table.value(0, "C"), Some(&Value::Missing));
        assert_eq!(table.value(1, "A"), Some(&Value::Missing));
        assert_eq!(table.value(1, "C"), Some(&Value::Number(3.0)));
        assert_eq!(table.value(2, "C"), None);
    }

    #[test]
    fn test_to_dataframe_column_types() {
        let mut table = Table::new();
        table.append(vec![
            Record::new()
                .with("SampleID", 1i64)
                .with("Load", 0.5)
                .with("Status", "ok"),
            Record::new().with("SampleID", 2i64).with("Load", 0.8).with("Status", 3.0),
        ]);

        let df = table.to_dataframe().unwrap();
        assert_eq!(df.shape(), (2, 3));
        assert_eq!(df.column("SampleID").unwrap().dtype(), &DataType::Int64);
        assert_eq!(df.column("Load").unwrap().dtype(), &DataType::Float64);
        assert_eq!(df.column("Status").unwrap().dtype(), &DataType::String);

        let status = df.column("Status").unwrap().str().unwrap();
        assert_eq!(status.get(0), Some("ok"));
        assert_eq!(status.get(1), Some("3"));
    }

    #[test]
    fn test_to_dataframe_missing_values_are_null() {
        let mut table = Table::new();
        table.append(vec![Record::new().with("A", 1.0)]);
        table.append(vec![Record::new().with("B", 2.0)]);

        let df = table.to_dataframe().unwrap();
        let a = df.column("A").unwrap().f64().unwrap();
        assert_eq!(a.get(0), Some(1.0));
        assert_eq!(a.get(1), None);
        assert_eq!(df.column("B").unwrap().null_count(), 1);
    }

    #[test]
    fn test_empty_table_to_dataframe() {
        let df = Table::new().to_dataframe().unwrap();
        assert_eq!(df.shape(), (0, 0));
    }
}
