//! Per-sample block readers.
//!
//! Each reader turns the sample blocks of one grid into output records.
//! Every record starts with the same identifying prefix so rows from many
//! files can share one table.

pub mod params;
pub mod raw;

use crate::constants::{ANALYSIS_ID_COLUMN, RUN_ID_COLUMN, SAMPLE_ID_COLUMN};
use crate::models::{Identifiers, Value};
use crate::table::Record;

/// RunID, AnalysisID and SampleID, in that order
pub(crate) fn sample_record(ids: &Identifiers, sample_id: i64) -> Record {
    let mut record = Record::new();
    record.insert(RUN_ID_COLUMN, Value::from(ids.run_id.as_str()));
    record.insert(ANALYSIS_ID_COLUMN, Value::from(ids.analysis_id.as_str()));
    record.insert(SAMPLE_ID_COLUMN, Value::Integer(sample_id));
    record
}
