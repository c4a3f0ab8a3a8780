//! Scenario tests for the run coordinator
//!
//! Exports are generated inline in the tensile peel layout: a metadata
//! header, then per sample a parameter block and a two-variable curve.


use std::fs;
use std::path::{Path, PathBuf};

/// Parameters and curve rows of one generated sample
pub struct SampleSpec<'a> {
    pub params: &'a [(&'a str, &'a str)],
    pub rows: &'a [(&'a str, &'a str)],
}

pub const PEEL_PARAMS: &[(&str, &str)] = &[
    ("AverageLoad", "0.91"),
    ("AvgNPeaks", "2.23"),
    ("PeakLoad", "2.58"),
    ("PeelEnd", "402"),
    ("PeelStart", "38"),
];

pub const PEEL_ROWS: &[(&str, &str)] = &[
    ("0", "0"),
    ("0.08", "0.124"),
    ("0.8", "0.189"),
    ("0.4", "0.264"),
    ("0.2", "0.352"),
];

/// Render an export with the given analysis name and samples
pub fn export_content(analysis_name: &str, samples: &[SampleSpec]) -> String {
    let mut lines = vec![
        "_FileType,Curve Export,".to_string(),
        "_Version,2.1,".to_string(),
        format!("_AnalysisName, \"{}\",", analysis_name),
        "_Operator,JDL,".to_string(),
        format!("_SampleCount,{},", samples.len()),
        "BeginFile,,".to_string(),
    ];

    for (i, sample) in samples.iter().enumerate() {
        lines.push(format!("BeginSample,{},", i + 1));
        for (name, value) in sample.params {
            lines.push(format!("{},{},", name, value));
        }
        lines.push("BeginData,,".to_string());
        lines.push("_Load,SlackExt,".to_string());
        lines.push("lbf,in,".to_string());
        for (load, ext) in sample.rows {
            lines.push(format!("{},{},", load, ext));
        }
        lines.push("EndData,,".to_string());
        lines.push("EndSample,,".to_string());
    }

    lines.push("EndFile,,".to_string());
    lines.join("\n") + "\n"
}

/// Two peel samples with 5 and 3 curve rows
pub fn two_sample_export(analysis_name: &str) -> String {
    let sample = SampleSpec {
        params: PEEL_PARAMS,
        rows: PEEL_ROWS,
    };
    export_content(
        analysis_name,
        &[
            sample,
            SampleSpec {
                params: PEEL_PARAMS,
                rows: &PEEL_ROWS[..3],
            },
        ],
    )
}

pub fn write_export(dir: &Path, file_name: &str, content: &str) -> PathBuf {
    fs::create_dir_all(dir).unwrap();
    let path = dir.join(file_name);
    fs::write(&path, content).unwrap();
    path
}
