// src/data_input/raw_sample.rs

use std::path::Path;

use csv::StringRecord;

use crate::error::{AnalyzerError, Result};

/// One logged sample: `time (s), windspeed (m/s), force (lbf)`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RawSample {
    pub time_s: f64,
    pub windspeed_raw: f64,
    pub force_raw: f64,
    /// 1-based line in the source file, 0 when the sample was built in memory.
    pub line: u64,
}

const FIELD_NAMES: [&str; 3] = ["time", "windspeed", "force"];

impl RawSample {
    pub fn new(time_s: f64, windspeed_raw: f64, force_raw: f64) -> Self {
        Self {
            time_s,
            windspeed_raw,
            force_raw,
            line: 0,
        }
    }

    /// Parses the first three fields of a record. Extra trailing fields are ignored.
    pub fn from_record(record: &StringRecord, path: &Path) -> Result<Self> {
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let mut values = [0.0f64; 3];
        for (i, &field) in FIELD_NAMES.iter().enumerate() {
            let text = record.get(i).unwrap_or("").trim();
            values[i] = text.parse::<f64>().map_err(|_| AnalyzerError::InputFormat {
                path: path.to_path_buf(),
                line,
                field,
                value: text.to_string(),
            })?;
        }
        Ok(Self {
            time_s: values[0],
            windspeed_raw: values[1],
            force_raw: values[2],
            line,
        })
    }

    /// Sample time in whole milliseconds, truncated toward zero.
    pub fn time_ms(&self) -> i64 {
        (self.time_s * 1000.0).trunc() as i64
    }
}


// src/data_input/raw_sample.rs
