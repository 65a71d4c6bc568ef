// src/data_input/row_source.rs

use csv::{Reader, ReaderBuilder, StringRecord};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::data_input::raw_sample::RawSample;
use crate::error::{AnalyzerError, Result};

/// Ordered samples of one delimited-text log. The header line is skipped;
/// reopening the path restarts the sequence.
pub struct CsvRowSource<R: Read> {
    reader: Reader<R>,
    path: PathBuf,
    record: StringRecord,
}

impl CsvRowSource<BufReader<File>> {
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|source| AnalyzerError::InputOpen {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Reading samples from {}", path.display());
        Ok(Self::from_reader(BufReader::new(file), path))
    }
}

impl<R: Read> CsvRowSource<R> {
    /// `path` is only used to label errors.
    pub fn from_reader(input: R, path: &Path) -> Self {
        let reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(input);
        Self {
            reader,
            path: path.to_path_buf(),
            record: StringRecord::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<R: Read> Iterator for CsvRowSource<R> {
    type Item = Result<RawSample>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.reader.read_record(&mut self.record) {
            Ok(true) => Some(RawSample::from_record(&self.record, &self.path)),
            Ok(false) => None,
            Err(source) => Some(Err(AnalyzerError::Csv {
                path: self.path.clone(),
                source,
            })),
        }
    }
}

/// Reads every sample of `path`, failing on the first malformed row.
pub fn read_samples(path: &Path) -> Result<Vec<RawSample>> {
    CsvRowSource::open(path)?.collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_is_skipped() {
        let data = "time,wind,force\n0.0,5.0,2.0\n0.1,5.5,2.1\n";
        let samples: Vec<RawSample> = CsvRowSource::from_reader(data.as_bytes(), Path::new("a.csv"))
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[1].windspeed_raw, 5.5);
        assert_eq!(samples[1].line, 3);
    }

    #[test]
    fn test_header_only_is_empty() {
        let data = "time,wind,force\n";
        let mut source = CsvRowSource::from_reader(data.as_bytes(), Path::new("a.csv"));
        assert!(source.next().is_none());
    }

    #[test]
    fn test_ragged_rows_are_tolerated() {
        let data = "time,wind,force\n0.0,5.0,2.0,extra\n0.1,5.5,2.1\n";
        let samples: Result<Vec<RawSample>> =
            CsvRowSource::from_reader(data.as_bytes(), Path::new("a.csv")).collect();
        assert_eq!(samples.unwrap().len(), 2);
    }

    #[test]
    fn test_bad_row_reports_line() {
        let data = "time,wind,force\n0.0,5.0,2.0\n0.1,n/a,2.1\n";
        let err = CsvRowSource::from_reader(data.as_bytes(), Path::new("a.csv"))
            .collect::<Result<Vec<_>>>()
            .unwrap_err();
        assert!(matches!(err, AnalyzerError::InputFormat { line: 3, .. }));
    }

    #[test]
    fn test_csv_errors_name_the_file() {
        let data: &[u8] = b"time,wind,force\n0.0,5.0,2.0\n0.1,\xff\xfe,2.1\n";
        let err = CsvRowSource::from_reader(data, Path::new("logs/run_07.csv"))
            .collect::<Result<Vec<_>>>()
            .unwrap_err();
        match &err {
            AnalyzerError::Csv { path, .. } => assert_eq!(path, Path::new("logs/run_07.csv")),
            other => panic!("expected a CSV error, got {other:?}"),
        }
        assert!(err.to_string().starts_with("logs/run_07.csv: CSV error"));
    }

    #[test]
    fn test_missing_file_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.csv");
        match CsvRowSource::open(&missing) {
            Err(AnalyzerError::InputOpen { path, .. }) => assert_eq!(path, missing),
            Err(other) => panic!("expected an open error, got {other:?}"),
            Ok(_) => panic!("opened a missing file"),
        }
    }
}

// src/data_input/row_source.rs
