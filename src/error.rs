// src/error.rs

use std::path::PathBuf;

use thiserror::Error;

/// Every failure the analysis pipeline can report.
///
/// Zero windspeed in the drag-area derivation is not an error: it is handled
/// inside the generated formula (blank result) and never reaches this type.
#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("Configuration: {0}")]
    Configuration(String),

    #[error("{path}:{line}: field '{field}' is not numeric: {value:?}")]
    InputFormat {
        path: PathBuf,
        line: u64,
        field: &'static str,
        value: String,
    },

    #[error("Constant name defined twice: {0}")]
    DuplicateConstant(String),

    #[error("Constant not defined: {0}")]
    UnknownConstant(String),

    #[error("Sheet: {0}")]
    Sheet(String),

    #[error("{}: CSV error: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{}: cannot open input: {source}", path.display())]
    InputOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Output error: {0}")]
    Output(#[from] rust_xlsxwriter::XlsxError),

    #[error("Invalid config file: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    #[error("Plot error: {0}")]
    Plot(String),
}

pub type Result<T> = std::result::Result<T, AnalyzerError>;

// src/error.rs
