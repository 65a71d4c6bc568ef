// src/lib.rs - Library interface for internal module access

pub mod charts;
pub mod config;
pub mod constants;
pub mod data_analysis;
pub mod data_input;
pub mod error;
pub mod layout;
pub mod orchestrator;
pub mod physical;
pub mod plot_framework;
pub mod plot_functions;
pub mod run_assembler;
pub mod types;
pub mod workbook;

pub use error::{AnalyzerError, Result};

pub fn crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

// src/lib.rs
