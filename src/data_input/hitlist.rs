// src/data_input/hitlist.rs

use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::{ANALYZED_SUFFIX, FORBIDDEN_SHEET_CHARS, MAX_SHEET_NAME_LEN};
use crate::error::{AnalyzerError, Result};

/// Reads a one-entry-per-line list. Line endings and surrounding whitespace
/// are stripped and blank lines skipped.
pub fn read_list(path: &Path) -> Result<Vec<String>> {
    let text = fs::read_to_string(path).map_err(|e| {
        AnalyzerError::Configuration(format!("cannot read list '{}': {e}", path.display()))
    })?;
    Ok(parse_list(&text))
}

pub fn parse_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Input file for a hitlist entry: `.csv` is appended when the entry has no
/// extension, and relative entries are resolved against `subdirectory`.
pub fn resolve_entry(entry: &str, subdirectory: Option<&Path>) -> PathBuf {
    let mut path = PathBuf::from(entry);
    if path.extension().is_none() {
        path.set_extension("csv");
    }
    match subdirectory {
        Some(dir) if path.is_relative() => dir.join(path),
        _ => path,
    }
}

/// `<input without extension>___analyzed.xlsx`, beside the input.
pub fn analyzed_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    input.with_file_name(format!("{stem}{ANALYZED_SUFFIX}"))
}

/// Sheet name derived from an input path: the file stem without characters a
/// sheet name cannot hold, cut to the maximum length.
pub fn derive_sheet_name(input: &Path) -> String {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let cleaned: String = stem
        .chars()
        .filter(|c| !FORBIDDEN_SHEET_CHARS.contains(c))
        .collect();
    let cleaned = cleaned.trim_matches('\'').trim();
    cleaned.chars().take(MAX_SHEET_NAME_LEN).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list() {
        let list = parse_list("run_01\r\n  run_02  \n\nrun_03");
        assert_eq!(list, vec!["run_01", "run_02", "run_03"]);
        assert!(parse_list("\n\n").is_empty());
    }

    #[test]
    fn test_resolve_entry() {
        assert_eq!(resolve_entry("run_01", None), PathBuf::from("run_01.csv"));
        assert_eq!(resolve_entry("run_01.txt", None), PathBuf::from("run_01.txt"));
        assert_eq!(
            resolve_entry("run_01", Some(Path::new("data"))),
            PathBuf::from("data/run_01.csv")
        );
    }

    #[test]
    fn test_analyzed_output_path() {
        assert_eq!(
            analyzed_output_path(Path::new("data/run_01.csv")),
            PathBuf::from("data/run_01___analyzed.xlsx")
        );
    }

    #[test]
    fn test_derive_sheet_name() {
        assert_eq!(derive_sheet_name(Path::new("data/run:01?.csv")), "run01");
        let long = format!("{}.csv", "x".repeat(40));
        assert_eq!(derive_sheet_name(Path::new(&long)).len(), 31);
    }
}

// src/data_input/hitlist.rs
