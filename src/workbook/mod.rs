// src/workbook/mod.rs

//! Tabular output sink: named regions, literal/formula cells, document-global
//! names, simple styling, charts, extent introspection and persistence.

pub mod document;
pub mod xlsx;

use std::path::Path;

use crate::constants::HEADER_WIDTH_RATIO;
use crate::error::Result;
use crate::layout::{absolute_cell, quote_sheet_name};

pub use document::Document;

#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Number(f64),
    Text(String),
    Formula(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub value: CellValue,
    pub number_format: Option<&'static str>,
    pub wrap: bool,
}

/// A single cell somewhere in the document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CellLocation {
    pub sheet: String,
    pub row: u32,
    pub col: u16,
}

impl CellLocation {
    pub fn new(sheet: &str, row: u32, col: u16) -> Self {
        Self {
            sheet: sheet.to_string(),
            row,
            col,
        }
    }

    /// Document-wide reference, e.g. `Constants!$B$1`.
    pub fn global_reference(&self) -> String {
        format!(
            "{}!{}",
            quote_sheet_name(&self.sheet),
            absolute_cell(self.row, self.col)
        )
    }
}

/// One plotted series: y column against x column over a row span of one region.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesSpec {
    pub name: String,
    pub sheet: String,
    pub x_col: u16,
    pub y_col: u16,
    pub first_row: u32,
    pub last_row: u32,
}

/// Scatter chart with an optional overlay drawn against a secondary value axis.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub primary: Vec<SeriesSpec>,
    pub secondary: Vec<SeriesSpec>,
    pub x_title: String,
    pub y_title: String,
    pub y2_title: String,
    pub x_min: f64,
    pub x_max: f64,
    pub width_px: u32,
    pub height_px: u32,
}

pub trait OutputSink {
    /// Appends a new named region. Names are unique case-insensitively.
    fn add_sheet(&mut self, name: &str) -> Result<()>;

    fn has_sheet(&self, name: &str) -> bool;

    /// Region names in creation order.
    fn sheet_names(&self) -> Vec<String>;

    /// Writes a cell at a 1-based (row, col).
    fn write_cell(
        &mut self,
        sheet: &str,
        row: u32,
        col: u16,
        value: CellValue,
        number_format: Option<&'static str>,
    ) -> Result<()>;

    fn cell(&self, sheet: &str, row: u32, col: u16) -> Option<&Cell>;

    /// Registers a document-global name resolving to `location`.
    fn define_name(&mut self, name: &str, location: &CellLocation) -> Result<()>;

    fn set_wrap(&mut self, sheet: &str, row: u32, col: u16) -> Result<()>;

    fn set_column_width(&mut self, sheet: &str, col: u16, width: f64) -> Result<()>;

    fn set_zoom(&mut self, sheet: &str, zoom: u16) -> Result<()>;

    fn insert_chart(&mut self, sheet: &str, row: u32, col: u16, chart: ChartSpec) -> Result<()>;

    /// Populated extent as an A1 range, e.g. `A1:K15000`.
    fn extent(&self, sheet: &str) -> Result<String>;

    fn save(&self, path: &Path) -> Result<()>;
}

/// Last row of an extent descriptor such as `A1:K15000` (the trailing number).
pub fn parse_last_row(descriptor: &str) -> Option<u32> {
    let digits: String = descriptor
        .chars()
        .rev()
        .take_while(|c| c.is_ascii_digit())
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    digits.parse().ok()
}

/// Wraps header text and sizes columns to their longest text.
///
/// `depth` is how many rows from the top are scanned per column. With
/// `cols == None` columns are scanned left to right until the first empty header.
pub fn space_columns<S: OutputSink + ?Sized>(
    sink: &mut S,
    sheet: &str,
    depth: u32,
    cols: Option<u16>,
) -> Result<()> {
    let mut col = 1u16;
    loop {
        match cols {
            Some(limit) if col > limit => break,
            None if sink.cell(sheet, 1, col).is_none() => break,
            _ => {}
        }

        let mut max_width = 0usize;
        for row in 1..=depth {
            let text_len = match sink.cell(sheet, row, col) {
                Some(Cell {
                    value: CellValue::Text(text),
                    ..
                }) => Some(text.chars().count()),
                _ => None,
            };
            if let Some(len) = text_len {
                sink.set_wrap(sheet, row, col)?;
                max_width = max_width.max(len);
            }
        }

        let width = (HEADER_WIDTH_RATIO * max_width as f64).floor();
        sink.set_column_width(sheet, col, width)?;
        if sink.cell(sheet, 1, col).is_some() {
            sink.set_wrap(sheet, 1, col)?;
        }
        col += 1;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_last_row() {
        assert_eq!(parse_last_row("A1:K15000"), Some(15000));
        assert_eq!(parse_last_row("A1:A1"), Some(1));
        assert_eq!(parse_last_row("A1:K"), None);
        assert_eq!(parse_last_row(""), None);
    }

    #[test]
    fn test_global_reference() {
        let loc = CellLocation::new("Constants", 7, 3);
        assert_eq!(loc.global_reference(), "Constants!$C$7");
        let spaced = CellLocation::new("My Consts", 1, 2);
        assert_eq!(spaced.global_reference(), "'My Consts'!$B$1");
    }

    #[test]
    fn test_space_columns_until_empty_header() {
        let mut doc = Document::new();
        doc.add_sheet("S").unwrap();
        doc.write_cell("S", 1, 1, CellValue::Text("Time (ms)".into()), None)
            .unwrap();
        doc.write_cell("S", 1, 2, CellValue::Text("Anemometer Raw (m/s)".into()), None)
            .unwrap();
        space_columns(&mut doc, "S", 1, None).unwrap();

        let sheet = doc.sheet("S").unwrap();
        assert_eq!(sheet.column_width(1), Some(6.0));
        assert_eq!(sheet.column_width(2), Some(15.0));
        assert_eq!(sheet.column_width(3), None);
        assert!(doc.cell("S", 1, 2).unwrap().wrap);
    }

    #[test]
    fn test_space_columns_with_depth() {
        let mut doc = Document::new();
        doc.add_sheet("C").unwrap();
        doc.write_cell("C", 1, 1, CellValue::Text("short".into()), None)
            .unwrap();
        doc.write_cell("C", 3, 1, CellValue::Text("a much longer title".into()), None)
            .unwrap();
        doc.write_cell("C", 3, 2, CellValue::Number(1.0), None).unwrap();
        space_columns(&mut doc, "C", 10, Some(1)).unwrap();

        let sheet = doc.sheet("C").unwrap();
        assert_eq!(sheet.column_width(1), Some(14.0));
        assert_eq!(sheet.column_width(2), None);
        assert!(doc.cell("C", 3, 1).unwrap().wrap);
    }
}

// src/workbook/mod.rs
