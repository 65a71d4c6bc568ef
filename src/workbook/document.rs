// src/workbook/document.rs

use std::collections::BTreeMap;
use std::path::Path;

use crate::constants::{FORBIDDEN_SHEET_CHARS, MAX_SHEET_NAME_LEN};
use crate::error::{AnalyzerError, Result};
use crate::layout::column_letter;
use crate::workbook::{Cell, CellLocation, CellValue, ChartSpec, OutputSink};

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedChart {
    pub row: u32,
    pub col: u16,
    pub chart: ChartSpec,
}

#[derive(Debug, Clone, Default)]
pub struct Sheet {
    name: String,
    cells: BTreeMap<(u32, u16), Cell>,
    column_widths: BTreeMap<u16, f64>,
    zoom: Option<u16>,
    charts: Vec<PlacedChart>,
}

impl Sheet {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cells(&self) -> impl Iterator<Item = (&(u32, u16), &Cell)> {
        self.cells.iter()
    }

    pub fn column_width(&self, col: u16) -> Option<f64> {
        self.column_widths.get(&col).copied()
    }

    pub fn column_widths(&self) -> impl Iterator<Item = (&u16, &f64)> {
        self.column_widths.iter()
    }

    pub fn zoom(&self) -> Option<u16> {
        self.zoom
    }

    pub fn charts(&self) -> &[PlacedChart] {
        &self.charts
    }

    pub fn max_row(&self) -> u32 {
        self.cells.keys().map(|(row, _)| *row).max().unwrap_or(1)
    }

    pub fn max_col(&self) -> u16 {
        self.cells.keys().map(|(_, col)| *col).max().unwrap_or(1)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinedName {
    pub name: String,
    pub reference: String,
}

/// In-memory workbook. Everything is kept until `save` renders it to `.xlsx`.
#[derive(Debug, Clone, Default)]
pub struct Document {
    sheets: Vec<Sheet>,
    defined_names: Vec<DefinedName>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    pub fn sheets(&self) -> &[Sheet] {
        &self.sheets
    }

    pub fn defined_names(&self) -> &[DefinedName] {
        &self.defined_names
    }

    fn sheet_mut(&mut self, name: &str) -> Result<&mut Sheet> {
        self.sheets
            .iter_mut()
            .find(|s| s.name == name)
            .ok_or_else(|| AnalyzerError::Sheet(format!("no sheet named '{name}'")))
    }
}

/// Checks a region name against the spreadsheet naming rules.
pub fn validate_sheet_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(AnalyzerError::Sheet("sheet name is empty".to_string()));
    }
    if name.chars().count() > MAX_SHEET_NAME_LEN {
        return Err(AnalyzerError::Sheet(format!(
            "sheet name '{name}' is longer than {MAX_SHEET_NAME_LEN} characters"
        )));
    }
    if let Some(bad) = name.chars().find(|c| FORBIDDEN_SHEET_CHARS.contains(c)) {
        return Err(AnalyzerError::Sheet(format!(
            "sheet name '{name}' contains forbidden character '{bad}'"
        )));
    }
    if name.starts_with('\'') || name.ends_with('\'') {
        return Err(AnalyzerError::Sheet(format!(
            "sheet name '{name}' cannot start or end with an apostrophe"
        )));
    }
    Ok(())
}

impl OutputSink for Document {
    fn add_sheet(&mut self, name: &str) -> Result<()> {
        validate_sheet_name(name)?;
        let lower = name.to_lowercase();
        if self.sheets.iter().any(|s| s.name.to_lowercase() == lower) {
            return Err(AnalyzerError::Sheet(format!("duplicate sheet name '{name}'")));
        }
        self.sheets.push(Sheet::new(name));
        Ok(())
    }

    fn has_sheet(&self, name: &str) -> bool {
        self.sheet(name).is_some()
    }

    fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|s| s.name.clone()).collect()
    }

    fn write_cell(
        &mut self,
        sheet: &str,
        row: u32,
        col: u16,
        value: CellValue,
        number_format: Option<&'static str>,
    ) -> Result<()> {
        if row == 0 || col == 0 {
            return Err(AnalyzerError::Sheet(format!(
                "cell ({row}, {col}) is outside the 1-based grid"
            )));
        }
        let target = self.sheet_mut(sheet)?;
        let wrap = target
            .cells
            .get(&(row, col))
            .map(|c| c.wrap)
            .unwrap_or(false);
        target.cells.insert(
            (row, col),
            Cell {
                value,
                number_format,
                wrap,
            },
        );
        Ok(())
    }

    fn cell(&self, sheet: &str, row: u32, col: u16) -> Option<&Cell> {
        self.sheet(sheet).and_then(|s| s.cells.get(&(row, col)))
    }

    fn define_name(&mut self, name: &str, location: &CellLocation) -> Result<()> {
        if !self.has_sheet(&location.sheet) {
            return Err(AnalyzerError::Sheet(format!(
                "defined name '{name}' points at missing sheet '{}'",
                location.sheet
            )));
        }
        if self.defined_names.iter().any(|d| d.name.eq_ignore_ascii_case(name)) {
            return Err(AnalyzerError::DuplicateConstant(name.to_string()));
        }
        self.defined_names.push(DefinedName {
            name: name.to_string(),
            reference: location.global_reference(),
        });
        Ok(())
    }

    fn set_wrap(&mut self, sheet: &str, row: u32, col: u16) -> Result<()> {
        let target = self.sheet_mut(sheet)?;
        if let Some(cell) = target.cells.get_mut(&(row, col)) {
            cell.wrap = true;
        }
        Ok(())
    }

    fn set_column_width(&mut self, sheet: &str, col: u16, width: f64) -> Result<()> {
        self.sheet_mut(sheet)?.column_widths.insert(col, width);
        Ok(())
    }

    fn set_zoom(&mut self, sheet: &str, zoom: u16) -> Result<()> {
        self.sheet_mut(sheet)?.zoom = Some(zoom.clamp(10, 400));
        Ok(())
    }

    fn insert_chart(&mut self, sheet: &str, row: u32, col: u16, chart: ChartSpec) -> Result<()> {
        for series in chart.primary.iter().chain(chart.secondary.iter()) {
            if !self.has_sheet(&series.sheet) {
                return Err(AnalyzerError::Sheet(format!(
                    "chart series '{}' reads from missing sheet '{}'",
                    series.name, series.sheet
                )));
            }
        }
        self.sheet_mut(sheet)?.charts.push(PlacedChart { row, col, chart });
        Ok(())
    }

    fn extent(&self, sheet: &str) -> Result<String> {
        let target = self
            .sheet(sheet)
            .ok_or_else(|| AnalyzerError::Sheet(format!("no sheet named '{sheet}'")))?;
        let min_row = target.cells.keys().map(|(r, _)| *r).min().unwrap_or(1);
        let min_col = target.cells.keys().map(|(_, c)| *c).min().unwrap_or(1);
        Ok(format!(
            "{}{}:{}{}",
            column_letter(min_col),
            min_row,
            column_letter(target.max_col()),
            target.max_row()
        ))
    }

    fn save(&self, path: &Path) -> Result<()> {
        crate::workbook::xlsx::write_xlsx(self, path)
    }
}


// src/workbook/document.rs
