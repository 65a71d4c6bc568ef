// src/data_analysis/meta_analysis.rs

use tracing::{debug, warn};

use crate::constants::{
    FIRST_DATA_ROW, META_SHEET, NUMBER_FORMAT_3DP, RESERVED_SHEET_NAMES,
};
use crate::data_analysis::constants_model::{names, NameRegistry};
use crate::error::{AnalyzerError, Result};
use crate::layout::{quote_sheet_name, Column, RowExtent};
use crate::workbook::{parse_last_row, space_columns, CellValue, OutputSink};

/// One cross-run summary line.
#[derive(Debug, Clone, PartialEq)]
pub struct MetaRow {
    pub run: String,
    pub usable_rows: u32,
    pub formula: String,
}

/// Gated AVERAGEIFS over the drag-area column of `sheet`, rows 2..=`last_row`.
///
/// Column letters come from the shared layout; thresholds are referenced by name.
pub fn averageifs_formula(
    sheet: &str,
    last_row: u32,
    windspeed_threshold: &str,
    force_threshold: &str,
) -> String {
    let sheet = quote_sheet_name(sheet);
    let range = |column: Column| format!("{sheet}!{}", column.range(FIRST_DATA_ROW, last_row));
    format!(
        "=AVERAGEIFS({},{}, \">=\"&{windspeed_threshold}, {}, \">=\"&{force_threshold})",
        range(Column::DragArea),
        range(Column::AnemometerAveraged),
        range(Column::LoadCellAveraged),
    )
}

/// True unless `name` is one of the reserved regions (case-insensitive).
pub fn is_run_sheet(name: &str) -> bool {
    !RESERVED_SHEET_NAMES.contains(&name.to_lowercase().as_str())
}

/// Builds the meta-analysis over every run region already in the sink.
pub struct MetaAggregator {
    windspeed_threshold: String,
    force_threshold: String,
    /// Chart-only regions created by the split layout.
    chart_regions: Vec<String>,
}

impl MetaAggregator {
    pub fn new(registry: &NameRegistry) -> Result<Self> {
        Ok(Self {
            windspeed_threshold: registry.name(names::WINDSPEED_THRESHOLD)?.to_string(),
            force_threshold: registry.name(names::FORCE_THRESHOLD)?.to_string(),
            chart_regions: Vec::new(),
        })
    }

    /// Regions that hold only a run's chart; they are skipped like reserved ones.
    pub fn with_chart_regions<I>(mut self, regions: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        self.chart_regions.extend(regions);
        self
    }

    fn is_chart_region(&self, name: &str) -> bool {
        self.chart_regions.iter().any(|r| r.eq_ignore_ascii_case(name))
    }

    /// One row per run region, in region order. Regions with no data rows are skipped.
    pub fn collect<S: OutputSink + ?Sized>(&self, sink: &S) -> Result<Vec<MetaRow>> {
        let mut rows = Vec::new();
        for sheet in sink.sheet_names() {
            if !is_run_sheet(&sheet) || self.is_chart_region(&sheet) {
                debug!("Meta-analysis skips non-run region '{}'", sheet);
                continue;
            }
            let descriptor = sink.extent(&sheet)?;
            let last_row = parse_last_row(&descriptor).ok_or_else(|| {
                AnalyzerError::Sheet(format!(
                    "cannot read the last row of '{sheet}' from extent '{descriptor}'"
                ))
            })?;
            let extent = RowExtent::from_last_row(last_row);
            if extent.is_empty() {
                warn!("Run '{}' has no samples; left out of the meta-analysis", sheet);
                continue;
            }
            rows.push(MetaRow {
                formula: averageifs_formula(
                    &sheet,
                    extent.last,
                    &self.windspeed_threshold,
                    &self.force_threshold,
                ),
                usable_rows: extent.row_count(),
                run: sheet,
            });
        }
        Ok(rows)
    }

    /// Writes the meta-analysis region: a header row, then one row per run from row 2.
    pub fn build<S: OutputSink + ?Sized>(&self, sink: &mut S) -> Result<Vec<MetaRow>> {
        let rows = self.collect(&*sink)?;
        sink.add_sheet(META_SHEET)?;
        let headers = ["Run", "Usable Rows", "Average Drag Area [CdSo] (ft^2)"];
        for (i, header) in headers.iter().enumerate() {
            sink.write_cell(META_SHEET, 1, i as u16 + 1, CellValue::Text(header.to_string()), None)?;
        }
        for (i, row) in rows.iter().enumerate() {
            let r = FIRST_DATA_ROW + i as u32;
            sink.write_cell(META_SHEET, r, 1, CellValue::Text(row.run.clone()), None)?;
            sink.write_cell(META_SHEET, r, 2, CellValue::Number(row.usable_rows as f64), None)?;
            sink.write_cell(
                META_SHEET,
                r,
                3,
                CellValue::Formula(row.formula.clone()),
                Some(NUMBER_FORMAT_3DP),
            )?;
        }
        space_columns(sink, META_SHEET, 1, None)?;
        debug!("Meta-analysis covers {} run(s)", rows.len());
        Ok(rows)
    }
}


// src/data_analysis/meta_analysis.rs
