// src/workbook/xlsx.rs

use std::collections::HashMap;
use std::path::Path;

use rust_xlsxwriter::{Chart, ChartType, Format, Formula, Workbook};
use tracing::debug;

use crate::error::Result;
use crate::workbook::document::Document;
use crate::workbook::{CellValue, ChartSpec, SeriesSpec};

/// Renders the document to an `.xlsx` file. Rows and columns are converted
/// from the document's 1-based grid to the writer's 0-based one.
pub fn write_xlsx(doc: &Document, path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let mut formats: HashMap<(Option<&'static str>, bool), Format> = HashMap::new();

    for sheet in doc.sheets() {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(sheet.name())?;

        for (&(row, col), cell) in sheet.cells() {
            let (row, col) = (row - 1, col - 1);
            let format = if cell.number_format.is_some() || cell.wrap {
                Some(
                    formats
                        .entry((cell.number_format, cell.wrap))
                        .or_insert_with(|| {
                            let mut format = Format::new();
                            if let Some(num_format) = cell.number_format {
                                format = format.set_num_format(num_format);
                            }
                            if cell.wrap {
                                format = format.set_text_wrap();
                            }
                            format
                        })
                        .clone(),
                )
            } else {
                None
            };

            match (&cell.value, format) {
                (CellValue::Number(n), Some(f)) => {
                    worksheet.write_number_with_format(row, col, *n, &f)?;
                }
                (CellValue::Number(n), None) => {
                    worksheet.write_number(row, col, *n)?;
                }
                (CellValue::Text(t), Some(f)) => {
                    worksheet.write_string_with_format(row, col, t.as_str(), &f)?;
                }
                (CellValue::Text(t), None) => {
                    worksheet.write_string(row, col, t.as_str())?;
                }
                (CellValue::Formula(text), Some(f)) => {
                    worksheet.write_formula_with_format(row, col, Formula::new(text.as_str()), &f)?;
                }
                (CellValue::Formula(text), None) => {
                    worksheet.write_formula(row, col, Formula::new(text.as_str()))?;
                }
            }
        }

        for (&col, &width) in sheet.column_widths() {
            worksheet.set_column_width(col - 1, width)?;
        }

        if let Some(zoom) = sheet.zoom() {
            worksheet.set_zoom(zoom);
        }

        for placed in sheet.charts() {
            let chart = build_chart(&placed.chart);
            worksheet.insert_chart(placed.row - 1, placed.col - 1, &chart)?;
        }
    }

    for name in doc.defined_names() {
        workbook.define_name(name.name.as_str(), &format!("={}", name.reference))?;
    }

    workbook.save(path)?;
    debug!(
        "Wrote {} sheet(s), {} defined name(s) to {}",
        doc.sheets().len(),
        doc.defined_names().len(),
        path.display()
    );
    Ok(())
}

fn add_series(chart: &mut Chart, series: &SeriesSpec, secondary: bool) {
    let (first, last) = (series.first_row - 1, series.last_row - 1);
    let (x, y) = (series.x_col - 1, series.y_col - 1);
    chart
        .add_series()
        .set_name(series.name.as_str())
        .set_categories((series.sheet.as_str(), first, x, last, x))
        .set_values((series.sheet.as_str(), first, y, last, y))
        .set_secondary_axis(secondary);
}

fn build_chart(spec: &ChartSpec) -> Chart {
    let mut chart = Chart::new(ChartType::ScatterStraight);
    for series in &spec.primary {
        add_series(&mut chart, series, false);
    }

    if !spec.secondary.is_empty() {
        let mut overlay = Chart::new(ChartType::ScatterStraight);
        for series in &spec.secondary {
            add_series(&mut overlay, series, true);
        }
        overlay.y2_axis().set_name(spec.y2_title.as_str());
        chart.combine(&overlay);
    }

    chart
        .x_axis()
        .set_name(spec.x_title.as_str())
        .set_min(spec.x_min)
        .set_max(spec.x_max);
    chart.y_axis().set_name(spec.y_title.as_str());
    chart.set_width(spec.width_px).set_height(spec.height_px);
    chart
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::run_chart;
    use crate::layout::RowExtent;
    use crate::workbook::{CellLocation, OutputSink};

    #[test]
    fn test_write_xlsx_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xlsx");

        let mut doc = Document::new();
        doc.add_sheet("Constants").unwrap();
        doc.write_cell("Constants", 1, 2, CellValue::Number(0.725), None)
            .unwrap();
        doc.define_name("ANEMOMETER_FACTOR", &CellLocation::new("Constants", 1, 2))
            .unwrap();
        doc.add_sheet("Run").unwrap();
        doc.write_cell("Run", 1, 1, CellValue::Text("Time (ms)".into()), None)
            .unwrap();
        doc.write_cell("Run", 2, 2, CellValue::Number(5.0), Some("0.000"))
            .unwrap();
        doc.write_cell("Run", 2, 4, CellValue::Formula("=B2/ANEMOMETER_FACTOR".into()), Some("0.000"))
            .unwrap();
        doc.set_zoom("Run", 55).unwrap();
        doc.insert_chart("Run", 2, 13, run_chart("Run", RowExtent::from_last_row(2), 100.0))
            .unwrap();

        doc.save(&path).unwrap();
        let meta = std::fs::metadata(&path).unwrap();
        assert!(meta.len() > 0);
    }
}

// src/workbook/xlsx.rs
