// src/charts.rs

use crate::constants::{CHART_HEIGHT_PX, CHART_WIDTH_PX};
use crate::layout::{Column, RowExtent};
use crate::workbook::{ChartSpec, SeriesSpec};

/// Series drawn against the primary value axis, with their legend titles.
pub const PRIMARY_SERIES: [(Column, &str); 5] = [
    (Column::AnemometerRaw, "Raw Windspeed"),
    (Column::LoadCellRaw, "Raw Force"),
    (Column::AnemometerCalibrated, "Calibrated Windspeed"),
    (Column::LoadCellAveraged, "Averaged Force"),
    (Column::TargetForce, "Target Force"),
];

pub const SECONDARY_SERIES: [(Column, &str); 1] = [(Column::DragArea, "Drag Area")];

fn series(sheet: &str, column: Column, title: &str, extent: RowExtent) -> SeriesSpec {
    SeriesSpec {
        name: title.to_string(),
        sheet: sheet.to_string(),
        x_col: Column::Time.position(),
        y_col: column.position(),
        first_row: extent.first,
        last_row: extent.last,
    }
}

/// The run chart: windspeed and force series over time, with drag area on a
/// secondary axis sharing the time axis. The time axis spans `[0, x_max]`.
pub fn run_chart(data_sheet: &str, extent: RowExtent, x_max: f64) -> ChartSpec {
    ChartSpec {
        primary: PRIMARY_SERIES
            .iter()
            .map(|(column, title)| series(data_sheet, *column, title, extent))
            .collect(),
        secondary: SECONDARY_SERIES
            .iter()
            .map(|(column, title)| series(data_sheet, *column, title, extent))
            .collect(),
        x_title: "Time".to_string(),
        y_title: "Windspeed (m/s) / Force (lbf)".to_string(),
        y2_title: "Drag Area Axis".to_string(),
        x_min: 0.0,
        x_max,
        width_px: CHART_WIDTH_PX,
        height_px: CHART_HEIGHT_PX,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_chart_series() {
        let chart = run_chart("run_01", RowExtent { first: 2, last: 4 }, 200.0);
        assert_eq!(chart.primary.len(), 5);
        assert_eq!(chart.secondary.len(), 1);
        assert_eq!(chart.secondary[0].y_col, 10);
        assert!(chart
            .primary
            .iter()
            .chain(chart.secondary.iter())
            .all(|s| s.x_col == 1 && s.first_row == 2 && s.last_row == 4 && s.sheet == "run_01"));
        assert_eq!((chart.x_min, chart.x_max), (0.0, 200.0));
    }
}

// src/charts.rs
