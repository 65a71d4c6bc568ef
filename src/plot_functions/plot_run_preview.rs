// src/plot_functions/plot_run_preview.rs

use std::path::{Path, PathBuf};

use ndarray::Array1;
use plotters::style::RGBColor;

use crate::constants::{
    COLOR_AVERAGED_FORCE, COLOR_CALIBRATED_WINDSPEED, COLOR_DRAG_AREA, COLOR_RAW_FORCE,
    COLOR_RAW_WINDSPEED, COLOR_TARGET_FORCE, LINE_WIDTH_PLOT,
};
use crate::data_analysis::numeric_eval::RunSeries;
use crate::error::{AnalyzerError, Result};
use crate::plot_framework::{calculate_range, draw_stacked_plot, finite_y_bounds, PlotConfig, PlotSeries};

fn to_series(time: &Array1<f64>, values: &Array1<f64>, label: &str, color: RGBColor) -> PlotSeries {
    PlotSeries {
        data: time.iter().copied().zip(values.iter().copied()).collect(),
        label: label.to_string(),
        color,
        stroke_width: LINE_WIDTH_PLOT,
    }
}

fn panel(title: &str, y_label: &str, x_max: f64, series: Vec<PlotSeries>) -> Option<PlotConfig> {
    let (y_min, y_max) = finite_y_bounds(&series)?;
    let (y_lo, y_hi) = calculate_range(y_min, y_max);
    Some(PlotConfig {
        title: title.to_string(),
        x_range: 0.0..x_max.max(1.0),
        y_range: y_lo..y_hi,
        series,
        x_label: "Time (ms)".to_string(),
        y_label: y_label.to_string(),
    })
}

/// `<dir>/<identifier>_preview.svg`
pub fn preview_path(dir: &Path, identifier: &str) -> PathBuf {
    dir.join(format!("{identifier}_preview.svg"))
}

/// Renders the run chart as an SVG: windspeed and force traces on top, drag
/// area below, both against time.
pub fn plot_run_preview(series: &RunSeries, identifier: &str, output_path: &Path) -> Result<()> {
    let t = &series.time_ms;
    let x_max = t.iter().copied().fold(0.0, f64::max);

    let traces = vec![
        to_series(t, &series.windspeed_raw, "Raw Windspeed", COLOR_RAW_WINDSPEED),
        to_series(t, &series.force_raw, "Raw Force", COLOR_RAW_FORCE),
        to_series(t, &series.windspeed_calibrated, "Calibrated Windspeed", COLOR_CALIBRATED_WINDSPEED),
        to_series(t, &series.force_averaged, "Averaged Force", COLOR_AVERAGED_FORCE),
        to_series(t, &series.target_force, "Target Force", COLOR_TARGET_FORCE),
    ];
    let drag = vec![to_series(t, &series.drag_area, "Drag Area", COLOR_DRAG_AREA)];

    let panels = vec![
        (
            "Windspeed / Force".to_string(),
            panel("Windspeed and Force", "m/s | lbf", x_max, traces),
        ),
        (
            "Drag Area".to_string(),
            panel("Drag Area [CdSo]", "ft^2", x_max, drag),
        ),
    ];

    draw_stacked_plot(output_path, identifier, panels)
        .map_err(|e| AnalyzerError::Plot(format!("{}: {e}", output_path.display())))
}


// src/plot_functions/plot_run_preview.rs
