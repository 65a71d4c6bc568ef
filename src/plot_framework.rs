// src/plot_framework.rs

use plotters::backend::SVGBackend;
use plotters::chart::{ChartBuilder, SeriesLabelPosition};
use plotters::coord::Shift;
use plotters::drawing::{DrawingArea, IntoDrawingArea};
use plotters::element::{PathElement, Text};
use plotters::series::LineSeries;
use plotters::style::colors::{BLACK, RED, WHITE};
use plotters::style::{Color, IntoFont, RGBColor};

use std::error::Error;
use std::ops::Range;
use std::path::Path;

use tracing::{debug, info};

use crate::types::StackedPanel;
use crate::constants::{
    FONT_SIZE_AXIS_LABEL, FONT_SIZE_CHART_TITLE, FONT_SIZE_LEGEND, FONT_SIZE_MAIN_TITLE,
    FONT_SIZE_MESSAGE, LINE_WIDTH_LEGEND, PLOT_HEIGHT, PLOT_WIDTH,
};

/// Calculate plot range with padding.
/// Adds 15% padding, or a fixed padding for very small ranges.
pub fn calculate_range(min_val: f64, max_val: f64) -> (f64, f64) {
    let (min, max) = if min_val <= max_val {
        (min_val, max_val)
    } else {
        (max_val, min_val)
    };
    let range = (max - min).abs();
    let padding = if range < 1e-6 { 0.5 } else { range * 0.15 };
    (min - padding, max + padding)
}

/// Smallest and largest finite y over every series, `None` when nothing is finite.
pub fn finite_y_bounds(series: &[PlotSeries]) -> Option<(f64, f64)> {
    series
        .iter()
        .flat_map(|s| s.data.iter().map(|&(_, y)| y))
        .filter(|y| y.is_finite())
        .fold(None, |acc, y| match acc {
            None => Some((y, y)),
            Some((lo, hi)) => Some((lo.min(y), hi.max(y))),
        })
}

/// Draw a "Data Unavailable" message on a plot area.
pub fn draw_unavailable_message(
    area: &DrawingArea<SVGBackend, Shift>,
    panel_name: &str,
    reason: &str,
) -> Result<(), Box<dyn Error>> {
    const CHAR_WIDTH_RATIO: f32 = 0.6;

    let (x_range, y_range) = area.get_pixel_range();
    let (width, height) = (x_range.end - x_range.start, y_range.end - y_range.start);
    let message = format!("{panel_name} Data Unavailable: {reason}");

    let estimated_char_width = (FONT_SIZE_MESSAGE as f32 * CHAR_WIDTH_RATIO) as i32;
    let estimated_text_width = message.len() as i32 * estimated_char_width;
    let center_x = width / 2 - estimated_text_width / 2;
    let center_y = height / 2 - FONT_SIZE_MESSAGE / 2;

    let text_style = ("sans-serif", FONT_SIZE_MESSAGE).into_font().color(&RED);
    area.draw(&Text::new(message, (center_x, center_y), text_style))?;
    Ok(())
}

#[derive(Clone)]
pub struct PlotSeries {
    pub data: Vec<(f64, f64)>,
    pub label: String,
    pub color: RGBColor,
    pub stroke_width: u32,
}

#[derive(Clone)]
pub struct PlotConfig {
    pub title: String,
    pub x_range: Range<f64>,
    pub y_range: Range<f64>,
    pub series: Vec<PlotSeries>,
    pub x_label: String,
    pub y_label: String,
}

fn draw_single_chart_with_config(
    area: &DrawingArea<SVGBackend, Shift>,
    plot_config: &PlotConfig,
) -> Result<(), Box<dyn Error>> {
    let mut chart = ChartBuilder::on(area)
        .caption(&plot_config.title, ("sans-serif", FONT_SIZE_CHART_TITLE))
        .margin(5)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(plot_config.x_range.clone(), plot_config.y_range.clone())?;

    chart
        .configure_mesh()
        .x_desc(&plot_config.x_label)
        .y_desc(&plot_config.y_label)
        .x_labels(20)
        .y_labels(10)
        .y_label_formatter(&|y| {
            if y.abs() < 10.0 && y.fract() != 0.0 {
                format!("{:.2}", y)
            } else {
                format!("{:.0}", y)
            }
        })
        .light_line_style(WHITE.mix(0.7))
        .label_style(("sans-serif", FONT_SIZE_AXIS_LABEL))
        .draw()?;

    for s in &plot_config.series {
        // Blank cells (NaN) break the line instead of being drawn.
        let segments = s
            .data
            .split(|(_, y)| !y.is_finite())
            .filter(|segment| !segment.is_empty());
        let mut labelled = false;
        for segment in segments {
            let drawn = chart.draw_series(LineSeries::new(
                segment.iter().copied(),
                s.color.stroke_width(s.stroke_width),
            ))?;
            if !labelled && !s.label.is_empty() {
                let color = s.color;
                drawn.label(&s.label).legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(LINE_WIDTH_LEGEND))
                });
                labelled = true;
            }
        }
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .label_font(("sans-serif", FONT_SIZE_LEGEND))
        .draw()?;

    Ok(())
}

/// Creates a stacked SVG with one panel per entry of `panels`, top to bottom.
/// A `None` panel, or one without drawable data, shows a placeholder message.
pub fn draw_stacked_plot(
    output_path: &Path,
    root_name: &str,
    panels: Vec<StackedPanel>,
) -> Result<(), Box<dyn Error>> {
    let root_area = SVGBackend::new(output_path, (PLOT_WIDTH, PLOT_HEIGHT)).into_drawing_area();
    root_area.fill(&WHITE)?;
    root_area.draw(&Text::new(
        root_name,
        (10, 10),
        ("sans-serif", FONT_SIZE_MAIN_TITLE)
            .into_font()
            .color(&BLACK),
    ))?;
    let margined_root_area = root_area.margin(50, 5, 5, 5);
    let sub_plot_areas = margined_root_area.split_evenly((panels.len().max(1), 1));
    let mut any_panel_plotted = false;

    for ((panel_name, config), area) in panels.into_iter().zip(sub_plot_areas.iter()) {
        match config {
            Some(config) => {
                let has_data = config
                    .series
                    .iter()
                    .any(|s| s.data.iter().any(|(_, y)| y.is_finite()));
                let valid_ranges = config.x_range.end > config.x_range.start
                    && config.y_range.end > config.y_range.start;
                if has_data && valid_ranges {
                    draw_single_chart_with_config(area, &config)?;
                    any_panel_plotted = true;
                } else {
                    let reason = if !has_data {
                        "No data points"
                    } else {
                        "Invalid ranges"
                    };
                    draw_unavailable_message(area, &panel_name, reason)?;
                }
            }
            None => draw_unavailable_message(area, &panel_name, "Nothing to plot")?,
        }
    }

    root_area.present()?;
    if any_panel_plotted {
        info!("  Stacked plot saved as '{}'.", output_path.display());
    } else {
        debug!(
            "  '{}' holds only placeholder messages: no panel had data to plot.",
            output_path.display()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calculate_range_pads() {
        let (lo, hi) = calculate_range(0.0, 10.0);
        assert!((lo + 1.5).abs() < 1e-12);
        assert!((hi - 11.5).abs() < 1e-12);
        assert_eq!(calculate_range(3.0, 3.0), (2.5, 3.5));
        assert_eq!(calculate_range(10.0, 0.0), calculate_range(0.0, 10.0));
    }

    #[test]
    fn test_finite_y_bounds_skips_blanks() {
        let series = vec![PlotSeries {
            data: vec![(0.0, f64::NAN), (1.0, 2.0), (2.0, -1.0)],
            label: "s".into(),
            color: RED,
            stroke_width: 1,
        }];
        assert_eq!(finite_y_bounds(&series), Some((-1.0, 2.0)));
        assert_eq!(finite_y_bounds(&[]), None);
    }
}

// src/plot_framework.rs
