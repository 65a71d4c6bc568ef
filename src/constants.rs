// src/constants.rs

use plotters::style::RGBColor;

// --- Unit conversions ---
pub const METERS_PER_FOOT: f64 = 0.3048;
pub const SLUG_FT3_PER_KG_M3: f64 = 0.00194032;
pub const KG_PER_LB: f64 = 0.453;

// --- Physical defaults (primary values of the constants table) ---
pub const DEFAULT_NOM_DIAM_M: f64 = 4.965;
pub const DEFAULT_AIR_DENSITY_KG_M3: f64 = 1.225;
pub const DEFAULT_AIR_DENSITY_TARGET_KG_M3: f64 = 1.04045;
pub const DEFAULT_DESCENT_RATE_FT_S: f64 = 112.0;
pub const DEFAULT_ROCKET_MASS_LB: f64 = 100.0;
pub const DEFAULT_ANEMOMETER_FACTOR: f64 = 0.725;
pub const DEFAULT_LOAD_CELL_FACTOR: f64 = 1.0;
pub const DEFAULT_WINDSPEED_THRESHOLD: f64 = 10.0; // ft/s
pub const DEFAULT_FORCE_THRESHOLD: f64 = 10.0; // lbf

// --- Row layout ---
pub const HEADER_ROW: u32 = 1;
pub const FIRST_DATA_ROW: u32 = 2;

// Rolling-average radii, in rows either side of the current row.
pub const FORCE_AVERAGE_WINDOW: u32 = 3;
pub const WINDSPEED_AVERAGE_WINDOW: u32 = 0;

// Display precision for every computed column (storage keeps full precision).
pub const NUMBER_FORMAT_3DP: &str = "0.000";

// --- Region names ---
pub const CONSTANTS_SHEET: &str = "Constants";
pub const README_SHEET: &str = "README";
pub const META_SHEET: &str = "META-ANALYSIS";
pub const DATA_SHEET: &str = "Data";
pub const GRAPHS_SHEET: &str = "Graphs";

/// Regions never treated as runs by the meta-analysis (compared case-insensitively).
pub const RESERVED_SHEET_NAMES: [&str; 5] = ["constants", "readme", "graphs", "sheet", "meta-analysis"];

pub const MAX_SHEET_NAME_LEN: usize = 31;
pub const FORBIDDEN_SHEET_CHARS: [char; 7] = ['[', ']', ':', '*', '?', '/', '\\'];

// --- Workbook cosmetics ---
pub const ZOOM_COMBINED: u16 = 55;
pub const ZOOM_SPLIT: u16 = 70;
pub const HEADER_WIDTH_RATIO: f64 = 0.75;
pub const RUN_HEADER_DEPTH: u32 = 1;
pub const CONSTANTS_HEADER_DEPTH: u32 = 10;

// Chart anchors (row, column), 1-based.
pub const CHART_ANCHOR_COMBINED: (u32, u16) = (2, 13); // M2
pub const CHART_ANCHOR_SPLIT: (u32, u16) = (2, 2); // B2

// Chart size in pixels.
pub const CHART_WIDTH_PX: u32 = 1500;
pub const CHART_HEIGHT_PX: u32 = 380;

// --- Output naming ---
pub const ANALYZED_SUFFIX: &str = "___analyzed.xlsx";
pub const DEFAULT_SINGLE_OUTPUT: &str = "Complete Analysis.xlsx";
pub const DEFAULT_STANDALONE_OUTPUT: &str = "example_output.xlsx";

// --- Preview plot dimensions ---
pub const PLOT_WIDTH: u32 = 1920;
pub const PLOT_HEIGHT: u32 = 1080;

pub const FONT_SIZE_MAIN_TITLE: i32 = 24;
pub const FONT_SIZE_CHART_TITLE: i32 = 20;
pub const FONT_SIZE_AXIS_LABEL: i32 = 14;
pub const FONT_SIZE_LEGEND: i32 = 14;
pub const FONT_SIZE_MESSAGE: i32 = 20;

// --- Preview Color Assignments ---
pub const COLOR_RAW_WINDSPEED: RGBColor = RGBColor(66, 133, 244);
pub const COLOR_RAW_FORCE: RGBColor = RGBColor(219, 68, 55);
pub const COLOR_CALIBRATED_WINDSPEED: RGBColor = RGBColor(244, 180, 0);
pub const COLOR_AVERAGED_FORCE: RGBColor = RGBColor(15, 157, 88);
pub const COLOR_TARGET_FORCE: RGBColor = RGBColor(255, 109, 0);
pub const COLOR_DRAG_AREA: RGBColor = RGBColor(70, 189, 198);

// Stroke widths for lines
pub const LINE_WIDTH_PLOT: u32 = 1;
pub const LINE_WIDTH_LEGEND: u32 = 2;

// src/constants.rs
