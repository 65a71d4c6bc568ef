// src/layout.rs

//! Column layout shared by row derivation, run assembly, charts and the
//! meta-analysis. Every column letter used anywhere in a formula comes from here.

use crate::constants::FIRST_DATA_ROW;

/// The eleven columns of a run region, in sheet order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Time,
    AnemometerRaw,
    LoadCellRaw,
    AnemometerCalibrated,
    LoadCellCalibrated,
    LoadCellAveraged,
    AnemometerAveraged,
    AnemometerFtS,
    TargetForce,
    DragArea,
    DragCoefficient,
}

pub const COLUMN_COUNT: usize = 11;

/// Ordered layout: header text and a short description for the README region.
pub const COLUMN_LAYOUT: [(Column, &str, &str); COLUMN_COUNT] = [
    (Column::Time, "Time (ms)", "Sample time, truncated to whole milliseconds"),
    (Column::AnemometerRaw, "Anemometer Raw (m/s)", "Windspeed as logged"),
    (Column::LoadCellRaw, "Load Cell Raw (lbf)", "Force as logged"),
    (
        Column::AnemometerCalibrated,
        "Anemometer Calibrated (m/s)",
        "Raw windspeed / ANEMOMETER_FACTOR",
    ),
    (
        Column::LoadCellCalibrated,
        "Load Cell Calibrated (lbf)",
        "Raw force / LOAD_CELL_FACTOR",
    ),
    (
        Column::LoadCellAveraged,
        "Load Cell Averaged (lbf)",
        "Mean calibrated force over rows [r-3, r+3], never above the first data row",
    ),
    (
        Column::AnemometerAveraged,
        "Anemometer Averaged (m/s)",
        "Mean calibrated windspeed over rows [r, r]",
    ),
    (Column::AnemometerFtS, "Anemometer (ft/s)", "Averaged windspeed in ft/s"),
    (
        Column::TargetForce,
        "Target Force (lbf)",
        "v^2 * AIR_DENSITY_SLG_FT3 * TARGET_DRAG_AREA_FT2 * 0.5",
    ),
    (
        Column::DragArea,
        "Drag Area [CdSo] (ft^2)",
        "2 * averaged force / (AIR_DENSITY_SLG_FT3 * v^2), blank when v = 0",
    ),
    (
        Column::DragCoefficient,
        "Drag Coefficient (unitless)",
        "Drag area / NOM_SA_FT2",
    ),
];

impl Column {
    /// 1-based sheet column.
    pub fn position(self) -> u16 {
        let index = COLUMN_LAYOUT
            .iter()
            .position(|(column, _, _)| *column == self)
            .unwrap_or_default();
        index as u16 + 1
    }

    pub fn letter(self) -> String {
        column_letter(self.position())
    }

    pub fn header(self) -> &'static str {
        COLUMN_LAYOUT[self.position() as usize - 1].1
    }

    pub fn description(self) -> &'static str {
        COLUMN_LAYOUT[self.position() as usize - 1].2
    }

    /// Relative A1 reference, e.g. `H12`.
    pub fn cell(self, row: u32) -> String {
        format!("{}{}", self.letter(), row)
    }

    /// Relative A1 range within this column, e.g. `E2:E9`.
    pub fn range(self, first_row: u32, last_row: u32) -> String {
        format!("{}:{}", self.cell(first_row), self.cell(last_row))
    }

    pub fn all() -> impl Iterator<Item = Column> {
        COLUMN_LAYOUT.iter().map(|(column, _, _)| *column)
    }
}

/// Spreadsheet column letters for a 1-based column index (1 -> A, 27 -> AA).
pub fn column_letter(position: u16) -> String {
    let mut n = position as u32;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push((b'A' + rem as u8) as char);
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// Absolute A1 reference, e.g. `$B$3`.
pub fn absolute_cell(row: u32, col: u16) -> String {
    format!("${}${}", column_letter(col), row)
}

/// Quote a region name for use in a formula when it is not a plain identifier.
pub fn quote_sheet_name(name: &str) -> String {
    let plain = name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
        && !name.starts_with(|c: char| c.is_ascii_digit());
    if plain {
        name.to_string()
    } else {
        format!("'{}'", name.replace('\'', "''"))
    }
}

/// Rows a run occupies. `last` is the last row that actually holds data;
/// a run with no samples has `last == FIRST_DATA_ROW - 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowExtent {
    pub first: u32,
    pub last: u32,
}

impl RowExtent {
    /// Extent after writing rows up to (but excluding) `next_row`.
    pub fn from_next_row(next_row: u32) -> Self {
        Self {
            first: FIRST_DATA_ROW,
            last: next_row.saturating_sub(1).max(FIRST_DATA_ROW - 1),
        }
    }

    /// Extent whose last populated row is `last_row` (header row included in the count).
    pub fn from_last_row(last_row: u32) -> Self {
        Self::from_next_row(last_row + 1)
    }

    pub fn row_count(&self) -> u32 {
        (self.last + 1).saturating_sub(self.first)
    }

    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_positions() {
        assert_eq!(Column::Time.position(), 1);
        assert_eq!(Column::LoadCellAveraged.letter(), "F");
        assert_eq!(Column::AnemometerAveraged.letter(), "G");
        assert_eq!(Column::AnemometerFtS.letter(), "H");
        assert_eq!(Column::DragArea.letter(), "J");
        assert_eq!(Column::DragCoefficient.position(), 11);
    }

    #[test]
    fn test_column_letters() {
        assert_eq!(column_letter(1), "A");
        assert_eq!(column_letter(26), "Z");
        assert_eq!(column_letter(27), "AA");
        assert_eq!(column_letter(703), "AAA");
    }

    #[test]
    fn test_references() {
        assert_eq!(Column::LoadCellCalibrated.range(2, 9), "E2:E9");
        assert_eq!(absolute_cell(3, 2), "$B$3");
    }

    #[test]
    fn test_quote_sheet_name() {
        assert_eq!(quote_sheet_name("SheetName"), "SheetName");
        assert_eq!(quote_sheet_name("Data Run 1"), "'Data Run 1'");
        assert_eq!(quote_sheet_name("O'Hare"), "'O''Hare'");
        assert_eq!(quote_sheet_name("2024run"), "'2024run'");
    }

    #[test]
    fn test_row_extent() {
        let extent = RowExtent::from_next_row(5);
        assert_eq!(extent.first, 2);
        assert_eq!(extent.last, 4);
        assert_eq!(extent.row_count(), 3);

        let empty = RowExtent::from_next_row(2);
        assert!(empty.is_empty());
        assert_eq!(empty.last, 1);

        assert_eq!(RowExtent::from_last_row(15000).last, 15000);
        assert!(RowExtent::from_last_row(1).is_empty());
    }
}

// src/layout.rs
