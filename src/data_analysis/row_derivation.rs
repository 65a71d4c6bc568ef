// src/data_analysis/row_derivation.rs

use crate::constants::{
    FIRST_DATA_ROW, FORCE_AVERAGE_WINDOW, METERS_PER_FOOT, NUMBER_FORMAT_3DP,
    WINDSPEED_AVERAGE_WINDOW,
};
use crate::data_analysis::constants_model::{names, NameRegistry};
use crate::data_input::raw_sample::RawSample;
use crate::error::Result;
use crate::layout::{Column, COLUMN_COUNT, COLUMN_LAYOUT};
use crate::workbook::{CellValue, OutputSink};

#[derive(Debug, Clone, PartialEq)]
pub struct DerivedCell {
    pub column: Column,
    pub value: CellValue,
    pub number_format: Option<&'static str>,
}

/// The eleven cells of one sample, in layout order.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedRow {
    pub row: u32,
    pub cells: Vec<DerivedCell>,
}

impl DerivedRow {
    pub fn get(&self, column: Column) -> &CellValue {
        &self.cells[column.position() as usize - 1].value
    }

    /// Formula text of a column, `None` for literal cells.
    pub fn formula(&self, column: Column) -> Option<&str> {
        match self.get(column) {
            CellValue::Formula(text) => Some(text.as_str()),
            _ => None,
        }
    }

    pub fn write_to<S: OutputSink + ?Sized>(&self, sink: &mut S, sheet: &str) -> Result<()> {
        for cell in &self.cells {
            sink.write_cell(
                sheet,
                self.row,
                cell.column.position(),
                cell.value.clone(),
                cell.number_format,
            )?;
        }
        Ok(())
    }
}

/// Rows covered by the windowed average around `row`. The lower bound never
/// goes below the first data row; the upper bound is left open past the data.
pub fn average_window(row: u32, radius: u32) -> (u32, u32) {
    (row.saturating_sub(radius).max(FIRST_DATA_ROW), row + radius)
}

/// Builds per-row cells. Constants are referenced by their global names,
/// each looked up once when the engine is built.
#[derive(Debug, Clone)]
pub struct RowDerivationEngine {
    anemometer_factor: String,
    load_cell_factor: String,
    air_density_slg_ft3: String,
    target_drag_area_ft2: String,
    nom_sa_ft2: String,
}

impl RowDerivationEngine {
    pub fn new(registry: &NameRegistry) -> Result<Self> {
        Ok(Self {
            anemometer_factor: registry.name(names::ANEMOMETER_FACTOR)?.to_string(),
            load_cell_factor: registry.name(names::LOAD_CELL_FACTOR)?.to_string(),
            air_density_slg_ft3: registry.name(names::AIR_DENSITY_SLG_FT3)?.to_string(),
            target_drag_area_ft2: registry.name(names::TARGET_DRAG_AREA_FT2)?.to_string(),
            nom_sa_ft2: registry.name(names::NOM_SA_FT2)?.to_string(),
        })
    }

    pub fn derive_row(&self, sample: &RawSample, row: u32) -> DerivedRow {
        use Column::*;

        let (force_lo, force_hi) = average_window(row, FORCE_AVERAGE_WINDOW);
        let (wind_lo, wind_hi) = average_window(row, WINDSPEED_AVERAGE_WINDOW);
        let ft_s = AnemometerFtS.cell(row);
        let rho = &self.air_density_slg_ft3;

        let cells: [(Column, CellValue); COLUMN_COUNT] = [
            (Time, CellValue::Number(sample.time_ms() as f64)),
            (AnemometerRaw, CellValue::Number(sample.windspeed_raw)),
            (LoadCellRaw, CellValue::Number(sample.force_raw)),
            (
                AnemometerCalibrated,
                formula(format!("{}/{}", AnemometerRaw.cell(row), self.anemometer_factor)),
            ),
            (
                LoadCellCalibrated,
                formula(format!("{}/{}", LoadCellRaw.cell(row), self.load_cell_factor)),
            ),
            (
                LoadCellAveraged,
                formula(format!("AVERAGE({})", LoadCellCalibrated.range(force_lo, force_hi))),
            ),
            (
                AnemometerAveraged,
                formula(format!("AVERAGE({})", AnemometerCalibrated.range(wind_lo, wind_hi))),
            ),
            (
                AnemometerFtS,
                formula(format!("{}/{}", AnemometerAveraged.cell(row), METERS_PER_FOOT)),
            ),
            (
                TargetForce,
                formula(format!(
                    "({ft_s}^2)*{rho}*{}*0.5",
                    self.target_drag_area_ft2
                )),
            ),
            (
                DragArea,
                formula(format!(
                    "IF({ft_s}=0,\"\",(2*{})/({rho}*({ft_s})^2))",
                    LoadCellAveraged.cell(row)
                )),
            ),
            (
                DragCoefficient,
                formula(format!(
                    "IF({drag}=\"\",\"\",{drag}/{})",
                    self.nom_sa_ft2,
                    drag = DragArea.cell(row)
                )),
            ),
        ];

        debug_assert!(cells
            .iter()
            .zip(COLUMN_LAYOUT.iter())
            .all(|((c, _), (l, _, _))| c == l));

        let cells = cells
            .into_iter()
            .map(|(column, value)| DerivedCell {
                column,
                value,
                number_format: if column == Time {
                    None
                } else {
                    Some(NUMBER_FORMAT_3DP)
                },
            })
            .collect();

        DerivedRow { row, cells }
    }
}

fn formula(body: String) -> CellValue {
    CellValue::Formula(format!("={body}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_analysis::constants_model::ConstantsModel;
    use crate::physical::PhysicalConstants;
    use crate::workbook::Document;

    fn engine() -> RowDerivationEngine {
        let mut doc = Document::new();
        let model =
            ConstantsModel::install(&mut doc, "Constants", &PhysicalConstants::default()).unwrap();
        RowDerivationEngine::new(model.registry()).unwrap()
    }

    #[test]
    fn test_force_window_lower_bound() {
        assert_eq!(average_window(2, 3), (2, 5));
        assert_eq!(average_window(4, 3), (2, 7));
        assert_eq!(average_window(5, 3), (2, 8));
        assert_eq!(average_window(6, 3), (3, 9));
        for row in 2..200 {
            assert!(average_window(row, FORCE_AVERAGE_WINDOW).0 >= FIRST_DATA_ROW);
        }
    }

    #[test]
    fn test_row_formulas() {
        let row = engine().derive_row(&RawSample::new(0.1, 5.5, 2.1), 10);
        assert_eq!(row.get(Column::Time), &CellValue::Number(100.0));
        assert_eq!(row.get(Column::AnemometerRaw), &CellValue::Number(5.5));
        assert_eq!(row.formula(Column::AnemometerCalibrated), Some("=B10/ANEMOMETER_FACTOR"));
        assert_eq!(row.formula(Column::LoadCellCalibrated), Some("=C10/LOAD_CELL_FACTOR"));
        assert_eq!(row.formula(Column::LoadCellAveraged), Some("=AVERAGE(E7:E13)"));
        assert_eq!(row.formula(Column::AnemometerAveraged), Some("=AVERAGE(D10:D10)"));
        assert_eq!(row.formula(Column::AnemometerFtS), Some("=G10/0.3048"));
        assert_eq!(
            row.formula(Column::TargetForce),
            Some("=(H10^2)*AIR_DENSITY_SLG_FT3*TARGET_DRAG_AREA_FT2*0.5")
        );
        assert_eq!(
            row.formula(Column::DragArea),
            Some("=IF(H10=0,\"\",(2*F10)/(AIR_DENSITY_SLG_FT3*(H10)^2))")
        );
        assert_eq!(
            row.formula(Column::DragCoefficient),
            Some("=IF(J10=\"\",\"\",J10/NOM_SA_FT2)")
        );
    }

    #[test]
    fn test_number_formats() {
        let row = engine().derive_row(&RawSample::new(0.0, 5.0, 2.0), 2);
        for cell in &row.cells {
            if cell.column == Column::Time {
                assert_eq!(cell.number_format, None);
            } else {
                assert_eq!(cell.number_format, Some(NUMBER_FORMAT_3DP));
            }
        }
    }

    #[test]
    fn test_derivation_is_deterministic() {
        let engine = engine();
        let sample = RawSample::new(1.25, 7.0, 3.5);
        assert_eq!(engine.derive_row(&sample, 42), engine.derive_row(&sample, 42));
    }

    #[test]
    fn test_missing_constants_are_rejected() {
        assert!(RowDerivationEngine::new(&NameRegistry::default()).is_err());
    }

    #[test]
    fn test_write_to_sink() {
        let mut doc = Document::new();
        doc.add_sheet("Run").unwrap();
        engine()
            .derive_row(&RawSample::new(0.0, 5.0, 2.0), 2)
            .write_to(&mut doc, "Run")
            .unwrap();
        assert_eq!(doc.cell("Run", 2, 1).unwrap().value, CellValue::Number(0.0));
        assert!(doc.cell("Run", 2, 11).is_some());
        assert!(doc.cell("Run", 2, 12).is_none());
    }
}

// src/data_analysis/row_derivation.rs
