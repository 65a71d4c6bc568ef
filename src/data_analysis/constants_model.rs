// src/data_analysis/constants_model.rs

use std::collections::HashMap;

use tracing::debug;

use crate::constants::{
    CONSTANTS_HEADER_DEPTH, KG_PER_LB, METERS_PER_FOOT, SLUG_FT3_PER_KG_M3,
};
use crate::error::{AnalyzerError, Result};
use crate::physical::PhysicalConstants;
use crate::workbook::{space_columns, CellLocation, CellValue, OutputSink};

/// Document-global names of the constants table.
pub mod names {
    pub const NOM_DIAM_M: &str = "NOM_DIAM_M";
    pub const NOM_DIAM_FT: &str = "NOM_DIAM_FT";
    pub const AIR_DENSITY_KG_M3: &str = "AIR_DENSITY_KG_M3";
    pub const AIR_DENSITY_SLG_FT3: &str = "AIR_DENSITY_SLG_FT3";
    pub const AIR_DENSITY_TARGET_KG_M3: &str = "AIR_DENSITY_TARGET_KG_M3";
    pub const AIR_DENSITY_TARGET_SLG_FT3: &str = "AIR_DENSITY_TARGET_SLG_FT3";
    pub const DESCENT_RATE_FT_S: &str = "DESCENT_RATE_FT_S";
    pub const DESCENT_RATE_M_S: &str = "DESCENT_RATE_M_S";
    pub const ROCKET_MASS_LB: &str = "ROCKET_MASS_LB";
    pub const ROCKET_MASS_KG: &str = "ROCKET_MASS_KG";
    pub const NOM_SA_M2: &str = "NOM_SA_M2";
    pub const NOM_SA_FT2: &str = "NOM_SA_FT2";
    pub const TARGET_DRAG_AREA_M2: &str = "TARGET_DRAG_AREA_M2";
    pub const TARGET_DRAG_AREA_FT2: &str = "TARGET_DRAG_AREA_FT2";
    pub const TARGET_COEFF_DRAG: &str = "TARGET_COEFF_DRAG";
    pub const ANEMOMETER_FACTOR: &str = "ANEMOMETER_FACTOR";
    pub const LOAD_CELL_FACTOR: &str = "LOAD_CELL_FACTOR";
    pub const WINDSPEED_THRESHOLD: &str = "WINDSPEED_THRESHOLD";
    pub const FORCE_THRESHOLD: &str = "FORCE_THRESHOLD";
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConstantValue {
    Literal(f64),
    Formula(String),
}

impl ConstantValue {
    fn to_cell(&self) -> CellValue {
        match self {
            ConstantValue::Literal(v) => CellValue::Number(*v),
            ConstantValue::Formula(f) => CellValue::Formula(f.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Constant {
    pub title: String,
    pub name: String,
    pub value: ConstantValue,
    pub converted_name: Option<String>,
    pub converted_value: Option<ConstantValue>,
}

/// Name -> location table. Formula builders take a reference to this and ask it
/// for every constant they mention, so a formula can only name what exists.
///
/// Lookups ignore ASCII case, as spreadsheet defined names do.
#[derive(Debug, Clone, Default)]
pub struct NameRegistry {
    locations: HashMap<String, CellLocation>,
    order: Vec<String>,
}

fn registry_key(name: &str) -> String {
    name.to_ascii_uppercase()
}

impl NameRegistry {
    pub fn resolve(&self, name: &str) -> Result<&CellLocation> {
        self.locations
            .get(&registry_key(name))
            .ok_or_else(|| AnalyzerError::UnknownConstant(name.to_string()))
    }

    /// The name itself, once it is known to be registered.
    pub fn name<'a>(&self, name: &'a str) -> Result<&'a str> {
        self.resolve(name).map(|_| name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.locations.contains_key(&registry_key(name))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    fn insert(&mut self, name: &str, location: CellLocation) {
        self.order.push(name.to_string());
        self.locations.insert(registry_key(name), location);
    }
}

/// The constants table: one row per constant in definition order,
/// `title | primary | converted` in columns A..C.
#[derive(Debug, Clone)]
pub struct ConstantsModel {
    sheet: String,
    next_row: u32,
    constants: Vec<Constant>,
    registry: NameRegistry,
}

const TITLE_COL: u16 = 1;
const PRIMARY_COL: u16 = 2;
const CONVERTED_COL: u16 = 3;

impl ConstantsModel {
    /// Empty table writing into `sheet`, which must already exist in the sink.
    pub fn new(sheet: &str) -> Self {
        Self {
            sheet: sheet.to_string(),
            next_row: 1,
            constants: Vec::new(),
            registry: NameRegistry::default(),
        }
    }

    /// Creates `sheet`, writes the full preconfigured table and sizes its columns.
    pub fn install<S: OutputSink + ?Sized>(
        sink: &mut S,
        sheet: &str,
        physical: &PhysicalConstants,
    ) -> Result<Self> {
        sink.add_sheet(sheet)?;
        let mut model = Self::new(sheet);
        model.define_all(sink, physical)?;
        space_columns(sink, sheet, CONSTANTS_HEADER_DEPTH, Some(TITLE_COL))?;
        debug!(
            "Constants table '{}' holds {} named values",
            sheet,
            model.registry.len()
        );
        Ok(model)
    }

    /// Appends one constant at the next free row and registers its name(s) globally.
    pub fn define_constant<S: OutputSink + ?Sized>(
        &mut self,
        sink: &mut S,
        title: &str,
        primary_name: &str,
        primary_value: ConstantValue,
        converted: Option<(&str, ConstantValue)>,
    ) -> Result<()> {
        for name in std::iter::once(primary_name).chain(converted.as_ref().map(|(n, _)| *n)) {
            if self.registry.contains(name) {
                return Err(AnalyzerError::DuplicateConstant(name.to_string()));
            }
        }
        if let Some((converted_name, _)) = &converted {
            if converted_name.eq_ignore_ascii_case(primary_name) {
                return Err(AnalyzerError::DuplicateConstant(converted_name.to_string()));
            }
        }

        // The row is spent even if the sink rejects a write below.
        let row = self.next_row;
        self.next_row += 1;
        sink.write_cell(&self.sheet, row, TITLE_COL, CellValue::Text(title.to_string()), None)?;

        let primary_loc = CellLocation::new(&self.sheet, row, PRIMARY_COL);
        sink.write_cell(&self.sheet, row, PRIMARY_COL, primary_value.to_cell(), None)?;
        sink.define_name(primary_name, &primary_loc)?;
        self.registry.insert(primary_name, primary_loc);

        if let Some((converted_name, converted_value)) = &converted {
            let converted_loc = CellLocation::new(&self.sheet, row, CONVERTED_COL);
            sink.write_cell(&self.sheet, row, CONVERTED_COL, converted_value.to_cell(), None)?;
            sink.define_name(converted_name, &converted_loc)?;
            self.registry.insert(converted_name, converted_loc);
        }

        self.constants.push(Constant {
            title: title.to_string(),
            name: primary_name.to_string(),
            value: primary_value,
            converted_name: converted.as_ref().map(|(n, _)| n.to_string()),
            converted_value: converted.map(|(_, v)| v),
        });
        Ok(())
    }

    pub fn resolve(&self, name: &str) -> Result<&CellLocation> {
        self.registry.resolve(name)
    }

    pub fn registry(&self) -> &NameRegistry {
        &self.registry
    }

    pub fn constants(&self) -> &[Constant] {
        &self.constants
    }

    pub fn sheet(&self) -> &str {
        &self.sheet
    }

    fn define_all<S: OutputSink + ?Sized>(
        &mut self,
        sink: &mut S,
        c: &PhysicalConstants,
    ) -> Result<()> {
        use names::*;
        use ConstantValue::{Formula, Literal};

        self.define_constant(
            sink,
            "Nominal diameter of parachute (m | ft)",
            NOM_DIAM_M,
            Literal(c.nom_diam_m),
            Some((NOM_DIAM_FT, Formula(format!("={NOM_DIAM_M}/{METERS_PER_FOOT}")))),
        )?;
        self.define_constant(
            sink,
            "Air density during tests (kg/m^3 | slug/ft^3)",
            AIR_DENSITY_KG_M3,
            Literal(c.air_density_kg_m3),
            Some((
                AIR_DENSITY_SLG_FT3,
                Formula(format!("={AIR_DENSITY_KG_M3}*{SLUG_FT3_PER_KG_M3}")),
            )),
        )?;
        self.define_constant(
            sink,
            "Air density for target descent rate (kg/m^3 | slug/ft^3)",
            AIR_DENSITY_TARGET_KG_M3,
            Literal(c.air_density_target_kg_m3),
            Some((
                AIR_DENSITY_TARGET_SLG_FT3,
                Formula(format!("={AIR_DENSITY_TARGET_KG_M3}*{SLUG_FT3_PER_KG_M3}")),
            )),
        )?;
        self.define_constant(
            sink,
            "Target descent rate (ft/s | m/s)",
            DESCENT_RATE_FT_S,
            Literal(c.descent_rate_ft_s),
            Some((
                DESCENT_RATE_M_S,
                Formula(format!("={DESCENT_RATE_FT_S}*{METERS_PER_FOOT}")),
            )),
        )?;
        self.define_constant(
            sink,
            "Rocket mass (lb | kg)",
            ROCKET_MASS_LB,
            Literal(c.rocket_mass_lb),
            Some((ROCKET_MASS_KG, Formula(format!("={ROCKET_MASS_LB}*{KG_PER_LB}")))),
        )?;
        self.define_constant(
            sink,
            "Nominal surface area of parachute (m^2 | ft^2)",
            NOM_SA_M2,
            Formula(format!("={NOM_DIAM_M}^2 * PI() * 0.25")),
            Some((NOM_SA_FT2, Formula(format!("={NOM_DIAM_FT}^2 * PI() * 0.25")))),
        )?;
        self.define_constant(
            sink,
            "Target drag area (m^2 | ft^2)",
            TARGET_DRAG_AREA_M2,
            Formula(format!(
                "=(2*{ROCKET_MASS_KG})/({DESCENT_RATE_M_S}^2 * {AIR_DENSITY_TARGET_KG_M3})"
            )),
            Some((
                TARGET_DRAG_AREA_FT2,
                Formula(format!(
                    "=(2*{ROCKET_MASS_LB})/({DESCENT_RATE_FT_S}^2 * {AIR_DENSITY_TARGET_SLG_FT3})"
                )),
            )),
        )?;
        self.define_constant(
            sink,
            "Target coefficient of drag relative to nominal SA (unitless)",
            TARGET_COEFF_DRAG,
            Formula(format!("={TARGET_DRAG_AREA_M2}/{NOM_SA_M2}")),
            None,
        )?;
        self.define_constant(
            sink,
            "Anemometer adjustment (calibration) factor (unitless)",
            ANEMOMETER_FACTOR,
            Literal(c.anemometer_factor),
            None,
        )?;
        self.define_constant(
            sink,
            "Load cell adjustment (calibration) factor (unitless)",
            LOAD_CELL_FACTOR,
            Literal(c.load_cell_factor),
            None,
        )?;
        self.define_constant(
            sink,
            "The windspeed threshold at which a run is said to have commenced (ft/s)",
            WINDSPEED_THRESHOLD,
            Literal(c.windspeed_threshold),
            None,
        )?;
        self.define_constant(
            sink,
            "The force threshold at which a run is said to have commenced (lbf)",
            FORCE_THRESHOLD,
            Literal(c.force_threshold),
            None,
        )?;
        Ok(())
    }
}


// src/data_analysis/constants_model.rs
