// src/physical.rs

use serde::Deserialize;
use std::f64::consts::PI;

use crate::constants::*;

/// Primary physical and calibration inputs of a test campaign.
///
/// The constants table writes these as literals; everything else in the table
/// is a formula over them. The numeric derivations below mirror those formulas
/// for console summaries and preview plots.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PhysicalConstants {
    pub nom_diam_m: f64,
    pub air_density_kg_m3: f64,
    pub air_density_target_kg_m3: f64,
    pub descent_rate_ft_s: f64,
    pub rocket_mass_lb: f64,
    pub anemometer_factor: f64,
    pub load_cell_factor: f64,
    pub windspeed_threshold: f64,
    pub force_threshold: f64,
}

impl Default for PhysicalConstants {
    fn default() -> Self {
        Self {
            nom_diam_m: DEFAULT_NOM_DIAM_M,
            air_density_kg_m3: DEFAULT_AIR_DENSITY_KG_M3,
            air_density_target_kg_m3: DEFAULT_AIR_DENSITY_TARGET_KG_M3,
            descent_rate_ft_s: DEFAULT_DESCENT_RATE_FT_S,
            rocket_mass_lb: DEFAULT_ROCKET_MASS_LB,
            anemometer_factor: DEFAULT_ANEMOMETER_FACTOR,
            load_cell_factor: DEFAULT_LOAD_CELL_FACTOR,
            windspeed_threshold: DEFAULT_WINDSPEED_THRESHOLD,
            force_threshold: DEFAULT_FORCE_THRESHOLD,
        }
    }
}

impl PhysicalConstants {
    /// Rejects values that would make the calibration or drag-area formulas meaningless.
    pub fn validate(&self) -> Result<(), String> {
        let positive = [
            ("nom_diam_m", self.nom_diam_m),
            ("air_density_kg_m3", self.air_density_kg_m3),
            ("air_density_target_kg_m3", self.air_density_target_kg_m3),
            ("descent_rate_ft_s", self.descent_rate_ft_s),
            ("rocket_mass_lb", self.rocket_mass_lb),
            ("anemometer_factor", self.anemometer_factor),
            ("load_cell_factor", self.load_cell_factor),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(format!("constant '{name}' must be a positive number, got {value}"));
            }
        }
        for (name, value) in [
            ("windspeed_threshold", self.windspeed_threshold),
            ("force_threshold", self.force_threshold),
        ] {
            if !value.is_finite() {
                return Err(format!("constant '{name}' must be finite, got {value}"));
            }
        }
        Ok(())
    }

    pub fn nom_diam_ft(&self) -> f64 {
        self.nom_diam_m / METERS_PER_FOOT
    }

    pub fn air_density_slg_ft3(&self) -> f64 {
        self.air_density_kg_m3 * SLUG_FT3_PER_KG_M3
    }

    pub fn air_density_target_slg_ft3(&self) -> f64 {
        self.air_density_target_kg_m3 * SLUG_FT3_PER_KG_M3
    }

    pub fn descent_rate_m_s(&self) -> f64 {
        self.descent_rate_ft_s * METERS_PER_FOOT
    }

    pub fn rocket_mass_kg(&self) -> f64 {
        self.rocket_mass_lb * KG_PER_LB
    }

    pub fn nom_sa_m2(&self) -> f64 {
        self.nom_diam_m.powi(2) * PI * 0.25
    }

    pub fn nom_sa_ft2(&self) -> f64 {
        self.nom_diam_ft().powi(2) * PI * 0.25
    }

    pub fn target_drag_area_m2(&self) -> f64 {
        (2.0 * self.rocket_mass_kg())
            / (self.descent_rate_m_s().powi(2) * self.air_density_target_kg_m3)
    }

    pub fn target_drag_area_ft2(&self) -> f64 {
        (2.0 * self.rocket_mass_lb)
            / (self.descent_rate_ft_s.powi(2) * self.air_density_target_slg_ft3())
    }

    pub fn target_coeff_drag(&self) -> f64 {
        self.target_drag_area_m2() / self.nom_sa_m2()
    }
}


// src/physical.rs
