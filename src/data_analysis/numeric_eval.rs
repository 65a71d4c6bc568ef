// src/data_analysis/numeric_eval.rs

use ndarray::{s, Array1, Zip};

use crate::constants::{FORCE_AVERAGE_WINDOW, METERS_PER_FOOT, WINDSPEED_AVERAGE_WINDOW};
use crate::data_input::raw_sample::RawSample;
use crate::physical::PhysicalConstants;

/// Numeric values of every derived column for one run, evaluated the same way
/// the sheet formulas are. A blank drag area is `NaN`.
#[derive(Debug, Clone)]
pub struct RunSeries {
    pub time_ms: Array1<f64>,
    pub windspeed_raw: Array1<f64>,
    pub force_raw: Array1<f64>,
    pub windspeed_calibrated: Array1<f64>,
    pub force_calibrated: Array1<f64>,
    pub force_averaged: Array1<f64>,
    pub windspeed_averaged: Array1<f64>,
    pub windspeed_ft_s: Array1<f64>,
    pub target_force: Array1<f64>,
    pub drag_area: Array1<f64>,
    pub drag_coefficient: Array1<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummary {
    pub samples: usize,
    pub duration_ms: f64,
    pub peak_windspeed_ft_s: f64,
    pub peak_force_lbf: f64,
    /// Gated mean drag area, `None` when no sample clears both thresholds.
    pub mean_drag_area_ft2: Option<f64>,
    pub mean_drag_coefficient: Option<f64>,
    pub gated_samples: usize,
}

/// Mean over `[i - radius, i + radius]`, cut to the samples that exist.
fn windowed_mean(data: &Array1<f64>, radius: usize) -> Array1<f64> {
    let n = data.len();
    Array1::from_shape_fn(n, |i| {
        let lo = i.saturating_sub(radius);
        let hi = (i + radius + 1).min(n);
        data.slice(s![lo..hi]).mean().unwrap_or(f64::NAN)
    })
}

impl RunSeries {
    pub fn evaluate(samples: &[RawSample], c: &PhysicalConstants) -> Self {
        let time_ms: Array1<f64> = samples.iter().map(|s| s.time_ms() as f64).collect();
        let windspeed_raw: Array1<f64> = samples.iter().map(|s| s.windspeed_raw).collect();
        let force_raw: Array1<f64> = samples.iter().map(|s| s.force_raw).collect();

        let windspeed_calibrated = &windspeed_raw / c.anemometer_factor;
        let force_calibrated = &force_raw / c.load_cell_factor;
        let force_averaged = windowed_mean(&force_calibrated, FORCE_AVERAGE_WINDOW as usize);
        let windspeed_averaged =
            windowed_mean(&windspeed_calibrated, WINDSPEED_AVERAGE_WINDOW as usize);
        let windspeed_ft_s = &windspeed_averaged / METERS_PER_FOOT;

        let rho = c.air_density_slg_ft3();
        let target_force = windspeed_ft_s.mapv(|v| v.powi(2) * rho * c.target_drag_area_ft2() * 0.5);
        let drag_area = Zip::from(&force_averaged)
            .and(&windspeed_ft_s)
            .map_collect(|&f, &v| if v == 0.0 { f64::NAN } else { (2.0 * f) / (rho * v.powi(2)) });
        let nom_sa_ft2 = c.nom_sa_ft2();
        let drag_coefficient = drag_area.mapv(|a| a / nom_sa_ft2);

        Self {
            time_ms,
            windspeed_raw,
            force_raw,
            windspeed_calibrated,
            force_calibrated,
            force_averaged,
            windspeed_averaged,
            windspeed_ft_s,
            target_force,
            drag_area,
            drag_coefficient,
        }
    }

    pub fn len(&self) -> usize {
        self.time_ms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time_ms.is_empty()
    }

    /// Same gating as the meta-analysis: averaged windspeed and averaged force
    /// both at or above their thresholds, blanks skipped.
    pub fn gated_mean_drag_area(
        &self,
        windspeed_threshold: f64,
        force_threshold: f64,
    ) -> (Option<f64>, usize) {
        let mut sum = 0.0;
        let mut count = 0usize;
        Zip::from(&self.drag_area)
            .and(&self.windspeed_averaged)
            .and(&self.force_averaged)
            .for_each(|&area, &wind, &force| {
                if wind >= windspeed_threshold && force >= force_threshold && area.is_finite() {
                    sum += area;
                    count += 1;
                }
            });
        if count == 0 {
            (None, 0)
        } else {
            (Some(sum / count as f64), count)
        }
    }

    pub fn summarize(&self, c: &PhysicalConstants) -> RunSummary {
        let (mean_drag_area_ft2, gated_samples) =
            self.gated_mean_drag_area(c.windspeed_threshold, c.force_threshold);
        let peak = |a: &Array1<f64>| a.iter().copied().filter(|v| v.is_finite()).fold(0.0, f64::max);
        let duration_ms = match (self.time_ms.iter().next(), self.time_ms.iter().last()) {
            (Some(first), Some(last)) => last - first,
            _ => 0.0,
        };
        RunSummary {
            samples: self.len(),
            duration_ms,
            peak_windspeed_ft_s: peak(&self.windspeed_ft_s),
            peak_force_lbf: peak(&self.force_averaged),
            mean_drag_area_ft2,
            mean_drag_coefficient: mean_drag_area_ft2.map(|a| a / c.nom_sa_ft2()),
            gated_samples,
        }
    }
}


// src/data_analysis/numeric_eval.rs
