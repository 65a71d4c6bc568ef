// src/data_analysis/sample_filter.rs

use crate::data_input::raw_sample::RawSample;

/// Gate applied to every sample before it is derived. A rejected sample takes
/// no output row and does not advance the row index.
pub trait SampleFilter {
    fn accept(&self, sample: &RawSample) -> bool;
}

/// Keeps every sample.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl SampleFilter for AcceptAll {
    fn accept(&self, _sample: &RawSample) -> bool {
        true
    }
}

impl<F> SampleFilter for F
where
    F: Fn(&RawSample) -> bool,
{
    fn accept(&self, sample: &RawSample) -> bool {
        self(sample)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accept_all() {
        assert!(AcceptAll.accept(&RawSample::new(0.0, -1.0, f64::NAN)));
    }

    #[test]
    fn test_closure_filter() {
        let positive_force = |s: &RawSample| s.force_raw > 0.0;
        assert!(positive_force.accept(&RawSample::new(0.0, 0.0, 1.0)));
        assert!(!positive_force.accept(&RawSample::new(0.0, 0.0, -1.0)));
    }
}

// src/data_analysis/sample_filter.rs
