// src/data_analysis/mod.rs

pub mod constants_model;
pub mod meta_analysis;
pub mod numeric_eval;
pub mod row_derivation;
pub mod sample_filter;

// src/data_analysis/mod.rs
