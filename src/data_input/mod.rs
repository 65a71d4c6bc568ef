// src/data_input/mod.rs

pub mod hitlist;
pub mod raw_sample;
pub mod row_source;

// src/data_input/mod.rs
