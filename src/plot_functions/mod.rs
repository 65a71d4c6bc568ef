// src/plot_functions/mod.rs

pub mod plot_run_preview;

// src/plot_functions/mod.rs
