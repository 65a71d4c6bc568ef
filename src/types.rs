// src/types.rs
// Type aliases to reduce complexity warnings

use std::path::PathBuf;

use crate::plot_framework::PlotConfig;

/// One input file and the identifier its run is written under.
pub type RunTarget = (PathBuf, String);

/// A stacked-plot panel: placeholder name, and its chart when there is one to draw.
pub type StackedPanel = (String, Option<PlotConfig>);

// src/types.rs
