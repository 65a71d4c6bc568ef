// src/config.rs

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::constants::{DEFAULT_SINGLE_OUTPUT, DEFAULT_STANDALONE_OUTPUT};
use crate::error::{AnalyzerError, Result};
use crate::physical::PhysicalConstants;
use crate::run_assembler::LayoutMode;

/// Session file as written by the user. Every key is optional.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawConfig {
    pub use_hard_coded_path: bool,
    pub hard_coded_path: Option<PathBuf>,
    pub hard_coded_output: Option<PathBuf>,
    pub file_input_hitlist: bool,
    pub hitlist_path: Option<PathBuf>,
    pub single_output_file: bool,
    pub single_output_file_path: Option<PathBuf>,
    pub file_subdirectory: Option<PathBuf>,
    pub use_custom_sheetnames: bool,
    pub single_output_sheetnames_path: Option<PathBuf>,
    pub condensed_export_version: bool,
    pub suppress_all_prints: bool,
    pub verbose: bool,
    pub include_readme: bool,
    pub preview_directory: Option<PathBuf>,
    pub constants: PhysicalConstants,
}

impl Default for RawConfig {
    fn default() -> Self {
        Self {
            use_hard_coded_path: false,
            hard_coded_path: None,
            hard_coded_output: None,
            file_input_hitlist: false,
            hitlist_path: None,
            single_output_file: true,
            single_output_file_path: None,
            file_subdirectory: None,
            use_custom_sheetnames: false,
            single_output_sheetnames_path: None,
            condensed_export_version: true,
            suppress_all_prints: false,
            verbose: false,
            include_readme: true,
            preview_directory: None,
            constants: PhysicalConstants::default(),
        }
    }
}

/// Command-line values that take precedence over the session file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub hitlist: Option<PathBuf>,
    pub sheet_names: Option<PathBuf>,
    pub single_output: Option<PathBuf>,
    pub per_file: bool,
    pub split: bool,
    pub data_dir: Option<PathBuf>,
    pub previews: Option<PathBuf>,
    pub quiet: bool,
    pub verbose: bool,
}

impl RawConfig {
    pub fn from_yaml(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| {
            AnalyzerError::Configuration(format!("cannot read config '{}': {e}", path.display()))
        })?;
        Self::from_yaml(&text)
    }

    pub fn apply(&mut self, o: &Overrides) {
        if let Some(input) = &o.input {
            self.use_hard_coded_path = true;
            self.hard_coded_path = Some(input.clone());
            self.file_input_hitlist = false;
        }
        if let Some(output) = &o.output {
            self.hard_coded_output = Some(output.clone());
        }
        if let Some(hitlist) = &o.hitlist {
            self.file_input_hitlist = true;
            self.hitlist_path = Some(hitlist.clone());
        }
        if let Some(names) = &o.sheet_names {
            self.use_custom_sheetnames = true;
            self.single_output_sheetnames_path = Some(names.clone());
        }
        if let Some(single) = &o.single_output {
            self.single_output_file = true;
            self.single_output_file_path = Some(single.clone());
        }
        if o.per_file {
            self.single_output_file = false;
        }
        if o.split {
            self.condensed_export_version = false;
        }
        if let Some(dir) = &o.data_dir {
            self.file_subdirectory = Some(dir.clone());
        }
        if let Some(dir) = &o.previews {
            self.preview_directory = Some(dir.clone());
        }
        self.suppress_all_prints |= o.quiet;
        self.verbose |= o.verbose;
    }

    /// Checks option combinations and resolves them into a `SessionConfig`.
    pub fn validate(self) -> Result<SessionConfig> {
        self.constants.validate().map_err(AnalyzerError::Configuration)?;

        let input = if self.file_input_hitlist {
            let hitlist = self.hitlist_path.clone().ok_or_else(|| {
                AnalyzerError::Configuration(
                    "hitlist input selected but no hitlist_path given".to_string(),
                )
            })?;
            InputSelection::Hitlist {
                hitlist,
                subdirectory: self.file_subdirectory.clone(),
            }
        } else {
            let input = match (&self.hard_coded_path, self.use_hard_coded_path) {
                (Some(path), true) => path.clone(),
                _ => {
                    return Err(AnalyzerError::Configuration(
                        "no input selected: give an input file or a hitlist".to_string(),
                    ))
                }
            };
            InputSelection::Single {
                input,
                output: self
                    .hard_coded_output
                    .clone()
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_STANDALONE_OUTPUT)),
            }
        };

        let output = if self.single_output_file {
            OutputMode::SingleFile(
                self.single_output_file_path
                    .clone()
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_SINGLE_OUTPUT)),
            )
        } else {
            OutputMode::PerFile
        };

        let naming = if self.use_custom_sheetnames {
            let path = self.single_output_sheetnames_path.clone().ok_or_else(|| {
                AnalyzerError::Configuration(
                    "custom sheet names selected but no single_output_sheetnames_path given"
                        .to_string(),
                )
            })?;
            SheetNaming::Custom(path)
        } else {
            SheetNaming::Derived
        };

        let layout = if self.condensed_export_version {
            LayoutMode::Combined
        } else {
            LayoutMode::Split
        };

        Ok(SessionConfig {
            input,
            output,
            naming,
            layout,
            quiet: self.suppress_all_prints,
            verbose: self.verbose,
            include_readme: self.include_readme,
            preview_directory: self.preview_directory,
            constants: self.constants,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputSelection {
    /// One log, one standalone workbook.
    Single { input: PathBuf, output: PathBuf },
    /// Every entry of a one-per-line list.
    Hitlist {
        hitlist: PathBuf,
        subdirectory: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum OutputMode {
    SingleFile(PathBuf),
    PerFile,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SheetNaming {
    /// Region names from the input file stems.
    Derived,
    /// Region names read from a list parallel to the hitlist.
    Custom(PathBuf),
}

/// Validated session options.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub input: InputSelection,
    pub output: OutputMode,
    pub naming: SheetNaming,
    pub layout: LayoutMode,
    pub quiet: bool,
    pub verbose: bool,
    pub include_readme: bool,
    pub preview_directory: Option<PathBuf>,
    pub constants: PhysicalConstants,
}

impl SessionConfig {
    /// Default `tracing` filter directive for this session.
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            "warn"
        } else if self.verbose {
            "debug"
        } else {
            "info"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_yaml() {
        let yaml = r#"
file_input_hitlist: true
hitlist_path: default_target_list.txt
single_output_file: true
single_output_file_path: Complete Analysis.xlsx
file_subdirectory: default_data_folder
use_custom_sheetnames: true
single_output_sheetnames_path: default_target_list_sheetnames.txt
condensed_export_version: false
constants:
  anemometer_factor: 0.7
  rocket_mass_lb: 120
"#;
        let session = RawConfig::from_yaml(yaml).unwrap().validate().unwrap();
        assert_eq!(
            session.input,
            InputSelection::Hitlist {
                hitlist: PathBuf::from("default_target_list.txt"),
                subdirectory: Some(PathBuf::from("default_data_folder")),
            }
        );
        assert_eq!(
            session.output,
            OutputMode::SingleFile(PathBuf::from("Complete Analysis.xlsx"))
        );
        assert_eq!(
            session.naming,
            SheetNaming::Custom(PathBuf::from("default_target_list_sheetnames.txt"))
        );
        assert_eq!(session.layout, LayoutMode::Split);
        assert_eq!(session.constants.anemometer_factor, 0.7);
        assert_eq!(session.constants.rocket_mass_lb, 120.0);
        assert_eq!(session.constants.load_cell_factor, 1.0);
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(matches!(
            RawConfig::from_yaml("condensed: true"),
            Err(AnalyzerError::ConfigParse(_))
        ));
    }

    #[test]
    fn test_missing_paths_are_configuration_errors() {
        let no_input = RawConfig::default().validate();
        assert!(matches!(no_input, Err(AnalyzerError::Configuration(_))));

        let hitlist_without_path = RawConfig {
            file_input_hitlist: true,
            ..Default::default()
        };
        assert!(matches!(
            hitlist_without_path.validate(),
            Err(AnalyzerError::Configuration(_))
        ));

        let names_without_path = RawConfig {
            file_input_hitlist: true,
            hitlist_path: Some("list.txt".into()),
            use_custom_sheetnames: true,
            ..Default::default()
        };
        assert!(matches!(
            names_without_path.validate(),
            Err(AnalyzerError::Configuration(_))
        ));
    }

    #[test]
    fn test_bad_constants_rejected() {
        let mut raw = RawConfig::default();
        raw.apply(&Overrides {
            input: Some("run.csv".into()),
            ..Default::default()
        });
        raw.constants.load_cell_factor = 0.0;
        assert!(matches!(raw.validate(), Err(AnalyzerError::Configuration(_))));
    }

    #[test]
    fn test_overrides() {
        let mut raw = RawConfig {
            file_input_hitlist: true,
            hitlist_path: Some("list.txt".into()),
            ..Default::default()
        };
        raw.apply(&Overrides {
            input: Some("run.csv".into()),
            output: Some("out.xlsx".into()),
            split: true,
            quiet: true,
            ..Default::default()
        });
        let session = raw.validate().unwrap();
        assert_eq!(
            session.input,
            InputSelection::Single {
                input: "run.csv".into(),
                output: "out.xlsx".into(),
            }
        );
        assert_eq!(session.layout, LayoutMode::Split);
        assert_eq!(session.log_level(), "warn");
    }
}

// src/config.rs
