// src/orchestrator.rs

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::config::{InputSelection, OutputMode, SessionConfig, SheetNaming};
use crate::constants::{
    CONSTANTS_SHEET, DATA_SHEET, GRAPHS_SHEET, MAX_SHEET_NAME_LEN, README_SHEET,
    RESERVED_SHEET_NAMES,
};
use crate::data_analysis::constants_model::ConstantsModel;
use crate::data_analysis::meta_analysis::{MetaAggregator, MetaRow};
use crate::data_analysis::numeric_eval::{RunSeries, RunSummary};
use crate::data_analysis::row_derivation::RowDerivationEngine;
use crate::data_input::hitlist::{analyzed_output_path, derive_sheet_name, read_list, resolve_entry};
use crate::data_input::row_source::CsvRowSource;
use crate::error::{AnalyzerError, Result};
use crate::layout::Column;
use crate::physical::PhysicalConstants;
use crate::plot_functions::plot_run_preview::{plot_run_preview, preview_path};
use crate::run_assembler::{LayoutMode, Run, RunAssembler, RunPlacement};
use crate::types::RunTarget;
use crate::workbook::{space_columns, CellValue, Document, OutputSink};

#[derive(Debug, Clone)]
pub struct RunReport {
    pub identifier: String,
    pub input: PathBuf,
    pub usable_rows: u32,
    pub summary: RunSummary,
}

/// What one session produced.
#[derive(Debug, Clone, Default)]
pub struct SessionReport {
    pub outputs: Vec<PathBuf>,
    pub runs: Vec<RunReport>,
    pub meta_rows: Vec<MetaRow>,
}

pub struct AnalysisOrchestrator {
    session: SessionConfig,
}

impl AnalysisOrchestrator {
    pub fn new(session: SessionConfig) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &SessionConfig {
        &self.session
    }

    pub fn run(&self) -> Result<SessionReport> {
        match &self.session.input {
            InputSelection::Single { input, output } => {
                let mut report = SessionReport::default();
                let identifier = identifier_for(input, LayoutMode::Combined)?;
                self.analyze_standalone(input, output, &identifier, &mut report)?;
                Ok(report)
            }
            InputSelection::Hitlist {
                hitlist,
                subdirectory,
            } => {
                let targets = self.hitlist_targets(hitlist, subdirectory.as_deref())?;
                match &self.session.output {
                    OutputMode::SingleFile(path) => self.analyze_single_workbook(&targets, path),
                    OutputMode::PerFile => {
                        let mut report = SessionReport::default();
                        for (input, identifier) in &targets {
                            let output = analyzed_output_path(input);
                            self.analyze_standalone(input, &output, identifier, &mut report)?;
                        }
                        Ok(report)
                    }
                }
            }
        }
    }

    /// Input files and run identifiers, in hitlist order.
    pub fn hitlist_targets(
        &self,
        hitlist: &Path,
        subdirectory: Option<&Path>,
    ) -> Result<Vec<RunTarget>> {
        let entries = read_list(hitlist)?;
        if entries.is_empty() {
            return Err(AnalyzerError::Configuration(format!(
                "hitlist '{}' has no entries",
                hitlist.display()
            )));
        }
        let inputs: Vec<PathBuf> = entries
            .iter()
            .map(|entry| resolve_entry(entry, subdirectory))
            .collect();

        let identifiers = match &self.session.naming {
            SheetNaming::Derived => {
                let layout = self.session.layout;
                let mut taken: HashSet<String> =
                    RESERVED_SHEET_NAMES.iter().map(|n| n.to_string()).collect();
                inputs
                    .iter()
                    .map(|input| -> Result<String> {
                        let base = identifier_for(input, layout)?;
                        Ok(unique_identifier(base, identifier_limit(layout), &mut taken))
                    })
                    .collect::<Result<Vec<_>>>()?
            }
            SheetNaming::Custom(path) => {
                let names = read_list(path)?;
                if names.len() != inputs.len() {
                    return Err(AnalyzerError::Configuration(format!(
                        "hitlist '{}' has {} entries but sheet-name list '{}' has {}",
                        hitlist.display(),
                        inputs.len(),
                        path.display(),
                        names.len()
                    )));
                }
                names
            }
        };

        Ok(inputs.into_iter().zip(identifiers).collect())
    }

    /// Every run into one shared workbook, then the meta-analysis, then one save.
    pub fn analyze_single_workbook(
        &self,
        targets: &[RunTarget],
        output: &Path,
    ) -> Result<SessionReport> {
        info!("Exporting analysis to single file: {}", output.display());
        let constants = &self.session.constants;
        let mut doc = Document::new();
        let model = ConstantsModel::install(&mut doc, CONSTANTS_SHEET, constants)?;
        if self.session.include_readme {
            write_readme(&mut doc, &model)?;
        }
        let engine = RowDerivationEngine::new(model.registry())?;
        let assembler = RunAssembler::new(&engine);

        let mut report = SessionReport::default();
        let mut chart_regions = Vec::new();
        for (input, identifier) in targets {
            let run = assembler.assemble(
                CsvRowSource::open(input)?,
                &mut doc,
                self.session.layout,
                identifier,
            )?;
            chart_regions.extend(run.placement.graphs_sheet.clone());
            report.runs.push(self.finish_run(&run, input, constants)?);
            info!("{} analyzed", input.display());
        }

        report.meta_rows = MetaAggregator::new(model.registry())?
            .with_chart_regions(chart_regions)
            .build(&mut doc)?;
        doc.save(output)?;
        report.outputs.push(output.to_path_buf());
        info!("Analysis complete: {} run(s) in {}", report.runs.len(), output.display());
        Ok(report)
    }

    /// One run in its own workbook: `Data`, `Constants`, `Graphs`.
    pub fn analyze_standalone(
        &self,
        input: &Path,
        output: &Path,
        identifier: &str,
        report: &mut SessionReport,
    ) -> Result<()> {
        let constants = &self.session.constants;
        let mut doc = Document::new();
        doc.add_sheet(DATA_SHEET)?;
        let model = ConstantsModel::install(&mut doc, CONSTANTS_SHEET, constants)?;
        doc.add_sheet(GRAPHS_SHEET)?;
        let engine = RowDerivationEngine::new(model.registry())?;

        let run = RunAssembler::new(&engine).assemble_into(
            CsvRowSource::open(input)?,
            &mut doc,
            RunPlacement::standalone(),
            identifier,
        )?;
        report.runs.push(self.finish_run(&run, input, constants)?);

        doc.save(output)?;
        report.outputs.push(output.to_path_buf());
        info!("{} analyzed into {}", input.display(), output.display());
        Ok(())
    }

    /// Numeric summary and optional preview for an assembled run.
    fn finish_run(&self, run: &Run, input: &Path, c: &PhysicalConstants) -> Result<RunReport> {
        let series = RunSeries::evaluate(&run.samples, c);
        let summary = series.summarize(c);
        match summary.mean_drag_area_ft2 {
            Some(area) => info!(
                "  {}: {} rows, mean drag area {:.3} ft^2 (Cd {:.3}) over {} gated samples",
                run.identifier,
                summary.samples,
                area,
                summary.mean_drag_coefficient.unwrap_or(f64::NAN),
                summary.gated_samples
            ),
            None => warn!(
                "  {}: {} rows, no sample reached windspeed {} and force {}",
                run.identifier, summary.samples, c.windspeed_threshold, c.force_threshold
            ),
        }
        debug!(
            "  {}: duration {:.0} ms, peak windspeed {:.3} ft/s, peak averaged force {:.3} lbf",
            run.identifier, summary.duration_ms, summary.peak_windspeed_ft_s, summary.peak_force_lbf
        );

        if let Some(dir) = &self.session.preview_directory {
            std::fs::create_dir_all(dir)?;
            plot_run_preview(&series, &run.identifier, &preview_path(dir, &run.identifier))?;
        }

        Ok(RunReport {
            identifier: run.identifier.clone(),
            input: input.to_path_buf(),
            usable_rows: run.usable_rows(),
            summary,
        })
    }
}

fn identifier_limit(layout: LayoutMode) -> usize {
    match layout {
        LayoutMode::Combined => MAX_SHEET_NAME_LEN,
        LayoutMode::Split => MAX_SHEET_NAME_LEN - GRAPHS_SHEET.len() - 1,
    }
}

/// Run identifier from an input path, short enough for its layout's region names.
fn identifier_for(input: &Path, layout: LayoutMode) -> Result<String> {
    let name: String = derive_sheet_name(input)
        .chars()
        .take(identifier_limit(layout))
        .collect();
    let name = name.trim().to_string();
    if name.is_empty() {
        return Err(AnalyzerError::Configuration(format!(
            "cannot derive a sheet name from '{}'",
            input.display()
        )));
    }
    Ok(name)
}

/// `base`, or `base` with the first free numeric suffix (`name1`, `name2`, ...)
/// when it is already in `taken`. Comparison ignores case; the result is added to `taken`.
fn unique_identifier(base: String, limit: usize, taken: &mut HashSet<String>) -> String {
    let mut candidate = base.clone();
    let mut n = 1u32;
    while taken.contains(&candidate.to_lowercase()) {
        let suffix = n.to_string();
        let stem: String = base.chars().take(limit.saturating_sub(suffix.len())).collect();
        candidate = format!("{}{suffix}", stem.trim_end());
        n += 1;
    }
    if candidate != base {
        warn!("Sheet name '{}' is taken; run written as '{}'", base, candidate);
    }
    taken.insert(candidate.to_lowercase());
    candidate
}

/// Column meanings and constant titles, for readers of the workbook.
fn write_readme<S: OutputSink + ?Sized>(sink: &mut S, model: &ConstantsModel) -> Result<()> {
    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    sink.add_sheet(README_SHEET)?;

    for (col, header) in ["Column", "Header", "Meaning"].into_iter().enumerate() {
        sink.write_cell(README_SHEET, 1, col as u16 + 1, text(header), None)?;
    }
    let mut row = 2;
    for column in Column::all() {
        sink.write_cell(README_SHEET, row, 1, text(&column.letter()), None)?;
        sink.write_cell(README_SHEET, row, 2, text(column.header()), None)?;
        sink.write_cell(README_SHEET, row, 3, text(column.description()), None)?;
        row += 1;
    }

    row += 1;
    for (col, header) in ["Constant", "Converted", "Description"].into_iter().enumerate() {
        sink.write_cell(README_SHEET, row, col as u16 + 1, text(header), None)?;
    }
    for constant in model.constants() {
        row += 1;
        sink.write_cell(README_SHEET, row, 1, text(&constant.name), None)?;
        if let Some(converted) = &constant.converted_name {
            sink.write_cell(README_SHEET, row, 2, text(converted), None)?;
        }
        sink.write_cell(README_SHEET, row, 3, text(&constant.title), None)?;
    }
    space_columns(sink, README_SHEET, row, Some(3))?;
    Ok(())
}


// src/orchestrator.rs
