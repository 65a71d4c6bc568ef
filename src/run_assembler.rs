// src/run_assembler.rs

use tracing::{debug, warn};

use crate::charts::run_chart;
use crate::constants::{
    CHART_ANCHOR_COMBINED, CHART_ANCHOR_SPLIT, DATA_SHEET, FIRST_DATA_ROW, GRAPHS_SHEET,
    HEADER_ROW, RUN_HEADER_DEPTH, ZOOM_COMBINED, ZOOM_SPLIT,
};
use crate::data_analysis::row_derivation::{DerivedRow, RowDerivationEngine};
use crate::data_analysis::sample_filter::{AcceptAll, SampleFilter};
use crate::data_input::raw_sample::RawSample;
use crate::error::{AnalyzerError, Result};
use crate::layout::{Column, RowExtent};
use crate::workbook::{space_columns, CellValue, OutputSink};

/// How one run is laid out inside a shared workbook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutMode {
    /// Data and chart in one region.
    #[default]
    Combined,
    /// Data and chart in two regions, `Data <id>` and `Graphs <id>`.
    Split,
}

/// Where a run's data and chart go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunPlacement {
    pub data_sheet: String,
    /// `None` puts the chart beside the data.
    pub graphs_sheet: Option<String>,
    pub zoom: Option<u16>,
    /// The caller created the regions already; otherwise the assembler adds
    /// them and a name already in use is an error.
    pub regions_exist: bool,
}

impl RunPlacement {
    pub fn for_layout(identifier: &str, mode: LayoutMode) -> Self {
        match mode {
            LayoutMode::Combined => Self {
                data_sheet: identifier.to_string(),
                graphs_sheet: None,
                zoom: Some(ZOOM_COMBINED),
                regions_exist: false,
            },
            LayoutMode::Split => Self {
                data_sheet: format!("{DATA_SHEET} {identifier}"),
                graphs_sheet: Some(format!("{GRAPHS_SHEET} {identifier}")),
                zoom: Some(ZOOM_SPLIT),
                regions_exist: false,
            },
        }
    }

    /// One run per workbook: fixed `Data` / `Graphs` regions, default zoom.
    /// The caller creates both regions first so they keep their place in the
    /// region order.
    pub fn standalone() -> Self {
        Self {
            data_sheet: DATA_SHEET.to_string(),
            graphs_sheet: Some(GRAPHS_SHEET.to_string()),
            zoom: None,
            regions_exist: true,
        }
    }

    fn chart_anchor(&self) -> (&str, (u32, u16)) {
        match &self.graphs_sheet {
            Some(graphs) => (graphs.as_str(), CHART_ANCHOR_SPLIT),
            None => (self.data_sheet.as_str(), CHART_ANCHOR_COMBINED),
        }
    }
}

/// One assembled run.
#[derive(Debug, Clone)]
pub struct Run {
    pub identifier: String,
    pub placement: RunPlacement,
    pub rows: Vec<DerivedRow>,
    /// Accepted samples, in row order.
    pub samples: Vec<RawSample>,
    pub extent: RowExtent,
    pub rejected: usize,
}

impl Run {
    pub fn usable_rows(&self) -> u32 {
        self.extent.row_count()
    }
}

pub struct RunAssembler<'a, F: SampleFilter = AcceptAll> {
    engine: &'a RowDerivationEngine,
    filter: F,
}

impl<'a> RunAssembler<'a, AcceptAll> {
    pub fn new(engine: &'a RowDerivationEngine) -> Self {
        Self {
            engine,
            filter: AcceptAll,
        }
    }
}

impl<'a, F: SampleFilter> RunAssembler<'a, F> {
    pub fn with_filter(engine: &'a RowDerivationEngine, filter: F) -> Self {
        Self { engine, filter }
    }

    pub fn assemble<S, I>(
        &self,
        rows: I,
        sink: &mut S,
        mode: LayoutMode,
        identifier: &str,
    ) -> Result<Run>
    where
        S: OutputSink + ?Sized,
        I: IntoIterator<Item = Result<RawSample>>,
    {
        self.assemble_into(rows, sink, RunPlacement::for_layout(identifier, mode), identifier)
    }

    /// Writes headers, every accepted row, the chart and column spacing.
    /// Regions named by `placement` are created here unless it says they exist.
    pub fn assemble_into<S, I>(
        &self,
        rows: I,
        sink: &mut S,
        placement: RunPlacement,
        identifier: &str,
    ) -> Result<Run>
    where
        S: OutputSink + ?Sized,
        I: IntoIterator<Item = Result<RawSample>>,
    {
        let data = placement.data_sheet.as_str();
        claim_sheet(sink, data, placement.regions_exist)?;
        if let Some(graphs) = &placement.graphs_sheet {
            claim_sheet(sink, graphs, placement.regions_exist)?;
        }
        if let Some(zoom) = placement.zoom {
            sink.set_zoom(data, zoom)?;
        }
        write_headers(sink, data)?;

        let mut next_row = FIRST_DATA_ROW;
        let mut derived = Vec::new();
        let mut samples = Vec::new();
        let mut rejected = 0usize;
        for sample in rows {
            let sample = sample?;
            if !self.filter.accept(&sample) {
                rejected += 1;
                continue;
            }
            let row = self.engine.derive_row(&sample, next_row);
            row.write_to(sink, data)?;
            derived.push(row);
            samples.push(sample);
            next_row += 1;
        }

        let extent = RowExtent::from_next_row(next_row);
        match samples.last() {
            Some(last) if !extent.is_empty() => {
                let (chart_sheet, (row, col)) = placement.chart_anchor();
                let chart = run_chart(data, extent, last.time_ms() as f64);
                sink.insert_chart(chart_sheet, row, col, chart)?;
            }
            _ => warn!("Run '{}' has no samples; header only, no chart", identifier),
        }

        space_columns(sink, data, RUN_HEADER_DEPTH, None)?;
        debug!(
            "Run '{}': {} row(s) into '{}', {} rejected",
            identifier,
            extent.row_count(),
            data,
            rejected
        );

        Ok(Run {
            identifier: identifier.to_string(),
            placement,
            rows: derived,
            samples,
            extent,
            rejected,
        })
    }
}

fn claim_sheet<S: OutputSink + ?Sized>(sink: &mut S, name: &str, exists: bool) -> Result<()> {
    match (exists, sink.has_sheet(name)) {
        (true, true) => Ok(()),
        (true, false) => Err(AnalyzerError::Sheet(format!("no sheet named '{name}'"))),
        (false, _) => sink.add_sheet(name),
    }
}

pub fn write_headers<S: OutputSink + ?Sized>(sink: &mut S, sheet: &str) -> Result<()> {
    for column in Column::all() {
        sink.write_cell(
            sheet,
            HEADER_ROW,
            column.position(),
            CellValue::Text(column.header().to_string()),
            None,
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_analysis::constants_model::ConstantsModel;
    use crate::physical::PhysicalConstants;
    use crate::workbook::Document;

    fn setup() -> (Document, RowDerivationEngine) {
        let mut doc = Document::new();
        let model =
            ConstantsModel::install(&mut doc, "Constants", &PhysicalConstants::default()).unwrap();
        let engine = RowDerivationEngine::new(model.registry()).unwrap();
        (doc, engine)
    }

    fn samples(n: usize) -> Vec<Result<RawSample>> {
        (0..n)
            .map(|i| Ok(RawSample::new(i as f64 * 0.1, 5.0 + i as f64, 2.0)))
            .collect()
    }

    #[test]
    fn test_combined_layout() {
        let (mut doc, engine) = setup();
        let run = RunAssembler::new(&engine)
            .assemble(samples(3), &mut doc, LayoutMode::Combined, "run_01")
            .unwrap();

        assert_eq!(run.extent, RowExtent { first: 2, last: 4 });
        assert_eq!(run.usable_rows(), 3);
        let sheet = doc.sheet("run_01").unwrap();
        assert_eq!(sheet.zoom(), Some(ZOOM_COMBINED));
        assert_eq!(sheet.charts().len(), 1);
        let placed = &sheet.charts()[0];
        assert_eq!((placed.row, placed.col), CHART_ANCHOR_COMBINED);
        assert_eq!(placed.chart.x_max, 200.0);
        assert_eq!(
            doc.cell("run_01", 1, 10).unwrap().value,
            CellValue::Text("Drag Area [CdSo] (ft^2)".into())
        );
        assert_eq!(doc.extent("run_01").unwrap(), "A1:K4");
    }

    #[test]
    fn test_split_layout() {
        let (mut doc, engine) = setup();
        RunAssembler::new(&engine)
            .assemble(samples(2), &mut doc, LayoutMode::Split, "run_01")
            .unwrap();
        assert_eq!(doc.sheet_names(), vec!["Constants", "Data run_01", "Graphs run_01"]);
        assert_eq!(doc.sheet("Data run_01").unwrap().zoom(), Some(ZOOM_SPLIT));
        assert!(doc.sheet("Data run_01").unwrap().charts().is_empty());
        let graphs = doc.sheet("Graphs run_01").unwrap();
        assert_eq!((graphs.charts()[0].row, graphs.charts()[0].col), CHART_ANCHOR_SPLIT);
        assert_eq!(graphs.charts()[0].chart.primary[0].sheet, "Data run_01");
    }

    #[test]
    fn test_rejected_samples_take_no_row() {
        let (mut doc, engine) = setup();
        let every_other = |s: &RawSample| s.windspeed_raw as i64 % 2 == 1;
        let run = RunAssembler::with_filter(&engine, every_other)
            .assemble(samples(4), &mut doc, LayoutMode::Combined, "r")
            .unwrap();
        // windspeeds 5, 6, 7, 8: 5 and 7 kept
        assert_eq!(run.rejected, 2);
        assert_eq!(run.extent.last, 3);
        assert_eq!(doc.cell("r", 3, 2).unwrap().value, CellValue::Number(7.0));
        assert_eq!(run.rows[1].row, 3);
    }

    #[test]
    fn test_empty_run_is_header_only() {
        let (mut doc, engine) = setup();
        let run = RunAssembler::new(&engine)
            .assemble(Vec::<Result<RawSample>>::new(), &mut doc, LayoutMode::Combined, "empty")
            .unwrap();
        assert!(run.rows.is_empty());
        assert!(run.extent.is_empty());
        assert!(doc.sheet("empty").unwrap().charts().is_empty());
        assert_eq!(doc.extent("empty").unwrap(), "A1:K1");
    }

    #[test]
    fn test_run_never_reuses_a_region() {
        let (mut doc, engine) = setup();
        let assembler = RunAssembler::new(&engine);
        assembler
            .assemble(samples(3), &mut doc, LayoutMode::Combined, "run_01")
            .unwrap();
        let err = assembler
            .assemble(samples(1), &mut doc, LayoutMode::Combined, "RUN_01")
            .unwrap_err();
        assert!(matches!(err, AnalyzerError::Sheet(_)));
        assert_eq!(doc.sheet("run_01").unwrap().charts().len(), 1);
        assert_eq!(doc.extent("run_01").unwrap(), "A1:K4");

        let err = assembler
            .assemble(samples(1), &mut doc, LayoutMode::Combined, "Constants")
            .unwrap_err();
        assert!(matches!(err, AnalyzerError::Sheet(_)));
        assert_eq!(doc.extent("Constants").unwrap(), "A1:C12");
    }

    #[test]
    fn test_standalone_placement_needs_its_regions() {
        let (mut doc, engine) = setup();
        let assembler = RunAssembler::new(&engine);
        assert!(matches!(
            assembler.assemble_into(samples(1), &mut doc, RunPlacement::standalone(), "solo"),
            Err(AnalyzerError::Sheet(_))
        ));

        doc.add_sheet(DATA_SHEET).unwrap();
        doc.add_sheet(GRAPHS_SHEET).unwrap();
        let run = assembler
            .assemble_into(samples(2), &mut doc, RunPlacement::standalone(), "solo")
            .unwrap();
        assert_eq!(run.usable_rows(), 2);
        assert_eq!(doc.sheet(GRAPHS_SHEET).unwrap().charts().len(), 1);
    }

    #[test]
    fn test_bad_sample_aborts_run() {
        let (mut doc, engine) = setup();
        let rows = vec![
            Ok(RawSample::new(0.0, 1.0, 1.0)),
            Err(crate::error::AnalyzerError::Configuration("boom".into())),
        ];
        assert!(RunAssembler::new(&engine)
            .assemble(rows, &mut doc, LayoutMode::Combined, "r")
            .is_err());
    }
}

// src/run_assembler.rs
