//! Summary runner for a model run directory
//!
//! Loads the source exposure once, then builds the summary xref for each
//! requested loss level without re-reading it.

use std::fs::File;
use std::path::{Path, PathBuf};

use log::info;

use crate::catalog::{INPUT_DIR, LOCATION_FILE};
use crate::error::{Result, SummaryError};
use crate::exposure::{summarize_exposure, write_exposure_summary, ExposureSummaryReport};
use crate::settings::{AnalysisSettings, OedHierarchy, RiLayers};
use crate::summary::{get_summary_mapping, get_summary_xref, write_mapping_file, write_xref_file, SummaryLevel};
use crate::table::Table;

/// Which optional inputs were prepared for the run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct XrefOptions {
    /// Account (policy) inputs were supplied, so insured-loss files exist
    pub il: bool,
    /// Reinsurance inputs were supplied, so `ri_layers.json` exists
    pub ri: bool,
}

/// Pre-loaded summary runner for one model run directory
///
/// # Example
/// ```ignore
/// let runner = SummaryRunner::load("runs/ProgOasis-20190501145127")?;
/// let settings = AnalysisSettings::from_path("analysis_settings.json")?;
/// let written = runner.generate_summaryxref_files(&settings, XrefOptions { il: true, ri: false })?;
/// ```
#[derive(Debug, Clone)]
pub struct SummaryRunner {
    run_dir: PathBuf,
    /// Source exposure (`input/location.csv`)
    exposure: Table,
}

impl SummaryRunner {
    /// Create a runner by loading the source exposure from the run directory
    pub fn load<P: AsRef<Path>>(run_dir: P) -> Result<Self> {
        let run_dir = run_dir.as_ref().to_path_buf();
        let exposure = Table::from_csv_path(
            run_dir.join(INPUT_DIR).join(LOCATION_FILE),
            "No source exposure file found.",
        )?;
        Ok(Self { run_dir, exposure })
    }

    /// Create a runner with an exposure table already in memory
    pub fn with_exposure<P: AsRef<Path>>(run_dir: P, exposure: Table) -> Self {
        Self {
            run_dir: run_dir.as_ref().to_path_buf(),
            exposure,
        }
    }

    pub fn run_dir(&self) -> &Path {
        &self.run_dir
    }

    pub fn exposure(&self) -> &Table {
        &self.exposure
    }

    fn input_dir(&self) -> PathBuf {
        self.run_dir.join(INPUT_DIR)
    }

    /// Load a persisted summary mapping from `input/`
    pub fn load_summary_map(&self, level: SummaryLevel) -> Result<Table> {
        Table::from_csv_path(
            self.input_dir().join(level.mapping_file_name()),
            "No summary map file found.",
        )
    }

    /// Write the summary xref file for every requested loss level
    ///
    /// Levels run in order ground-up, insured loss, reinsurance. A failure
    /// stops at that level; files of levels already done stay on disk.
    /// Returns the paths written.
    pub fn generate_summaryxref_files(
        &self,
        settings: &AnalysisSettings,
        options: XrefOptions,
    ) -> Result<Vec<PathBuf>> {
        let mut written = Vec::new();

        if settings.gul_output {
            let gul_map = self.load_summary_map(SummaryLevel::GroundUp)?;
            let summaries = AnalysisSettings::summaries(&settings.gul_summaries, "gul_summaries")?;
            let xref = get_summary_xref(&gul_map, &self.exposure, summaries)?;
            written.push(write_xref_file(&xref, &self.input_dir())?);
        }

        let mut il_map = None;
        if options.il && settings.il_output {
            let map = self.load_summary_map(SummaryLevel::InsuredLoss)?;
            let summaries = AnalysisSettings::summaries(&settings.il_summaries, "il_summaries")?;
            let xref = get_summary_xref(&map, &self.exposure, summaries)?;
            written.push(write_xref_file(&xref, &self.input_dir())?);
            il_map = Some(map);
        }

        if options.ri && settings.ri_output {
            let target_dir = RiLayers::load(&self.run_dir)?.output_dir(&self.run_dir)?;
            // reinsurance outputs share the insured-loss mapping
            let map = match il_map {
                Some(map) => map,
                None => self.load_summary_map(SummaryLevel::InsuredLoss)?,
            };
            let summaries = AnalysisSettings::summaries(&settings.ri_summaries, "ri_summaries")?;
            let xref = get_summary_xref(&map, &self.exposure, summaries)?;
            written.push(write_xref_file(&xref, &target_dir)?);
        }

        info!("summary xref generation complete: {} files", written.len());
        Ok(written)
    }
}

/// Build a summary mapping from input items and write it to `target_dir`
pub fn write_summary_mapping(
    inputs: &Table,
    hierarchy: &OedHierarchy,
    level: SummaryLevel,
    target_dir: &Path,
) -> Result<PathBuf> {
    let mapping = get_summary_mapping(inputs, hierarchy, level)?;
    write_mapping_file(&mapping, target_dir, level)
}

/// Load lookup errors for the exposure summary
///
/// An empty file means every key resolved and yields `None`; a path that is
/// not a file is a `MissingTable` error.
pub fn load_keys_errors(path: &Path) -> Result<Option<Table>> {
    if !path.is_file() {
        return Err(SummaryError::MissingTable {
            what: "No keys errors file found.".to_string(),
            path: path.to_path_buf(),
        });
    }
    let table = Table::from_csv_reader(File::open(path)?)?;
    if table.is_empty() {
        info!("keys errors file {} is empty", path.display());
        return Ok(None);
    }
    Ok(Some(table))
}

/// Summarize exposure and write `exposure_summary_report.json` to `target_dir`
pub fn write_exposure_report(
    gul_inputs: &Table,
    exposure: &Table,
    keys_errors: Option<&Table>,
    hierarchy: &OedHierarchy,
    target_dir: &Path,
) -> Result<(PathBuf, ExposureSummaryReport)> {
    let report = summarize_exposure(gul_inputs, exposure, keys_errors, hierarchy)?;
    let path = write_exposure_summary(&report.summary, target_dir)?;
    Ok((path, report))
}
