//! Exposure summary: TIV and location counts by peril and lookup status

use std::collections::HashSet;
use std::fmt;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use log::{info, warn};
use serde::Serialize;

use super::covered::{covered_perils, covered_rows};
use crate::catalog::{
    peril_name, EXPOSURE_SUMMARY_FILE, KEYS_STATUSES, STATUS_ALL, STATUS_SUCCESS,
    SUPPORTED_COVERAGE_TYPES,
};
use crate::error::{Result, SummaryError};
use crate::settings::OedHierarchy;
use crate::summary::factorize;
use crate::table::{Table, Value};

/// Totals for one (peril, status) cell
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusSummary {
    pub tiv: f64,
    pub tiv_by_coverage: IndexMap<String, f64>,
    pub number_of_locations: u64,
}

impl StatusSummary {
    fn zero() -> Self {
        let tiv_by_coverage = SUPPORTED_COVERAGE_TYPES
            .iter()
            .map(|coverage| (coverage.name.to_string(), 0.0))
            .collect();
        Self {
            tiv: 0.0,
            tiv_by_coverage,
            number_of_locations: 0,
        }
    }

    fn accumulate(&mut self, other: &StatusSummary) {
        self.tiv += other.tiv;
        self.number_of_locations += other.number_of_locations;
        for (name, tiv) in self.tiv_by_coverage.iter_mut() {
            *tiv += other.tiv_by_coverage.get(name).copied().unwrap_or(0.0);
        }
    }
}

/// Status name (`all`, `success`, `fail`, ...) to totals
pub type PerilSummary = IndexMap<String, StatusSummary>;

/// Descriptive peril name to per-status totals
pub type ExposureSummary = IndexMap<String, PerilSummary>;

/// Data-quality issue found while summarizing; the run continues
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A peril id on the output records has no OED descriptive name
    UnknownPeril { peril_id: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnknownPeril { peril_id } => write!(
                f,
                "\"{}\" is not a valid OED peril ID/code. Please check the source exposure file.",
                peril_id
            ),
        }
    }
}

/// Exposure summary with the diagnostics raised while building it
#[derive(Debug, Clone, PartialEq)]
pub struct ExposureSummaryReport {
    pub summary: ExposureSummary,
    pub diagnostics: Vec<Diagnostic>,
}

/// Columns of output-shaped records read by the summary
struct Records<'a> {
    locations: &'a [Value],
    perils: &'a [Value],
    coverage_types: &'a [Value],
    tivs: &'a [Value],
    statuses: Option<&'a [Value]>,
    rows: Vec<usize>,
}

impl<'a> Records<'a> {
    fn new(table: &'a Table, loc_col: &str, rows: Vec<usize>, with_status: bool) -> Result<Self> {
        let name = if with_status { "keys errors" } else { "ground-up inputs" };
        Ok(Self {
            locations: table.require(loc_col, name)?,
            perils: table.require("peril_id", name)?,
            coverage_types: table.require("coverage_type_id", name)?,
            tivs: table.require("tiv", name)?,
            statuses: if with_status { Some(table.require("status", name)?) } else { None },
            rows,
        })
    }

    /// Totals over the rows for `peril_id`, optionally restricted to one status
    fn summarize(&self, peril_id: &str, status: Option<&str>) -> Result<StatusSummary> {
        let rows: Vec<usize> = self
            .rows
            .iter()
            .copied()
            .filter(|&r| text_eq(&self.perils[r], peril_id))
            .filter(|&r| match (status, self.statuses) {
                (Some(status), Some(statuses)) => text_eq(&statuses[r], status),
                _ => true,
            })
            .collect();

        let mut cell = StatusSummary::zero();
        for coverage in SUPPORTED_COVERAGE_TYPES {
            let mut tiv = 0.0;
            for &r in rows
                .iter()
                .filter(|&&r| self.coverage_types[r].as_i64() == Some(coverage.id))
            {
                tiv += tiv_value(&self.tivs[r])?;
            }
            cell.tiv_by_coverage.insert(coverage.name.to_string(), tiv);
            cell.tiv += tiv;
        }

        let locations: HashSet<&Value> = rows
            .iter()
            .map(|&r| &self.locations[r])
            .filter(|v| !v.is_null())
            .collect();
        cell.number_of_locations = locations.len() as u64;
        Ok(cell)
    }
}

/// Missing TIVs count as zero; anything else must be numeric
fn tiv_value(value: &Value) -> Result<f64> {
    if value.is_null() {
        return Ok(0.0);
    }
    value.as_f64().ok_or_else(|| SummaryError::InvalidValue {
        column: "tiv".to_string(),
        value: value.to_string(),
    })
}

fn text_eq(value: &Value, text: &str) -> bool {
    match value {
        Value::Str(s) => s == text,
        other => other.to_string() == text,
    }
}

/// Summarize insured values by peril and lookup status
///
/// Output records and lookup errors only count where the location declares
/// the record's peril as covered. `success` totals come from the ground-up
/// output records; every other status from `keys_errors` rows with that
/// status; `all` adds up every status. Perils with no OED name are skipped
/// and reported as diagnostics.
pub fn summarize_exposure(
    gul_inputs: &Table,
    exposure: &Table,
    keys_errors: Option<&Table>,
    hierarchy: &OedHierarchy,
) -> Result<ExposureSummaryReport> {
    let hierarchy = hierarchy.normalized();
    let loc_col = hierarchy.loc_id.as_str();
    let covered = covered_perils(exposure, loc_col, &hierarchy.loc_perils_covered)?;

    let success = Records::new(gul_inputs, loc_col, covered_rows(gul_inputs, loc_col, &covered)?, false)?;
    let errors = match keys_errors {
        Some(table) => Some(Records::new(table, loc_col, covered_rows(table, loc_col, &covered)?, true)?),
        None => None,
    };

    let peril_ids = gul_inputs.require("peril_id", "ground-up inputs")?;
    let model_peril_ids = factorize(peril_ids.iter().map(Value::to_string)).uniques;

    let mut summary = ExposureSummary::new();
    let mut diagnostics = Vec::new();
    for peril_id in &model_peril_ids {
        let Some(name) = peril_name(peril_id) else {
            let diagnostic = Diagnostic::UnknownPeril { peril_id: peril_id.clone() };
            warn!("{}", diagnostic);
            diagnostics.push(diagnostic);
            continue;
        };

        let mut all = StatusSummary::zero();
        let mut cells = Vec::with_capacity(KEYS_STATUSES.len());
        for status in KEYS_STATUSES {
            let cell = match (&errors, status == STATUS_SUCCESS) {
                (_, true) => success.summarize(peril_id, None)?,
                (Some(errors), false) => errors.summarize(peril_id, Some(status))?,
                (None, false) => StatusSummary::zero(),
            };
            all.accumulate(&cell);
            cells.push((status, cell));
        }

        let mut peril = PerilSummary::new();
        peril.insert(STATUS_ALL.to_string(), all);
        for (status, cell) in cells {
            peril.insert(status.to_string(), cell);
        }
        summary.insert(name.to_string(), peril);
    }

    Ok(ExposureSummaryReport { summary, diagnostics })
}

/// Serialize with 4-space indentation, non-ASCII kept as is
pub fn to_json_pretty(summary: &ExposureSummary) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    summary.serialize(&mut serializer)?;
    // serde_json only emits UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Write `exposure_summary_report.json` into `target_dir`
pub fn write_exposure_summary(summary: &ExposureSummary, target_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(target_dir)?;
    let path = target_dir.join(EXPOSURE_SUMMARY_FILE);
    let mut writer = BufWriter::new(File::create(&path)?);
    writer.write_all(to_json_pretty(summary)?.as_bytes())?;
    writer.flush()?;
    info!("wrote exposure summary {} ({} perils)", path.display(), summary.len());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn ints(v: &[i64]) -> Vec<Value> {
        v.iter().map(|&i| Value::Int(i)).collect()
    }

    fn floats(v: &[f64]) -> Vec<Value> {
        v.iter().map(|&f| Value::Float(f)).collect()
    }

    fn strs(v: &[&str]) -> Vec<Value> {
        v.iter().map(|&s| Value::from(s)).collect()
    }

    fn exposure() -> Table {
        Table::from_columns(vec![
            ("locnumber", ints(&[1, 2, 3])),
            ("locperilscovered", strs(&["WTC;WSS", "WTC", "QEQ"])),
        ])
        .unwrap()
    }

    fn gul_inputs() -> Table {
        Table::from_columns(vec![
            ("locnumber", ints(&[1, 2, 1, 3, 3])),
            ("peril_id", strs(&["WTC", "WTC", "WSS", "WTC", "XYZ"])),
            ("coverage_type_id", ints(&[1, 1, 3, 1, 1])),
            ("tiv", floats(&[100.0, 50.0, 25.0, 999.0, 7.0])),
        ])
        .unwrap()
    }

    fn keys_errors() -> Table {
        Table::from_columns(vec![
            ("locnumber", ints(&[2, 3])),
            ("peril_id", strs(&["WTC", "QEQ"])),
            ("coverage_type_id", ints(&[3, 1])),
            ("tiv", floats(&[10.0, 40.0])),
            ("status", strs(&["nomatch", "fail"])),
        ])
        .unwrap()
    }

    #[test]
    fn test_success_totals() {
        let report = summarize_exposure(&gul_inputs(), &exposure(), None, &OedHierarchy::default()).unwrap();
        let wtc = report.summary.get("tropical cyclone").unwrap();
        let success = wtc.get("success").unwrap();

        // location 3 does not cover WTC
        assert_relative_eq!(success.tiv, 150.0);
        assert_relative_eq!(*success.tiv_by_coverage.get("buildings").unwrap(), 150.0);
        assert_relative_eq!(*success.tiv_by_coverage.get("contents").unwrap(), 0.0);
        assert_eq!(success.number_of_locations, 2);

        let nomatch = wtc.get("nomatch").unwrap();
        assert_relative_eq!(nomatch.tiv, 0.0);
        assert_eq!(nomatch.number_of_locations, 0);
    }

    #[test]
    fn test_all_accumulates_every_status() {
        let errors = keys_errors();
        let report =
            summarize_exposure(&gul_inputs(), &exposure(), Some(&errors), &OedHierarchy::default()).unwrap();
        let wtc = report.summary.get("tropical cyclone").unwrap();

        let statuses: Vec<&str> = wtc.keys().map(String::as_str).collect();
        assert_eq!(statuses, vec!["all", "success", "fail", "nomatch", "fail_ap", "fail_v", "notatrisk"]);

        let nomatch = wtc.get("nomatch").unwrap();
        assert_relative_eq!(nomatch.tiv, 10.0);
        assert_relative_eq!(*nomatch.tiv_by_coverage.get("contents").unwrap(), 10.0);

        let all = wtc.get("all").unwrap();
        assert_relative_eq!(all.tiv, 160.0);
        assert_relative_eq!(*all.tiv_by_coverage.get("buildings").unwrap(), 150.0);
        assert_relative_eq!(*all.tiv_by_coverage.get("contents").unwrap(), 10.0);
        // per-status counts are summed
        assert_eq!(all.number_of_locations, 3);

        // QEQ only appears in the keys errors, not in the model perils
        assert!(report.summary.get("earthquake shake only").is_none());
    }

    #[test]
    fn test_unknown_peril_is_a_diagnostic() {
        let report = summarize_exposure(&gul_inputs(), &exposure(), None, &OedHierarchy::default()).unwrap();
        assert_eq!(
            report.diagnostics,
            vec![Diagnostic::UnknownPeril { peril_id: "XYZ".to_string() }]
        );
        let perils: Vec<&str> = report.summary.keys().map(String::as_str).collect();
        assert_eq!(perils, vec!["tropical cyclone", "storm surge"]);
    }

    #[test]
    fn test_non_numeric_tiv_is_rejected() {
        let gul = gul_inputs()
            .with_column("tiv", vec![100.0.into(), "n/a".into(), 25.0.into(), 999.0.into(), 7.0.into()])
            .unwrap();
        let err = summarize_exposure(&gul, &exposure(), None, &OedHierarchy::default()).unwrap_err();
        assert!(
            matches!(err, SummaryError::InvalidValue { ref column, ref value } if column == "tiv" && value == "n/a")
        );
    }

    #[test]
    fn test_missing_tiv_counts_as_zero() {
        let gul = gul_inputs()
            .with_column("tiv", vec![100.0.into(), Value::Null, 25.0.into(), 999.0.into(), 7.0.into()])
            .unwrap();
        let report = summarize_exposure(&gul, &exposure(), None, &OedHierarchy::default()).unwrap();
        let success = report.summary.get("tropical cyclone").unwrap().get("success").unwrap();
        assert_relative_eq!(success.tiv, 100.0);
        assert_eq!(success.number_of_locations, 2);
    }

    #[test]
    fn test_json_layout() {
        let mut summary = ExposureSummary::new();
        let mut peril = PerilSummary::new();
        peril.insert("all".to_string(), StatusSummary::zero());
        summary.insert("tropical cyclone".to_string(), peril);

        let json = to_json_pretty(&summary).unwrap();
        assert!(json.starts_with("{\n    \"tropical cyclone\": {\n        \"all\": {\n            \"tiv\": 0.0,"));
        assert!(json.contains("\"number_of_locations\": 0"));
    }

    #[test]
    fn test_non_ascii_is_preserved() {
        let mut summary = ExposureSummary::new();
        summary.insert("tempête".to_string(), PerilSummary::new());
        let dir = tempfile::tempdir().unwrap();
        let path = write_exposure_summary(&summary, dir.path()).unwrap();
        assert_eq!(path.file_name().unwrap(), EXPOSURE_SUMMARY_FILE);
        assert_eq!(std::fs::read_to_string(path).unwrap(), "{\n    \"tempête\": {}\n}");
    }
}
