//! Exposure summary report: insured values and location counts per peril,
//! split by keys lookup status

mod covered;
mod report;

pub use covered::{covered_perils, covered_rows, PERIL_SEPARATOR};
pub use report::{
    summarize_exposure, to_json_pretty, write_exposure_summary, Diagnostic, ExposureSummary,
    ExposureSummaryReport, PerilSummary, StatusSummary,
};
