//! Summary XRef - summary grouping for catastrophe loss runs
//!
//! This library provides:
//! - Summary mappings linking loss outputs (coverages, insured-loss outputs) to exposure rows
//! - Deterministic, dense summary ids per OED column grouping
//! - Summary cross-reference files for ground-up, insured and reinsurance losses
//! - Exposure summary reports of TIV and locations by peril and lookup status

pub mod error;
pub mod table;
pub mod catalog;
pub mod settings;
pub mod summary;
pub mod exposure;
pub mod pipeline;

// Re-export commonly used types
pub use error::{Result, SummaryError};
pub use table::{Table, Value};
pub use settings::{AnalysisSettings, OedHierarchy, SummarySetDefinition};
pub use summary::{SummaryLevel, SummaryXref};
pub use exposure::{ExposureSummaryReport, Diagnostic};
pub use pipeline::{SummaryRunner, XrefOptions};
