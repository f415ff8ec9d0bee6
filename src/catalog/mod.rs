//! Static configuration tables: default groupings, perils, coverage types,
//! lookup statuses and run-directory file names

mod grouping;
mod perils;

pub use grouping::{default_grouping, DEFAULT_GROUPINGS};
pub use perils::{peril_name, Peril, PERILS};

/// Row key linking output records back to their exposure row
pub const SOURCE_IDX_LOC: &str = "loc_idx";

/// Directory (under a run directory) holding prepared inputs
pub const INPUT_DIR: &str = "input";

/// Source exposure (location) file name
pub const LOCATION_FILE: &str = "location.csv";

pub const GUL_SUMMARY_MAP_FILE: &str = "gul_summary_map.csv";
pub const FM_SUMMARY_MAP_FILE: &str = "fm_summary_map.csv";

pub const GUL_SUMMARY_XREF_FILE: &str = "gulsummaryxref.csv";
pub const FM_SUMMARY_XREF_FILE: &str = "fmsummaryxref.csv";

/// Reinsurance layer metadata, at the run directory root
pub const RI_LAYERS_FILE: &str = "ri_layers.json";

pub const EXPOSURE_SUMMARY_FILE: &str = "exposure_summary_report.json";

/// Coverage type reported in the exposure summary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoverageType {
    pub name: &'static str,
    pub id: i64,
}

/// Coverage types broken out in the exposure summary, in report order
pub const SUPPORTED_COVERAGE_TYPES: [CoverageType; 4] = [
    CoverageType { name: "buildings", id: 1 },
    CoverageType { name: "other", id: 2 },
    CoverageType { name: "contents", id: 3 },
    CoverageType { name: "bi", id: 4 },
];

/// Status of the lookup that produced a successful key
pub const STATUS_SUCCESS: &str = "success";

/// Pseudo-status accumulating every other status
pub const STATUS_ALL: &str = "all";

/// Every lookup resolution status, in report order
pub const KEYS_STATUSES: [&str; 6] = ["success", "fail", "nomatch", "fail_ap", "fail_v", "notatrisk"];
