//! OED column names for the account/location/policy/portfolio hierarchy

use serde::Deserialize;

/// Names of the hierarchy columns as they appear (lower-cased) in the
/// output and exposure tables
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OedHierarchy {
    pub acc_id: String,
    pub loc_id: String,
    pub policy_id: String,
    pub portfolio_id: String,
    /// Multi-valued `;`-separated list of perils covered at a location
    pub loc_perils_covered: String,
}

impl Default for OedHierarchy {
    fn default() -> Self {
        Self {
            acc_id: "accnumber".to_string(),
            loc_id: "locnumber".to_string(),
            policy_id: "polnumber".to_string(),
            portfolio_id: "portnumber".to_string(),
            loc_perils_covered: "locperilscovered".to_string(),
        }
    }
}

impl OedHierarchy {
    /// Lower-case every name; OED columns are matched case-insensitively
    pub fn normalized(&self) -> Self {
        Self {
            acc_id: self.acc_id.to_lowercase(),
            loc_id: self.loc_id.to_lowercase(),
            policy_id: self.policy_id.to_lowercase(),
            portfolio_id: self.portfolio_id.to_lowercase(),
            loc_perils_covered: self.loc_perils_covered.to_lowercase(),
        }
    }
}
