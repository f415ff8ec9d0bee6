//! Named default summary groupings usable as `oed_fields` strings

use crate::error::{Result, SummaryError};

/// `(name, columns)`; `None` means a single group holding every output
pub const DEFAULT_GROUPINGS: [(&str, Option<&[&str]>); 6] = [
    ("prog", None),
    ("state", Some(&["countrycode", "areacode"])),
    ("county", Some(&["geogname1"])),
    ("location", Some(&["locnumber"])),
    // Occupancy stands in until line of business is carried on the account file
    ("lob", Some(&["occupancycode"])),
    ("policy", Some(&["polnumber"])),
];

/// Columns for a named default grouping
pub fn default_grouping(name: &str) -> Result<Option<&'static [&'static str]>> {
    DEFAULT_GROUPINGS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, cols)| *cols)
        .ok_or_else(|| SummaryError::InvalidGrouping(name.to_string()))
}
