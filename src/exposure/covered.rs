//! Perils covered per location, from the multi-valued `locperilscovered` field

use std::collections::HashSet;

use crate::error::Result;
use crate::table::{Table, Value};

/// Separator between peril codes in `locperilscovered`
pub const PERIL_SEPARATOR: char = ';';

/// Every `(location, peril code)` pair declared as covered by the exposure
///
/// A location covering `WTC;WSS` contributes two pairs. Repeated pairs are
/// collapsed so matching against them never duplicates output rows.
pub fn covered_perils(exposure: &Table, loc_col: &str, perils_col: &str) -> Result<HashSet<(Value, String)>> {
    let locations = exposure.require(loc_col, "exposure")?;
    let perils = exposure.require(perils_col, "exposure")?;

    Ok(locations
        .iter()
        .zip(perils)
        .filter(|(_, perils)| !perils.is_null())
        .flat_map(|(loc, perils)| {
            perils
                .to_string()
                .split(PERIL_SEPARATOR)
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(|p| (loc.clone(), p.to_string()))
                .collect::<Vec<_>>()
        })
        .collect())
}

/// Positions of the rows whose `(location, peril)` is covered, in row order
pub fn covered_rows(
    records: &Table,
    loc_col: &str,
    covered: &HashSet<(Value, String)>,
) -> Result<Vec<usize>> {
    let locations = records.require(loc_col, "output records")?;
    let perils = records.require("peril_id", "output records")?;

    Ok((0..records.len())
        .filter(|&r| covered.contains(&(locations[r].clone(), perils[r].to_string())))
        .collect())
}
