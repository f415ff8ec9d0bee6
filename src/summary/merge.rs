//! Joining OED exposure attributes onto a summary mapping

use std::collections::HashMap;

use crate::catalog::SOURCE_IDX_LOC;
use crate::error::{Result, SummaryError};
use crate::table::{Table, Value};

/// Lower-case OED column names
pub(crate) fn oed_columns<S: AsRef<str>>(columns: &[S]) -> Vec<String> {
    columns.iter().map(|c| c.as_ref().to_lowercase()).collect()
}

/// The requested exposure columns plus the exposure row position as `loc_idx`
pub(crate) fn indexed_exposure_columns(exposure: &Table, columns: &[String]) -> Result<Table> {
    let positions = (0..exposure.len()).map(|i| Value::Int(i as i64)).collect();
    exposure
        .select(columns)
        .map_err(|_| missing_exposure_column(exposure, columns))?
        .with_column(SOURCE_IDX_LOC, positions)
}

fn missing_exposure_column(exposure: &Table, columns: &[String]) -> SummaryError {
    let column = columns
        .iter()
        .find(|c| !exposure.has_column(c))
        .cloned()
        .unwrap_or_default();
    SummaryError::missing_column(column, "exposure")
}

/// Add OED exposure columns to a summary mapping
///
/// Mapping rows are matched to exposure rows by `loc_idx`; rows without a
/// matching exposure row are dropped. Missing values in the requested columns
/// are then filled from `defaults`, e.g. `{"countrycode": "XX"}`.
pub fn merge_oed_to_mapping<S: AsRef<str>>(
    mapping: &Table,
    exposure: &Table,
    oed_column_set: &[S],
    defaults: Option<&HashMap<String, Value>>,
) -> Result<Table> {
    let columns = oed_columns(oed_column_set);
    let exposure_cols = indexed_exposure_columns(exposure, &columns)?;
    mapping.require(SOURCE_IDX_LOC, "summary mapping")?;

    let merged = mapping.inner_join(&[SOURCE_IDX_LOC], &exposure_cols, &[SOURCE_IDX_LOC])?;
    Ok(match defaults {
        Some(defaults) => {
            let requested: HashMap<String, Value> = defaults
                .iter()
                .map(|(name, value)| (name.to_lowercase(), value.clone()))
                .filter(|(name, _)| columns.contains(name))
                .collect();
            merged.fill_missing(&requested)
        }
        None => merged,
    })
}
