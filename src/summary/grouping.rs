//! Assigning summary ids for one OED column grouping

use super::factorization::factorize;
use super::merge::{indexed_exposure_columns, oed_columns};
use crate::catalog::SOURCE_IDX_LOC;
use crate::error::Result;
use crate::table::{Table, Value};

/// Summary id of every mapping row for a grouping over `oed_col_group`
///
/// Columns already on the mapping are used directly; the rest are joined in
/// from the exposure table on `loc_idx`. Missing values are grouped as `0`.
/// The result is aligned with the mapping rows: `None` marks a row with no
/// exposure counterpart, which belongs to no group. Ids are dense over the
/// remaining rows, assigned in row order starting at 1.
pub fn group_by_oed<S: AsRef<str>>(
    mapping: &Table,
    exposure: &Table,
    oed_col_group: &[S],
) -> Result<Vec<Option<u64>>> {
    let group_cols = oed_columns(oed_col_group);
    let exposure_cols: Vec<String> = group_cols
        .iter()
        .filter(|c| !mapping.has_column(c))
        .cloned()
        .collect();

    // (mapping row, exposure row) for every row taking part in the grouping
    let (rows, exposure_table) = if exposure_cols.is_empty() {
        ((0..mapping.len()).map(|r| (r, 0)).collect::<Vec<_>>(), Table::new())
    } else {
        let indexed = indexed_exposure_columns(exposure, &exposure_cols)?;
        mapping.require(SOURCE_IDX_LOC, "summary mapping")?;
        let pairs = mapping.join_positions(&[SOURCE_IDX_LOC], &indexed, &[SOURCE_IDX_LOC])?;
        (pairs, indexed)
    };

    let sources = group_cols
        .iter()
        .map(|c| {
            if mapping.has_column(c) {
                mapping.column(c).map(|v| (v, true))
            } else {
                exposure_table.column(c).map(|v| (v, false))
            }
        })
        .collect::<Result<Vec<_>>>()?;

    let tuples = rows.iter().map(|&(m, e)| {
        sources
            .iter()
            .map(|&(values, on_mapping)| {
                let v = &values[if on_mapping { m } else { e }];
                if v.is_null() {
                    Value::Int(0)
                } else {
                    v.clone()
                }
            })
            .collect::<Vec<_>>()
    });
    let codes = factorize(tuples).codes;

    let mut summary_ids = vec![None; mapping.len()];
    for (&(m, _), code) in rows.iter().zip(codes) {
        summary_ids[m] = Some(code);
    }
    Ok(summary_ids)
}
