//! Summary mapping: the link between loss output ids and exposure rows

use std::fs;
use std::path::{Path, PathBuf};

use log::info;

use super::factorization::factorize;
use crate::catalog::{
    FM_SUMMARY_MAP_FILE, FM_SUMMARY_XREF_FILE, GUL_SUMMARY_MAP_FILE, GUL_SUMMARY_XREF_FILE,
    SOURCE_IDX_LOC,
};
use crate::error::{Result, SummaryError};
use crate::settings::OedHierarchy;
use crate::table::{Table, Value};

/// Loss level a summary mapping describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SummaryLevel {
    /// Ground-up loss; outputs are coverages
    GroundUp,
    /// Insured loss after policy terms; outputs are (item, layer) pairs.
    /// Reinsurance summaries share this mapping.
    InsuredLoss,
}

impl SummaryLevel {
    /// Infer the level of a loaded mapping from its columns
    pub fn of_mapping(mapping: &Table) -> Self {
        if mapping.has_column("output_id") {
            SummaryLevel::InsuredLoss
        } else {
            SummaryLevel::GroundUp
        }
    }

    /// Mapping column holding the output identifier
    pub fn id_column(&self) -> &'static str {
        match self {
            SummaryLevel::GroundUp => "coverage_id",
            SummaryLevel::InsuredLoss => "output_id",
        }
    }

    /// Name of the identifier column in the summary xref file
    pub fn xref_key(&self) -> &'static str {
        match self {
            SummaryLevel::GroundUp => "coverage_id",
            SummaryLevel::InsuredLoss => "output",
        }
    }

    pub fn mapping_file_name(&self) -> &'static str {
        match self {
            SummaryLevel::GroundUp => GUL_SUMMARY_MAP_FILE,
            SummaryLevel::InsuredLoss => FM_SUMMARY_MAP_FILE,
        }
    }

    pub fn xref_file_name(&self) -> &'static str {
        match self {
            SummaryLevel::GroundUp => GUL_SUMMARY_XREF_FILE,
            SummaryLevel::InsuredLoss => FM_SUMMARY_XREF_FILE,
        }
    }
}

/// Columns a summary mapping may carry besides the hierarchy ids
const MAPPING_COLUMNS: [&str; 9] = [
    SOURCE_IDX_LOC,
    "item_id",
    "layer_id",
    "coverage_id",
    "peril_id",
    "agg_id",
    "output_id",
    "coverage_type_id",
    "tiv",
];

/// Build the summary mapping from ground-up or insured-loss input items
///
/// Ground-up items are copied as they are. Insured-loss items are reduced to
/// the last level of the policy hierarchy with one row per
/// `(gul_input_id, layer_id)`, the first occurrence winning; each surviving
/// pair gets a dense `output_id` in row order and `agg_id` is set to the
/// item's `gul_input_id`. Either way only the mapping columns are kept, in
/// their input order.
pub fn get_summary_mapping(
    inputs: &Table,
    hierarchy: &OedHierarchy,
    level: SummaryLevel,
) -> Result<Table> {
    inputs.require(SOURCE_IDX_LOC, "input items")?;

    let mapping = match level {
        SummaryLevel::GroundUp => {
            inputs.require("coverage_id", "ground-up input items")?;
            inputs.clone()
        }
        SummaryLevel::InsuredLoss => insured_loss_outputs(inputs)?,
    };

    let hierarchy = hierarchy.normalized();
    let keep = [
        hierarchy.acc_id.as_str(),
        hierarchy.loc_id.as_str(),
        hierarchy.policy_id.as_str(),
        hierarchy.portfolio_id.as_str(),
    ];
    Ok(mapping.retain_columns(|name| keep.contains(&name) || MAPPING_COLUMNS.contains(&name)))
}

fn insured_loss_outputs(inputs: &Table) -> Result<Table> {
    let levels = inputs.require("level_id", "insured-loss input items")?;
    let gul_input_ids = inputs.require("gul_input_id", "insured-loss input items")?;
    let layer_ids = inputs.require("layer_id", "insured-loss input items")?;

    let max_level = levels.iter().filter_map(Value::as_i64).max();

    // first row of each (gul_input_id, layer_id) pair on the last level
    let mut seen = std::collections::HashSet::new();
    let rows: Vec<usize> = (0..inputs.len())
        .filter(|&r| max_level.is_some() && levels[r].as_i64() == max_level)
        .filter(|&r| seen.insert((&gul_input_ids[r], &layer_ids[r])))
        .collect();

    let outputs = inputs.take_rows(&rows);
    let pairs = outputs.tuples(&["gul_input_id", "layer_id"])?;
    let output_ids = factorize(pairs)
        .codes
        .into_iter()
        .map(|code| Value::Int(code as i64))
        .collect();
    let agg_ids = outputs.column("gul_input_id")?.to_vec();

    outputs
        .with_column("agg_id", agg_ids)?
        .with_column("output_id", output_ids)
        .map(|t| t.drop_column("item_id"))
}

/// Write a summary mapping as `gul_summary_map.csv` / `fm_summary_map.csv`
pub fn write_mapping_file(mapping: &Table, target_dir: &Path, level: SummaryLevel) -> Result<PathBuf> {
    fs::create_dir_all(target_dir)?;
    let path = target_dir.join(level.mapping_file_name());
    mapping.write_csv(&path)?;
    info!("wrote summary mapping {} ({} rows)", path.display(), mapping.len());
    Ok(path)
}

/// Integer output ids of a mapping, in row order
pub(crate) fn output_ids(mapping: &Table, level: SummaryLevel) -> Result<Vec<i64>> {
    let column = level.id_column();
    mapping
        .require(column, "summary mapping")?
        .iter()
        .map(|v| {
            v.as_i64().ok_or_else(|| SummaryError::InvalidValue {
                column: column.to_string(),
                value: v.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ints(v: &[i64]) -> Vec<Value> {
        v.iter().map(|&i| Value::Int(i)).collect()
    }

    fn il_inputs() -> Table {
        Table::from_columns(vec![
            ("locnumber", ints(&[1, 1, 1, 1, 2, 2])),
            ("accnumber", ints(&[7, 7, 7, 7, 7, 7])),
            ("loc_idx", ints(&[0, 0, 0, 0, 1, 1])),
            ("item_id", ints(&[1, 1, 1, 2, 3, 3])),
            ("gul_input_id", ints(&[5, 5, 5, 6, 8, 8])),
            ("layer_id", ints(&[1, 2, 2, 1, 1, 1])),
            ("level_id", ints(&[3, 3, 3, 3, 3, 1])),
            ("coverage_id", ints(&[1, 1, 1, 2, 3, 3])),
            ("tiv", ints(&[100, 100, 100, 50, 20, 20])),
            ("deductible", ints(&[0, 0, 0, 0, 0, 0])),
        ])
        .unwrap()
    }

    #[test]
    fn test_ground_up_is_projected_copy() {
        let gul = Table::from_columns(vec![
            ("loc_idx", ints(&[0, 1])),
            ("locnumber", ints(&[10, 11])),
            ("coverage_id", ints(&[1, 2])),
            ("areaperil_id", ints(&[99, 98])),
            ("tiv", ints(&[100, 50])),
        ])
        .unwrap();
        let mapping = get_summary_mapping(&gul, &OedHierarchy::default(), SummaryLevel::GroundUp).unwrap();
        assert_eq!(mapping.column_names(), &["loc_idx", "locnumber", "coverage_id", "tiv"]);
        assert_eq!(mapping.len(), 2);
        assert_eq!(SummaryLevel::of_mapping(&mapping), SummaryLevel::GroundUp);
    }

    #[test]
    fn test_insured_loss_dedups_by_item_and_layer() {
        let mapping =
            get_summary_mapping(&il_inputs(), &OedHierarchy::default(), SummaryLevel::InsuredLoss).unwrap();

        // level 1 row dropped, duplicate (5, 2) collapsed
        assert_eq!(mapping.len(), 4);
        assert!(!mapping.has_column("gul_input_id"));
        assert_eq!(mapping.column("layer_id").unwrap(), ints(&[1, 2, 1, 1]).as_slice());
        assert_eq!(mapping.column("agg_id").unwrap(), ints(&[5, 5, 6, 8]).as_slice());
        assert_eq!(mapping.column("output_id").unwrap(), ints(&[1, 2, 3, 4]).as_slice());
        assert!(!mapping.has_column("item_id"));
        assert!(!mapping.has_column("deductible"));
        assert_eq!(SummaryLevel::of_mapping(&mapping), SummaryLevel::InsuredLoss);
    }

    #[test]
    fn test_insured_loss_drops_pairs_below_last_level() {
        let inputs = Table::from_columns(vec![
            ("loc_idx", ints(&[0, 1, 0])),
            ("gul_input_id", ints(&[1, 2, 1])),
            ("layer_id", ints(&[1, 1, 1])),
            ("level_id", ints(&[1, 1, 2])),
            ("coverage_id", ints(&[1, 2, 1])),
        ])
        .unwrap();
        let mapping = get_summary_mapping(&inputs, &OedHierarchy::default(), SummaryLevel::InsuredLoss).unwrap();

        // gul_input_id 2 never reaches level 2
        assert_eq!(mapping.len(), 1);
        assert_eq!(mapping.column("agg_id").unwrap(), ints(&[1]).as_slice());
        assert_eq!(mapping.column("output_id").unwrap(), ints(&[1]).as_slice());
    }

    #[test]
    fn test_insured_loss_keeps_first_of_duplicate_pair() {
        let inputs = Table::from_columns(vec![
            ("loc_idx", ints(&[0, 1, 0])),
            ("gul_input_id", ints(&[5, 6, 5])),
            ("layer_id", ints(&[2, 1, 2])),
            ("level_id", ints(&[2, 2, 2])),
            ("coverage_id", ints(&[1, 2, 1])),
            ("tiv", ints(&[100, 50, 999])),
        ])
        .unwrap();
        let mapping = get_summary_mapping(&inputs, &OedHierarchy::default(), SummaryLevel::InsuredLoss).unwrap();

        assert_eq!(mapping.len(), 2);
        assert_eq!(mapping.column("tiv").unwrap(), ints(&[100, 50]).as_slice());
        assert_eq!(mapping.column("agg_id").unwrap(), ints(&[5, 6]).as_slice());
        assert_eq!(mapping.column("output_id").unwrap(), ints(&[1, 2]).as_slice());
    }

    #[test]
    fn test_insured_loss_missing_column() {
        let inputs = il_inputs().drop_column("level_id");
        let err = get_summary_mapping(&inputs, &OedHierarchy::default(), SummaryLevel::InsuredLoss)
            .unwrap_err();
        assert!(matches!(err, SummaryError::MissingColumn { ref column, .. } if column == "level_id"));
    }

    #[test]
    fn test_write_mapping_file_names() {
        let dir = tempfile::tempdir().unwrap();
        let mapping =
            get_summary_mapping(&il_inputs(), &OedHierarchy::default(), SummaryLevel::InsuredLoss).unwrap();
        let path = write_mapping_file(&mapping, dir.path(), SummaryLevel::InsuredLoss).unwrap();
        assert_eq!(path.file_name().unwrap(), FM_SUMMARY_MAP_FILE);

        let reloaded = Table::from_csv_path(&path, "No summary map file found.").unwrap();
        assert_eq!(reloaded, mapping);
        assert_eq!(output_ids(&reloaded, SummaryLevel::InsuredLoss).unwrap(), vec![1, 2, 3, 4]);
    }
}
