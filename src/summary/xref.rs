//! Summary cross-reference: output id to summary id, per summary set

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use csv::Writer;
use log::{debug, info, warn};

use super::grouping::group_by_oed;
use super::mapping::{output_ids, SummaryLevel};
use crate::error::Result;
use crate::settings::SummarySetDefinition;
use crate::table::{chunk_size, Table};

/// One row of a summary xref file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XrefRow {
    /// `coverage_id` for ground-up, `output` for insured loss
    pub id: i64,
    pub summary_id: u64,
    pub summaryset_id: u32,
}

/// Cross-reference for one loss level, summary sets in definition order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryXref {
    pub level: SummaryLevel,
    pub rows: Vec<XrefRow>,
}

impl SummaryXref {
    /// Name of the output identifier column
    pub fn key_column(&self) -> &'static str {
        self.level.xref_key()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows belonging to one summary set
    pub fn summary_set(&self, summaryset_id: u32) -> impl Iterator<Item = &XrefRow> + '_ {
        self.rows.iter().filter(move |r| r.summaryset_id == summaryset_id)
    }

    /// Write as CSV with columns `<key>,summary_id,summaryset_id`
    pub fn write_csv_to<W: Write>(&self, writer: W) -> Result<()> {
        let mut writer = Writer::from_writer(writer);
        writer.write_record([self.key_column(), "summary_id", "summaryset_id"])?;

        let chunk = chunk_size(self.rows.len());
        for (i, row) in self.rows.iter().enumerate() {
            writer.write_record([
                row.id.to_string(),
                row.summary_id.to_string(),
                row.summaryset_id.to_string(),
            ])?;
            if (i + 1) % chunk == 0 {
                writer.flush()?;
            }
        }
        writer.flush()?;
        Ok(())
    }
}

/// Build the summary xref for a mapping from its summary set definitions
///
/// The level, and so the key column, follows from the mapping: one holding
/// `output_id` is an insured-loss mapping. Sets without a column selection
/// put every output in summary 1.
pub fn get_summary_xref(
    mapping: &Table,
    exposure: &Table,
    summaries: &[SummarySetDefinition],
) -> Result<SummaryXref> {
    let level = SummaryLevel::of_mapping(mapping);
    let ids = output_ids(mapping, level)?;
    let mut rows = Vec::with_capacity(ids.len() * summaries.len());

    for summary_set in summaries {
        let summary_ids = match summary_set.column_selection()? {
            Some(columns) => {
                debug!("summary set {}: grouping by {:?}", summary_set.id, columns);
                group_by_oed(mapping, exposure, &columns)?
            }
            None => {
                debug!("summary set {}: single group", summary_set.id);
                vec![Some(1); ids.len()]
            }
        };

        let before = rows.len();
        rows.extend(ids.iter().zip(summary_ids).filter_map(|(&id, summary_id)| {
            summary_id.map(|summary_id| XrefRow {
                id,
                summary_id,
                summaryset_id: summary_set.id,
            })
        }));
        let dropped = ids.len() - (rows.len() - before);
        if dropped > 0 {
            warn!(
                "summary set {}: {} outputs have no exposure row and are left out",
                summary_set.id, dropped
            );
        }
    }

    Ok(SummaryXref { level, rows })
}

/// Write a summary xref as `gulsummaryxref.csv` / `fmsummaryxref.csv`
pub fn write_xref_file(xref: &SummaryXref, target_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(target_dir)?;
    let path = target_dir.join(xref.level.xref_file_name());
    xref.write_csv_to(File::create(&path)?)?;
    info!("wrote summary xref {} ({} rows)", path.display(), xref.len());
    Ok(path)
}
