//! Analysis settings: which loss levels to output and their summary sets

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;

use crate::catalog::default_grouping;
use crate::error::{Result, SummaryError};

/// Column selection as written in `oed_fields`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum OedFields {
    /// Name of a default grouping, e.g. `"state"`
    Named(String),
    /// Explicit ordered list of OED column names
    Columns(Vec<String>),
}

/// One summary set requested for a loss level
///
/// Output flags (`eltcalc`, `leccalc`, ...) are accepted and ignored here.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SummarySetDefinition {
    pub id: u32,
    #[serde(default)]
    pub oed_fields: Option<OedFields>,
}

impl SummarySetDefinition {
    /// A definition grouping by an explicit column list
    pub fn by_columns<S: Into<String>>(id: u32, columns: impl IntoIterator<Item = S>) -> Self {
        Self {
            id,
            oed_fields: Some(OedFields::Columns(columns.into_iter().map(Into::into).collect())),
        }
    }

    /// A definition referring to a default grouping by name
    pub fn named(id: u32, name: &str) -> Self {
        Self {
            id,
            oed_fields: Some(OedFields::Named(name.to_string())),
        }
    }

    /// A definition with no column selection (single group)
    pub fn ungrouped(id: u32) -> Self {
        Self { id, oed_fields: None }
    }

    /// Resolve the columns to group by
    ///
    /// `None` means every output falls in one group: either `oed_fields` is
    /// absent or it names a default grouping without columns.
    pub fn column_selection(&self) -> Result<Option<Vec<String>>> {
        match &self.oed_fields {
            None => Ok(None),
            Some(OedFields::Named(name)) => Ok(default_grouping(name)?
                .map(|cols| cols.iter().map(|c| c.to_string()).collect())),
            Some(OedFields::Columns(cols)) if !cols.is_empty() => Ok(Some(cols.clone())),
            Some(OedFields::Columns(_)) => Err(SummaryError::MalformedSettings(format!(
                "summary set {} has an empty oed_fields list",
                self.id
            ))),
        }
    }
}

/// The parts of `analysis_settings.json` that drive summary generation
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalysisSettings {
    #[serde(default)]
    pub gul_output: bool,
    #[serde(default)]
    pub il_output: bool,
    #[serde(default)]
    pub ri_output: bool,
    #[serde(default)]
    pub gul_summaries: Option<Vec<SummarySetDefinition>>,
    #[serde(default)]
    pub il_summaries: Option<Vec<SummarySetDefinition>>,
    #[serde(default)]
    pub ri_summaries: Option<Vec<SummarySetDefinition>>,
}

impl AnalysisSettings {
    /// Load settings from a JSON file
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Summary sets for a requested level; absence is a settings error
    pub fn summaries<'a>(
        summaries: &'a Option<Vec<SummarySetDefinition>>,
        key: &str,
    ) -> Result<&'a [SummarySetDefinition]> {
        summaries
            .as_deref()
            .ok_or_else(|| SummaryError::MalformedSettings(format!("'{}' is not defined", key)))
    }
}
