//! Reinsurance layer metadata (`ri_layers.json`)

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::catalog::RI_LAYERS_FILE;
use crate::error::{Result, SummaryError};

/// One inuring layer as recorded by the reinsurance input step
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RiLayer {
    pub inuring_priority: i64,
    pub risk_level: String,
    pub directory: PathBuf,
}

/// Layers keyed by layer number, as written (`"1"`, `"2"`, ...)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct RiLayers(pub BTreeMap<String, RiLayer>);

impl RiLayers {
    /// Read `ri_layers.json` from a run directory
    pub fn load(run_dir: &Path) -> Result<Self> {
        let path = run_dir.join(RI_LAYERS_FILE);
        if !path.is_file() {
            return Err(SummaryError::MissingTable {
                what: "No reinsurance layers file found.".to_string(),
                path,
            });
        }
        let file = File::open(path)?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Layer with the highest layer number, compared numerically
    pub fn max_layer(&self) -> Result<(u32, &RiLayer)> {
        let mut best: Option<(u32, &RiLayer)> = None;
        for (key, layer) in &self.0 {
            let number: u32 = key
                .trim()
                .parse()
                .map_err(|_| SummaryError::InvalidLayerKey(key.clone()))?;
            if best.map_or(true, |(n, _)| number > n) {
                best = Some((number, layer));
            }
        }
        best.ok_or(SummaryError::NoReinsuranceLayers)
    }

    /// Directory for reinsurance summary outputs: the final layer's directory
    /// name, relocated under `run_dir`
    pub fn output_dir(&self, run_dir: &Path) -> Result<PathBuf> {
        let (number, layer) = self.max_layer()?;
        let name = layer
            .directory
            .file_name()
            .ok_or_else(|| SummaryError::InvalidLayerKey(number.to_string()))?;
        Ok(run_dir.join(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LAYERS: &str = r#"{
        "1": {"inuring_priority": 1, "risk_level": "LOC", "directory": "/runs/ProgOasis-20190501145127/RI_1"},
        "2": {"inuring_priority": 2, "risk_level": "ACC", "directory": "/runs/ProgOasis-20190501145127/RI_2"},
        "10": {"inuring_priority": 3, "risk_level": "", "directory": "/runs/ProgOasis-20190501145127/RI_10"}
    }"#;

    #[test]
    fn test_max_layer_is_numeric() {
        let layers = RiLayers::from_json_str(LAYERS).unwrap();
        // "2" > "10" as strings; numerically layer 10 wins
        let (number, layer) = layers.max_layer().unwrap();
        assert_eq!(number, 10);
        assert_eq!(layer.inuring_priority, 3);
    }

    #[test]
    fn test_output_dir_uses_layer_basename() {
        let layers = RiLayers::from_json_str(LAYERS).unwrap();
        let dir = layers.output_dir(Path::new("/tmp/run")).unwrap();
        assert_eq!(dir, PathBuf::from("/tmp/run/RI_10"));
    }

    #[test]
    fn test_bad_layer_files() {
        let empty = RiLayers::from_json_str("{}").unwrap();
        assert!(matches!(empty.max_layer().unwrap_err(), SummaryError::NoReinsuranceLayers));

        let named = RiLayers::from_json_str(
            r#"{"top": {"inuring_priority": 1, "risk_level": "LOC", "directory": "RI_1"}}"#,
        )
        .unwrap();
        assert!(matches!(named.max_layer().unwrap_err(), SummaryError::InvalidLayerKey(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            RiLayers::load(dir.path()).unwrap_err(),
            SummaryError::MissingTable { .. }
        ));
    }
}
