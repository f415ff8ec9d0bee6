//! Run configuration: analysis settings, reinsurance layers and OED hierarchy

mod analysis;
mod hierarchy;
mod ri_layers;

pub use analysis::{AnalysisSettings, OedFields, SummarySetDefinition};
pub use hierarchy::OedHierarchy;
pub use ri_layers::{RiLayer, RiLayers};
