//! Summary grouping and factorization
//!
//! Builds the mapping between loss output ids and exposure rows, groups
//! outputs by OED attributes per summary set, and assembles the summary
//! cross-reference consumed by the loss aggregation engine:
//! - **factorize**: dense first-seen-order codes for value tuples
//! - **mapping**: summary mapping for ground-up and insured-loss levels
//! - **merge**: join exposure attributes onto a mapping
//! - **grouping**: summary ids for one column grouping
//! - **xref**: per-level cross-reference over every summary set

mod factorization;
mod mapping;
mod merge;
mod grouping;
mod xref;

pub use factorization::{factorize, factorize_columns, Factorized};
pub use mapping::{get_summary_mapping, write_mapping_file, SummaryLevel};
pub use merge::merge_oed_to_mapping;
pub use grouping::group_by_oed;
pub use xref::{get_summary_xref, write_xref_file, SummaryXref, XrefRow};
