//! In-memory tables for output records, exposure records and summary mappings

mod value;
mod frame;
pub mod io;

pub use value::Value;
pub use frame::Table;
pub use io::{chunk_size, MAX_WRITE_CHUNK};
