//! Application layer: loading record files and building indexes from them
//!
//! This layer does the I/O around the domain and turns failures into `ApplicationError`.

pub mod error;
pub mod loader;

pub use error::{ApplicationError, ApplicationResult};
pub use loader::{load_index, load_records, parse_records, RecordFormat};
