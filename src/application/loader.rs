//! Record file loading.
//!
//! Two formats are understood:
//! - JSON: a top-level array of objects, `[{"id": 1, "parent": "root"}, ...]`
//! - TOML: an array of tables under `records`, `[[records]]`
//!
//! Every object needs `id` and `parent`; other keys are kept as payload.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{IndexOptions, Record, TreeIndex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordFormat {
    Json,
    Toml,
}

impl RecordFormat {
    /// Pick the format from the file extension.
    pub fn from_path(path: &Path) -> ApplicationResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(RecordFormat::Json),
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Ok(RecordFormat::Toml),
            _ => Err(ApplicationError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TomlRecords {
    #[serde(default)]
    records: Vec<Record>,
}

/// Parse records from in-memory content.
pub fn parse_records(content: &str, format: RecordFormat) -> ApplicationResult<Vec<Record>> {
    parse_named(content, format, "input")
}

fn parse_named(
    content: &str,
    format: RecordFormat,
    source_name: &str,
) -> ApplicationResult<Vec<Record>> {
    let parse_err = |message: String| ApplicationError::Parse {
        source_name: source_name.to_string(),
        message,
    };

    match format {
        RecordFormat::Json => serde_json::from_str(content).map_err(|e| parse_err(e.to_string())),
        RecordFormat::Toml => toml::from_str::<TomlRecords>(content)
            .map(|file| file.records)
            .map_err(|e| parse_err(e.to_string())),
    }
}

fn read_source(path: &Path) -> ApplicationResult<String> {
    fs::read_to_string(path).map_err(|e| ApplicationError::OperationFailed {
        context: format!("cannot read record file {}", path.display()),
        source: Box::new(e),
    })
}

/// Read and parse a record file, format chosen by extension.
#[instrument(level = "debug")]
pub fn load_records(path: &Path) -> ApplicationResult<Vec<Record>> {
    let format = RecordFormat::from_path(path)?;
    let content = read_source(path)?;
    let records = parse_named(&content, format, &path.display().to_string())?;
    debug!(count = records.len(), ?format, "records loaded");
    Ok(records)
}

/// Load a record file and build the index over it.
pub fn load_index(path: &Path, options: IndexOptions) -> ApplicationResult<TreeIndex> {
    let records = load_records(path)?;
    Ok(TreeIndex::with_options(records, options)?)
}
