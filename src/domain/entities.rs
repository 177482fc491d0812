//! Domain entities: records, identifiers and index options

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Identifier of a record.
///
/// Integers and strings are distinct: `1` never equals `"1"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Int(i64),
    Str(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Int(n) => write!(f, "{}", n),
            RecordId::Str(s) => write!(f, "{}", s),
        }
    }
}

/// Parses as an integer when possible, otherwise keeps the raw string.
impl FromStr for RecordId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.parse::<i64>()
            .map(RecordId::Int)
            .unwrap_or_else(|_| RecordId::Str(s.to_string())))
    }
}

impl From<i64> for RecordId {
    fn from(n: i64) -> Self {
        RecordId::Int(n)
    }
}

impl From<i32> for RecordId {
    fn from(n: i32) -> Self {
        RecordId::Int(i64::from(n))
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        RecordId::Str(s.to_string())
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        RecordId::Str(s)
    }
}

/// One flat input record.
///
/// Only `id` and `parent` are interpreted. Every other key is kept in
/// `payload` and written back out unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    /// Id of the parent record, or the root sentinel
    pub parent: RecordId,
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl Record {
    pub fn new(id: impl Into<RecordId>, parent: impl Into<RecordId>) -> Self {
        Self {
            id: id.into(),
            parent: parent.into(),
            payload: Map::new(),
        }
    }

    /// Attach an opaque payload field.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.payload.insert(key.into(), value.into());
        self
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.payload.is_empty() {
            write!(f, "{}", self.id)
        } else {
            write!(f, "{} {}", self.id, Value::Object(self.payload.clone()))
        }
    }
}

/// What to do with a record whose parent is not in the tree when it is reached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrphanPolicy {
    /// Leave it (and anything below it) out of the tree, log a warning
    #[default]
    Skip,
    /// Fail construction
    Reject,
}

impl FromStr for OrphanPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "skip" => Ok(OrphanPolicy::Skip),
            "reject" => Ok(OrphanPolicy::Reject),
            other => Err(format!("unknown orphan policy: {}", other)),
        }
    }
}

/// Options controlling how a `TreeIndex` is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexOptions {
    /// Parent value that marks the root record
    pub root_sentinel: RecordId,
    pub orphan_policy: OrphanPolicy,
}

impl Default for IndexOptions {
    fn default() -> Self {
        Self {
            root_sentinel: RecordId::from(DEFAULT_ROOT_SENTINEL),
            orphan_policy: OrphanPolicy::default(),
        }
    }
}

pub const DEFAULT_ROOT_SENTINEL: &str = "root";
