//! Index a flat list of parent-referencing records into a tree.
//!
//! ```
//! use treestore::domain::{Record, RecordId, TreeIndex};
//!
//! let index = TreeIndex::new(vec![
//!     Record::new(1, "root"),
//!     Record::new(2, 1),
//!     Record::new(3, 2),
//! ])
//! .unwrap();
//!
//! let chain: Vec<_> = index
//!     .get_all_parents(&RecordId::Int(3))
//!     .iter()
//!     .map(|r| r.id.clone())
//!     .collect();
//! assert_eq!(chain, vec![RecordId::Int(2), RecordId::Int(1)]);
//! ```

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod util;

pub use domain::{DomainError, Record, RecordId, TreeIndex};
