//! Domain layer: records, the arena tree and the index queries
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod builder;
pub mod entities;
pub mod error;
pub mod index;
pub mod tree_traits;

pub use arena::{TreeArena, TreeNode};
pub use builder::{BuiltTree, TreeBuilder, TreeResult};
pub use entities::*;
pub use error::DomainError;
pub use index::TreeIndex;
pub use tree_traits::TreeDisplay;
