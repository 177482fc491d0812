//! Read-only index over a flat list of parent-referencing records.

use std::collections::HashMap;
use std::ops::ControlFlow;

use generational_arena::Index;
use tracing::{debug, instrument};

use crate::domain::arena::TreeArena;
use crate::domain::builder::{BuiltTree, TreeBuilder, TreeResult};
use crate::domain::error::DomainError;
use crate::domain::{IndexOptions, Record, RecordId};

/// Tree index built once from an ordered record list.
///
/// The first record is the root; every other record hangs below the record
/// its `parent` names, wherever that record sits in the input.
/// The flat list is kept as given for [`get_all`](Self::get_all) and
/// [`get_item`](Self::get_item), the tree serves the traversal queries.
/// Nothing is mutated after construction, so a shared `&TreeIndex` is safe
/// to hand to any number of readers.
#[derive(Debug)]
pub struct TreeIndex {
    records: Vec<Record>,
    positions: HashMap<RecordId, usize>,
    tree: TreeArena,
    root: Index,
    orphans: Vec<usize>,
}

impl TreeIndex {
    /// Build with the default root sentinel (`"root"`) and skip policy.
    pub fn new(records: Vec<Record>) -> TreeResult<Self> {
        Self::with_options(records, IndexOptions::default())
    }

    #[instrument(level = "debug", skip(records), fields(count = records.len()))]
    pub fn with_options(records: Vec<Record>, options: IndexOptions) -> TreeResult<Self> {
        let BuiltTree {
            tree,
            positions,
            orphans,
        } = TreeBuilder::new(options).build(&records)?;
        let root = tree.root().ok_or(DomainError::EmptyInput)?;

        Ok(Self {
            records,
            positions,
            tree,
            root,
            orphans,
        })
    }

    /// All records in input order.
    pub fn get_all(&self) -> &[Record] {
        &self.records
    }

    /// Record with the given id.
    ///
    /// Records left out of the tree are still found here.
    pub fn get_item(&self, id: &RecordId) -> TreeResult<&Record> {
        self.positions
            .get(id)
            .map(|&position| &self.records[position])
            .ok_or_else(|| DomainError::NotFound(id.clone()))
    }

    /// Record at a 1-based position in the input, None when out of range.
    pub fn get_item_at(&self, position: usize) -> Option<&Record> {
        let record = position
            .checked_sub(1)
            .and_then(|offset| self.records.get(offset));
        if record.is_none() {
            debug!(position, len = self.records.len(), "position out of range");
        }
        record
    }

    /// Every tree node whose `parent` field equals `id`.
    ///
    /// Walks the whole tree depth-first rather than looking up one node, so
    /// the `parent` field is what decides membership. Unknown ids yield an
    /// empty vector.
    #[instrument(level = "debug", skip(self))]
    pub fn get_children(&self, id: &RecordId) -> Vec<&Record> {
        self.tree
            .iter()
            .filter(|(_, node)| node.parent.is_some() && node.data.parent == *id)
            .map(|(_, node)| &node.data)
            .collect()
    }

    /// Ancestor chain of `id`: immediate parent first, root last.
    ///
    /// The root's own chain is empty. An id that is not in the tree yields
    /// just the root.
    #[instrument(level = "debug", skip(self))]
    pub fn get_all_parents(&self, id: &RecordId) -> Vec<&Record> {
        let root = self.root();
        if root.id == *id {
            return Vec::new();
        }

        let mut path = vec![root];
        if self.trace_path(self.root, id, &mut path).is_continue() {
            debug!(%id, "id not in tree");
        }
        path.reverse();
        path
    }

    /// Depth-first search that keeps `path` equal to the chain of nodes above
    /// the one being examined. Breaks out of every level on the first match.
    fn trace_path<'a>(
        &'a self,
        node_idx: Index,
        target: &RecordId,
        path: &mut Vec<&'a Record>,
    ) -> ControlFlow<()> {
        let Some(node) = self.tree.get_node(node_idx) else {
            return ControlFlow::Continue(());
        };

        for &child_idx in &node.children {
            let Some(child) = self.tree.get_node(child_idx) else {
                continue;
            };
            if child.data.id == *target {
                return ControlFlow::Break(());
            }
            path.push(&child.data);
            self.trace_path(child_idx, target, path)?;
            path.pop();
        }

        ControlFlow::Continue(())
    }

    pub fn root(&self) -> &Record {
        &self.records[0]
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Always false: construction rejects empty input.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records that could not be attached to the tree, in input order.
    pub fn orphans(&self) -> Vec<&Record> {
        self.orphans
            .iter()
            .map(|&position| &self.records[position])
            .collect()
    }

    pub fn depth(&self) -> usize {
        self.tree.depth()
    }

    pub fn leaves(&self) -> Vec<&Record> {
        self.tree.leaf_nodes()
    }

    pub fn tree(&self) -> &TreeArena {
        &self.tree
    }
}
