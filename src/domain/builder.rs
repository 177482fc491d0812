//! Tree builder: links flat parent-referencing records into an arena tree.

use std::collections::HashMap;

use generational_arena::Index;
use tracing::{debug, instrument, warn};

use crate::domain::arena::TreeArena;
use crate::domain::error::DomainError;
use crate::domain::{IndexOptions, OrphanPolicy, Record, RecordId};

/// Result type for tree operations.
pub type TreeResult<T> = Result<T, DomainError>;

/// Everything the builder derives from one record list.
#[derive(Debug)]
pub struct BuiltTree {
    pub tree: TreeArena,
    /// Position in the input of every record id
    pub positions: HashMap<RecordId, usize>,
    /// Positions of records left out of the tree, in input order
    pub orphans: Vec<usize>,
}

/// Constructs a tree from parent-referencing records.
///
/// `records[0]` is the root. Starting there, every record whose `parent` equals
/// a placed node's id is attached below it, children in input order, and its
/// own subtree is placed before the next sibling. Input order only decides
/// sibling order, so a child may be listed before its parent.
pub struct TreeBuilder {
    options: IndexOptions,
    children_cache: HashMap<RecordId, Vec<usize>>,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new(IndexOptions::default())
    }
}

impl TreeBuilder {
    pub fn new(options: IndexOptions) -> Self {
        Self {
            options,
            children_cache: HashMap::new(),
        }
    }

    #[instrument(level = "debug", skip(self, records), fields(count = records.len()))]
    pub fn build(&mut self, records: &[Record]) -> TreeResult<BuiltTree> {
        let root = records.first().ok_or(DomainError::EmptyInput)?;

        // Reset state for a fresh build
        self.children_cache.clear();

        let positions = index_positions(records)?;
        self.check_root(root)?;

        for (position, record) in records.iter().enumerate().skip(1) {
            self.children_cache
                .entry(record.parent.clone())
                .or_default()
                .push(position);
        }

        let mut tree = TreeArena::new();
        let root_idx = tree.insert_node(root.clone(), None);
        let mut placed = vec![false; records.len()];
        placed[0] = true;

        // Depth-first: children pushed in reverse so the first one is placed
        // (with its whole subtree) before its next sibling.
        let mut stack: Vec<(usize, Index)> = Vec::new();
        self.push_children(&root.id, root_idx, &mut stack);
        while let Some((position, parent_idx)) = stack.pop() {
            let record = &records[position];
            let idx = tree.insert_node(record.clone(), Some(parent_idx));
            placed[position] = true;
            self.push_children(&record.id, idx, &mut stack);
        }

        let orphans: Vec<usize> = (0..records.len())
            .filter(|&position| !placed[position])
            .collect();

        if let Some(&first) = orphans.first() {
            let record = &records[first];
            match self.options.orphan_policy {
                OrphanPolicy::Reject => {
                    return Err(DomainError::OrphanRecord {
                        id: record.id.clone(),
                        parent: record.parent.clone(),
                    });
                }
                OrphanPolicy::Skip => {
                    for &position in &orphans {
                        let record = &records[position];
                        warn!(
                            id = %record.id,
                            parent = %record.parent,
                            "parent not in tree, skipping record"
                        );
                    }
                }
            }
        }

        debug!(
            nodes = tree.len(),
            orphans = orphans.len(),
            "tree built"
        );
        Ok(BuiltTree {
            tree,
            positions,
            orphans,
        })
    }

    fn push_children(&self, id: &RecordId, idx: Index, stack: &mut Vec<(usize, Index)>) {
        if let Some(children) = self.children_cache.get(id) {
            stack.extend(children.iter().rev().map(|&position| (position, idx)));
        }
    }

    fn check_root(&self, root: &Record) -> TreeResult<()> {
        if root.parent == self.options.root_sentinel {
            return Ok(());
        }
        match self.options.orphan_policy {
            OrphanPolicy::Reject => Err(DomainError::InvalidRoot {
                id: root.id.clone(),
                parent: root.parent.clone(),
            }),
            OrphanPolicy::Skip => {
                warn!(
                    id = %root.id,
                    parent = %root.parent,
                    sentinel = %self.options.root_sentinel,
                    "first record does not carry the root sentinel, using it as root anyway"
                );
                Ok(())
            }
        }
    }
}

fn index_positions(records: &[Record]) -> TreeResult<HashMap<RecordId, usize>> {
    let mut positions = HashMap::with_capacity(records.len());
    for (position, record) in records.iter().enumerate() {
        if positions.insert(record.id.clone(), position).is_some() {
            return Err(DomainError::DuplicateId(record.id.clone()));
        }
    }
    Ok(positions)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(tree: &TreeArena) -> Vec<RecordId> {
        tree.iter().map(|(_, node)| node.data.id.clone()).collect()
    }

    // 1
    // ├── 2
    // │   └── 4
    // └── 3
    #[test]
    fn test_build_links_children_in_input_order() {
        let records = vec![
            Record::new(1, "root"),
            Record::new(2, 1),
            Record::new(3, 1),
            Record::new(4, 2),
        ];
        let built = TreeBuilder::default().build(&records).unwrap();

        assert_eq!(built.tree.len(), 4);
        assert!(built.orphans.is_empty());
        assert_eq!(
            ids(&built.tree),
            vec![RecordId::Int(1), RecordId::Int(2), RecordId::Int(4), RecordId::Int(3)]
        );

        let root = built.tree.get_node(built.tree.root().unwrap()).unwrap();
        let child_ids: Vec<_> = root
            .children
            .iter()
            .map(|&idx| built.tree.get_node(idx).unwrap().data.id.clone())
            .collect();
        assert_eq!(child_ids, vec![RecordId::Int(2), RecordId::Int(3)]);
        assert_eq!(built.positions[&RecordId::Int(4)], 3);
    }

    #[test]
    fn test_build_empty_input_fails() {
        let err = TreeBuilder::default().build(&[]).unwrap_err();
        assert_eq!(err, DomainError::EmptyInput);
    }

    #[test]
    fn test_build_duplicate_id_fails_under_any_policy() {
        let records = vec![Record::new(1, "root"), Record::new(2, 1), Record::new(2, 1)];
        let err = TreeBuilder::default().build(&records).unwrap_err();
        assert_eq!(err, DomainError::DuplicateId(RecordId::Int(2)));
    }

    #[test]
    fn test_build_forward_reference_is_attached() {
        // 3 points at 4, which only shows up later
        let records = vec![
            Record::new(1, "root"),
            Record::new(3, 4),
            Record::new(4, 1),
        ];
        let built = TreeBuilder::default().build(&records).unwrap();
        assert!(built.orphans.is_empty());
        assert_eq!(
            ids(&built.tree),
            vec![RecordId::Int(1), RecordId::Int(4), RecordId::Int(3)]
        );
    }

    #[test]
    fn test_build_places_subtree_before_next_sibling() {
        // 1
        // ├── 2
        // │   └── 5
        // └── 3
        //     └── 4
        let records = vec![
            Record::new(1, "root"),
            Record::new(4, 3),
            Record::new(2, 1),
            Record::new(5, 2),
            Record::new(3, 1),
        ];
        let built = TreeBuilder::default().build(&records).unwrap();
        assert_eq!(
            ids(&built.tree),
            vec![
                RecordId::Int(1),
                RecordId::Int(2),
                RecordId::Int(5),
                RecordId::Int(3),
                RecordId::Int(4)
            ]
        );
    }

    #[test]
    fn test_build_cycle_is_never_attached() {
        let records = vec![
            Record::new(1, "root"),
            Record::new(2, 3),
            Record::new(3, 2),
            Record::new(4, 4),
        ];
        let built = TreeBuilder::default().build(&records).unwrap();
        assert_eq!(built.orphans, vec![1, 2, 3]);
        assert_eq!(built.tree.len(), 1);
    }

    #[test]
    fn test_build_builder_is_reusable() {
        let mut builder = TreeBuilder::default();
        builder
            .build(&[Record::new(1, "root"), Record::new(2, 1)])
            .unwrap();
        // 2 from the previous build must not leak into this one
        let built = builder
            .build(&[Record::new(10, "root"), Record::new(11, 2)])
            .unwrap();
        assert_eq!(built.orphans, vec![1]);
    }
}
