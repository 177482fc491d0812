use generational_arena::Index;
use termtree::Tree;

use crate::domain::arena::TreeArena;
use crate::domain::index::TreeIndex;

pub trait TreeDisplay {
    fn to_tree_string(&self) -> Tree<String>;
}

impl TreeDisplay for TreeArena {
    fn to_tree_string(&self) -> Tree<String> {
        let Some((root_idx, root_node)) = self
            .root()
            .and_then(|idx| self.get_node(idx).map(|node| (idx, node)))
        else {
            return Tree::new("Empty tree".to_string());
        };

        fn build_tree(arena: &TreeArena, node_idx: Index, parent_tree: &mut Tree<String>) {
            if let Some(node) = arena.get_node(node_idx) {
                for &child_idx in &node.children {
                    if let Some(child) = arena.get_node(child_idx) {
                        let mut child_tree = Tree::new(child.data.to_string());
                        build_tree(arena, child_idx, &mut child_tree);
                        parent_tree.push(child_tree);
                    }
                }
            }
        }

        let mut tree = Tree::new(root_node.data.to_string());
        build_tree(self, root_idx, &mut tree);
        tree
    }
}

impl TreeDisplay for TreeIndex {
    fn to_tree_string(&self) -> Tree<String> {
        self.tree().to_tree_string()
    }
}
