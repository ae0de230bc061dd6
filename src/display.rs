//! A plain text rendering of a subtree, one line per level.
use std::fmt::{self, Display, Write};

use crate::traversal::TraverseOptions;
use crate::tree::Tree;
use crate::NodeIndex;

/// Renders the subtree below a node level by level.
///
/// Nodes are listed in pre-order as `(value)` followed by a tab, grouped on
/// the line of their depth below the rendered root. Every line is followed
/// by an empty line. An unknown root renders as `()`.
///
/// Created by [`Tree::display`].
pub struct Levels<'a, V> {
    tree: &'a Tree<V>,
    root: NodeIndex,
}

impl<V> Tree<V> {
    /// Returns a [`Display`] adapter for the subtree rooted at `root`.
    pub fn display(&self, root: NodeIndex) -> Levels<'_, V> {
        Levels { tree: self, root }
    }
}

impl<'a, V: Display> Display for Levels<'a, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.tree.contains(self.root) {
            return f.write_str("()");
        }

        let mut levels = vec![String::new()];
        let mut path: Vec<NodeIndex> = Vec::new();
        let mut result = Ok(());

        self.tree
            .traverse(self.root, &TraverseOptions::default(), |node| {
                let parent = self.tree.parent(node.index());
                while !path.is_empty() && path.last().copied() != parent {
                    path.pop();
                }
                let level = path.len();
                path.push(node.index());

                if levels.len() <= level {
                    levels.resize(level + 1, String::new());
                }
                result = write!(levels[level], "({})\t", node.value());
                result.is_err()
            });
        result?;

        for line in &levels {
            write!(f, "{line}\n\n")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn renders_levels() {
        let mut tree = Tree::new();
        let root = tree.add_node("root");
        let a = tree.add_node("a");
        let b = tree.add_node("b");
        let a1 = tree.add_node("a1");
        tree.append_child(root, a).unwrap();
        tree.append_child(root, b).unwrap();
        tree.append_child(a, a1).unwrap();

        assert_eq!(
            tree.display(root).to_string(),
            "(root)\t\n\n(a)\t(b)\t\n\n(a1)\t\n\n"
        );
        assert_eq!(tree.display(a).to_string(), "(a)\t\n\n(a1)\t\n\n");
    }

    #[test]
    fn renders_levels_after_backtracking() {
        let mut tree = Tree::new();
        let nodes: Vec<_> = (0..7).map(|i| tree.add_node(i)).collect();
        // 0 -> [1 -> [2 -> [3]], 4 -> [5], 6]
        for (parent, child) in [(0, 1), (1, 2), (2, 3), (0, 4), (4, 5), (0, 6)] {
            tree.append_child(nodes[parent], nodes[child]).unwrap();
        }

        assert_eq!(
            tree.display(nodes[0]).to_string(),
            "(0)\t\n\n(1)\t(4)\t(6)\t\n\n(2)\t(5)\t\n\n(3)\t\n\n"
        );
        assert_eq!(
            tree.display(nodes[1]).to_string(),
            "(1)\t\n\n(2)\t\n\n(3)\t\n\n"
        );
    }

    #[test]
    fn renders_unknown_root() {
        let mut tree = Tree::new();
        let gone = tree.add_node(0);
        tree.remove(gone);
        assert_eq!(tree.display(gone).to_string(), "()");
    }
}
