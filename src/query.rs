//! Queries built on the node links and the traversal engine.
use tracing::instrument;

use crate::traversal::{Depth, Filter, Order, TraverseOptions};
use crate::tree::Tree;
use crate::NodeIndex;

impl<V> Tree<V> {
    /// Returns the number of levels from `node` up to and including its root.
    ///
    /// A root has depth `1`; an unknown index has depth `0`.
    pub fn depth(&self, node: NodeIndex) -> usize {
        self.ancestors(node).count()
    }

    /// Returns the root above `node` together with the number of parent hops
    /// taken to reach it.
    ///
    /// Returns `None` when the index does not name a live node.
    pub fn root_of(&self, node: NodeIndex) -> Option<(NodeIndex, usize)> {
        let mut hops = 0;
        let mut current = node;
        while let Some(parent) = self.nodes.get(current)?.parent {
            hops += 1;
            current = parent;
        }
        Some((current, hops))
    }

    /// Counts the nodes of the subtree rooted at `root` that pass `filter`.
    ///
    /// Returns `0` when the index does not name a live node.
    #[instrument(level = "trace", skip(self))]
    pub fn node_count(&self, root: NodeIndex, filter: Filter) -> usize {
        if !self.contains(root) {
            return 0;
        }

        let mut count = 0;
        let mut pending = vec![root];
        while let Some(node) = pending.pop() {
            let data = &self.nodes[node];
            if filter.admits(data.first_child().is_none()) {
                count += 1;
            }

            let mut child = data.first_child();
            while let Some(current) = child {
                pending.push(current);
                child = self.nodes[current].next_sibling();
            }
        }
        count
    }

    /// Like [`Tree::node_count`], but takes integer filter bits.
    ///
    /// Returns `0` for bits that do not form a [`Filter`].
    pub fn node_count_raw(&self, root: NodeIndex, flags: i32) -> usize {
        Filter::from_bits(flags).map_or(0, |filter| self.node_count(root, filter))
    }

    /// Finds the first node in `order` that passes `filter` and holds `value`.
    ///
    /// Returns `None` when nothing matches, when `root` is unknown, or when
    /// `order` is not supported.
    #[instrument(level = "trace", skip(self, value))]
    pub fn find(&self, root: NodeIndex, order: Order, filter: Filter, value: &V) -> Option<NodeIndex>
    where
        V: PartialEq,
    {
        let options = TraverseOptions::new(order, filter, Depth::Unbounded);
        let mut found = None;

        self.traverse(root, &options, |node| {
            if node.value() != value {
                return false;
            }
            found = Some(node.index());
            true
        });

        found
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rstest::rstest;

    /// Builds `R -> [A -> [A1, A2, A3], B -> [B1, B2]]`.
    fn sample() -> (Tree<&'static str>, Vec<NodeIndex>) {
        let mut tree = Tree::new();
        let mut nodes = Vec::new();
        let root = tree.add_node("R");
        nodes.push(root);
        for (name, children) in [("A", &["A1", "A2", "A3"][..]), ("B", &["B1", "B2"][..])] {
            let inner = tree.add_node(name);
            nodes.push(tree.append_child(root, inner).unwrap());
            for &leaf in children {
                let leaf = tree.add_node(leaf);
                nodes.push(tree.append_child(inner, leaf).unwrap());
            }
        }
        (tree, nodes)
    }

    #[test]
    fn depth_counts_levels() {
        let (tree, nodes) = sample();
        let [root, a, a1] = [nodes[0], nodes[1], nodes[2]];
        assert_eq!(tree.depth(root), 1);
        assert_eq!(tree.depth(a), 2);
        assert_eq!(tree.depth(a1), 3);
    }

    #[test]
    fn depth_of_unknown_node_is_zero() {
        let mut tree = Tree::new();
        let gone = tree.add_node(());
        tree.remove(gone);
        assert_eq!(tree.depth(gone), 0);
        assert_eq!(tree.root_of(gone), None);
    }

    #[test]
    fn root_of_counts_hops() {
        let (tree, nodes) = sample();
        let root = nodes[0];
        assert_eq!(tree.root_of(root), Some((root, 0)));
        assert_eq!(tree.root_of(nodes[1]), Some((root, 1)));
        assert_eq!(tree.root_of(nodes[7]), Some((root, 2)));
    }

    #[rstest]
    #[case(Filter::All, 8)]
    #[case(Filter::Leaves, 5)]
    #[case(Filter::NonLeaves, 3)]
    fn counts_by_filter(#[case] filter: Filter, #[case] expected: usize) {
        let (tree, nodes) = sample();
        assert_eq!(tree.node_count(nodes[0], filter), expected);
        assert_eq!(tree.node_count_raw(nodes[0], filter.bits()), expected);
    }

    #[test]
    fn count_of_subtree_and_invalid_input() {
        let (mut tree, nodes) = sample();
        assert_eq!(tree.node_count(nodes[1], Filter::All), 4);
        assert_eq!(tree.node_count_raw(nodes[0], Filter::MASK + 1), 0);
        assert_eq!(tree.node_count_raw(nodes[0], 0), 0);

        let gone = tree.add_node("gone");
        tree.remove(gone);
        assert_eq!(tree.node_count(gone, Filter::All), 0);
    }

    #[test]
    fn find_returns_exact_node() {
        let (tree, nodes) = sample();
        assert_eq!(tree.find(nodes[0], Order::InOrder, Filter::All, &"B2"), Some(nodes[7]));
        assert_eq!(tree.find(nodes[0], Order::PreOrder, Filter::All, &"R"), Some(nodes[0]));
        assert_eq!(tree.find(nodes[0], Order::PreOrder, Filter::All, &"Z"), None);
        assert_eq!(tree.find(nodes[0], Order::PreOrder, Filter::Leaves, &"A"), None);
        assert_eq!(tree.find(nodes[0], Order::LevelOrder, Filter::All, &"R"), None);
    }

    #[test]
    fn find_prefers_first_match_in_order() {
        let mut tree = Tree::new();
        let root = tree.add_node("dup");
        let inner = tree.add_node("x");
        tree.append_child(root, inner).unwrap();
        let leaf = tree.add_node("dup");
        tree.append_child(inner, leaf).unwrap();

        assert_eq!(tree.find(root, Order::PreOrder, Filter::All, &"dup"), Some(root));
        assert_eq!(tree.find(root, Order::PostOrder, Filter::All, &"dup"), Some(leaf));
        assert_eq!(tree.find(root, Order::InOrder, Filter::All, &"dup"), Some(leaf));
        assert_eq!(tree.find(root, Order::PreOrder, Filter::Leaves, &"dup"), Some(leaf));
    }

    #[test]
    fn find_on_unknown_root() {
        let mut tree = Tree::new();
        let gone = tree.add_node(1);
        tree.remove(gone);
        assert_eq!(tree.find(gone, Order::PreOrder, Filter::All, &1), None);
    }
}
