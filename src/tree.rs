//! The node arena and its structural mutators.
//!
//! Every node stores four links: its parent, its previous and next sibling,
//! and the first child of its own sibling list. The links are plain
//! [`NodeIndex`] handles; the [`Tree`] owns all nodes. A node without a
//! parent and without siblings is a root. Freshly added nodes are isolated
//! roots until they are attached with [`Tree::append_child`].
use std::iter::FusedIterator;
use std::mem::{replace, take};

use slotmap::SlotMap;
use thiserror::Error;
use tracing::{debug, instrument, trace};

use crate::NodeIndex;

/// A node of a [`Tree`].
#[derive(Debug, Clone)]
pub(crate) struct Node<V> {
    pub(crate) value: V,
    pub(crate) parent: Option<NodeIndex>,
    /// The previous and next sibling of the node, if any.
    pub(crate) siblings: [Option<NodeIndex>; 2],
    /// The first and last child of the node, if any.
    pub(crate) children: [Option<NodeIndex>; 2],
    /// The number of children.
    pub(crate) children_count: u32,
}

impl<V> Node<V> {
    fn new(value: V) -> Self {
        Self {
            value,
            parent: None,
            siblings: [None, None],
            children: [None, None],
            children_count: 0,
        }
    }

    #[inline]
    pub(crate) fn first_child(&self) -> Option<NodeIndex> {
        self.children[0]
    }

    #[inline]
    pub(crate) fn next_sibling(&self) -> Option<NodeIndex> {
        self.siblings[1]
    }

    #[inline]
    fn is_root(&self) -> bool {
        self.parent.is_none() && self.siblings == [None, None]
    }
}

/// An arena of N-ary trees.
///
/// The arena can hold any number of disjoint trees. Children are kept in
/// insertion order.
#[derive(Debug, Clone)]
pub struct Tree<V> {
    pub(crate) nodes: SlotMap<NodeIndex, Node<V>>,
}

impl<V> Default for Tree<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Tree<V> {
    /// Creates a new empty arena.
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
        }
    }

    /// Creates a new empty arena with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: SlotMap::with_capacity_and_key(capacity),
        }
    }

    /// Returns the number of live nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns whether the arena holds no nodes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns whether `node` names a live node of this arena.
    #[inline]
    pub fn contains(&self, node: NodeIndex) -> bool {
        self.nodes.contains_key(node)
    }

    /// Removes every node.
    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    /// Adds an isolated root node holding `value`.
    pub fn add_node(&mut self, value: V) -> NodeIndex {
        self.nodes.insert(Node::new(value))
    }

    /// Borrows the value of a node.
    #[inline]
    pub fn value(&self, node: NodeIndex) -> Option<&V> {
        Some(&self.nodes.get(node)?.value)
    }

    /// Mutably borrows the value of a node.
    #[inline]
    pub fn value_mut(&mut self, node: NodeIndex) -> Option<&mut V> {
        Some(&mut self.nodes.get_mut(node)?.value)
    }

    /// Returns a shared view of a node.
    #[inline]
    pub fn node(&self, node: NodeIndex) -> Option<NodeRef<'_, V>> {
        self.nodes.contains_key(node).then_some(NodeRef { tree: self, index: node })
    }

    /// Iterates over the indices of all live nodes in storage order.
    pub fn node_indices(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.nodes.keys()
    }

    /// Returns a node's parent or `None` if it is a root.
    #[inline]
    pub fn parent(&self, node: NodeIndex) -> Option<NodeIndex> {
        self.nodes.get(node)?.parent
    }

    /// Returns a node's first child, if any.
    #[inline]
    pub fn first_child(&self, node: NodeIndex) -> Option<NodeIndex> {
        self.nodes.get(node)?.children[0]
    }

    /// Returns a node's last child, if any.
    #[inline]
    pub fn last_child(&self, node: NodeIndex) -> Option<NodeIndex> {
        self.nodes.get(node)?.children[1]
    }

    /// Returns the next sibling in the node's parent, if any.
    #[inline]
    pub fn next_sibling(&self, node: NodeIndex) -> Option<NodeIndex> {
        self.nodes.get(node)?.siblings[1]
    }

    /// Returns the previous sibling in the node's parent, if any.
    #[inline]
    pub fn prev_sibling(&self, node: NodeIndex) -> Option<NodeIndex> {
        self.nodes.get(node)?.siblings[0]
    }

    /// Returns the number of the node's children.
    #[inline]
    pub fn child_count(&self, node: NodeIndex) -> usize {
        self.nodes.get(node).map_or(0, |data| data.children_count as usize)
    }

    /// Returns whether the node has neither a parent nor any sibling.
    ///
    /// Returns `false` for an index that does not name a live node.
    #[inline]
    pub fn is_root(&self, node: NodeIndex) -> bool {
        self.nodes.get(node).map_or(false, Node::is_root)
    }

    /// Returns whether the node currently has no children.
    ///
    /// Returns `false` for an index that does not name a live node.
    #[inline]
    pub fn is_leaf(&self, node: NodeIndex) -> bool {
        self.nodes
            .get(node)
            .map_or(false, |data| data.children[0].is_none())
    }

    /// Iterates over the node's children.
    #[inline]
    pub fn children(&self, node: NodeIndex) -> Children<'_, V> {
        match self.nodes.get(node) {
            Some(data) => Children {
                tree: self,
                next: data.children[0],
                prev: data.children[1],
                len: data.children_count as usize,
            },
            None => Children {
                tree: self,
                next: None,
                prev: None,
                len: 0,
            },
        }
    }

    /// Iterates over `node` followed by each of its ancestors up to the root.
    #[inline]
    pub fn ancestors(&self, node: NodeIndex) -> Ancestors<'_, V> {
        Ancestors {
            tree: self,
            next: self.nodes.contains_key(node).then_some(node),
        }
    }

    /// Returns whether `node` is a proper ancestor of `descendant`.
    pub fn is_ancestor(&self, node: NodeIndex, descendant: NodeIndex) -> bool {
        self.ancestors(descendant).skip(1).any(|ancestor| ancestor == node)
    }

    /// Attaches a root node as the last child of `parent`.
    ///
    /// Returns `node` on success. A failed attach leaves the arena untouched.
    ///
    /// # Errors
    ///
    ///  - When either index does not name a live node.
    ///  - When the node is already attached, i.e. it is not a root.
    ///  - When `parent` lies in the subtree of `node`.
    #[instrument(level = "trace", skip(self))]
    pub fn append_child(
        &mut self,
        parent: NodeIndex,
        node: NodeIndex,
    ) -> Result<NodeIndex, AttachError> {
        if let Err(err) = self.check_attach(parent, node) {
            debug!(?parent, ?node, %err, "rejected attach");
            return Err(err);
        }

        self.nodes[parent].children_count += 1;
        self.nodes[node].parent = Some(parent);

        match replace(&mut self.nodes[parent].children[1], Some(node)) {
            Some(prev) => {
                self.nodes[prev].siblings[1] = Some(node);
                self.nodes[node].siblings[0] = Some(prev);
            }
            None => self.nodes[parent].children[0] = Some(node),
        }

        trace!(?parent, ?node, "attached");
        Ok(node)
    }

    /// Attaches a root node as the last child of `parent`.
    ///
    /// This is the same operation as [`Tree::append_child`]; there is no
    /// positional insert.
    ///
    /// # Errors
    ///
    /// See [`Tree::append_child`].
    #[inline]
    pub fn insert(&mut self, parent: NodeIndex, node: NodeIndex) -> Result<NodeIndex, AttachError> {
        self.append_child(parent, node)
    }

    fn check_attach(&self, parent: NodeIndex, node: NodeIndex) -> Result<(), AttachError> {
        if !self.nodes.contains_key(parent) {
            Err(AttachError::UnknownParent)
        } else if !self.nodes.contains_key(node) {
            Err(AttachError::UnknownNode)
        } else if !self.nodes[node].is_root() {
            Err(AttachError::AlreadyAttached)
        } else if !self.cycle_check(node, parent) {
            Err(AttachError::Cycle)
        } else {
            Ok(())
        }
    }

    /// Ensures that making `node` a child of `parent` would not introduce a cycle.
    fn cycle_check(&self, node: NodeIndex, parent: NodeIndex) -> bool {
        // A childless node can only contain itself.
        if self.nodes[node].children[0].is_none() {
            return node != parent;
        }

        self.ancestors(parent).all(|ancestor| ancestor != node)
    }

    /// Detaches a node from its parent and siblings, returning the former parent.
    ///
    /// The node keeps its own children. Does nothing and returns `None` when
    /// the index does not name a live node or the node is already a root.
    #[instrument(level = "trace", skip(self))]
    pub fn unlink(&mut self, node: NodeIndex) -> Option<NodeIndex> {
        let node_data = self.nodes.get_mut(node)?;

        let parent = take(&mut node_data.parent);
        let [prev, next] = take(&mut node_data.siblings);

        match (prev, parent) {
            (Some(prev), _) => self.nodes[prev].siblings[1] = next,
            (None, Some(parent)) => self.nodes[parent].children[0] = next,
            (None, None) => {}
        }

        match (next, parent) {
            (Some(next), _) => self.nodes[next].siblings[0] = prev,
            (None, Some(parent)) => self.nodes[parent].children[1] = prev,
            (None, None) => {}
        }

        if let Some(parent) = parent {
            self.nodes[parent].children_count -= 1;
            trace!(?parent, ?node, "unlinked");
        }

        parent
    }

    /// Unlinks a node and frees it together with its whole subtree.
    ///
    /// Returns the value of the removed node, or `None` when the index does
    /// not name a live node.
    #[instrument(level = "trace", skip(self))]
    pub fn remove(&mut self, node: NodeIndex) -> Option<V> {
        if !self.nodes.contains_key(node) {
            return None;
        }

        self.unlink(node);

        let mut pending = Vec::new();
        pending.extend(self.nodes[node].children[0]);
        let mut freed = 0usize;

        while let Some(current) = pending.pop() {
            let Some(data) = self.nodes.remove(current) else {
                continue;
            };
            pending.extend(data.children[0]);
            pending.extend(data.siblings[1]);
            freed += 1;
        }

        trace!(?node, descendants = freed, "removed subtree");
        self.nodes.remove(node).map(|data| data.value)
    }
}

/// A shared view of a single node, handed to traversal visitors.
pub struct NodeRef<'a, V> {
    tree: &'a Tree<V>,
    index: NodeIndex,
}

impl<'a, V> Clone for NodeRef<'a, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, V> Copy for NodeRef<'a, V> {}

impl<'a, V> NodeRef<'a, V> {
    pub(crate) fn new(tree: &'a Tree<V>, index: NodeIndex) -> Self {
        Self { tree, index }
    }

    /// The index of the node.
    #[inline]
    pub fn index(self) -> NodeIndex {
        self.index
    }

    /// The tree the node lives in.
    #[inline]
    pub fn tree(self) -> &'a Tree<V> {
        self.tree
    }

    #[inline]
    pub fn value(self) -> &'a V {
        &self.tree.nodes[self.index].value
    }

    #[inline]
    pub fn parent(self) -> Option<Self> {
        let parent = self.tree.parent(self.index)?;
        Some(Self::new(self.tree, parent))
    }

    #[inline]
    pub fn is_leaf(self) -> bool {
        self.tree.is_leaf(self.index)
    }

    #[inline]
    pub fn is_root(self) -> bool {
        self.tree.is_root(self.index)
    }
}

impl<'a, V: std::fmt::Debug> std::fmt::Debug for NodeRef<'a, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeRef")
            .field("index", &self.index)
            .field("value", self.value())
            .finish()
    }
}

/// Iterator created by [`Tree::children`].
pub struct Children<'a, V> {
    tree: &'a Tree<V>,
    next: Option<NodeIndex>,
    prev: Option<NodeIndex>,
    len: usize,
}

impl<'a, V> Iterator for Children<'a, V> {
    type Item = NodeIndex;

    fn next(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }

        self.len -= 1;
        let current = self.next?;
        self.next = self.tree.next_sibling(current);
        Some(current)
    }

    #[inline(always)]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<'a, V> DoubleEndedIterator for Children<'a, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }

        self.len -= 1;
        let current = self.prev?;
        self.prev = self.tree.prev_sibling(current);
        Some(current)
    }
}

impl<'a, V> ExactSizeIterator for Children<'a, V> {
    #[inline(always)]
    fn len(&self) -> usize {
        self.len
    }
}

impl<'a, V> FusedIterator for Children<'a, V> {}

/// Iterator created by [`Tree::ancestors`].
pub struct Ancestors<'a, V> {
    tree: &'a Tree<V>,
    next: Option<NodeIndex>,
}

impl<'a, V> Iterator for Ancestors<'a, V> {
    type Item = NodeIndex;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.tree.parent(current);
        Some(current)
    }
}

impl<'a, V> FusedIterator for Ancestors<'a, V> {}

/// Error returned by [`Tree::append_child`] and [`Tree::insert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AttachError {
    #[error("unknown parent node")]
    UnknownParent,
    #[error("unknown node")]
    UnknownNode,
    #[error("the node is already attached")]
    AlreadyAttached,
    #[error("attaching the node would introduce a cycle")]
    Cycle,
}
