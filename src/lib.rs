//! Arena-backed N-ary trees with visitor-driven traversals.
//!
//! Nodes live in a [`Tree`] arena and are addressed by [`NodeIndex`]. Each
//! node links to its parent, its previous and next sibling, and its first
//! child; children are kept in insertion order. Nodes start out as isolated
//! roots and are attached with [`Tree::append_child`] and detached with
//! [`Tree::unlink`].
//!
//! Computation over a tree is driven through [`Tree::traverse`], which calls
//! a visitor for every node selected by a [`Filter`], in a chosen [`Order`]
//! and optionally limited to a [`Depth`]. The visitor stops the walk early by
//! returning `true`.
//!
//! # Example
//! ```rust
//! use ntree::{Filter, Order, Traversal, TraverseOptions, Tree};
//!
//! let mut tree = Tree::new();
//! let root = tree.add_node("root");
//! let left = tree.add_node("left");
//! let right = tree.add_node("right");
//! tree.append_child(root, left).unwrap();
//! tree.append_child(root, right).unwrap();
//!
//! let mut leaves = Vec::new();
//! let options = TraverseOptions::default()
//!     .with_order(Order::PostOrder)
//!     .with_filter(Filter::Leaves);
//! let outcome = tree.traverse(root, &options, |node| {
//!     leaves.push(*node.value());
//!     false
//! });
//!
//! assert_eq!(outcome, Traversal::Completed);
//! assert_eq!(leaves, ["left", "right"]);
//! assert_eq!(tree.node_count(root, Filter::All), 3);
//! assert_eq!(tree.find(root, Order::PreOrder, Filter::All, &"right"), Some(right));
//! ```
//!
//! The arena performs no internal synchronisation. Mutation and traversal
//! are serialised by the borrow checker: traversals borrow the arena, so
//! the structure cannot change while a visitor runs.

pub mod display;
pub mod query;
pub mod traversal;
pub mod tree;

pub use display::Levels;
pub use traversal::{Depth, Filter, OptionsError, Order, SkipReason, Traversal, TraverseOptions};
pub use tree::{Ancestors, AttachError, Children, NodeRef, Tree};

slotmap::new_key_type! {
    /// Index of a node within a [`Tree`].
    ///
    /// Indices are generational: once a node is removed its index stays
    /// invalid even after the slot is reused.
    pub struct NodeIndex;
}
