//! Visitor-driven depth-first traversals.
//!
//! A traversal hands every node selected by a [`Filter`] to a visitor
//! closure. The visitor returns `true` to stop the walk and no further node
//! is visited.
//!
//! Three orders are implemented, each in an unbounded and a depth-limited
//! variant:
//!
//!  - pre-order visits a node before its children,
//!  - post-order visits a node after its children,
//!  - in-order treats the first child as the left subtree and all remaining
//!    children as the right subtree, visiting the node in between.
//!
//! The unbounded in-order walk visits non-leaf nodes regardless of the
//! filter. The depth-limited walk applies the filter to them.
//!
//! [`Order::LevelOrder`] is accepted but not supported and results in a
//! skipped traversal.
use std::ops::ControlFlow;

use tracing::{debug, instrument};

use crate::tree::{NodeRef, Tree};
use crate::NodeIndex;

mod options;

pub use options::{Depth, Filter, OptionsError, Order, TraverseOptions};

/// The outcome of a traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Traversal {
    /// Every selected node was visited.
    Completed,
    /// The visitor asked to stop.
    Stopped,
    /// Nothing was visited.
    Skipped(SkipReason),
}

impl Traversal {
    /// Returns whether the visitor stopped the traversal.
    #[inline]
    pub fn is_stopped(self) -> bool {
        self == Traversal::Stopped
    }

    /// Returns whether the traversal was rejected up front.
    #[inline]
    pub fn is_skipped(self) -> bool {
        matches!(self, Traversal::Skipped(_))
    }
}

/// Why a traversal did not visit anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The starting node does not exist.
    UnknownRoot,
    /// The requested order has no implementation.
    UnsupportedOrder(Order),
    /// Integer encoded options were out of range.
    InvalidOptions(OptionsError),
}

impl<V> Tree<V> {
    /// Walks the subtree rooted at `root`, calling `visitor` for every node
    /// selected by the options.
    ///
    /// `visitor` returns `true` to stop the traversal.
    #[instrument(level = "trace", skip(self, visitor))]
    pub fn traverse<F>(&self, root: NodeIndex, options: &TraverseOptions, visitor: F) -> Traversal
    where
        F: FnMut(NodeRef<'_, V>) -> bool,
    {
        if let Err(reason) = self.check_traversal(root, options) {
            return Traversal::Skipped(reason);
        }

        Shared {
            tree: self,
            filter: options.filter,
            visitor,
        }
        .run(root, options)
    }

    /// Like [`Tree::traverse`], but hands the visitor mutable access to each
    /// selected node's value.
    #[instrument(level = "trace", skip(self, visitor))]
    pub fn traverse_mut<F>(
        &mut self,
        root: NodeIndex,
        options: &TraverseOptions,
        visitor: F,
    ) -> Traversal
    where
        F: FnMut(NodeIndex, &mut V) -> bool,
    {
        if let Err(reason) = self.check_traversal(root, options) {
            return Traversal::Skipped(reason);
        }

        Exclusive {
            tree: self,
            filter: options.filter,
            visitor,
        }
        .run(root, options)
    }

    /// Like [`Tree::traverse`], but takes integer encoded options.
    ///
    /// `order` is the discriminant of an [`Order`], `flags` the bits of a
    /// [`Filter`] and `depth` either `-1` for an unbounded walk or a positive
    /// level count. Anything else skips the traversal.
    pub fn traverse_raw<F>(
        &self,
        root: NodeIndex,
        order: i32,
        flags: i32,
        depth: i32,
        visitor: F,
    ) -> Traversal
    where
        F: FnMut(NodeRef<'_, V>) -> bool,
    {
        match TraverseOptions::from_raw(order, flags, depth) {
            Ok(options) => self.traverse(root, &options, visitor),
            Err(err) => {
                debug!(?root, %err, "skipped traversal");
                Traversal::Skipped(SkipReason::InvalidOptions(err))
            }
        }
    }

    fn check_traversal(&self, root: NodeIndex, options: &TraverseOptions) -> Result<(), SkipReason> {
        let reason = if !self.contains(root) {
            SkipReason::UnknownRoot
        } else if options.order == Order::LevelOrder {
            SkipReason::UnsupportedOrder(options.order)
        } else {
            return Ok(());
        };

        debug!(?root, ?reason, "skipped traversal");
        Err(reason)
    }
}

/// A node whose children are still being walked.
struct Frame {
    node: NodeIndex,
    /// The next child to descend into.
    next: Option<NodeIndex>,
    /// Levels left below this node's children, `None` when unbounded.
    remaining: Option<usize>,
    /// In-order only: the node is visited once its first child is done.
    pending: bool,
}

/// Links and visiting shared by the order-specific walks.
///
/// The walks keep their own stack of [`Frame`]s instead of recursing, so
/// the tree height is limited by memory only. Every walk returns
/// [`ControlFlow::Break`] as soon as the visitor asks to stop.
trait Walk {
    fn first_child(&self, node: NodeIndex) -> Option<NodeIndex>;

    fn next_sibling(&self, node: NodeIndex) -> Option<NodeIndex>;

    fn filter(&self) -> Filter;

    /// Hands the node to the visitor unconditionally.
    fn visit(&mut self, node: NodeIndex) -> ControlFlow<()>;

    /// Hands the node to the visitor if its class passes the filter.
    #[inline]
    fn select(&mut self, node: NodeIndex, is_leaf: bool) -> ControlFlow<()> {
        if self.filter().admits(is_leaf) {
            self.visit(node)
        } else {
            ControlFlow::Continue(())
        }
    }

    fn run(&mut self, root: NodeIndex, options: &TraverseOptions) -> Traversal {
        let limit = match options.depth {
            Depth::Unbounded => None,
            Depth::Limited(depth) => Some(depth.get()),
        };

        let flow = match options.order {
            Order::PreOrder => self.pre_order(root, limit),
            Order::InOrder => self.in_order(root, limit),
            Order::PostOrder => self.post_order(root, limit),
            Order::LevelOrder => {
                return Traversal::Skipped(SkipReason::UnsupportedOrder(Order::LevelOrder))
            }
        };

        match flow {
            ControlFlow::Continue(()) => Traversal::Completed,
            ControlFlow::Break(()) => Traversal::Stopped,
        }
    }

    /// Visits a node before its children.
    fn pre_order(&mut self, root: NodeIndex, limit: Option<usize>) -> ControlFlow<()> {
        let mut stack = Vec::new();
        self.enter_pre_order(root, limit, &mut stack)?;

        while let Some(frame) = stack.last_mut() {
            let Some(child) = frame.next else {
                stack.pop();
                continue;
            };
            frame.next = self.next_sibling(child);
            let remaining = frame.remaining;
            self.enter_pre_order(child, remaining, &mut stack)?;
        }

        ControlFlow::Continue(())
    }

    fn enter_pre_order(
        &mut self,
        node: NodeIndex,
        remaining: Option<usize>,
        stack: &mut Vec<Frame>,
    ) -> ControlFlow<()> {
        let Some(first) = self.first_child(node) else {
            return self.select(node, true);
        };

        self.select(node, false)?;

        let remaining = remaining.map(|depth| depth - 1);
        if remaining != Some(0) {
            stack.push(Frame {
                node,
                next: Some(first),
                remaining,
                pending: false,
            });
        }

        ControlFlow::Continue(())
    }

    /// Walks the first child, then the node, then the remaining children.
    ///
    /// Without a depth limit non-leaf nodes bypass the filter.
    fn in_order(&mut self, root: NodeIndex, limit: Option<usize>) -> ControlFlow<()> {
        let mut stack = Vec::new();
        self.enter_in_order(root, limit, &mut stack)?;

        while let Some(frame) = stack.last_mut() {
            if frame.pending {
                frame.pending = false;
                let (node, limited) = (frame.node, frame.remaining.is_some());
                if limited {
                    self.select(node, false)?;
                } else {
                    self.visit(node)?;
                }
                continue;
            }

            let Some(child) = frame.next else {
                stack.pop();
                continue;
            };
            frame.next = self.next_sibling(child);
            let remaining = frame.remaining;
            self.enter_in_order(child, remaining, &mut stack)?;
        }

        ControlFlow::Continue(())
    }

    /// Descends along first children, leaving a pending frame per level.
    fn enter_in_order(
        &mut self,
        mut node: NodeIndex,
        mut remaining: Option<usize>,
        stack: &mut Vec<Frame>,
    ) -> ControlFlow<()> {
        loop {
            let Some(first) = self.first_child(node) else {
                return self.select(node, true);
            };

            remaining = remaining.map(|depth| depth - 1);
            if remaining == Some(0) {
                return self.select(node, false);
            }

            stack.push(Frame {
                node,
                next: self.next_sibling(first),
                remaining,
                pending: true,
            });
            node = first;
        }
    }

    /// Visits a node after its children.
    fn post_order(&mut self, root: NodeIndex, limit: Option<usize>) -> ControlFlow<()> {
        let mut stack = Vec::new();
        self.enter_post_order(root, limit, &mut stack)?;

        while let Some(frame) = stack.last_mut() {
            let Some(child) = frame.next else {
                let node = frame.node;
                stack.pop();
                self.select(node, false)?;
                continue;
            };
            frame.next = self.next_sibling(child);
            let remaining = frame.remaining;
            self.enter_post_order(child, remaining, &mut stack)?;
        }

        ControlFlow::Continue(())
    }

    fn enter_post_order(
        &mut self,
        node: NodeIndex,
        remaining: Option<usize>,
        stack: &mut Vec<Frame>,
    ) -> ControlFlow<()> {
        let Some(first) = self.first_child(node) else {
            return self.select(node, true);
        };

        let remaining = remaining.map(|depth| depth - 1);
        if remaining == Some(0) {
            return self.select(node, false);
        }

        stack.push(Frame {
            node,
            next: Some(first),
            remaining,
            pending: false,
        });
        ControlFlow::Continue(())
    }
}

/// Walks a shared tree, handing out [`NodeRef`]s.
struct Shared<'a, V, F> {
    tree: &'a Tree<V>,
    filter: Filter,
    visitor: F,
}

impl<'a, V, F> Walk for Shared<'a, V, F>
where
    F: FnMut(NodeRef<'_, V>) -> bool,
{
    #[inline]
    fn first_child(&self, node: NodeIndex) -> Option<NodeIndex> {
        self.tree.nodes[node].first_child()
    }

    #[inline]
    fn next_sibling(&self, node: NodeIndex) -> Option<NodeIndex> {
        self.tree.nodes[node].next_sibling()
    }

    #[inline]
    fn filter(&self) -> Filter {
        self.filter
    }

    #[inline]
    fn visit(&mut self, node: NodeIndex) -> ControlFlow<()> {
        if (self.visitor)(NodeRef::new(self.tree, node)) {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    }
}

/// Walks an exclusively borrowed tree, handing out mutable values.
struct Exclusive<'a, V, F> {
    tree: &'a mut Tree<V>,
    filter: Filter,
    visitor: F,
}

impl<'a, V, F> Walk for Exclusive<'a, V, F>
where
    F: FnMut(NodeIndex, &mut V) -> bool,
{
    #[inline]
    fn first_child(&self, node: NodeIndex) -> Option<NodeIndex> {
        self.tree.nodes[node].first_child()
    }

    #[inline]
    fn next_sibling(&self, node: NodeIndex) -> Option<NodeIndex> {
        self.tree.nodes[node].next_sibling()
    }

    #[inline]
    fn filter(&self) -> Filter {
        self.filter
    }

    #[inline]
    fn visit(&mut self, node: NodeIndex) -> ControlFlow<()> {
        if (self.visitor)(node, &mut self.tree.nodes[node].value) {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    }
}
