//! Parameters that select how a traversal walks a tree.
use std::num::NonZeroUsize;

use thiserror::Error;

/// The position of a node's visit relative to the visits of its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Order {
    /// Visit the first child's subtree, then the node, then the remaining children.
    InOrder = 0,
    /// Visit the node before its children.
    PreOrder = 1,
    /// Visit the node after its children.
    PostOrder = 2,
    /// Breadth-first. Selectable but not supported: traversals requesting it
    /// are skipped.
    LevelOrder = 3,
}

impl Order {
    pub const ALL: [Order; 4] = [
        Order::InOrder,
        Order::PreOrder,
        Order::PostOrder,
        Order::LevelOrder,
    ];
}

impl TryFrom<i32> for Order {
    type Error = OptionsError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Order::InOrder),
            1 => Ok(Order::PreOrder),
            2 => Ok(Order::PostOrder),
            3 => Ok(Order::LevelOrder),
            _ => Err(OptionsError::InvalidOrder(value)),
        }
    }
}

/// Selects which classes of nodes are handed to the visitor.
///
/// A node is a leaf when it has no children at the moment it is classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Filter {
    Leaves = 0b01,
    NonLeaves = 0b10,
    All = 0b11,
}

impl Filter {
    /// The bits a filter may carry.
    pub const MASK: i32 = 0b11;

    #[inline]
    pub fn bits(self) -> i32 {
        self as i32
    }

    /// Returns the filter with exactly the given bits, if there is one.
    pub fn from_bits(bits: i32) -> Option<Self> {
        match bits {
            0b01 => Some(Filter::Leaves),
            0b10 => Some(Filter::NonLeaves),
            0b11 => Some(Filter::All),
            _ => None,
        }
    }

    /// Returns whether a node of the given class passes the filter.
    #[inline]
    pub fn admits(self, is_leaf: bool) -> bool {
        let class = if is_leaf {
            Filter::Leaves
        } else {
            Filter::NonLeaves
        };
        self.bits() & class.bits() != 0
    }
}

impl Default for Filter {
    fn default() -> Self {
        Filter::All
    }
}

/// How many levels a traversal may descend, counting the starting node as
/// the first level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Depth {
    #[default]
    Unbounded,
    Limited(NonZeroUsize),
}

impl Depth {
    /// A depth limit of `levels`, or `None` when `levels` is zero.
    pub fn limited(levels: usize) -> Option<Self> {
        NonZeroUsize::new(levels).map(Depth::Limited)
    }
}

impl TryFrom<i32> for Depth {
    type Error = OptionsError;

    /// Accepts `-1` for an unbounded walk and any positive level count.
    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(Depth::Unbounded),
            levels if levels > 0 => Ok(Depth::Limited(
                NonZeroUsize::new(levels as usize).ok_or(OptionsError::InvalidDepth(value))?,
            )),
            _ => Err(OptionsError::InvalidDepth(value)),
        }
    }
}

/// The full configuration of a traversal.
///
/// The default walks every node in pre-order without a depth limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TraverseOptions {
    pub order: Order,
    pub filter: Filter,
    pub depth: Depth,
}

impl Default for TraverseOptions {
    fn default() -> Self {
        Self {
            order: Order::PreOrder,
            filter: Filter::All,
            depth: Depth::Unbounded,
        }
    }
}

impl TraverseOptions {
    pub fn new(order: Order, filter: Filter, depth: Depth) -> Self {
        Self {
            order,
            filter,
            depth,
        }
    }

    /// Validates integer encoded options.
    ///
    /// # Errors
    ///
    /// Fails on an order outside `0..=3`, on filter bits that are not one of
    /// `1`, `2` or `3`, and on a depth that is neither `-1` nor positive.
    pub fn from_raw(order: i32, flags: i32, depth: i32) -> Result<Self, OptionsError> {
        Ok(Self {
            order: Order::try_from(order)?,
            filter: Filter::from_bits(flags).ok_or(OptionsError::InvalidFilter(flags))?,
            depth: Depth::try_from(depth)?,
        })
    }

    #[must_use]
    pub fn with_order(mut self, order: Order) -> Self {
        self.order = order;
        self
    }

    #[must_use]
    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filter = filter;
        self
    }

    #[must_use]
    pub fn with_depth(mut self, depth: Depth) -> Self {
        self.depth = depth;
        self
    }
}

/// Error returned when integer encoded traversal options are out of range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum OptionsError {
    #[error("unknown traversal order {0}")]
    InvalidOrder(i32),
    #[error("invalid node filter {0:#x}")]
    InvalidFilter(i32),
    #[error("invalid depth {0}, expected -1 or a positive level count")]
    InvalidDepth(i32),
}
