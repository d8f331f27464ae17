//! Error types returned by [`RBTreeMap`](crate::RBTreeMap) and
//! [`BoundedStack`](crate::BoundedStack).
//!
//! None of these are fatal: every failing operation leaves its receiver exactly
//! as it was before the call.

use thiserror::Error;

/// Failure of a map operation.
///
/// # Examples
///
/// ```
/// use rbt_map::{MapError, RBTreeMap};
///
/// let mut map = RBTreeMap::new();
/// map.insert(1, "a").unwrap();
///
/// assert_eq!(map.insert(1, "b"), Err(MapError::KeyAlreadyExists));
/// assert_eq!(map.search(&2), Err(MapError::KeyNotFound));
/// assert_eq!(map.search(&1), Ok(&"a"));
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Error)]
pub enum MapError {
    /// `insert` was called with a key that is already present.
    #[error("key already exists in the map")]
    KeyAlreadyExists,
    /// The key passed to `search`, `modify`, `delete` or `subtree_height` is absent.
    #[error("key not found in the map")]
    KeyNotFound,
    /// `try_next` was called on a traversal with nothing left to yield.
    #[error("iterator has no remaining elements")]
    IteratorExhausted,
}

/// Failure of a [`BoundedStack`](crate::BoundedStack) operation.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Error)]
pub enum StackError {
    /// `push` on a stack already holding `capacity` elements.
    #[error("bounded stack is full (capacity {capacity})")]
    Full {
        /// The fixed capacity of the stack.
        capacity: usize,
    },
    /// `pop` or `top` on an empty stack.
    #[error("bounded stack is empty")]
    Empty,
}

/// The first red-black or bookkeeping invariant found broken by
/// [`RBTreeMap::check`](crate::RBTreeMap::check).
///
/// Nodes are identified by their arena slot number.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Error)]
#[non_exhaustive]
pub enum InvariantViolation {
    /// The tree is non-empty and its root is red.
    #[error("root is red")]
    RedRoot,
    /// A red node has a red child.
    #[error("red node in slot {slot} has a red child")]
    RedRedEdge {
        /// Slot of the red parent.
        slot: usize,
    },
    /// The two subtrees of a node have different black-heights.
    #[error("black-height differs below slot {slot}: left {left}, right {right}")]
    BlackHeightMismatch {
        /// Slot of the node whose subtrees disagree.
        slot: usize,
        /// Black-height through the left child.
        left: usize,
        /// Black-height through the right child.
        right: usize,
    },
    /// A node's stored height does not match its children.
    #[error("stored height of slot {slot} is {stored}, recomputed {actual}")]
    StaleHeight {
        /// Slot of the node.
        slot: usize,
        /// Height recorded in the node.
        stored: usize,
        /// Height recomputed from the subtree.
        actual: usize,
    },
    /// A key is not strictly between its in-order neighbours.
    #[error("key in slot {slot} is out of order")]
    OutOfOrder {
        /// Slot of the misplaced node.
        slot: usize,
    },
    /// A child's parent link does not point back at its parent.
    #[error("parent link of slot {slot} is broken")]
    BrokenParentLink {
        /// Slot of the child.
        slot: usize,
    },
    /// The recorded length disagrees with the number of reachable nodes.
    #[error("tree reaches {actual} nodes but records {recorded}")]
    LengthMismatch {
        /// Length recorded by the map.
        recorded: usize,
        /// Nodes reachable from the root.
        actual: usize,
    },
}
