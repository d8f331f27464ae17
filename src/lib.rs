//! A red-black tree ordered map for Rust.
//!
//! This crate provides [`RBTreeMap`], an ordered key-value map that keeps its
//! entries in a self-balancing red-black tree. Every node carries the height of
//! its subtree, so the tree height is available in O(1):
//!
//! - [`insert`](RBTreeMap::insert) refuses duplicate keys instead of overwriting
//! - [`modify`](RBTreeMap::modify) replaces the value of an existing key
//! - [`height`](RBTreeMap::height) and [`subtree_height`](RBTreeMap::subtree_height)
//!   read the stored annotations
//! - [`check`](RBTreeMap::check) recomputes every invariant from scratch
//!
//! # Example
//!
//! ```
//! use rbt_map::{MapError, RBTreeMap};
//!
//! let mut map = RBTreeMap::new();
//! for key in [10, 20, 5, 15, 25, 1] {
//!     map.insert(key, key * 100).unwrap();
//! }
//!
//! assert_eq!(map.search(&15), Ok(&1500));
//! assert_eq!(map.insert(15, 0), Err(MapError::KeyAlreadyExists));
//!
//! map.modify(&15, 42).unwrap();
//! map.delete(&10).unwrap();
//!
//! let keys: Vec<_> = map.keys().copied().collect();
//! assert_eq!(keys, [1, 5, 15, 20, 25]);
//! assert!(map.validate());
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`, no standard library dependency
//! - **Guaranteed balance** - Height never exceeds `2 * log2(n + 1)`
//! - **No recursion** - Traversal and validation use explicit stacks
//! - **Arena storage** - Nodes live in one slot table and link by index
//!
//! # Implementation
//!
//! Nodes are stored in an arena and refer to their children and parent through
//! compact handles. Insertion attaches a red leaf and repairs the tree with
//! recoloring and at most two rotations; deletion splices out a node with at most
//! one child and repairs any black deficit. After either, subtree heights are
//! refreshed along the single affected root path.
//!
//! [`BoundedStack`] is the fixed-capacity stack the iterators walk with; it is
//! exported for reuse.

#![no_std]
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

mod bounded_stack;
mod error;
mod raw;

pub mod rbtree_map;

pub use bounded_stack::BoundedStack;
pub use error::{InvariantViolation, MapError, StackError};
pub use rbtree_map::RBTreeMap;
