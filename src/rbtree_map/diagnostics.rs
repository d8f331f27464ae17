use core::borrow::Borrow;

use log::debug;

use super::RBTreeMap;
use crate::error::{InvariantViolation, MapError};

impl<K: Ord, V> RBTreeMap<K, V> {
    /// Returns the height of the subtree rooted at the node holding `key`.
    ///
    /// A leaf has height 1. The value is the annotation stored in the node, kept
    /// current by every insert and delete.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::KeyNotFound`] if the key is not in the map.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use rbt_map::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// for key in [10, 20, 5] {
    ///     map.insert(key, ()).unwrap();
    /// }
    /// assert_eq!(map.subtree_height(&10), Ok(2));
    /// assert_eq!(map.subtree_height(&5), Ok(1));
    /// ```
    pub fn subtree_height<Q>(&self, key: &Q) -> Result<usize, MapError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.subtree_height(key).ok_or(MapError::KeyNotFound)
    }

    /// Recomputes every structural invariant from scratch and reports the first
    /// one found broken:
    ///
    /// - the root is black and every red node has black children;
    /// - every root-to-absent-child path crosses the same number of black nodes;
    /// - keys strictly increase in order and parent links mirror child links;
    /// - each stored subtree height matches its children;
    /// - the recorded length equals the number of reachable nodes.
    ///
    /// # Errors
    ///
    /// Returns the first [`InvariantViolation`] encountered.
    ///
    /// # Complexity
    ///
    /// O(n)
    ///
    /// # Examples
    ///
    /// ```
    /// use rbt_map::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// for key in 0..64 {
    ///     map.insert(key, key).unwrap();
    /// }
    /// assert_eq!(map.check(), Ok(()));
    /// ```
    pub fn check(&self) -> Result<(), InvariantViolation> {
        self.raw.check()
    }

    /// Returns `true` if [`check`](RBTreeMap::check) finds nothing wrong.
    ///
    /// A failure is reported through the `log` facade at debug level.
    #[must_use]
    pub fn validate(&self) -> bool {
        match self.raw.check() {
            Ok(()) => true,
            Err(violation) => {
                debug!("red-black tree failed validation: {violation}");
                false
            }
        }
    }
}
