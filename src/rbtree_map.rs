use core::borrow::Borrow;
use core::fmt;
use core::iter::FusedIterator;

use crate::error::MapError;
use crate::raw::{InOrder, RawRBTreeMap};

mod capacity;
mod diagnostics;

/// An ordered map based on a [red-black tree].
///
/// Keys must implement [`Ord`]; entries are kept in key order and each key is
/// stored at most once. Unlike `BTreeMap::insert`, [`insert`](RBTreeMap::insert)
/// refuses to overwrite: replacing a value is an explicit
/// [`modify`](RBTreeMap::modify).
///
/// Every node records the height of its subtree, so [`height`](RBTreeMap::height)
/// is a constant-time read. The red-black rules keep that height at most
/// `2 * log2(n + 1)` whatever the insertion order.
///
/// Nodes live in an arena and refer to their children and parent by index, so
/// the map is a single allocation-owning value with no reference counting.
///
/// It is a logic error for a key to be modified in such a way that its ordering
/// relative to any other key changes while it is in the map. The behavior
/// resulting from such a logic error is not specified, but will be encapsulated
/// to the `RBTreeMap` that observed it and not result in undefined behavior.
///
/// # Examples
///
/// ```
/// use rbt_map::{MapError, RBTreeMap};
///
/// let mut greetings = RBTreeMap::new();
/// greetings.insert(1, "hello").unwrap();
/// greetings.insert(2, "test").unwrap();
///
/// let keys: Vec<_> = greetings.keys().copied().collect();
/// assert_eq!(keys, [1, 2]);
///
/// greetings.delete(&2).unwrap();
/// assert_eq!(greetings.search(&2), Err(MapError::KeyNotFound));
/// assert_eq!(greetings.search(&1), Ok(&"hello"));
/// ```
///
/// [red-black tree]: https://en.wikipedia.org/wiki/Red%E2%80%93black_tree
pub struct RBTreeMap<K, V> {
    raw: RawRBTreeMap<K, V>,
}

/// An iterator over the entries of a `RBTreeMap`, in ascending key order.
///
/// This `struct` is created by the [`iter`] method on [`RBTreeMap`]. It walks
/// the tree with an explicit stack bounded by the tree height, so it never
/// recurses.
///
/// # Examples
///
/// ```
/// use rbt_map::RBTreeMap;
///
/// let mut map = RBTreeMap::new();
/// map.insert(2, "b").unwrap();
/// map.insert(1, "a").unwrap();
///
/// let mut iter = map.iter();
/// assert_eq!(iter.next(), Some((&1, &"a")));
/// assert_eq!(iter.next(), Some((&2, &"b")));
/// assert_eq!(iter.next(), None);
/// ```
///
/// [`iter`]: RBTreeMap::iter
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, K, V> {
    inner: InOrder<'a, K, V>,
}

/// An iterator over the keys of a `RBTreeMap`, in ascending order.
///
/// This `struct` is created by the [`keys`] method on [`RBTreeMap`].
///
/// [`keys`]: RBTreeMap::keys
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

/// An iterator over the values of a `RBTreeMap`, in key order.
///
/// This `struct` is created by the [`values`] method on [`RBTreeMap`].
///
/// [`values`]: RBTreeMap::values
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<K, V> RBTreeMap<K, V> {
    /// Makes a new, empty `RBTreeMap`.
    ///
    /// Does not allocate anything on its own.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbt_map::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// map.insert(1, "a").unwrap();
    /// ```
    #[must_use]
    pub const fn new() -> RBTreeMap<K, V> {
        RBTreeMap {
            raw: RawRBTreeMap::new(),
        }
    }

    /// Clears the map, removing all elements.
    ///
    /// # Complexity
    ///
    /// O(n)
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Returns the number of elements in the map.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub const fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns the number of key-value pairs in the map. Same as [`len`](RBTreeMap::len).
    #[must_use]
    pub const fn size(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the map contains no elements.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Returns the height of the tree: the number of nodes on its longest
    /// root-to-leaf path, or `0` when the map is empty.
    ///
    /// Never more than `2 * log2(len + 1)`.
    ///
    /// # Complexity
    ///
    /// O(1)
    ///
    /// # Examples
    ///
    /// ```
    /// use rbt_map::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// assert_eq!(map.height(), 0);
    ///
    /// for key in 1..=1000 {
    ///     map.insert(key, ()).unwrap();
    /// }
    /// assert!(map.height() <= 19);
    /// ```
    #[must_use]
    pub fn height(&self) -> usize {
        self.raw.height()
    }

    /// Returns the entry with the smallest key.
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
    /// assert_eq!(map.first_key_value(), None);
    /// map.insert(2, "b").unwrap();
    /// map.insert(1, "a").unwrap();
    /// assert_eq!(map.first_key_value(), Some((&1, &"a")));
    /// ```
    #[must_use]
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.raw.first_key_value()
    }

    /// Returns the entry with the largest key.
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.raw.last_key_value()
    }

    /// Gets an iterator over the entries of the map, sorted by key.
    ///
    /// Each call starts a fresh traversal. The iterator borrows the map, so the
    /// map cannot be changed while it is alive.
    ///
    /// # Complexity
    ///
    /// O(1) to create, O(n) to exhaust; auxiliary memory is O(height).
    ///
    /// # Examples
    ///
    /// ```
    /// use rbt_map::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// map.insert(3, "c").unwrap();
    /// map.insert(2, "b").unwrap();
    /// map.insert(1, "a").unwrap();
    ///
    /// for (key, value) in map.iter() {
    ///     println!("{key}: {value}");
    /// }
    ///
    /// let (first_key, first_value) = map.iter().next().unwrap();
    /// assert_eq!((*first_key, *first_value), (1, "a"));
    /// ```
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.raw.in_order(),
        }
    }

    /// Gets an iterator over the keys of the map, in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbt_map::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// for key in [10, 20, 5, 15, 25, 1] {
    ///     map.insert(key, ()).unwrap();
    /// }
    ///
    /// let keys: Vec<_> = map.keys().copied().collect();
    /// assert_eq!(keys, [1, 5, 10, 15, 20, 25]);
    /// ```
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    /// Gets an iterator over the values of the map, in order by key.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbt_map::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// map.insert(1, "hello").unwrap();
    /// map.insert(2, "goodbye").unwrap();
    ///
    /// let values: Vec<&str> = map.values().cloned().collect();
    /// assert_eq!(values, ["hello", "goodbye"]);
    /// ```
    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }
}

impl<K: Ord, V> RBTreeMap<K, V> {
    /// Returns a reference to the value corresponding to the key.
    ///
    /// The key may be any borrowed form of the map's key type, but the ordering
    /// on the borrowed form *must* match the ordering on the key type.
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
    /// use rbt_map::{MapError, RBTreeMap};
    ///
    /// let mut map = RBTreeMap::new();
    /// map.insert(String::from("one"), 1).unwrap();
    /// assert_eq!(map.search("one"), Ok(&1));
    /// assert_eq!(map.search("two"), Err(MapError::KeyNotFound));
    /// ```
    pub fn search<Q>(&self, key: &Q) -> Result<&V, MapError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.get(key).ok_or(MapError::KeyNotFound)
    }

    /// Returns a reference to the value corresponding to the key, or `None`.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.get_key_value(key).map(|(_, value)| value)
    }

    /// Returns the stored key and its value.
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.get_key_value(key)
    }

    /// Returns a mutable reference to the value corresponding to the key.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbt_map::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// map.insert(1, 10).unwrap();
    /// if let Some(value) = map.get_mut(&1) {
    ///     *value += 1;
    /// }
    /// assert_eq!(map.get(&1), Some(&11));
    /// ```
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.get_mut(key)
    }

    /// Returns `true` if the map contains a value for the specified key.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.find(key).is_some()
    }

    /// Inserts a key-value pair into the map.
    ///
    /// The new entry is attached as a red leaf and the tree is then recolored and
    /// rotated back into red-black shape.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::KeyAlreadyExists`] if the key is already present. The
    /// map is left unchanged and keeps the value stored first.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use rbt_map::{MapError, RBTreeMap};
    ///
    /// let mut map = RBTreeMap::new();
    /// assert_eq!(map.insert(37, "a"), Ok(()));
    /// assert_eq!(map.insert(37, "b"), Err(MapError::KeyAlreadyExists));
    /// assert_eq!(map.search(&37), Ok(&"a"));
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Result<(), MapError> {
        self.raw.insert(key, value)
    }

    /// Replaces the value stored for `key`, returning the previous one.
    ///
    /// The tree's shape and colors are untouched.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::KeyNotFound`] if the key is not in the map. Nothing is
    /// inserted in that case.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbt_map::{MapError, RBTreeMap};
    ///
    /// let mut map = RBTreeMap::new();
    /// map.insert(1, "a").unwrap();
    /// assert_eq!(map.modify(&1, "b"), Ok("a"));
    /// assert_eq!(map.modify(&2, "c"), Err(MapError::KeyNotFound));
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn modify<Q>(&mut self, key: &Q, value: V) -> Result<V, MapError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let slot = self.raw.get_mut(key).ok_or(MapError::KeyNotFound)?;
        Ok(core::mem::replace(slot, value))
    }

    /// Removes a key from the map, returning the value that was stored for it.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::KeyNotFound`] if the key is not in the map; the map is
    /// left unchanged.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use rbt_map::{MapError, RBTreeMap};
    ///
    /// let mut map = RBTreeMap::new();
    /// map.insert(1, "a").unwrap();
    /// assert_eq!(map.delete(&1), Ok("a"));
    /// assert_eq!(map.delete(&1), Err(MapError::KeyNotFound));
    /// ```
    pub fn delete<Q>(&mut self, key: &Q) -> Result<V, MapError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.remove_entry(key).map(|(_, value)| value).ok_or(MapError::KeyNotFound)
    }

    /// Removes a key from the map, returning the stored key and value if the key
    /// was previously in the map.
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.remove_entry(key)
    }
}

impl<K: Clone, V: Clone> Clone for RBTreeMap<K, V> {
    fn clone(&self) -> Self {
        RBTreeMap { raw: self.raw.clone() }
    }
}

impl<K: PartialEq, V: PartialEq> PartialEq for RBTreeMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl<K: Eq, V: Eq> Eq for RBTreeMap<K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for RBTreeMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V> Default for RBTreeMap<K, V> {
    fn default() -> Self {
        RBTreeMap::new()
    }
}

impl<'a, K, V> IntoIterator for &'a RBTreeMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

impl<'a, K, V> Iter<'a, K, V> {
    /// Advances the traversal like [`Iterator::next`], but reports the end as an
    /// error.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::IteratorExhausted`] once every entry has been yielded,
    /// and on every call after that.
    pub fn try_next(&mut self) -> Result<(&'a K, &'a V), MapError> {
        self.next().ok_or(MapError::IteratorExhausted)
    }
}

impl<'a, K: 'a, V: 'a> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next_node().map(|node| (&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.inner.remaining(), Some(self.inner.remaining()))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {
    fn len(&self) -> usize {
        self.inner.remaining()
    }
}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Iter {
            inner: self.inner.clone(),
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Iter<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<'a, K, V> Keys<'a, K, V> {
    /// Advances the traversal like [`Iterator::next`], but reports the end as an
    /// error.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::IteratorExhausted`] once every key has been yielded.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbt_map::{MapError, RBTreeMap};
    ///
    /// let mut map = RBTreeMap::new();
    /// map.insert(1, "one").unwrap();
    ///
    /// let mut keys = map.keys();
    /// assert_eq!(keys.try_next(), Ok(&1));
    /// assert_eq!(keys.try_next(), Err(MapError::IteratorExhausted));
    /// ```
    pub fn try_next(&mut self) -> Result<&'a K, MapError> {
        self.inner.try_next().map(|(key, _)| key)
    }
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        self.inner.next().map(|(key, _)| key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for Keys<'_, K, V> {}

impl<K, V> Clone for Keys<'_, K, V> {
    fn clone(&self) -> Self {
        Keys {
            inner: self.inner.clone(),
        }
    }
}

impl<K: fmt::Debug, V> fmt::Debug for Keys<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<&'a V> {
        self.inner.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for Values<'_, K, V> {}

impl<K, V> Clone for Values<'_, K, V> {
    fn clone(&self) -> Self {
        Values {
            inner: self.inner.clone(),
        }
    }
}

impl<K, V: fmt::Debug> fmt::Debug for Values<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}
