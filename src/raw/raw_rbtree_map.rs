use core::borrow::Borrow;
use core::cmp::Ordering;
use core::mem;

use log::trace;
use smallvec::SmallVec;

use super::arena::Arena;
use super::handle::Handle;
use super::node::{Color, Node, Side};
use crate::bounded_stack::BoundedStack;
use crate::error::{InvariantViolation, MapError};

/// The red-black tree backing `RBTreeMap`.
#[derive(Clone)]
pub(crate) struct RawRBTreeMap<K, V> {
    /// Arena owning every node; links between nodes are handles into it.
    nodes: Arena<Node<K, V>>,
    /// Handle to the root node, if the tree is non-empty.
    root: Option<Handle>,
    /// Number of key-value pairs in the tree.
    len: usize,
}

impl<K, V> RawRBTreeMap<K, V> {
    /// Creates a new, empty tree.
    pub(crate) const fn new() -> Self {
        Self {
            nodes: Arena::new(),
            root: None,
            len: 0,
        }
    }

    /// Creates a new tree with room for `capacity` nodes.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Arena::with_capacity(capacity),
            root: None,
            len: 0,
        }
    }

    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub(crate) fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    /// Nodes on the longest root-to-leaf path; zero for an empty tree.
    pub(crate) fn height(&self) -> usize {
        self.height_of(self.root) as usize
    }

    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
        self.len = 0;
    }

    pub(crate) fn node(&self, handle: Handle) -> &Node<K, V> {
        self.nodes.get(handle)
    }

    // Absent children count as black leaves of height zero.

    #[inline]
    fn height_of(&self, handle: Option<Handle>) -> u32 {
        handle.map_or(0, |h| self.nodes.get(h).height)
    }

    #[inline]
    fn is_red(&self, handle: Option<Handle>) -> bool {
        handle.is_some_and(|h| self.nodes.get(h).is_red())
    }

    #[inline]
    fn set_color(&mut self, handle: Handle, color: Color) {
        self.nodes.get_mut(handle).color = color;
    }

    #[inline]
    fn parent_of(&self, handle: Handle) -> Option<Handle> {
        self.nodes.get(handle).parent
    }

    /// Which slot of `parent` holds `child`.
    fn side_of(&self, child: Option<Handle>, parent: Handle) -> Side {
        if self.nodes.get(parent).left == child {
            Side::Left
        } else {
            Side::Right
        }
    }

    fn update_height(&mut self, handle: Handle) {
        let node = self.nodes.get(handle);
        let height = 1 + self.height_of(node.left).max(self.height_of(node.right));
        self.nodes.get_mut(handle).height = height;
    }

    /// Recomputes heights from `from` up to the root.
    fn refresh_heights(&mut self, from: Option<Handle>) {
        let mut current = from;
        while let Some(handle) = current {
            self.update_height(handle);
            current = self.parent_of(handle);
        }
    }

    /// Points whatever referenced `old` (a parent slot or the root) at `new`.
    fn replace_child(&mut self, parent: Option<Handle>, old: Handle, new: Option<Handle>) {
        match parent {
            None => self.root = new,
            Some(parent) => {
                let side = self.side_of(Some(old), parent);
                self.nodes.get_mut(parent).set_child(side, new);
            }
        }
    }

    /// Rotates the subtree at `top` so that `top` moves down towards `direction`
    /// and its child on the opposite side takes its place.
    ///
    /// `rotate(x, Side::Left)` is the textbook left rotation. Heights of the two
    /// rotated nodes are recomputed from their new children; ancestors are left to
    /// the caller's upward walk.
    fn rotate(&mut self, top: Handle, direction: Side) {
        let riser = self
            .nodes
            .get(top)
            .child(direction.opposite())
            .expect("`RawRBTreeMap::rotate()` - no child to rotate up!");
        let inner = self.nodes.get(riser).child(direction);
        let parent = self.parent_of(top);

        trace!("rotate {direction:?} at {top:?}, {riser:?} rises");

        self.nodes.get_mut(top).set_child(direction.opposite(), inner);
        if let Some(inner) = inner {
            self.nodes.get_mut(inner).parent = Some(top);
        }

        self.replace_child(parent, top, Some(riser));
        self.nodes.get_mut(riser).parent = parent;

        self.nodes.get_mut(riser).set_child(direction, Some(top));
        self.nodes.get_mut(top).parent = Some(riser);

        self.update_height(top);
        self.update_height(riser);
    }

    fn leftmost(&self, from: Handle) -> Handle {
        let mut current = from;
        while let Some(left) = self.nodes.get(current).left {
            current = left;
        }
        current
    }

    fn rightmost(&self, from: Handle) -> Handle {
        let mut current = from;
        while let Some(right) = self.nodes.get(current).right {
            current = right;
        }
        current
    }

    pub(crate) fn first_key_value(&self) -> Option<(&K, &V)> {
        let node = self.nodes.get(self.leftmost(self.root?));
        Some((&node.key, &node.value))
    }

    pub(crate) fn last_key_value(&self) -> Option<(&K, &V)> {
        let node = self.nodes.get(self.rightmost(self.root?));
        Some((&node.key, &node.value))
    }

    /// Starts an ascending traversal over the tree.
    pub(crate) fn in_order(&self) -> InOrder<'_, K, V> {
        InOrder {
            tree: self,
            pending: BoundedStack::new(self.height()),
            current: self.root,
            remaining: self.len,
        }
    }
}

impl<K: Ord, V> RawRBTreeMap<K, V> {
    /// Walks down from the root to the node holding `key`.
    pub(crate) fn find<Q>(&self, key: &Q) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut current = self.root;
        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            current = match key.cmp(node.key.borrow()) {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => return Some(handle),
            };
        }
        None
    }

    pub(crate) fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let node = self.nodes.get(self.find(key)?);
        Some((&node.key, &node.value))
    }

    pub(crate) fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let handle = self.find(key)?;
        Some(&mut self.nodes.get_mut(handle).value)
    }

    /// Height of the subtree rooted at the node holding `key`.
    pub(crate) fn subtree_height<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.find(key).map(|handle| self.nodes.get(handle).height as usize)
    }

    /// Inserts a new key-value pair. An existing key is an error and leaves the
    /// tree untouched.
    pub(crate) fn insert(&mut self, key: K, value: V) -> Result<(), MapError> {
        let mut parent = None;
        let mut side = Side::Left;
        let mut current = self.root;

        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            side = match key.cmp(&node.key) {
                Ordering::Less => Side::Left,
                Ordering::Greater => Side::Right,
                Ordering::Equal => return Err(MapError::KeyAlreadyExists),
            };
            parent = Some(handle);
            current = node.child(side);
        }

        let handle = self.nodes.alloc(Node::new_leaf(key, value, parent));
        match parent {
            None => self.root = Some(handle),
            Some(parent) => self.nodes.get_mut(parent).set_child(side, Some(handle)),
        }
        self.len += 1;

        self.insert_fixup(handle);
        // Every node whose subtree changed is now on this path, or was rotated
        // off it with untouched children.
        self.refresh_heights(Some(handle));
        Ok(())
    }

    /// Restores the red-black properties after `node` was attached as a red leaf.
    fn insert_fixup(&mut self, mut node: Handle) {
        while let Some(mut parent) = self.parent_of(node)
            && self.is_red(Some(parent))
        {
            // A red root only needs recoloring, done below.
            let Some(grandparent) = self.parent_of(parent) else {
                break;
            };
            let side = self.side_of(Some(parent), grandparent);
            let uncle = self.nodes.get(grandparent).child(side.opposite());

            if let Some(uncle) = uncle
                && self.nodes.get(uncle).is_red()
            {
                trace!("insert fixup: red uncle {uncle:?}, pushing red up to {grandparent:?}");
                self.set_color(parent, Color::Black);
                self.set_color(uncle, Color::Black);
                self.set_color(grandparent, Color::Red);
                node = grandparent;
                continue;
            }

            if self.side_of(Some(node), parent) != side {
                trace!("insert fixup: inner grandchild {node:?}, straightening");
                self.rotate(parent, side);
                mem::swap(&mut node, &mut parent);
            }

            trace!("insert fixup: outer grandchild {node:?}, rotating {grandparent:?}");
            self.set_color(parent, Color::Black);
            self.set_color(grandparent, Color::Red);
            self.rotate(grandparent, side.opposite());
            break;
        }

        if let Some(root) = self.root {
            self.set_color(root, Color::Black);
        }
    }

    /// Removes `key` and returns its pair.
    ///
    /// A node with two children takes over its in-order successor's key and value;
    /// the successor, which has no left child, is the node physically unlinked.
    pub(crate) fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let target = self.find(key)?;

        let doomed = match (self.nodes.get(target).left, self.nodes.get(target).right) {
            (Some(_), Some(right)) => {
                let successor = self.leftmost(right);
                let (upper, lower) = self.nodes.pair_mut(target, successor);
                mem::swap(&mut upper.key, &mut lower.key);
                mem::swap(&mut upper.value, &mut lower.value);
                successor
            }
            _ => target,
        };

        let (child, parent, was_black) = {
            let node = self.nodes.get(doomed);
            debug_assert!(node.child_count() < 2);
            (node.left.or(node.right), node.parent, !node.is_red())
        };

        self.replace_child(parent, doomed, child);
        if let Some(child) = child {
            self.nodes.get_mut(child).parent = parent;
        }
        let Node { key, value, .. } = self.nodes.take(doomed);
        self.len -= 1;

        if was_black {
            self.delete_fixup(child, parent);
        }
        self.refresh_heights(parent);

        Some((key, value))
    }

    /// Restores the black-height after a black node was spliced out above
    /// `node`, which may be an absent slot of `parent`.
    fn delete_fixup(&mut self, mut node: Option<Handle>, mut parent: Option<Handle>) {
        while let Some(above) = parent
            && !self.is_red(node)
        {
            // An absent `node` is on the left exactly when `above` has no left
            // child: the missing black forces a non-empty sibling.
            let side = self.side_of(node, above);
            let mut sibling = self.sibling_of(above, side);

            if self.nodes.get(sibling).is_red() {
                trace!("delete fixup: red sibling {sibling:?}, rotating {above:?}");
                self.set_color(sibling, Color::Black);
                self.set_color(above, Color::Red);
                self.rotate(above, side);
                sibling = self.sibling_of(above, side);
            }

            let near = self.nodes.get(sibling).child(side);
            let far = self.nodes.get(sibling).child(side.opposite());

            if !self.is_red(near) && !self.is_red(far) {
                trace!("delete fixup: black nephews, pushing extra black up from {above:?}");
                self.set_color(sibling, Color::Red);
                node = Some(above);
                parent = self.parent_of(above);
                continue;
            }

            if let Some(near) = near
                && !self.is_red(far)
            {
                trace!("delete fixup: red near nephew {near:?}, rotating {sibling:?}");
                self.set_color(near, Color::Black);
                self.set_color(sibling, Color::Red);
                self.rotate(sibling, side.opposite());
                sibling = self.sibling_of(above, side);
            }

            trace!("delete fixup: red far nephew, rotating {above:?}");
            let color = self.nodes.get(above).color;
            self.set_color(sibling, color);
            self.set_color(above, Color::Black);
            if let Some(far) = self.nodes.get(sibling).child(side.opposite()) {
                self.set_color(far, Color::Black);
            }
            self.rotate(above, side);
            node = self.root;
            break;
        }

        if let Some(node) = node {
            self.set_color(node, Color::Black);
        }
    }

    fn sibling_of(&self, parent: Handle, side: Side) -> Handle {
        self.nodes
            .get(parent)
            .child(side.opposite())
            .expect("`RawRBTreeMap::sibling_of()` - black-height guarantees a sibling!")
    }

    /// Checks every structural invariant from scratch with an explicit
    /// post-order work stack. Returns the first violation found.
    pub(crate) fn check(&self) -> Result<(), InvariantViolation> {
        let Some(root) = self.root else {
            return match self.len {
                0 => Ok(()),
                recorded => Err(InvariantViolation::LengthMismatch { recorded, actual: 0 }),
            };
        };

        if self.nodes.get(root).is_red() {
            return Err(InvariantViolation::RedRoot);
        }
        if self.nodes.get(root).parent.is_some() {
            return Err(InvariantViolation::BrokenParentLink { slot: root.to_index() });
        }

        let mut work: SmallVec<[(Handle, bool); 64]> = SmallVec::new();
        let mut done: SmallVec<[Summary<'_, K>; 64]> = SmallVec::new();
        let mut visited = 0usize;
        work.push((root, false));

        while let Some((handle, expanded)) = work.pop() {
            let node = self.nodes.get(handle);

            if !expanded {
                visited += 1;
                // More nodes than live slots means the links form a cycle.
                if visited > self.nodes.len() {
                    return Err(InvariantViolation::LengthMismatch {
                        recorded: self.len,
                        actual: visited,
                    });
                }
                work.push((handle, true));
                work.extend(node.right.map(|right| (right, false)));
                work.extend(node.left.map(|left| (left, false)));
                continue;
            }

            // The left subtree finished first, so its summary sits lower.
            let right = node.right.and_then(|_| done.pop());
            let left = node.left.and_then(|_| done.pop());
            done.push(self.check_node(handle, left.as_ref(), right.as_ref())?);
        }

        if visited != self.len || self.nodes.len() != self.len {
            return Err(InvariantViolation::LengthMismatch {
                recorded: self.len,
                actual: visited,
            });
        }
        Ok(())
    }

    fn check_node<'a>(
        &'a self,
        handle: Handle,
        left: Option<&Summary<'a, K>>,
        right: Option<&Summary<'a, K>>,
    ) -> Result<Summary<'a, K>, InvariantViolation> {
        let node = self.nodes.get(handle);
        let slot = handle.to_index();

        for child in [node.left, node.right].into_iter().flatten() {
            if self.nodes.get(child).parent != Some(handle) {
                return Err(InvariantViolation::BrokenParentLink { slot: child.to_index() });
            }
        }

        if left.is_some_and(|l| *l.max >= node.key) || right.is_some_and(|r| *r.min <= node.key) {
            return Err(InvariantViolation::OutOfOrder { slot });
        }

        if node.is_red() && (self.is_red(node.left) || self.is_red(node.right)) {
            return Err(InvariantViolation::RedRedEdge { slot });
        }

        // Black nodes strictly below this one, absent slots included.
        let black_below = |child: Option<Handle>, summary: Option<&Summary<'a, K>>| {
            summary.map_or(0, |s| s.black_height) + usize::from(!self.is_red(child))
        };
        let left_black = black_below(node.left, left);
        let right_black = black_below(node.right, right);
        if left_black != right_black {
            return Err(InvariantViolation::BlackHeightMismatch {
                slot,
                left: left_black,
                right: right_black,
            });
        }

        let actual = 1 + left.map_or(0, |l| l.height).max(right.map_or(0, |r| r.height));
        if node.height as usize != actual {
            return Err(InvariantViolation::StaleHeight {
                slot,
                stored: node.height as usize,
                actual,
            });
        }

        Ok(Summary {
            height: actual,
            black_height: left_black,
            min: left.map_or(&node.key, |l| l.min),
            max: right.map_or(&node.key, |r| r.max),
        })
    }
}

/// What the validator remembers about a finished subtree.
struct Summary<'a, K> {
    height: usize,
    black_height: usize,
    min: &'a K,
    max: &'a K,
}

/// Explicit-stack in-order traversal. The stack holds the ancestors still to be
/// visited, which always lie on one root-to-leaf path, so its capacity is the
/// tree height.
pub(crate) struct InOrder<'a, K, V> {
    tree: &'a RawRBTreeMap<K, V>,
    pending: BoundedStack<Handle>,
    current: Option<Handle>,
    remaining: usize,
}

impl<'a, K, V> InOrder<'a, K, V> {
    pub(crate) fn next_node(&mut self) -> Option<&'a Node<K, V>> {
        while let Some(handle) = self.current {
            self.pending
                .push(handle)
                .expect("`InOrder::next_node()` - ancestor path is longer than the tree height!");
            self.current = self.tree.node(handle).left;
        }

        let handle = self.pending.pop().ok()?;
        let node = self.tree.node(handle);
        self.current = node.right;
        self.remaining -= 1;
        Some(node)
    }

    pub(crate) const fn remaining(&self) -> usize {
        self.remaining
    }
}

impl<K, V> Clone for InOrder<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree,
            pending: self.pending.clone(),
            current: self.current,
            remaining: self.remaining,
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::collections::BTreeMap;
    use alloc::vec::Vec;
    use proptest::prelude::*;

    fn keys_of<K: Copy, V>(tree: &RawRBTreeMap<K, V>) -> Vec<K> {
        let mut walk = tree.in_order();
        core::iter::from_fn(|| walk.next_node().map(|node| node.key)).collect()
    }

    fn tree_from(keys: &[i32]) -> RawRBTreeMap<i32, i32> {
        let mut tree = RawRBTreeMap::new();
        for &key in keys {
            tree.insert(key, key * 10).unwrap();
            tree.check().unwrap();
        }
        tree
    }

    #[derive(Clone, Debug)]
    enum Op {
        Insert(i32),
        Remove(i32),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            3 => (0i32..1000).prop_map(Op::Insert),
            2 => (0i32..1000).prop_map(Op::Remove),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn invariants_hold_after_every_operation(ops in prop::collection::vec(op_strategy(), 0..600)) {
            let mut tree: RawRBTreeMap<i32, i32> = RawRBTreeMap::new();
            let mut model: BTreeMap<i32, i32> = BTreeMap::new();

            for op in ops {
                match op {
                    Op::Insert(key) => {
                        let expected = if model.contains_key(&key) {
                            Err(MapError::KeyAlreadyExists)
                        } else {
                            model.insert(key, key * 2);
                            Ok(())
                        };
                        prop_assert_eq!(tree.insert(key, key * 2), expected);
                    }
                    Op::Remove(key) => {
                        prop_assert_eq!(tree.remove_entry(&key), model.remove_entry(&key));
                    }
                }
                prop_assert_eq!(tree.check(), Ok(()));
                prop_assert_eq!(tree.len(), model.len());
            }

            prop_assert_eq!(keys_of(&tree), model.keys().copied().collect::<Vec<_>>());
        }

        #[test]
        fn height_stays_logarithmic(keys in prop::collection::btree_set(any::<i32>(), 1..2000)) {
            let mut tree = RawRBTreeMap::new();
            for key in keys {
                tree.insert(key, ()).unwrap();
            }
            // height <= 2 * log2(n + 1), squared out of the logarithm.
            let n = tree.len() as u128 + 1;
            prop_assert!(1u128 << tree.height() <= n * n, "height {} for {} keys", tree.height(), tree.len());
        }
    }

    #[test]
    fn empty_tree_is_valid() {
        let tree: RawRBTreeMap<i32, i32> = RawRBTreeMap::new();
        assert_eq!(tree.check(), Ok(()));
        assert_eq!(tree.height(), 0);
        assert!(tree.first_key_value().is_none());
        assert!(tree.in_order().next_node().is_none());
    }

    #[test]
    fn ascending_inserts_stay_balanced() {
        let mut tree = RawRBTreeMap::new();
        for key in 1..=1000 {
            tree.insert(key, ()).unwrap();
        }
        tree.check().unwrap();
        // 2 * log2(1001) is just under 20.
        assert!(tree.height() <= 19, "height {}", tree.height());
    }

    #[test]
    fn duplicate_insert_does_not_mutate() {
        let mut tree = tree_from(&[10, 20, 5]);
        let before = tree.nodes.len();
        assert_eq!(tree.insert(20, 0), Err(MapError::KeyAlreadyExists));
        assert_eq!(tree.nodes.len(), before);
        assert_eq!(tree.get_key_value(&20), Some((&20, &200)));
    }

    #[test]
    fn two_child_delete_unlinks_the_successor_slot() {
        let mut tree = tree_from(&[10, 5, 20, 15, 25]);
        let root = tree.root.unwrap();
        assert_eq!(tree.node(root).key, 10);
        let successor = tree.find(&15).unwrap();

        assert_eq!(tree.remove_entry(&10), Some((10, 100)));

        // The root slot now carries the successor's pair; the successor's slot is gone.
        assert_eq!(tree.root, Some(root));
        assert_eq!(tree.node(root).key, 15);
        assert_eq!(tree.node(root).value, 150);
        assert_eq!(tree.find(&15), Some(root));
        assert_ne!(tree.find(&15), Some(successor));
        tree.check().unwrap();
    }

    #[test]
    fn missing_key_delete_does_not_mutate() {
        let mut tree = tree_from(&[1, 2, 3]);
        assert_eq!(tree.remove_entry(&4), None);
        assert_eq!(tree.len(), 3);
        assert_eq!(keys_of(&tree), [1, 2, 3]);
    }

    #[test]
    fn delete_down_to_empty() {
        let mut tree = tree_from(&[8, 4, 12, 2, 6, 10, 14, 1, 3]);
        for key in [4, 8, 1, 14, 12, 2, 3, 10, 6] {
            assert_eq!(tree.remove_entry(&key).map(|(k, _)| k), Some(key));
            tree.check().unwrap();
        }
        assert!(tree.is_empty());
        assert_eq!(tree.root, None);
        assert_eq!(tree.height(), 0);
    }

    #[test]
    fn subtree_height_reads_the_stored_annotation() {
        let tree = tree_from(&[2, 1, 3]);
        assert_eq!(tree.subtree_height(&2), Some(2));
        assert_eq!(tree.subtree_height(&1), Some(1));
        assert_eq!(tree.subtree_height(&7), None);
    }

    #[test]
    fn first_and_last_are_the_extremes() {
        let tree = tree_from(&[10, 20, 5, 15, 25, 1]);
        assert_eq!(tree.first_key_value(), Some((&1, &10)));
        assert_eq!(tree.last_key_value(), Some((&25, &250)));
    }

    // ─── Corrupted trees ─────────────────────────────────────────────────────

    #[test]
    fn check_reports_red_root() {
        let mut tree = tree_from(&[1]);
        let root = tree.root.unwrap();
        tree.set_color(root, Color::Red);
        assert_eq!(tree.check(), Err(InvariantViolation::RedRoot));
    }

    #[test]
    fn check_reports_red_red_edge() {
        // 20 is black with red children 10 and 30; repaint 10's new child red
        // and 10 itself stays red.
        let mut tree = tree_from(&[20, 10, 30]);
        let ten = tree.find(&10).unwrap();
        let five = tree.nodes.alloc(Node::new_leaf(5, 50, Some(ten)));
        tree.nodes.get_mut(ten).left = Some(five);
        tree.nodes.get_mut(ten).height = 2;
        tree.nodes.get_mut(tree.root.unwrap()).height = 3;
        tree.len += 1;

        assert_eq!(tree.check(), Err(InvariantViolation::RedRedEdge { slot: ten.to_index() }));
    }

    #[test]
    fn check_reports_black_height_mismatch() {
        let mut tree = tree_from(&[20, 10, 30]);
        let ten = tree.find(&10).unwrap();
        tree.set_color(ten, Color::Black);

        let root = tree.root.unwrap();
        assert_eq!(
            tree.check(),
            Err(InvariantViolation::BlackHeightMismatch {
                slot: root.to_index(),
                left: 2,
                right: 1
            })
        );
    }

    #[test]
    fn check_reports_stale_height() {
        let mut tree = tree_from(&[20, 10, 30]);
        let root = tree.root.unwrap();
        tree.nodes.get_mut(root).height = 5;
        assert_eq!(
            tree.check(),
            Err(InvariantViolation::StaleHeight {
                slot: root.to_index(),
                stored: 5,
                actual: 2
            })
        );
    }

    #[test]
    fn check_reports_out_of_order_keys() {
        let mut tree = tree_from(&[20, 10, 30]);
        let ten = tree.find(&10).unwrap();
        tree.nodes.get_mut(ten).key = 25;
        let root = tree.root.unwrap();
        assert_eq!(tree.check(), Err(InvariantViolation::OutOfOrder { slot: root.to_index() }));
    }

    #[test]
    fn check_reports_broken_parent_link() {
        let mut tree = tree_from(&[20, 10, 30]);
        let ten = tree.find(&10).unwrap();
        let thirty = tree.find(&30).unwrap();
        tree.nodes.get_mut(ten).parent = Some(thirty);
        assert_eq!(tree.check(), Err(InvariantViolation::BrokenParentLink { slot: ten.to_index() }));
    }

    #[test]
    fn check_reports_length_mismatch() {
        let mut tree = tree_from(&[20, 10, 30]);
        tree.len = 4;
        assert_eq!(
            tree.check(),
            Err(InvariantViolation::LengthMismatch {
                recorded: 4,
                actual: 3
            })
        );
    }

    #[test]
    fn in_order_stack_never_exceeds_height() {
        let tree = tree_from(&(0..300).collect::<Vec<_>>());
        let mut walk = tree.in_order();
        assert_eq!(walk.pending.capacity(), tree.height());
        let mut count = 0;
        while walk.next_node().is_some() {
            count += 1;
            assert!(walk.pending.len() <= tree.height());
        }
        assert_eq!(count, 300);
        assert_eq!(walk.remaining(), 0);
    }
}
