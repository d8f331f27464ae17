use super::handle::Handle;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Color {
    Red,
    Black,
}

/// A red-black tree node. Links are arena handles; the parent link is a plain
/// back-reference and owns nothing.
#[derive(Clone)]
pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) color: Color,
    // Nodes on the longest downward path to an absent child, this node included.
    pub(crate) height: u32,
    pub(crate) left: Option<Handle>,
    pub(crate) right: Option<Handle>,
    pub(crate) parent: Option<Handle>,
}

impl<K, V> Node<K, V> {
    /// A fresh red leaf hanging off `parent`.
    pub(crate) fn new_leaf(key: K, value: V, parent: Option<Handle>) -> Self {
        Self {
            key,
            value,
            color: Color::Red,
            height: 1,
            left: None,
            right: None,
            parent,
        }
    }

    #[inline]
    pub(crate) fn is_red(&self) -> bool {
        self.color == Color::Red
    }

    /// Returns the child on the requested side.
    #[inline]
    pub(crate) fn child(&self, side: Side) -> Option<Handle> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    #[inline]
    pub(crate) fn set_child(&mut self, side: Side, child: Option<Handle>) {
        match side {
            Side::Left => self.left = child,
            Side::Right => self.right = child,
        }
    }

    pub(crate) fn child_count(&self) -> usize {
        usize::from(self.left.is_some()) + usize::from(self.right.is_some())
    }
}

/// Which child slot of a parent a node occupies. Lets the fixups handle the
/// mirrored cases with one body.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Side {
    Left,
    Right,
}

impl Side {
    #[inline]
    pub(crate) const fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn new_leaf_is_red_with_height_one() {
        let parent = Handle::from_index(3);
        let node = Node::new_leaf(10, "ten", Some(parent));

        assert!(node.is_red());
        assert_eq!(node.height, 1);
        assert_eq!(node.child_count(), 0);
        assert_eq!(node.parent, Some(parent));
    }

    #[test]
    fn child_slots_follow_side() {
        let mut node = Node::new_leaf(1, (), None);
        let a = Handle::from_index(0);
        let b = Handle::from_index(1);

        node.set_child(Side::Left, Some(a));
        node.set_child(Side::Left.opposite(), Some(b));

        assert_eq!(node.left, Some(a));
        assert_eq!(node.child(Side::Right), Some(b));
        assert_eq!(node.child_count(), 2);
    }
}
