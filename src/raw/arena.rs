use alloc::vec::Vec;

use super::handle::Handle;

/// Slot table owning every node of a tree. Freed slots are recycled LIFO.
#[derive(Clone)]
pub(crate) struct Arena<T> {
    slots: Vec<Option<T>>,
    free: Vec<Handle>,
}

impl<T> Arena<T> {
    pub(crate) const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    /// Number of occupied slots.
    pub(crate) fn len(&self) -> usize {
        self.slots.len().saturating_sub(self.free.len())
    }

    pub(crate) fn alloc(&mut self, element: T) -> Handle {
        if let Some(handle) = self.free.pop() {
            self.slots[handle.to_index()] = Some(element);
            return handle;
        }

        // Handle::MAX is the largest index a handle can carry.
        assert!(
            self.slots.len() <= Handle::MAX,
            "`Arena::alloc()` - arena is at maximum capacity ({})",
            Handle::MAX + 1
        );
        self.slots.push(Some(element));
        Handle::from_index(self.slots.len() - 1)
    }

    #[inline]
    pub(crate) fn get(&self, handle: Handle) -> &T {
        self.slots[handle.to_index()].as_ref().expect("`Arena::get()` - `handle` is invalid!")
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, handle: Handle) -> &mut T {
        self.slots[handle.to_index()].as_mut().expect("`Arena::get_mut()` - `handle` is invalid!")
    }

    /// Borrows two distinct live slots mutably at once.
    pub(crate) fn pair_mut(&mut self, a: Handle, b: Handle) -> (&mut T, &mut T) {
        let (i, j) = (a.to_index(), b.to_index());
        assert_ne!(i, j, "`Arena::pair_mut()` - handles must be distinct!");

        let (low, high) = (i.min(j), i.max(j));
        let (head, tail) = self.slots.split_at_mut(high);
        let low_slot = head[low].as_mut().expect("`Arena::pair_mut()` - `handle` is invalid!");
        let high_slot = tail[0].as_mut().expect("`Arena::pair_mut()` - `handle` is invalid!");

        if i < j { (low_slot, high_slot) } else { (high_slot, low_slot) }
    }

    /// Vacates the slot and hands its element back.
    pub(crate) fn take(&mut self, handle: Handle) -> T {
        let element = self.slots[handle.to_index()].take().expect("`Arena::take()` - `handle` is invalid!");
        self.free.push(handle);
        element
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn with_capacity_preallocates_slots() {
        let arena: Arena<u8> = Arena::with_capacity(24);
        assert!(arena.capacity() >= 24);
        assert_eq!(arena.len(), 0);
    }

    #[test]
    fn freed_slot_is_reused_first() {
        let mut arena = Arena::new();
        let a = arena.alloc('a');
        let b = arena.alloc('b');
        assert_eq!(arena.take(a), 'a');

        let c = arena.alloc('c');
        assert_eq!(c, a);
        assert_eq!(*arena.get(b), 'b');
        assert_eq!(*arena.get(c), 'c');
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn pair_mut_preserves_argument_order() {
        let mut arena = Arena::new();
        let a = arena.alloc(1);
        let b = arena.alloc(2);

        let (x, y) = arena.pair_mut(b, a);
        core::mem::swap(x, y);

        assert_eq!(*arena.get(a), 2);
        assert_eq!(*arena.get(b), 1);
    }

    #[test]
    #[should_panic(expected = "`Arena::pair_mut()` - handles must be distinct!")]
    fn pair_mut_rejects_aliasing() {
        let mut arena = Arena::new();
        let a = arena.alloc(1);
        let _ = arena.pair_mut(a, a);
    }

    #[test]
    #[should_panic(expected = "`Arena::get()` - `handle` is invalid!")]
    fn get_after_take_panics() {
        let mut arena = Arena::new();
        let a = arena.alloc(1);
        arena.take(a);
        let _ = arena.get(a);
    }

    #[derive(Clone, Debug)]
    enum Step {
        Alloc(u32),
        Overwrite(usize, u32),
        Take(usize),
        Clear,
    }

    fn step_strategy() -> impl Strategy<Value = Step> {
        prop_oneof![
            12 => any::<u32>().prop_map(Step::Alloc),
            4 => (any::<usize>(), any::<u32>()).prop_map(|(which, value)| Step::Overwrite(which, value)),
            6 => any::<usize>().prop_map(Step::Take),
            1 => Just(Step::Clear),
        ]
    }

    proptest! {
        #[test]
        fn live_slots_track_a_model(steps in prop::collection::vec(step_strategy(), 0..256)) {
            let mut arena: Arena<u32> = Arena::new();
            let mut live: Vec<(Handle, u32)> = Vec::new();

            for step in steps {
                match step {
                    Step::Alloc(value) => live.push((arena.alloc(value), value)),
                    Step::Overwrite(which, value) if !live.is_empty() => {
                        let index = which % live.len();
                        *arena.get_mut(live[index].0) = value;
                        live[index].1 = value;
                    }
                    Step::Take(which) if !live.is_empty() => {
                        let (handle, value) = live.swap_remove(which % live.len());
                        prop_assert_eq!(arena.take(handle), value);
                    }
                    Step::Clear => {
                        arena.clear();
                        live.clear();
                    }
                    _ => {}
                }

                prop_assert_eq!(arena.len(), live.len());
                for &(handle, value) in &live {
                    prop_assert_eq!(*arena.get(handle), value);
                }
            }
        }
    }
}
