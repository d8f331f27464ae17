use alloc::vec::Vec;

use crate::error::StackError;

/// A last-in, first-out stack whose capacity is fixed at construction.
///
/// Storage for `capacity` elements is reserved up front and never grows: a
/// [`push`](BoundedStack::push) onto a full stack fails with
/// [`StackError::Full`] instead of reallocating.
///
/// The map's iterators use one of these, sized to the tree height, to hold the
/// ancestor path of an in-order traversal.
///
/// # Examples
///
/// ```
/// use rbt_map::{BoundedStack, StackError};
///
/// let mut stack = BoundedStack::new(2);
/// stack.push(15).unwrap();
/// stack.push(10).unwrap();
/// assert!(stack.is_full());
/// assert_eq!(stack.push(5), Err(StackError::Full { capacity: 2 }));
///
/// assert_eq!(stack.top(), Ok(&10));
/// assert_eq!(stack.pop(), Ok(10));
/// assert_eq!(stack.pop(), Ok(15));
/// assert_eq!(stack.pop(), Err(StackError::Empty));
/// ```
#[derive(Clone, Debug)]
pub struct BoundedStack<T> {
    items: Vec<T>,
    capacity: usize,
}

impl<T> BoundedStack<T> {
    /// Creates an empty stack able to hold `capacity` elements.
    ///
    /// # Complexity
    ///
    /// O(capacity) for memory allocation.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Returns the maximum number of elements the stack can hold.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of elements on the stack.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.items.len() == self.capacity
    }

    /// Pushes `item` onto the top of the stack.
    ///
    /// # Errors
    ///
    /// Returns [`StackError::Full`] if the stack already holds `capacity`
    /// elements. The stack is left unchanged.
    pub fn push(&mut self, item: T) -> Result<(), StackError> {
        if self.is_full() {
            return Err(StackError::Full { capacity: self.capacity });
        }
        self.items.push(item);
        Ok(())
    }

    /// Removes and returns the element on top of the stack.
    ///
    /// # Errors
    ///
    /// Returns [`StackError::Empty`] if there is nothing to pop.
    pub fn pop(&mut self) -> Result<T, StackError> {
        self.items.pop().ok_or(StackError::Empty)
    }

    /// Returns a reference to the element on top of the stack.
    ///
    /// # Errors
    ///
    /// Returns [`StackError::Empty`] if the stack is empty.
    pub fn top(&self) -> Result<&T, StackError> {
        self.items.last().ok_or(StackError::Empty)
    }

    /// Removes every element, keeping the capacity.
    pub fn clear(&mut self) {
        self.items.clear();
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn zero_capacity_rejects_everything() {
        let mut stack = BoundedStack::new(0);
        assert!(stack.is_empty());
        assert!(stack.is_full());
        assert_eq!(stack.push(1), Err(StackError::Full { capacity: 0 }));
        assert_eq!(stack.top(), Err(StackError::Empty));
    }

    #[test]
    fn refill_after_pop() {
        let mut stack = BoundedStack::new(4);
        for x in [15, 10, 5] {
            stack.push(x).unwrap();
        }
        assert_eq!(stack.top(), Ok(&5));
        assert_eq!(stack.len(), 3);
        assert!(!stack.is_full());

        assert_eq!(stack.pop(), Ok(5));
        stack.push(3).unwrap();
        stack.push(4).unwrap();
        assert!(stack.is_full());
        assert_eq!(stack.capacity(), 4);

        let drained: Vec<_> = core::iter::from_fn(|| stack.pop().ok()).collect();
        assert_eq!(drained, [4, 3, 10, 15]);
        assert!(stack.is_empty());
    }

    #[test]
    fn failed_push_leaves_stack_untouched() {
        let mut stack = BoundedStack::new(1);
        stack.push('a').unwrap();
        assert!(stack.push('b').is_err());
        assert_eq!(stack.len(), 1);
        assert_eq!(stack.top(), Ok(&'a'));
    }

    #[derive(Clone, Debug)]
    enum Step {
        Push(u8),
        Pop,
        Top,
        Clear,
    }

    fn step_strategy() -> impl Strategy<Value = Step> {
        prop_oneof![
            6 => any::<u8>().prop_map(Step::Push),
            4 => Just(Step::Pop),
            2 => Just(Step::Top),
            1 => Just(Step::Clear),
        ]
    }

    proptest! {
        #[test]
        fn behaves_like_a_clipped_vec(capacity in 0usize..16, steps in prop::collection::vec(step_strategy(), 0..128)) {
            let mut stack = BoundedStack::new(capacity);
            let mut model: Vec<u8> = Vec::new();

            for step in steps {
                match step {
                    Step::Push(x) => {
                        let result = stack.push(x);
                        if model.len() < capacity {
                            prop_assert_eq!(result, Ok(()));
                            model.push(x);
                        } else {
                            prop_assert_eq!(result, Err(StackError::Full { capacity }));
                        }
                    }
                    Step::Pop => prop_assert_eq!(stack.pop().ok(), model.pop()),
                    Step::Top => prop_assert_eq!(stack.top().ok(), model.last()),
                    Step::Clear => {
                        stack.clear();
                        model.clear();
                    }
                }

                prop_assert_eq!(stack.len(), model.len());
                prop_assert_eq!(stack.is_full(), model.len() == capacity);
                prop_assert!(stack.items.capacity() >= capacity);
            }
        }
    }
}
