use smallvec::SmallVec;

// Matches the default initial capacity, so default stacks start without a heap allocation.
const INLINE: usize = 64;

/// Capacity policy for a [`Stack`]: reserve `initial` entries up front, then grow by `grow_by`
/// entries each time the stack is full.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Growth {
    pub(crate) initial: usize,
    pub(crate) grow_by: usize,
}

impl Growth {
    pub(crate) const DEFAULT: Self = Self {
        initial: 64,
        grow_by: 64,
    };

    pub(crate) const fn new(initial: usize, grow_by: usize) -> Self {
        Self {
            initial,
            // A zero increment would never make room.
            grow_by: if grow_by == 0 { 1 } else { grow_by },
        }
    }
}

/// Growable LIFO used as the explicit stack for traversals.
///
/// Unlike `Vec`'s doubling, capacity grows in fixed `grow_by` steps, so memory tracks the
/// deepest path actually walked.
#[derive(Clone, Debug)]
pub(crate) struct Stack<T> {
    items: SmallVec<[T; INLINE]>,
    grow_by: usize,
}

impl<T> Stack<T> {
    pub(crate) fn with_growth(growth: Growth) -> Self {
        let mut items = SmallVec::new();
        items.reserve_exact(growth.initial);
        Self {
            items,
            grow_by: growth.grow_by,
        }
    }

    #[inline]
    pub(crate) fn push(&mut self, item: T) {
        if self.items.len() == self.items.capacity() {
            self.items.reserve_exact(self.grow_by);
        }
        self.items.push(item);
    }

    #[inline]
    pub(crate) fn pop(&mut self) -> Option<T> {
        self.items.pop()
    }

    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn capacity(&self) -> usize {
        self.items.capacity()
    }

    #[cfg(test)]
    pub(crate) fn spilled(&self) -> bool {
        self.items.spilled()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::vec::Vec;
    use proptest::prelude::*;

    #[test]
    fn grows_in_fixed_steps() {
        let mut stack = Stack::with_growth(Growth::new(100, 10));
        assert_eq!(stack.capacity(), 100);
        for i in 0..100 {
            stack.push(i);
        }
        assert_eq!(stack.capacity(), 100);
        stack.push(100);
        assert_eq!(stack.capacity(), 110);
        assert_eq!(stack.len(), 101);
    }

    #[test]
    fn default_growth_starts_inline() {
        let mut stack = Stack::with_growth(Growth::DEFAULT);
        assert!(!stack.spilled());
        assert_eq!(stack.capacity(), Growth::DEFAULT.initial);
        for i in 0..Growth::DEFAULT.initial {
            stack.push(i);
        }
        assert!(!stack.spilled());

        // The first push past the inline buffer grows by one increment.
        stack.push(Growth::DEFAULT.initial);
        assert!(stack.spilled());
        assert_eq!(stack.capacity(), Growth::DEFAULT.initial + Growth::DEFAULT.grow_by);
    }

    #[test]
    fn small_initial_capacity_stays_inline() {
        let stack: Stack<u32> = Stack::with_growth(Growth::new(4, 4));
        assert_eq!(stack.capacity(), INLINE);
        assert!(!stack.spilled());
        assert!(stack.is_empty());
    }

    #[test]
    fn zero_increment_still_grows() {
        let mut stack = Stack::with_growth(Growth::new(0, 0));
        for i in 0..(INLINE + 3) {
            stack.push(i);
        }
        assert_eq!(stack.len(), INLINE + 3);
        assert_eq!(stack.pop(), Some(INLINE + 2));
    }

    proptest! {
        #[test]
        fn stack_is_lifo(ops in prop::collection::vec(prop::option::of(any::<u32>()), 0..512)) {
            let mut model: Vec<u32> = Vec::new();
            let mut stack = Stack::with_growth(Growth::DEFAULT);

            for op in ops {
                match op {
                    Some(value) => {
                        stack.push(value);
                        model.push(value);
                    }
                    None => prop_assert_eq!(stack.pop(), model.pop()),
                }
                prop_assert_eq!(stack.len(), model.len());
                prop_assert_eq!(stack.is_empty(), model.is_empty());
            }
        }
    }
}
