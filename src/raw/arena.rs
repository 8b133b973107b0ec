use alloc::vec::Vec;

use super::handle::Handle;
use crate::error::{Error, Result};

/// Slab of node slots addressed by [`Handle`].
///
/// Freed slots go on a free list and are reused before the slot vector grows.
/// `free` always has capacity for every slot, so releasing a slot never allocates.
pub(crate) struct Arena<T> {
    slots: Vec<Option<T>>,
    free: Vec<Handle>,
}

impl<T> Arena<T> {
    /// Most live elements an arena can hold: one per handle index `0..=Handle::MAX`.
    pub(crate) const MAX_LEN: usize = Handle::MAX + 1;

    pub(crate) const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    pub(crate) const fn len(&self) -> usize {
        self.slots.len().saturating_sub(self.free.len())
    }

    /// Reserves room for `additional` more live elements.
    pub(crate) fn try_reserve(&mut self, additional: usize) -> Result<()> {
        let wanted = self.len().checked_add(additional).ok_or(Error::AllocFailed)?;
        if wanted > Self::MAX_LEN {
            return Err(Error::CapacityExceeded { max: Self::MAX_LEN });
        }
        let grow = wanted.saturating_sub(self.slots.len());
        self.slots.try_reserve(grow).map_err(|_| Error::AllocFailed)?;
        self.free
            .try_reserve(self.slots.len() + grow - self.free.len())
            .map_err(|_| Error::AllocFailed)?;
        Ok(())
    }

    pub(crate) fn try_alloc(&mut self, element: T) -> Result<Handle> {
        if let Some(h) = self.free.pop() {
            // Reuse a free slot/handle.
            self.slots[h.to_index()] = Some(element);
            return Ok(h);
        }

        let handle = Handle::try_from_index(self.slots.len()).ok_or(Error::CapacityExceeded { max: Self::MAX_LEN })?;
        self.slots.try_reserve(1).map_err(|_| Error::AllocFailed)?;
        // The free list is empty here; size it for every slot including the new one.
        self.free.try_reserve(self.slots.len() + 1).map_err(|_| Error::AllocFailed)?;
        self.slots.push(Some(element));
        Ok(handle)
    }

    #[inline]
    pub(crate) fn get(&self, handle: Handle) -> &T {
        self.slots[handle.to_index()].as_ref().expect("`Arena::get()` - `handle` is invalid!")
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, handle: Handle) -> &mut T {
        self.slots[handle.to_index()].as_mut().expect("`Arena::get_mut()` - `handle` is invalid!")
    }

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
    fn arena_reserve() {
        let mut arena: Arena<u32> = Arena::new();
        arena.try_reserve(10).unwrap();
        assert!(arena.capacity() >= 10);
        assert_eq!(arena.len(), 0);
    }

    #[test]
    fn arena_reserve_past_handle_space() {
        let mut arena: Arena<u32> = Arena::new();
        assert_eq!(
            arena.try_reserve(Arena::<u32>::MAX_LEN + 1),
            Err(Error::CapacityExceeded { max: Arena::<u32>::MAX_LEN })
        );
        // Every handle index can be reserved.
        arena.try_reserve(Arena::<u32>::MAX_LEN).unwrap();
        assert!(arena.capacity() >= Arena::<u32>::MAX_LEN);
    }

    #[test]
    fn arena_reports_exhausted_handles() {
        // Handles are 16 bits wide under test, so this stays cheap.
        let mut arena: Arena<u8> = Arena::new();
        for _ in 0..=Handle::MAX {
            arena.try_alloc(0).unwrap();
        }
        assert_eq!(arena.len(), Arena::<u8>::MAX_LEN);
        assert_eq!(arena.try_alloc(0), Err(Error::CapacityExceeded { max: Arena::<u8>::MAX_LEN }));
        assert_eq!(arena.try_reserve(0), Ok(()));
        assert!(arena.try_reserve(1).is_err());

        // A freed slot makes room again.
        let handle = Handle::try_from_index(7).unwrap();
        arena.take(handle);
        assert_eq!(arena.try_alloc(1), Ok(handle));
    }

    #[test]
    fn freed_slots_are_reused() {
        let mut arena: Arena<u32> = Arena::new();
        let a = arena.try_alloc(1).unwrap();
        let _b = arena.try_alloc(2).unwrap();
        assert_eq!(arena.take(a), 1);
        let c = arena.try_alloc(3).unwrap();
        assert_eq!(a, c);
        assert_eq!(*arena.get(c), 3);
        assert_eq!(arena.len(), 2);
    }

    #[test]
    #[should_panic(expected = "`Arena::get()` - `handle` is invalid!")]
    fn stale_handle_panics() {
        let mut arena: Arena<u32> = Arena::new();
        let a = arena.try_alloc(1).unwrap();
        arena.take(a);
        let _ = arena.get(a);
    }

    proptest! {
        #[test]
        fn arena_behaves_like_vec(operations in prop::collection::vec(strategy(), 0..256)) {
            let mut model: Vec<(Handle, u32)> = Vec::new();
            let mut arena: Arena<u32> = Arena::new();

            for operation in operations {
                match operation {
                    Operation::Alloc(value) => {
                        let handle = arena.try_alloc(value).unwrap();
                        model.push((handle, value));
                    }
                    Operation::GetMut(which, value) => {
                        if model.is_empty() {
                            continue;
                        }

                        let index = which % model.len();
                        let handle = model[index].0;
                        *arena.get_mut(handle) = value;
                        model[index].1 = value;
                    }
                    Operation::Take(which) => {
                        if model.is_empty() {
                            continue;
                        }

                        let index = which % model.len();
                        let handle = model[index].0;
                        let value1 = arena.take(handle);
                        let (_, value2) = model.swap_remove(index);
                        prop_assert_eq!(value1, value2);
                    }
                    Operation::Clear => {
                        arena.clear();
                        model.clear();
                    }
                }

                prop_assert_eq!(arena.len(), model.len());

                for &(handle, value) in &model {
                    prop_assert_eq!(*arena.get(handle), value);
                }
            }
        }
    }

    #[derive(Clone, Debug)]
    enum Operation {
        Alloc(u32),
        GetMut(usize, u32),
        Take(usize),
        Clear,
    }

    fn strategy() -> impl Strategy<Value = Operation> {
        prop_oneof![
            20 => any::<u32>().prop_map(Operation::Alloc),
            5 => (any::<usize>(), any::<u32>()).prop_map(|(which, value)| Operation::GetMut(which, value)),
            10 => any::<usize>().prop_map(Operation::Take),
            1 => Just(Operation::Clear),
        ]
    }
}
