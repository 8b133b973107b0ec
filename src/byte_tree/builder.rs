use super::ByteTree;
use crate::compare::{Comparator, Lexicographic};
use crate::destructor::{Destructor, NoDestructor};
use crate::error::Result;
use crate::raw::{Growth, RawByteTree};

/// Configures and creates a [`ByteTree`].
///
/// Everything is optional: the defaults are [`Lexicographic`] ordering, [`NoDestructor`], no
/// pre-reserved nodes, and traversal stacks that start at 64 entries and grow by 64.
///
/// # Examples
///
/// ```
/// use byte_tree::{Builder, Lexicographic, UntilByte};
///
/// let mut freed = 0;
/// let mut tree = Builder::new()
///     .comparator(Lexicographic::with_key_len(UntilByte(b'=')))
///     .destructor(|_: Box<[u8]>| freed += 1)
///     .capacity(16)
///     .stack_growth(8, 8)
///     .build()
///     .unwrap();
///
/// tree.insert_new(b"a=1").unwrap();
/// tree.replace(b"a=2").unwrap();
/// assert!(tree.capacity() >= 16);
/// drop(tree);
/// assert_eq!(freed, 2);
/// ```
#[must_use]
#[derive(Clone, Debug)]
pub struct Builder<C = Lexicographic, D = NoDestructor> {
    compare: C,
    destroy: D,
    capacity: usize,
    growth: Growth,
}

impl Builder {
    /// Starts from the defaults.
    pub const fn new() -> Self {
        Self {
            compare: Lexicographic::new(),
            destroy: NoDestructor,
            capacity: 0,
            growth: Growth::DEFAULT,
        }
    }
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

impl<C, D> Builder<C, D> {
    /// Orders payloads with `compare`.
    pub fn comparator<C2: Comparator>(self, compare: C2) -> Builder<C2, D> {
        Builder {
            compare,
            destroy: self.destroy,
            capacity: self.capacity,
            growth: self.growth,
        }
    }

    /// Hands every payload leaving the tree to `destroy`.
    pub fn destructor<D2: Destructor>(self, destroy: D2) -> Builder<C, D2> {
        Builder {
            compare: self.compare,
            destroy,
            capacity: self.capacity,
            growth: self.growth,
        }
    }

    /// Reserves room for `capacity` nodes up front.
    pub const fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sizes the explicit stacks used by iterators and whole-tree walks: `initial` entries up
    /// front, then `grow_by` more each time one fills up. A `grow_by` of 0 is treated as 1.
    pub const fn stack_growth(mut self, initial: usize, grow_by: usize) -> Self {
        self.growth = Growth::new(initial, grow_by);
        self
    }
}

impl<C: Comparator, D: Destructor> Builder<C, D> {
    /// Creates the tree.
    ///
    /// # Errors
    ///
    /// Fails if the requested capacity cannot be reserved.
    pub fn build(self) -> Result<ByteTree<C, D>> {
        let mut raw = RawByteTree::new(self.compare, self.destroy, self.growth);
        if self.capacity > 0 {
            raw.reserve(self.capacity)?;
        }
        Ok(ByteTree::from_raw(raw))
    }
}
