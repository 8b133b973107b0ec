use super::ByteTree;
use crate::destructor::Destructor;
use crate::error::Result;
use crate::raw::{Growth, RawByteTree};
use crate::{Lexicographic, NoDestructor};

impl ByteTree {
    /// Creates an empty tree with room for at least `capacity` nodes.
    ///
    /// # Errors
    ///
    /// Fails if the memory cannot be reserved or `capacity` exceeds the largest possible tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use byte_tree::ByteTree;
    ///
    /// let tree = ByteTree::with_capacity(32).unwrap();
    /// assert!(tree.is_empty());
    /// assert!(tree.capacity() >= 32);
    /// ```
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        let mut raw = RawByteTree::new(Lexicographic::new(), NoDestructor, Growth::DEFAULT);
        raw.reserve(capacity)?;
        Ok(ByteTree::from_raw(raw))
    }
}

impl<C, D: Destructor> ByteTree<C, D> {
    /// Returns how many nodes the tree can hold before its node storage reallocates.
    ///
    /// Removed nodes leave reusable room behind, so this never shrinks while the tree is alive.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }

    /// Reserves room for at least `additional` more nodes.
    ///
    /// Only node slots are reserved; each insert still allocates its payload copy.
    ///
    /// # Errors
    ///
    /// Fails if the memory cannot be reserved or the total exceeds the largest possible tree.
    pub fn reserve(&mut self, additional: usize) -> Result<()> {
        self.raw.reserve(additional)
    }
}
