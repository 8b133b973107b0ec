use core::fmt;
use core::ops::ControlFlow;

use crate::compare::{Comparator, Lexicographic};
use crate::destructor::{Destructor, NoDestructor};
use crate::error::Result;
use crate::raw::{Growth, RawByteTree};
use crate::slot::Slot;

mod builder;
mod capacity;
mod iter;

pub use builder::Builder;
pub use iter::Iter;

/// An ordered set of byte-string payloads kept in an unbalanced binary search tree.
///
/// Each node owns a copy of one payload. The tree's [`Comparator`] decides how payloads are
/// ordered and which part of a payload is the key; the rest can carry a value inline. Two
/// payloads that compare equal cannot both be in the tree.
///
/// The tree is never rebalanced. Inserting payloads in sorted order builds a chain, and then
/// every operation walks the whole chain. Traversals ([`each`], [`iter`], [`clear`]) use an
/// explicit stack, so even a degenerate tree cannot overflow the call stack.
///
/// It is a logic error to change a stored payload's key bytes through [`get_mut`] or
/// [`get_at_mut`], or to use a comparator that is not a strict total order. The resulting
/// behavior is not specified but stays memory-safe.
///
/// # Examples
///
/// ```
/// use byte_tree::{ByteTree, Lexicographic, UntilByte};
///
/// // Order `name=value` payloads by the bytes before `=`.
/// let mut settings = ByteTree::with_comparator(Lexicographic::with_key_len(UntilByte(b'=')));
///
/// settings.insert_new(b"width=80").unwrap();
/// settings.insert_new(b"height=24").unwrap();
/// settings.insert_new(b"colour=auto").unwrap();
///
/// // Already present: nothing changes.
/// assert!(!settings.insert_new(b"width=132").unwrap());
/// assert_eq!(settings.get(b"width"), Some(&b"width=80"[..]));
///
/// // Overwrite in place.
/// assert!(settings.replace(b"width=132").unwrap());
///
/// let all: Vec<&[u8]> = settings.iter().collect();
/// assert_eq!(all, [&b"colour=auto"[..], b"height=24", b"width=132"]);
/// ```
///
/// [`each`]: ByteTree::each
/// [`iter`]: ByteTree::iter
/// [`clear`]: ByteTree::clear
/// [`get_mut`]: ByteTree::get_mut
/// [`get_at_mut`]: ByteTree::get_at_mut
pub struct ByteTree<C = Lexicographic, D: Destructor = NoDestructor> {
    raw: RawByteTree<C, D>,
}

impl ByteTree {
    /// Makes a new, empty tree ordering whole payloads lexicographically.
    ///
    /// Does not allocate anything on its own.
    ///
    /// # Examples
    ///
    /// ```
    /// use byte_tree::ByteTree;
    ///
    /// let mut tree = ByteTree::new();
    /// tree.insert_new(b"b").unwrap();
    /// tree.insert_new(b"a").unwrap();
    /// assert_eq!(tree.min(), Some(&b"a"[..]));
    /// ```
    #[must_use]
    pub const fn new() -> Self {
        Self::with_comparator(Lexicographic::new())
    }
}

impl<C: Comparator> ByteTree<C> {
    /// Makes a new, empty tree ordered by `compare`.
    ///
    /// # Examples
    ///
    /// ```
    /// use byte_tree::ByteTree;
    ///
    /// // Native-endian `u32` payloads in numeric order.
    /// let numeric = |a: &[u8], b: &[u8]| {
    ///     let a = u32::from_ne_bytes(a.try_into().unwrap());
    ///     let b = u32::from_ne_bytes(b.try_into().unwrap());
    ///     a.cmp(&b)
    /// };
    /// let mut tree = ByteTree::with_comparator(numeric);
    /// for n in [300u32, 20, 1] {
    ///     tree.insert_new(&n.to_ne_bytes()).unwrap();
    /// }
    /// assert_eq!(tree.min(), Some(&1u32.to_ne_bytes()[..]));
    /// ```
    #[must_use]
    pub const fn with_comparator(compare: C) -> Self {
        Self {
            raw: RawByteTree::new(compare, NoDestructor, Growth::DEFAULT),
        }
    }
}

impl<C, D: Destructor> ByteTree<C, D> {
    pub(crate) const fn from_raw(raw: RawByteTree<C, D>) -> Self {
        Self { raw }
    }

    /// Returns the number of payloads in the tree.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub const fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns true if the tree holds no payloads.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Removes every payload, passing each to the destructor, children before their parent.
    ///
    /// # Complexity
    ///
    /// O(n)
    ///
    /// # Examples
    ///
    /// ```
    /// use byte_tree::ByteTree;
    ///
    /// let mut tree = ByteTree::new();
    /// tree.insert_new(b"a").unwrap();
    /// tree.clear();
    /// assert!(tree.is_empty());
    /// ```
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Returns the payload held by `slot`, or `None` if the slot is empty.
    ///
    /// # Panics
    ///
    /// May panic if `slot` came from before the last structural change to the tree.
    #[must_use]
    pub fn get_at(&self, slot: Slot) -> Option<&[u8]> {
        self.raw.data_at(slot)
    }

    /// Returns the payload held by `slot` mutably.
    ///
    /// Only bytes the comparator ignores may be changed.
    ///
    /// # Panics
    ///
    /// May panic if `slot` came from before the last structural change to the tree.
    pub fn get_at_mut(&mut self, slot: Slot) -> Option<&mut [u8]> {
        self.raw.data_at_mut(slot)
    }

    /// Returns true if `slot` currently holds a node.
    ///
    /// # Panics
    ///
    /// May panic if `slot` came from before the last structural change to the tree.
    #[must_use]
    pub fn is_occupied(&self, slot: Slot) -> bool {
        self.raw.target(slot).is_some()
    }

    /// Returns the smallest payload, or `None` if the tree is empty.
    ///
    /// # Complexity
    ///
    /// O(depth)
    ///
    /// # Examples
    ///
    /// ```
    /// use byte_tree::ByteTree;
    ///
    /// let mut tree = ByteTree::new();
    /// assert_eq!(tree.min(), None);
    /// tree.insert_new(b"m").unwrap();
    /// tree.insert_new(b"c").unwrap();
    /// assert_eq!(tree.min(), Some(&b"c"[..]));
    /// ```
    #[must_use]
    pub fn min(&self) -> Option<&[u8]> {
        self.raw.min_slot().and_then(|slot| self.raw.data_at(slot))
    }

    /// Returns the largest payload, or `None` if the tree is empty.
    ///
    /// # Complexity
    ///
    /// O(depth)
    #[must_use]
    pub fn max(&self) -> Option<&[u8]> {
        self.raw.max_slot().and_then(|slot| self.raw.data_at(slot))
    }

    /// Returns the slot holding the smallest payload.
    ///
    /// # Examples
    ///
    /// ```
    /// use byte_tree::ByteTree;
    ///
    /// let mut tree = ByteTree::new();
    /// for key in [b"m", b"c", b"x"] {
    ///     tree.insert_new(key).unwrap();
    /// }
    /// // Pop the minimum.
    /// let slot = tree.min_slot().unwrap();
    /// assert!(tree.delete(slot));
    /// assert_eq!(tree.min(), Some(&b"m"[..]));
    /// ```
    #[must_use]
    pub fn min_slot(&self) -> Option<Slot> {
        self.raw.min_slot()
    }

    /// Returns the slot holding the largest payload.
    #[must_use]
    pub fn max_slot(&self) -> Option<Slot> {
        self.raw.max_slot()
    }

    /// Calls `f` on every payload in ascending order until it returns [`ControlFlow::Break`].
    ///
    /// Returns the value carried by the first `Break`, or `None` if every payload was visited.
    ///
    /// # Complexity
    ///
    /// O(n)
    ///
    /// # Examples
    ///
    /// ```
    /// use std::ops::ControlFlow;
    /// use byte_tree::ByteTree;
    ///
    /// let mut tree = ByteTree::new();
    /// for key in [&b"apple"[..], b"banana", b"cherry"] {
    ///     tree.insert_new(key).unwrap();
    /// }
    ///
    /// let first_b = tree.each(|data| {
    ///     if data.starts_with(b"b") { ControlFlow::Break(data.len()) } else { ControlFlow::Continue(()) }
    /// });
    /// assert_eq!(first_b, Some(6));
    /// ```
    pub fn each<'a, B, F>(&'a self, f: F) -> Option<B>
    where
        F: FnMut(&'a [u8]) -> ControlFlow<B>,
    {
        self.raw.each(f)
    }

    /// Gets an iterator over the payloads in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use byte_tree::ByteTree;
    ///
    /// let mut tree = ByteTree::new();
    /// tree.insert_new(b"2").unwrap();
    /// tree.insert_new(b"1").unwrap();
    /// let mut iter = tree.iter();
    /// assert_eq!(iter.next(), Some(&b"1"[..]));
    /// assert_eq!(iter.next(), Some(&b"2"[..]));
    /// assert_eq!(iter.next(), None);
    /// ```
    pub fn iter(&self) -> Iter<'_> {
        Iter::new(self, false)
    }

    /// Gets an iterator over the payloads in descending order.
    pub fn iter_rev(&self) -> Iter<'_> {
        Iter::new(self, true)
    }

    /// Returns the number of nodes on the longest root-to-leaf path; 0 for an empty tree.
    ///
    /// Useful for watching the tree degenerate: sorted insertion makes `depth() == len()`.
    ///
    /// # Complexity
    ///
    /// O(n)
    #[must_use]
    pub fn depth(&self) -> usize {
        self.raw.depth()
    }
}

impl<C: Comparator, D: Destructor> ByteTree<C, D> {
    /// Returns the slot holding the payload whose key equals `key`'s, or, if there is none, the
    /// empty slot where such a payload would be attached.
    ///
    /// # Complexity
    ///
    /// O(depth)
    ///
    /// # Examples
    ///
    /// ```
    /// use byte_tree::ByteTree;
    ///
    /// let mut tree = ByteTree::new();
    /// tree.insert_new(b"here").unwrap();
    ///
    /// let slot = tree.find(b"here");
    /// assert!(tree.is_occupied(slot));
    /// assert!(tree.delete(slot));
    /// assert!(!tree.is_occupied(tree.find(b"here")));
    /// ```
    #[must_use]
    pub fn find(&self, key: &[u8]) -> Slot {
        self.raw.find(key)
    }

    /// Returns true if a payload whose key equals `key`'s is present.
    #[must_use]
    pub fn contains(&self, key: &[u8]) -> bool {
        self.raw.get(key).is_some()
    }

    /// Returns the stored payload whose key equals `key`'s.
    ///
    /// # Complexity
    ///
    /// O(depth)
    #[must_use]
    pub fn get(&self, key: &[u8]) -> Option<&[u8]> {
        self.raw.get(key)
    }

    /// Returns the stored payload whose key equals `key`'s, mutably.
    ///
    /// Only bytes the comparator ignores may be changed.
    ///
    /// # Examples
    ///
    /// ```
    /// use byte_tree::{ByteTree, Lexicographic, UntilByte};
    ///
    /// let mut tree = ByteTree::with_comparator(Lexicographic::with_key_len(UntilByte(b'=')));
    /// tree.insert_new(b"flag=0").unwrap();
    /// if let Some(data) = tree.get_mut(b"flag") {
    ///     *data.last_mut().unwrap() = b'1';
    /// }
    /// assert_eq!(tree.get(b"flag"), Some(&b"flag=1"[..]));
    /// ```
    pub fn get_mut(&mut self, key: &[u8]) -> Option<&mut [u8]> {
        self.raw.get_mut(key)
    }

    /// Inserts a copy of `data` unless a payload with an equal key is already present, in which
    /// case the existing payload is left untouched.
    ///
    /// Returns the slot holding the new or existing payload, and whether `data` was inserted.
    ///
    /// # Errors
    ///
    /// Fails if memory for the node cannot be allocated; the tree is unchanged.
    ///
    /// # Complexity
    ///
    /// O(depth)
    ///
    /// # Examples
    ///
    /// ```
    /// use byte_tree::{ByteTree, Lexicographic, UntilByte};
    ///
    /// let mut tree = ByteTree::with_comparator(Lexicographic::with_key_len(UntilByte(b'=')));
    /// let (_, is_new) = tree.insert(b"key=value").unwrap();
    /// assert!(is_new);
    ///
    /// let (slot, is_new) = tree.insert(b"key=other").unwrap();
    /// assert!(!is_new);
    /// assert_eq!(tree.get_at(slot), Some(&b"key=value"[..]));
    /// ```
    pub fn insert(&mut self, data: &[u8]) -> Result<(Slot, bool)> {
        self.raw.insert(data)
    }

    /// Inserts a copy of `data` if no payload with an equal key is present.
    ///
    /// Returns false, changing nothing, if the key is taken.
    ///
    /// # Errors
    ///
    /// Fails if memory for the node cannot be allocated; the tree is unchanged.
    pub fn insert_new(&mut self, data: &[u8]) -> Result<bool> {
        self.raw.insert(data).map(|(_, is_new)| is_new)
    }

    /// Inserts a copy of `data`, overwriting the payload with an equal key if there is one.
    ///
    /// The overwritten payload goes to the destructor. The node keeps its place and both of its
    /// subtrees, so `replace` is meant for payloads whose key bytes are unchanged and only the
    /// value bytes differ; the slot is found by comparing `data` itself, so under a consistent
    /// comparator this always holds.
    ///
    /// Returns true if a payload was overwritten, false if `data` was newly inserted.
    ///
    /// # Errors
    ///
    /// Fails if memory for the copy cannot be allocated; the tree is unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use byte_tree::{ByteTree, Lexicographic, UntilByte};
    ///
    /// let mut tree = ByteTree::with_comparator(Lexicographic::with_key_len(UntilByte(b'=')));
    /// assert!(!tree.replace(b"key=value").unwrap());
    /// assert!(tree.replace(b"key=new value").unwrap());
    /// assert_eq!(tree.len(), 1);
    /// assert_eq!(tree.get(b"key"), Some(&b"key=new value"[..]));
    /// ```
    pub fn replace(&mut self, data: &[u8]) -> Result<bool> {
        self.raw.replace(data)
    }

    /// Removes the node held by `slot`, handing its payload to the destructor.
    ///
    /// The node's two subtrees are detached whole and hung back into the tree from the root,
    /// left subtree first; nodes inside them keep their relative shape. Returns false if the
    /// slot is empty.
    ///
    /// # Complexity
    ///
    /// O(depth)
    ///
    /// # Panics
    ///
    /// May panic if `slot` came from before the last structural change to the tree.
    pub fn delete(&mut self, slot: Slot) -> bool {
        self.raw.delete(slot)
    }

    /// Removes the payload whose key equals `key`'s. Returns false if there is none.
    ///
    /// # Examples
    ///
    /// ```
    /// use byte_tree::ByteTree;
    ///
    /// let mut tree = ByteTree::new();
    /// tree.insert_new(b"gone").unwrap();
    /// assert!(tree.remove(b"gone"));
    /// assert!(!tree.remove(b"gone"));
    /// ```
    pub fn remove(&mut self, key: &[u8]) -> bool {
        self.raw.remove(key)
    }
}

impl<C: Default, D: Default + Destructor> Default for ByteTree<C, D> {
    fn default() -> Self {
        Self::from_raw(RawByteTree::new(C::default(), D::default(), Growth::DEFAULT))
    }
}

impl<C, D: Destructor> fmt::Debug for ByteTree<C, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<'a, C, D: Destructor> IntoIterator for &'a ByteTree<C, D> {
    type Item = &'a [u8];
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}
