use core::fmt;
use core::iter::FusedIterator;

use super::ByteTree;
use crate::destructor::Destructor;
use crate::raw::{Arena, Cursor, Node};

/// A lazy in-order iterator over the payloads of a [`ByteTree`].
///
/// The walk is driven by an explicit stack of pending ancestors rather than recursion, so it can
/// be paused between items and handles degenerate (chain-shaped) trees of any depth; the stack
/// grows in the increments configured on the tree's [`Builder`](super::Builder).
///
/// This `struct` is created by the [`iter`] and [`iter_rev`] methods on [`ByteTree`], or by
/// [`Iter::new`]. It borrows the tree, so the tree cannot change while the iterator is alive.
///
/// # Examples
///
/// ```
/// use byte_tree::{ByteTree, Iter};
///
/// let mut tree = ByteTree::new();
/// for key in [b"b", b"c", b"a"] {
///     tree.insert_new(key).unwrap();
/// }
///
/// let forward: Vec<&[u8]> = tree.iter().collect();
/// let mut backward: Vec<&[u8]> = Iter::new(&tree, true).collect();
/// backward.reverse();
/// assert_eq!(forward, backward);
/// ```
///
/// [`iter`]: ByteTree::iter
/// [`iter_rev`]: ByteTree::iter_rev
#[must_use = "iterators are lazy and do nothing unless consumed"]
#[derive(Clone)]
pub struct Iter<'a> {
    nodes: &'a Arena<Node>,
    cursor: Cursor,
    remaining: usize,
}

impl<'a> Iter<'a> {
    /// Starts a walk over `tree`, in descending order if `reverse` is set.
    ///
    /// Primes the stack with the path from the root to the first payload.
    pub fn new<C, D: Destructor>(tree: &'a ByteTree<C, D>, reverse: bool) -> Self {
        let raw = &tree.raw;
        Iter {
            nodes: raw.nodes(),
            cursor: Cursor::new(raw.nodes(), raw.root(), reverse, raw.growth()),
            remaining: raw.len(),
        }
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        let handle = self.cursor.next(self.nodes)?;
        self.remaining -= 1;
        Some(self.nodes.get(handle).data())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl FusedIterator for Iter<'_> {}

impl fmt::Debug for Iter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Iter")
            .field("remaining", &self.remaining)
            .field("pending", &self.cursor.pending())
            .finish()
    }
}
