use core::cmp::Ordering;

use crate::raw::Handle;

/// Which child link of a node.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Side {
    /// Keys comparing less than the parent.
    Left,
    /// Keys comparing greater than the parent.
    Right,
}

impl Side {
    #[inline]
    pub(crate) const fn index(self) -> usize {
        match self {
            Side::Left => 0,
            Side::Right => 1,
        }
    }

    /// The side a search descends into when the probe compares `ordering` to a node.
    ///
    /// Returns `None` on a tie.
    #[inline]
    pub(crate) const fn toward(ordering: Ordering) -> Option<Self> {
        match ordering {
            Ordering::Less => Some(Side::Left),
            Ordering::Equal => None,
            Ordering::Greater => Some(Side::Right),
        }
    }

    /// The child an in-order walk visits first.
    #[inline]
    pub(crate) const fn near(reverse: bool) -> Self {
        if reverse { Side::Right } else { Side::Left }
    }

    /// The other child link.
    #[inline]
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// An addressable child link: the tree's root link, or the left/right link of a node.
///
/// A slot may or may not currently hold a node. [`ByteTree::find`] returns the slot that holds
/// the matching node, or the empty slot where that node would be attached, so a caller can test
/// membership and then act on the same position ([`ByteTree::get_at`], [`ByteTree::delete`])
/// without searching again.
///
/// A `Slot` does not borrow the tree. It describes a position only until the next structural
/// mutation (insert, replace, delete, clear); using it afterwards may name a different node or
/// panic.
///
/// [`ByteTree::find`]: crate::ByteTree::find
/// [`ByteTree::get_at`]: crate::ByteTree::get_at
/// [`ByteTree::delete`]: crate::ByteTree::delete
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Slot {
    parent: Option<Handle>,
    side: Side,
}

impl Slot {
    /// The tree's root link.
    pub(crate) const ROOT: Self = Self {
        parent: None,
        side: Side::Left,
    };

    #[inline]
    pub(crate) const fn child_of(parent: Handle, side: Side) -> Self {
        Self {
            parent: Some(parent),
            side,
        }
    }

    /// The parent node and which of its links this is, or `None` for the root link.
    #[inline]
    pub(crate) const fn link(self) -> Option<(Handle, Side)> {
        match self.parent {
            Some(parent) => Some((parent, self.side)),
            None => None,
        }
    }

    /// Returns true for the tree's root link.
    #[must_use]
    pub const fn is_root(self) -> bool {
        self.parent.is_none()
    }

    /// Which link of its parent node this slot is, or `None` for the root link.
    #[must_use]
    pub const fn side(self) -> Option<Side> {
        match self.parent {
            Some(_) => Some(self.side),
            None => None,
        }
    }
}
