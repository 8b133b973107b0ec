use alloc::boxed::Box;
use alloc::vec::Vec;

use super::handle::Handle;
use crate::error::{Error, Result};
use crate::slot::Side;

/// A tree node: two child links and an owned copy of the caller's payload.
pub(crate) struct Node {
    children: [Option<Handle>; 2],
    data: Box<[u8]>,
}

/// Copies `data` into a fresh heap buffer, reporting allocation failure instead of aborting.
pub(crate) fn copy_payload(data: &[u8]) -> Result<Box<[u8]>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(data.len()).map_err(|_| Error::AllocFailed)?;
    buf.extend_from_slice(data);
    Ok(buf.into_boxed_slice())
}

impl Node {
    pub(crate) const fn new(data: Box<[u8]>) -> Self {
        Self {
            children: [None, None],
            data,
        }
    }

    #[inline]
    pub(crate) fn data(&self) -> &[u8] {
        &self.data
    }

    #[inline]
    pub(crate) fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Swaps in a new payload, handing back the old one.
    pub(crate) fn replace_data(&mut self, data: Box<[u8]>) -> Box<[u8]> {
        core::mem::replace(&mut self.data, data)
    }

    pub(crate) fn into_data(self) -> Box<[u8]> {
        self.data
    }

    #[inline]
    pub(crate) const fn child(&self, side: Side) -> Option<Handle> {
        self.children[side.index()]
    }

    #[inline]
    pub(crate) fn set_child(&mut self, side: Side, child: Option<Handle>) {
        self.children[side.index()] = child;
    }

    /// Detaches both subtrees, leaving this node a leaf.
    pub(crate) fn take_children(&mut self) -> [Option<Handle>; 2] {
        core::mem::take(&mut self.children)
    }

    pub(crate) const fn is_leaf(&self) -> bool {
        self.children[0].is_none() && self.children[1].is_none()
    }
}
