//! Error type for fallible tree operations.
//!
//! Only allocation can fail. Lookups that miss return `None` and inserts that hit an existing
//! key return `false`; neither is an error. A comparator that is not a strict total order is a
//! broken precondition and is not detected.
//!
//! Every operation returning [`Result`] leaves the tree exactly as it was when it fails.

use thiserror::Error;

/// Errors surfaced by operations that allocate.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The allocator could not provide memory for a node payload or for arena slots.
    #[error("memory allocation failed")]
    AllocFailed,

    /// Every node handle is in use.
    #[error("tree is at maximum capacity ({max} nodes)")]
    CapacityExceeded {
        /// Largest number of nodes a tree can hold.
        max: usize,
    },
}

/// A `Result` whose error is this crate's [`Error`].
pub type Result<T> = core::result::Result<T, Error>;
