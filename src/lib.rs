//! An unbalanced binary search tree over opaque byte-string payloads.
//!
//! [`ByteTree`] stores copies of byte strings in comparator order. A payload is opaque to the
//! tree: the [`Comparator`] decides which leading bytes are the key, so a single payload such
//! as `b"name=value"` can be both the map key and its inline value.
//!
//! - [`find`](ByteTree::find) returns a [`Slot`]: the link holding the matching node, or the
//!   empty link where it would go. The slot can then be read or deleted without a second search.
//! - [`insert_new`](ByteTree::insert_new) never overwrites; [`replace`](ByteTree::replace)
//!   overwrites in place, keeping the node's position and subtrees.
//! - [`delete`](ByteTree::delete) detaches the removed node's two subtrees and hangs each back
//!   into the tree, whole, from the root.
//! - [`iter`](ByteTree::iter) / [`iter_rev`](ByteTree::iter_rev) walk the tree lazily on an
//!   explicit stack.
//!
//! # Example
//!
//! ```
//! use byte_tree::{ByteTree, Lexicographic, UntilByte};
//!
//! let mut tree = ByteTree::with_comparator(Lexicographic::with_key_len(UntilByte(b'=')));
//! for entry in [&b"key=value"[..], b"another key=value", b"more keys=more values"] {
//!     tree.insert_new(entry).unwrap();
//! }
//!
//! // Keys compare only up to '=', so this conflicts with "another key=value".
//! assert!(!tree.insert_new(b"another key=another value").unwrap());
//!
//! assert_eq!(tree.min(), Some(&b"another key=value"[..]));
//! assert_eq!(tree.max(), Some(&b"more keys=more values"[..]));
//!
//! assert!(tree.replace(b"key=new value").unwrap());
//! assert_eq!(tree.len(), 3);
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`
//! - **Fallible allocation** - Inserting operations return [`Result`] instead of aborting
//! - **`tracing`** - Optional feature emitting `tracing` events for tree mutations
//!
//! # Limitations
//!
//! The tree never rebalances. Sorted insertion produces a chain whose depth equals its length,
//! and every search then takes linear time. There is no internal synchronization; share a tree
//! across threads only behind a lock.

#![no_std]
// These forbid rules and lint groups are meant to be very restrictive.
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

mod tracing_helpers;

mod compare;
mod destructor;
mod error;
mod raw;
mod slot;

pub mod byte_tree;

pub use byte_tree::{Builder, ByteTree, Iter};
pub use compare::{Comparator, DelimiterFirst, KeyLength, Lexicographic, UntilByte, Whole};
pub use compare::{compare_lex, compare_lex_delimited};
pub use destructor::{Destructor, NoDestructor};
pub use error::{Error, Result};
pub use slot::{Side, Slot};
