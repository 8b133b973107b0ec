//! Ordering capabilities for tree payloads.
//!
//! A payload is an opaque byte string. It usually holds a key followed by value bytes, and only
//! the comparator knows where one ends and the other begins. [`Lexicographic`] is the default
//! comparator; pair it with a [`KeyLength`] extractor to compare only a leading prefix of each
//! payload, so the same bytes can serve as both key and inline value:
//!
//! ```
//! use byte_tree::{ByteTree, Lexicographic, UntilByte};
//!
//! let mut tree = ByteTree::with_comparator(Lexicographic::with_key_len(UntilByte(b'=')));
//! assert!(tree.insert_new(b"colour=red").unwrap());
//! assert!(!tree.insert_new(b"colour=blue").unwrap());
//! assert_eq!(tree.get(b"colour"), Some(&b"colour=red"[..]));
//! ```
//!
//! Any closure `Fn(&[u8], &[u8]) -> Ordering` is a [`Comparator`], and any `Fn(&[u8]) -> usize`
//! is a [`KeyLength`]; closures carry whatever context they need.
//!
//! A comparator must be a strict total order and must not change behavior while a tree uses it.
//! This is not checked: a comparator that breaks the rule leaves the tree in an unspecified (but
//! memory-safe) state.

use core::cmp::Ordering;

/// Orders two payloads.
pub trait Comparator {
    /// Compares payload `a` against payload `b`.
    fn compare(&self, a: &[u8], b: &[u8]) -> Ordering;
}

impl<F> Comparator for F
where
    F: Fn(&[u8], &[u8]) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &[u8], b: &[u8]) -> Ordering {
        self(a, b)
    }
}

/// Picks out the comparable key at the front of a payload.
pub trait KeyLength {
    /// Returns how many leading bytes of `data` form its key.
    ///
    /// Values past `data.len()` are treated as `data.len()`.
    fn key_len(&self, data: &[u8]) -> usize;
}

impl<F> KeyLength for F
where
    F: Fn(&[u8]) -> usize,
{
    #[inline]
    fn key_len(&self, data: &[u8]) -> usize {
        self(data)
    }
}

/// The whole payload is the key.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Whole;

impl KeyLength for Whole {
    #[inline]
    fn key_len(&self, data: &[u8]) -> usize {
        data.len()
    }
}

/// The key is everything before the first occurrence of the given byte.
///
/// `UntilByte(b'=')` turns `b"name=value"` into the key `b"name"`. A payload without the byte is
/// all key.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct UntilByte(pub u8);

impl KeyLength for UntilByte {
    #[inline]
    fn key_len(&self, data: &[u8]) -> usize {
        data.iter().position(|&b| b == self.0).unwrap_or(data.len())
    }
}

/// Byte-wise lexicographic order over the key prefix chosen by `E`.
///
/// This is the default comparator of [`ByteTree`](crate::ByteTree).
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Lexicographic<E = Whole> {
    key_len: E,
}

impl Lexicographic {
    /// Compares whole payloads.
    #[must_use]
    pub const fn new() -> Self {
        Self { key_len: Whole }
    }
}

impl<E: KeyLength> Lexicographic<E> {
    /// Compares only the prefix of each payload that `key_len` selects.
    #[must_use]
    pub const fn with_key_len(key_len: E) -> Self {
        Self { key_len }
    }

    #[inline]
    fn key<'a>(&self, data: &'a [u8]) -> &'a [u8] {
        let len = self.key_len.key_len(data).min(data.len());
        &data[..len]
    }
}

impl<E: KeyLength> Comparator for Lexicographic<E> {
    #[inline]
    fn compare(&self, a: &[u8], b: &[u8]) -> Ordering {
        compare_lex(self.key(a), self.key(b))
    }
}

/// Lexicographic order where `end` sorts before every other byte.
///
/// With `DelimiterFirst(b'=')`, `b"ab=1"` sorts before `b"ab!"`, so every payload keyed `ab`
/// stays ahead of keys that merely extend `ab`. Bytes after the delimiter still take part in the
/// comparison.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DelimiterFirst(pub u8);

impl Comparator for DelimiterFirst {
    #[inline]
    fn compare(&self, a: &[u8], b: &[u8]) -> Ordering {
        compare_lex_delimited(a, b, self.0)
    }
}

/// Compares byte strings lexicographically as unsigned bytes; a proper prefix sorts first.
#[inline]
#[must_use]
pub fn compare_lex(a: &[u8], b: &[u8]) -> Ordering {
    a.cmp(b)
}

/// Like [`compare_lex`], except that `end` sorts before every other byte value.
#[must_use]
pub fn compare_lex_delimited(a: &[u8], b: &[u8], end: u8) -> Ordering {
    for (&x, &y) in a.iter().zip(b) {
        let ordering = (x != end).cmp(&(y != end)).then(x.cmp(&y));
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    a.len().cmp(&b.len())
}
