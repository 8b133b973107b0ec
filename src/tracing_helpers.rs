//! Logging macros that cost nothing unless the `tracing` feature is on.
//!
//! With the feature enabled they forward to the matching `tracing` macro, so events from this
//! crate show up in whatever subscriber the application installs:
//!
//! ```bash
//! RUST_LOG=byte_tree=trace cargo test --features tracing
//! ```
//!
//! Without it they expand to nothing and their arguments are never evaluated.

#![allow(unused_macros, unused_imports)]

/// Trace-level event: per-operation detail (insert, replace, delete).
#[cfg(feature = "tracing")]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        tracing::trace!($($arg)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_log {
    ($($arg:tt)*) => {};
}

/// Debug-level event: whole-tree operations.
#[cfg(feature = "tracing")]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! debug_log {
    ($($arg:tt)*) => {};
}

/// Warn-level event: the tree observed a broken caller contract.
#[cfg(feature = "tracing")]
macro_rules! warn_log {
    ($($arg:tt)*) => {
        tracing::warn!($($arg)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! warn_log {
    ($($arg:tt)*) => {};
}

pub(crate) use debug_log;
pub(crate) use trace_log;
pub(crate) use warn_log;
