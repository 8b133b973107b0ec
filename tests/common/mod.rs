//! Shared setup for integration tests.
//!
//! Call [`init_tracing`] at the top of a test to see the crate's events. They are only emitted
//! when the crate is built with `--features tracing`; `RUST_LOG` filters them as usual:
//!
//! ```bash
//! RUST_LOG=byte_tree=trace cargo test --features tracing -- --nocapture
//! ```

#![allow(dead_code)]

use std::sync::Once;

use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Installs a test-friendly `fmt` subscriber once per test binary.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("byte_tree=warn"));
        let _ = tracing_subscriber::fmt().with_env_filter(filter).with_test_writer().try_init();
    });
}

/// Builds a `key=value` payload.
pub fn kv(key: &str, value: &str) -> Vec<u8> {
    format!("{key}={value}").into_bytes()
}

/// Renders payloads for readable assertion diffs.
pub fn strings<'a>(payloads: impl IntoIterator<Item = &'a [u8]>) -> Vec<String> {
    payloads.into_iter().map(|p| String::from_utf8_lossy(p).into_owned()).collect()
}
