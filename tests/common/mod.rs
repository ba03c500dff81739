//! Shared helpers for the integration tests.

#![allow(dead_code)]

use tracing_subscriber::EnvFilter;

/// Install a test subscriber once per test binary.
///
/// Set `RUST_LOG=typeshift=trace` to see which strategy resolved each pair.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
