// packages/mock-transport/src/observability/mod.rs
//! Logging setup
//!
//! The transport logs through `tracing` and counts intercepts through
//! `metrics`; both are silent until the host test installs a subscriber or
//! recorder. These helpers install a `tracing-subscriber` formatter that
//! writes through the test harness so output is captured per test.

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "sentra_lab_mock_transport=debug";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install a human-readable subscriber honouring `RUST_LOG`
///
/// Fails if a global subscriber is already installed, which tests can
/// ignore.
pub fn init_tracing() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_test_writer()
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {}", e))
}

/// Install a JSON subscriber, for CI logs that are post-processed
pub fn init_json_tracing() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(env_filter())
        .with_test_writer()
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {}", e))
}
