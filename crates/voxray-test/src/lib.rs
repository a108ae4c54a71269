//! Test fixtures for the voxray raycasting engine.
//!
//! Provides ready-made scenes (a resident block world plus a `hecs` entity
//! registry) and test logging setup shared by integration tests, benches
//! and the probe app.

pub mod scene;

pub use scene::{ray, TestScene, MOB_HEIGHT, MOB_WIDTH};

use tracing_subscriber::EnvFilter;

/// Route `tracing` output through the test harness.
///
/// Honors `RUST_LOG`, defaulting to warnings only. Safe to call from every
/// test; only the first call installs the subscriber.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}
