//! Tracing bootstrap.

use std::sync::Once;
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Installs a formatted tracing subscriber honoring `RUST_LOG`.
///
/// Safe to call more than once; only the first call installs. Harness
/// code that installs its own subscriber can simply skip this.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .try_init();
    });
}
