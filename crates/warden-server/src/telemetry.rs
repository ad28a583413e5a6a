//! Process-wide tracing subscriber.
//!
//! Initialization is guarded by `OnceLock` so repeated calls (tests,
//! embedded use) are no-ops.

use std::sync::OnceLock;

use tracing_subscriber::EnvFilter;

const DEFAULT_DIRECTIVE: &str = "warden=info";

static INIT: OnceLock<()> = OnceLock::new();

/// Install the JSON `fmt` subscriber. `RUST_LOG` overrides the default
/// `warden=info` directive.
pub fn init() {
    INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .try_init();
    });
}
