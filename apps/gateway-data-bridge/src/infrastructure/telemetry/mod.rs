//! Tracing Integration
//!
//! Configures the `tracing` subscriber for the bridge. The embedding
//! process may install its own subscriber instead; `init` is a no-op when
//! one is already set.
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Log level filter (default: bridge at info)

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Initialize the tracing subscriber.
///
/// Applies `RUST_LOG` on top of a default `info` level for the bridge
/// itself. Safe to call more than once; later calls are no-ops.
#[allow(clippy::expect_used)]
pub fn init() {
    let env_filter = EnvFilter::from_default_env().add_directive(
        "gateway_data_bridge=info"
            .parse()
            .expect("static directive 'gateway_data_bridge=info' is valid"),
    );

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init();
}

// =============================================================================
// Tests
// =============================================================================
