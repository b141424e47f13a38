//! Tracing setup for the `bbtest` binary.

use std::sync::Once;

/// Set to `1` to print spans as an indented tree instead of flat lines.
pub const LOG_TREE_VAR: &str = "BBTEST_LOG_TREE";

static TRACING_INIT: Once = Once::new();

/// Initialize tracing.
///
/// Does nothing unless `RUST_LOG` is set, e.g. `RUST_LOG=bbtest=debug`.
/// Safe to call multiple times.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_err() {
            return;
        }

        let filter = EnvFilter::from_default_env();
        let tree = std::env::var(LOG_TREE_VAR).is_ok_and(|v| v == "1");
        let result = if tree {
            tracing_subscriber::registry()
                .with(
                    tracing_tree::HierarchicalLayer::new(2)
                        .with_targets(true)
                        .with_writer(std::io::stderr),
                )
                .with(filter)
                .try_init()
        } else {
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_level(true)
                        .with_writer(std::io::stderr),
                )
                .with(filter)
                .try_init()
        };

        if let Err(e) = result {
            eprintln!("warning: failed to install tracing subscriber: {e}");
        }
    });
}
