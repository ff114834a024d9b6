//! Tracing subscriber installation.
//!
//! The library itself only emits `tracing` events. Applications and tests
//! that want to see them call [`init`] once; the filter comes from `RUST_LOG`
//! and falls back to `info`.

use std::sync::Once;

use tracing_subscriber::{EnvFilter, Layer, fmt, prelude::*};

const DEFAULT_FILTER: &str = "info";

static TRACING_INSTALLED: Once = Once::new();

/// Installs a formatting subscriber filtered by `RUST_LOG` (idempotent).
pub fn init() {
    init_with_default(DEFAULT_FILTER);
}

/// Like [`init`], with `default` used when `RUST_LOG` is unset or invalid.
pub fn init_with_default(default: &str) {
    TRACING_INSTALLED.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
        let layer = fmt::layer().with_target(true).with_filter(filter);
        if tracing_subscriber::registry().with(layer).try_init().is_err() {
            // Another subscriber is already installed; keep it.
            tracing::debug!("tracing subscriber already installed");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent() {
        init_with_default("track=trace");
        init();
        tracing::trace!("still alive");
    }
}
