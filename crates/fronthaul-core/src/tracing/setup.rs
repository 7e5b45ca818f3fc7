//! Tracing initialization and configuration.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "FRONTHAUL_LOG";

/// Initialize the Fronthaul tracing/logging system.
///
/// Reads `FRONTHAUL_LOG` for per-crate log levels, e.g.
/// `FRONTHAUL_LOG=fronthaul_analysis=debug,fronthaul_pipeline=info`.
/// Falls back to `fronthaul=info` if unset or invalid.
///
/// Idempotent: only the first call installs the subscriber, and an
/// already-installed global subscriber is left in place.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV)
            .unwrap_or_else(|_| EnvFilter::new("fronthaul=info"));

        let _ = tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .with(filter)
            .try_init();
    });
}
