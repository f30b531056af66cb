//! Tracing subscriber setup for binaries.
//!
//! ## Log Levels
//! - `RUST_LOG=debug` - Show debug messages
//! - `RUST_LOG=tally_store=trace` - Show trace for the store only
//! - Default: [`DEFAULT_FILTER`], or the configured `[logging] filter`

use tracing_subscriber::EnvFilter;

/// Filter used when neither `RUST_LOG` nor the config sets one.
pub const DEFAULT_FILTER: &str = "info,tally=debug,sqlx=warn";

/// Installs the global fmt subscriber.
///
/// `RUST_LOG` takes precedence over `filter`. Calling this twice is
/// harmless; the second call returns `false`.
pub fn init_tracing(filter: &str) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(filter))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
}
