//! JSON logs on stdout, one object per event.
//!
//! Auth outcomes are the interesting traffic here: rejections log at `warn`
//! with their internal cause, store faults at `error`, and accepted requests
//! at `debug` (enable with `RUST_LOG=shipyard_auth=debug`). Credentials and
//! token keys never appear in any field.

use tracing_subscriber::EnvFilter;

/// Used when `RUST_LOG` is unset or unparsable.
pub const DEFAULT_FILTER: &str = "info";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

pub fn init() {
    // A second init (tests spawning several servers) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false)
        .with_current_span(false)
        .try_init();
}
