//! # Observability & Tracing
//!
//! Structured logging for the gateway, built on `tracing` and `tracing-subscriber`.
//!
//! ## What Gets Traced
//!
//! - **Resolution**: unknown collections are logged at `warn` before the 404
//! - **Dispatch**: every request runs inside a `handle` span carrying the method
//! - **Execution**: the selected operation at `debug`, its completion at `info`
//! - **Backend failures**: operation, collection and error at `warn`
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run       # One line per completed request
//! RUST_LOG=debug cargo run      # Selected operation, bulk emulation, discarded payloads
//! ```
//!
//! With `RUST_LOG=info` a request for an item looks like:
//!
//! ```text
//! INFO handle: Completed method=GET operation=show collection=ports id=Some("port-1")
//! ```

use tracing_subscriber::EnvFilter;

/// Default filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "info";

/// Installs the global subscriber with [`DEFAULT_FILTER`].
pub fn setup_tracing() {
    setup_tracing_with(DEFAULT_FILTER);
}

/// Installs the global subscriber. `RUST_LOG` wins when set; otherwise `default`
/// is used as the filter directive.
pub fn setup_tracing_with(default: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
