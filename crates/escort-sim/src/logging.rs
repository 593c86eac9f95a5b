//! Tracing setup for the runner.
//!
//! Behavior messages (`Moving to ...`, `Escorting 2 units: ...`) are `info`
//! events, so the default filter shows a readable play-by-play. Raise the
//! level for state transitions and sim internals:
//!
//! ```bash
//! RUST_LOG=quest_behaviors=debug,bot_core=trace escort-sim scenarios/escort.ron
//! ```

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Reads `RUST_LOG`, defaulting to `info`. Output: stderr, compact format.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
