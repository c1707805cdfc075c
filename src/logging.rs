//! Logging setup for batch runs
//!
//! The library only emits `tracing` events; installing a subscriber is left to
//! the embedding program, which can call [`init_logging`] once at startup.

use crate::error::{ClimateError, Result};
use tracing::Level;

/// Install a stderr subscriber filtered at `level` for this crate
///
/// `RUST_LOG` takes precedence when set. Fails if a global subscriber is
/// already installed.
pub fn init_logging(level: Level) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("climatology_processor={}", level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_timer(fmt::time::uptime())
                .with_writer(std::io::stderr),
        )
        .try_init()
        .map_err(|e| ClimateError::configuration(format!("failed to install logging: {}", e)))
}

/// Map a verbosity count to a level: 0 is `warn`, then `info`, `debug`, `trace`
pub fn level_from_verbosity(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}
