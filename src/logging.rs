//! Logging setup with journald support on Linux.
//!
//! Events go to the systemd journal when it is reachable, otherwise to a
//! daily-rolling file in the log directory.

use anyhow::Result;
use std::path::Path;
use std::sync::OnceLock;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable holding the log filter:
/// - `LEAFLIST_LOG=debug` also reports row counts of every fetch
/// - `LEAFLIST_LOG=info` reports setup, seeding, reset and cleanup (default)
/// - `LEAFLIST_LOG=error` reports failed operations only
///
/// Full `EnvFilter` directives such as `leaflist::db=debug` work too.
pub const LOG_ENV: &str = "LEAFLIST_LOG";

// Keeps the file writer flushing until the process exits.
static GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Initialize the global subscriber. Call once, before anything else logs.
pub fn init(log_dir: &Path) -> Result<()> {
    let env_filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    #[cfg(target_os = "linux")]
    {
        if let Ok(journald_layer) = tracing_journald::layer() {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(journald_layer)
                .try_init()?;

            tracing::info!("Logging initialized with journald backend");
            return Ok(());
        }
    }

    std::fs::create_dir_all(log_dir)?;

    let file_appender = tracing_appender::rolling::daily(log_dir, "leaflist.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    let _ = GUARD.set(guard);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .try_init()?;

    tracing::info!("Logging initialized with file backend at {:?}", log_dir);
    Ok(())
}
