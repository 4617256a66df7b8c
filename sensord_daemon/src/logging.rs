//! One-shot tracing setup driven by the `[logging]` config section.

use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Initialize the global subscriber from configuration.
///
/// An invalid filter or unopenable log file is an error (fatal at
/// bootstrap). Calling this a second time in one process keeps the first
/// subscriber; tests rely on that.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_new(&config.filter)
        .with_context(|| format!("invalid log filter {:?}", config.filter))?;

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match &config.file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("cannot open log file {}", path.display()))?;
            let _ = builder
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .try_init();
        }
        None => {
            let _ = builder.with_writer(std::io::stderr).try_init();
        }
    }
    Ok(())
}
