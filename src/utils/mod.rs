use std::{env, io, path::PathBuf, sync::Once};

use chrono::{Local, NaiveDateTime};
use spendy_config::ConfigManager;
use spendy_core::Clock;

/// Overrides the directory holding config and transaction documents.
pub const HOME_ENV: &str = "SPENDY_HOME";

static TRACING_INIT: Once = Once::new();

/// Initializes the global tracing subscriber, logging to stderr.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("spendy=info"));

        fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init();
    });
}

/// `SPENDY_HOME` when set, otherwise the platform data directory.
pub fn resolve_base_dir() -> PathBuf {
    match env::var_os(HOME_ENV) {
        Some(value) if !value.is_empty() => PathBuf::from(value),
        _ => ConfigManager::default_base_dir(),
    }
}

/// Wall clock in local time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}
