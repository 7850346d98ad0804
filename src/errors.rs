use spendy_config::ConfigError;
use spendy_core::{CoreError, StoreError};
use thiserror::Error;

/// Failures that end a shell session.
#[derive(Debug, Error)]
pub enum SpendyError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error("Line editor error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),
}

impl From<StoreError> for SpendyError {
    fn from(err: StoreError) -> Self {
        SpendyError::Core(CoreError::Store(err))
    }
}
