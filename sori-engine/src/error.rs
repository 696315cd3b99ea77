//! Error types for speech engines

use sori_core::Error as CoreError;
use thiserror::Error;

/// Errors raised by engine construction and generation calls
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Engine error: {0}")]
    Engine(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("Engine call timed out after {0}s")]
    Timeout(u64),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Core error: {0}")]
    Core(#[from] CoreError),
}

impl From<EngineError> for CoreError {
    fn from(err: EngineError) -> Self {
        match err {
            // Core errors pass through so input failures keep their 400 status
            EngineError::Core(core) => core,
            other => CoreError::Synthesis(other.to_string()),
        }
    }
}
