//! Configuration errors.

use thiserror::Error;
use triggers_core::ErrorKind;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("KDL parse error: {0}")]
    Parse(#[from] kdl::KdlError),

    #[error(transparent)]
    Entity(#[from] triggers_core::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConfigError {
    /// Failure class; syntax errors count as invalid configuration.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConfigError::Parse(_) => ErrorKind::InvalidConfiguration,
            ConfigError::Entity(e) => e.kind(),
            ConfigError::Io(_) => ErrorKind::InvalidConfiguration,
        }
    }
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
