//! Error types for trigger builds.

use std::path::PathBuf;

use derive_more::Display;
use thiserror::Error;

/// The kind of entity a duplicate registration collided with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum EntityKind {
    #[display("repository")]
    Repository,
    #[display("host")]
    Host,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("{parent} already has a {kind} named '{name}'")]
    DuplicateEntity {
        /// Owner of the colliding name (`triggers` for repositories).
        parent: String,
        kind: EntityKind,
        name: String,
    },

    #[error("invalid configuration at {path}: {field} = {value}: {reason}")]
    InvalidConfiguration {
        /// Entity path, e.g. `triggers/arion/aiscalx10`.
        path: String,
        field: String,
        value: String,
        reason: String,
    },

    #[error("{path}: no bundled resource found at {resource}")]
    ResourceMissing {
        /// Trigger the resource was needed for.
        path: String,
        resource: String,
    },

    #[error("{path}: unable to copy {resource} to {}", destination.display())]
    CopyFailed {
        path: String,
        resource: String,
        destination: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("step {step} failed: {message}")]
    StepFailed { step: String, message: String },
}

/// Discriminant of [`Error`], for callers that branch on the failure class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ErrorKind {
    DuplicateEntity,
    InvalidConfiguration,
    ResourceMissing,
    CopyFailed,
    StepFailed,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::DuplicateEntity { .. } => ErrorKind::DuplicateEntity,
            Error::InvalidConfiguration { .. } => ErrorKind::InvalidConfiguration,
            Error::ResourceMissing { .. } => ErrorKind::ResourceMissing,
            Error::CopyFailed { .. } => ErrorKind::CopyFailed,
            Error::StepFailed { .. } => ErrorKind::StepFailed,
        }
    }

    pub fn invalid(
        path: impl Into<String>,
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Error::InvalidConfiguration {
            path: path.into(),
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
