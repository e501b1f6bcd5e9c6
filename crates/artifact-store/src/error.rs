use std::path::PathBuf;

use thiserror::Error;

use crate::ArtifactPath;

/// Errors that can occur when interacting with the artifact store.
#[derive(Debug, Error)]
pub enum ArtifactStoreError {
    /// The storage medium could not be read or written.
    #[error("Artifact storage unavailable at {}: {source}", path.display())]
    Unavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An artifact is already published at this path.
    #[error("Artifact already exists: {0}")]
    AlreadyExists(ArtifactPath),

    /// The filename or path would escape its day bucket.
    #[error("Invalid artifact path: {0}")]
    InvalidPath(String),
}

impl ArtifactStoreError {
    pub(crate) fn unavailable(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ArtifactStoreError::Unavailable {
            path: path.into(),
            source,
        }
    }
}

/// Result type for artifact store operations.
pub type Result<T> = std::result::Result<T, ArtifactStoreError>;
