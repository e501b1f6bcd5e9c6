use serde::{Deserialize, Serialize};

use crate::{ArtifactStoreError, DayBucket, Result};

/// Proof that a day directory exists in a store.
///
/// Returned by [`crate::ArtifactStore::ensure_bucket`] and required by
/// `write`, so an artifact is never written into a bucket nobody created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BucketHandle {
    day: DayBucket,
}

impl BucketHandle {
    /// Wraps a day. Store implementations call this once the bucket exists.
    pub fn new(day: DayBucket) -> Self {
        Self { day }
    }

    pub fn day(&self) -> DayBucket {
        self.day
    }
}

/// Checks that a filename is a single, visible path component.
///
/// Rejects empty names, separators, `..`, leading dots (reserved for
/// in-flight temporary files) and control characters.
pub fn validate_filename(filename: &str) -> Result<()> {
    let invalid = filename.is_empty()
        || filename.starts_with('.')
        || filename.contains("..")
        || filename
            .chars()
            .any(|c| c == '/' || c == '\\' || c == ':' || c.is_control());

    if invalid {
        return Err(ArtifactStoreError::InvalidPath(filename.to_string()));
    }
    Ok(())
}

/// Relative location of an artifact: `<YYYY-MM-DD>/<filename>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ArtifactPath {
    bucket: DayBucket,
    filename: String,
}

impl ArtifactPath {
    /// Builds a path, validating the filename.
    pub fn new(bucket: DayBucket, filename: impl Into<String>) -> Result<Self> {
        let filename = filename.into();
        validate_filename(&filename)?;
        Ok(Self { bucket, filename })
    }

    pub fn bucket(&self) -> DayBucket {
        self.bucket
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }
}

impl std::fmt::Display for ArtifactPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.bucket, self.filename)
    }
}

impl std::str::FromStr for ArtifactPath {
    type Err = ArtifactStoreError;

    fn from_str(s: &str) -> Result<Self> {
        let (bucket, filename) = s
            .split_once('/')
            .ok_or_else(|| ArtifactStoreError::InvalidPath(s.to_string()))?;
        let bucket: DayBucket = bucket
            .parse()
            .map_err(|_| ArtifactStoreError::InvalidPath(s.to_string()))?;
        Self::new(bucket, filename)
    }
}

impl TryFrom<String> for ArtifactPath {
    type Error = ArtifactStoreError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<ArtifactPath> for String {
    fn from(path: ArtifactPath) -> Self {
        path.to_string()
    }
}
