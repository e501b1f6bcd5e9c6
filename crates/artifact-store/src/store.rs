use async_trait::async_trait;

use crate::{ArtifactPath, BucketHandle, DayBucket, Result};

/// Core trait for artifact storage implementations.
///
/// Implementations must be thread-safe. Writes are all-or-nothing: a reader
/// either sees the complete artifact at its path or no artifact at all.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Creates the directory for `day` if it does not exist yet.
    ///
    /// Idempotent. Fails with `Unavailable` if the medium is not writable.
    async fn ensure_bucket(&self, day: DayBucket) -> Result<BucketHandle>;

    /// Publishes `bytes` as `filename` inside `bucket`.
    ///
    /// Never overwrites: fails with `AlreadyExists` if something is already
    /// published at the target path.
    async fn write(&self, bucket: &BucketHandle, filename: &str, bytes: &[u8])
    -> Result<ArtifactPath>;

    /// Removes an artifact. Removing a missing artifact succeeds.
    async fn delete(&self, path: &ArtifactPath) -> Result<()>;

    /// Returns true if an artifact is published at `path`.
    async fn exists(&self, path: &ArtifactPath) -> Result<bool>;

    /// Returns the artifact bytes, or `None` if nothing is published there.
    async fn read(&self, path: &ArtifactPath) -> Result<Option<Vec<u8>>>;
}
