use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    ArtifactPath, ArtifactStoreError, BucketHandle, DayBucket, Result, store::ArtifactStore,
};

#[derive(Debug, Default)]
struct FailureSwitches {
    ensure: AtomicBool,
    write: AtomicBool,
    delete: AtomicBool,
}

/// In-memory artifact store for testing.
///
/// Mirrors the filesystem semantics of [`crate::LocalArtifactStore`]:
/// writes need an ensured bucket, never overwrite, and deletes are
/// idempotent. Each operation can be switched to fail on demand.
#[derive(Debug, Clone, Default)]
pub struct InMemoryArtifactStore {
    buckets: Arc<RwLock<HashSet<DayBucket>>>,
    artifacts: Arc<RwLock<HashMap<ArtifactPath, Vec<u8>>>>,
    fail: Arc<FailureSwitches>,
}

impl InMemoryArtifactStore {
    /// Creates a new empty in-memory artifact store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures `ensure_bucket` to fail.
    pub fn set_fail_on_ensure(&self, fail: bool) {
        self.fail.ensure.store(fail, Ordering::SeqCst);
    }

    /// Configures `write` to fail.
    pub fn set_fail_on_write(&self, fail: bool) {
        self.fail.write.store(fail, Ordering::SeqCst);
    }

    /// Configures `delete` to fail.
    pub fn set_fail_on_delete(&self, fail: bool) {
        self.fail.delete.store(fail, Ordering::SeqCst);
    }

    /// Returns the number of stored artifacts.
    pub async fn artifact_count(&self) -> usize {
        self.artifacts.read().await.len()
    }

    /// Returns every stored path, sorted.
    pub async fn paths(&self) -> Vec<ArtifactPath> {
        let mut paths: Vec<_> = self.artifacts.read().await.keys().cloned().collect();
        paths.sort_by_key(|p| p.to_string());
        paths
    }
}

fn injected(path: impl Into<std::path::PathBuf>) -> ArtifactStoreError {
    ArtifactStoreError::unavailable(
        path,
        std::io::Error::other("in-memory store configured to fail"),
    )
}

#[async_trait]
impl ArtifactStore for InMemoryArtifactStore {
    async fn ensure_bucket(&self, day: DayBucket) -> Result<BucketHandle> {
        if self.fail.ensure.load(Ordering::SeqCst) {
            return Err(injected(day.to_string()));
        }
        self.buckets.write().await.insert(day);
        Ok(BucketHandle::new(day))
    }

    async fn write(
        &self,
        bucket: &BucketHandle,
        filename: &str,
        bytes: &[u8],
    ) -> Result<ArtifactPath> {
        let path = ArtifactPath::new(bucket.day(), filename)?;

        if self.fail.write.load(Ordering::SeqCst) {
            return Err(injected(path.to_string()));
        }
        if !self.buckets.read().await.contains(&bucket.day()) {
            return Err(ArtifactStoreError::unavailable(
                path.to_string(),
                std::io::Error::from(std::io::ErrorKind::NotFound),
            ));
        }

        let mut artifacts = self.artifacts.write().await;
        if artifacts.contains_key(&path) {
            return Err(ArtifactStoreError::AlreadyExists(path));
        }
        artifacts.insert(path.clone(), bytes.to_vec());
        Ok(path)
    }

    async fn delete(&self, path: &ArtifactPath) -> Result<()> {
        if self.fail.delete.load(Ordering::SeqCst) {
            return Err(injected(path.to_string()));
        }
        self.artifacts.write().await.remove(path);
        Ok(())
    }

    async fn exists(&self, path: &ArtifactPath) -> Result<bool> {
        Ok(self.artifacts.read().await.contains_key(path))
    }

    async fn read(&self, path: &ArtifactPath) -> Result<Option<Vec<u8>>> {
        Ok(self.artifacts.read().await.get(path).cloned())
    }
}
