use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::{
    ArtifactPath, ArtifactStoreError, BucketHandle, DayBucket, Result, store::ArtifactStore,
};

/// Artifact store on the local filesystem.
///
/// Layout: `<root>/<YYYY-MM-DD>/<filename>`. Writes go to a hidden temporary
/// file in the same directory and are published with a hard link, which
/// fails instead of replacing an existing file.
#[derive(Debug, Clone)]
pub struct LocalArtifactStore {
    root: PathBuf,
}

impl LocalArtifactStore {
    /// Creates a store rooted at `root`. The directory is created lazily.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the absolute location of an artifact on disk.
    pub fn resolve(&self, path: &ArtifactPath) -> PathBuf {
        self.bucket_dir(path.bucket()).join(path.filename())
    }

    fn bucket_dir(&self, day: DayBucket) -> PathBuf {
        self.root.join(day.to_string())
    }

    async fn write_temp(&self, temp_path: &Path, bytes: &[u8]) -> std::io::Result<()> {
        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(temp_path)
            .await?;
        file.write_all(bytes).await?;
        file.sync_all().await?;
        Ok(())
    }
}

#[async_trait]
impl ArtifactStore for LocalArtifactStore {
    #[tracing::instrument(skip(self), fields(root = %self.root.display()))]
    async fn ensure_bucket(&self, day: DayBucket) -> Result<BucketHandle> {
        let dir = self.bucket_dir(day);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| ArtifactStoreError::unavailable(&dir, e))?;
        Ok(BucketHandle::new(day))
    }

    #[tracing::instrument(skip(self, bytes), fields(len = bytes.len()))]
    async fn write(
        &self,
        bucket: &BucketHandle,
        filename: &str,
        bytes: &[u8],
    ) -> Result<ArtifactPath> {
        let path = ArtifactPath::new(bucket.day(), filename)?;
        let final_path = self.resolve(&path);
        let temp_path = self
            .bucket_dir(bucket.day())
            .join(format!(".{filename}.{}.tmp", Uuid::new_v4()));

        if let Err(e) = self.write_temp(&temp_path, bytes).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(ArtifactStoreError::unavailable(&temp_path, e));
        }

        let published = tokio::fs::hard_link(&temp_path, &final_path).await;

        if let Err(e) = tokio::fs::remove_file(&temp_path).await {
            tracing::warn!(path = %temp_path.display(), error = %e, "failed to remove temporary artifact");
        }

        match published {
            Ok(()) => Ok(path),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                Err(ArtifactStoreError::AlreadyExists(path))
            }
            Err(e) => Err(ArtifactStoreError::unavailable(&final_path, e)),
        }
    }

    #[tracing::instrument(skip(self), fields(path = %path))]
    async fn delete(&self, path: &ArtifactPath) -> Result<()> {
        let full = self.resolve(path);
        match tokio::fs::remove_file(&full).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ArtifactStoreError::unavailable(&full, e)),
        }
    }

    async fn exists(&self, path: &ArtifactPath) -> Result<bool> {
        let full = self.resolve(path);
        tokio::fs::try_exists(&full)
            .await
            .map_err(|e| ArtifactStoreError::unavailable(&full, e))
    }

    async fn read(&self, path: &ArtifactPath) -> Result<Option<Vec<u8>>> {
        let full = self.resolve(path);
        match tokio::fs::read(&full).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ArtifactStoreError::unavailable(&full, e)),
        }
    }
}
