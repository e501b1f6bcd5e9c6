//! Storage for generated ticket artifacts.
//!
//! Artifacts are grouped into one directory per calendar day (UTC) and
//! addressed by `YYYY-MM-DD/<filename>` paths. The [`ArtifactStore`] trait
//! hides the backing medium so callers never touch the filesystem directly.

pub mod error;
pub mod local;
pub mod memory;
pub mod path;
pub mod store;

pub use common::DayBucket;
pub use error::{ArtifactStoreError, Result};
pub use local::LocalArtifactStore;
pub use memory::InMemoryArtifactStore;
pub use path::{ArtifactPath, BucketHandle, validate_filename};
pub use store::ArtifactStore;
