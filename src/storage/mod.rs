//! Storage capability: a uniform async interface over the host filesystem.
//!
//! The rest of the crate is written against [`Storage`] only. Which backend is
//! live is decided once at startup by [`select_storage`]; callers never branch
//! on capability availability themselves.

mod local;
mod unavailable;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::StorageResult;

pub use local::LocalStorage;
pub use unavailable::UnavailableStorage;

/// One raw entry returned by a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub is_directory: bool,
}

impl DirEntry {
    pub fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_directory: false,
        }
    }

    pub fn dir(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_directory: true,
        }
    }
}

/// Async filesystem boundary used by the tree controller.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Whether this backend touches a real filesystem.
    fn is_available(&self) -> bool;

    /// List the immediate entries of `path`, unsorted and unfiltered.
    async fn list_directory(&self, path: &Path) -> StorageResult<Vec<DirEntry>>;

    async fn read_text(&self, path: &Path) -> StorageResult<String>;

    async fn read_bytes(&self, path: &Path) -> StorageResult<Vec<u8>>;

    async fn write_text(&self, path: &Path, content: &str) -> StorageResult<()>;

    async fn write_bytes(&self, path: &Path, content: &[u8]) -> StorageResult<()>;

    async fn exists(&self, path: &Path) -> StorageResult<bool>;

    /// Remove a file, or a directory together with its contents.
    async fn remove(&self, path: &Path) -> StorageResult<()>;

    async fn rename(&self, from: &Path, to: &Path) -> StorageResult<()>;

    async fn copy(&self, from: &Path, to: &Path) -> StorageResult<()>;

    async fn mkdir(&self, path: &Path) -> StorageResult<()>;

    /// Show `path` in the platform file manager.
    async fn reveal_in_system_explorer(&self, path: &Path) -> StorageResult<()>;
}

/// Pick the backend once: the real filesystem when granted, otherwise a
/// logging no-op stub.
pub fn select_storage(filesystem_granted: bool) -> Arc<dyn Storage> {
    if filesystem_granted {
        Arc::new(LocalStorage::new())
    } else {
        tracing::warn!("filesystem access not granted, storage calls will be no-ops");
        Arc::new(UnavailableStorage)
    }
}

// ── Path helpers ─────────────────────────────────────────────────────────────
//
// Pure computations, identical whichever backend is live.

/// Join a directory and an entry name.
pub fn join_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(name)
}

/// Directory containing `path`. A bare name yields an empty path.
pub fn dir_of(path: &Path) -> PathBuf {
    path.parent().map(Path::to_path_buf).unwrap_or_default()
}

/// Final component of `path` as a display string.
pub fn file_name(path: &Path) -> Option<String> {
    path.file_name().map(|n| n.to_string_lossy().to_string())
}
