use std::path::Path;

use async_trait::async_trait;

use super::{DirEntry, Storage};
use crate::error::StorageResult;

/// Stand-in used when the host grants no filesystem access.
///
/// Every call succeeds with an empty or default value and has no effect, so
/// the controller keeps working against a permanently empty workspace.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableStorage;

fn ignored(operation: &str, path: &Path) {
    tracing::debug!(operation, path = %path.display(), "storage unavailable, call ignored");
}

#[async_trait]
impl Storage for UnavailableStorage {
    fn is_available(&self) -> bool {
        false
    }

    async fn list_directory(&self, path: &Path) -> StorageResult<Vec<DirEntry>> {
        ignored("list_directory", path);
        Ok(Vec::new())
    }

    async fn read_text(&self, path: &Path) -> StorageResult<String> {
        ignored("read_text", path);
        Ok(String::new())
    }

    async fn read_bytes(&self, path: &Path) -> StorageResult<Vec<u8>> {
        ignored("read_bytes", path);
        Ok(Vec::new())
    }

    async fn write_text(&self, path: &Path, _content: &str) -> StorageResult<()> {
        ignored("write_text", path);
        Ok(())
    }

    async fn write_bytes(&self, path: &Path, _content: &[u8]) -> StorageResult<()> {
        ignored("write_bytes", path);
        Ok(())
    }

    async fn exists(&self, path: &Path) -> StorageResult<bool> {
        ignored("exists", path);
        Ok(false)
    }

    async fn remove(&self, path: &Path) -> StorageResult<()> {
        ignored("remove", path);
        Ok(())
    }

    async fn rename(&self, from: &Path, _to: &Path) -> StorageResult<()> {
        ignored("rename", from);
        Ok(())
    }

    async fn copy(&self, from: &Path, _to: &Path) -> StorageResult<()> {
        ignored("copy", from);
        Ok(())
    }

    async fn mkdir(&self, path: &Path) -> StorageResult<()> {
        ignored("mkdir", path);
        Ok(())
    }

    async fn reveal_in_system_explorer(&self, path: &Path) -> StorageResult<()> {
        ignored("reveal_in_system_explorer", path);
        Ok(())
    }
}
