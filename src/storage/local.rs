use std::path::Path;

use async_trait::async_trait;
use tokio::fs;
use tokio::process::Command;

use super::{DirEntry, Storage};
use crate::error::{StorageError, StorageErrorKind, StorageResult};

/// Storage backed by the host filesystem through `tokio::fs`.
#[derive(Debug, Default, Clone)]
pub struct LocalStorage;

impl LocalStorage {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Storage for LocalStorage {
    fn is_available(&self) -> bool {
        true
    }

    /// Entries whose metadata cannot be read (broken symlinks, races with
    /// deletion) are skipped rather than failing the whole listing.
    async fn list_directory(&self, path: &Path) -> StorageResult<Vec<DirEntry>> {
        let mut reader = fs::read_dir(path)
            .await
            .map_err(|e| StorageError::from_io(path, e))?;

        let mut entries = Vec::new();
        loop {
            let entry = match reader.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(e) => {
                    tracing::debug!(dir = %path.display(), error = %e, "skipping unreadable entry");
                    continue;
                }
            };
            let entry_path = entry.path();
            // `fs::metadata` follows symlinks, so a link to a directory lists as one.
            let metadata = match fs::metadata(&entry_path).await {
                Ok(m) => m,
                Err(e) => {
                    tracing::debug!(path = %entry_path.display(), error = %e, "skipping entry without metadata");
                    continue;
                }
            };
            let name = entry.file_name().to_string_lossy().to_string();
            entries.push(if metadata.is_dir() {
                DirEntry::dir(name)
            } else {
                DirEntry::file(name)
            });
        }
        Ok(entries)
    }

    async fn read_text(&self, path: &Path) -> StorageResult<String> {
        fs::read_to_string(path)
            .await
            .map_err(|e| StorageError::from_io(path, e))
    }

    async fn read_bytes(&self, path: &Path) -> StorageResult<Vec<u8>> {
        fs::read(path).await.map_err(|e| StorageError::from_io(path, e))
    }

    async fn write_text(&self, path: &Path, content: &str) -> StorageResult<()> {
        fs::write(path, content)
            .await
            .map_err(|e| StorageError::from_io(path, e))
    }

    async fn write_bytes(&self, path: &Path, content: &[u8]) -> StorageResult<()> {
        fs::write(path, content)
            .await
            .map_err(|e| StorageError::from_io(path, e))
    }

    async fn exists(&self, path: &Path) -> StorageResult<bool> {
        fs::try_exists(path)
            .await
            .map_err(|e| StorageError::from_io(path, e))
    }

    async fn remove(&self, path: &Path) -> StorageResult<()> {
        let metadata = fs::symlink_metadata(path)
            .await
            .map_err(|e| StorageError::from_io(path, e))?;
        let result = if metadata.is_dir() {
            fs::remove_dir_all(path).await
        } else {
            fs::remove_file(path).await
        };
        result.map_err(|e| StorageError::from_io(path, e))
    }

    async fn rename(&self, from: &Path, to: &Path) -> StorageResult<()> {
        refuse_existing(to).await?;
        fs::rename(from, to)
            .await
            .map_err(|e| StorageError::from_io(from, e))
    }

    async fn copy(&self, from: &Path, to: &Path) -> StorageResult<()> {
        refuse_existing(to).await?;
        fs::copy(from, to)
            .await
            .map(|_| ())
            .map_err(|e| StorageError::from_io(from, e))
    }

    async fn mkdir(&self, path: &Path) -> StorageResult<()> {
        fs::create_dir(path)
            .await
            .map_err(|e| StorageError::from_io(path, e))
    }

    async fn reveal_in_system_explorer(&self, path: &Path) -> StorageResult<()> {
        let mut command = reveal_command(path);
        command
            .spawn()
            .map(|_| ())
            .map_err(|e| StorageError::from_io(path, e))
    }
}

/// `fs::rename` and `fs::copy` replace an existing destination on Unix.
async fn refuse_existing(dest: &Path) -> StorageResult<()> {
    match fs::try_exists(dest).await {
        Ok(false) => Ok(()),
        Ok(true) => Err(StorageError::new(
            StorageErrorKind::AlreadyExists,
            dest,
            "destination already exists",
        )),
        Err(e) => Err(StorageError::from_io(dest, e)),
    }
}

#[cfg(target_os = "windows")]
fn reveal_command(path: &Path) -> Command {
    let mut command = Command::new("explorer");
    command.arg(format!("/select,{}", path.display()));
    command
}

#[cfg(target_os = "macos")]
fn reveal_command(path: &Path) -> Command {
    let mut command = Command::new("open");
    command.arg("-R").arg(path);
    command
}

/// xdg-open cannot select a file, so open the containing directory instead.
#[cfg(not(any(target_os = "windows", target_os = "macos")))]
fn reveal_command(path: &Path) -> Command {
    let target = if path.is_dir() {
        path.to_path_buf()
    } else {
        super::dir_of(path)
    };
    let mut command = Command::new("xdg-open");
    command.arg(target);
    command
}
