//! Tree mutations: each performs its storage calls, then re-lists the
//! workspace so the tree reflects storage again.
//!
//! Public functions never return errors. Failures are logged and leave the
//! tree at its last listed state; callers only learn success or failure.

use std::path::{Component, Path, PathBuf};

use chrono::NaiveDate;

use crate::error::{StorageError, StorageResult};
use crate::fs::drop::DroppedFile;
use crate::fs::naming::{
    classify, copy_name, new_note_content, next_available_name, note_date_stamp, note_name,
    FileKind, COPY_FIRST_SUFFIX, NOTE_FIRST_SUFFIX,
};
use crate::fs::tree::TreeState;
use crate::storage::{dir_of, file_name, join_path, Storage};

/// A note written by [`create_note`], ready to be opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedNote {
    pub path: PathBuf,
    pub content: String,
}

/// Outcome of one drop batch.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DropSummary {
    pub written: Vec<PathBuf>,
    /// Names skipped because they are neither notes nor documents.
    pub ignored: Vec<String>,
    pub failed: usize,
}

fn workspace_root(tree: &TreeState, operation: &str) -> Option<PathBuf> {
    let root = tree.root.clone();
    if root.is_none() {
        tracing::debug!(operation, "no workspace open, ignoring");
    }
    root
}

/// Create `note_<date>.md` (numbered on collision) in the workspace root with
/// the new-note template.
pub async fn create_note(
    storage: &dyn Storage,
    tree: &mut TreeState,
    today: NaiveDate,
    date_label: &str,
) -> Option<CreatedNote> {
    let root = workspace_root(tree, "create note")?;
    if !storage.is_available() {
        let err = StorageError::unavailable("create note", &root);
        tracing::warn!(error = %err, "cannot create note");
        return None;
    }
    match try_create_note(storage, &root, today, date_label).await {
        Ok(note) => {
            tracing::info!(path = %note.path.display(), "note created");
            tree.refresh(storage).await;
            Some(note)
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to create note");
            None
        }
    }
}

async fn try_create_note(
    storage: &dyn Storage,
    root: &Path,
    today: NaiveDate,
    date_label: &str,
) -> StorageResult<CreatedNote> {
    let stamp = note_date_stamp(today);
    let name = next_available_name(
        |n| note_name(&stamp, n),
        NOTE_FIRST_SUFFIX,
        |candidate| {
            let path = join_path(root, &candidate);
            async move { storage.exists(&path).await }
        },
    )
    .await?;
    let path = join_path(root, &name);
    let content = new_note_content(date_label);
    storage.write_text(&path, &content).await?;
    Ok(CreatedNote { path, content })
}

/// True when `name` is exactly one normal path component, so joining it
/// cannot leave the directory it is joined to.
fn is_single_component(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// Create a folder directly under the workspace root.
pub async fn create_folder(storage: &dyn Storage, tree: &mut TreeState, name: &str) -> bool {
    let Some(root) = workspace_root(tree, "create folder") else {
        return false;
    };
    if !is_single_component(name) {
        tracing::warn!(name, "folder name must be a single path component");
        return false;
    }
    let path = join_path(&root, name);
    match storage.mkdir(&path).await {
        Ok(()) => {
            tracing::info!(path = %path.display(), "folder created");
            tree.refresh(storage).await;
            true
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to create folder");
            false
        }
    }
}

/// Rename `path` within its own directory.
///
/// `new_name` is used as given. An existing destination surfaces as a storage
/// error from the backend.
pub async fn rename(
    storage: &dyn Storage,
    tree: &mut TreeState,
    path: &Path,
    new_name: &str,
) -> bool {
    if workspace_root(tree, "rename").is_none() {
        return false;
    }
    let dest = join_path(&dir_of(path), new_name);
    match storage.rename(path, &dest).await {
        Ok(()) => {
            tracing::info!(from = %path.display(), to = %dest.display(), "renamed");
            tree.refresh(storage).await;
            true
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to rename");
            false
        }
    }
}

/// Remove `path`. Confirmation is the caller's job.
pub async fn delete(storage: &dyn Storage, tree: &mut TreeState, path: &Path) -> bool {
    if workspace_root(tree, "delete").is_none() {
        return false;
    }
    match storage.remove(path).await {
        Ok(()) => {
            tracing::info!(path = %path.display(), "deleted");
            tree.refresh(storage).await;
            true
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to delete");
            false
        }
    }
}

/// Copy `path` next to itself as `<stem>_copy<ext>`, `<stem>_copy2<ext>`, ...
pub async fn copy(storage: &dyn Storage, tree: &mut TreeState, path: &Path) -> Option<PathBuf> {
    workspace_root(tree, "copy")?;
    match try_copy(storage, path).await {
        Ok(dest) => {
            tracing::info!(from = %path.display(), to = %dest.display(), "copied");
            tree.refresh(storage).await;
            Some(dest)
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to copy");
            None
        }
    }
}

async fn try_copy(storage: &dyn Storage, path: &Path) -> StorageResult<PathBuf> {
    let original = file_name(path).unwrap_or_default();
    let dir = dir_of(path);
    let name = next_available_name(
        |n| copy_name(&original, n),
        COPY_FIRST_SUFFIX,
        |candidate| {
            let dest = join_path(&dir, &candidate);
            async move { storage.exists(&dest).await }
        },
    )
    .await?;
    let dest = join_path(&dir, &name);
    storage.copy(path, &dest).await?;
    Ok(dest)
}

/// Show `path` in the platform file manager. The tree is not touched.
pub async fn reveal(storage: &dyn Storage, path: &Path) -> bool {
    match storage.reveal_in_system_explorer(path).await {
        Ok(()) => true,
        Err(e) => {
            tracing::error!(error = %e, "failed to reveal in file manager");
            false
        }
    }
}

/// Write externally dropped notes and documents into `target_dir`.
///
/// Other files are skipped. A failing item is logged and does not stop the
/// batch. The tree is refreshed once at the end.
pub async fn drop_files<F: DroppedFile>(
    storage: &dyn Storage,
    tree: &mut TreeState,
    target_dir: &Path,
    files: &[F],
) -> DropSummary {
    let mut summary = DropSummary::default();
    if workspace_root(tree, "drop").is_none() || files.is_empty() {
        return summary;
    }

    for file in files {
        let kind = classify(file.name());
        if kind == FileKind::Ignored {
            tracing::debug!(name = file.name(), "dropped file ignored");
            summary.ignored.push(file.name().to_string());
            continue;
        }
        let dest = join_path(target_dir, file.name());
        match try_write_dropped(storage, file, kind, &dest).await {
            Ok(()) => {
                tracing::info!(path = %dest.display(), "dropped file written");
                summary.written.push(dest);
            }
            Err(e) => {
                tracing::error!(name = file.name(), error = %e, "failed to write dropped file");
                summary.failed += 1;
            }
        }
    }

    tree.refresh(storage).await;
    summary
}

async fn try_write_dropped<F: DroppedFile>(
    storage: &dyn Storage,
    file: &F,
    kind: FileKind,
    dest: &Path,
) -> StorageResult<()> {
    let source = Path::new(file.name());
    match kind {
        FileKind::Note => {
            let text = file
                .read_text()
                .await
                .map_err(|e| StorageError::from_io(source, e))?;
            storage.write_text(dest, &text).await
        }
        FileKind::Document => {
            let bytes = file
                .read_bytes()
                .await
                .map_err(|e| StorageError::from_io(source, e))?;
            storage.write_bytes(dest, &bytes).await
        }
        FileKind::Ignored => Ok(()),
    }
}
