//! The document and note currently open, tracked apart from the tree.

use std::path::{Path, PathBuf};

use crate::error::StorageError;
use crate::fs::naming::{classify, FileKind, DEFAULT_NOTE_CONTENT};
use crate::storage::Storage;

/// Open document and open note, each with the content handed to its pane.
#[derive(Debug, Clone)]
pub struct Selection {
    pub open_document: Option<PathBuf>,
    /// Bytes given to the document viewer. `None` when nothing is loaded or
    /// the last load failed.
    pub document_bytes: Option<Vec<u8>>,
    /// Display name of an in-memory document that has no workspace path.
    pub external_document: Option<String>,
    pub open_note: Option<PathBuf>,
    pub note_content: String,
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            open_document: None,
            document_bytes: None,
            external_document: None,
            open_note: None,
            note_content: DEFAULT_NOTE_CONTENT.to_string(),
        }
    }
}

/// What opening an entry did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenOutcome {
    Document,
    Note,
    /// The entry is a directory or an ignored file.
    Nothing,
    /// The note could not be read. The previous note stays open.
    Failed,
}

impl Selection {
    /// Plain string comparison against the two open paths.
    pub fn is_selected(&self, path: &Path) -> bool {
        self.open_document.as_deref() == Some(path) || self.open_note.as_deref() == Some(path)
    }

    /// Open a file entry by its kind.
    pub async fn open_entry(&mut self, storage: &dyn Storage, path: &Path, name: &str) -> OpenOutcome {
        match classify(name) {
            FileKind::Document => {
                self.open_document(storage, path).await;
                OpenOutcome::Document
            }
            FileKind::Note => {
                if self.open_note(storage, path).await {
                    OpenOutcome::Note
                } else {
                    OpenOutcome::Failed
                }
            }
            FileKind::Ignored => OpenOutcome::Nothing,
        }
    }

    /// Point the viewer at `path` and load its bytes.
    pub async fn open_document(&mut self, storage: &dyn Storage, path: &Path) {
        self.open_document = Some(path.to_path_buf());
        self.external_document = None;
        self.document_bytes = match storage.read_bytes(path).await {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                tracing::error!(error = %e, "failed to load document");
                None
            }
        };
    }

    /// Show a document that arrived as in-memory content.
    pub fn show_external_document(&mut self, name: impl Into<String>, bytes: Vec<u8>) {
        self.open_document = None;
        self.external_document = Some(name.into());
        self.document_bytes = Some(bytes);
    }

    /// Read `path` and make it the open note. On failure nothing changes.
    pub async fn open_note(&mut self, storage: &dyn Storage, path: &Path) -> bool {
        if !storage.is_available() {
            let err = StorageError::unavailable("open note", path);
            tracing::warn!(error = %err, "cannot open note");
            return false;
        }
        match storage.read_text(path).await {
            Ok(content) => {
                self.set_note(path.to_path_buf(), content);
                true
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to read note");
                false
            }
        }
    }

    /// Open a note whose content is already known, e.g. one just created.
    pub fn set_note(&mut self, path: PathBuf, content: String) {
        tracing::debug!(path = %path.display(), "note opened");
        self.open_note = Some(path);
        self.note_content = content;
    }

    pub fn update_note_content(&mut self, content: String) {
        self.note_content = content;
    }

    /// Display name of whatever the viewer shows.
    pub fn document_title(&self) -> Option<String> {
        self.open_document
            .as_deref()
            .and_then(crate::storage::file_name)
            .or_else(|| self.external_document.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::operations;
    use crate::fs::tree::TreeState;
    use crate::storage::{LocalStorage, UnavailableStorage};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn default_holds_placeholder_note() {
        let selection = Selection::default();
        assert!(selection.open_note.is_none());
        assert_eq!(selection.note_content, DEFAULT_NOTE_CONTENT);
    }

    #[tokio::test]
    async fn opening_document_sets_only_document() {
        let tmp = TempDir::new().unwrap();
        let pdf = tmp.path().join("paper.pdf");
        fs::write(&pdf, b"%PDF-1.7").unwrap();

        let mut selection = Selection::default();
        let outcome = selection.open_entry(&LocalStorage::new(), &pdf, "paper.pdf").await;
        assert_eq!(outcome, OpenOutcome::Document);
        assert_eq!(selection.open_document.as_deref(), Some(pdf.as_path()));
        assert_eq!(selection.document_bytes.as_deref(), Some(&b"%PDF-1.7"[..]));
        assert!(selection.open_note.is_none());
        assert!(selection.is_selected(&pdf));
    }

    #[tokio::test]
    async fn unreadable_document_clears_bytes() {
        let tmp = TempDir::new().unwrap();
        let mut selection = Selection::default();
        selection.show_external_document("dropped.pdf", vec![1, 2, 3]);
        selection
            .open_document(&LocalStorage::new(), &tmp.path().join("gone.pdf"))
            .await;
        assert!(selection.document_bytes.is_none());
        assert!(selection.external_document.is_none());
    }

    #[tokio::test]
    async fn opening_note_loads_content() {
        let tmp = TempDir::new().unwrap();
        let note = tmp.path().join("todo.md");
        fs::write(&note, "# todo").unwrap();

        let mut selection = Selection::default();
        let outcome = selection.open_entry(&LocalStorage::new(), &note, "todo.md").await;
        assert_eq!(outcome, OpenOutcome::Note);
        assert_eq!(selection.note_content, "# todo");
        assert!(selection.open_document.is_none());
    }

    #[tokio::test]
    async fn failed_note_read_keeps_previous_note() {
        let tmp = TempDir::new().unwrap();
        let mut selection = Selection::default();
        selection.set_note(tmp.path().join("keep.md"), "keep".into());

        let outcome = selection
            .open_entry(&LocalStorage::new(), &tmp.path().join("gone.md"), "gone.md")
            .await;
        assert_eq!(outcome, OpenOutcome::Failed);
        assert_eq!(selection.open_note, Some(tmp.path().join("keep.md")));
        assert_eq!(selection.note_content, "keep");
    }

    #[tokio::test]
    async fn open_note_refused_without_capability() {
        let mut selection = Selection::default();
        assert!(!selection.open_note(&UnavailableStorage, Path::new("/ws/a.md")).await);
        assert!(selection.open_note.is_none());
    }

    #[tokio::test]
    async fn ignored_entries_open_nothing() {
        let mut selection = Selection::default();
        let outcome = selection
            .open_entry(&LocalStorage::new(), Path::new("/ws/B"), "B")
            .await;
        assert_eq!(outcome, OpenOutcome::Nothing);
    }

    #[tokio::test]
    async fn rename_leaves_open_note_path_dangling() {
        let tmp = TempDir::new().unwrap();
        let old = tmp.path().join("old.md");
        fs::write(&old, "body").unwrap();
        let storage = LocalStorage::new();
        let mut tree = TreeState::new();
        tree.open(&storage, tmp.path().to_path_buf()).await;

        let mut selection = Selection::default();
        assert!(selection.open_note(&storage, &old).await);
        assert!(operations::rename(&storage, &mut tree, &old, "new.md").await);

        assert_eq!(selection.open_note.as_deref(), Some(old.as_path()));
        assert!(!old.exists());
    }

    #[tokio::test]
    async fn delete_leaves_open_note_path_dangling() {
        let tmp = TempDir::new().unwrap();
        let note = tmp.path().join("a.md");
        fs::write(&note, "body").unwrap();
        let storage = LocalStorage::new();
        let mut tree = TreeState::new();
        tree.open(&storage, tmp.path().to_path_buf()).await;

        let mut selection = Selection::default();
        selection.open_note(&storage, &note).await;
        assert!(operations::delete(&storage, &mut tree, &note).await);
        assert_eq!(selection.open_note.as_deref(), Some(note.as_path()));
        assert_eq!(selection.note_content, "body");
    }

    #[test]
    fn document_title_prefers_path() {
        let mut selection = Selection::default();
        assert!(selection.document_title().is_none());
        selection.show_external_document("dropped.pdf", Vec::new());
        assert_eq!(selection.document_title().as_deref(), Some("dropped.pdf"));
        selection.open_document = Some(PathBuf::from("/ws/paper.pdf"));
        assert_eq!(selection.document_title().as_deref(), Some("paper.pdf"));
    }
}
