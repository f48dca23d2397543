use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use ratatui::layout::Rect;

use crate::autosave::AutoSave;
use crate::config::DEFAULT_DATE_FORMAT;
use crate::dialogs::{DialogController, DialogSubmission};
use crate::editor::NoteBuffer;
use crate::fs::drop::{parse_pasted_paths, DroppedFile, ExternalFile};
use crate::fs::naming::{classify, FileKind};
use crate::fs::operations;
use crate::fs::tree::TreeState;
use crate::menu::{entry_menu, ContextMenu, MenuAction, MenuTarget};
use crate::selection::{OpenOutcome, Selection};
use crate::storage::{file_name, Storage};

/// Which pane receives key input.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    #[default]
    Tree,
    Note,
}

/// Main application state.
pub struct App {
    pub storage: Arc<dyn Storage>,
    pub tree: TreeState,
    pub selection: Selection,
    pub note: NoteBuffer,
    pub dialogs: DialogController,
    pub menu: Option<ContextMenu>,
    pub focus: Focus,
    pub autosave: AutoSave,
    pub date_format: String,
    pub should_quit: bool,
    pub status_message: Option<(String, Instant)>,
    /// Inner area of the tree pane from the last draw, for mouse hit-testing.
    pub tree_area: Rect,
}

impl App {
    pub fn new(storage: Arc<dyn Storage>, autosave: AutoSave, date_format: impl Into<String>) -> Self {
        let selection = Selection::default();
        let note = NoteBuffer::new(&selection.note_content);
        Self {
            storage,
            tree: TreeState::new(),
            selection,
            note,
            dialogs: DialogController::new(),
            menu: None,
            focus: Focus::Tree,
            autosave,
            date_format: date_format.into(),
            should_quit: false,
            status_message: None,
            tree_area: Rect::default(),
        }
    }

    // ── Workspace lifecycle ─────────────────────────────────────────────────

    pub async fn open_workspace(&mut self, path: PathBuf) {
        self.flush_pending_save().await;
        if !self.storage.is_available() {
            self.set_status_message("Storage unavailable: workspace stays empty".to_string());
        } else {
            self.set_status_message(format!("Opened {}", path.display()));
        }
        self.tree.open(self.storage.as_ref(), path).await;
        self.menu = None;
    }

    pub fn close_workspace(&mut self) {
        if let Some(root) = self.tree.root() {
            tracing::info!(root = %root.display(), "workspace closed");
        }
        self.tree.close();
        self.menu = None;
    }

    pub async fn refresh(&mut self) {
        self.tree.refresh(self.storage.as_ref()).await;
    }

    // ── Tree navigation ─────────────────────────────────────────────────────

    /// Toggle the selected directory, or open the selected file.
    pub async fn activate_selected(&mut self) {
        let Some(item) = self.tree.selected().cloned() else {
            return;
        };
        if item.is_directory {
            self.tree
                .toggle_expand(self.storage.as_ref(), &item.index_path)
                .await;
        } else {
            self.open_file(&item.path, &item.name).await;
        }
    }

    /// Collapse the selected directory, or jump to the parent row.
    pub fn collapse_selected(&mut self) {
        match self.tree.selected() {
            Some(item) if item.is_directory && item.is_expanded => {
                let index_path = item.index_path.clone();
                self.tree.collapse(&index_path);
            }
            Some(_) => self.tree.select_parent(),
            None => {}
        }
    }

    async fn open_file(&mut self, path: &Path, name: &str) {
        if classify(name) == FileKind::Note {
            self.flush_pending_save().await;
        }
        match self
            .selection
            .open_entry(self.storage.as_ref(), path, name)
            .await
        {
            OpenOutcome::Note => {
                self.note.load(&self.selection.note_content);
                self.autosave.cancel();
            }
            OpenOutcome::Document => {
                if self.selection.document_bytes.is_none() {
                    self.set_status_message(format!("Could not load {}", name));
                }
            }
            OpenOutcome::Failed => self.set_status_message(format!("Could not open {}", name)),
            OpenOutcome::Nothing => {}
        }
    }

    // ── Mutations ───────────────────────────────────────────────────────────

    /// Create a dated note in the workspace root and open it.
    pub async fn create_note(&mut self) {
        let now = Local::now();
        let label = format_date_label(&now, &self.date_format);
        let Some(created) = operations::create_note(
            self.storage.as_ref(),
            &mut self.tree,
            note_stamp_date(&now),
            &label,
        )
        .await
        else {
            self.set_status_message("Could not create note".to_string());
            return;
        };

        self.flush_pending_save().await;
        self.note.load(&created.content);
        if let Some(idx) = self.tree.find_index_by_path(&created.path) {
            self.tree.selected_index = idx;
        }
        let name = file_name(&created.path).unwrap_or_default();
        self.selection.set_note(created.path, created.content);
        self.autosave.cancel();
        self.set_status_message(format!("Created {}", name));
    }

    /// Run a context-menu action against `target` (`None` for the root menu).
    pub async fn run_action(&mut self, action: MenuAction, target: Option<MenuTarget>) {
        match (action, target) {
            (MenuAction::NewFolder, _) => self.dialogs.request_new_folder(),
            (MenuAction::NewNote, _) => self.create_note().await,
            (MenuAction::Reveal, Some(target)) => {
                if !operations::reveal(self.storage.as_ref(), &target.path).await {
                    self.set_status_message(format!("Could not reveal {}", target.name));
                }
            }
            (MenuAction::Copy, Some(target)) => {
                match operations::copy(self.storage.as_ref(), &mut self.tree, &target.path).await {
                    Some(dest) => {
                        let name = file_name(&dest).unwrap_or_default();
                        self.set_status_message(format!("Copied to {}", name));
                    }
                    None => self.set_status_message(format!("Could not copy {}", target.name)),
                }
            }
            (MenuAction::Rename, Some(target)) => self.dialogs.request_rename(target),
            (MenuAction::Delete, Some(target)) => self.dialogs.request_delete(target),
            (action, None) => tracing::debug!(?action, "entry action without a target"),
        }
    }

    /// Run an entry action on the selected row, honouring disabled items.
    pub async fn run_shortcut(&mut self, action: MenuAction) {
        let Some(target) = self.tree.selected().map(MenuTarget::from) else {
            return;
        };
        let disabled = entry_menu(target.is_directory)
            .iter()
            .any(|item| item.action == action && item.disabled);
        if disabled {
            self.set_status_message(format!("Cannot {:?} a folder", action).to_lowercase());
            return;
        }
        self.run_action(action, Some(target)).await;
    }

    // ── Context menu ────────────────────────────────────────────────────────

    /// Open the entry menu on the selected row, or the root menu when the
    /// tree is empty.
    pub fn open_menu(&mut self) {
        if self.tree.root().is_none() {
            return;
        }
        self.menu = Some(match self.tree.selected() {
            Some(item) => ContextMenu::for_entry(MenuTarget::from(item)),
            None => ContextMenu::for_root(),
        });
    }

    pub fn open_root_menu(&mut self) {
        if self.tree.root().is_some() {
            self.menu = Some(ContextMenu::for_root());
        }
    }

    /// Run the focused menu item. Disabled items keep the menu open.
    pub async fn confirm_menu(&mut self) {
        let Some(action) = self.menu.as_ref().and_then(ContextMenu::chosen) else {
            return;
        };
        let target = self.menu.take().and_then(|menu| menu.target);
        self.run_action(action, target).await;
    }

    // ── Dialogs ─────────────────────────────────────────────────────────────

    pub fn request_open_workspace(&mut self) {
        let current = self.tree.root().map(|p| p.display().to_string());
        self.dialogs.request_open_workspace(current.as_deref());
    }

    /// Close the open dialog and perform what it collected.
    pub async fn submit_dialog(&mut self) {
        let Some(submission) = self.dialogs.submit() else {
            return;
        };
        match submission {
            DialogSubmission::Rename { target, new_name } => {
                let ok = operations::rename(
                    self.storage.as_ref(),
                    &mut self.tree,
                    &target.path,
                    &new_name,
                )
                .await;
                self.report(ok, format!("Renamed to {}", new_name), "Rename failed");
            }
            DialogSubmission::Delete { target } => {
                let ok =
                    operations::delete(self.storage.as_ref(), &mut self.tree, &target.path).await;
                self.report(ok, format!("Deleted {}", target.name), "Delete failed");
            }
            DialogSubmission::NewFolder { name } => {
                let ok =
                    operations::create_folder(self.storage.as_ref(), &mut self.tree, &name).await;
                self.report(ok, format!("Created folder {}", name), "Could not create folder");
            }
            DialogSubmission::OpenWorkspace { path } => {
                self.open_workspace(expand_home(&path)).await;
            }
            DialogSubmission::PickDocument { path } => {
                self.pick_document(expand_home(&path)).await;
            }
        }
    }

    /// Load a document from outside the workspace straight into the viewer.
    pub async fn pick_document(&mut self, path: PathBuf) {
        let Some(file) = ExternalFile::new(path) else {
            self.set_status_message("Not a file".to_string());
            return;
        };
        if classify(file.name()) != FileKind::Document {
            self.set_status_message(format!("{} is not a PDF", file.name()));
            return;
        }
        match file.read_bytes().await {
            Ok(bytes) => self.selection.show_external_document(file.name(), bytes),
            Err(e) => {
                tracing::error!(path = %file.path().display(), error = %e, "failed to read picked document");
                self.set_status_message(format!("Could not read {}", file.name()));
            }
        }
    }

    // ── Paste / drop ────────────────────────────────────────────────────────

    /// Route a bracketed paste to the dialog input, the note, or the tree.
    pub async fn handle_paste(&mut self, text: &str) {
        if self.dialogs.accepts_text() {
            for c in text.chars().filter(|c| !c.is_control()) {
                self.dialogs.input.insert(c);
            }
            return;
        }
        if self.focus == Focus::Note {
            if self.note.insert_str(text) {
                self.note_edited();
            }
            return;
        }

        let files = parse_pasted_paths(text);
        if files.is_empty() {
            return;
        }
        let Some(target) = self.tree.drop_target_dir() else {
            self.set_status_message("Open a workspace before dropping files".to_string());
            return;
        };
        let summary =
            operations::drop_files(self.storage.as_ref(), &mut self.tree, &target, &files).await;

        let mut msg = format!("Dropped {} file(s)", summary.written.len());
        if !summary.ignored.is_empty() {
            msg.push_str(&format!(", skipped {}", summary.ignored.len()));
        }
        if summary.failed > 0 {
            msg.push_str(&format!(", {} failed", summary.failed));
        }
        self.set_status_message(msg);
    }

    // ── Note editing & saving ───────────────────────────────────────────────

    /// Push the buffer into the held note content and restart the debounce.
    pub fn note_edited(&mut self) {
        self.selection.update_note_content(self.note.content());
        self.autosave.arm();
    }

    pub async fn on_autosave_due(&mut self, ticket: u64) {
        if self.autosave.take_due(ticket) {
            self.save_note().await;
        }
    }

    /// Explicit save request (Ctrl+S).
    pub async fn save_now(&mut self) {
        self.autosave.cancel();
        if self.selection.open_note.is_none() {
            self.set_status_message("No note open".to_string());
            return;
        }
        if self.save_note().await {
            self.set_status_message("Saved".to_string());
        }
    }

    /// Save a note whose debounce has not fired yet.
    pub async fn flush_pending_save(&mut self) {
        if self.autosave.is_pending() {
            self.autosave.cancel();
            self.save_note().await;
        }
    }

    /// Write the held content to the open note. Without an open note there
    /// is nothing to save.
    async fn save_note(&mut self) -> bool {
        let Some(path) = self.selection.open_note.clone() else {
            return false;
        };
        match self
            .storage
            .write_text(&path, &self.selection.note_content)
            .await
        {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "note saved");
                self.autosave.mark_saved();
                true
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to save note");
                self.set_status_message(format!("Save failed: {}", e.kind.label()));
                false
            }
        }
    }

    // ── Status ──────────────────────────────────────────────────────────────

    /// Set a status message with current timestamp.
    pub fn set_status_message(&mut self, msg: String) {
        self.status_message = Some((msg, Instant::now()));
    }

    /// Clear the status message if it has been displayed for more than 3 seconds.
    pub fn clear_expired_status(&mut self) {
        if let Some((_, ref created)) = self.status_message {
            if created.elapsed().as_secs() > 3 {
                self.status_message = None;
            }
        }
    }

    fn report(&mut self, ok: bool, success: String, failure: &str) {
        if ok {
            self.set_status_message(success);
        } else {
            self.set_status_message(failure.to_string());
        }
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Tree => Focus::Note,
            Focus::Note => Focus::Tree,
        };
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }
}

/// Format `now` with a strftime pattern, falling back to the default
/// pattern when `format` is malformed.
pub fn format_date_label(now: &DateTime<Local>, format: &str) -> String {
    let malformed = StrftimeItems::new(format).any(|item| matches!(item, Item::Error));
    let format = if malformed {
        tracing::warn!(format, "invalid date format, using default");
        DEFAULT_DATE_FORMAT
    } else {
        format
    };
    now.format(format).to_string()
}

/// Calendar date used in new note names. Names are stamped in UTC while the
/// "Created:" label uses local time.
pub fn note_stamp_date<Tz: TimeZone>(now: &DateTime<Tz>) -> NaiveDate {
    now.with_timezone(&Utc).date_naive()
}

fn expand_home(input: &str) -> PathBuf {
    match input.strip_prefix("~/") {
        Some(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| PathBuf::from(input)),
        None => PathBuf::from(input),
    }
}
