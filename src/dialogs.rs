//! Dialog state machines that collect input before a mutation runs.
//!
//! Each dialog is `Closed` or `OpenFor(target)`. Submitting closes it and
//! hands the target (plus any typed text) back to the caller, which runs the
//! mutation. Cancelling closes it with no effect.

use crate::menu::MenuTarget;

/// Open/closed state of one dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogSlot<T> {
    Closed,
    OpenFor(T),
}

impl<T> Default for DialogSlot<T> {
    fn default() -> Self {
        DialogSlot::Closed
    }
}

impl<T> DialogSlot<T> {
    pub fn request(&mut self, target: T) {
        *self = DialogSlot::OpenFor(target);
    }

    /// Close and return the target the dialog was open for.
    pub fn submit(&mut self) -> Option<T> {
        match std::mem::take(self) {
            DialogSlot::OpenFor(target) => Some(target),
            DialogSlot::Closed => None,
        }
    }

    pub fn cancel(&mut self) {
        *self = DialogSlot::Closed;
    }

    pub fn is_open(&self) -> bool {
        matches!(self, DialogSlot::OpenFor(_))
    }

    pub fn target(&self) -> Option<&T> {
        match self {
            DialogSlot::OpenFor(target) => Some(target),
            DialogSlot::Closed => None,
        }
    }
}

/// Single-line text input with a byte-offset cursor.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TextInput {
    pub value: String,
    pub cursor: usize,
}

impl TextInput {
    pub fn with_value(value: impl Into<String>) -> Self {
        let value = value.into();
        let cursor = value.len();
        Self { value, cursor }
    }

    pub fn insert(&mut self, c: char) {
        self.value.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub fn backspace(&mut self) {
        if let Some(prev) = self.value[..self.cursor].chars().next_back() {
            self.cursor -= prev.len_utf8();
            self.value.remove(self.cursor);
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.value.len() {
            self.value.remove(self.cursor);
        }
    }

    pub fn move_left(&mut self) {
        if let Some(prev) = self.value[..self.cursor].chars().next_back() {
            self.cursor -= prev.len_utf8();
        }
    }

    pub fn move_right(&mut self) {
        if let Some(next) = self.value[self.cursor..].chars().next() {
            self.cursor += next.len_utf8();
        }
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.value.len();
    }

    /// The trimmed value, or `None` when only whitespace was typed.
    pub fn trimmed(&self) -> Option<String> {
        let trimmed = self.value.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }
}

/// Which dialog is showing, borrowed for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveDialog<'a> {
    Rename(&'a MenuTarget),
    Delete(&'a MenuTarget),
    NewFolder,
    OpenWorkspace,
    PickDocument,
}

/// A submitted dialog, ready to be turned into a mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogSubmission {
    Rename { target: MenuTarget, new_name: String },
    Delete { target: MenuTarget },
    NewFolder { name: String },
    OpenWorkspace { path: String },
    PickDocument { path: String },
}

/// All dialogs of the workspace pane. At most one is open at a time.
#[derive(Debug, Default)]
pub struct DialogController {
    pub rename: DialogSlot<MenuTarget>,
    pub delete: DialogSlot<MenuTarget>,
    pub new_folder: DialogSlot<()>,
    pub open_workspace: DialogSlot<()>,
    pub pick_document: DialogSlot<()>,
    pub input: TextInput,
}

impl DialogController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rename starts with the current name filled in.
    pub fn request_rename(&mut self, target: MenuTarget) {
        self.close_all();
        self.input = TextInput::with_value(target.name.clone());
        self.rename.request(target);
    }

    pub fn request_delete(&mut self, target: MenuTarget) {
        self.close_all();
        self.delete.request(target);
    }

    pub fn request_new_folder(&mut self) {
        self.close_all();
        self.new_folder.request(());
    }

    pub fn request_open_workspace(&mut self, current: Option<&str>) {
        self.close_all();
        self.input = TextInput::with_value(current.unwrap_or_default());
        self.open_workspace.request(());
    }

    pub fn request_pick_document(&mut self) {
        self.close_all();
        self.pick_document.request(());
    }

    pub fn is_open(&self) -> bool {
        self.active().is_some()
    }

    pub fn active(&self) -> Option<ActiveDialog<'_>> {
        if let Some(target) = self.rename.target() {
            Some(ActiveDialog::Rename(target))
        } else if let Some(target) = self.delete.target() {
            Some(ActiveDialog::Delete(target))
        } else if self.new_folder.is_open() {
            Some(ActiveDialog::NewFolder)
        } else if self.open_workspace.is_open() {
            Some(ActiveDialog::OpenWorkspace)
        } else if self.pick_document.is_open() {
            Some(ActiveDialog::PickDocument)
        } else {
            None
        }
    }

    /// Whether the open dialog takes typed text.
    pub fn accepts_text(&self) -> bool {
        matches!(
            self.active(),
            Some(
                ActiveDialog::Rename(_)
                    | ActiveDialog::NewFolder
                    | ActiveDialog::OpenWorkspace
                    | ActiveDialog::PickDocument
            )
        )
    }

    /// Close the open dialog and describe what was submitted.
    ///
    /// Text dialogs submitted with blank input behave like cancel.
    pub fn submit(&mut self) -> Option<DialogSubmission> {
        let text = self.input.trimmed();
        let submission = if let Some(target) = self.rename.submit() {
            text.map(|new_name| DialogSubmission::Rename { target, new_name })
        } else if let Some(target) = self.delete.submit() {
            Some(DialogSubmission::Delete { target })
        } else if self.new_folder.submit().is_some() {
            text.map(|name| DialogSubmission::NewFolder { name })
        } else if self.open_workspace.submit().is_some() {
            text.map(|path| DialogSubmission::OpenWorkspace { path })
        } else if self.pick_document.submit().is_some() {
            text.map(|path| DialogSubmission::PickDocument { path })
        } else {
            None
        };
        self.input = TextInput::default();
        submission
    }

    pub fn cancel(&mut self) {
        self.close_all();
    }

    fn close_all(&mut self) {
        self.rename.cancel();
        self.delete.cancel();
        self.new_folder.cancel();
        self.open_workspace.cancel();
        self.pick_document.cancel();
        self.input = TextInput::default();
    }
}
