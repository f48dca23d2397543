/// Plain-text line buffer behind the note pane.
///
/// Edits report whether the content changed so the caller can schedule an
/// autosave. The cursor column counts characters, not bytes.
#[derive(Debug, Clone)]
pub struct NoteBuffer {
    pub buffer: Vec<String>,
    pub cursor_line: usize,
    pub cursor_col: usize,
    /// Vertical scroll offset (line index of topmost visible line).
    pub scroll_offset: usize,
    /// Visible height of the note area (set during render).
    pub visible_height: usize,
}

impl NoteBuffer {
    pub fn new(content: &str) -> Self {
        Self {
            buffer: content.split('\n').map(String::from).collect(),
            cursor_line: 0,
            cursor_col: 0,
            scroll_offset: 0,
            visible_height: 24,
        }
    }

    /// Replace the whole text and reset the cursor.
    pub fn load(&mut self, content: &str) {
        let visible_height = self.visible_height;
        *self = Self::new(content);
        self.visible_height = visible_height;
    }

    /// The buffer joined back into file content. A trailing empty line
    /// stands for a trailing newline.
    pub fn content(&self) -> String {
        self.buffer.join("\n")
    }

    pub fn line_count(&self) -> usize {
        self.buffer.len()
    }

    fn current_line_len(&self) -> usize {
        self.buffer
            .get(self.cursor_line)
            .map(|l| l.chars().count())
            .unwrap_or(0)
    }

    fn clamp_cursor(&mut self) {
        if self.cursor_line >= self.buffer.len() {
            self.cursor_line = self.buffer.len().saturating_sub(1);
        }
        self.cursor_col = self.cursor_col.min(self.current_line_len());
    }

    /// Ensure the viewport scrolls to keep the cursor visible.
    pub fn ensure_cursor_visible(&mut self) {
        if self.visible_height == 0 {
            return;
        }
        if self.cursor_line < self.scroll_offset {
            self.scroll_offset = self.cursor_line;
        } else if self.cursor_line >= self.scroll_offset + self.visible_height {
            self.scroll_offset = self.cursor_line + 1 - self.visible_height;
        }
    }

    // ── Editing ─────────────────────────────────────────────────────

    pub fn insert_char(&mut self, ch: char) -> bool {
        let col = self.cursor_col;
        let Some(line) = self.buffer.get_mut(self.cursor_line) else {
            return false;
        };
        let byte_idx = char_to_byte_index(line, col);
        line.insert(byte_idx, ch);
        self.cursor_col += 1;
        true
    }

    /// Insert text that may span several lines (paste into the note).
    pub fn insert_str(&mut self, text: &str) -> bool {
        let mut changed = false;
        for ch in text.chars() {
            changed |= match ch {
                '\n' => self.insert_newline(),
                '\r' => false,
                c => self.insert_char(c),
            };
        }
        changed
    }

    /// Backspace. Joins with the previous line at column zero.
    pub fn delete_char_before(&mut self) -> bool {
        if self.cursor_col > 0 {
            let line = &mut self.buffer[self.cursor_line];
            let byte_idx = char_to_byte_index(line, self.cursor_col - 1);
            line.remove(byte_idx);
            self.cursor_col -= 1;
            true
        } else if self.cursor_line > 0 {
            let current = self.buffer.remove(self.cursor_line);
            self.cursor_line -= 1;
            self.cursor_col = self.current_line_len();
            self.buffer[self.cursor_line].push_str(&current);
            self.ensure_cursor_visible();
            true
        } else {
            false
        }
    }

    /// Delete key. Joins the next line at end of line.
    pub fn delete_char_at(&mut self) -> bool {
        if self.cursor_col < self.current_line_len() {
            let line = &mut self.buffer[self.cursor_line];
            let byte_idx = char_to_byte_index(line, self.cursor_col);
            line.remove(byte_idx);
            true
        } else if self.cursor_line + 1 < self.buffer.len() {
            let next = self.buffer.remove(self.cursor_line + 1);
            self.buffer[self.cursor_line].push_str(&next);
            true
        } else {
            false
        }
    }

    /// Split the current line at the cursor (Enter).
    pub fn insert_newline(&mut self) -> bool {
        let Some(line) = self.buffer.get_mut(self.cursor_line) else {
            return false;
        };
        let byte_idx = char_to_byte_index(line, self.cursor_col);
        let remainder = line.split_off(byte_idx);
        self.buffer.insert(self.cursor_line + 1, remainder);
        self.cursor_line += 1;
        self.cursor_col = 0;
        self.ensure_cursor_visible();
        true
    }

    // ── Navigation ──────────────────────────────────────────────────

    pub fn move_up(&mut self) {
        if self.cursor_line > 0 {
            self.cursor_line -= 1;
            self.clamp_cursor();
            self.ensure_cursor_visible();
        }
    }

    pub fn move_down(&mut self) {
        if self.cursor_line + 1 < self.buffer.len() {
            self.cursor_line += 1;
            self.clamp_cursor();
            self.ensure_cursor_visible();
        }
    }

    pub fn move_left(&mut self) {
        if self.cursor_col > 0 {
            self.cursor_col -= 1;
        } else if self.cursor_line > 0 {
            self.cursor_line -= 1;
            self.cursor_col = self.current_line_len();
            self.ensure_cursor_visible();
        }
    }

    pub fn move_right(&mut self) {
        if self.cursor_col < self.current_line_len() {
            self.cursor_col += 1;
        } else if self.cursor_line + 1 < self.buffer.len() {
            self.cursor_line += 1;
            self.cursor_col = 0;
            self.ensure_cursor_visible();
        }
    }

    pub fn move_home(&mut self) {
        self.cursor_col = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor_col = self.current_line_len();
    }

    pub fn page_up(&mut self) {
        let jump = self.visible_height.max(1);
        self.cursor_line = self.cursor_line.saturating_sub(jump);
        self.clamp_cursor();
        self.ensure_cursor_visible();
    }

    pub fn page_down(&mut self) {
        let jump = self.visible_height.max(1);
        self.cursor_line = (self.cursor_line + jump).min(self.buffer.len().saturating_sub(1));
        self.clamp_cursor();
        self.ensure_cursor_visible();
    }
}

impl Default for NoteBuffer {
    fn default() -> Self {
        Self::new("")
    }
}

fn char_to_byte_index(s: &str, char_col: usize) -> usize {
    s.char_indices()
        .nth(char_col)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}
