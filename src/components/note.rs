use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Block, Widget},
};

use crate::editor::NoteBuffer;

/// Note editor pane: line-number gutter, text, and a block cursor when focused.
pub struct NoteWidget<'a> {
    note: &'a NoteBuffer,
    focused: bool,
    block: Option<Block<'a>>,
}

impl<'a> NoteWidget<'a> {
    pub fn new(note: &'a NoteBuffer) -> Self {
        Self {
            note,
            focused: false,
            block: None,
        }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    fn gutter_width(&self) -> u16 {
        let digits = self.note.line_count().max(1).to_string().len() as u16;
        digits + 2
    }
}

impl<'a> Widget for NoteWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner = if let Some(block) = &self.block {
            let inner = block.inner(area);
            block.clone().render(area, buf);
            inner
        } else {
            area
        };

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let gutter_w = self.gutter_width();
        let text_width = inner.width.saturating_sub(gutter_w) as usize;
        if text_width == 0 {
            return;
        }

        let cursor_style = Style::default().fg(Color::Black).bg(Color::White);

        for row in 0..inner.height as usize {
            let line_idx = self.note.scroll_offset + row;
            let Some(line) = self.note.buffer.get(line_idx) else {
                break;
            };
            let y = inner.y + row as u16;
            let is_current = line_idx == self.note.cursor_line;

            let num = format!("{:>width$} ", line_idx + 1, width = (gutter_w - 2) as usize);
            let gutter_style = if is_current && self.focused {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            buf.set_span(inner.x, y, &Span::styled(num, gutter_style), gutter_w);
            buf.set_string(
                inner.x + gutter_w - 1,
                y,
                "│",
                Style::default().fg(Color::DarkGray),
            );

            let text_x = inner.x + gutter_w;
            let visible: String = line.chars().take(text_width).collect();
            let text_style = if line.starts_with('#') {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            buf.set_string(text_x, y, &visible, text_style);

            if self.focused && is_current && self.note.cursor_col < text_width {
                let ch = line.chars().nth(self.note.cursor_col).unwrap_or(' ');
                buf.set_string(
                    text_x + self.note.cursor_col as u16,
                    y,
                    ch.to_string(),
                    cursor_style,
                );
            }
        }
    }
}
