use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Padding, Widget},
};

use crate::dialogs::{ActiveDialog, DialogController, TextInput};
use crate::menu::MenuTarget;

/// Dialog widget that renders the open dialog as a centered modal overlay.
pub struct DialogWidget<'a> {
    dialogs: &'a DialogController,
}

impl<'a> DialogWidget<'a> {
    pub fn new(dialogs: &'a DialogController) -> Self {
        Self { dialogs }
    }
}

/// Calculate a centered rectangle within the given area.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    let w = width.min(area.width);
    let h = height.min(area.height);
    Rect::new(x, y, w, h)
}

impl<'a> Widget for DialogWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some(active) = self.dialogs.active() else {
            return;
        };
        let input = &self.dialogs.input;
        match active {
            ActiveDialog::Rename(target) => {
                render_input_dialog(&format!("Rename {}", target.name), input, area, buf)
            }
            ActiveDialog::Delete(target) => render_confirm_dialog(target, area, buf),
            ActiveDialog::NewFolder => render_input_dialog("New Folder", input, area, buf),
            ActiveDialog::OpenWorkspace => {
                render_input_dialog("Open Workspace Folder", input, area, buf)
            }
            ActiveDialog::PickDocument => render_input_dialog("Open PDF", input, area, buf),
        }
    }
}

fn render_input_dialog(title: &str, input: &TextInput, area: Rect, buf: &mut Buffer) {
    let dialog_width = 50.min(area.width.saturating_sub(4));
    let dialog_height = 5;
    let rect = centered_rect(dialog_width, dialog_height, area);

    Clear.render(rect, buf);

    let block = Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .padding(Padding::horizontal(1));

    let inner = block.inner(rect);
    block.render(rect, buf);

    if inner.height == 0 || inner.width == 0 {
        return;
    }

    let value = input.value.as_str();
    let before = &value[..input.cursor];
    let (cursor_char, after) = match value[input.cursor..].chars().next() {
        Some(c) => (
            &value[input.cursor..input.cursor + c.len_utf8()],
            &value[input.cursor + c.len_utf8()..],
        ),
        None => (" ", ""),
    };

    // Keep the cursor in view by dropping characters from the left.
    let max_width = inner.width as usize;
    let before_chars = before.chars().count();
    let room = max_width.saturating_sub(2);
    let before_display = if before_chars > room {
        let skip = before_chars - room;
        before
            .char_indices()
            .nth(skip)
            .map_or(before, |(i, _)| &before[i..])
    } else {
        before
    };

    let input_style = Style::default().fg(Color::White);
    let cursor_style = Style::default()
        .bg(Color::White)
        .fg(Color::Black)
        .add_modifier(Modifier::BOLD);

    let line = Line::from(vec![
        Span::styled(before_display, input_style),
        Span::styled(cursor_char, cursor_style),
        Span::styled(after, input_style),
    ]);
    buf.set_line(inner.x, inner.y + inner.height / 2, &line, inner.width);

    let hint = "[Enter] Confirm  [Esc] Cancel";
    let hint_style = Style::default()
        .fg(Color::DarkGray)
        .add_modifier(Modifier::DIM);
    let hint_line = Line::from(Span::styled(hint, hint_style));
    if inner.height > 1 {
        buf.set_line(inner.x, inner.y + inner.height - 1, &hint_line, inner.width);
    }
}

fn render_confirm_dialog(target: &MenuTarget, area: Rect, buf: &mut Buffer) {
    let question = if target.is_directory {
        "Delete this folder and everything in it?"
    } else {
        "Delete this file? This cannot be undone."
    };
    // Border plus one column of padding on each side.
    let widest = (target.name.chars().count() + 6).max(question.chars().count());
    let dialog_width = (widest as u16 + 4)
        .max(40)
        .min(area.width.saturating_sub(4));
    let dialog_height = 7.min(area.height.saturating_sub(2));
    let rect = centered_rect(dialog_width, dialog_height, area);

    Clear.render(rect, buf);

    let block = Block::default()
        .title(" Delete ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red))
        .padding(Padding::horizontal(1));

    let inner = block.inner(rect);
    block.render(rect, buf);

    if inner.height < 2 || inner.width == 0 {
        return;
    }

    let header = Line::from(Span::styled(
        question,
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    ));
    buf.set_line(inner.x, inner.y, &header, inner.width);

    if inner.height > 2 {
        let line = Line::from(Span::styled(
            format!("  • {}", target.name),
            Style::default().fg(Color::White),
        ));
        buf.set_line(inner.x, inner.y + 2, &line, inner.width);
    }

    let hint = "[y] Delete  [n/Esc] Cancel";
    let hint_style = Style::default()
        .fg(Color::DarkGray)
        .add_modifier(Modifier::DIM);
    let hint_line = Line::from(Span::styled(hint, hint_style));
    buf.set_line(inner.x, inner.y + inner.height - 1, &hint_line, inner.width);
}
