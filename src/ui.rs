use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders},
    Frame,
};

use crate::app::{App, Focus};
use crate::components::dialog::DialogWidget;
use crate::components::document::DocumentWidget;
use crate::components::menu::MenuWidget;
use crate::components::note::NoteWidget;
use crate::components::status_bar::StatusBarWidget;
use crate::components::tree::TreeWidget;
use crate::storage::file_name;

fn pane_block(title: String, focused: bool) -> Block<'static> {
    let border = if focused { Color::Cyan } else { Color::DarkGray };
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
}

/// Render the application UI: tree on the left, document over note on the
/// right, status bar at the bottom, overlays last.
pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();
    let [main, status] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .areas(area);
    let [tree_area, right] = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .areas(main);
    let [document_area, note_area] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .areas(right);

    render_tree(app, frame, tree_area);
    render_document(app, frame, document_area);
    render_note(app, frame, note_area);
    render_status(app, frame, status);

    if let Some(menu) = &app.menu {
        frame.render_widget(MenuWidget::new(menu), main);
    }
    if app.dialogs.is_open() {
        frame.render_widget(DialogWidget::new(&app.dialogs), area);
    }
}

fn render_tree(app: &mut App, frame: &mut Frame, area: Rect) {
    let title = match app.tree.root() {
        Some(root) => format!(" {} ", file_name(root).unwrap_or_else(|| root.display().to_string())),
        None => " Workspace ".to_string(),
    };
    let block = pane_block(title, app.focus == Focus::Tree);

    let inner = block.inner(area);
    app.tree_area = inner;
    app.tree.update_scroll(inner.height as usize);

    let widget = TreeWidget::new(&app.tree, &app.selection)
        .focused(app.focus == Focus::Tree)
        .block(block);
    frame.render_widget(widget, area);
}

fn render_document(app: &App, frame: &mut Frame, area: Rect) {
    let block = pane_block(" Document ".to_string(), false);
    frame.render_widget(DocumentWidget::new(&app.selection).block(block), area);
}

fn render_note(app: &mut App, frame: &mut Frame, area: Rect) {
    let name = app
        .selection
        .open_note
        .as_deref()
        .and_then(file_name)
        .unwrap_or_else(|| "unsaved".to_string());
    let mut title = format!(" {} ", name);
    if app.autosave.is_saving() {
        title.push_str("· saving… ");
    } else if let Some(saved) = app.autosave.last_saved {
        title.push_str(&format!("· saved {} ", saved.format("%H:%M:%S")));
    }
    let focused = app.focus == Focus::Note;
    let block = pane_block(title, focused);

    app.note.visible_height = block.inner(area).height as usize;
    app.note.ensure_cursor_visible();

    let widget = NoteWidget::new(&app.note).focused(focused).block(block);
    frame.render_widget(widget, area);
}

fn render_status(app: &App, frame: &mut Frame, area: Rect) {
    let path = app
        .tree
        .selected_path()
        .or(app.tree.root())
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "no workspace".to_string());

    let mut widget = StatusBarWidget::new(&path).editing_note(app.focus == Focus::Note);
    if !app.storage.is_available() {
        widget = widget.notice("storage unavailable");
    }
    if let Some((msg, _)) = &app.status_message {
        widget = widget.status_message(msg);
    }
    frame.render_widget(widget, area);
}
