use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use crate::app::{App, Focus};
use crate::dialogs::ActiveDialog;
use crate::menu::{ContextMenu, MenuAction, MenuTarget};

/// Handle a key event. Overlays (dialog, then menu) take input first.
pub async fn handle_key_event(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.quit();
        return;
    }
    if key.code == KeyCode::Char('s') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.save_now().await;
        return;
    }

    if app.dialogs.is_open() {
        handle_dialog_key(app, key).await;
    } else if app.menu.is_some() {
        handle_menu_key(app, key).await;
    } else if app.focus == Focus::Note {
        handle_note_key(app, key);
    } else {
        handle_tree_key(app, key).await;
    }
}

async fn handle_tree_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Char('j') | KeyCode::Down => app.tree.select_next(),
        KeyCode::Char('k') | KeyCode::Up => app.tree.select_previous(),
        KeyCode::Char('g') | KeyCode::Home => app.tree.select_first(),
        KeyCode::Char('G') | KeyCode::End => app.tree.select_last(),
        KeyCode::Enter | KeyCode::Char('l') | KeyCode::Right => app.activate_selected().await,
        KeyCode::Char('h') | KeyCode::Left => app.collapse_selected(),
        KeyCode::Char('m') => app.open_menu(),
        KeyCode::Char('M') => app.open_root_menu(),
        KeyCode::Char('n') => app.create_note().await,
        KeyCode::Char('N') if app.tree.root().is_some() => app.dialogs.request_new_folder(),
        KeyCode::Char('c') => app.run_shortcut(MenuAction::Copy).await,
        KeyCode::Char('r') => app.run_shortcut(MenuAction::Rename).await,
        KeyCode::Char('d') => app.run_shortcut(MenuAction::Delete).await,
        KeyCode::Char('x') => app.run_shortcut(MenuAction::Reveal).await,
        KeyCode::Char('o') => app.request_open_workspace(),
        KeyCode::Char('p') => app.dialogs.request_pick_document(),
        KeyCode::Char('R') => app.refresh().await,
        KeyCode::Char('W') => app.close_workspace(),
        KeyCode::Tab => app.toggle_focus(),
        _ => {}
    }
}

async fn handle_menu_key(app: &mut App, key: KeyEvent) {
    let Some(menu) = app.menu.as_mut() else {
        return;
    };
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => menu.select_next(),
        KeyCode::Char('k') | KeyCode::Up => menu.select_previous(),
        KeyCode::Enter => app.confirm_menu().await,
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('m') => app.menu = None,
        _ => {}
    }
}

async fn handle_dialog_key(app: &mut App, key: KeyEvent) {
    if matches!(app.dialogs.active(), Some(ActiveDialog::Delete(_))) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Enter => app.submit_dialog().await,
            KeyCode::Char('n') | KeyCode::Esc => app.dialogs.cancel(),
            _ => {}
        }
        return;
    }

    let input = &mut app.dialogs.input;
    match key.code {
        KeyCode::Enter => app.submit_dialog().await,
        KeyCode::Esc => app.dialogs.cancel(),
        KeyCode::Char(c) => input.insert(c),
        KeyCode::Backspace => input.backspace(),
        KeyCode::Delete => input.delete(),
        KeyCode::Left => input.move_left(),
        KeyCode::Right => input.move_right(),
        KeyCode::Home => input.home(),
        KeyCode::End => input.end(),
        _ => {}
    }
}

fn handle_note_key(app: &mut App, key: KeyEvent) {
    let note = &mut app.note;
    let changed = match key.code {
        KeyCode::Esc | KeyCode::Tab => {
            app.focus = Focus::Tree;
            return;
        }
        KeyCode::Char(c) => note.insert_char(c),
        KeyCode::Enter => note.insert_newline(),
        KeyCode::Backspace => note.delete_char_before(),
        KeyCode::Delete => note.delete_char_at(),
        KeyCode::Up => {
            note.move_up();
            false
        }
        KeyCode::Down => {
            note.move_down();
            false
        }
        KeyCode::Left => {
            note.move_left();
            false
        }
        KeyCode::Right => {
            note.move_right();
            false
        }
        KeyCode::Home => {
            note.move_home();
            false
        }
        KeyCode::End => {
            note.move_end();
            false
        }
        KeyCode::PageUp => {
            note.page_up();
            false
        }
        KeyCode::PageDown => {
            note.page_down();
            false
        }
        _ => false,
    };
    if changed {
        app.note_edited();
    }
}

/// Left click selects a tree row and opens it; right click opens the
/// context menu for that row, or the root menu below the last row.
pub async fn handle_mouse_event(app: &mut App, mouse: MouseEvent) {
    if app.dialogs.is_open() || app.menu.is_some() {
        if matches!(mouse.kind, MouseEventKind::Down(_)) && app.menu.is_some() {
            app.menu = None;
        }
        return;
    }

    match mouse.kind {
        MouseEventKind::ScrollDown => app.tree.select_next(),
        MouseEventKind::ScrollUp => app.tree.select_previous(),
        MouseEventKind::Down(button) => {
            let area = app.tree_area;
            let inside = mouse.column >= area.x
                && mouse.column < area.x + area.width
                && mouse.row >= area.y
                && mouse.row < area.y + area.height;
            if !inside {
                if button == MouseButton::Left && app.selection.open_note.is_some() {
                    app.focus = Focus::Note;
                }
                return;
            }
            app.focus = Focus::Tree;

            let row = app.tree.scroll_offset + (mouse.row - area.y) as usize;
            let hit = row < app.tree.flat_items.len();
            if hit {
                app.tree.selected_index = row;
            }
            match button {
                MouseButton::Left if hit => app.activate_selected().await,
                MouseButton::Right if hit => {
                    let target = MenuTarget::from(&app.tree.flat_items[row]);
                    app.menu = Some(ContextMenu::for_entry(target));
                }
                MouseButton::Right => app.open_root_menu(),
                _ => {}
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::autosave::AutoSave;
    use crate::storage::LocalStorage;
    use crossterm::event::KeyEventState;
    use ratatui::layout::Rect;
    use std::fs;
    use std::sync::Arc;
    use std::time::Duration;
    use tempfile::TempDir;
    use tokio::sync::mpsc;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent {
            modifiers: KeyModifiers::CONTROL,
            ..key(KeyCode::Char(c))
        }
    }

    async fn setup() -> (TempDir, App) {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("a.md"), "note").unwrap();
        fs::write(dir.path().join("b.pdf"), b"%PDF-1.5").unwrap();
        let (tx, _rx) = mpsc::unbounded_channel();
        let autosave = AutoSave::new(Duration::from_secs(10), Duration::from_millis(500), tx);
        let mut app = App::new(Arc::new(LocalStorage::new()), autosave, "%Y/%m/%d");
        app.open_workspace(dir.path().to_path_buf()).await;
        (dir, app)
    }

    #[tokio::test]
    async fn q_quits_from_tree() {
        let (_dir, mut app) = setup().await;
        handle_key_event(&mut app, key(KeyCode::Char('q'))).await;
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn ctrl_c_quits_from_note() {
        let (_dir, mut app) = setup().await;
        app.focus = Focus::Note;
        handle_key_event(&mut app, ctrl('c')).await;
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn j_k_move_selection() {
        let (_dir, mut app) = setup().await;
        handle_key_event(&mut app, key(KeyCode::Char('j'))).await;
        assert_eq!(app.tree.selected_index, 1);
        handle_key_event(&mut app, key(KeyCode::Char('k'))).await;
        assert_eq!(app.tree.selected_index, 0);
    }

    #[tokio::test]
    async fn typing_in_note_focus_edits_note() {
        let (_dir, mut app) = setup().await;
        handle_key_event(&mut app, key(KeyCode::Tab)).await;
        assert_eq!(app.focus, Focus::Note);
        app.note.load("");
        handle_key_event(&mut app, key(KeyCode::Char('q'))).await;
        assert!(!app.should_quit);
        assert_eq!(app.selection.note_content, "q");
        handle_key_event(&mut app, key(KeyCode::Esc)).await;
        assert_eq!(app.focus, Focus::Tree);
    }

    #[tokio::test]
    async fn delete_dialog_confirms_with_y() {
        let (dir, mut app) = setup().await;
        handle_key_event(&mut app, key(KeyCode::Char('j'))).await;
        handle_key_event(&mut app, key(KeyCode::Char('d'))).await;
        assert!(app.dialogs.is_open());
        handle_key_event(&mut app, key(KeyCode::Char('y'))).await;
        assert!(!dir.path().join("a.md").exists());
    }

    #[tokio::test]
    async fn delete_dialog_cancels_with_n() {
        let (dir, mut app) = setup().await;
        handle_key_event(&mut app, key(KeyCode::Char('j'))).await;
        handle_key_event(&mut app, key(KeyCode::Char('d'))).await;
        handle_key_event(&mut app, key(KeyCode::Char('n'))).await;
        assert!(!app.dialogs.is_open());
        assert!(dir.path().join("a.md").exists());
    }

    #[tokio::test]
    async fn new_folder_dialog_typing() {
        let (dir, mut app) = setup().await;
        handle_key_event(&mut app, key(KeyCode::Char('N'))).await;
        for c in "docs".chars() {
            handle_key_event(&mut app, key(KeyCode::Char(c))).await;
        }
        handle_key_event(&mut app, key(KeyCode::Enter)).await;
        assert!(dir.path().join("docs").is_dir());
    }

    #[tokio::test]
    async fn escape_closes_menu() {
        let (_dir, mut app) = setup().await;
        handle_key_event(&mut app, key(KeyCode::Char('m'))).await;
        assert!(app.menu.is_some());
        handle_key_event(&mut app, key(KeyCode::Esc)).await;
        assert!(app.menu.is_none());
    }

    #[tokio::test]
    async fn right_click_opens_entry_menu() {
        let (_dir, mut app) = setup().await;
        app.tree_area = Rect::new(1, 1, 30, 10);
        let click = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Right),
            column: 3,
            row: 2,
            modifiers: KeyModifiers::NONE,
        };
        handle_mouse_event(&mut app, click).await;
        let menu = app.menu.as_ref().unwrap();
        assert_eq!(menu.target.as_ref().unwrap().name, "a.md");
    }

    #[tokio::test]
    async fn right_click_below_rows_opens_root_menu() {
        let (_dir, mut app) = setup().await;
        app.tree_area = Rect::new(1, 1, 30, 10);
        let click = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Right),
            column: 3,
            row: 9,
            modifiers: KeyModifiers::NONE,
        };
        handle_mouse_event(&mut app, click).await;
        assert!(app.menu.as_ref().unwrap().target.is_none());
    }
}
