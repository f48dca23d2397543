//! Context menus for tree entries and for the workspace root.

use std::path::PathBuf;

use crate::fs::tree::FlatItem;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Reveal,
    Copy,
    Rename,
    Delete,
    NewFolder,
    NewNote,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub action: MenuAction,
    pub label: &'static str,
    pub disabled: bool,
    /// Destructive; drawn in the warning colour.
    pub danger: bool,
    /// Draw a separator above this item.
    pub divider: bool,
}

impl MenuItem {
    fn new(action: MenuAction, label: &'static str) -> Self {
        Self {
            action,
            label,
            disabled: false,
            danger: false,
            divider: false,
        }
    }
}

/// Items for a single entry. Directories cannot be copied.
pub fn entry_menu(is_directory: bool) -> Vec<MenuItem> {
    vec![
        MenuItem::new(MenuAction::Reveal, "Reveal in file manager"),
        MenuItem {
            disabled: is_directory,
            ..MenuItem::new(MenuAction::Copy, "Copy")
        },
        MenuItem::new(MenuAction::Rename, "Rename"),
        MenuItem {
            danger: true,
            divider: true,
            ..MenuItem::new(MenuAction::Delete, "Delete")
        },
    ]
}

/// Items for the workspace root (no entry targeted).
pub fn root_menu() -> Vec<MenuItem> {
    vec![
        MenuItem::new(MenuAction::NewFolder, "New folder"),
        MenuItem::new(MenuAction::NewNote, "New note"),
    ]
}

/// The entry a menu was opened on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuTarget {
    pub name: String,
    pub path: PathBuf,
    pub is_directory: bool,
}

impl From<&FlatItem> for MenuTarget {
    fn from(item: &FlatItem) -> Self {
        Self {
            name: item.name.clone(),
            path: item.path.clone(),
            is_directory: item.is_directory,
        }
    }
}

/// An open context menu with keyboard focus on one item.
#[derive(Debug, Clone)]
pub struct ContextMenu {
    /// `None` for the workspace-root menu.
    pub target: Option<MenuTarget>,
    pub items: Vec<MenuItem>,
    pub selected: usize,
}

impl ContextMenu {
    pub fn for_entry(target: MenuTarget) -> Self {
        let items = entry_menu(target.is_directory);
        Self {
            target: Some(target),
            items,
            selected: 0,
        }
    }

    pub fn for_root() -> Self {
        Self {
            target: None,
            items: root_menu(),
            selected: 0,
        }
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.items.len() {
            self.selected += 1;
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// The focused action, unless it is disabled.
    pub fn chosen(&self) -> Option<MenuAction> {
        self.items
            .get(self.selected)
            .filter(|item| !item.disabled)
            .map(|item| item.action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actions(items: &[MenuItem]) -> Vec<MenuAction> {
        items.iter().map(|i| i.action).collect()
    }

    #[test]
    fn entry_menu_for_file() {
        let items = entry_menu(false);
        assert_eq!(
            actions(&items),
            vec![MenuAction::Reveal, MenuAction::Copy, MenuAction::Rename, MenuAction::Delete]
        );
        assert!(items.iter().all(|i| !i.disabled));
        let delete = items.last().unwrap();
        assert!(delete.danger);
        assert!(delete.divider);
        assert_eq!(items.iter().filter(|i| i.danger).count(), 1);
    }

    #[test]
    fn entry_menu_disables_copy_for_directories() {
        let items = entry_menu(true);
        let copy = items.iter().find(|i| i.action == MenuAction::Copy).unwrap();
        assert!(copy.disabled);
        assert_eq!(items.iter().filter(|i| i.disabled).count(), 1);
    }

    #[test]
    fn root_menu_offers_creation() {
        assert_eq!(actions(&root_menu()), vec![MenuAction::NewFolder, MenuAction::NewNote]);
    }

    #[test]
    fn chosen_skips_disabled_item() {
        let mut menu = ContextMenu::for_entry(MenuTarget {
            name: "B".into(),
            path: PathBuf::from("/ws/B"),
            is_directory: true,
        });
        assert_eq!(menu.chosen(), Some(MenuAction::Reveal));
        menu.select_next();
        assert_eq!(menu.chosen(), None);
        menu.select_next();
        menu.select_next();
        menu.select_next();
        assert_eq!(menu.chosen(), Some(MenuAction::Delete));
        menu.select_previous();
        assert_eq!(menu.chosen(), Some(MenuAction::Rename));
    }

    #[test]
    fn root_menu_has_no_target() {
        let menu = ContextMenu::for_root();
        assert!(menu.target.is_none());
        assert_eq!(menu.items.len(), 2);
    }
}
