use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph, Widget, Wrap},
};

use crate::fs::naming::FileKind;
use crate::fs::tree::{FlatItem, TreeState};
use crate::selection::Selection;

/// Tree widget that renders the workspace with box-drawing characters.
///
/// Rows whose path is the open document or the open note are highlighted.
pub struct TreeWidget<'a> {
    tree_state: &'a TreeState,
    selection: &'a Selection,
    focused: bool,
    block: Option<Block<'a>>,
}

impl<'a> TreeWidget<'a> {
    pub fn new(tree_state: &'a TreeState, selection: &'a Selection) -> Self {
        Self {
            tree_state,
            selection,
            focused: true,
            block: None,
        }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = block.into();
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    /// Build the indentation prefix for a row.
    ///
    /// Every ancestor level contributes a continuation bar unless that
    /// ancestor was the last of its siblings.
    fn build_prefix(item: &FlatItem, items: &[FlatItem], item_index: usize) -> String {
        let mut prefix = String::new();
        for d in 0..item.depth {
            let ancestor_is_last = items[..item_index]
                .iter()
                .rev()
                .take_while(|row| row.depth >= d)
                .find(|row| row.depth == d)
                .is_some_and(|row| row.is_last_sibling);
            prefix.push_str(if ancestor_is_last { "   " } else { "│  " });
        }
        prefix.push_str(if item.is_last_sibling { "└─ " } else { "├─ " });
        prefix
    }

    fn item_indicator(item: &FlatItem) -> &'static str {
        if item.is_directory {
            return if item.is_expanded { "▾ " } else { "▸ " };
        }
        match item.kind {
            FileKind::Document => "▤ ",
            FileKind::Note => "✎ ",
            FileKind::Ignored => "  ",
        }
    }
}

impl<'a> Widget for TreeWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner_area = if let Some(block) = &self.block {
            let inner = block.inner(area);
            block.clone().render(area, buf);
            inner
        } else {
            area
        };

        if self.tree_state.root().is_none() {
            Paragraph::new("No workspace open.\n\nPress o to open a folder.")
                .style(Style::default().fg(Color::DarkGray))
                .wrap(Wrap { trim: false })
                .render(inner_area, buf);
            return;
        }

        let items = &self.tree_state.flat_items;
        let visible_height = inner_area.height as usize;
        if items.is_empty() {
            let line = Line::from(Span::styled(
                "(empty)",
                Style::default().fg(Color::DarkGray),
            ));
            buf.set_line(inner_area.x, inner_area.y, &line, inner_area.width);
            return;
        }
        if visible_height == 0 {
            return;
        }

        let scroll = self.tree_state.scroll_offset;
        let selected = self.tree_state.selected_index;

        for (i, (idx, item)) in items
            .iter()
            .enumerate()
            .skip(scroll)
            .take(visible_height)
            .enumerate()
        {
            let y = inner_area.y + i as u16;
            let prefix = Self::build_prefix(item, items, idx);
            let indicator = Self::item_indicator(item);

            let mut style = if item.is_directory {
                Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            if self.selection.is_selected(&item.path) {
                style = style.fg(Color::Yellow).add_modifier(Modifier::BOLD);
            }
            if idx == selected {
                let bg = if self.focused {
                    Color::DarkGray
                } else {
                    Color::Black
                };
                style = style.bg(bg);
            }

            let mut spans = vec![
                Span::styled(prefix, Style::default().fg(Color::DarkGray)),
                Span::styled(format!("{}{}", indicator, item.name), style),
            ];
            if item.is_expanded && item.child_count == Some(0) {
                spans.push(Span::styled(" (empty)", Style::default().fg(Color::DarkGray)));
            }
            let line = Line::from(spans);
            buf.set_line(inner_area.x, y, &line, inner_area.width);
        }
    }
}
