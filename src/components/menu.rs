use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Widget},
};

use crate::components::dialog::centered_rect;
use crate::menu::ContextMenu;

/// Popup listing the items of an open context menu.
pub struct MenuWidget<'a> {
    menu: &'a ContextMenu,
}

impl<'a> MenuWidget<'a> {
    pub fn new(menu: &'a ContextMenu) -> Self {
        Self { menu }
    }
}

impl<'a> Widget for MenuWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = match &self.menu.target {
            Some(target) => format!(" {} ", target.name),
            None => " Workspace ".to_string(),
        };
        let dividers = self.menu.items.iter().filter(|i| i.divider).count() as u16;
        let width = self
            .menu
            .items
            .iter()
            .map(|i| i.label.len() as u16 + 6)
            .chain(std::iter::once(title.chars().count() as u16 + 4))
            .max()
            .unwrap_or(20)
            .min(area.width.saturating_sub(4));
        let height = self.menu.items.len() as u16 + dividers + 2;
        let rect = centered_rect(width, height, area);

        Clear.render(rect, buf);
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));
        let inner = block.inner(rect);
        block.render(rect, buf);

        let mut y = inner.y;
        for (idx, item) in self.menu.items.iter().enumerate() {
            if y >= inner.y + inner.height {
                break;
            }
            if item.divider {
                let rule = "─".repeat(inner.width as usize);
                buf.set_string(inner.x, y, rule, Style::default().fg(Color::DarkGray));
                y += 1;
                if y >= inner.y + inner.height {
                    break;
                }
            }

            let mut style = if item.disabled {
                Style::default().fg(Color::DarkGray)
            } else if item.danger {
                Style::default().fg(Color::Red)
            } else {
                Style::default().fg(Color::White)
            };
            if idx == self.menu.selected {
                style = style.bg(Color::DarkGray).add_modifier(Modifier::BOLD);
            }
            let marker = if idx == self.menu.selected { "› " } else { "  " };
            let line = Line::from(Span::styled(format!("{}{}", marker, item.label), style));
            buf.set_line(inner.x, y, &line, inner.width);
            y += 1;
        }
    }
}
