use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

const TREE_HINTS: &str = " n:note  m:menu  r:ren  d:del  o:open  q:quit ";
const NOTE_HINTS: &str = " Esc:tree  ^S:save ";

/// Status bar: workspace path, capability notice, key hints, or a transient
/// status message that replaces the whole bar.
pub struct StatusBarWidget<'a> {
    path_str: &'a str,
    notice: Option<&'a str>,
    status_message: Option<&'a str>,
    editing_note: bool,
}

impl<'a> StatusBarWidget<'a> {
    pub fn new(path_str: &'a str) -> Self {
        Self {
            path_str,
            notice: None,
            status_message: None,
            editing_note: false,
        }
    }

    pub fn notice(mut self, notice: &'a str) -> Self {
        self.notice = Some(notice);
        self
    }

    pub fn status_message(mut self, msg: &'a str) -> Self {
        self.status_message = Some(msg);
        self
    }

    pub fn editing_note(mut self, editing: bool) -> Self {
        self.editing_note = editing;
        self
    }
}

/// Keep the tail of `s` within `budget` characters, marking the cut.
fn truncate_left(s: &str, budget: usize) -> String {
    let len = s.chars().count();
    if len <= budget {
        return s.to_string();
    }
    if budget <= 3 {
        return s.chars().take(budget).collect();
    }
    let tail: String = s.chars().skip(len - (budget - 3)).collect();
    format!("...{}", tail)
}

impl<'a> Widget for StatusBarWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }
        let width = area.width as usize;
        let bar_style = Style::default().bg(Color::Black);

        if let Some(msg) = self.status_message {
            let display: String = msg.chars().take(width).collect();
            let line = Line::from(Span::styled(
                format!("{:<width$}", display, width = width),
                bar_style.fg(Color::Green),
            ));
            buf.set_line(area.x, area.y, &line, area.width);
            return;
        }

        let hints = if self.editing_note {
            NOTE_HINTS
        } else {
            TREE_HINTS
        };
        let hints_len = hints.chars().count();
        let notice_len = self.notice.map_or(0, |n| n.chars().count() + 1);
        let path_budget = width
            .saturating_sub(hints_len)
            .saturating_sub(notice_len)
            .saturating_sub(1);
        let path_display = truncate_left(self.path_str, path_budget);

        let mut spans = vec![Span::styled(
            format!(" {}", path_display),
            bar_style.fg(Color::White),
        )];
        if let Some(notice) = self.notice {
            spans.push(Span::raw(" "));
            spans.push(Span::styled(
                notice,
                bar_style.fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ));
        }

        let used: usize = spans.iter().map(|s| s.content.chars().count()).sum();
        let pad = width.saturating_sub(used).saturating_sub(hints_len);
        if pad > 0 {
            spans.push(Span::styled(" ".repeat(pad), bar_style));
        }
        spans.push(Span::styled(
            hints,
            bar_style.fg(Color::DarkGray).add_modifier(Modifier::DIM),
        ));

        buf.set_line(area.x, area.y, &Line::from(spans), area.width);
    }
}
