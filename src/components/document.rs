use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph, Widget},
};

use crate::selection::Selection;

/// Document pane. Pages are not rendered; the pane summarises the bytes the
/// viewer was handed.
pub struct DocumentWidget<'a> {
    selection: &'a Selection,
    block: Option<Block<'a>>,
}

impl<'a> DocumentWidget<'a> {
    pub fn new(selection: &'a Selection) -> Self {
        Self {
            selection,
            block: None,
        }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }
}

/// Version from a `%PDF-x.y` header, if the bytes start with one.
pub fn pdf_version(bytes: &[u8]) -> Option<&str> {
    let rest = bytes.strip_prefix(b"%PDF-")?;
    let end = rest
        .iter()
        .take(8)
        .position(|b| b.is_ascii_whitespace())
        .unwrap_or(rest.len().min(8));
    std::str::from_utf8(&rest[..end]).ok().filter(|v| !v.is_empty())
}

fn human_size(len: usize) -> String {
    const UNITS: [&str; 4] = ["B", "KiB", "MiB", "GiB"];
    let mut size = len as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} B", len)
    } else {
        format!("{:.1} {}", size, UNITS[unit])
    }
}

impl<'a> Widget for DocumentWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner = if let Some(block) = self.block {
            let inner = block.inner(area);
            block.render(area, buf);
            inner
        } else {
            area
        };

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let dim = Style::default().fg(Color::DarkGray);
        let Some(title) = self.selection.document_title() else {
            let line = Line::from(Span::styled("No document open", dim));
            buf.set_line(inner.x, inner.y, &line, inner.width);
            return;
        };

        let label = Style::default().fg(Color::DarkGray);
        let value = Style::default().fg(Color::White);
        let mut lines = vec![Line::from(Span::styled(
            title,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ))];

        match &self.selection.document_bytes {
            Some(bytes) => {
                lines.push(Line::from(vec![
                    Span::styled("Size:    ", label),
                    Span::styled(human_size(bytes.len()), value),
                ]));
                let version = match pdf_version(bytes) {
                    Some(v) => Span::styled(format!("PDF {}", v), value),
                    None => Span::styled("no PDF header", Style::default().fg(Color::Red)),
                };
                lines.push(Line::from(vec![Span::styled("Format:  ", label), version]));
            }
            None => lines.push(Line::from(Span::styled(
                "Could not load document",
                Style::default().fg(Color::Red),
            ))),
        }
        if let Some(path) = &self.selection.open_document {
            lines.push(Line::from(vec![
                Span::styled("Path:    ", label),
                Span::styled(path.display().to_string(), dim),
            ]));
        }

        Paragraph::new(lines).render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::buffer_to_string;
    use std::path::PathBuf;

    #[test]
    fn version_from_header() {
        assert_eq!(pdf_version(b"%PDF-1.7\n%..."), Some("1.7"));
        assert_eq!(pdf_version(b"%PDF-2.0"), Some("2.0"));
        assert_eq!(pdf_version(b"hello"), None);
        assert_eq!(pdf_version(b"%PDF-\n"), None);
    }

    #[test]
    fn sizes_are_human_readable() {
        assert_eq!(human_size(512), "512 B");
        assert_eq!(human_size(2048), "2.0 KiB");
        assert_eq!(human_size(3 * 1024 * 1024), "3.0 MiB");
    }

    #[test]
    fn placeholder_without_document() {
        let selection = Selection::default();
        let area = Rect::new(0, 0, 30, 3);
        let mut buf = Buffer::empty(area);
        DocumentWidget::new(&selection).render(area, &mut buf);
        assert!(buffer_to_string(&buf, area).contains("No document open"));
    }

    #[test]
    fn loaded_document_summary() {
        let selection = Selection {
            open_document: Some(PathBuf::from("/ws/paper.pdf")),
            document_bytes: Some(b"%PDF-1.4\nrest".to_vec()),
            ..Selection::default()
        };
        let area = Rect::new(0, 0, 40, 5);
        let mut buf = Buffer::empty(area);
        DocumentWidget::new(&selection).render(area, &mut buf);
        let content = buffer_to_string(&buf, area);
        assert!(content.contains("paper.pdf"));
        assert!(content.contains("13 B"));
        assert!(content.contains("PDF 1.4"));
    }

    #[test]
    fn failed_load_is_reported() {
        let selection = Selection {
            open_document: Some(PathBuf::from("/ws/gone.pdf")),
            ..Selection::default()
        };
        let area = Rect::new(0, 0, 40, 5);
        let mut buf = Buffer::empty(area);
        DocumentWidget::new(&selection).render(area, &mut buf);
        assert!(buffer_to_string(&buf, area).contains("Could not load"));
    }
}
