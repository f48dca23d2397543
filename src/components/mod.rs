pub mod dialog;
pub mod document;
pub mod menu;
pub mod note;
pub mod status_bar;
pub mod tree;

#[cfg(test)]
pub(crate) fn buffer_to_string(
    buf: &ratatui::buffer::Buffer,
    area: ratatui::layout::Rect,
) -> String {
    let mut s = String::new();
    for y in area.y..area.y + area.height {
        for x in area.x..area.x + area.width {
            s.push_str(buf.cell((x, y)).map_or(" ", |c| c.symbol()));
        }
        s.push('\n');
    }
    s
}
