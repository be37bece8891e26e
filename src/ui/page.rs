//! Renders the visible slice of the page over the background.

use ratatui::{buffer::Buffer, layout::Rect, text::Line, widgets::Widget};

use crate::core::page::{Page, RowKind};

use super::theme::Theme;

/// Widest text column before the page is centred.
const MAX_TEXT_WIDTH: u16 = 76;

pub struct PageWidget<'a> {
    pub page: &'a Page,
    /// First visible row.
    pub offset: usize,
}

impl Widget for PageWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let text_w = area.width.min(MAX_TEXT_WIDTH);
        let margin = (area.width - text_w) / 2;

        let rows = self.page.rows().iter().skip(self.offset);
        for (dy, row) in rows.take(area.height as usize).enumerate() {
            let y = area.y + dy as u16;
            match row.kind {
                RowKind::Blank => {}
                RowKind::Heading => {
                    let w = (row.text.chars().count() as u16).min(area.width);
                    let x = area.x + (area.width - w) / 2;
                    let line = Line::styled(row.text.as_str(), Theme::heading_style());
                    buf.set_line(x, y, &line, w);
                }
                RowKind::Body => {
                    let line = Line::styled(row.text.as_str(), Theme::body_style());
                    buf.set_line(area.x + margin, y, &line, text_w);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use ratatui::{backend::TestBackend, Terminal};

    use super::*;

    fn row_text(terminal: &Terminal<TestBackend>, y: u16) -> String {
        let buf = terminal.backend().buffer();
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol())
            .collect::<String>()
    }

    #[test]
    fn renders_from_offset_with_centred_heading() {
        let page = Page::parse("# Intro\nhello\n\n# Second\nworld\n").unwrap();
        let mut terminal = Terminal::new(TestBackend::new(40, 6)).unwrap();
        terminal
            .draw(|f| f.render_widget(PageWidget { page: &page, offset: 0 }, f.area()))
            .unwrap();
        let heading = row_text(&terminal, 0);
        assert_eq!(heading.trim(), "Intro");
        assert_eq!(heading.find("Intro"), Some((40 - 5) / 2));
        assert_eq!(row_text(&terminal, 2).trim(), "hello");

        let second = page.section_start(1).unwrap();
        terminal
            .draw(|f| {
                f.render_widget(
                    PageWidget {
                        page: &page,
                        offset: second,
                    },
                    f.area(),
                )
            })
            .unwrap();
        assert_eq!(row_text(&terminal, 0).trim(), "Second");
        assert_eq!(row_text(&terminal, 2).trim(), "world");
    }
}
