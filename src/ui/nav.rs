//! Top navigation bar: brand on the left, one numbered entry per page
//! section.  The section at the top of the viewport is highlighted.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Widget,
};

use crate::core::page::Page;

use super::theme::Theme;

const BRAND_WIDTH: u16 = 10;

/// Clickable region of each visible entry, in section order.  Entries that
/// do not fit are dropped.
pub fn nav_items(page: &Page, area: Rect) -> Vec<(usize, Rect)> {
    let mut items = Vec::new();
    let mut x = area.x.saturating_add(BRAND_WIDTH);
    let right = area.x.saturating_add(area.width);
    for (i, section) in page.sections().iter().enumerate() {
        let width = entry_label(i, &section.title).chars().count() as u16;
        if x.saturating_add(width) > right {
            break;
        }
        items.push((i, Rect::new(x, area.y, width, 1)));
        x = x.saturating_add(width + 1);
    }
    items
}

fn entry_label(index: usize, title: &str) -> String {
    if index < 9 {
        format!(" {} {} ", index + 1, title)
    } else {
        format!(" {title} ")
    }
}

pub struct NavBar<'a> {
    pub page: &'a Page,
    pub active: usize,
    /// Page scrolled past the threshold: draw a solid bar.
    pub scrolled: bool,
}

impl Widget for NavBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }
        let base = Theme::nav_style(self.scrolled);
        if self.scrolled {
            buf.set_style(area, base);
        }

        let brand = Line::from(vec![
            Span::styled(" Dev", Theme::brand_style()),
            Span::styled("Ops", base.add_modifier(ratatui::style::Modifier::BOLD)),
        ]);
        buf.set_line(area.x, area.y, &brand, BRAND_WIDTH.min(area.width));

        for (i, rect) in nav_items(self.page, area) {
            let style: Style = if i == self.active {
                Theme::nav_active_style()
            } else {
                base
            };
            let label = entry_label(i, &self.page.sections()[i].title);
            buf.set_line(rect.x, rect.y, &Line::from(Span::styled(label, style)), rect.width);
        }
    }
}
