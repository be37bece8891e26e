//! Rendering surface for the drifting logo background.
//!
//! Logos are painted with `▀` half-blocks, two pixels per cell.  Each target
//! pixel is mapped back through the element's rotation into the source
//! image (nearest neighbour), so rotation costs nothing extra.  Pixel alpha
//! times frame opacity is blended over whatever is already in the cell,
//! which lets overlapping logos and particles stack.

use std::collections::HashMap;

use ratatui::{
    buffer::Buffer,
    layout::{Position, Rect},
    style::Modifier,
    widgets::Widget,
};

use crate::app::assets::AssetState;
use crate::app::background::BackgroundFrame;
use crate::core::element::DecorativeElement;
use crate::core::mapper::{ElementFrame, ParticleFrame};

use super::theme::{blend, components, rgb, Theme};

/// Coverage below which a pixel is left untouched.
const MIN_ALPHA: f64 = 0.02;
/// Radius of the placeholder ring relative to the half box size.
const RING_RADIUS: f64 = 0.8;

pub struct BackgroundWidget<'a> {
    pub elements: &'a [DecorativeElement],
    pub frame: &'a BackgroundFrame,
    pub assets: &'a HashMap<String, AssetState>,
    pub px_per_col: f64,
    pub px_per_row: f64,
}

/// Where an element lands on screen, in fractional cell coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub centre_col: f64,
    pub centre_row: f64,
    /// Edge length of the (scaled) square box, in px.
    pub size_px: f64,
    pub rotation_rad: f64,
    pub opacity: f64,
}

impl Placement {
    /// The element box's top-left corner sits at `(50 + position)%` of the
    /// surface, shifted by the frame offsets.  Scaling is about the box
    /// centre.
    pub fn new(
        area: Rect,
        element: &DecorativeElement,
        frame: &ElementFrame,
        px_per_col: f64,
        px_per_row: f64,
    ) -> Self {
        let left = area.x as f64
            + area.width as f64 * (50.0 + element.position.x) / 100.0
            + frame.x / px_per_col;
        let top = area.y as f64
            + area.height as f64 * (50.0 + element.position.y) / 100.0
            + frame.y / px_per_row;
        Self {
            centre_col: left + element.scale / 2.0 / px_per_col,
            centre_row: top + element.scale / 2.0 / px_per_row,
            size_px: element.scale * frame.scale,
            rotation_rad: frame.rotation.to_radians(),
            opacity: frame.opacity,
        }
    }

    /// Cell range (cols, rows) covering the box under any rotation, clipped
    /// to `area`.
    fn cell_bounds(&self, area: Rect, px_per_col: f64, px_per_row: f64) -> (u16, u16, u16, u16) {
        let reach = self.size_px * std::f64::consts::FRAC_1_SQRT_2;
        let clip = |v: f64, lo: u16, hi: u16| v.clamp(lo as f64, hi as f64) as u16;
        (
            clip((self.centre_col - reach / px_per_col).floor(), area.left(), area.right()),
            clip((self.centre_col + reach / px_per_col).ceil(), area.left(), area.right()),
            clip((self.centre_row - reach / px_per_row).floor(), area.top(), area.bottom()),
            clip((self.centre_row + reach / px_per_row).ceil(), area.top(), area.bottom()),
        )
    }

    /// Offset in px from the box centre, rotated back into the unrotated
    /// box frame.
    fn unrotate(&self, col: f64, row: f64, px_per_col: f64, px_per_row: f64) -> (f64, f64) {
        let dx = (col - self.centre_col) * px_per_col;
        let dy = (row - self.centre_row) * px_per_row;
        let (sin, cos) = self.rotation_rad.sin_cos();
        (dx * cos + dy * sin, -dx * sin + dy * cos)
    }
}

impl Widget for BackgroundWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let bg = Theme::page_bg();
        for y in area.top()..area.bottom() {
            for x in area.left()..area.right() {
                if let Some(cell) = buf.cell_mut(Position::new(x, y)) {
                    cell.reset();
                    cell.set_bg(bg);
                }
            }
        }

        for particle in &self.frame.particles {
            render_particle(particle, area, self.px_per_row, buf);
        }

        for (element, frame) in self.elements.iter().zip(&self.frame.elements) {
            if frame.opacity < MIN_ALPHA || frame.scale <= 0.0 {
                continue;
            }
            let placement = Placement::new(area, element, frame, self.px_per_col, self.px_per_row);
            match self.assets.get(&element.id) {
                Some(AssetState::Ready(img)) => {
                    paint_image(img, &placement, area, self.px_per_col, self.px_per_row, buf)
                }
                Some(AssetState::Loading) => {}
                Some(AssetState::Failed) | None => {
                    paint_placeholder(element, &placement, area, self.px_per_col, self.px_per_row, buf)
                }
            }
        }
    }
}

/// Top and bottom colours currently shown by a cell.
fn cell_halves(buf: &Buffer, pos: Position) -> ((u8, u8, u8), (u8, u8, u8)) {
    match buf.cell(pos) {
        Some(cell) if cell.symbol() == "▀" => (components(cell.fg), components(cell.bg)),
        Some(cell) => (components(cell.bg), components(cell.bg)),
        None => (Theme::PAGE_BG, Theme::PAGE_BG),
    }
}

fn paint_image(
    img: &image::RgbaImage,
    placement: &Placement,
    area: Rect,
    px_per_col: f64,
    px_per_row: f64,
    buf: &mut Buffer,
) {
    let (iw, ih) = (img.width() as f64, img.height() as f64);
    if iw == 0.0 || ih == 0.0 || placement.size_px <= 0.0 {
        return;
    }
    // object-contain: the long side spans the box.
    let fit = placement.size_px / iw.max(ih);

    let sample = |col: f64, row: f64| -> Option<((u8, u8, u8), f64)> {
        let (sx, sy) = placement.unrotate(col, row, px_per_col, px_per_row);
        let ix = sx / fit + iw / 2.0;
        let iy = sy / fit + ih / 2.0;
        if ix < 0.0 || iy < 0.0 || ix >= iw || iy >= ih {
            return None;
        }
        let p = img.get_pixel(ix as u32, iy as u32);
        let alpha = p[3] as f64 / 255.0 * placement.opacity;
        (alpha >= MIN_ALPHA).then_some(((p[0], p[1], p[2]), alpha))
    };

    let (x0, x1, y0, y1) = placement.cell_bounds(area, px_per_col, px_per_row);
    for y in y0..y1 {
        for x in x0..x1 {
            let col = x as f64 + 0.5;
            let top = sample(col, y as f64 + 0.25);
            let bottom = sample(col, y as f64 + 0.75);
            if top.is_none() && bottom.is_none() {
                continue;
            }
            let pos = Position::new(x, y);
            let (mut top_rgb, mut bottom_rgb) = cell_halves(buf, pos);
            if let Some((c, a)) = top {
                top_rgb = blend(top_rgb, c, a);
            }
            if let Some((c, a)) = bottom {
                bottom_rgb = blend(bottom_rgb, c, a);
            }
            if let Some(cell) = buf.cell_mut(pos) {
                cell.set_char('▀').set_fg(rgb(top_rgb)).set_bg(rgb(bottom_rgb));
            }
        }
    }
}

/// Fallback for images that failed to load: a dotted ring with the label's
/// initials in the middle.
fn paint_placeholder(
    element: &DecorativeElement,
    placement: &Placement,
    area: Rect,
    px_per_col: f64,
    px_per_row: f64,
    buf: &mut Buffer,
) {
    let half = placement.size_px / 2.0;
    if half <= 0.0 {
        return;
    }
    // Ring thickness of roughly one cell.
    let band = px_per_col / half;
    let (x0, x1, y0, y1) = placement.cell_bounds(area, px_per_col, px_per_row);
    for y in y0..y1 {
        for x in x0..x1 {
            let (dx, dy) = placement.unrotate(x as f64 + 0.5, y as f64 + 0.5, px_per_col, px_per_row);
            let r = (dx * dx + dy * dy).sqrt() / half;
            if (r - RING_RADIUS).abs() > band / 2.0 {
                continue;
            }
            let pos = Position::new(x, y);
            let (_, under) = cell_halves(buf, pos);
            let fg = blend(under, Theme::ACCENT, placement.opacity);
            if let Some(cell) = buf.cell_mut(pos) {
                cell.set_char('·').set_fg(rgb(fg)).set_bg(rgb(under));
            }
        }
    }

    let initials = element.initials();
    let len = initials.chars().count() as f64;
    let row = placement.centre_row.floor();
    let start = (placement.centre_col - len / 2.0).round();
    for (i, ch) in initials.chars().enumerate() {
        let col = start + i as f64;
        if col < area.left() as f64 || col >= area.right() as f64 {
            continue;
        }
        if row < area.top() as f64 || row >= area.bottom() as f64 {
            continue;
        }
        let pos = Position::new(col as u16, row as u16);
        let (_, under) = cell_halves(buf, pos);
        let fg = blend(under, (255, 255, 255), placement.opacity);
        if let Some(cell) = buf.cell_mut(pos) {
            cell.set_char(ch)
                .set_fg(rgb(fg))
                .set_bg(rgb(under))
                .modifier
                .insert(Modifier::BOLD);
        }
    }
}

fn render_particle(particle: &ParticleFrame, area: Rect, px_per_row: f64, buf: &mut Buffer) {
    let col = area.x as f64 + area.width as f64 * particle.left_pct / 100.0;
    let row = area.y as f64 + area.height as f64 * particle.top_pct / 100.0 + particle.y / px_per_row;
    if col < area.left() as f64
        || col >= area.right() as f64
        || row < area.top() as f64
        || row >= area.bottom() as f64
    {
        return;
    }
    let glyph = if particle.scale > 1.1 { '●' } else { '•' };
    let pos = Position::new(col as u16, row as u16);
    let (_, under) = cell_halves(buf, pos);
    let fg = blend(under, Theme::ACCENT, particle.opacity);
    if let Some(cell) = buf.cell_mut(pos) {
        cell.set_char(glyph).set_fg(rgb(fg));
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::sync::Arc;

    use super::*;
    use crate::core::element::{default_elements, Offset2};

    fn frame(opacity: f64, rotation: f64) -> ElementFrame {
        ElementFrame {
            x: 0.0,
            y: 0.0,
            rotation,
            opacity,
            scale: 1.0,
        }
    }

    fn element() -> DecorativeElement {
        DecorativeElement {
            id: "square".into(),
            label: "Square Logo".into(),
            src: "square.png".into(),
            scale: 96.0,
            position: Offset2 { x: -10.0, y: -10.0 },
            rotation: 0.0,
            priority: true,
        }
    }

    #[test]
    fn placement_follows_percentages_and_offsets() {
        let area = Rect::new(0, 0, 100, 50);
        let el = element();
        let mut f = frame(1.0, 0.0);
        let p = Placement::new(area, &el, &f, 8.0, 16.0);
        assert_eq!(p.centre_col, 40.0 + 6.0);
        assert_eq!(p.centre_row, 20.0 + 3.0);

        f.y = -160.0;
        f.x = 16.0;
        let moved = Placement::new(area, &el, &f, 8.0, 16.0);
        assert_eq!(moved.centre_row, p.centre_row - 10.0);
        assert_eq!(moved.centre_col, p.centre_col + 2.0);
    }

    #[test]
    fn opaque_image_paints_halfblocks() {
        let area = Rect::new(0, 0, 40, 20);
        let el = element();
        let img = Arc::new(image::RgbaImage::from_pixel(8, 8, image::Rgba([255, 0, 0, 255])));
        let mut assets = HashMap::new();
        assets.insert(el.id.clone(), AssetState::Ready(img));
        let bg_frame = BackgroundFrame {
            elements: vec![frame(1.0, 0.0)],
            ..BackgroundFrame::default()
        };
        let elements = [el];
        let mut buf = Buffer::empty(area);
        BackgroundWidget {
            elements: &elements,
            frame: &bg_frame,
            assets: &assets,
            px_per_col: 8.0,
            px_per_row: 16.0,
        }
        .render(area, &mut buf);

        let placement = Placement::new(area, &elements[0], &bg_frame.elements[0], 8.0, 16.0);
        let centre = Position::new(placement.centre_col as u16, placement.centre_row as u16);
        let cell = buf.cell(centre).unwrap();
        assert_eq!(cell.symbol(), "▀");
        assert_eq!(cell.fg, ratatui::style::Color::Rgb(255, 0, 0));

        let corner = buf.cell(Position::new(0, 0)).unwrap();
        assert_eq!(corner.bg, Theme::page_bg());
        assert_eq!(corner.symbol(), " ");
    }

    #[test]
    fn failed_image_shows_placeholder_initials() {
        let area = Rect::new(0, 0, 60, 30);
        let el = element();
        let mut assets = HashMap::new();
        assets.insert(el.id.clone(), AssetState::Failed);
        let bg_frame = BackgroundFrame {
            elements: vec![frame(0.7, 20.0)],
            ..BackgroundFrame::default()
        };
        let elements = [el];
        let mut buf = Buffer::empty(area);
        BackgroundWidget {
            elements: &elements,
            frame: &bg_frame,
            assets: &assets,
            px_per_col: 8.0,
            px_per_row: 16.0,
        }
        .render(area, &mut buf);

        let text: String = buf.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("SL"));
        assert!(text.contains('·'));
    }

    #[test]
    fn loading_and_invisible_elements_draw_nothing() {
        let area = Rect::new(0, 0, 60, 30);
        let els = default_elements(Path::new("logos"));
        let assets: HashMap<String, AssetState> =
            els.iter().map(|e| (e.id.clone(), AssetState::Loading)).collect();
        let mut frames: Vec<ElementFrame> = els.iter().map(|_| frame(0.5, 0.0)).collect();
        frames[0].opacity = 0.0;
        let bg_frame = BackgroundFrame {
            elements: frames,
            ..BackgroundFrame::default()
        };
        let mut buf = Buffer::empty(area);
        BackgroundWidget {
            elements: &els,
            frame: &bg_frame,
            assets: &assets,
            px_per_col: 12.0,
            px_per_row: 24.0,
        }
        .render(area, &mut buf);
        assert!(buf.content().iter().all(|c| c.symbol() == " "));
    }

    #[test]
    fn particle_outside_surface_is_skipped() {
        let area = Rect::new(0, 0, 20, 10);
        let mut buf = Buffer::empty(area);
        let p = ParticleFrame {
            left_pct: 50.0,
            top_pct: 5.0,
            y: -200.0,
            opacity: 0.5,
            scale: 1.0,
        };
        render_particle(&p, area, 24.0, &mut buf);
        assert!(buf.content().iter().all(|c| c.symbol() == " "));

        let p = ParticleFrame { y: 0.0, top_pct: 50.0, ..p };
        render_particle(&p, area, 24.0, &mut buf);
        assert_eq!(buf.cell(Position::new(10, 5)).map(|c| c.symbol()), Some("•"));
    }
}
