//! Colour palette and text styles used across the UI.

use ratatui::style::{Color, Modifier, Style};

/// Central theme: change colours here and they propagate everywhere.
pub struct Theme;

impl Theme {
    /// Page background (slate-900).
    pub const PAGE_BG: (u8, u8, u8) = (15, 23, 42);
    /// Accent used for particles, headings and placeholders (cyan-400).
    pub const ACCENT: (u8, u8, u8) = (34, 211, 238);

    pub fn page_bg() -> Color {
        rgb(Self::PAGE_BG)
    }

    // ── page ───────────────────────────────────────────────────
    pub fn heading_style() -> Style {
        Style::default()
            .fg(rgb(Self::ACCENT))
            .add_modifier(Modifier::BOLD)
    }

    pub fn body_style() -> Style {
        Style::default().fg(Color::Rgb(209, 213, 219))
    }

    // ── navigation ─────────────────────────────────────────────
    pub fn nav_style(scrolled: bool) -> Style {
        if scrolled {
            Style::default().bg(Color::Rgb(30, 41, 59)).fg(Color::Gray)
        } else {
            Style::default().fg(Color::Gray)
        }
    }

    pub fn nav_active_style() -> Style {
        Style::default()
            .fg(rgb(Self::ACCENT))
            .add_modifier(Modifier::BOLD)
    }

    pub fn brand_style() -> Style {
        Style::default()
            .fg(rgb(Self::ACCENT))
            .add_modifier(Modifier::BOLD)
    }

    // ── chrome ─────────────────────────────────────────────────
    pub fn status_bar_style() -> Style {
        Style::default().bg(Color::DarkGray).fg(Color::White)
    }

    pub fn hud_style() -> Style {
        Style::default().bg(Color::DarkGray).fg(Color::Yellow)
    }
}

pub fn rgb((r, g, b): (u8, u8, u8)) -> Color {
    Color::Rgb(r, g, b)
}

/// RGB components of a colour; non-RGB colours read as the page background.
pub fn components(color: Color) -> (u8, u8, u8) {
    match color {
        Color::Rgb(r, g, b) => (r, g, b),
        _ => Theme::PAGE_BG,
    }
}

/// `fg` over `bg` with coverage `alpha` in `[0, 1]`.
pub fn blend(bg: (u8, u8, u8), fg: (u8, u8, u8), alpha: f64) -> (u8, u8, u8) {
    let a = alpha.clamp(0.0, 1.0);
    let mix = |b: u8, f: u8| (b as f64 + (f as f64 - b as f64) * a).round() as u8;
    (mix(bg.0, fg.0), mix(bg.1, fg.1), mix(bg.2, fg.2))
}
