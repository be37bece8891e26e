//! Central application state.
//!
//! All mutable state lives here so that the rest of the app can be pure
//! functions over `&AppState` (rendering) or `&mut AppState` (event handling).

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use ratatui::layout::Rect;

use crate::config::{config_path, AppConfig};
use crate::core::element::DecorativeElement;
use crate::core::mapper::DEFAULT_PARTICLES;
use crate::core::page::Page;
use crate::core::scroll::ScrollFeed;

use super::assets::{self, AssetState};
use super::background::{BackgroundFrame, BackgroundLayer};

/// Which view / overlay is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveView {
    #[default]
    Page,
    SettingsMenu,
}

/// Scroll offset (px) past which the navigation bar switches style.
pub const NAV_SCROLLED_PX: f64 = 50.0;

/// Top-level application state.
pub struct AppState {
    pub config: AppConfig,
    /// Where config changes are written; `None` keeps them in memory.
    pub config_path: Option<PathBuf>,
    pub page: Page,
    /// First visible page row.
    pub row_offset: usize,
    /// Page viewport height from the last draw.
    pub viewport_rows: usize,
    /// Host side of the scroll signal.
    pub feed: ScrollFeed,
    pub background: BackgroundLayer,
    /// Most recent frame produced by the background layer.
    pub frame: BackgroundFrame,
    pub elements: Arc<[DecorativeElement]>,
    pub assets: HashMap<String, AssetState>,
    pub active_view: ActiveView,
    /// Currently highlighted item in the settings menu.
    pub settings_selected: usize,
    pub should_quit: bool,
    /// An optional status message shown in the bottom bar.
    pub status_message: Option<String>,
    /// Monotonically increasing tick counter (drives the spinner).
    pub tick: u64,
    /// Full terminal area from the last draw (for mouse hit testing).
    pub terminal_area: Rect,
}

impl AppState {
    pub fn new(config: AppConfig, page: Page, elements: Vec<DecorativeElement>) -> Self {
        let elements: Arc<[DecorativeElement]> = elements.into();
        let feed = ScrollFeed::new();
        let particles = if config.particles { DEFAULT_PARTICLES } else { 0 };
        let mut background =
            BackgroundLayer::mount_elements(&feed, Arc::clone(&elements), config.motion, particles);
        background.mapper_mut().set_ambient(config.ambient);
        let assets = assets::pending_assets(&elements);

        Self {
            config,
            config_path: Some(config_path()),
            page,
            row_offset: 0,
            viewport_rows: 0,
            feed,
            background,
            frame: BackgroundFrame::default(),
            elements,
            assets,
            active_view: ActiveView::default(),
            settings_selected: 0,
            should_quit: false,
            status_message: None,
            tick: 0,
            terminal_area: Rect::default(),
        }
    }

    /// Scroll offset in device pixels represented by the current row offset.
    pub fn scroll_px(&self) -> f64 {
        self.row_offset as f64 * self.config.scroll_px_per_row
    }

    pub fn max_row_offset(&self) -> usize {
        self.page.max_offset(self.viewport_rows)
    }

    /// Move the page and publish the new offset to the scroll feed.
    pub fn set_row_offset(&mut self, rows: usize) {
        self.row_offset = rows.min(self.max_row_offset());
        self.feed.push(self.scroll_px());
    }

    pub fn scroll_by(&mut self, delta: isize) {
        let target = self.row_offset.saturating_add_signed(delta);
        self.set_row_offset(target);
    }

    /// Section at the top of the viewport.
    pub fn current_section(&self) -> usize {
        self.page.section_at(self.row_offset)
    }

    pub fn jump_to_section(&mut self, index: usize) {
        if let Some(start) = self.page.section_start(index) {
            self.set_row_offset(start);
            if let Some(section) = self.page.sections().get(index) {
                self.status_message = Some(section.title.clone());
            }
        }
    }

    /// Record a new viewport height, re-clamping the offset.
    pub fn set_viewport_rows(&mut self, rows: usize) {
        if rows != self.viewport_rows {
            self.viewport_rows = rows;
            self.set_row_offset(self.row_offset);
        }
    }

    /// Whether the published offset is past the nav-bar threshold.
    pub fn nav_scrolled(&self) -> bool {
        self.feed.current() > NAV_SCROLLED_PX
    }

    /// Advance animations by `dt` seconds.
    pub fn advance(&mut self, dt: f64) {
        self.tick = self.tick.wrapping_add(1);
        if let Some(frame) = self.background.on_tick(dt) {
            self.frame = frame;
        }
    }

    pub fn set_ambient(&mut self, enabled: bool) {
        self.config.ambient = enabled;
        self.background.mapper_mut().set_ambient(enabled);
    }

    pub fn set_particles(&mut self, enabled: bool) {
        self.config.particles = enabled;
        let count = if enabled { DEFAULT_PARTICLES } else { 0 };
        self.background.mapper_mut().set_particles(count);
    }

    /// Push the configured spring onto the live mapper.
    pub fn apply_motion(&mut self) {
        self.background.mapper_mut().set_spring_config(self.config.motion);
    }

    /// Persist the current config.  Failures are logged, not fatal.
    pub fn save_config(&self) {
        let Some(path) = &self.config_path else {
            return;
        };
        if let Err(e) = self.config.save_to(path) {
            tracing::warn!("failed to save config: {e:#}");
        }
    }

    pub fn loading_assets(&self) -> bool {
        assets::any_loading(&self.assets)
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::core::element::default_elements;

    fn state() -> AppState {
        let mut s = AppState::new(
            AppConfig::default(),
            Page::default(),
            default_elements(Path::new("logos")),
        );
        s.set_viewport_rows(20);
        s
    }

    #[test]
    fn scrolling_publishes_pixels() {
        let mut s = state();
        s.scroll_by(3);
        assert_eq!(s.row_offset, 3);
        assert_eq!(s.feed.current(), 3.0 * s.config.scroll_px_per_row);
        s.scroll_by(-10);
        assert_eq!(s.row_offset, 0);
        assert_eq!(s.feed.current(), 0.0);
    }

    #[test]
    fn offset_clamps_to_page_end() {
        let mut s = state();
        s.set_row_offset(10_000);
        assert_eq!(s.row_offset, s.page.total_rows() - 20);
        s.set_viewport_rows(s.page.total_rows() + 5);
        assert_eq!(s.row_offset, 0);
    }

    #[test]
    fn section_jumps_and_nav_state() {
        let mut s = state();
        assert!(!s.nav_scrolled());
        s.jump_to_section(2);
        assert_eq!(s.current_section(), 2);
        assert!(s.nav_scrolled());
        assert_eq!(s.status_message.as_deref(), Some("Certifications"));
        s.jump_to_section(99);
        assert_eq!(s.current_section(), 2);
    }

    #[test]
    fn advance_pulls_scroll_into_frame() {
        let mut s = state();
        s.scroll_by(5);
        s.advance(1.0 / 30.0);
        assert_eq!(s.frame.raw_scroll, s.scroll_px());
        assert!(s.frame.smoothed > 0.0);
        assert_eq!(s.frame.elements.len(), 9);
    }

    #[test]
    fn toggles_reach_the_mapper() {
        let mut s = state();
        s.set_ambient(false);
        assert!(!s.background.mapper().ambient());
        s.set_particles(false);
        s.advance(0.1);
        assert!(s.frame.particles.is_empty());
    }
}
