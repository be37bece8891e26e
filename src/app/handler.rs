//! Input handling: maps key/mouse events to state mutations.

use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::config::Action;
use crate::ui::layout::AppLayout;
use crate::ui::nav::nav_items;

use super::settings::SETTINGS_ITEMS;
use super::state::{ActiveView, AppState};

/// Process a key event, dispatching based on the active view.
pub fn handle_key(state: &mut AppState, key: KeyEvent) {
    if key.kind == KeyEventKind::Release {
        return;
    }
    // Ctrl+c always quits, regardless of view.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        state.should_quit = true;
        return;
    }

    match state.active_view {
        ActiveView::Page => handle_page_key(state, key),
        ActiveView::SettingsMenu => handle_settings_key(state, key),
    }
}

// ── Page view (configurable bindings) ───────────────────────────

fn handle_page_key(state: &mut AppState, key: KeyEvent) {
    // Digits jump straight to a section, like the nav bar entries.
    if let KeyCode::Char(c @ '1'..='9') = key.code {
        if key.modifiers.is_empty() {
            let index = c as usize - '1' as usize;
            state.jump_to_section(index);
            return;
        }
    }

    let Some(action) = state.config.match_key(key) else {
        return;
    };
    // Anything but a section jump clears the transient message.
    state.status_message = None;
    dispatch(state, action);
}

fn dispatch(state: &mut AppState, action: Action) {
    let step = state.config.scroll_step_rows as isize;
    let page = state.viewport_rows.saturating_sub(1).max(1) as isize;
    match action {
        Action::ScrollUp => state.scroll_by(-step),
        Action::ScrollDown => state.scroll_by(step),
        Action::PageUp => state.scroll_by(-page),
        Action::PageDown => state.scroll_by(page),
        Action::Top => state.set_row_offset(0),
        Action::Bottom => state.set_row_offset(usize::MAX),
        Action::PrevSection => {
            let current = state.current_section();
            let at_start = state.page.section_start(current) == Some(state.row_offset);
            // Mid-section goes back to its own heading first.
            let target = if at_start {
                current.saturating_sub(1)
            } else {
                current
            };
            state.jump_to_section(target);
        }
        Action::NextSection => {
            let next = state.current_section() + 1;
            if next < state.page.sections().len() {
                state.jump_to_section(next);
            }
        }
        Action::ToggleAmbient => {
            let enabled = !state.config.ambient;
            state.set_ambient(enabled);
            state.status_message = Some(format!(
                "Ambient motion: {}",
                if enabled { "on" } else { "off" }
            ));
            state.save_config();
        }
        Action::ToggleHud => {
            state.config.hud = !state.config.hud;
            state.save_config();
        }
        Action::OpenSettings => {
            state.active_view = ActiveView::SettingsMenu;
            state.settings_selected = 0;
        }
        Action::Quit => state.should_quit = true,
    }
}

// ── Settings menu (hardcoded navigation) ────────────────────────

fn handle_settings_key(state: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => {
            state.active_view = ActiveView::Page;
        }
        KeyCode::Up | KeyCode::Char('k') => {
            state.settings_selected = state.settings_selected.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if state.settings_selected + 1 < SETTINGS_ITEMS.len() {
                state.settings_selected += 1;
            }
        }
        KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') | KeyCode::Char(' ') => {
            if let Some(item) = SETTINGS_ITEMS.get(state.settings_selected) {
                item.activate(state);
            }
        }
        _ => {}
    }
}

// ── Mouse ───────────────────────────────────────────────────────

/// Wheel scrolls the page; a left click on a nav entry jumps to its section.
pub fn handle_mouse(state: &mut AppState, mouse: MouseEvent) {
    if state.active_view != ActiveView::Page {
        return;
    }
    let step = state.config.scroll_step_rows as isize;
    match mouse.kind {
        MouseEventKind::ScrollUp => state.scroll_by(-step),
        MouseEventKind::ScrollDown => state.scroll_by(step),
        MouseEventKind::Down(MouseButton::Left) => {
            let layout = AppLayout::from_area(state.terminal_area);
            if !point_in_rect(layout.nav_area, mouse.column, mouse.row) {
                return;
            }
            let hit = nav_items(&state.page, layout.nav_area)
                .into_iter()
                .find(|(_, rect)| point_in_rect(*rect, mouse.column, mouse.row));
            if let Some((index, _)) = hit {
                state.jump_to_section(index);
            }
        }
        _ => {}
    }
}

fn point_in_rect(area: ratatui::layout::Rect, col: u16, row: u16) -> bool {
    col >= area.x
        && col < area.x.saturating_add(area.width)
        && row >= area.y
        && row < area.y.saturating_add(area.height)
}
