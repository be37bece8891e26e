//! A terminal portfolio page with a scroll-driven, spring-smoothed background
//! of drifting logos.
//!
//! Run the binary to open the page.  Run with `--dump <SCROLL>` to print the
//! settled background state for a scroll offset without touching the
//! terminal.

mod app;
mod config;
mod core;
mod ui;

use std::io::{self, stderr, Stderr};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, widgets::Paragraph, Terminal};
use tokio::sync::mpsc;

use crate::app::{
    assets::{apply_asset_update, spawn_asset_loads, AssetUpdate},
    event::{spawn_event_reader, AppEvent},
    handler,
    state::{ActiveView, AppState},
};
use crate::config::AppConfig;
use crate::core::{
    element::{default_elements, DecorativeElement},
    manifest::load_manifest,
    mapper::ScrollMapper,
    page::Page,
};
use crate::ui::{
    background::BackgroundWidget, layout::AppLayout, nav::NavBar, page::PageWidget, popup,
    spinner::LoadingIndicator, theme::Theme,
};

/// Longest step fed to the animation after a stall (e.g. a suspended
/// terminal), in seconds.
const MAX_FRAME_DT: f64 = 0.1;

// ───────────────────────────────────────── CLI ───────────────

#[derive(Parser, Debug)]
#[command(name = env!("CARGO_PKG_NAME"), about = "Portfolio page with a drifting logo background")]
struct Cli {
    /// Logo manifest (`[logo]` sections).  Defaults to the built-in set.
    #[arg(long)]
    logos: Option<PathBuf>,

    /// Directory holding the built-in logo images.
    #[arg(long, default_value = "logos")]
    assets: PathBuf,

    /// Page file with `# ` section headings.  Defaults to the built-in page.
    #[arg(long)]
    page: Option<PathBuf>,

    /// Animation frame rate (10-120).
    #[arg(long)]
    fps: Option<u32>,

    /// Disable the idle float of logos and particles.
    #[arg(long)]
    no_ambient: bool,

    /// Disable the particle field.
    #[arg(long)]
    no_particles: bool,

    /// Print the settled background for this scroll offset (px) and exit.
    #[arg(long, value_name = "SCROLL")]
    dump: Option<f64>,

    /// Print the effective config file and exit.
    #[arg(long)]
    print_config: bool,

    /// Write logs here instead of stderr.
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(fps) = self.fps {
            config.fps = fps.clamp(10, 120);
        }
        if self.no_ambient {
            config.ambient = false;
        }
        if self.no_particles {
            config.particles = false;
        }
    }

    fn elements(&self) -> Result<Vec<DecorativeElement>> {
        match &self.logos {
            Some(path) => load_manifest(path),
            None => Ok(default_elements(&self.assets)),
        }
    }

    fn page(&self) -> Result<Page> {
        let Some(path) = &self.page else {
            return Ok(Page::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading page {}", path.display()))?;
        Page::parse(&text).with_context(|| format!("parsing page {}", path.display()))
    }
}

fn init_tracing(log_file: Option<&PathBuf>) -> Result<()> {
    match log_file {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("creating log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
                .with_writer(io::stderr) // never pollute stdout
                .init();
        }
    }
    Ok(())
}

// ───────────────────────────────────────── dump mode ────────

/// Settled scroll-driven state of every element at `scroll`, one per line.
fn dump_frame(elements: Vec<DecorativeElement>, config: &AppConfig, scroll: f64) -> String {
    let mut mapper = ScrollMapper::new(Arc::from(elements), config.motion, 0);
    mapper.jump_to(scroll);
    let mut out = format!(
        "# scroll {:.1}px\n{:<16} {:>9} {:>9} {:>9} {:>8}\n",
        mapper.smoothed(),
        "id",
        "x",
        "y",
        "rotation",
        "opacity"
    );
    for (element, state) in mapper.elements().iter().zip(mapper.visual_states()) {
        out.push_str(&format!(
            "{:<16} {:>9.2} {:>9.2} {:>9.2} {:>8.3}\n",
            element.id, state.x, state.y, state.rotation, state.opacity
        ));
    }
    out
}

// ───────────────────────────────────────── terminal ─────────

/// Owns the terminal while the TUI runs; restores it on drop, including
/// when the event loop bails out with an error.
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<Stderr>>,
}

impl TerminalGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode()?;
        let mut stderr_handle = stderr();
        execute!(stderr_handle, EnterAlternateScreen, EnableMouseCapture)?;
        let terminal = Terminal::new(CrosstermBackend::new(stderr()))?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        );
        let _ = self.terminal.show_cursor();
    }
}

fn draw(guard: &mut TerminalGuard, state: &mut AppState) -> Result<()> {
    guard.terminal.draw(|frame| {
        let area = frame.area();
        let layout = AppLayout::from_area(area);
        state.terminal_area = area;
        state.set_viewport_rows(layout.page_area.height as usize);

        frame.render_widget(
            BackgroundWidget {
                elements: &state.elements,
                frame: &state.frame,
                assets: &state.assets,
                px_per_col: state.config.px_per_col,
                px_per_row: state.config.px_per_row,
            },
            area,
        );
        frame.render_widget(
            NavBar {
                page: &state.page,
                active: state.current_section(),
                scrolled: state.nav_scrolled(),
            },
            layout.nav_area,
        );
        frame.render_widget(
            PageWidget {
                page: &state.page,
                offset: state.row_offset,
            },
            layout.page_area,
        );

        let status = if state.config.hud {
            Paragraph::new(hud_text(state)).style(Theme::hud_style())
        } else {
            let hint = state.config.status_bar_hint();
            let text = match state.active_view {
                ActiveView::Page => state.status_message.clone().unwrap_or(hint),
                ActiveView::SettingsMenu => String::new(),
            };
            Paragraph::new(text).style(Theme::status_bar_style())
        };
        frame.render_widget(status, layout.status_area);

        frame.render_widget(
            LoadingIndicator {
                visible: state.loading_assets(),
                tick: state.tick,
            },
            layout.page_area,
        );

        if state.active_view == ActiveView::SettingsMenu {
            frame.render_widget(
                popup::SettingsPopup {
                    state: &*state,
                    selected: state.settings_selected,
                },
                area,
            );
        }
    })?;
    Ok(())
}

/// Scroll diagnostics shown in the status bar while the HUD is on.
fn hud_text(state: &AppState) -> String {
    let title = state
        .page
        .sections()
        .get(state.current_section())
        .map(|s| s.title.as_str())
        .unwrap_or("");
    let mapper = state.background.mapper();
    let spring = mapper.spring_config();
    format!(
        " scroll {:.0}px | smoothed {:.1}px @ {:.0}px/s | {} | k={} c={}{} | row {}/{} | {}",
        state.frame.raw_scroll,
        state.frame.smoothed,
        state.frame.velocity,
        if state.frame.settled { "settled" } else { "moving" },
        spring.stiffness,
        spring.damping,
        if mapper.ambient() { "" } else { " | still" },
        state.row_offset,
        state.page.total_rows(),
        title,
    )
}

async fn run(
    guard: &mut TerminalGuard,
    state: &mut AppState,
    mut assets_rx: mpsc::UnboundedReceiver<AssetUpdate>,
) -> Result<()> {
    let mut events = spawn_event_reader(state.config.tick_rate());

    // First frame so logos start their entrance from the mounted state.
    state.advance(0.0);

    loop {
        draw(guard, state)?;

        tokio::select! {
            biased;

            Some(event) = events.recv() => {
                match event {
                    AppEvent::Key(k) => handler::handle_key(state, k),
                    AppEvent::Mouse(m) => handler::handle_mouse(state, m),
                    AppEvent::Resize(_, _) => {}
                    AppEvent::Tick(dt) => state.advance(dt.as_secs_f64().min(MAX_FRAME_DT)),
                }
            }

            Some(update) = assets_rx.recv() => {
                apply_asset_update(&mut state.assets, update);
                // Drain everything already decoded before redrawing.
                while let Ok(update) = assets_rx.try_recv() {
                    apply_asset_update(&mut state.assets, update);
                }
            }

            else => break,
        }

        if state.should_quit {
            break;
        }
    }
    Ok(())
}

// ───────────────────────────────────────── main ─────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_file.as_ref())?;

    let mut config = AppConfig::load();
    cli.apply_overrides(&mut config);

    if cli.print_config {
        print!("{}", config.serialise());
        return Ok(());
    }

    let elements = cli.elements()?;
    if let Some(scroll) = cli.dump {
        print!("{}", dump_frame(elements, &config, scroll));
        return Ok(());
    }
    let page = cli.page()?;
    tracing::info!(
        logos = elements.len(),
        sections = page.sections().len(),
        fps = config.fps,
        "starting"
    );

    let mut state = AppState::new(config, page, elements);
    let (assets_tx, assets_rx) = mpsc::unbounded_channel();
    spawn_asset_loads(assets_tx, &state.elements);

    let mut guard = TerminalGuard::enter()?;
    let result = run(&mut guard, &mut state, assets_rx).await;

    state.background.unmount();
    drop(guard);
    tracing::debug!(
        mounted = state.background.is_mounted(),
        listeners = state.feed.listener_count(),
        uptime = state.background.clock(),
        "background released"
    );
    result
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    #[test]
    fn cli_overrides_config() {
        let cli = Cli::parse_from(["logo-drift", "--fps", "500", "--no-ambient"]);
        let mut config = AppConfig::default();
        cli.apply_overrides(&mut config);
        assert_eq!(config.fps, 120);
        assert!(!config.ambient);
        assert!(config.particles);
        assert_eq!(cli.assets, PathBuf::from("logos"));
    }

    #[test]
    fn hud_reports_spring_and_scroll() {
        let mut state = AppState::new(
            AppConfig::default(),
            Page::default(),
            default_elements(Path::new("logos")),
        );
        state.set_viewport_rows(20);
        state.advance(0.0);
        let idle = hud_text(&state);
        assert!(idle.contains("scroll 0px"));
        assert!(idle.contains("settled"));
        assert!(idle.contains("k=100 c=30"));
        assert!(idle.ends_with("| Home"));

        state.jump_to_section(1);
        state.set_ambient(false);
        state.advance(1.0 / 30.0);
        let moving = hud_text(&state);
        assert!(moving.contains("moving"));
        assert!(moving.contains(" | still"));
        assert!(moving.ends_with("| About"));
    }

    #[test]
    fn dump_lists_every_element() {
        let elements = default_elements(Path::new("logos"));
        let out = dump_frame(elements, &AppConfig::default(), 1000.0);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "# scroll 1000.0px");
        assert_eq!(lines.len(), 2 + 9);
        assert!(lines[2].starts_with("google-cloud"));
        // Priority logo 0 at 1000px: y = -(50 + (150 - 50) * 0.5) = -100.
        assert!(lines[2].contains("-100.00"));
    }
}
