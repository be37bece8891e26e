//! User configuration: motion tuning, display options, keybindings and
//! persistence.
//!
//! Settings are stored as a simple key-value text file at
//! `$XDG_CONFIG_HOME/logo-drift/config.toml` (default
//! `~/.config/logo-drift/config.toml`).

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::core::spring::SpringConfig;

// ───────────────────────────────────────── actions ───────────

/// All configurable user actions on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
    Top,
    Bottom,
    PrevSection,
    NextSection,
    ToggleAmbient,
    ToggleHud,
    OpenSettings,
    Quit,
}

impl Action {
    /// Ordered list of all actions (used for the config file).
    pub const ALL: &[Action] = &[
        Action::ScrollUp,
        Action::ScrollDown,
        Action::PageUp,
        Action::PageDown,
        Action::Top,
        Action::Bottom,
        Action::PrevSection,
        Action::NextSection,
        Action::ToggleAmbient,
        Action::ToggleHud,
        Action::OpenSettings,
        Action::Quit,
    ];

    /// Key used in the config file.
    fn config_key(self) -> &'static str {
        match self {
            Action::ScrollUp => "scroll_up",
            Action::ScrollDown => "scroll_down",
            Action::PageUp => "page_up",
            Action::PageDown => "page_down",
            Action::Top => "top",
            Action::Bottom => "bottom",
            Action::PrevSection => "prev_section",
            Action::NextSection => "next_section",
            Action::ToggleAmbient => "toggle_ambient",
            Action::ToggleHud => "toggle_hud",
            Action::OpenSettings => "open_settings",
            Action::Quit => "quit",
        }
    }

    fn from_config_key(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|a| a.config_key() == s)
    }
}

// ───────────────────────────────────────── key bind ──────────

/// A single key binding: key code + modifier combination.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyBind {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

const MODIFIER_MASK: KeyModifiers = KeyModifiers::CONTROL
    .union(KeyModifiers::ALT)
    .union(KeyModifiers::SHIFT);

impl KeyBind {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    /// Only CTRL/ALT/SHIFT are compared; SUPER and friends are ignored.
    pub fn matches(&self, event: KeyEvent) -> bool {
        self.code == event.code
            && (self.modifiers & MODIFIER_MASK) == (event.modifiers & MODIFIER_MASK)
    }

    /// Short form for the status bar (e.g. `"Alt+↑"`, `"q"`).
    pub fn display(&self) -> String {
        self.render(true)
    }

    /// Config-file form (e.g. `"Alt+Up"`, `"q"`).
    fn to_config_string(&self) -> String {
        self.render(false)
    }

    fn render(&self, pretty: bool) -> String {
        let mut s = String::new();
        for (flag, prefix) in [
            (KeyModifiers::CONTROL, "Ctrl+"),
            (KeyModifiers::ALT, "Alt+"),
            (KeyModifiers::SHIFT, "Shift+"),
        ] {
            if self.modifiers.contains(flag) {
                s.push_str(prefix);
            }
        }
        let name = match (self.code, pretty) {
            (KeyCode::Char(' '), _) => "Space".to_string(),
            (KeyCode::Char(c), _) => c.to_string(),
            (KeyCode::Up, true) => "↑".into(),
            (KeyCode::Down, true) => "↓".into(),
            (KeyCode::Left, true) => "←".into(),
            (KeyCode::Right, true) => "→".into(),
            (KeyCode::PageUp, true) => "PgUp".into(),
            (KeyCode::PageDown, true) => "PgDn".into(),
            (KeyCode::Up, false) => "Up".into(),
            (KeyCode::Down, false) => "Down".into(),
            (KeyCode::Left, false) => "Left".into(),
            (KeyCode::Right, false) => "Right".into(),
            (KeyCode::PageUp, false) => "PageUp".into(),
            (KeyCode::PageDown, false) => "PageDown".into(),
            (KeyCode::Enter, _) => "Enter".into(),
            (KeyCode::Esc, _) => "Esc".into(),
            (KeyCode::Tab, _) => "Tab".into(),
            (KeyCode::BackTab, _) => "BackTab".into(),
            (KeyCode::Home, _) => "Home".into(),
            (KeyCode::End, _) => "End".into(),
            (KeyCode::F(n), _) => format!("F{n}"),
            (other, _) => format!("{other:?}"),
        };
        s.push_str(&name);
        s
    }

    /// Parse a key string like `"Ctrl+c"`, `"Alt+Up"`, `"q"`, `"PageDown"`.
    fn parse(s: &str) -> Option<Self> {
        let mut modifiers = KeyModifiers::NONE;
        let parts: Vec<&str> = s.split('+').collect();
        let (key_part, mods) = parts.split_last()?;

        for part in mods {
            match part.to_lowercase().as_str() {
                "ctrl" => modifiers |= KeyModifiers::CONTROL,
                "alt" => modifiers |= KeyModifiers::ALT,
                "shift" => modifiers |= KeyModifiers::SHIFT,
                _ => return None,
            }
        }

        let code = match key_part.to_lowercase().as_str() {
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "enter" | "return" => KeyCode::Enter,
            "esc" | "escape" => KeyCode::Esc,
            "tab" => KeyCode::Tab,
            "backtab" => KeyCode::BackTab,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "pageup" | "pgup" => KeyCode::PageUp,
            "pagedown" | "pgdn" => KeyCode::PageDown,
            "space" => KeyCode::Char(' '),
            k if k.starts_with('f') && k.len() > 1 => KeyCode::F(k[1..].parse().ok()?),
            // Single characters keep their case ("G" differs from "g").
            _ if key_part.chars().count() == 1 => KeyCode::Char(key_part.chars().next()?),
            _ => return None,
        };

        Some(KeyBind { code, modifiers })
    }
}

// ───────────────────────────────────────── config ────────────

/// Smallest accepted spring damping.
const MIN_DAMPING: f64 = 1.0;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bindings: HashMap<Action, Vec<KeyBind>>,
    /// Scroll smoothing spring.
    pub motion: SpringConfig,
    /// Animation frame rate.
    pub fps: u32,
    /// Device pixels per terminal column when placing logos.
    pub px_per_col: f64,
    /// Device pixels per terminal row when placing logos.
    pub px_per_row: f64,
    /// Scroll distance (device px) represented by one page row.
    pub scroll_px_per_row: f64,
    /// Rows moved per wheel notch / arrow key.
    pub scroll_step_rows: usize,
    /// Idle float of logos and particles.
    pub ambient: bool,
    pub particles: bool,
    /// Show scroll diagnostics in the status bar.
    pub hud: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bindings: Self::default_bindings(),
            motion: SpringConfig::default(),
            fps: 30,
            px_per_col: 12.0,
            px_per_row: 24.0,
            scroll_px_per_row: 48.0,
            scroll_step_rows: 3,
            ambient: true,
            particles: true,
            hud: false,
        }
    }
}

impl AppConfig {
    pub fn default_bindings() -> HashMap<Action, Vec<KeyBind>> {
        use Action::*;
        use KeyCode::*;
        let n = KeyModifiers::NONE;
        let shift = KeyModifiers::SHIFT;
        let mut m = HashMap::new();

        m.insert(ScrollUp, vec![KeyBind::new(Up, n), KeyBind::new(Char('k'), n)]);
        m.insert(ScrollDown, vec![KeyBind::new(Down, n), KeyBind::new(Char('j'), n)]);
        m.insert(
            Action::PageUp,
            vec![KeyBind::new(KeyCode::PageUp, n), KeyBind::new(Char('b'), n)],
        );
        m.insert(
            Action::PageDown,
            vec![KeyBind::new(KeyCode::PageDown, n), KeyBind::new(Char(' '), n)],
        );
        m.insert(Top, vec![KeyBind::new(Home, n), KeyBind::new(Char('g'), n)]);
        m.insert(Bottom, vec![KeyBind::new(End, n), KeyBind::new(Char('G'), shift)]);
        m.insert(PrevSection, vec![KeyBind::new(BackTab, shift), KeyBind::new(Char('['), n)]);
        m.insert(NextSection, vec![KeyBind::new(Tab, n), KeyBind::new(Char(']'), n)]);
        m.insert(ToggleAmbient, vec![KeyBind::new(Char('a'), n)]);
        m.insert(ToggleHud, vec![KeyBind::new(Char('d'), n)]);
        m.insert(OpenSettings, vec![KeyBind::new(Char('?'), n)]);
        m.insert(Quit, vec![KeyBind::new(Char('q'), n), KeyBind::new(Esc, n)]);

        m
    }

    /// Find the action that matches a key event.  The binding with the most
    /// modifiers wins.
    pub fn match_key(&self, event: KeyEvent) -> Option<Action> {
        self.bindings
            .iter()
            .flat_map(|(&action, binds)| binds.iter().map(move |b| (action, b)))
            .filter(|(_, b)| b.matches(event))
            .max_by_key(|(_, b)| b.modifiers.bits().count_ones())
            .map(|(action, _)| action)
    }

    /// Short display of the first binding only (for the status bar).
    fn short_binding(&self, action: Action) -> String {
        match self.bindings.get(&action) {
            Some(binds) if !binds.is_empty() => binds[0].display(),
            _ => "?".into(),
        }
    }

    /// Build the status-bar hint string from current bindings.
    pub fn status_bar_hint(&self) -> String {
        format!(
            "{}/{}: scroll | 1-9: jump | {}: ambient | {}: settings | {}: quit",
            self.short_binding(Action::ScrollUp),
            self.short_binding(Action::ScrollDown),
            self.short_binding(Action::ToggleAmbient),
            self.short_binding(Action::OpenSettings),
            self.short_binding(Action::Quit),
        )
    }

    /// Frame interval derived from `fps`.
    pub fn tick_rate(&self) -> std::time::Duration {
        std::time::Duration::from_secs_f64(1.0 / self.fps.max(1) as f64)
    }

    // ── persistence ─────────────────────────────────────────────

    /// Load config from disk, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&config_path())
    }

    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::parse_config(&contents),
            Err(e) => {
                if path.exists() {
                    tracing::warn!(path = %path.display(), error = %e, "unreadable config, using defaults");
                }
                Self::default()
            }
        }
    }

    /// Persist current config to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.serialise())?;
        Ok(())
    }

    fn parse_config(s: &str) -> Self {
        let mut config = Self::default();

        for line in s.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('[') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim();
            let number = value.parse::<f64>().ok().filter(|v| v.is_finite());
            let flag = value == "true";

            // Values are clamped to keep the spring stable and the layout sane.
            match (key, number) {
                ("stiffness", Some(v)) => config.motion.stiffness = v.clamp(1.0, 2000.0),
                // Zero damping would oscillate forever and never settle.
                ("damping", Some(v)) => config.motion.damping = v.clamp(MIN_DAMPING, 500.0),
                ("mass", Some(v)) => config.motion.mass = v.clamp(0.05, 50.0),
                ("rest_delta", Some(v)) => config.motion.rest_delta = v.clamp(1e-6, 10.0),
                ("rest_speed", Some(v)) => config.motion.rest_speed = v.clamp(1e-6, 100.0),
                ("fps", Some(v)) => config.fps = (v as u32).clamp(10, 120),
                ("px_per_col", Some(v)) => config.px_per_col = v.clamp(1.0, 64.0),
                ("px_per_row", Some(v)) => config.px_per_row = v.clamp(1.0, 128.0),
                ("scroll_px_per_row", Some(v)) => config.scroll_px_per_row = v.clamp(1.0, 500.0),
                ("scroll_step_rows", Some(v)) => config.scroll_step_rows = (v as usize).clamp(1, 50),
                ("ambient", _) => config.ambient = flag,
                ("particles", _) => config.particles = flag,
                ("hud", _) => config.hud = flag,
                _ => {
                    let Some(action) = Action::from_config_key(key) else {
                        continue;
                    };
                    let parsed: Vec<KeyBind> = value
                        .split(',')
                        .filter_map(|part| KeyBind::parse(part.trim().trim_matches('"')))
                        .collect();
                    if !parsed.is_empty() {
                        config.bindings.insert(action, parsed);
                    }
                }
            }
        }

        config
    }

    pub fn serialise(&self) -> String {
        let mut lines = vec![
            "# logo-drift configuration".to_string(),
            String::new(),
            "# Scroll smoothing spring".to_string(),
            format!("stiffness = {}", self.motion.stiffness),
            format!("damping = {}", self.motion.damping),
            format!("mass = {}", self.motion.mass),
            format!("rest_delta = {}", self.motion.rest_delta),
            format!("rest_speed = {}", self.motion.rest_speed),
            String::new(),
            "# Display".to_string(),
            format!("fps = {}", self.fps),
            format!("px_per_col = {}", self.px_per_col),
            format!("px_per_row = {}", self.px_per_row),
            format!("scroll_px_per_row = {}", self.scroll_px_per_row),
            format!("scroll_step_rows = {}", self.scroll_step_rows),
            format!("ambient = {}", self.ambient),
            format!("particles = {}", self.particles),
            format!("hud = {}", self.hud),
            String::new(),
            "# Key bindings".to_string(),
            "# Format: action = Key1, Key2, ...".to_string(),
            "# Modifiers: Ctrl+, Alt+, Shift+ (prefix)".to_string(),
            "# Special keys: Up, Down, Left, Right, Enter, Esc, Tab, BackTab,".to_string(),
            "#   Home, End, PageUp, PageDown, Space, F1-F12".to_string(),
            String::new(),
        ];

        for &action in Action::ALL {
            if let Some(binds) = self.bindings.get(&action) {
                let keys: Vec<String> = binds.iter().map(|b| b.to_config_string()).collect();
                lines.push(format!("{} = {}", action.config_key(), keys.join(", ")));
            }
        }
        lines.push(String::new());
        lines.join("\n")
    }
}

/// Return the config file path (`$XDG_CONFIG_HOME/logo-drift/config.toml`).
pub fn config_path() -> PathBuf {
    let config_dir = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            PathBuf::from(home).join(".config")
        });
    config_dir.join("logo-drift").join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn serialise_then_parse_keeps_settings() {
        let mut config = AppConfig::default();
        config.motion.stiffness = 170.0;
        config.fps = 60;
        config.hud = true;
        config.particles = false;
        config
            .bindings
            .insert(Action::Quit, vec![KeyBind::new(KeyCode::Char('x'), KeyModifiers::CONTROL)]);

        let parsed = AppConfig::parse_config(&config.serialise());
        assert_eq!(parsed.motion, config.motion);
        assert_eq!(parsed.fps, 60);
        assert!(parsed.hud);
        assert!(!parsed.particles);
        assert!(parsed.ambient);
        assert_eq!(parsed.bindings, config.bindings);
    }

    #[test]
    fn every_action_has_a_default_binding() {
        let bindings = AppConfig::default_bindings();
        for action in Action::ALL {
            assert!(
                bindings.get(action).is_some_and(|b| !b.is_empty()),
                "{action:?} unbound"
            );
        }
        assert_eq!(bindings.len(), Action::ALL.len());
        assert_eq!(
            bindings[&Action::PageDown][0],
            KeyBind::new(KeyCode::PageDown, KeyModifiers::NONE)
        );
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let parsed = AppConfig::parse_config("fps = 1000\nstiffness = -5\nscroll_step_rows = 0\n");
        assert_eq!(parsed.fps, 120);
        assert_eq!(parsed.motion.stiffness, 1.0);
        assert_eq!(parsed.scroll_step_rows, 1);
    }

    #[test]
    fn undamped_spring_is_rejected() {
        use crate::core::spring::Spring;

        let parsed = AppConfig::parse_config("damping = 0\n");
        assert_eq!(parsed.motion.damping, MIN_DAMPING);

        let mut spring = Spring::new(parsed.motion);
        spring.set_target(100.0);
        let mut frames = 0;
        while spring.step(1.0 / 60.0) {
            frames += 1;
            assert!(frames < 60 * 120, "spring never settled");
        }
        assert_eq!(spring.position(), 100.0);
    }

    #[test]
    fn garbage_falls_back_to_defaults() {
        let parsed = AppConfig::parse_config("damping = soft\nnonsense\nquit = Hyper+q\n");
        let defaults = AppConfig::default();
        assert_eq!(parsed.motion, defaults.motion);
        assert_eq!(parsed.bindings, defaults.bindings);
    }

    #[test]
    fn match_key_prefers_more_modifiers() {
        let mut config = AppConfig::default();
        config.bindings.insert(
            Action::PageDown,
            vec![KeyBind::new(KeyCode::Char('j'), KeyModifiers::CONTROL)],
        );
        assert_eq!(
            config.match_key(key(KeyCode::Char('j'), KeyModifiers::NONE)),
            Some(Action::ScrollDown)
        );
        assert_eq!(
            config.match_key(key(KeyCode::Char('j'), KeyModifiers::CONTROL)),
            Some(Action::PageDown)
        );
        assert_eq!(config.match_key(key(KeyCode::Char('z'), KeyModifiers::NONE)), None);
    }

    #[test]
    fn keybind_parse_forms() {
        assert_eq!(
            KeyBind::parse("Alt+Up"),
            Some(KeyBind::new(KeyCode::Up, KeyModifiers::ALT))
        );
        assert_eq!(
            KeyBind::parse("Shift+G"),
            Some(KeyBind::new(KeyCode::Char('G'), KeyModifiers::SHIFT))
        );
        assert_eq!(KeyBind::parse("F5"), Some(KeyBind::new(KeyCode::F(5), KeyModifiers::NONE)));
        assert_eq!(KeyBind::parse("Meta+q"), None);
        assert_eq!(KeyBind::parse("nope"), None);
        assert_eq!(KeyBind::new(KeyCode::Up, KeyModifiers::ALT).display(), "Alt+↑");
    }

    #[test]
    fn save_and_load_from_disk() {
        let dir = std::env::temp_dir().join(format!("logo-drift-test-{}", std::process::id()));
        let path = dir.join("config.toml");
        let mut config = AppConfig::default();
        config.ambient = false;
        config.save_to(&path).unwrap();
        let loaded = AppConfig::load_from(&path);
        assert!(!loaded.ambient);
        let _ = std::fs::remove_dir_all(&dir);

        let missing = AppConfig::load_from(&dir.join("absent.toml"));
        assert!(missing.ambient);
    }
}
