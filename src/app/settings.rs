//! Settings menu model (data only).
//!
//! Keeping these definitions outside the input handler lets both the handler
//! and the popup renderer consume the same source of truth.

use super::state::AppState;

/// A single item in the settings menu.
pub enum SettingsItem {
    /// Boolean toggle: reads/writes via accessors on `AppState`.
    Toggle {
        label: &'static str,
        get: fn(&AppState) -> bool,
        set: fn(&mut AppState, bool),
    },
    /// Cycles through a finite set of values.
    Cycle {
        label: &'static str,
        value: fn(&AppState) -> String,
        cycle: fn(&mut AppState),
    },
}

impl SettingsItem {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Toggle { label, .. } | Self::Cycle { label, .. } => label,
        }
    }

    /// Current value as shown in the popup.
    pub fn value(&self, state: &AppState) -> String {
        match self {
            Self::Toggle { get, .. } => (if get(state) { "ON" } else { "OFF" }).to_string(),
            Self::Cycle { value, .. } => value(state),
        }
    }

    /// Toggle or advance the item.
    pub fn activate(&self, state: &mut AppState) {
        match self {
            Self::Toggle { get, set, .. } => {
                let current = get(state);
                set(state, !current);
            }
            Self::Cycle { cycle, .. } => cycle(state),
        }
        state.save_config();
    }
}

/// Next value after `current` in `steps`, wrapping; unknown values restart
/// at the first step.
fn next_step(steps: &[f64], current: f64) -> f64 {
    let idx = steps.iter().position(|&s| s == current);
    match idx {
        Some(i) => steps[(i + 1) % steps.len()],
        None => steps[0],
    }
}

const STIFFNESS_STEPS: &[f64] = &[60.0, 100.0, 170.0, 300.0];
const DAMPING_STEPS: &[f64] = &[10.0, 20.0, 30.0, 40.0, 60.0];

/// All items shown in the settings popup, in display order.
pub static SETTINGS_ITEMS: &[SettingsItem] = &[
    SettingsItem::Toggle {
        label: "Ambient Motion",
        get: |s| s.config.ambient,
        set: |s, v| s.set_ambient(v),
    },
    SettingsItem::Toggle {
        label: "Particles",
        get: |s| s.config.particles,
        set: |s, v| s.set_particles(v),
    },
    SettingsItem::Toggle {
        label: "Scroll HUD",
        get: |s| s.config.hud,
        set: |s, v| s.config.hud = v,
    },
    SettingsItem::Cycle {
        label: "Spring Stiffness",
        value: |s| format!("{}", s.config.motion.stiffness),
        cycle: |s| {
            s.config.motion.stiffness = next_step(STIFFNESS_STEPS, s.config.motion.stiffness);
            s.apply_motion();
            s.status_message = Some(format!("Stiffness: {}", s.config.motion.stiffness));
        },
    },
    SettingsItem::Cycle {
        label: "Spring Damping",
        value: |s| format!("{}", s.config.motion.damping),
        cycle: |s| {
            s.config.motion.damping = next_step(DAMPING_STEPS, s.config.motion.damping);
            s.apply_motion();
            s.status_message = Some(format!("Damping: {}", s.config.motion.damping));
        },
    },
];
