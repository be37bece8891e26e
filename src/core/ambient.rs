//! Time-driven motion that runs independently of scroll: the idle float of
//! each element, the entrance fade-in, and the particle bob.
//!
//! All functions take the layer clock (seconds since mount) and are pure.

use super::easing::{CubicBezier, EASE_IN_OUT, ENTRANCE};
use super::interpolate::lerp;

/// A three-keyframe loop `[from, peak, from]` eased per half-cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Oscillation {
    pub rest: f64,
    pub peak: f64,
    /// Seconds per full cycle.
    pub period: f64,
    /// Seconds before the first cycle starts.
    pub delay: f64,
    pub easing: CubicBezier,
}

impl Oscillation {
    pub fn sample(&self, clock: f64) -> f64 {
        let t = clock - self.delay;
        if !(t > 0.0) || !(self.period > 0.0) {
            return self.rest;
        }
        let phase = (t % self.period) / self.period;
        if phase < 0.5 {
            lerp(self.rest, self.peak, self.easing.ease(phase * 2.0))
        } else {
            lerp(self.peak, self.rest, self.easing.ease((phase - 0.5) * 2.0))
        }
    }
}

/// Idle offsets for one element; composed on top of the scroll drift.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientMotion {
    pub dx: f64,
    pub dy: f64,
    pub scale: f64,
}

impl AmbientMotion {
    pub const IDENTITY: Self = Self {
        dx: 0.0,
        dy: 0.0,
        scale: 1.0,
    };
}

pub fn idle_x(index: usize) -> Oscillation {
    let i = index as f64;
    Oscillation {
        rest: 0.0,
        peak: 8.0,
        period: 4.0 + 0.6 * i,
        delay: 0.3 * i,
        easing: EASE_IN_OUT,
    }
}

pub fn idle_y(index: usize) -> Oscillation {
    let i = index as f64;
    Oscillation {
        rest: 0.0,
        peak: -15.0,
        period: 6.0 + 0.8 * i,
        delay: 0.5 * i,
        easing: EASE_IN_OUT,
    }
}

pub fn idle_scale(index: usize) -> Oscillation {
    let i = index as f64;
    Oscillation {
        rest: 1.0,
        peak: 1.05,
        period: 8.0 + 0.7 * i,
        delay: 0.2 * i,
        easing: EASE_IN_OUT,
    }
}

pub fn idle(index: usize, clock: f64) -> AmbientMotion {
    AmbientMotion {
        dx: idle_x(index).sample(clock),
        dy: idle_y(index).sample(clock),
        scale: idle_scale(index).sample(clock),
    }
}

/// Entrance progress: both opacity and scale run 0 → 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Entrance {
    pub opacity: f64,
    pub scale: f64,
}

/// `(delay, duration)` of the entrance for element `index`.
pub fn entrance_timing(index: usize, priority: bool) -> (f64, f64) {
    let i = index as f64;
    if priority {
        (0.1 * i, 1.5)
    } else {
        (0.2 * i + 0.5, 2.5)
    }
}

pub fn entrance(index: usize, priority: bool, clock: f64) -> Entrance {
    let (delay, duration) = entrance_timing(index, priority);
    let t = ((clock - delay) / duration).clamp(0.0, 1.0);
    let v = ENTRANCE.ease(t);
    Entrance {
        opacity: v,
        scale: v,
    }
}

/// Particle bob: vertical px offset and scale.
pub fn particle_idle(index: usize, clock: f64) -> AmbientMotion {
    let period = 12.0 + (index % 6) as f64;
    let delay = index as f64;
    let dy = Oscillation {
        rest: 0.0,
        peak: -30.0,
        period,
        delay,
        easing: EASE_IN_OUT,
    };
    let scale = Oscillation {
        rest: 1.0,
        peak: 1.2,
        period,
        delay,
        easing: EASE_IN_OUT,
    };
    AmbientMotion {
        dx: 0.0,
        dy: dy.sample(clock),
        scale: scale.sample(clock),
    }
}
