//! Scroll-to-visual-parameter mapper.
//!
//! Owns the spring that smooths the raw scroll offset and turns the smoothed
//! value into per-element frames.  Stepping is explicit: the host calls
//! [`ScrollMapper::step`] once per frame tick with the elapsed time.

use std::sync::Arc;

use super::ambient::{self, AmbientMotion};
use super::element::DecorativeElement;
use super::spring::{Spring, SpringConfig};
use super::visual::{self, VisualState};

/// Deterministic particle anchors as `(left %, top %)`, cycled by index.
pub const PARTICLE_ANCHORS: [(f64, f64); 15] = [
    (62.84, 27.26),
    (21.05, 91.98),
    (20.19, 39.91),
    (33.20, 91.02),
    (16.15, 74.59),
    (40.13, 20.92),
    (97.30, 0.85),
    (62.39, 87.49),
    (65.00, 0.68),
    (35.53, 33.37),
    (24.76, 85.12),
    (2.52, 32.47),
    (73.59, 85.75),
    (98.96, 32.68),
    (9.54, 13.12),
];

pub const DEFAULT_PARTICLES: usize = 15;

/// Everything the rendering surface needs to paint one element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementFrame {
    /// Horizontal offset in px (scroll drift + idle float).
    pub x: f64,
    /// Vertical offset in px (scroll drift + idle float).
    pub y: f64,
    /// Degrees, clockwise.
    pub rotation: f64,
    pub opacity: f64,
    pub scale: f64,
}

impl ElementFrame {
    /// Additive composition of scroll-derived state with idle motion;
    /// entrance progress scales both opacity and size.
    pub fn compose(state: VisualState, idle: AmbientMotion, entrance: ambient::Entrance) -> Self {
        Self {
            x: state.x + idle.dx,
            y: state.y + idle.dy,
            rotation: state.rotation,
            opacity: (state.opacity * entrance.opacity).clamp(0.0, 1.0),
            scale: entrance.scale * idle.scale,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleFrame {
    pub left_pct: f64,
    pub top_pct: f64,
    pub y: f64,
    pub opacity: f64,
    pub scale: f64,
}

#[derive(Debug, Clone)]
pub struct ScrollMapper {
    spring: Spring,
    elements: Arc<[DecorativeElement]>,
    particles: usize,
    ambient: bool,
}

impl ScrollMapper {
    pub fn new(elements: Arc<[DecorativeElement]>, spring: SpringConfig, particles: usize) -> Self {
        Self {
            spring: Spring::new(spring),
            elements,
            particles,
            ambient: true,
        }
    }

    pub fn elements(&self) -> &[DecorativeElement] {
        &self.elements
    }

    pub fn set_ambient(&mut self, enabled: bool) {
        self.ambient = enabled;
    }

    pub fn ambient(&self) -> bool {
        self.ambient
    }

    pub fn set_particles(&mut self, count: usize) {
        self.particles = count;
    }

    pub fn spring_config(&self) -> SpringConfig {
        self.spring.config()
    }

    pub fn set_spring_config(&mut self, config: SpringConfig) {
        self.spring.set_config(config);
    }

    /// Feed a raw scroll offset.  Negative offsets count as 0.
    pub fn set_scroll(&mut self, offset: f64) {
        let offset = if offset > 0.0 { offset } else { 0.0 };
        self.spring.set_target(offset);
    }

    /// Place the smoothed value directly at `offset` (used on mount).
    pub fn jump_to(&mut self, offset: f64) {
        let offset = if offset > 0.0 { offset } else { 0.0 };
        self.spring.snap_to(offset);
    }

    /// Advance the spring.  Returns `false` once it has settled.
    pub fn step(&mut self, dt: f64) -> bool {
        let moved = self.spring.step(dt);
        if moved && self.spring.is_settled() {
            tracing::debug!(at = self.spring.position(), "scroll spring settled");
        }
        moved
    }

    pub fn smoothed(&self) -> f64 {
        self.spring.position()
    }

    /// Spring velocity in px/s.
    pub fn velocity(&self) -> f64 {
        self.spring.velocity()
    }

    pub fn target(&self) -> f64 {
        self.spring.target()
    }

    pub fn is_settled(&self) -> bool {
        self.spring.is_settled()
    }

    /// Scroll-derived state of every element at the current smoothed value.
    pub fn visual_states(&self) -> Vec<VisualState> {
        visual::visual_states(self.smoothed(), &self.elements)
    }

    /// Final per-element frames at `clock` seconds since mount.
    pub fn compose(&self, clock: f64) -> Vec<ElementFrame> {
        let smoothed = self.smoothed();
        self.elements
            .iter()
            .enumerate()
            .map(|(i, el)| {
                let state = visual::visual_state(smoothed, el, i);
                let idle = if self.ambient {
                    ambient::idle(i, clock)
                } else {
                    AmbientMotion::IDENTITY
                };
                ElementFrame::compose(state, idle, ambient::entrance(i, el.priority, clock))
            })
            .collect()
    }

    pub fn particles(&self, clock: f64) -> Vec<ParticleFrame> {
        let smoothed = self.smoothed();
        (0..self.particles)
            .map(|i| {
                let (left_pct, top_pct) = PARTICLE_ANCHORS[i % PARTICLE_ANCHORS.len()];
                let state = visual::particle_state(smoothed, i);
                let idle = if self.ambient {
                    ambient::particle_idle(i, clock)
                } else {
                    AmbientMotion::IDENTITY
                };
                ParticleFrame {
                    left_pct,
                    top_pct,
                    y: state.y + idle.dy,
                    opacity: state.opacity,
                    scale: idle.scale,
                }
            })
            .collect()
    }
}
