//! Scroll → visual parameter curves.
//!
//! Everything here is a pure function of the smoothed scroll offset, the
//! element descriptor and the element's index.  No state is kept between
//! calls and elements never influence each other.

use super::element::DecorativeElement;
use super::interpolate::Keyframes;

/// Scroll-derived parameters for one element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisualState {
    /// Horizontal drift in px.
    pub x: f64,
    /// Vertical drift in px (negative = up).
    pub y: f64,
    /// Absolute rotation in degrees.
    pub rotation: f64,
    pub opacity: f64,
}

const PRIORITY_OPACITY: [f64; 4] = [0.6, 0.7, 0.5, 0.3];
const SECONDARY_OPACITY: [f64; 4] = [0.3, 0.4, 0.25, 0.2];

/// +1 for even indices, −1 for odd.
fn alternating(index: usize) -> f64 {
    if index % 2 == 0 {
        1.0
    } else {
        -1.0
    }
}

pub fn vertical_curve(index: usize) -> Keyframes<3> {
    let i = index as f64;
    Keyframes::new(
        [0.0, 500.0, 1500.0],
        [0.0, -(50.0 + 10.0 * i), -(150.0 + 25.0 * i)],
    )
}

pub fn horizontal_curve(index: usize) -> Keyframes<3> {
    let sign = alternating(index);
    Keyframes::new([0.0, 800.0, 1600.0], [0.0, 10.0 * sign, 25.0 * sign])
}

pub fn rotation_curve(base: f64, index: usize) -> Keyframes<3> {
    let sign = alternating(index);
    Keyframes::new(
        [0.0, 1000.0, 2000.0],
        [base, base + 5.0 * sign, base + 15.0 * sign],
    )
}

pub fn opacity_curve(priority: bool) -> Keyframes<4> {
    let outputs = if priority {
        PRIORITY_OPACITY
    } else {
        SECONDARY_OPACITY
    };
    Keyframes::new([0.0, 300.0, 600.0, 1000.0], outputs)
}

/// Visual parameters of `element` (at position `index`) for a smoothed
/// scroll offset.
pub fn visual_state(smoothed: f64, element: &DecorativeElement, index: usize) -> VisualState {
    VisualState {
        x: horizontal_curve(index).sample(smoothed),
        y: vertical_curve(index).sample(smoothed),
        rotation: rotation_curve(element.rotation, index).sample(smoothed),
        opacity: opacity_curve(element.priority).sample(smoothed),
    }
}

/// [`visual_state`] for every element, in order.
pub fn visual_states(smoothed: f64, elements: &[DecorativeElement]) -> Vec<VisualState> {
    elements
        .iter()
        .enumerate()
        .map(|(i, el)| visual_state(smoothed, el, i))
        .collect()
}

/// Scroll-derived drift and opacity of a floating particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleState {
    pub y: f64,
    pub opacity: f64,
}

pub fn particle_state(smoothed: f64, index: usize) -> ParticleState {
    let y = Keyframes::new([0.0, 1000.0], [0.0, -150.0 - 5.0 * index as f64]);
    let opacity = Keyframes::new([0.0, 200.0, 800.0], [0.3, 0.5, 0.2]);
    ParticleState {
        y: y.sample(smoothed),
        opacity: opacity.sample(smoothed),
    }
}
