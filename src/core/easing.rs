//! Cubic-bezier easing curves.

/// A CSS-style `cubic-bezier(x1, y1, x2, y2)` timing function.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

/// `easeInOut` used by the idle loops.
pub const EASE_IN_OUT: CubicBezier = CubicBezier::new(0.42, 0.0, 0.58, 1.0);

/// Entrance curve for logos fading in on mount.
pub const ENTRANCE: CubicBezier = CubicBezier::new(0.25, 0.46, 0.45, 0.94);

const NEWTON_ITERATIONS: usize = 8;
const NEWTON_MIN_SLOPE: f64 = 1e-3;
const EPSILON: f64 = 1e-7;

impl CubicBezier {
    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Eased value for linear progress `t` (clamped to `[0, 1]`).
    pub fn ease(&self, t: f64) -> f64 {
        if t.is_nan() || t <= 0.0 {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }
        if self.x1 == self.y1 && self.x2 == self.y2 {
            return t;
        }
        let u = self.solve_u_for_x(t);
        bezier(u, self.y1, self.y2)
    }

    fn solve_u_for_x(&self, x: f64) -> f64 {
        // Newton first; it converges in a handful of steps for sane curves.
        let mut u = x;
        for _ in 0..NEWTON_ITERATIONS {
            let err = bezier(u, self.x1, self.x2) - x;
            if err.abs() < EPSILON {
                return u.clamp(0.0, 1.0);
            }
            let slope = bezier_slope(u, self.x1, self.x2);
            if slope.abs() < NEWTON_MIN_SLOPE {
                break;
            }
            u -= err / slope;
        }

        // Bisection fallback for flat regions.
        let (mut lo, mut hi) = (0.0, 1.0);
        u = x;
        while hi - lo > EPSILON {
            let v = bezier(u, self.x1, self.x2);
            if (v - x).abs() < EPSILON {
                break;
            }
            if v < x {
                lo = u;
            } else {
                hi = u;
            }
            u = (lo + hi) * 0.5;
        }
        u.clamp(0.0, 1.0)
    }
}

/// One coordinate of a bezier with end points 0 and 1.
fn bezier(u: f64, p1: f64, p2: f64) -> f64 {
    let inv = 1.0 - u;
    3.0 * inv * inv * u * p1 + 3.0 * inv * u * u * p2 + u * u * u
}

fn bezier_slope(u: f64, p1: f64, p2: f64) -> f64 {
    let inv = 1.0 - u;
    3.0 * inv * inv * p1 + 6.0 * inv * u * (p2 - p1) + 3.0 * u * u * (1.0 - p2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_are_fixed() {
        for curve in [EASE_IN_OUT, ENTRANCE] {
            assert_eq!(curve.ease(0.0), 0.0);
            assert_eq!(curve.ease(1.0), 1.0);
            assert_eq!(curve.ease(-3.0), 0.0);
            assert_eq!(curve.ease(4.0), 1.0);
        }
    }

    #[test]
    fn ease_in_out_is_symmetric() {
        for i in 1..10 {
            let t = i as f64 / 10.0;
            let a = EASE_IN_OUT.ease(t);
            let b = EASE_IN_OUT.ease(1.0 - t);
            assert!((a + b - 1.0).abs() < 1e-5, "t={t} a={a} b={b}");
        }
        assert!((EASE_IN_OUT.ease(0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn curves_are_monotonic() {
        for curve in [EASE_IN_OUT, ENTRANCE] {
            let mut prev = 0.0;
            for i in 1..=100 {
                let v = curve.ease(i as f64 / 100.0);
                assert!(v >= prev - 1e-9);
                prev = v;
            }
        }
    }

    #[test]
    fn entrance_front_loads_motion() {
        // Ease-out flavoured: ahead of linear progress in the first half.
        assert!(ENTRANCE.ease(0.3) > 0.3);
    }

    #[test]
    fn linear_curve_is_identity() {
        let linear = CubicBezier::new(0.3, 0.3, 0.7, 0.7);
        assert_eq!(linear.ease(0.42), 0.42);
    }
}
