//! Piecewise-linear keyframe interpolation.
//!
//! Between two control points the output is linearly interpolated.  Inputs
//! before the first or past the last control point clamp to the end outputs;
//! there is no extrapolation.

/// Linear interpolation between `a` and `b` (`t = 0` → `a`, `t = 1` → `b`).
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Inverse of [`lerp`]: where `x` sits between `a` and `b`, unclamped.
pub fn progress(a: f64, b: f64, x: f64) -> f64 {
    let span = b - a;
    if span == 0.0 {
        1.0
    } else {
        (x - a) / span
    }
}

/// A fixed set of `(input, output)` control points.
///
/// `inputs` must be strictly increasing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keyframes<const N: usize> {
    inputs: [f64; N],
    outputs: [f64; N],
}

impl<const N: usize> Keyframes<N> {
    pub const fn new(inputs: [f64; N], outputs: [f64; N]) -> Self {
        Self { inputs, outputs }
    }

    /// Output at `x`.  NaN is treated like an input before the first point.
    pub fn sample(&self, x: f64) -> f64 {
        if N == 0 {
            return 0.0;
        }
        if x.is_nan() || x <= self.inputs[0] {
            return self.outputs[0];
        }
        if x >= self.inputs[N - 1] {
            return self.outputs[N - 1];
        }

        // x is strictly inside the range, so some segment end exceeds it.
        let seg = self
            .inputs
            .windows(2)
            .position(|w| x < w[1])
            .unwrap_or(N.saturating_sub(2));
        let t = progress(self.inputs[seg], self.inputs[seg + 1], x);
        lerp(self.outputs[seg], self.outputs[seg + 1], t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_outside_range() {
        let k = Keyframes::new([0.0, 500.0, 1500.0], [0.0, -50.0, -150.0]);
        assert_eq!(k.sample(-10.0), 0.0);
        assert_eq!(k.sample(1500.0), -150.0);
        assert_eq!(k.sample(99_999.0), -150.0);
        assert_eq!(k.sample(f64::NAN), 0.0);
    }

    #[test]
    fn interpolates_within_segments() {
        let k = Keyframes::new([0.0, 500.0, 1500.0], [0.0, -50.0, -150.0]);
        assert!((k.sample(250.0) + 25.0).abs() < 1e-12);
        assert!((k.sample(500.0) + 50.0).abs() < 1e-12);
        assert!((k.sample(1000.0) + 100.0).abs() < 1e-12);
    }

    #[test]
    fn non_monotonic_outputs() {
        let k = Keyframes::new([0.0, 300.0, 600.0, 1000.0], [0.6, 0.7, 0.5, 0.3]);
        assert!((k.sample(150.0) - 0.65).abs() < 1e-12);
        assert!((k.sample(450.0) - 0.6).abs() < 1e-12);
        assert!((k.sample(800.0) - 0.4).abs() < 1e-12);
    }

    #[test]
    fn single_point_is_constant() {
        let k = Keyframes::new([10.0], [3.0]);
        assert_eq!(k.sample(0.0), 3.0);
        assert_eq!(k.sample(20.0), 3.0);
    }

    #[test]
    fn progress_of_empty_span() {
        assert_eq!(progress(5.0, 5.0, 7.0), 1.0);
        assert_eq!(progress(0.0, 10.0, 2.5), 0.25);
    }
}
