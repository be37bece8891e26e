//! Damped spring that smooths a jittery scalar signal.
//!
//! The host retargets the spring whenever the raw value changes and steps it
//! once per frame.  Each step solves the damped harmonic oscillator in closed
//! form for the elapsed time, so long or uneven frames neither blow up nor
//! change the trajectory.  Once the spring is within `rest_delta` of its
//! target and slower than `rest_speed` it snaps to the target and stops
//! producing updates.

/// Plain configuration values for a [`Spring`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringConfig {
    pub stiffness: f64,
    pub damping: f64,
    pub mass: f64,
    /// Distance from the target below which the spring may settle.
    pub rest_delta: f64,
    /// Speed (units/s) below which the spring may settle.
    pub rest_speed: f64,
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            stiffness: 100.0,
            damping: 30.0,
            mass: 1.0,
            rest_delta: 0.001,
            rest_speed: 0.01,
        }
    }
}

impl SpringConfig {
    /// Damping ratio ζ: `< 1` oscillates, `1` is critical, `> 1` creeps.
    pub fn damping_ratio(&self) -> f64 {
        self.damping / (2.0 * (self.stiffness * self.mass).sqrt())
    }

    /// Undamped angular frequency ω₀.
    pub fn natural_frequency(&self) -> f64 {
        (self.stiffness / self.mass).sqrt()
    }
}

/// Scalar spring state.
#[derive(Debug, Clone)]
pub struct Spring {
    config: SpringConfig,
    position: f64,
    velocity: f64,
    target: f64,
    settled: bool,
}

impl Spring {
    pub fn new(config: SpringConfig) -> Self {
        Self {
            config,
            position: 0.0,
            velocity: 0.0,
            target: 0.0,
            settled: true,
        }
    }

    pub fn config(&self) -> SpringConfig {
        self.config
    }

    /// Swap parameters mid-flight; position and velocity carry over.
    pub fn set_config(&mut self, config: SpringConfig) {
        self.config = config;
        if self.position != self.target {
            self.settled = false;
        }
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn is_settled(&self) -> bool {
        self.settled
    }

    /// Retarget.  Velocity is preserved so motion stays continuous.
    pub fn set_target(&mut self, target: f64) {
        if target != self.target {
            self.target = target;
            self.settled = false;
        }
    }

    /// Jump to `value` and rest there.
    pub fn snap_to(&mut self, value: f64) {
        self.position = value;
        self.target = value;
        self.velocity = 0.0;
        self.settled = true;
    }

    /// Advance by `dt` seconds.  Returns `true` if the position changed.
    pub fn step(&mut self, dt: f64) -> bool {
        if self.settled || !(dt > 0.0) {
            return false;
        }

        let (offset, velocity) = solve(&self.config, self.position - self.target, self.velocity, dt);
        self.position = self.target + offset;
        self.velocity = velocity;

        if offset.abs() < self.config.rest_delta && velocity.abs() < self.config.rest_speed {
            self.position = self.target;
            self.velocity = 0.0;
            self.settled = true;
        }
        true
    }
}

/// Displacement and velocity after `t` seconds, starting from displacement
/// `y0` (relative to the target) and velocity `v0`.
fn solve(config: &SpringConfig, y0: f64, v0: f64, t: f64) -> (f64, f64) {
    let w0 = config.natural_frequency();
    let zeta = config.damping_ratio();

    if !w0.is_finite() || w0 <= 0.0 {
        return (y0 + v0 * t, v0);
    }

    if (zeta - 1.0).abs() < 1e-6 {
        // Critically damped.
        let b = v0 + w0 * y0;
        let decay = (-w0 * t).exp();
        let y = decay * (y0 + b * t);
        let v = decay * (v0 - w0 * b * t);
        (y, v)
    } else if zeta < 1.0 {
        let a = zeta * w0;
        let wd = w0 * (1.0 - zeta * zeta).sqrt();
        let decay = (-a * t).exp();
        let (sin, cos) = (wd * t).sin_cos();
        let y = decay * (y0 * cos + (v0 + a * y0) / wd * sin);
        let v = decay * (v0 * cos - (a * v0 + w0 * w0 * y0) / wd * sin);
        (y, v)
    } else {
        let root = (zeta * zeta - 1.0).sqrt();
        let r1 = -w0 * (zeta - root);
        let r2 = -w0 * (zeta + root);
        let c1 = (v0 - r2 * y0) / (r1 - r2);
        let c2 = y0 - c1;
        let (e1, e2) = ((r1 * t).exp(), (r2 * t).exp());
        (c1 * e1 + c2 * e2, r1 * c1 * e1 + r2 * c2 * e2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: f64 = 1.0 / 60.0;

    fn run_until_settled(spring: &mut Spring, max_frames: usize) -> usize {
        for frame in 0..max_frames {
            if !spring.step(FRAME) {
                return frame;
            }
        }
        max_frames
    }

    #[test]
    fn starts_at_rest() {
        let mut s = Spring::new(SpringConfig::default());
        assert!(s.is_settled());
        assert!(!s.step(FRAME));
        assert_eq!(s.position(), 0.0);
    }

    #[test]
    fn converges_and_settles_on_target() {
        let mut s = Spring::new(SpringConfig::default());
        s.set_target(2000.0);
        let frames = run_until_settled(&mut s, 60 * 30);
        assert!(frames < 60 * 30, "spring never settled");
        assert!(s.is_settled());
        assert_eq!(s.position(), 2000.0);
        assert_eq!(s.velocity(), 0.0);
    }

    #[test]
    fn default_spring_does_not_overshoot() {
        // ζ = 1.5 for the default config.
        let mut s = Spring::new(SpringConfig::default());
        s.set_target(1000.0);
        let mut prev = 0.0;
        while s.step(FRAME) {
            assert!(s.position() <= 1000.0 + 1e-9);
            assert!(s.position() >= prev - 1e-9);
            prev = s.position();
        }
    }

    #[test]
    fn underdamped_spring_overshoots_then_settles() {
        let config = SpringConfig {
            stiffness: 300.0,
            damping: 5.0,
            ..SpringConfig::default()
        };
        let mut s = Spring::new(config);
        s.set_target(100.0);
        let mut peak: f64 = 0.0;
        while s.step(FRAME) {
            peak = peak.max(s.position());
        }
        assert!(peak > 100.0);
        assert_eq!(s.position(), 100.0);
    }

    #[test]
    fn critically_damped_branch_converges() {
        let config = SpringConfig {
            stiffness: 100.0,
            damping: 20.0,
            ..SpringConfig::default()
        };
        assert!((config.damping_ratio() - 1.0).abs() < 1e-12);
        let mut s = Spring::new(config);
        s.set_target(-500.0);
        run_until_settled(&mut s, 60 * 30);
        assert_eq!(s.position(), -500.0);
    }

    #[test]
    fn frame_rate_does_not_change_trajectory() {
        let mut fine = Spring::new(SpringConfig::default());
        let mut coarse = Spring::new(SpringConfig::default());
        fine.set_target(800.0);
        coarse.set_target(800.0);
        for _ in 0..60 {
            fine.step(1.0 / 120.0);
        }
        for _ in 0..10 {
            coarse.step(1.0 / 20.0);
        }
        assert!((fine.position() - coarse.position()).abs() < 1e-6);
    }

    #[test]
    fn retarget_keeps_velocity() {
        let mut s = Spring::new(SpringConfig::default());
        s.set_target(1000.0);
        for _ in 0..5 {
            s.step(FRAME);
        }
        let v = s.velocity();
        s.set_target(0.0);
        assert_eq!(s.velocity(), v);
        assert!(!s.is_settled());
    }

    #[test]
    fn non_positive_dt_is_ignored() {
        let mut s = Spring::new(SpringConfig::default());
        s.set_target(10.0);
        assert!(!s.step(0.0));
        assert!(!s.step(-1.0));
        assert!(!s.step(f64::NAN));
        assert_eq!(s.position(), 0.0);
    }

    #[test]
    fn snap_to_rests_immediately() {
        let mut s = Spring::new(SpringConfig::default());
        s.snap_to(420.0);
        assert!(s.is_settled());
        assert_eq!(s.position(), 420.0);
        assert!(!s.step(FRAME));
    }
}
