//! Angle state and time-fraction interpolation for slice transitions.

/// Linear interpolation between `from` and `to` at `t`.
pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

/// Start/end angle pair in radians, clockwise from 12 o'clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcAngles {
    pub start: f64,
    pub end: f64,
}

impl ArcAngles {
    pub const fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    pub fn width(&self) -> f64 {
        self.end - self.start
    }

    pub fn lerp(&self, to: &ArcAngles, t: f64) -> ArcAngles {
        ArcAngles::new(lerp(self.start, to.start, t), lerp(self.end, to.end, t))
    }

    /// Equality within `1e-9` rad.
    pub fn approx_eq(&self, other: &ArcAngles) -> bool {
        const EPSILON: f64 = 1e-9;
        (self.start - other.start).abs() < EPSILON && (self.end - other.end).abs() < EPSILON
    }
}

/// Interpolated geometry of one slice transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcTween {
    from: ArcAngles,
    to: ArcAngles,
}

impl ArcTween {
    /// Opens a new slice: the start angle sweeps back from the end angle.
    pub fn enter(target: ArcAngles) -> Self {
        Self {
            from: ArcAngles::new(target.end, target.end),
            to: target,
        }
    }

    /// Moves both angles from the displayed state to the new target.
    pub fn update(from: ArcAngles, to: ArcAngles) -> Self {
        Self { from, to }
    }

    /// Collapses a slice: the start angle sweeps forward onto the end angle.
    pub fn exit(current: ArcAngles) -> Self {
        Self {
            from: current,
            to: ArcAngles::new(current.end, current.end),
        }
    }

    /// Geometry at time fraction `t`, clamped to `[0, 1]`.
    pub fn at(&self, t: f64) -> ArcAngles {
        self.from.lerp(&self.to, t.clamp(0.0, 1.0))
    }
}

/// Wall-clock window of one transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    pub started_ms: u64,
    pub duration_ms: u64,
}

impl Timing {
    pub fn new(started_ms: u64, duration_ms: u64) -> Self {
        Self {
            started_ms,
            duration_ms,
        }
    }

    /// Elapsed fraction in `[0, 1]`; zero-length transitions are complete.
    pub fn progress(&self, now_ms: u64) -> f64 {
        if self.duration_ms == 0 {
            return 1.0;
        }
        let elapsed = now_ms.saturating_sub(self.started_ms);
        (elapsed as f64 / self.duration_ms as f64).min(1.0)
    }

    pub fn is_done(&self, now_ms: u64) -> bool {
        self.progress(now_ms) >= 1.0
    }
}
