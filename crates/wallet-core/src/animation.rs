#![forbid(unsafe_code)]

//! Composable animation primitives.
//!
//! Time-based animations that produce normalized `f32` values (0.0–1.0).
//! Nothing here reads a clock: callers advance animations with explicit
//! [`Duration`] steps, which keeps every animation deterministic under test.

pub mod stagger;

use std::time::Duration;

use crate::geometry::Offset;

// ---------------------------------------------------------------------------
// Easing functions
// ---------------------------------------------------------------------------

/// Easing function signature: maps `t` in [0, 1] to output in [0, 1].
pub type EasingFn = fn(f32) -> f32;

/// Identity easing (constant velocity).
#[inline]
pub fn linear(t: f32) -> f32 {
    t.clamp(0.0, 1.0)
}

/// Quadratic ease-out (slow end).
#[inline]
pub fn ease_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t) * (1.0 - t)
}

/// Fast departure, long soft landing. Used for reflow glides.
///
/// Equivalent to `cubic-bezier(0.22, 0.9, 0.24, 1)`.
#[inline]
pub fn glide(t: f32) -> f32 {
    cubic_bezier(0.22, 0.9, 0.24, 1.0, t)
}

/// Evaluate a CSS-style cubic Bézier timing curve with control points
/// `(x1, y1)` and `(x2, y2)` at progress `x`.
///
/// Endpoints are pinned: `x <= 0` yields 0 and `x >= 1` yields 1.
pub fn cubic_bezier(x1: f32, y1: f32, x2: f32, y2: f32, x: f32) -> f32 {
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }

    // Polynomial coefficients for B(s) = ((a*s + b)*s + c)*s.
    let cx = 3.0 * x1;
    let bx = 3.0 * (x2 - x1) - cx;
    let ax = 1.0 - cx - bx;
    let cy = 3.0 * y1;
    let by = 3.0 * (y2 - y1) - cy;
    let ay = 1.0 - cy - by;

    let sample_x = |s: f32| ((ax * s + bx) * s + cx) * s;
    let sample_dx = |s: f32| (3.0 * ax * s + 2.0 * bx) * s + cx;
    let sample_y = |s: f32| ((ay * s + by) * s + cy) * s;

    // Newton-Raphson first; fall back to bisection on flat slopes.
    let mut s = x;
    for _ in 0..8 {
        let err = sample_x(s) - x;
        if err.abs() < 1e-6 {
            return sample_y(s);
        }
        let slope = sample_dx(s);
        if slope.abs() < 1e-6 {
            break;
        }
        s -= err / slope;
    }

    let (mut lo, mut hi) = (0.0_f32, 1.0_f32);
    s = x;
    for _ in 0..32 {
        let value = sample_x(s);
        if (value - x).abs() < 1e-6 {
            break;
        }
        if value < x {
            lo = s;
        } else {
            hi = s;
        }
        s = (lo + hi) / 2.0;
    }
    sample_y(s)
}

// ---------------------------------------------------------------------------
// Animation trait
// ---------------------------------------------------------------------------

/// A time-based animation producing values in [0.0, 1.0].
pub trait Animation {
    /// Advance the animation by `dt`.
    fn tick(&mut self, dt: Duration);

    /// Whether the animation has reached its end.
    fn is_complete(&self) -> bool;

    /// Current output value, clamped to [0.0, 1.0].
    fn value(&self) -> f32;
}

// ---------------------------------------------------------------------------
// Fade
// ---------------------------------------------------------------------------

/// Progression from 0.0 to 1.0 over a duration, with configurable easing.
///
/// Tracks elapsed time as [`Duration`] internally for precise accumulation
/// (no floating-point drift).
#[derive(Debug, Clone, Copy)]
pub struct Fade {
    elapsed: Duration,
    duration: Duration,
    easing: EasingFn,
}

impl Fade {
    /// Create a fade with the given duration and default linear easing.
    pub fn new(duration: Duration) -> Self {
        Self {
            elapsed: Duration::ZERO,
            duration: if duration.is_zero() {
                Duration::from_nanos(1)
            } else {
                duration
            },
            easing: linear,
        }
    }

    /// Set the easing function.
    #[must_use]
    pub fn easing(mut self, easing: EasingFn) -> Self {
        self.easing = easing;
        self
    }

    /// Raw linear progress (before easing), in [0.0, 1.0].
    pub fn raw_progress(&self) -> f32 {
        let t = self.elapsed.as_secs_f64() / self.duration.as_secs_f64();
        (t as f32).clamp(0.0, 1.0)
    }
}

impl Animation for Fade {
    fn tick(&mut self, dt: Duration) {
        self.elapsed = self.elapsed.saturating_add(dt);
    }

    fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }

    fn value(&self) -> f32 {
        (self.easing)(self.raw_progress())
    }
}

// ---------------------------------------------------------------------------
// Transition / Tween
// ---------------------------------------------------------------------------

/// How a property change is animated: duration plus easing.
///
/// A node with no transition applies property changes instantly.
#[derive(Debug, Clone, Copy)]
pub struct Transition {
    pub duration: Duration,
    pub easing: EasingFn,
}

impl Transition {
    #[must_use]
    pub const fn new(duration: Duration, easing: EasingFn) -> Self {
        Self { duration, easing }
    }
}

/// Interpolates an [`Offset`] from `from` to `to` under a [`Transition`].
#[derive(Debug, Clone, Copy)]
pub struct Tween {
    from: Offset,
    to: Offset,
    fade: Fade,
}

impl Tween {
    #[must_use]
    pub fn new(from: Offset, to: Offset, transition: Transition) -> Self {
        Self {
            from,
            to,
            fade: Fade::new(transition.duration).easing(transition.easing),
        }
    }

    /// Interpolated offset at the current time.
    pub fn current(&self) -> Offset {
        self.from.lerp(self.to, self.fade.value())
    }

    /// Where the tween ends.
    pub fn target(&self) -> Offset {
        self.to
    }
}

impl Animation for Tween {
    fn tick(&mut self, dt: Duration) {
        self.fade.tick(dt);
    }

    fn is_complete(&self) -> bool {
        self.fade.is_complete()
    }

    fn value(&self) -> f32 {
        self.fade.value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS_100: Duration = Duration::from_millis(100);

    #[test]
    fn easing_endpoints() {
        for f in [linear, ease_out, glide] {
            assert!((f(0.0)).abs() < 1e-4);
            assert!((f(1.0) - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn easing_clamps_out_of_range() {
        assert_eq!(linear(-1.0), 0.0);
        assert_eq!(ease_out(2.0), 1.0);
        assert_eq!(glide(-0.5), 0.0);
        assert_eq!(glide(1.5), 1.0);
    }

    #[test]
    fn glide_front_loads_progress() {
        // Most of the distance is covered early.
        assert!(glide(0.25) > 0.5);
        assert!(glide(0.5) > ease_out(0.5));
    }

    #[test]
    fn glide_is_monotonic() {
        let mut prev = 0.0;
        for i in 1..=100 {
            let v = glide(i as f32 / 100.0);
            assert!(v + 1e-4 >= prev, "glide dipped at step {i}: {prev} -> {v}");
            prev = v;
        }
    }

    #[test]
    fn cubic_bezier_linear_control_points_is_identity() {
        for i in 0..=10 {
            let t = i as f32 / 10.0;
            assert!((cubic_bezier(0.25, 0.25, 0.75, 0.75, t) - t).abs() < 1e-3);
        }
    }

    #[test]
    fn fade_progresses_and_completes() {
        let mut fade = Fade::new(MS_100);
        assert_eq!(fade.value(), 0.0);
        fade.tick(Duration::from_millis(50));
        assert!((fade.value() - 0.5).abs() < 1e-4);
        assert!(!fade.is_complete());
        fade.tick(Duration::from_millis(60));
        assert!(fade.is_complete());
        assert_eq!(fade.value(), 1.0);
    }

    #[test]
    fn fade_zero_duration_completes_on_first_tick() {
        let mut fade = Fade::new(Duration::ZERO);
        fade.tick(Duration::from_nanos(1));
        assert!(fade.is_complete());
    }

    #[test]
    fn tween_moves_from_start_to_target() {
        let mut tween = Tween::new(
            Offset::new(10.0, -4.0),
            Offset::ZERO,
            Transition::new(MS_100, linear),
        );
        assert_eq!(tween.current(), Offset::new(10.0, -4.0));
        tween.tick(Duration::from_millis(50));
        assert_eq!(tween.current(), Offset::new(5.0, -2.0));
        tween.tick(MS_100);
        assert!(tween.is_complete());
        assert_eq!(tween.current(), Offset::ZERO);
        assert_eq!(tween.target(), Offset::ZERO);
    }
}
