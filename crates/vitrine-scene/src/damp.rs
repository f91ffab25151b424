//! Critically damped smoothing.
//!
//! Values chase their targets with a spring tuned to settle without
//! oscillation. The step is closed-form in `dt`, so the motion is the same at
//! any frame rate, and the result is clamped so it never passes the target.

use std::ops::{Add, Mul, Sub};

use glam::{Vec2, Vec3};
use serde::Deserialize;

/// Value types that can be damped.
pub trait Dampable: Copy + Add<Output = Self> + Sub<Output = Self> + Mul<f32, Output = Self> {
    const ZERO: Self;

    fn dot(self, rhs: Self) -> f32;
}

impl Dampable for f32 {
    const ZERO: Self = 0.0;

    #[inline]
    fn dot(self, rhs: Self) -> f32 {
        self * rhs
    }
}

impl Dampable for Vec2 {
    const ZERO: Self = Vec2::ZERO;

    #[inline]
    fn dot(self, rhs: Self) -> f32 {
        Vec2::dot(self, rhs)
    }
}

impl Dampable for Vec3 {
    const ZERO: Self = Vec3::ZERO;

    #[inline]
    fn dot(self, rhs: Self) -> f32 {
        Vec3::dot(self, rhs)
    }
}

/// One smoothing step from `current` toward `target`.
///
/// `smooth_time` is roughly the time to cover most of the distance. A
/// non-positive `smooth_time` snaps to the target; a non-positive `dt` leaves
/// `current` and `velocity` untouched.
pub fn smooth_damp<T: Dampable>(current: T, target: T, velocity: &mut T, smooth_time: f32, dt: f32) -> T {
    if !(dt > 0.0) {
        return current;
    }
    if !(smooth_time > 0.0) {
        *velocity = T::ZERO;
        return target;
    }

    let omega = 2.0 / smooth_time;
    let x = omega * dt;
    let decay = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);

    let change = current - target;
    let temp = (*velocity + change * omega) * dt;
    *velocity = (*velocity - temp * omega) * decay;
    let next = target + (change + temp) * decay;

    // Past the target means the step overshot; land on it instead.
    if (target - current).dot(next - target) > 0.0 {
        *velocity = T::ZERO;
        return target;
    }
    next
}

/// A damped value with its velocity.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Damped<T> {
    value: T,
    velocity: T,
}

impl<T: Dampable> Damped<T> {
    pub fn new(value: T) -> Self {
        Self { value, velocity: T::ZERO }
    }

    #[inline]
    pub fn value(&self) -> T {
        self.value
    }

    #[inline]
    pub fn velocity(&self) -> T {
        self.velocity
    }

    /// Jumps to `value` and stops.
    pub fn snap(&mut self, value: T) {
        self.value = value;
        self.velocity = T::ZERO;
    }

    /// Advances toward `target` and returns the new value.
    pub fn update(&mut self, target: T, smooth_time: f32, dt: f32) -> T {
        self.value = smooth_damp(self.value, target, &mut self.velocity, smooth_time, dt);
        self.value
    }
}

impl<T: Dampable> Default for Damped<T> {
    fn default() -> Self {
        Self::new(T::ZERO)
    }
}

/// Smooth times, in seconds, for every damped quantity in the scene.
#[derive(Debug, Copy, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DampingTimes {
    /// Glass position and scale.
    pub glass: f32,
    /// Image position and scale while selected.
    pub selected_image: f32,
    /// Image scale while idle.
    pub idle_image_scale: f32,
    /// Visible scroll offset chasing the wheel target.
    pub scroll: f32,
}

impl Default for DampingTimes {
    fn default() -> Self {
        Self {
            glass: 0.15,
            selected_image: 0.1,
            idle_image_scale: 0.3,
            scroll: 0.2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(mut d: Damped<f32>, target: f32, smooth: f32, dt: f32, steps: usize) -> Damped<f32> {
        for _ in 0..steps {
            d.update(target, smooth, dt);
        }
        d
    }

    // ── convergence ───────────────────────────────────────────────────────

    #[test]
    fn converges_to_target() {
        let d = run(Damped::new(0.0), 10.0, 0.15, 1.0 / 60.0, 240);
        assert!((d.value() - 10.0).abs() < 1e-3);
    }

    #[test]
    fn never_overshoots() {
        let mut d = Damped::new(0.0f32);
        for _ in 0..600 {
            let v = d.update(1.0, 0.1, 1.0 / 30.0);
            assert!(v <= 1.0 + 1e-6);
        }
    }

    #[test]
    fn frame_rate_independent() {
        let fast = run(Damped::new(0.0), 1.0, 0.3, 1.0 / 120.0, 60);
        let slow = run(Damped::new(0.0), 1.0, 0.3, 1.0 / 30.0, 15);
        assert!((fast.value() - slow.value()).abs() < 0.02);
    }

    // ── edge cases ────────────────────────────────────────────────────────

    #[test]
    fn zero_dt_is_a_no_op() {
        let mut d = Damped::new(2.0f32);
        assert_eq!(d.update(5.0, 0.15, 0.0), 2.0);
        assert_eq!(d.update(5.0, 0.15, -1.0), 2.0);
        assert_eq!(d.velocity(), 0.0);
    }

    #[test]
    fn zero_smooth_time_snaps() {
        let mut d = Damped::new(Vec3::ZERO);
        let v = d.update(Vec3::ONE, 0.0, 0.016);
        assert_eq!(v, Vec3::ONE);
    }

    #[test]
    fn vector_damping_moves_toward_target() {
        let mut d = Damped::new(Vec2::ZERO);
        let v = d.update(Vec2::new(3.0, -4.0), 0.15, 0.016);
        assert!(v.x > 0.0 && v.y < 0.0);
        assert!(v.length() < 5.0);
    }
}
