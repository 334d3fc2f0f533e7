//! Exponential smoothing toward a moving target
//!
//! Every displayed transform approaches its target through [`Smoother`].
//! The smoother has no idea why a target moved; formation and selection
//! logic only ever produce targets.

use crate::spatial::Transform;

/// Rate used for decorative particles
pub const PARTICLE_RATE: f32 = 4.0;

/// Rate used for selectable images
pub const IMAGE_RATE: f32 = 5.0;

/// Exponential approach with a linear per-step factor.
///
/// Each step moves `min(1, rate * dt)` of the remaining distance, so the
/// remaining error shrinks geometrically and never overshoots. The factor
/// is linear in `dt`, so the path depends on the frame rate: the same
/// second split into more frames covers slightly less distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Smoother {
    rate: f32,
}

impl Smoother {
    /// Create a smoother. Non-positive or non-finite rates freeze motion.
    pub fn new(rate: f32) -> Self {
        let rate = if rate.is_finite() && rate > 0.0 { rate } else { 0.0 };
        Self { rate }
    }

    /// Configured rate (per second)
    pub fn rate(&self) -> f32 {
        self.rate
    }

    /// Fraction of the remaining distance covered in a step of `dt` seconds
    pub fn factor(&self, dt: f32) -> f32 {
        if dt <= 0.0 || !dt.is_finite() {
            return 0.0;
        }
        (self.rate * dt).min(1.0)
    }

    /// Advance `current` toward `target` by one step of `dt` seconds.
    ///
    /// Position and scale are lerped per axis; rotation uses slerp. The
    /// result equals `current` exactly when `current == target`.
    pub fn advance(&self, current: &Transform, target: &Transform, dt: f32) -> Transform {
        if current == target {
            return *current;
        }

        let t = self.factor(dt);
        if t <= 0.0 {
            return *current;
        }
        if t >= 1.0 {
            return *target;
        }

        let rotation = if current.rotation == target.rotation {
            current.rotation
        } else {
            current.rotation.slerp(&target.rotation, t)
        };

        Transform {
            position: current.position.lerp(&target.position, t),
            rotation,
            scale: current.scale.lerp(&target.scale, t),
        }
    }

    /// Scalar form of [`advance`](Self::advance)
    pub fn advance_scalar(&self, current: f32, target: f32, dt: f32) -> f32 {
        current + (target - current) * self.factor(dt)
    }
}

impl Default for Smoother {
    fn default() -> Self {
        Self::new(PARTICLE_RATE)
    }
}

/// A transform that is only ever moved through a [`Smoother`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothedTransform {
    current: Transform,
}

impl SmoothedTransform {
    /// Start at `initial`
    pub fn new(initial: Transform) -> Self {
        Self { current: initial }
    }

    /// Current displayed transform
    pub fn current(&self) -> &Transform {
        &self.current
    }

    /// Step toward `target`
    pub fn approach(&mut self, smoother: &Smoother, target: &Transform, dt: f32) -> &Transform {
        self.current = smoother.advance(&self.current, target, dt);
        &self.current
    }

    /// Step position and scale toward `target` but take its rotation as is.
    ///
    /// Used when the orientation must track something directly, such as a
    /// presented image facing the viewer.
    pub fn approach_with_rotation(
        &mut self,
        smoother: &Smoother,
        target: &Transform,
        dt: f32,
    ) -> &Transform {
        let mut next = smoother.advance(&self.current, target, dt);
        next.rotation = target.rotation;
        self.current = next;
        &self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::{Point3D, Quaternion, Vector3D};

    fn target() -> Transform {
        Transform::from_position(Point3D::new(10.0, -4.0, 6.0))
            .with_rotation(Quaternion::from_axis_angle(Vector3D::UP, 1.2))
            .with_uniform_scale(3.0)
    }

    #[test]
    fn test_factor_is_linear_in_dt_and_clamped() {
        let smoother = Smoother::new(4.0);
        assert_eq!(smoother.factor(0.1), 4.0 * 0.1);
        assert_eq!(smoother.factor(0.5), 1.0);
        assert_eq!(smoother.factor(0.0), 0.0);

        // Two half steps cover less than one full step
        let one = 1.0 - smoother.factor(0.1);
        let two = (1.0 - smoother.factor(0.05)).powi(2);
        assert!(two > one);
    }

    #[test]
    fn test_fixed_point_is_exact() {
        let t = target();
        for rate in [0.5, 4.0, 5.0, 1000.0] {
            let smoother = Smoother::new(rate);
            for dt in [0.0, 1.0 / 60.0, 0.5, 10.0] {
                assert_eq!(smoother.advance(&t, &t, dt), t);
            }
        }
    }

    #[test]
    fn test_converges_monotonically() {
        for rate in [0.1, 1.0, 4.0, 5.0, 30.0, 500.0] {
            let smoother = Smoother::new(rate);
            let goal = target();
            let mut current = Transform::identity();
            let mut last = current.position.distance(&goal.position);

            for _ in 0..20_000 {
                current = smoother.advance(&current, &goal, 1.0 / 60.0);
                let d = current.position.distance(&goal.position);
                assert!(d <= last, "rate {} moved away: {} > {}", rate, d, last);
                last = d;
            }

            assert!(last < 1e-3, "rate {} did not converge: {}", rate, last);
            assert!((current.scale.x - 3.0).abs() < 1e-3);
            assert!(current.rotation.angle_to(&goal.rotation) < 1e-2);
        }
    }

    #[test]
    fn test_large_step_lands_on_target() {
        let smoother = Smoother::new(4.0);
        let goal = target();
        assert_eq!(smoother.advance(&Transform::identity(), &goal, 0.5), goal);
    }

    #[test]
    fn test_deterministic() {
        let smoother = Smoother::new(PARTICLE_RATE);
        let goal = target();
        let run = || {
            let mut current = Transform::identity();
            for i in 0..50 {
                current = smoother.advance(&current, &goal, 0.01 + (i % 3) as f32 * 0.005);
            }
            current
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_negative_dt_is_ignored() {
        let smoother = Smoother::new(IMAGE_RATE);
        let start = Transform::identity();
        assert_eq!(smoother.advance(&start, &target(), -1.0), start);
    }

    #[test]
    fn test_rotation_override() {
        let smoother = Smoother::new(IMAGE_RATE);
        let mut smoothed = SmoothedTransform::new(Transform::identity());
        let goal = target();
        let current = *smoothed.approach_with_rotation(&smoother, &goal, 1.0 / 60.0);
        assert_eq!(current.rotation, goal.rotation);
        assert!(current.position.distance(&goal.position) > 1.0);
    }
}
