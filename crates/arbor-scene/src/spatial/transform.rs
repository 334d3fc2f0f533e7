//! Transform representing position, rotation, and scale in 3D space

use super::{Point3D, Quaternion, Vector3D};

/// A complete 3D transform (position + rotation + scale).
///
/// This is what the rendering collaborator receives for every live entity
/// each frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Point3D,
    pub rotation: Quaternion,
    pub scale: Vector3D,
}

impl Transform {
    /// Identity transform (origin, no rotation, unit scale)
    pub fn identity() -> Self {
        Self {
            position: Point3D::ORIGIN,
            rotation: Quaternion::IDENTITY,
            scale: Vector3D::ONE,
        }
    }

    /// Create a transform with just position
    pub fn from_position(position: Point3D) -> Self {
        Self {
            position,
            ..Self::identity()
        }
    }

    /// Builder: replace the rotation
    pub fn with_rotation(mut self, rotation: Quaternion) -> Self {
        self.rotation = rotation;
        self
    }

    /// Builder: uniform scale
    pub fn with_uniform_scale(mut self, scale: f32) -> Self {
        self.scale = Vector3D::splat(scale);
        self
    }

    /// Forward direction of this transform
    pub fn forward(&self) -> Vector3D {
        self.rotation.forward()
    }

    /// Rotate the transform to look at a target point
    pub fn look_at(&mut self, target: Point3D) {
        let direction = target - self.position;
        if direction.magnitude_squared() < 0.0001 {
            return;
        }
        self.rotation = Quaternion::look_rotation(direction);
    }

    /// Inverse transform a point from world space to local space
    pub fn inverse_transform_point(&self, world: Point3D) -> Point3D {
        let relative = world - self.position;
        let unrotated = self.rotation.inverse().rotate_vector(relative);
        Point3D::new(
            unrotated.x / self.scale.x,
            unrotated.y / self.scale.y,
            unrotated.z / self.scale.z,
        )
    }

    /// Interpolate every component by the same factor
    pub fn lerp(&self, other: &Transform, t: f32) -> Self {
        Self {
            position: self.position.lerp(&other.position, t),
            rotation: self.rotation.slerp(&other.rotation, t),
            scale: self.scale.lerp(&other.scale, t),
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}
