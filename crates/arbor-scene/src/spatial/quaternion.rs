//! Quaternion representation for 3D rotations

use super::Vector3D;
use std::ops::Mul;

/// A unit quaternion representing an orientation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quaternion {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Quaternion {
    /// Identity quaternion (no rotation)
    pub const IDENTITY: Self = Self { x: 0.0, y: 0.0, z: 0.0, w: 1.0 };

    /// Create a new quaternion
    pub fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Create a quaternion from axis-angle representation
    pub fn from_axis_angle(axis: Vector3D, angle_radians: f32) -> Self {
        let (sin_half, cos_half) = (angle_radians / 2.0).sin_cos();
        let normalized = axis.normalize();

        Self {
            x: normalized.x * sin_half,
            y: normalized.y * sin_half,
            z: normalized.z * sin_half,
            w: cos_half,
        }
    }

    /// Heading about +Y followed by pitch about the local +X axis.
    ///
    /// A positive yaw turns +Z toward +X; a positive pitch tips +Z downward.
    pub fn from_yaw_pitch(yaw: f32, pitch: f32) -> Self {
        Self::from_axis_angle(Vector3D::UP, yaw) * Self::from_axis_angle(Vector3D::RIGHT, pitch)
    }

    /// Accumulated per-axis spin angles, applied Z then X then Y
    pub fn from_spin(angles: Vector3D) -> Self {
        Self::from_axis_angle(Vector3D::UP, angles.y)
            * Self::from_axis_angle(Vector3D::RIGHT, angles.x)
            * Self::from_axis_angle(Vector3D::FORWARD, angles.z)
    }

    /// Orientation whose forward axis points along `direction`
    pub fn look_rotation(direction: Vector3D) -> Self {
        let dir = direction.normalize();
        if dir.magnitude_squared() < 1e-8 {
            return Self::IDENTITY;
        }
        let yaw = dir.x.atan2(dir.z);
        let pitch = (-dir.y).clamp(-1.0, 1.0).asin();
        Self::from_yaw_pitch(yaw, pitch)
    }

    /// 4D dot product
    pub fn dot(&self, other: &Quaternion) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z + self.w * other.w
    }

    /// Magnitude of the quaternion
    pub fn magnitude(&self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Normalize the quaternion
    pub fn normalize(&self) -> Self {
        let mag = self.magnitude();
        if mag > 0.0 {
            Self {
                x: self.x / mag,
                y: self.y / mag,
                z: self.z / mag,
                w: self.w / mag,
            }
        } else {
            Self::IDENTITY
        }
    }

    /// Inverse rotation (conjugate of a unit quaternion)
    pub fn inverse(&self) -> Self {
        let mag_sq = self.dot(self);
        if mag_sq > 0.0 {
            let inv_mag_sq = 1.0 / mag_sq;
            Self {
                x: -self.x * inv_mag_sq,
                y: -self.y * inv_mag_sq,
                z: -self.z * inv_mag_sq,
                w: self.w * inv_mag_sq,
            }
        } else {
            Self::IDENTITY
        }
    }

    /// Rotate a vector by this quaternion
    pub fn rotate_vector(&self, v: Vector3D) -> Vector3D {
        let q_vec = Vector3D::new(self.x, self.y, self.z);
        let uv = q_vec.cross(&v);
        let uuv = q_vec.cross(&uv);
        v + (uv * self.w + uuv) * 2.0
    }

    /// Spherical linear interpolation along the shorter arc
    pub fn slerp(&self, other: &Quaternion, t: f32) -> Self {
        let dot = self.dot(other);

        let (other, dot) = if dot < 0.0 {
            (Quaternion::new(-other.x, -other.y, -other.z, -other.w), -dot)
        } else {
            (*other, dot)
        };

        // Nearly parallel: fall back to normalized lerp
        if dot > 0.9995 {
            return Quaternion::new(
                self.x + t * (other.x - self.x),
                self.y + t * (other.y - self.y),
                self.z + t * (other.z - self.z),
                self.w + t * (other.w - self.w),
            )
            .normalize();
        }

        let theta_0 = dot.acos();
        let theta = theta_0 * t;
        let sin_theta = theta.sin();
        let sin_theta_0 = theta_0.sin();

        let s0 = theta.cos() - dot * sin_theta / sin_theta_0;
        let s1 = sin_theta / sin_theta_0;

        Quaternion::new(
            s0 * self.x + s1 * other.x,
            s0 * self.y + s1 * other.y,
            s0 * self.z + s1 * other.z,
            s0 * self.w + s1 * other.w,
        )
    }

    /// Angle in radians between two orientations
    pub fn angle_to(&self, other: &Quaternion) -> f32 {
        let dot = self.dot(other).abs().min(1.0);
        2.0 * dot.acos()
    }

    /// Forward vector (+Z rotated by this orientation)
    pub fn forward(&self) -> Vector3D {
        self.rotate_vector(Vector3D::FORWARD)
    }
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Quaternion {
    type Output = Quaternion;

    fn mul(self, rhs: Self) -> Self::Output {
        Quaternion::new(
            self.w * rhs.x + self.x * rhs.w + self.y * rhs.z - self.z * rhs.y,
            self.w * rhs.y - self.x * rhs.z + self.y * rhs.w + self.z * rhs.x,
            self.w * rhs.z + self.x * rhs.y - self.y * rhs.x + self.z * rhs.w,
            self.w * rhs.w - self.x * rhs.x - self.y * rhs.y - self.z * rhs.z,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn assert_vec_eq(a: Vector3D, b: Vector3D) {
        assert!((a - b).magnitude() < 0.0001, "{:?} != {:?}", a, b);
    }

    #[test]
    fn test_yaw_turns_forward_to_right() {
        let q = Quaternion::from_axis_angle(Vector3D::UP, PI / 2.0);
        assert_vec_eq(q.forward(), Vector3D::RIGHT);
    }

    #[test]
    fn test_look_rotation() {
        let back = Vector3D::new(0.0, 0.0, -1.0);
        assert_vec_eq(Quaternion::look_rotation(back).forward(), back);

        let diagonal = Vector3D::new(1.0, 1.0, 1.0).normalize();
        assert_vec_eq(Quaternion::look_rotation(diagonal).forward(), diagonal);

        assert_eq!(Quaternion::look_rotation(Vector3D::ZERO), Quaternion::IDENTITY);
    }

    #[test]
    fn test_inverse() {
        let q = Quaternion::from_axis_angle(Vector3D::UP, PI / 4.0);
        let result = q * q.inverse();
        assert!((result.w - 1.0).abs() < 0.0001);
        assert!(result.x.abs() < 0.0001);
        assert!(result.y.abs() < 0.0001);
        assert!(result.z.abs() < 0.0001);
    }

    #[test]
    fn test_slerp_halfway() {
        let a = Quaternion::IDENTITY;
        let b = Quaternion::from_axis_angle(Vector3D::UP, PI / 2.0);
        let mid = a.slerp(&b, 0.5);
        assert!((a.angle_to(&mid) - PI / 4.0).abs() < 0.001);
        assert!((mid.magnitude() - 1.0).abs() < 0.0001);
    }
}
