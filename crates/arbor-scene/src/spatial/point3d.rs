//! 3D point representation

use std::ops::{Add, Sub};

/// A point in 3D space.
///
/// Also used for hand landmarks, where x and y are normalized image
/// coordinates and z is relative depth.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point3D {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Point3D {
    /// Origin point (0, 0, 0)
    pub const ORIGIN: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    /// Create a new 3D point
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Build a point from an `[x, y, z]` triple
    pub fn from_array(v: [f32; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }

    /// Euclidean distance to another point
    pub fn distance(&self, other: &Point3D) -> f32 {
        self.distance_squared(other).sqrt()
    }

    /// Squared distance (avoids sqrt)
    pub fn distance_squared(&self, other: &Point3D) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        dx * dx + dy * dy + dz * dz
    }

    /// Distance in the XY plane only, ignoring depth
    pub fn planar_distance(&self, other: &Point3D) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Linear interpolation between two points
    pub fn lerp(&self, other: &Point3D, t: f32) -> Self {
        Self {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
            z: self.z + (other.z - self.z) * t,
        }
    }

    /// Rotate about the vertical (+Y) axis through the origin
    pub fn rotate_about_y(&self, angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self {
            x: self.x * cos + self.z * sin,
            y: self.y,
            z: -self.x * sin + self.z * cos,
        }
    }

    /// Distance from the vertical axis
    pub fn radial_distance(&self) -> f32 {
        (self.x * self.x + self.z * self.z).sqrt()
    }

    /// Convert to a Vector3D (from origin)
    pub fn to_vector(&self) -> super::Vector3D {
        super::Vector3D::new(self.x, self.y, self.z)
    }
}

impl Add<super::Vector3D> for Point3D {
    type Output = Point3D;

    fn add(self, rhs: super::Vector3D) -> Self::Output {
        Point3D::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Point3D {
    type Output = super::Vector3D;

    fn sub(self, rhs: Self) -> Self::Output {
        super::Vector3D::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}
