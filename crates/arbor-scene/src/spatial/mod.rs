//! Spatial primitives for scene placement
//!
//! Uses a right-handed coordinate system:
//! - X: Right (+) / Left (-)
//! - Y: Up (+) / Down (-)
//! - Z: Forward (+) / Backward (-)
//!
//! The viewer sits on the -Z axis looking toward the origin, so +Z points
//! into the scene.

mod point3d;
mod vector3d;
mod quaternion;
mod transform;

pub use point3d::Point3D;
pub use vector3d::Vector3D;
pub use quaternion::Quaternion;
pub use transform::Transform;
