//! 3D to 2D projection for terminal rendering

use crate::spatial::{Point3D, Transform};

/// Terminal cells are roughly twice as tall as they are wide
const CELL_ASPECT: f32 = 0.5;

/// Perspective projection settings
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    /// Vertical field of view in radians
    pub fov: f32,
    /// Near clipping plane
    pub near: f32,
    /// Far clipping plane
    pub far: f32,
    /// Aspect ratio (width / height) of the visible area
    pub aspect: f32,
}

impl Projection {
    /// Create a perspective projection
    pub fn perspective(fov_degrees: f32, aspect: f32) -> Self {
        Self {
            fov: fov_degrees.to_radians(),
            near: 0.1,
            far: 1000.0,
            aspect,
        }
    }

    /// Perspective for a terminal of `width` x `height` cells
    pub fn for_terminal(fov_degrees: f32, width: u32, height: u32) -> Self {
        Self::perspective(fov_degrees, Self::terminal_aspect(width, height))
    }

    /// Visible aspect ratio of a cell grid
    pub fn terminal_aspect(width: u32, height: u32) -> f32 {
        if height == 0 {
            return 1.0;
        }
        width as f32 * CELL_ASPECT / height as f32
    }

    /// Project a world point to normalized device coordinates (-1 to 1)
    /// plus a depth in [0, 1]. `None` when outside the frustum.
    pub fn project(&self, point: Point3D, camera: &Transform) -> Option<(f32, f32, f32)> {
        let local = camera.inverse_transform_point(point);

        if local.z <= self.near || local.z >= self.far {
            return None;
        }

        let tan_half_fov = (self.fov / 2.0).tan();
        let x_ndc = local.x / (local.z * tan_half_fov * self.aspect);
        let y_ndc = local.y / (local.z * tan_half_fov);

        if x_ndc.abs() > 1.0 || y_ndc.abs() > 1.0 {
            return None;
        }

        let depth = (local.z - self.near) / (self.far - self.near);
        Some((x_ndc, y_ndc, depth))
    }

    /// Convert normalized device coordinates to a cell position
    pub fn ndc_to_screen(&self, x_ndc: f32, y_ndc: f32, width: u32, height: u32) -> (u16, u16) {
        let x = ((x_ndc + 1.0) / 2.0 * width as f32).round() as u16;
        let y = ((1.0 - y_ndc) / 2.0 * height as f32).round() as u16;

        let x = x.min((width as u16).saturating_sub(1));
        let y = y.min((height as u16).saturating_sub(1));

        (x, y)
    }

    /// Project a world point directly to a cell position and depth
    pub fn project_to_screen(
        &self,
        point: Point3D,
        camera: &Transform,
        width: u32,
        height: u32,
    ) -> Option<(u16, u16, f32)> {
        let (x_ndc, y_ndc, depth) = self.project(point, camera)?;
        let (x, y) = self.ndc_to_screen(x_ndc, y_ndc, width, height);
        Some((x, y, depth))
    }

    /// Half-extent in cells of a world-space square of side `size` at `point`
    pub fn screen_extent(
        &self,
        point: Point3D,
        size: f32,
        camera: &Transform,
        width: u32,
        height: u32,
    ) -> Option<(u16, u16)> {
        let local = camera.inverse_transform_point(point);
        if local.z <= self.near {
            return None;
        }
        let tan_half_fov = (self.fov / 2.0).tan();
        let half = size / 2.0;
        let half_x = half / (local.z * tan_half_fov * self.aspect) * width as f32 / 2.0;
        let half_y = half / (local.z * tan_half_fov) * height as f32 / 2.0;
        Some((half_x.round() as u16, half_y.round() as u16))
    }
}

impl Default for Projection {
    fn default() -> Self {
        Self::perspective(60.0, 16.0 / 9.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_ahead_projects_to_center() {
        let proj = Projection::perspective(90.0, 1.0);
        let camera = Transform::from_position(Point3D::new(0.0, 0.0, -24.0));

        let (x, y, depth) = proj.project(Point3D::ORIGIN, &camera).unwrap();
        assert!(x.abs() < 1e-4);
        assert!(y.abs() < 1e-4);
        assert!(depth > 0.0 && depth < 1.0);
    }

    #[test]
    fn test_behind_camera() {
        let proj = Projection::default();
        let camera = Transform::identity();
        assert!(proj.project(Point3D::new(0.0, 0.0, -5.0), &camera).is_none());
    }

    #[test]
    fn test_nearer_is_shallower() {
        let proj = Projection::default();
        let camera = Transform::identity();
        let (_, _, near) = proj.project(Point3D::new(0.0, 0.0, 5.0), &camera).unwrap();
        let (_, _, far) = proj.project(Point3D::new(0.0, 0.0, 50.0), &camera).unwrap();
        assert!(near < far);
    }

    #[test]
    fn test_screen_coordinates() {
        let proj = Projection::default();

        assert_eq!(proj.ndc_to_screen(0.0, 0.0, 100, 50), (50, 25));
        assert_eq!(proj.ndc_to_screen(-1.0, 1.0, 100, 50), (0, 0));
        assert_eq!(proj.ndc_to_screen(1.0, -1.0, 100, 50), (99, 49));
        assert_eq!(proj.ndc_to_screen(0.5, 0.5, 0, 0), (0, 0));
    }

    #[test]
    fn test_extent_shrinks_with_distance() {
        let proj = Projection::for_terminal(60.0, 120, 40);
        let camera = Transform::identity();
        let (near_w, near_h) = proj
            .screen_extent(Point3D::new(0.0, 0.0, 5.0), 2.0, &camera, 120, 40)
            .unwrap();
        let (far_w, far_h) = proj
            .screen_extent(Point3D::new(0.0, 0.0, 20.0), 2.0, &camera, 120, 40)
            .unwrap();
        assert!(near_w > far_w);
        assert!(near_h >= far_h);
    }
}
