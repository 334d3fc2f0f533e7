//! In-memory backend for headless runs and tests

use super::terminal::{CellBuffer, Projection};
use super::{Color, RenderBackend, RenderError, RenderGlyph, SurfaceCapabilities, TextureHandle};
use crate::spatial::{Point3D, Transform};

/// Everything drawn during one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordedFrame {
    pub glyphs: Vec<RenderGlyph>,
    pub hud: Vec<String>,
}

/// Backend that keeps the last completed frame instead of drawing it.
///
/// Glyphs are also rasterized into a [`CellBuffer`] of the configured size
/// so callers can inspect what a terminal would have shown.
pub struct RecordingBackend {
    buffer: CellBuffer,
    projection: Projection,
    camera: Transform,
    current: RecordedFrame,
    last: Option<RecordedFrame>,
    frames: u64,
    /// Loaded texture locations, indexed by handle
    textures: Vec<String>,
}

impl RecordingBackend {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            buffer: CellBuffer::new(width, height, Color::NIGHT),
            projection: Projection::for_terminal(60.0, width, height),
            camera: Transform::identity(),
            current: RecordedFrame::default(),
            last: None,
            frames: 0,
            textures: Vec::new(),
        }
    }

    /// Completed frames so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Most recent completed frame
    pub fn last_frame(&self) -> Option<&RecordedFrame> {
        self.last.as_ref()
    }

    /// Location a texture handle was loaded from
    pub fn texture_location(&self, handle: TextureHandle) -> Option<&str> {
        usize::try_from(handle.0)
            .ok()
            .and_then(|index| self.textures.get(index))
            .map(String::as_str)
    }

    /// Rasterized text of the most recent frame
    pub fn snapshot(&self) -> Vec<String> {
        self.buffer.rows()
    }
}

impl Default for RecordingBackend {
    fn default() -> Self {
        Self::new(80, 24)
    }
}

impl RenderBackend for RecordingBackend {
    fn capabilities(&self) -> SurfaceCapabilities {
        SurfaceCapabilities {
            width: self.buffer.width(),
            height: self.buffer.height(),
            supports_depth: true,
            fov_horizontal: None,
        }
    }

    fn begin_frame(&mut self) -> Result<(), RenderError> {
        self.buffer.clear();
        self.current = RecordedFrame::default();
        Ok(())
    }

    fn end_frame(&mut self) -> Result<(), RenderError> {
        self.last = Some(std::mem::take(&mut self.current));
        self.frames += 1;
        Ok(())
    }

    fn draw_glyph(&mut self, glyph: &RenderGlyph) {
        self.buffer.draw_glyph(&self.projection, &self.camera, glyph);
        self.current.glyphs.push(glyph.clone());
    }

    fn draw_hud_text(&mut self, x: f32, y: f32, text: &str, color: Color) {
        self.buffer.draw_hud_text(x, y, text, color);
        self.current.hud.push(text.to_string());
    }

    fn project(&self, point: Point3D) -> Option<(f32, f32)> {
        self.projection.project(point, &self.camera).map(|(x, y, _)| (x, y))
    }

    fn camera(&self) -> &Transform {
        &self.camera
    }

    fn set_camera(&mut self, camera: Transform) {
        self.camera = camera;
    }

    fn load_texture(&mut self, location: &str) -> Option<TextureHandle> {
        let handle = TextureHandle(self.textures.len() as u64);
        self.textures.push(location.to_string());
        Some(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_completed_frames() {
        let mut backend = RecordingBackend::new(40, 12);
        backend.set_camera(Transform::from_position(Point3D::new(0.0, 0.0, -10.0)));

        backend.begin_frame().unwrap();
        backend.draw_glyph(&RenderGlyph::new("*", Point3D::ORIGIN));
        backend.draw_hud_text(0.0, 0.0, "tree", Color::HUD);
        assert!(backend.last_frame().is_none());
        backend.end_frame().unwrap();

        assert_eq!(backend.frames(), 1);
        let frame = backend.last_frame().unwrap();
        assert_eq!(frame.glyphs.len(), 1);
        assert_eq!(frame.hud, vec!["tree".to_string()]);
        assert!(backend.snapshot()[0].starts_with("tree"));
        assert!(backend.snapshot().iter().any(|row| row.contains('*')));
    }

    #[test]
    fn test_textures_get_distinct_handles() {
        let mut backend = RecordingBackend::default();
        let first = backend.load_texture("a.png").unwrap();
        let second = backend.load_texture("b.png").unwrap();
        assert_ne!(first, second);
        assert_eq!(backend.texture_location(second), Some("b.png"));
        assert_eq!(backend.texture_location(TextureHandle(99)), None);
    }

    #[test]
    fn test_project_uses_camera() {
        let mut backend = RecordingBackend::default();
        assert!(backend.project(Point3D::new(0.0, 0.0, -5.0)).is_none());
        backend.set_camera(Transform::from_position(Point3D::new(0.0, 0.0, -10.0)));
        assert!(backend.project(Point3D::new(0.0, 0.0, -5.0)).is_some());
    }
}
