//! Render backend trait definition

use crate::spatial::{Point3D, Transform};
use super::surface::{Color, SurfaceCapabilities};

/// Error type for rendering operations
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// Backend initialization failed
    #[error("render backend init failed: {0}")]
    Init(String),
    /// Writing to the terminal failed
    #[error("terminal I/O failed: {0}")]
    Terminal(#[from] std::io::Error),
}

/// Opaque texture reference issued by a backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u64);

/// A glyph to render at a 3D position
#[derive(Debug, Clone, PartialEq)]
pub struct RenderGlyph {
    /// The symbol/character to render
    pub symbol: String,
    /// Position in world space
    pub position: Point3D,
    /// Foreground color
    pub color: Color,
    /// Alpha/opacity (0.0 - 1.0)
    pub alpha: f32,
    /// World-space size; framed glyphs use it for the frame extent
    pub scale: f32,
    /// Draw a box around the symbol, sized by `scale`
    pub framed: bool,
    /// Image shown inside the frame, when the backend can draw one
    pub texture: Option<TextureHandle>,
}

impl RenderGlyph {
    pub fn new(symbol: impl Into<String>, position: Point3D) -> Self {
        Self {
            symbol: symbol.into(),
            position,
            color: Color::White,
            alpha: 1.0,
            scale: 1.0,
            framed: false,
            texture: None,
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha.clamp(0.0, 1.0);
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_texture(mut self, texture: Option<TextureHandle>) -> Self {
        self.texture = texture;
        self
    }

    pub fn framed(mut self) -> Self {
        self.framed = true;
        self
    }
}

/// Backend rendering trait.
///
/// World-space drawing goes through the backend's own camera; HUD calls
/// take screen fractions in [0, 1].
pub trait RenderBackend: Send {
    /// Get surface capabilities
    fn capabilities(&self) -> SurfaceCapabilities;

    /// Begin a new render frame
    fn begin_frame(&mut self) -> Result<(), RenderError>;

    /// End frame and present to display
    fn end_frame(&mut self) -> Result<(), RenderError>;

    /// Render a world-space glyph
    fn draw_glyph(&mut self, glyph: &RenderGlyph);

    /// Render text at a screen-space position, always on top
    fn draw_hud_text(&mut self, x: f32, y: f32, text: &str, color: Color);

    /// Project a world point to normalized device coordinates
    fn project(&self, point: Point3D) -> Option<(f32, f32)>;

    /// Get current camera transform
    fn camera(&self) -> &Transform;

    /// Set camera transform
    fn set_camera(&mut self, camera: Transform);

    /// Load an image for later drawing. Backends that cannot show images
    /// return `None` and callers fall back to a label.
    fn load_texture(&mut self, _location: &str) -> Option<TextureHandle> {
        None
    }
}
