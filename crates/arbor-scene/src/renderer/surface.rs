//! Rendering surface capabilities and color types

/// Rendering surface capabilities
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceCapabilities {
    /// Width in cells
    pub width: u32,
    /// Height in cells
    pub height: u32,
    /// Supports depth-ordered rendering
    pub supports_depth: bool,
    /// Horizontal field of view in degrees
    pub fov_horizontal: Option<f32>,
}

impl Default for SurfaceCapabilities {
    fn default() -> Self {
        Self {
            width: 80,
            height: 24,
            supports_depth: false,
            fov_horizontal: None,
        }
    }
}

/// Color representation supporting multiple formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Color {
    /// Reset to default
    #[default]
    Reset,
    Black,
    DarkGrey,
    Red,
    Green,
    DarkGreen,
    Yellow,
    Cyan,
    White,
    Grey,
    /// True color RGB
    Rgb(u8, u8, u8),
}

impl Color {
    /// Scene palette
    pub const NEEDLE: Self = Color::Rgb(34, 139, 34);
    pub const NEEDLE_DARK: Self = Color::Rgb(0, 100, 0);
    pub const GOLD: Self = Color::Rgb(218, 165, 32);
    pub const ORNAMENT_RED: Self = Color::Rgb(200, 30, 45);
    pub const SNOW: Self = Color::Rgb(235, 240, 250);
    pub const PHOTO_FRAME: Self = Color::Rgb(245, 222, 179);
    pub const NIGHT: Self = Color::Rgb(5, 7, 12);
    pub const HUD: Self = Color::Rgb(0, 255, 255);

    /// Convert to crossterm color
    pub fn to_crossterm(&self) -> crossterm::style::Color {
        use crossterm::style::Color as C;
        match *self {
            Color::Reset => C::Reset,
            Color::Black => C::Black,
            Color::DarkGrey => C::DarkGrey,
            Color::Red => C::Red,
            Color::Green => C::Green,
            Color::DarkGreen => C::DarkGreen,
            Color::Yellow => C::Yellow,
            Color::Cyan => C::Cyan,
            Color::White => C::White,
            Color::Grey => C::Grey,
            Color::Rgb(r, g, b) => C::Rgb { r, g, b },
        }
    }

    /// Scale an RGB color toward black; named colors pass through
    pub fn dim(&self, factor: f32) -> Color {
        let factor = factor.clamp(0.0, 1.0);
        match *self {
            Color::Rgb(r, g, b) => Color::Rgb(
                (r as f32 * factor) as u8,
                (g as f32 * factor) as u8,
                (b as f32 * factor) as u8,
            ),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dim() {
        assert_eq!(Color::Rgb(200, 100, 50).dim(0.5), Color::Rgb(100, 50, 25));
        assert_eq!(Color::Green.dim(0.1), Color::Green);
        assert_eq!(Color::GOLD.dim(2.0), Color::GOLD);
    }
}
