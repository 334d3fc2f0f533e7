//! Terminal backend implementation

use std::io::{self, Write};

use crossterm::{
    cursor, queue,
    style::{Print, SetBackgroundColor, SetForegroundColor},
    terminal,
};

use super::Projection;
use crate::renderer::{Color, RenderBackend, RenderError, RenderGlyph, SurfaceCapabilities};
use crate::spatial::{Point3D, Transform};

/// Vertical field of view used for the scene
const FOV_DEGREES: f32 = 60.0;

/// Cell in the terminal buffer
#[derive(Debug, Clone, PartialEq)]
struct Cell {
    symbol: char,
    fg: Color,
    bg: Color,
    depth: f32,
}

impl Cell {
    fn blank(bg: Color) -> Self {
        Self {
            symbol: ' ',
            fg: Color::White,
            bg,
            depth: f32::MAX,
        }
    }
}

/// Depth-tested grid of character cells.
///
/// Shared by the terminal and recording backends so both rasterize the
/// same way.
#[derive(Debug, Clone)]
pub struct CellBuffer {
    width: u32,
    height: u32,
    cells: Vec<Cell>,
    background: Color,
}

impl CellBuffer {
    pub fn new(width: u32, height: u32, background: Color) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::blank(background); (width as usize) * (height as usize)],
            background,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Reset every cell to the background
    pub fn clear(&mut self) {
        let blank = Cell::blank(self.background);
        self.cells.fill(blank);
    }

    fn index(&self, x: u16, y: u16) -> Option<usize> {
        if (x as u32) < self.width && (y as u32) < self.height {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    /// Set a cell if `depth` is nearer than what is already there
    fn set_cell(&mut self, x: u16, y: u16, symbol: char, fg: Color, depth: f32) {
        if let Some(idx) = self.index(x, y) {
            let cell = &mut self.cells[idx];
            if depth < cell.depth {
                cell.symbol = symbol;
                cell.fg = fg;
                cell.depth = depth;
            }
        }
    }

    /// Set a cell without depth test (HUD is always on top)
    fn set_cell_hud(&mut self, x: u16, y: u16, symbol: char, fg: Color) {
        if let Some(idx) = self.index(x, y) {
            let cell = &mut self.cells[idx];
            cell.symbol = symbol;
            cell.fg = fg;
            cell.depth = 0.0;
        }
    }

    /// Rasterize a world-space glyph
    pub fn draw_glyph(&mut self, projection: &Projection, camera: &Transform, glyph: &RenderGlyph) {
        if glyph.alpha <= 0.3 {
            return;
        }
        let Some((x, y, depth)) =
            projection.project_to_screen(glyph.position, camera, self.width, self.height)
        else {
            return;
        };

        let color = if glyph.alpha < 0.7 {
            glyph.color.dim(glyph.alpha)
        } else {
            glyph.color
        };

        if glyph.framed {
            let (half_w, half_h) = projection
                .screen_extent(glyph.position, glyph.scale, camera, self.width, self.height)
                .unwrap_or((1, 1));
            self.draw_frame(x, y, half_w.max(1), half_h.max(1), Color::PHOTO_FRAME, depth);
        }

        let symbol = glyph.symbol.chars().next().unwrap_or(' ');
        // Nudge the symbol in front of its own frame
        self.set_cell(x, y, symbol, color, depth - f32::EPSILON);
    }

    fn draw_frame(&mut self, cx: u16, cy: u16, half_w: u16, half_h: u16, color: Color, depth: f32) {
        let left = cx as i32 - half_w as i32;
        let right = cx as i32 + half_w as i32;
        let top = cy as i32 - half_h as i32;
        let bottom = cy as i32 + half_h as i32;

        // Only visit cells inside the buffer; edges are still judged
        // against the full frame
        let x_range = left.max(0)..=right.min(self.width as i32 - 1);
        let y_range = top.max(0)..=bottom.min(self.height as i32 - 1);

        for y in y_range {
            for x in x_range.clone() {
                let on_h = y == top || y == bottom;
                let on_v = x == left || x == right;
                let symbol = match (on_h, on_v) {
                    (true, true) => '+',
                    (true, false) => '-',
                    (false, true) => '|',
                    // Opaque interior hides whatever is behind the photo
                    (false, false) => ' ',
                };
                self.set_cell(x as u16, y as u16, symbol, color, depth);
            }
        }
    }

    /// Write text at a screen fraction, clipped at the right edge
    pub fn draw_hud_text(&mut self, x: f32, y: f32, text: &str, color: Color) {
        let sx = (x.clamp(0.0, 1.0) * self.width as f32) as u16;
        let sy = (y.clamp(0.0, 1.0) * self.height as f32) as u16;

        for (i, ch) in text.chars().enumerate() {
            let char_x = sx.saturating_add(i as u16);
            if (char_x as u32) >= self.width {
                break;
            }
            self.set_cell_hud(char_x, sy, ch, color);
        }
    }

    /// Plain-text rows, for snapshots and logs
    pub fn rows(&self) -> Vec<String> {
        if self.width == 0 {
            return Vec::new();
        }
        self.cells
            .chunks(self.width as usize)
            .map(|row| row.iter().map(|c| c.symbol).collect())
            .collect()
    }

    /// Number of non-blank cells
    pub fn filled(&self) -> usize {
        self.cells.iter().filter(|c| c.symbol != ' ').count()
    }
}

/// Terminal rendering backend with depth buffer
pub struct TerminalBackend {
    buffer: CellBuffer,
    /// Previous frame for diff rendering
    prev_buffer: Option<CellBuffer>,
    projection: Projection,
    camera: Transform,
}

impl TerminalBackend {
    /// Create a backend sized to the current terminal
    pub fn new() -> Result<Self, RenderError> {
        let (width, height) =
            terminal::size().map_err(|e| RenderError::Init(e.to_string()))?;
        let (width, height) = (width as u32, height as u32);

        Ok(Self {
            buffer: CellBuffer::new(width, height, Color::NIGHT),
            prev_buffer: None,
            projection: Projection::for_terminal(FOV_DEGREES, width, height),
            camera: Transform::identity(),
        })
    }

    /// Resize buffers if the terminal changed size
    pub fn refresh_size(&mut self) -> Result<(), RenderError> {
        let (width, height) = terminal::size()?;
        let (width, height) = (width as u32, height as u32);

        if width != self.buffer.width() || height != self.buffer.height() {
            self.buffer = CellBuffer::new(width, height, Color::NIGHT);
            // Force a full redraw
            self.prev_buffer = None;
            self.projection.aspect = Projection::terminal_aspect(width, height);
        }

        Ok(())
    }
}

impl RenderBackend for TerminalBackend {
    fn capabilities(&self) -> SurfaceCapabilities {
        SurfaceCapabilities {
            width: self.buffer.width(),
            height: self.buffer.height(),
            supports_depth: true,
            fov_horizontal: Some(self.projection.fov.to_degrees() * self.projection.aspect),
        }
    }

    fn begin_frame(&mut self) -> Result<(), RenderError> {
        self.refresh_size()?;
        self.buffer.clear();
        Ok(())
    }

    fn end_frame(&mut self) -> Result<(), RenderError> {
        let mut stdout = io::stdout().lock();
        let width = self.buffer.width() as usize;

        queue!(stdout, cursor::Hide)?;

        // Only update cells that changed since the last frame
        for (idx, cell) in self.buffer.cells.iter().enumerate() {
            let unchanged = self
                .prev_buffer
                .as_ref()
                .and_then(|prev| prev.cells.get(idx))
                .is_some_and(|prev| prev.symbol == cell.symbol && prev.fg == cell.fg && prev.bg == cell.bg);
            if unchanged {
                continue;
            }
            let (x, y) = ((idx % width) as u16, (idx / width) as u16);
            queue!(
                stdout,
                cursor::MoveTo(x, y),
                SetForegroundColor(cell.fg.to_crossterm()),
                SetBackgroundColor(cell.bg.to_crossterm()),
                Print(cell.symbol)
            )?;
        }

        stdout.flush()?;
        self.prev_buffer = Some(self.buffer.clone());
        Ok(())
    }

    fn draw_glyph(&mut self, glyph: &RenderGlyph) {
        self.buffer.draw_glyph(&self.projection, &self.camera, glyph);
    }

    fn draw_hud_text(&mut self, x: f32, y: f32, text: &str, color: Color) {
        self.buffer.draw_hud_text(x, y, text, color);
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
}
