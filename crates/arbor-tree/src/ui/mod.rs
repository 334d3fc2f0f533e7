//! Terminal view of the installation
//!
//! Layout:
//! - World: particles and the image ring, projected from the viewer
//! - Top left: formation, policy and hand status
//! - Bottom: selection line and key help

mod hud;
mod scene;

use arbor_scene::renderer::RenderBackend;

use crate::state::SceneState;

pub use scene::{image_glyph, particle_glyph};

/// Render one frame of the installation
pub fn render_tree(state: &SceneState, backend: &mut dyn RenderBackend) {
    scene::render_particles(state, backend);
    scene::render_images(state, backend);

    hud::render_status(state, backend);
    hud::render_selection(state, backend);
    hud::render_help(state, backend);
}
