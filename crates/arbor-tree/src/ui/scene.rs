//! World-space glyphs for particles and images

use arbor_scene::renderer::{Color, RenderBackend, RenderGlyph};
use arbor_scene::Transform;

use crate::formation::EntityConfig;
use crate::photos::ImageEntry;
use crate::state::SceneState;

/// Glyph for a particle at its displayed transform
pub fn particle_glyph(entity: &EntityConfig, transform: &Transform) -> RenderGlyph {
    RenderGlyph::new(entity.kind.symbol().to_string(), transform.position)
        .with_color(entity.color)
        .with_scale(transform.scale.max_component())
}

/// Framed glyph for an image, labelled with the first letter of its name
pub fn image_glyph(entry: &ImageEntry) -> RenderGlyph {
    let transform = entry.transform();
    let label = entry
        .source
        .name()
        .chars()
        .next()
        .map(|c| c.to_ascii_uppercase())
        .unwrap_or('?');
    let color = if entry.is_selected() {
        Color::White
    } else {
        Color::PHOTO_FRAME
    };
    RenderGlyph::new(label.to_string(), transform.position)
        .with_color(color)
        .with_scale(transform.scale.max_component())
        .with_texture(entry.texture)
        .framed()
}

pub(super) fn render_particles(state: &SceneState, backend: &mut dyn RenderBackend) {
    for (entity, transform) in state.particles() {
        backend.draw_glyph(&particle_glyph(entity, transform));
    }
}

pub(super) fn render_images(state: &SceneState, backend: &mut dyn RenderBackend) {
    for entry in state.photos.entries() {
        backend.draw_glyph(&image_glyph(entry));
    }
}
