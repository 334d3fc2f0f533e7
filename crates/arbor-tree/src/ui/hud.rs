//! Screen-space status lines

use arbor_scene::renderer::{Color, RenderBackend};

use crate::controller::FormationState;
use crate::state::SceneState;

const DIM: Color = Color::Rgb(80, 85, 90);

pub(super) fn render_status(state: &SceneState, backend: &mut dyn RenderBackend) {
    let x = 0.01;
    let y = 0.01;

    let formation_color = match state.formation {
        FormationState::Tree => Color::NEEDLE,
        FormationState::Exploded => Color::GOLD,
    };
    backend.draw_hud_text(x, y, "arbor", Color::HUD);
    backend.draw_hud_text(x + 0.08, y, &state.formation.to_string(), formation_color);
    backend.draw_hud_text(
        x + 0.20,
        y,
        &format!("policy: {}", state.controller.policy()),
        DIM,
    );

    let (hand, hand_color) = match &state.signal {
        Some(signal) => (signal.describe(), Color::White),
        None => ("no hand".to_string(), Color::DarkGrey),
    };
    backend.draw_hud_text(x, y + 0.05, &format!("hand: {}", hand), hand_color);

    if let Some(message) = &state.status_message {
        backend.draw_hud_text(x, y + 0.10, message, Color::Yellow);
    }
}

pub(super) fn render_selection(state: &SceneState, backend: &mut dyn RenderBackend) {
    let y = 0.88;
    match state.photos.selected() {
        Some(entry) => {
            let text = format!(
                "▸ {} {} ({})",
                entry.id,
                entry.source.name(),
                entry.style.name()
            );
            backend.draw_hud_text(0.01, y, &text, Color::White);
        }
        None if state.photos.is_empty() => {
            backend.draw_hud_text(0.01, y, "no images loaded", DIM);
        }
        None => {
            let text = format!("{} images, pinch to grab", state.photos.len());
            backend.draw_hud_text(0.01, y, &text, DIM);
        }
    }
}

pub(super) fn render_help(state: &SceneState, backend: &mut dyn RenderBackend) {
    // Hide after the first ten seconds
    if state.elapsed > 10.0 {
        return;
    }
    backend.draw_hud_text(
        0.01,
        0.95,
        "←→↑↓: Move hand  O: Open/fist  P: Pinch  H: Hide hand  M: Policy  Q: Quit",
        Color::Rgb(45, 50, 55),
    );
}
