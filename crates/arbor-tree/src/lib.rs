//! arbor-tree: a hand-tracked particle tree
//!
//! An open hand explodes the tree into a swirling shell, a fist gathers it
//! back, and a pinch grabs one of the loaded images, chosen by where the
//! hand is across the camera's view.
//!
//! Controls (keyboard hand in the terminal view):
//! - Arrows: move the hand
//! - O: toggle open/fist
//! - P: toggle pinch
//! - H: show/hide the hand
//! - R: reset the hand
//! - M: switch between immediate and debounced formation changes
//! - Q / Esc / Ctrl-C: quit

pub mod controller;
pub mod formation;
mod handlers;
pub mod photos;
pub mod settings;
pub mod state;
pub mod ui;

use std::fmt;

use anyhow::Context;
use arbor_scene::app::{SceneApp, SceneAppRunner};
use arbor_scene::input::{
    latest_slot, signal_slot, DetectionHandle, DetectionLoop, HandDetector, HandSimulator,
    PoseDetector, ScriptedDetector, SignalReader, SimulatedCamera,
};
use arbor_scene::renderer::{terminal::TerminalBackend, RecordingBackend, RenderBackend};
use arbor_scene::Transform;
use crossterm::event::KeyEvent;
use tracing::{debug, info};

pub use controller::{select_index, FormationPolicy, FormationState, SceneStateController};
pub use formation::{tree_position, EntityConfig, EntityId, FormationParams, FormationTable, VisualKind};
pub use handlers::KeyboardHand;
pub use photos::{ImageEntry, ImageId, ImageSource, PhotoParams, PhotoTransitionEngine, TransitionStyle};
pub use settings::Settings;
pub use state::{SceneState, SceneStats};

/// The installation as a frame-driven app
pub struct TreeApp {
    settings: Settings,
    signals: SignalReader,
    hand: Option<KeyboardHand>,
}

impl TreeApp {
    pub fn new(settings: Settings, signals: SignalReader) -> Self {
        Self {
            settings,
            signals,
            hand: None,
        }
    }

    /// Drive the hand from the keyboard
    pub fn with_keyboard_hand(mut self, hand: KeyboardHand) -> Self {
        self.hand = Some(hand);
        self
    }
}

impl SceneApp for TreeApp {
    type State = SceneState;

    fn init(&mut self) -> SceneState {
        SceneState::new(&self.settings, self.signals.clone())
    }

    fn prepare(&mut self, state: &mut SceneState, backend: &mut dyn RenderBackend) {
        let missing: Vec<(ImageId, String)> = state
            .photos
            .entries()
            .iter()
            .filter(|entry| entry.texture.is_none())
            .map(|entry| (entry.id, entry.source.location().to_string()))
            .collect();

        let mut loaded = 0;
        for (id, location) in missing {
            if let Some(texture) = backend.load_texture(&location) {
                state.photos.set_texture(id, texture);
                loaded += 1;
            }
        }
        debug!(loaded, total = state.photos.len(), "Image textures");
    }

    fn handle_key(&mut self, key: KeyEvent, state: &mut SceneState) -> bool {
        handlers::handle_key(key, state, self.hand.as_mut())
    }

    fn update(&mut self, state: &mut SceneState, dt: f32) {
        state.update(dt);
    }

    fn render(&self, state: &SceneState, backend: &mut dyn RenderBackend) {
        ui::render_tree(state, backend);
    }
}

/// Start detection, degrading to "no hand" if it cannot start.
/// The detection loop has already logged the failure.
fn start_detection<D: HandDetector>(
    settings: &Settings,
    detector: D,
) -> (SignalReader, Option<DetectionHandle>) {
    let (publisher, signals) = signal_slot();
    let camera = SimulatedCamera::new(settings.detection_fps);
    let detection = DetectionLoop::start(camera, detector, settings.classifier, publisher).ok();
    (signals, detection)
}

fn viewer_camera(settings: &Settings) -> Transform {
    Transform::from_position(settings.viewer)
}

/// Run the interactive terminal view until the user quits
pub fn run_interactive(settings: Settings) -> anyhow::Result<SceneStats> {
    let simulator = HandSimulator::new();
    let (pose_writer, pose_reader) = latest_slot(simulator.pose());
    let (signals, detection) = start_detection(&settings, PoseDetector::new(pose_reader));

    let mut backend = TerminalBackend::new().context("failed to open terminal backend")?;
    backend.set_camera(viewer_camera(&settings));

    let fps = settings.fps;
    let app = TreeApp::new(settings, signals)
        .with_keyboard_hand(KeyboardHand::new(simulator, pose_writer));
    let mut runner = SceneAppRunner::new(app, backend).with_fps(fps);
    let result = runner.run();

    let detection_frames = detection.map(DetectionHandle::stop).unwrap_or(0);
    let state = result.context("terminal view failed")?;
    info!(
        frames = state.stats.frames,
        detection_frames,
        formation_changes = state.stats.formation_changes,
        "Session ended"
    );
    Ok(state.stats)
}

/// Result of a headless run
#[derive(Debug, Clone)]
pub struct HeadlessSummary {
    pub seed: u64,
    pub particles: usize,
    pub images: usize,
    pub policy: FormationPolicy,
    pub stats: SceneStats,
    pub detection_frames: u64,
    pub final_formation: FormationState,
    pub final_selection: Option<ImageId>,
    /// Rasterized last frame
    pub snapshot: Vec<String>,
}

impl fmt::Display for HeadlessSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "seed:              {}", self.seed)?;
        writeln!(f, "particles:         {}", self.particles)?;
        writeln!(f, "images:            {}", self.images)?;
        writeln!(f, "policy:            {}", self.policy)?;
        writeln!(f, "frames rendered:   {}", self.stats.frames)?;
        writeln!(f, "frames with hand:  {}", self.stats.frames_with_hand)?;
        writeln!(f, "detection frames:  {}", self.detection_frames)?;
        writeln!(f, "formation changes: {}", self.stats.formation_changes)?;
        writeln!(f, "selection changes: {}", self.stats.selection_changes)?;
        writeln!(f, "final formation:   {}", self.final_formation)?;
        match self.final_selection {
            Some(id) => writeln!(f, "final selection:   {}", id),
            None => writeln!(f, "final selection:   none"),
        }
    }
}

/// Run `frames` frames against the scripted detector without a terminal
pub fn run_headless(settings: Settings, frames: u64) -> anyhow::Result<HeadlessSummary> {
    let (signals, detection) =
        start_detection(&settings, ScriptedDetector::new(settings.detection_fps));

    let mut backend = RecordingBackend::new(100, 32);
    backend.set_camera(viewer_camera(&settings));

    let fps = settings.fps;
    let policy = settings.policy;
    let mut runner = SceneAppRunner::new(TreeApp::new(settings, signals), backend).with_fps(fps);
    let result = runner.run_frames(frames);

    let detection_frames = detection.map(DetectionHandle::stop).unwrap_or(0);
    let state = result.context("headless run failed")?;

    Ok(HeadlessSummary {
        seed: state.table.seed(),
        particles: state.table.len(),
        images: state.photos.len(),
        policy,
        stats: state.stats,
        detection_frames,
        final_formation: state.formation,
        final_selection: state.selection,
        snapshot: runner.backend().snapshot(),
    })
}
