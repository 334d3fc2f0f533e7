//! Per-frame scene state for the tree installation

use arbor_scene::{GestureSignal, SignalReader, SmoothedTransform, Smoother, Transform};

use crate::controller::{FormationPolicy, FormationState, SceneDecision, SceneStateController};
use crate::formation::{EntityConfig, FormationTable};
use crate::photos::{ImageId, PhotoTransitionEngine};
use crate::settings::Settings;

/// Counters reported at the end of a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SceneStats {
    pub frames: u64,
    pub frames_with_hand: u64,
    pub formation_changes: u64,
    /// Frames on which a different image became selected
    pub selection_changes: u64,
}

/// Everything the render loop owns
pub struct SceneState {
    pub table: FormationTable,
    particles: Vec<SmoothedTransform>,
    particle_smoother: Smoother,
    pub controller: SceneStateController,
    /// Policy the session started with
    pub configured_policy: FormationPolicy,
    pub photos: PhotoTransitionEngine,
    signals: SignalReader,
    /// Signal read at the start of the last frame
    pub signal: Option<GestureSignal>,
    pub formation: FormationState,
    pub selection: Option<ImageId>,
    /// Seconds since the session started
    pub elapsed: f32,
    pub stats: SceneStats,
    pub status_message: Option<String>,
}

impl SceneState {
    /// Generate the formation table and ingest the configured images
    pub fn new(settings: &Settings, signals: SignalReader) -> Self {
        let table = FormationTable::generate(&settings.formation, settings.seed);
        let particles = table
            .iter()
            .map(|entity| SmoothedTransform::new(entity.spawn_transform()))
            .collect();

        let mut photos = PhotoTransitionEngine::new(settings.photos, settings.image_smoother);
        photos.ingest(settings.images.clone());

        Self {
            table,
            particles,
            particle_smoother: settings.particle_smoother,
            controller: SceneStateController::new(settings.policy),
            configured_policy: settings.policy,
            photos,
            signals,
            signal: None,
            formation: FormationState::Tree,
            selection: None,
            elapsed: 0.0,
            stats: SceneStats::default(),
            status_message: None,
        }
    }

    /// Run one frame of the pipeline.
    ///
    /// Reads the latest signal without waiting, decides formation and
    /// selection, then moves every particle and image toward its target.
    pub fn update(&mut self, dt: f32) -> SceneDecision {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.elapsed += dt;

        let (signal, sequence) = self.signals.latest_with_sequence();
        self.signal = signal;
        let decision = self
            .controller
            .step_sample(self.signal.as_ref(), sequence, self.photos.len());

        for (entity, particle) in self.table.iter().zip(self.particles.iter_mut()) {
            let target = self
                .table
                .target_transform(entity, decision.formation, self.elapsed);
            particle.approach(&self.particle_smoother, &target, dt);
        }

        self.photos.update(decision.selection, self.elapsed, dt);

        self.stats.frames += 1;
        if self.signal.is_some() {
            self.stats.frames_with_hand += 1;
        }
        if decision.formation_changed {
            self.stats.formation_changes += 1;
        }
        if decision.selection != self.selection && decision.selection.is_some() {
            self.stats.selection_changes += 1;
        }

        self.formation = decision.formation;
        self.selection = decision.selection;
        decision
    }

    /// Displayed transform of every particle alongside its config
    pub fn particles(&self) -> impl Iterator<Item = (&EntityConfig, &Transform)> {
        self.table
            .iter()
            .zip(self.particles.iter().map(|p| p.current()))
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbor_scene::input::signal_slot;
    use arbor_scene::Point3D;

    fn signal(is_open: bool, is_pinching: bool, wrist_x: f32) -> GestureSignal {
        GestureSignal {
            is_open,
            is_pinching,
            pinch_distance: 0.0,
            wrist: Point3D::new(wrist_x, 0.5, 0.0),
            index_tip: Point3D::ORIGIN,
            thumb_tip: Point3D::ORIGIN,
        }
    }

    fn settings() -> Settings {
        Settings::default()
            .with_seed(17)
            .with_particles(50)
            .with_policy(FormationPolicy::Immediate)
            .with_images(vec!["a.png".into(), "b.png".into(), "c.png".into(), "d.png".into()])
    }

    #[test]
    fn test_particles_gather_into_tree_without_hand() {
        let (_publisher, reader) = signal_slot();
        let mut state = SceneState::new(&settings(), reader);

        for _ in 0..600 {
            state.update(1.0 / 60.0);
        }
        assert_eq!(state.formation, FormationState::Tree);
        for (entity, transform) in state.particles() {
            assert!(transform.position.distance(&entity.tree_target) < 1e-2);
        }
        assert_eq!(state.stats.frames, 600);
        assert_eq!(state.stats.frames_with_hand, 0);
    }

    #[test]
    fn test_open_hand_explodes_and_pinch_selects() {
        let (publisher, reader) = signal_slot();
        let mut state = SceneState::new(&settings(), reader);

        publisher.publish(Some(signal(true, false, 0.5)));
        state.update(1.0 / 60.0);
        assert_eq!(state.formation, FormationState::Exploded);
        assert_eq!(state.selection, None);

        publisher.publish(Some(signal(false, true, 0.5)));
        state.update(1.0 / 60.0);
        assert_eq!(state.formation, FormationState::Tree);
        assert_eq!(state.selection, Some(ImageId::from_index(2)));
        assert!(state.photos.get(ImageId::from_index(2)).unwrap().is_selected());

        publisher.publish(None);
        state.update(1.0 / 60.0);
        assert_eq!(state.selection, None);

        assert_eq!(state.stats.formation_changes, 2);
        assert_eq!(state.stats.selection_changes, 1);
        assert_eq!(state.stats.frames_with_hand, 2);
    }

    #[test]
    fn test_render_loop_reuses_stale_signal() {
        let (publisher, reader) = signal_slot();
        let mut state = SceneState::new(&settings(), reader);
        publisher.publish(Some(signal(true, false, 0.5)));
        for _ in 0..10 {
            state.update(1.0 / 60.0);
        }
        assert_eq!(state.stats.frames_with_hand, 10);
        assert_eq!(state.formation, FormationState::Exploded);
    }

    #[test]
    fn test_single_sample_does_not_pass_debounce() {
        let (publisher, reader) = signal_slot();
        let settings = settings().with_policy(FormationPolicy::Debounce { frames: 3 });
        let mut state = SceneState::new(&settings, reader);

        publisher.publish(Some(signal(true, false, 0.5)));
        for _ in 0..4 {
            state.update(1.0 / 60.0);
        }
        assert_eq!(state.formation, FormationState::Tree);
        assert_eq!(state.stats.formation_changes, 0);

        publisher.publish(Some(signal(true, false, 0.5)));
        state.update(1.0 / 60.0);
        publisher.publish(Some(signal(true, false, 0.5)));
        state.update(1.0 / 60.0);
        assert_eq!(state.formation, FormationState::Exploded);
    }

    #[test]
    fn test_bad_dt_is_ignored() {
        let (_publisher, reader) = signal_slot();
        let mut state = SceneState::new(&settings(), reader);
        let before: Vec<_> = state.particles().map(|(_, t)| *t).collect();
        state.update(f32::NAN);
        state.update(-1.0);
        let after: Vec<_> = state.particles().map(|(_, t)| *t).collect();
        assert_eq!(before, after);
        assert_eq!(state.elapsed, 0.0);
    }
}
