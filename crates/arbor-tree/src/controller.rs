//! Gesture signal → formation and selection
//!
//! Runs once per render frame on whatever signal the detection loop last
//! published. The same sample is usually seen on several render frames, so
//! debouncing counts distinct samples by their publish sequence. Formation
//! may be debounced; selection never is.

use std::fmt;

use arbor_config::{ControllerConfig, FormationMode};
use arbor_scene::GestureSignal;
use tracing::debug;

use crate::photos::ImageId;

/// Global arrangement of the entity cloud
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormationState {
    #[default]
    Tree,
    Exploded,
}

impl fmt::Display for FormationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormationState::Tree => write!(f, "tree"),
            FormationState::Exploded => write!(f, "exploded"),
        }
    }
}

/// How formation reacts to a change in the desired value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormationPolicy {
    /// Follow the signal every frame; oscillating input toggles every frame
    Immediate,
    /// Change only after `frames` consecutive samples want the new value
    Debounce { frames: u32 },
}

impl Default for FormationPolicy {
    fn default() -> Self {
        FormationPolicy::Debounce { frames: 3 }
    }
}

impl From<&ControllerConfig> for FormationPolicy {
    fn from(config: &ControllerConfig) -> Self {
        match config.mode {
            FormationMode::Immediate => FormationPolicy::Immediate,
            FormationMode::Debounce => FormationPolicy::Debounce {
                frames: config.dwell_frames,
            },
        }
    }
}

impl fmt::Display for FormationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormationPolicy::Immediate => write!(f, "immediate"),
            FormationPolicy::Debounce { frames } => write!(f, "debounce({})", frames),
        }
    }
}

/// Image index for a wrist position.
///
/// The camera image is mirrored, so `x = 0` selects the last image and
/// `x = 1` the first. Always in `[0, count - 1]`; `None` when there are no
/// images.
pub fn select_index(wrist_x: f32, count: usize) -> Option<usize> {
    if count == 0 {
        return None;
    }
    let raw = ((1.0 - wrist_x) * count as f32).floor();
    // Negative and NaN both saturate to 0
    Some((raw as usize).min(count - 1))
}

/// Output of one controller step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneDecision {
    pub formation: FormationState,
    pub selection: Option<ImageId>,
    /// Formation differs from the previous frame
    pub formation_changed: bool,
}

/// Holds formation state across frames
#[derive(Debug, Clone)]
pub struct SceneStateController {
    policy: FormationPolicy,
    formation: FormationState,
    /// Candidate formation and how many consecutive samples asked for it
    pending: Option<(FormationState, u32)>,
    /// Sequence of the sample seen on the previous step
    last_sequence: Option<u64>,
    toggles: u64,
}

impl SceneStateController {
    pub fn new(policy: FormationPolicy) -> Self {
        Self {
            policy,
            formation: FormationState::Tree,
            pending: None,
            last_sequence: None,
            toggles: 0,
        }
    }

    pub fn policy(&self) -> FormationPolicy {
        self.policy
    }

    /// Switch policy; pending debounce progress is dropped
    pub fn set_policy(&mut self, policy: FormationPolicy) {
        self.policy = policy;
        self.pending = None;
    }

    pub fn formation(&self) -> FormationState {
        self.formation
    }

    /// Formation changes so far
    pub fn toggles(&self) -> u64 {
        self.toggles
    }

    /// Advance one frame with a sample that has not been seen before
    pub fn step(&mut self, signal: Option<&GestureSignal>, image_count: usize) -> SceneDecision {
        let sequence = self.last_sequence.map_or(0, |s| s.wrapping_add(1));
        self.step_sample(signal, sequence, image_count)
    }

    /// Advance one frame with the sample published under `sequence`.
    ///
    /// A sample seen again on a later frame does not count toward the
    /// debounce streak. Image ids are assigned in upload order starting at
    /// 0, so the selected index is also the selected id.
    pub fn step_sample(
        &mut self,
        signal: Option<&GestureSignal>,
        sequence: u64,
        image_count: usize,
    ) -> SceneDecision {
        let fresh = self.last_sequence != Some(sequence);
        self.last_sequence = Some(sequence);

        let Some(signal) = signal else {
            // No hand: fail safe right away, whatever the policy
            self.pending = None;
            let formation_changed = self.set_formation(FormationState::Tree);
            return SceneDecision {
                formation: self.formation,
                selection: None,
                formation_changed,
            };
        };

        let desired = if signal.is_open {
            FormationState::Exploded
        } else {
            FormationState::Tree
        };

        let formation_changed = match self.policy {
            FormationPolicy::Immediate => self.set_formation(desired),
            FormationPolicy::Debounce { frames } => self.debounce(desired, frames.max(1), fresh),
        };

        let selection = if signal.is_pinching {
            select_index(signal.wrist.x, image_count).map(ImageId::from_index)
        } else {
            None
        };

        SceneDecision {
            formation: self.formation,
            selection,
            formation_changed,
        }
    }

    fn debounce(&mut self, desired: FormationState, frames: u32, fresh: bool) -> bool {
        if desired == self.formation {
            self.pending = None;
            return false;
        }
        if !fresh {
            return false;
        }

        let streak = match self.pending {
            Some((candidate, streak)) if candidate == desired => streak + 1,
            _ => 1,
        };

        if streak >= frames {
            self.pending = None;
            self.set_formation(desired)
        } else {
            self.pending = Some((desired, streak));
            false
        }
    }

    fn set_formation(&mut self, next: FormationState) -> bool {
        if next == self.formation {
            return false;
        }
        debug!(from = %self.formation, to = %next, "Formation changed");
        self.formation = next;
        self.toggles += 1;
        true
    }
}

impl Default for SceneStateController {
    fn default() -> Self {
        Self::new(FormationPolicy::default())
    }
}
