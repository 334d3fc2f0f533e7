//! Key handling for the interactive view

use arbor_scene::input::{HandPose, HandSimulator, SlotWriter};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use tracing::info;

use crate::controller::FormationPolicy;
use crate::state::SceneState;

/// Keyboard-driven hand feeding the detection loop
pub struct KeyboardHand {
    simulator: HandSimulator,
    poses: SlotWriter<Option<HandPose>>,
}

impl KeyboardHand {
    /// Publishes the simulator's starting pose right away
    pub fn new(simulator: HandSimulator, poses: SlotWriter<Option<HandPose>>) -> Self {
        poses.publish(simulator.pose());
        Self { simulator, poses }
    }

    fn process_key(&mut self, key: KeyEvent) -> bool {
        if !self.simulator.process_key(key) {
            return false;
        }
        self.poses.publish(self.simulator.pose());
        true
    }

    fn reset(&mut self) {
        self.simulator.reset();
        self.poses.publish(self.simulator.pose());
    }
}

/// Handle a key press. Returns false to quit.
pub fn handle_key(key: KeyEvent, state: &mut SceneState, hand: Option<&mut KeyboardHand>) -> bool {
    if key.kind != KeyEventKind::Press {
        return true;
    }

    if key.code == KeyCode::Esc {
        return false;
    }

    if let Some(hand) = hand {
        if hand.process_key(key) {
            return true;
        }
        if matches!(key.code, KeyCode::Char('r') | KeyCode::Char('R')) {
            hand.reset();
            state.set_status("Hand reset");
            return true;
        }
    }

    if matches!(key.code, KeyCode::Char('m') | KeyCode::Char('M')) {
        let next = match (state.controller.policy(), state.configured_policy) {
            (FormationPolicy::Debounce { .. }, _) => FormationPolicy::Immediate,
            (FormationPolicy::Immediate, configured @ FormationPolicy::Debounce { .. }) => configured,
            (FormationPolicy::Immediate, FormationPolicy::Immediate) => FormationPolicy::default(),
        };
        state.controller.set_policy(next);
        info!(policy = %next, "Formation policy changed");
        state.set_status(format!("Policy: {}", next));
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use arbor_scene::input::{latest_slot, signal_slot};
    use crossterm::event::KeyModifiers;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::empty())
    }

    fn state() -> SceneState {
        let (_publisher, reader) = signal_slot();
        SceneState::new(&Settings::default().with_particles(4).with_seed(1), reader)
    }

    #[test]
    fn test_hand_keys_publish_pose() {
        let mut state = state();
        let (writer, reader) = latest_slot(None);
        let mut hand = KeyboardHand::new(HandSimulator::new(), writer);
        assert_eq!(reader.sequence(), 1);
        assert!(reader.latest().is_some());

        assert!(handle_key(press(KeyCode::Char('h')), &mut state, Some(&mut hand)));
        assert_eq!(reader.latest(), None);

        assert!(handle_key(press(KeyCode::Char('r')), &mut state, Some(&mut hand)));
        assert!(reader.latest().is_some());
        assert_eq!(state.status_message.as_deref(), Some("Hand reset"));
    }

    #[test]
    fn test_policy_toggle() {
        let mut state = state();
        assert!(handle_key(press(KeyCode::Char('m')), &mut state, None));
        assert_eq!(state.controller.policy(), FormationPolicy::Immediate);
        assert!(handle_key(press(KeyCode::Char('m')), &mut state, None));
        assert_eq!(state.controller.policy(), FormationPolicy::default());
    }

    #[test]
    fn test_escape_quits() {
        let mut state = state();
        assert!(!handle_key(press(KeyCode::Esc), &mut state, None));
    }
}
