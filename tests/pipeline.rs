//! Hand pose → landmarks → classifier → slot → scene, without a terminal

use arbor::scene::input::{signal_slot, synthesize_landmarks, GestureClassifier, HandPose};
use arbor::tree::ImageId;
use arbor::{ArborConfig, FormationPolicy, FormationState, SceneState, Settings};

fn settings(policy: FormationPolicy) -> Settings {
    Settings::from(&ArborConfig::default())
        .with_seed(42)
        .with_particles(60)
        .with_policy(policy)
        .with_images(vec![
            "north.jpg".into(),
            "east.jpg".into(),
            "south.jpg".into(),
            "west.jpg".into(),
        ])
}

#[test]
fn test_hand_poses_flow_through_to_scene() {
    let classifier = GestureClassifier::default();
    let (publisher, reader) = signal_slot();
    let mut state = SceneState::new(&settings(FormationPolicy::Immediate), reader);

    let show = |pose: HandPose| classifier.classify(Some(&synthesize_landmarks(&pose)));

    publisher.publish(show(HandPose::new(0.5, 0.6, true, false)));
    state.update(1.0 / 60.0);
    assert_eq!(state.formation, FormationState::Exploded);
    assert_eq!(state.selection, None);

    publisher.publish(show(HandPose::new(0.5, 0.6, false, true)));
    state.update(1.0 / 60.0);
    assert_eq!(state.formation, FormationState::Tree);
    assert_eq!(state.selection, Some(ImageId::from_index(2)));

    publisher.publish(show(HandPose::new(0.95, 0.6, false, true)));
    state.update(1.0 / 60.0);
    assert_eq!(state.selection, Some(ImageId::from_index(0)));

    publisher.publish(None);
    state.update(1.0 / 60.0);
    assert_eq!(state.formation, FormationState::Tree);
    assert_eq!(state.selection, None);
}

#[test]
fn test_debounced_scene_ignores_flicker() {
    let classifier = GestureClassifier::default();
    let (publisher, reader) = signal_slot();
    let mut state = SceneState::new(&settings(FormationPolicy::Debounce { frames: 3 }), reader);

    for frame in 0..30 {
        let pose = HandPose::new(0.5, 0.6, frame % 2 == 0, false);
        publisher.publish(classifier.classify(Some(&synthesize_landmarks(&pose))));
        state.update(1.0 / 60.0);
    }
    assert_eq!(state.formation, FormationState::Tree);
    assert_eq!(state.stats.formation_changes, 0);
}

#[test]
fn test_same_seed_same_formation() -> anyhow::Result<()> {
    let a = arbor::run_headless(settings(FormationPolicy::default()), 5)?;
    let b = arbor::run_headless(settings(FormationPolicy::default()), 5)?;
    assert_eq!(a.seed, b.seed);
    assert_eq!(a.particles, 60);
    assert_eq!(a.images, 4);

    let (_p1, r1) = signal_slot();
    let (_p2, r2) = signal_slot();
    let s1 = SceneState::new(&settings(FormationPolicy::default()), r1);
    let s2 = SceneState::new(&settings(FormationPolicy::default()), r2);
    let t1: Vec<_> = s1.table.iter().map(|e| e.tree_target).collect();
    let t2: Vec<_> = s2.table.iter().map(|e| e.tree_target).collect();
    assert_eq!(t1, t2);
    Ok(())
}
