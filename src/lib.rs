//! Hand-tracked particle tree
//!
//! Re-exports the workspace crates under one name.

pub use arbor_config as config;
pub use arbor_scene as scene;
pub use arbor_tree as tree;

pub use arbor_config::ArborConfig;
pub use arbor_tree::{
    run_headless, run_interactive, FormationPolicy, FormationState, HeadlessSummary, SceneState,
    Settings,
};
