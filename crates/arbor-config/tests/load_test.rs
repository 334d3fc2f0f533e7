use std::io::Write;

use arbor_config::{
    candidate_paths, load, load_from_path, ConfigError, FormationMode, CONFIG_ENV_VAR,
    CONFIG_FILE_NAME,
};
use serial_test::serial;

#[test]
fn load_explicit_path() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[scene]
particle_count = 120
seed = 42

[photos]
active_scale = 2.5
"#
    )
    .unwrap();

    let config = load(Some(file.path())).unwrap();
    assert_eq!(config.scene.particle_count, 120);
    assert_eq!(config.scene.seed, Some(42));
    assert_eq!(config.photos.active_scale, 2.5);
    assert_eq!(config.controller.mode, FormationMode::Debounce);
}

#[test]
fn missing_explicit_path_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load(Some(&dir.path().join("nope.toml"))).unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
}

#[test]
fn parse_error_reports_path() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[display]\nfps = \"fast\"").unwrap();

    let err = load_from_path(file.path()).unwrap_err();
    match err {
        ConfigError::Parse { path, .. } => assert_eq!(path, file.path()),
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
#[serial]
fn env_var_points_at_config() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[controller]\nmode = \"immediate\"").unwrap();

    std::env::set_var(CONFIG_ENV_VAR, file.path());
    let config = load(None);
    std::env::remove_var(CONFIG_ENV_VAR);

    assert_eq!(config.unwrap().controller.mode, FormationMode::Immediate);
}

#[test]
#[serial]
fn env_var_is_searched_before_working_dir() {
    std::env::set_var(CONFIG_ENV_VAR, "/etc/arbor/custom.toml");
    let paths = candidate_paths();
    std::env::remove_var(CONFIG_ENV_VAR);

    assert_eq!(paths[0], std::path::PathBuf::from("/etc/arbor/custom.toml"));
    assert_eq!(paths[1], std::path::PathBuf::from(CONFIG_FILE_NAME));

    let without_env = candidate_paths();
    assert_eq!(without_env[0], std::path::PathBuf::from(CONFIG_FILE_NAME));
}
