use std::path::{Path, PathBuf};

use clap::Parser;
use tech_grid::cli::Cli;
use tech_grid::{ConfigError, FieldConfig};

fn default_config_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("config/default.json")
}

#[test]
fn test_shipped_config_matches_defaults() {
    let loaded = FieldConfig::load(&default_config_path()).unwrap();
    assert_eq!(loaded, FieldConfig::default());
}

#[test]
fn test_missing_file_is_io_error() {
    let err = FieldConfig::load(Path::new("does/not/exist.json")).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}

#[test]
fn test_cli_config_then_overrides() {
    let path = default_config_path();
    let cli = Cli::try_parse_from([
        "tech-grid",
        "--config",
        path.to_str().unwrap(),
        "--particles",
        "40",
        "--seed",
        "9",
        "--no-ui",
    ])
    .unwrap();

    let config = FieldConfig::from_cli(&cli).unwrap();

    assert_eq!(config.particles.count, 40);
    assert_eq!(config.seed, Some(9));
    assert!(!config.show_ui);
    assert_eq!(config.grid.count, 24);
}

#[test]
fn test_cli_bad_color_rejected() {
    let cli = Cli::try_parse_from(["tech-grid", "--color", "purple"]).unwrap();
    let err = FieldConfig::from_cli(&cli).unwrap_err();
    assert!(matches!(err, ConfigError::Color { .. }));
}

#[test]
fn test_scene_flag_enables_character() {
    let cli = Cli::try_parse_from(["tech-grid", "--scene", "robot.glb"]).unwrap();
    let config = FieldConfig::from_cli(&cli).unwrap();

    let character = config.character_settings().unwrap().unwrap();
    assert_eq!(character.path, PathBuf::from("robot.glb"));
    assert_eq!(character.max_points, 20_000);
}

#[test]
fn test_settings_follow_config() {
    let config = FieldConfig::from_json(
        r#"{ "seed": 5, "particles": { "count": 12 }, "animation": { "update_hz": 60 } }"#,
    )
    .unwrap();

    let settings = config.field_settings().unwrap();
    assert_eq!(settings.seed, Some(5));
    assert_eq!(settings.scene.particle_count, 12);
    assert_eq!(settings.driver.update_hz, 60.0);
    assert_eq!(settings.pointer_throttle.as_millis(), 16);
}
