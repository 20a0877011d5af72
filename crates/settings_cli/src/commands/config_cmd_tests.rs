use super::*;
use std::fs;
use tempfile::TempDir;

fn path_in(temp_dir: &TempDir, name: &str) -> String {
    temp_dir.path().join(name).to_string_lossy().into_owned()
}

#[test]
fn test_init_creates_default_configuration() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let path = path_in(&temp_dir, "settings.toml");

    let output = execute(ConfigCommands::Init { path: Some(path.clone()) }, None)
        .expect("init should succeed");

    assert!(output.starts_with("Configuration initialized"));
    let loaded = AppConfig::load(std::path::Path::new(&path)).expect("Failed to load config");
    assert_eq!(loaded, AppConfig::default());
}

#[test]
fn test_init_refuses_to_overwrite() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let path = path_in(&temp_dir, "settings.toml");
    fs::write(&path, "[tenant]\nname = \"keep-me\"\n").expect("Failed to write config");

    let result = execute(ConfigCommands::Init { path: Some(path.clone()) }, None);

    assert!(matches!(result, Err(Error::Config(msg)) if msg.contains("already exists")));
    let content = fs::read_to_string(&path).expect("Failed to read config");
    assert!(content.contains("keep-me"));
}

#[test]
fn test_init_uses_global_config_path() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let path = path_in(&temp_dir, "global.toml");

    execute(ConfigCommands::Init { path: None }, Some(&path)).expect("init should succeed");

    assert!(temp_dir.path().join("global.toml").exists());
}

#[test]
fn test_validate_accepts_default_configuration() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let path = path_in(&temp_dir, "settings.toml");
    execute(ConfigCommands::Init { path: Some(path.clone()) }, None).expect("init should succeed");

    let output = execute(ConfigCommands::Validate { path: Some(path) }, None)
        .expect("validate should succeed");

    assert!(output.starts_with("Configuration is valid"));
}

#[test]
fn test_validate_reports_missing_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let path = path_in(&temp_dir, "missing.toml");

    let result = execute(ConfigCommands::Validate { path: Some(path) }, None);

    assert!(matches!(result, Err(Error::Config(msg)) if msg.contains("not found")));
}

#[test]
fn test_validate_reports_missing_schema_dir() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let path = path_in(&temp_dir, "settings.toml");
    let schema_dir = temp_dir.path().join("schemas");
    fs::write(
        &path,
        format!("[validation]\nschema_dir = {:?}\n", schema_dir.to_string_lossy()),
    )
    .expect("Failed to write config");

    let result = execute(ConfigCommands::Validate { path: Some(path) }, None);

    assert!(matches!(result, Err(Error::Config(msg)) if msg.contains("schema directory")));
}

#[test]
fn test_show_prints_defaults_without_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let path = path_in(&temp_dir, "missing.toml");

    let output =
        execute(ConfigCommands::Show { path: Some(path) }, None).expect("show should succeed");

    assert!(output.contains("[storage]"));
    assert!(output.contains("data_dir = \"settings-data\""));
    assert!(output.contains("builtin_categories = true"));
}
