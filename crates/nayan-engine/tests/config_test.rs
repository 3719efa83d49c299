use nayan_engine::config::{ConfigError, ConfigLoader, NayanConfig};
use std::io::Write;
use tempfile::NamedTempFile;

#[tokio::test]
async fn test_load_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r##"
language: hi
feedback:
  pulse_duration_ms: 350
  pulse_color: "#ff00ff"
  audio_cues: false
picker:
  interactive_tags:
    - "button"
recording:
  cancel_on_escape: false
    "##
    )
    .unwrap();

    let config = ConfigLoader::load_from(file.path())
        .await
        .expect("Failed to load config from file");

    assert_eq!(config.language, "hi");
    assert_eq!(config.feedback.pulse_duration_ms, 350);
    assert_eq!(config.feedback.pulse_outline().color, "#ff00ff");
    assert!(!config.feedback.audio_cues);
    // Untouched fields keep their defaults.
    assert_eq!(config.feedback.toast_duration_ms, 3000);
    assert_eq!(config.picker.interactive_tags, vec!["button".to_string()]);
    assert_eq!(config.picker.interactive_roles, vec!["button".to_string()]);
    assert!(!config.recording.cancel_on_escape);
}

#[tokio::test]
async fn test_empty_file_gives_defaults() {
    let file = NamedTempFile::new().unwrap();

    let config = ConfigLoader::load_from(file.path()).await.unwrap();

    assert_eq!(config.language, "en");
    assert_eq!(config.feedback.pulse_duration_ms, 200);
}

#[test]
fn test_default_values() {
    let config = NayanConfig::default();
    assert_eq!(config.feedback.announce_delay_ms, 50);
    assert_eq!(config.feedback.pulse_color, "#00e676");
    assert!(config.recording.cancel_on_escape);
    assert!(config.storage.path.ends_with("shortcuts.json"));
}

#[tokio::test]
async fn test_load_from_nonexistent_file() {
    let result =
        ConfigLoader::load_from(std::path::Path::new("/nonexistent/path/config.yaml")).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_load_malformed_yaml() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "feedback: [not, a, map").unwrap();

    let result = ConfigLoader::load_from(file.path()).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_explicit_path_overrides_search() {
    let dir = tempfile::tempdir().unwrap();
    let local = dir.path().join("nayan.yaml");
    std::fs::write(&local, "language: en\n").unwrap();
    let explicit = dir.path().join("custom.yaml");
    std::fs::write(&explicit, "language: hi\n").unwrap();
    let loader = ConfigLoader::with_search_paths(vec![local.clone()]);

    assert_eq!(loader.locate(Some(explicit.as_path())).unwrap(), Some(explicit.clone()));
    assert_eq!(loader.load(Some(explicit.as_path())).await.unwrap().language, "hi");
    assert_eq!(loader.locate(None).unwrap(), Some(local));
    assert_eq!(loader.load(None).await.unwrap().language, "en");
}

#[tokio::test]
async fn test_first_existing_search_path_wins() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nayan.yaml");
    let home = dir.path().join("config.yaml");
    std::fs::write(&home, "feedback:\n  pulse_duration_ms: 500\n").unwrap();
    let loader = ConfigLoader::with_search_paths(vec![missing, home.clone()]);

    assert_eq!(loader.locate(None).unwrap(), Some(home));
    assert_eq!(loader.load(None).await.unwrap().feedback.pulse_duration_ms, 500);
}

#[tokio::test]
async fn test_no_config_found_gives_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let loader = ConfigLoader::with_search_paths(vec![dir.path().join("nayan.yaml")]);

    assert_eq!(loader.locate(None).unwrap(), None);
    assert_eq!(loader.load(None).await.unwrap().language, "en");
}

#[tokio::test]
async fn test_missing_explicit_path_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let loader = ConfigLoader::with_search_paths(Vec::new());

    let result = loader.load(Some(dir.path().join("absent.yaml").as_path())).await;
    assert!(matches!(result, Err(ConfigError::NotFound(_))));
}
