use sitemap_render::config::{Config, ConfigError};
use std::path::Path;
use tempfile::TempDir;

/// Test that Config::default() produces the documented values.
#[test]
fn test_config_default_values() {
    let config = Config::default();

    assert_eq!(config.rendering.sitemap_type, "smarthome");
    assert_eq!(config.rendering.topic_root, "smarthome/sitemaps");
    assert_eq!(config.rendering.icon_path, "/icon");
    assert_eq!(config.events.channel_capacity, 256);
    assert!(config.paths.sitemaps_dir.is_none());
    assert!(config.paths.translations_dir.is_none());
    assert_eq!(config.logging.filter, "info");
    assert!(config.validate().is_ok());
}

/// Test that Config::config_path() returns a path ending with the expected filename.
#[test]
fn test_config_path_ends_with_expected() {
    let path = Config::config_path();
    assert!(path.ends_with("sitemap-render/config.toml"));
}

/// Test loading a complete config file.
#[test]
fn test_load_full_config() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[rendering]
sitemap_type = "classic"
topic_root = "home/ui"
icon_path = "/static/icons"

[events]
channel_capacity = 16

[paths]
sitemaps_dir = "/etc/home/sitemaps"
translations_dir = "/etc/home/i18n"

[logging]
filter = "sitemap_render=debug"
"#,
    )
    .unwrap();

    let config = Config::load_from(&path).unwrap();

    assert_eq!(config.rendering.sitemap_type, "classic");
    assert_eq!(config.rendering.topic_root, "home/ui");
    assert_eq!(config.rendering.icon_path, "/static/icons");
    assert_eq!(config.events.channel_capacity, 16);
    assert_eq!(
        config.paths.translations_dir.as_deref(),
        Some(Path::new("/etc/home/i18n"))
    );
    assert_eq!(config.logging.filter, "sitemap_render=debug");
}

/// Test that an invalid file is rejected with a validation error.
#[test]
fn test_load_rejects_empty_sitemap_type() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("config.toml");
    std::fs::write(&path, "[rendering]\nsitemap_type = \"  \"\n").unwrap();

    let err = Config::load_from(&path).unwrap_err();

    assert!(matches!(err, ConfigError::ValidationError { .. }));
    assert!(err.to_string().contains("sitemap_type"));
}

/// Test that an unreadable path reports a read error naming the path.
#[test]
fn test_load_directory_is_read_error() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    let err = Config::load_from(temp_dir.path()).unwrap_err();

    assert!(matches!(err, ConfigError::ReadError { .. }));
}
