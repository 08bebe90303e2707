//! Unit tests for configuration loading and validation
//!
//! These tests verify config parsing, validation, and location resolution.

use local_backup_manager::config::{load_config, resolve_all_locations, ConfigError};
use std::fs;
use test_utils::{
    minimal_config_toml, multi_location_config_toml, render_config, ConfigBuilder,
    LocationTarget, ResultAssertions, TestContext,
};

#[test]
fn test_config_loading_valid() {
    let builder = ConfigBuilder::minimal().add_glob_location("plugins/*");
    let (config, temp_dir) = builder.persist();

    // Write config to file
    let config_path = temp_dir.path().join("config.toml");
    let toml_str = toml::to_string_pretty(&config).unwrap();
    fs::write(&config_path, toml_str).unwrap();

    // Load and verify
    let loaded = load_config(&config_path);
    assert!(loaded.is_ok(), "Config should load successfully: {:?}", loaded.err());

    let loaded_config = loaded.unwrap();
    assert_eq!(loaded_config.locations.len(), 2);
    assert_eq!(loaded_config.global.storage_directory, config.global.storage_directory);
}

#[test]
fn test_minimal_template_loads() {
    let ctx = TestContext::new();
    let content = render_config(
        minimal_config_toml(),
        &ctx.temp_dir().join("backups"),
        ctx.temp_dir(),
        &ctx.temp_dir().join("logs"),
    );
    let config_path = ctx.create_file("config.toml", &content);

    let config = load_config(&config_path).assert_ok();
    assert_eq!(config.global.file_name_format, "Backup-%Y-%m-%d--%H-%M-%S.zip");
    assert_eq!(config.global.time_zone, "UTC");
}

#[test]
fn test_multi_location_resolution() {
    let ctx = TestContext::new();
    let content = render_config(
        multi_location_config_toml(),
        &ctx.temp_dir().join("backups"),
        ctx.temp_dir(),
        &ctx.temp_dir().join("logs"),
    );
    let config_path = ctx.create_file("config.toml", &content);

    let config = load_config(&config_path).assert_ok();
    let locations = resolve_all_locations(&config).assert_ok();

    assert_eq!(locations.len(), 3);

    let world = &locations[0];
    assert_eq!(world.target, LocationTarget::Path("world".to_string()));
    assert_eq!(world.keep_count, 5);
    assert_eq!(world.blacklist, vec!["*.lock", "logs/**"]);

    let plugins = &locations[1];
    assert_eq!(plugins.target, LocationTarget::Glob("plugins/*".to_string()));
    assert_eq!(plugins.keep_count, 2);
    assert_eq!(plugins.blacklist, vec!["*.lock"]);

    let archive = &locations[2];
    assert!(!archive.create);
    assert_eq!(archive.keep_count, 1);
}

#[test]
fn test_invalid_time_zone_rejected() {
    let ctx = TestContext::new();
    let config_path = ctx.create_file(
        "config.toml",
        r#"
[global]
time_zone = "Mars/Olympus"
"#,
    );

    let result = load_config(&config_path);
    assert!(matches!(result, Err(ConfigError::ValidationError(_))));
}

#[test]
fn test_fixed_offset_time_zone_accepted() {
    let ctx = TestContext::new();
    let config_path = ctx.create_file(
        "config.toml",
        r#"
[global]
time_zone = "+02:00"
"#,
    );

    load_config(&config_path).assert_ok();
}

#[test]
fn test_location_format_validated() {
    let ctx = TestContext::new();
    let config_path = ctx.create_file(
        "config.toml",
        r#"
[global]

[[locations]]
path = "world"
format = "world-%Y.zip"
"#,
    );

    // Year alone cannot be parsed back into a timestamp
    load_config(&config_path).assert_err_contains("locations[0]");
}

#[test]
fn test_keep_count_below_minus_one_rejected() {
    let config = ConfigBuilder::minimal().with_keep_count(-5).build();
    let result = local_backup_manager::config::validate_config(&config);
    assert!(result.is_err());
}
