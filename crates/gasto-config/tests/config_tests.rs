use std::path::PathBuf;

use gasto_config::{Config, ConfigError, ConfigManager};
use tempfile::tempdir;

#[test]
fn default_config_matches_dashboard_defaults() {
    let cfg = Config::default();

    assert_eq!(cfg.locale, "pt-BR");
    assert_eq!(cfg.top_expenses, 5);
    assert!(cfg.ui_color_enabled);
    assert!(cfg.last_user.is_none());
}

#[test]
fn missing_file_loads_defaults() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path()).expect("manager");
    assert_eq!(manager.load().expect("load"), Config::default());
    assert!(manager.backups_dir().exists());
}

#[test]
fn config_manager_persists_and_loads_config() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::new(dir.path().join("config.json"), dir.path().join("backups"));

    let mut cfg = Config::default();
    cfg.set("top_expenses", "3").expect("set");
    cfg.set("ui_color_enabled", "off").expect("set");
    cfg.last_user = Some("alice".into());

    manager.save(&cfg).expect("save config");
    let loaded = manager.load().expect("load config");

    assert_eq!(loaded, cfg);
    assert!(!dir.path().join("config.json.tmp").exists());
}

#[test]
fn partial_files_fall_back_to_defaults() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{ "top_expenses": 9 }"#).expect("write");
    let manager = ConfigManager::new(path, dir.path().join("backups"));

    let loaded = manager.load().expect("load");
    assert_eq!(loaded.top_expenses, 9);
    assert_eq!(loaded.locale, "pt-BR");
}

#[test]
fn backups_can_be_listed_and_restored() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path()).expect("manager");

    let mut cfg = Config::default();
    cfg.locale = "en-US".into();
    let name = manager.backup(&cfg, Some("Before import")).expect("backup");
    assert!(name.starts_with("config_"));
    assert!(name.ends_with("_before-import.json"));
    assert_eq!(manager.list_backups().expect("list"), vec![name.clone()]);

    manager.save(&Config::default()).expect("save");
    let restored = manager.restore(&name).expect("restore");
    assert_eq!(restored.locale, "en-US");
    assert_eq!(manager.load().expect("load").locale, "en-US");
}

#[test]
fn restoring_unknown_backup_fails() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path()).expect("manager");
    assert!(matches!(
        manager.restore("config_19990101_000000.json"),
        Err(ConfigError::BackupNotFound(_))
    ));
}

#[test]
fn invalid_settings_are_rejected() {
    let mut cfg = Config::default();
    assert!(cfg.set("top_expenses", "0").is_err());
    assert!(cfg.set("chart_height", "abc").is_err());
    assert!(cfg.set("theme", "dark").is_err());
    assert_eq!(cfg, Config::default());

    cfg.set("data_root", "/tmp/gasto").expect("set");
    assert_eq!(cfg.data_root, Some(PathBuf::from("/tmp/gasto")));
    assert_eq!(
        cfg.resolve_data_root(std::path::Path::new("/base")),
        PathBuf::from("/tmp/gasto")
    );
}
