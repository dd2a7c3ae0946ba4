use std::fs;
use std::path::Path;
use tempfile::tempdir;
use tooldesk_settings::{AppConfig, ConfigStore, SettingsError, SettingsUpdate};

#[test]
fn load_missing_file_returns_defaults() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("config.json");

    let store = ConfigStore::load(&path);
    assert_eq!(store.config(), &AppConfig::default());
    assert!(!path.exists());
}

#[test]
fn update_and_reload_roundtrip() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("ToolDesk").join("config.json");

    let mut store = ConfigStore::load(&path);
    store
        .update(&SettingsUpdate {
            theme: Some("dark".into()),
            language: Some("zh-TW".into()),
            editor_font_size: Some(15),
            ..SettingsUpdate::default()
        })
        .expect("save");

    let reloaded = ConfigStore::load_strict(&path).expect("reload");
    let config = reloaded.config();
    assert_eq!(config.theme.as_deref(), Some("dark"));
    assert_eq!(config.language.as_deref(), Some("zh-TW"));
    assert_eq!(config.editor_font_size, Some(15));
    assert!(config.storage_path.is_none());
}

#[test]
fn storage_path_change_preserves_other_fields() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("config.json");
    fs::write(
        &path,
        r#"{
  "storagePath": "/old/root",
  "theme": "light",
  "autoSave": true,
  "someFutureField": 3
}"#,
    )
    .expect("write config");

    let mut store = ConfigStore::load_strict(&path).expect("load");
    store.set_storage_path("/new/root").expect("save");

    let reloaded = ConfigStore::load_strict(&path).expect("reload");
    let config = reloaded.config();
    assert_eq!(config.storage_path.as_deref(), Some(Path::new("/new/root")));
    assert_eq!(config.theme.as_deref(), Some("light"));
    assert!(config.auto_save);
}

#[test]
fn configured_root_is_not_replaced_by_default() {
    let temp = tempdir().expect("tempdir");
    let root = temp.path().join("workspace");
    let mut store = ConfigStore::new(
        temp.path().join("config.json"),
        AppConfig {
            storage_path: Some(root.clone()),
            ..AppConfig::default()
        },
    );
    assert_eq!(store.storage_path_or_init().expect("root"), root);
}

#[test]
fn corrupt_file_is_lenient_on_load_and_strict_on_demand() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("config.json");
    fs::write(&path, "{ not json").expect("write corrupt config");

    let store = ConfigStore::load(&path);
    assert_eq!(store.config(), &AppConfig::default());

    match ConfigStore::load_strict(&path) {
        Err(SettingsError::Parse { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn saved_file_uses_camel_case_keys() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("config.json");
    let store = ConfigStore::new(
        path.clone(),
        AppConfig {
            editor_font_family: Some("Fira Code".into()),
            ..AppConfig::default()
        },
    );
    store.save().expect("save");

    let written = fs::read_to_string(&path).expect("read back");
    assert!(written.contains("\"editorFontFamily\": \"Fira Code\""), "{written}");
    assert!(written.contains("\"autoSave\": false"), "{written}");
    assert!(!written.contains("storagePath"), "{written}");
}
