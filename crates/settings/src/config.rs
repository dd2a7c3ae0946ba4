use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::paths::{default_config_path, default_storage_path};
use crate::storage::write_atomic;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to serialize config {path}: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to write config {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to prepare directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("could not determine the home directory")]
    NoHomeDirectory,
}

/// 應用程式設定檔內容。 / Persisted application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    pub auto_save: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub editor_font_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub editor_font_family: Option<String>,
}

impl AppConfig {
    pub fn user_settings(&self) -> UserSettings {
        UserSettings {
            theme: self.theme.clone().unwrap_or_default(),
            language: self.language.clone().unwrap_or_default(),
            auto_save: self.auto_save,
            editor_font_size: self.editor_font_size.unwrap_or(0),
            editor_font_family: self.editor_font_family.clone().unwrap_or_default(),
        }
    }
}

/// 提供給介面的使用者偏好設定（未設定欄位為空值）。 / User-facing settings view; unset fields are empty or zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSettings {
    pub theme: String,
    pub language: String,
    pub auto_save: bool,
    pub editor_font_size: u32,
    pub editor_font_family: String,
}

/// 部分更新請求；僅套用有值且合法的欄位。 / Partial settings update; only present, valid fields apply.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SettingsUpdate {
    pub theme: Option<String>,
    pub language: Option<String>,
    pub auto_save: Option<bool>,
    pub editor_font_size: Option<u32>,
    pub editor_font_family: Option<String>,
}

impl SettingsUpdate {
    pub fn is_empty(&self) -> bool {
        self == &SettingsUpdate::default()
    }

    /// Copies the applicable fields into `config`. Empty strings and a zero
    /// font size are ignored. Returns whether anything changed.
    pub fn apply(&self, config: &mut AppConfig) -> bool {
        let before = config.clone();
        if let Some(theme) = non_empty(&self.theme) {
            config.theme = Some(theme);
        }
        if let Some(language) = non_empty(&self.language) {
            config.language = Some(language);
        }
        if let Some(auto_save) = self.auto_save {
            config.auto_save = auto_save;
        }
        if let Some(size) = self.editor_font_size.filter(|size| *size > 0) {
            config.editor_font_size = Some(size);
        }
        if let Some(family) = non_empty(&self.editor_font_family) {
            config.editor_font_family = Some(family);
        }
        *config != before
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

#[derive(Debug)]
pub struct ConfigStore {
    path: PathBuf,
    data: AppConfig,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>, config: AppConfig) -> Self {
        Self {
            path: path.into(),
            data: config,
        }
    }

    /// 從預設位置載入。 / Loads from the platform default location.
    pub fn load_default() -> Result<Self, SettingsError> {
        Ok(Self::load(default_config_path()?))
    }

    /// Loads the config at `path`, falling back to defaults when the file is
    /// missing, unreadable or not valid JSON.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        match Self::load_strict(&path) {
            Ok(store) => store,
            Err(err) => {
                tracing::warn!(error = %err, "using default configuration");
                Self {
                    path,
                    data: AppConfig::default(),
                }
            }
        }
    }

    /// Like [`ConfigStore::load`] but reports read and parse failures. A
    /// missing file still yields defaults.
    pub fn load_strict(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            return Ok(Self {
                path,
                data: AppConfig::default(),
            });
        }

        let contents = fs::read_to_string(&path).map_err(|source| SettingsError::Read {
            path: path.clone(),
            source,
        })?;
        let data: AppConfig =
            serde_json::from_str(&contents).map_err(|source| SettingsError::Parse {
                path: path.clone(),
                source,
            })?;
        Ok(Self { path, data })
    }

    pub fn config(&self) -> &AppConfig {
        &self.data
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 套用部分更新並儲存。 / Applies a partial update and persists it.
    pub fn update(&mut self, update: &SettingsUpdate) -> Result<(), SettingsError> {
        if update.apply(&mut self.data) {
            tracing::info!(path = %self.path.display(), "settings updated");
        }
        self.save()
    }

    /// Records a new workspace root, keeping every other field.
    pub fn set_storage_path(&mut self, root: impl Into<PathBuf>) -> Result<(), SettingsError> {
        self.data.storage_path = Some(root.into());
        self.save()
    }

    /// Returns the configured workspace root. When none is set, the default
    /// root is chosen and persisted first.
    pub fn storage_path_or_init(&mut self) -> Result<PathBuf, SettingsError> {
        if let Some(path) = &self.data.storage_path {
            return Ok(path.clone());
        }
        let path = default_storage_path()?;
        tracing::info!(root = %path.display(), "initializing default workspace root");
        self.set_storage_path(path.clone())?;
        Ok(path)
    }

    pub fn save(&self) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| SettingsError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let payload = serde_json::to_string_pretty(&self.data).map_err(|source| {
            SettingsError::Serialize {
                path: self.path.clone(),
                source,
            }
        })?;
        write_atomic(&self.path, payload.as_bytes()).map_err(|source| SettingsError::Write {
            path: self.path.clone(),
            source,
        })
    }
}
