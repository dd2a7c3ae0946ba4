//! Persistent application configuration for ToolDesk.
//! ToolDesk 的應用程式設定持久化。

pub mod config;
pub mod paths;
pub mod storage;
pub mod system;

pub use config::{AppConfig, ConfigStore, SettingsError, SettingsUpdate, UserSettings};
pub use paths::{default_config_path, default_storage_path, APP_DIR_NAME, CONFIG_FILE_NAME};
pub use storage::write_atomic;
pub use system::SystemInfo;
