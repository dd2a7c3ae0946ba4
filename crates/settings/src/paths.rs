use std::path::PathBuf;

use crate::config::SettingsError;

/// Folder name used under the platform config directory and under `Documents`.
pub const APP_DIR_NAME: &str = "ToolDesk";
pub const CONFIG_FILE_NAME: &str = "config.json";

/// 平台設定資料夾下的設定檔路徑。 / Config file location under the platform config directory.
pub fn default_config_path() -> Result<PathBuf, SettingsError> {
    let base = dirs::config_dir()
        .or_else(dirs::home_dir)
        .ok_or(SettingsError::NoHomeDirectory)?;
    Ok(base.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// 未設定時使用的工作區根目錄。 / Workspace root used when none is configured.
pub fn default_storage_path() -> Result<PathBuf, SettingsError> {
    let home = dirs::home_dir().ok_or(SettingsError::NoHomeDirectory)?;
    Ok(home.join("Documents").join(APP_DIR_NAME))
}
