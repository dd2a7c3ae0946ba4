use serde::Serialize;

/// 關於視窗所顯示的靜態資訊。 / Static build facts shown in an About view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub platform: &'static str,
    pub arch: &'static str,
    pub license: &'static str,
}

impl SystemInfo {
    pub fn current() -> Self {
        Self {
            name: "ToolDesk",
            version: env!("CARGO_PKG_VERSION"),
            platform: std::env::consts::OS,
            arch: std::env::consts::ARCH,
            license: env!("CARGO_PKG_LICENSE"),
        }
    }
}
