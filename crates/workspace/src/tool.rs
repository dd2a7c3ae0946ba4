use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fixed top-level directories of the workspace, one per tool.
/// 工作區根目錄下依工具區分的固定子資料夾。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolScope {
    Json,
    Xml,
    Base64,
    Http,
}

impl ToolScope {
    pub const ALL: [ToolScope; 4] = [
        ToolScope::Json,
        ToolScope::Xml,
        ToolScope::Base64,
        ToolScope::Http,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ToolScope::Json => "json",
            ToolScope::Xml => "xml",
            ToolScope::Base64 => "base64",
            ToolScope::Http => "http",
        }
    }
}

impl fmt::Display for ToolScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown tool '{0}' (expected one of json, xml, base64, http)")]
pub struct UnknownToolScope(pub String);

impl FromStr for ToolScope {
    type Err = UnknownToolScope;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        ToolScope::ALL
            .into_iter()
            .find(|scope| scope.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| UnknownToolScope(value.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("XML".parse::<ToolScope>(), Ok(ToolScope::Xml));
        assert_eq!(" base64 ".parse::<ToolScope>(), Ok(ToolScope::Base64));
        let err = "yaml".parse::<ToolScope>().unwrap_err();
        assert_eq!(err, UnknownToolScope("yaml".into()));
        assert_eq!(
            err.to_string(),
            "unknown tool 'yaml' (expected one of json, xml, base64, http)"
        );
    }
}
