//! JSON helpers.

use serde_json::Value;

use crate::decode::decode;
use crate::error::CodecError;

/// Pretty-prints JSON with two-space indentation, keeping key order.
/// 以兩個空白縮排美化 JSON，並保留鍵的順序。
pub fn format_json(input: &str) -> Result<String, CodecError> {
    let value: Value = serde_json::from_str(input)?;
    Ok(serde_json::to_string_pretty(&value)?)
}

/// Rewrites JSON without any insignificant whitespace.
pub fn compact_json(input: &str) -> Result<String, CodecError> {
    let value: Value = serde_json::from_str(input)?;
    Ok(serde_json::to_string(&value)?)
}

/// Converts an XML document into pretty-printed JSON with sorted keys.
/// 將 XML 文件轉換為排序鍵的美化 JSON。
pub fn xml_to_json(xml: &str) -> Result<String, CodecError> {
    let node = decode(xml)?;
    Ok(serde_json::to_string_pretty(&node)?)
}
