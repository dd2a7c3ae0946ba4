//! Text conversions used by the ToolDesk tools: XML formatting and its
//! structural JSON projection, JSON re-formatting, and Base64.
//! ToolDesk 工具所用的文字轉換：XML 格式化與結構化 JSON 投影、JSON 重新格式化及 Base64。

mod decode;
mod encoding;
mod error;
mod format;
mod json;
mod node;
pub mod tokens;

pub use decode::{decode, decode_tokens, MAX_DEPTH};
pub use encoding::{decode_base64, encode_base64, DecodedText};
pub use error::CodecError;
pub use format::{encode, format_xml, INDENT};
pub use json::{compact_json, format_json, xml_to_json};
pub use node::{NodeValue, StructuralNode, ATTRIBUTES_KEY, TEXT_KEY};
pub use tokens::{Token, Tokenizer};
