//! Base64 text helpers over the standard alphabet with padding.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Serialize;

use crate::error::CodecError;

/// Outcome of [`decode_base64`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodedText {
    /// Decoded bytes as text; invalid UTF-8 sequences are replaced with U+FFFD.
    pub text: String,
    /// `false` when the payload was not valid UTF-8 and `text` is lossy.
    pub valid_utf8: bool,
}

pub fn encode_base64(text: &str) -> String {
    STANDARD.encode(text.as_bytes())
}

/// Decodes Base64 into text. Surrounding whitespace is ignored.
/// 將 Base64 解碼為文字，忽略前後空白。
pub fn decode_base64(input: &str) -> Result<DecodedText, CodecError> {
    let bytes = STANDARD.decode(input.trim())?;
    match String::from_utf8(bytes) {
        Ok(text) => Ok(DecodedText {
            text,
            valid_utf8: true,
        }),
        Err(err) => {
            tracing::warn!("decoded Base64 payload is not valid UTF-8");
            Ok(DecodedText {
                text: String::from_utf8_lossy(err.as_bytes()).into_owned(),
                valid_utf8: false,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_with_padding() {
        assert_eq!(encode_base64("hi"), "aGk=");
        assert_eq!(encode_base64("héllo"), "aMOpbGxv");
    }

    #[test]
    fn decode_trims_surrounding_whitespace() {
        let decoded = decode_base64("  aGk=\n").unwrap();
        assert_eq!(decoded.text, "hi");
        assert!(decoded.valid_utf8);
    }

    #[test]
    fn invalid_alphabet_is_an_error() {
        let err = decode_base64("not base64!").unwrap_err();
        assert!(matches!(err, CodecError::InvalidBase64(_)));
    }

    #[test]
    fn binary_payload_is_flagged() {
        let decoded = decode_base64("//4=").unwrap();
        assert!(!decoded.valid_utf8);
        assert_eq!(decoded.text, "\u{FFFD}\u{FFFD}");
    }
}
