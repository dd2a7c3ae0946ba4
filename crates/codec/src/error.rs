use thiserror::Error;

/// Errors raised while converting between text formats.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The input does not tokenize as well-formed XML. `position` is the byte
    /// offset reported by the tokenizer, when one is known.
    #[error("malformed XML: {message}")]
    Malformed {
        position: Option<usize>,
        message: String,
    },
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("invalid Base64: {0}")]
    InvalidBase64(#[from] base64::DecodeError),
}

impl CodecError {
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        CodecError::Malformed {
            position: None,
            message: message.into(),
        }
    }

    pub(crate) fn malformed_at(position: usize, message: impl std::fmt::Display) -> Self {
        CodecError::Malformed {
            position: Some(position),
            message: format!("{message} (at byte {position})"),
        }
    }
}
