use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Coarse classification of [`StoreError`] for callers that only branch on the kind.
/// 供呼叫端只依類型分支時使用的錯誤分類。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    AccessDenied,
    NotFound,
    AlreadyExists,
    InvalidName,
    Io,
}

/// Errors raised by workspace operations.
/// 工作區操作可能拋出的錯誤。
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("access denied: {} is outside the workspace root", path.display())]
    AccessDenied { path: PathBuf },
    #[error("file or folder does not exist: {}", path.display())]
    NotFound { path: PathBuf },
    #[error("a file or folder with that name already exists: {}", path.display())]
    AlreadyExists { path: PathBuf },
    #[error("invalid entry name '{name}'")]
    InvalidName { name: String },
    #[error("{} has no parent inside the workspace", path.display())]
    NoParent { path: PathBuf },
    #[error("cannot copy or move {} into itself", path.display())]
    IntoItself { path: PathBuf },
    #[error("failed to {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::AccessDenied { .. } => ErrorKind::AccessDenied,
            StoreError::NotFound { .. } => ErrorKind::NotFound,
            StoreError::AlreadyExists { .. } => ErrorKind::AlreadyExists,
            StoreError::InvalidName { .. }
            | StoreError::NoParent { .. }
            | StoreError::IntoItself { .. } => ErrorKind::InvalidName,
            StoreError::Io { .. } => ErrorKind::Io,
        }
    }

    pub(crate) fn io(context: impl Into<String>, source: io::Error) -> Self {
        StoreError::Io {
            context: context.into(),
            source,
        }
    }
}

/// Attaches a context string to raw `io::Error`s.
pub(crate) trait IoContext<T> {
    fn context_with<F>(self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce() -> String;
}

impl<T> IoContext<T> for io::Result<T> {
    fn context_with<F>(self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|source| StoreError::io(f(), source))
    }
}
