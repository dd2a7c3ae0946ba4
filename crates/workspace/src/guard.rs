//! Path confinement for the workspace root.
//!
//! Every path handed to the store is made absolute, normalised lexically
//! (`.` dropped, `..` folded) and then compared segment by segment against the
//! root. Plain string prefixes are never trusted: `/a/bc` is not inside `/a/b`.

use std::env;
use std::path::{Component, Path, PathBuf};

use crate::error::{IoContext, StoreError};

/// Validates that paths stay inside a single workspace root.
/// 確認所有路徑都位於工作區根目錄之內。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathGuard {
    root: PathBuf,
}

impl PathGuard {
    /// Builds a guard for `root`. Relative roots are resolved against the
    /// process working directory.
    pub fn new(root: impl AsRef<Path>) -> Result<Self, StoreError> {
        let root = root.as_ref();
        let absolute = if root.is_absolute() {
            root.to_path_buf()
        } else {
            env::current_dir()
                .context_with(|| "determine current directory".to_string())?
                .join(root)
        };
        Ok(Self {
            root: normalize(absolute),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves `candidate` to an absolute, normalised path inside the root.
    /// Relative candidates are interpreted against the root, so identities
    /// returned by the store can be passed straight back in.
    pub fn resolve(&self, candidate: impl AsRef<Path>) -> Result<PathBuf, StoreError> {
        let candidate = candidate.as_ref();
        let absolute = if candidate.is_absolute() {
            candidate.to_path_buf()
        } else {
            self.root.join(candidate)
        };
        let normalized = normalize(&absolute);
        if !self.contains(&normalized) {
            tracing::debug!(
                path = %absolute.display(),
                root = %self.root.display(),
                "path rejected"
            );
            return Err(StoreError::AccessDenied { path: normalized });
        }
        Ok(normalized)
    }

    /// Like [`PathGuard::resolve`] but also rejects the root itself.
    pub fn resolve_child(&self, candidate: impl AsRef<Path>) -> Result<PathBuf, StoreError> {
        let resolved = self.resolve(candidate)?;
        if resolved == self.root {
            return Err(StoreError::NoParent { path: resolved });
        }
        Ok(resolved)
    }

    /// `true` when the already-normalised `path` is the root or lies beneath it.
    pub fn contains(&self, path: &Path) -> bool {
        // Path::starts_with compares whole components, not bytes.
        path.starts_with(&self.root)
    }

    /// Returns the `/`-joined identity of `path` relative to the root.
    /// The root itself maps to the empty string.
    pub fn identity(&self, path: &Path) -> String {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        relative
            .components()
            .filter_map(|component| match component {
                Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/")
    }
}

/// Lexically normalises `path`: drops `.` segments and folds `..` into its
/// parent. `..` never climbs above the filesystem root. Symlinks are not
/// followed.
pub fn normalize(path: impl AsRef<Path>) -> PathBuf {
    let mut result = PathBuf::new();
    for component in path.as_ref().components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let at_anchor = matches!(
                    result.components().next_back(),
                    None | Some(Component::RootDir) | Some(Component::Prefix(_))
                );
                if !at_anchor {
                    result.pop();
                }
            }
            other => result.push(other.as_os_str()),
        }
    }
    result
}

/// Replaces a leading `~` with the user's home directory.
/// 將開頭的 `~` 展開為使用者家目錄。
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix('~') {
        if let Some(home) = dirs::home_dir() {
            let rest = rest.trim_start_matches(['/', '\\']);
            return if rest.is_empty() { home } else { home.join(rest) };
        }
    }
    PathBuf::from(path)
}
