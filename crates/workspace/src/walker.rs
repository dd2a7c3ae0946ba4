//! Recursive directory listing and subtree copies.

use std::cmp::Ordering;
use std::fs;
use std::path::Path;

use crate::entry::Entry;
use crate::error::{IoContext, StoreError};
use crate::guard::PathGuard;

/// Names starting with this marker are invisible to listings and search.
pub const HIDDEN_MARKER: char = '.';

pub fn is_hidden(name: &str) -> bool {
    name.starts_with(HIDDEN_MARKER)
}

/// Folders before files, then byte-wise by name.
pub fn entry_order(a_is_dir: bool, a_name: &str, b_is_dir: bool, b_name: &str) -> Ordering {
    b_is_dir.cmp(&a_is_dir).then_with(|| a_name.cmp(b_name))
}

/// Lists `directory` into a fully populated tree.
/// 遞迴讀取資料夾並建立完整的條目樹。
///
/// Only a failure to read `directory` itself is an error. Subdirectories that
/// cannot be opened show up as folders without children.
pub fn list_tree(guard: &PathGuard, directory: &Path) -> Result<Vec<Entry>, StoreError> {
    let read = fs::read_dir(directory)
        .context_with(|| format!("read directory {}", directory.display()))?;

    let mut items = Vec::new();
    for dirent in read {
        let dirent = dirent.context_with(|| format!("read directory {}", directory.display()))?;
        let name = dirent.file_name().to_string_lossy().into_owned();
        if is_hidden(&name) {
            continue;
        }
        let is_dir = dirent
            .file_type()
            .map(|file_type| file_type.is_dir())
            .unwrap_or(false);
        items.push((name, is_dir, dirent.path()));
    }
    items.sort_by(|(a_name, a_dir, _), (b_name, b_dir, _)| {
        entry_order(*a_dir, a_name, *b_dir, b_name)
    });

    let mut entries = Vec::with_capacity(items.len());
    for (name, is_dir, path) in items {
        let id = guard.identity(&path);
        if is_dir {
            let children = match list_tree(guard, &path) {
                Ok(children) => children,
                Err(err) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %err,
                        "skipping unreadable folder"
                    );
                    Vec::new()
                }
            };
            entries.push(Entry::folder(id, name, path, children));
        } else {
            entries.push(Entry::file(id, name, path));
        }
    }
    Ok(entries)
}

/// Copies one file byte for byte; the destination receives the source's
/// permission bits.
pub fn copy_file(src: &Path, dst: &Path) -> Result<(), StoreError> {
    fs::copy(src, dst)
        .context_with(|| format!("copy {} to {}", src.display(), dst.display()))?;
    Ok(())
}

/// Recursively copies the directory `src` to `dst`.
///
/// The first failure aborts the copy and is returned; whatever was already
/// written stays on disk.
pub fn copy_subtree(src: &Path, dst: &Path) -> Result<(), StoreError> {
    let metadata =
        fs::metadata(src).context_with(|| format!("inspect {}", src.display()))?;
    fs::create_dir_all(dst).context_with(|| format!("create directory {}", dst.display()))?;

    let read = fs::read_dir(src).context_with(|| format!("read directory {}", src.display()))?;
    for dirent in read {
        let dirent = dirent.context_with(|| format!("read directory {}", src.display()))?;
        let child_src = dirent.path();
        let child_dst = dst.join(dirent.file_name());
        let is_dir = dirent
            .file_type()
            .context_with(|| format!("inspect {}", child_src.display()))?
            .is_dir();
        if is_dir {
            copy_subtree(&child_src, &child_dst)?;
        } else {
            copy_file(&child_src, &child_dst)?;
        }
    }

    // Applied last: a read-only source folder would otherwise block its own children.
    fs::set_permissions(dst, metadata.permissions())
        .context_with(|| format!("set permissions on {}", dst.display()))?;
    Ok(())
}
