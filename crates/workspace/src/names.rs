//! Collision-free naming inside a directory.
//!
//! The existence probe and the later create/copy are not atomic as a pair:
//! two callers racing on the same desired name can both see it as free.
//! The store does not serialise callers; whoever integrates it decides.

use std::path::Path;

/// Suffix scheme applied when the desired name is taken.
/// 名稱衝突時使用的後綴規則。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionScheme {
    /// `stem_N.ext`, used by file and folder creation.
    Numbered,
    /// `stem_copy_N.ext`, used by copy and duplicate.
    Copy,
}

impl CollisionScheme {
    fn candidate(self, stem: &str, extension: &str, counter: u64) -> String {
        match self {
            CollisionScheme::Numbered => format!("{stem}_{counter}{extension}"),
            CollisionScheme::Copy => format!("{stem}_copy_{counter}{extension}"),
        }
    }
}

/// Splits `name` into stem and extension, the extension keeping its leading
/// dot. Folders never have an extension.
pub fn split_name(name: &str, is_folder: bool) -> (&str, &str) {
    if is_folder {
        return (name, "");
    }
    match name.rfind('.') {
        Some(index) => name.split_at(index),
        None => (name, ""),
    }
}

/// Returns a name that does not exist in `directory` at the time of the call.
///
/// `desired` is returned unchanged when free; otherwise candidates are
/// probed with an increasing 1-based counter until one is free.
pub fn allocate(
    directory: &Path,
    desired: &str,
    is_folder: bool,
    scheme: CollisionScheme,
) -> String {
    allocate_with(desired, is_folder, scheme, |name| {
        // symlink_metadata so that dangling links still count as taken
        directory.join(name).symlink_metadata().is_ok()
    })
}

/// Same as [`allocate`] with a caller-supplied existence probe.
pub fn allocate_with<F>(
    desired: &str,
    is_folder: bool,
    scheme: CollisionScheme,
    mut exists: F,
) -> String
where
    F: FnMut(&str) -> bool,
{
    if !exists(desired) {
        return desired.to_string();
    }
    let (stem, extension) = split_name(desired, is_folder);
    let mut counter: u64 = 1;
    loop {
        let candidate = scheme.candidate(stem, extension, counter);
        if !exists(&candidate) {
            tracing::debug!(desired, allocated = %candidate, "name collision resolved");
            return candidate;
        }
        counter += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::fs;
    use tempfile::tempdir;

    fn taken(names: &[&str]) -> HashSet<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn free_name_is_returned_unchanged() {
        let existing = taken(&[]);
        let name = allocate_with("x.txt", false, CollisionScheme::Numbered, |n| {
            existing.contains(n)
        });
        assert_eq!(name, "x.txt");
    }

    #[test]
    fn numbered_scheme_skips_taken_candidates() {
        let existing = taken(&["x.txt", "x_1.txt"]);
        let name = allocate_with("x.txt", false, CollisionScheme::Numbered, |n| {
            existing.contains(n)
        });
        assert_eq!(name, "x_2.txt");
    }

    #[test]
    fn folders_have_no_extension() {
        let existing = taken(&["release.v1", "release.v1_1"]);
        let name = allocate_with("release.v1", true, CollisionScheme::Numbered, |n| {
            existing.contains(n)
        });
        assert_eq!(name, "release.v1_2");
    }

    #[test]
    fn copy_scheme_uses_copy_infix() {
        let existing = taken(&["note.txt", "note_copy_1.txt"]);
        let name = allocate_with("note.txt", false, CollisionScheme::Copy, |n| {
            existing.contains(n)
        });
        assert_eq!(name, "note_copy_2.txt");
    }

    #[test]
    fn split_uses_last_dot() {
        assert_eq!(split_name("archive.tar.gz", false), ("archive.tar", ".gz"));
        assert_eq!(split_name("README", false), ("README", ""));
        assert_eq!(split_name(".env", false), ("", ".env"));
        assert_eq!(split_name("dir.d", true), ("dir.d", ""));
    }

    #[test]
    fn allocate_probes_the_filesystem() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("x.txt"), "").unwrap();
        fs::write(dir.path().join("x_1.txt"), "").unwrap();
        fs::create_dir(dir.path().join("folder")).unwrap();

        assert_eq!(
            allocate(dir.path(), "x.txt", false, CollisionScheme::Numbered),
            "x_2.txt"
        );
        assert_eq!(
            allocate(dir.path(), "folder", true, CollisionScheme::Numbered),
            "folder_1"
        );
        assert_eq!(
            allocate(dir.path(), "fresh.json", false, CollisionScheme::Copy),
            "fresh.json"
        );
    }
}
