use std::fs;
use std::io;
use std::path::Path;

/// 先寫入暫存檔再改名，避免留下半寫入的檔案。 / Writes through a sibling temp file and renames it into place.
pub fn write_atomic(path: &Path, data: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp_path = path.with_extension("tmp");
    fs::write(&tmp_path, data)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn write_atomic_creates_parents_and_leaves_no_temp_file() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("nested/config.json");
        write_atomic(&target, b"{}").unwrap();
        write_atomic(&target, b"{\"a\":1}").unwrap();

        assert_eq!(fs::read_to_string(&target).unwrap(), "{\"a\":1}");
        assert!(!dir.path().join("nested/config.tmp").exists());
    }
}
