use std::fs::{self, OpenOptions};
use std::io::ErrorKind as IoErrorKind;
use std::path::{Path, PathBuf};

use crate::entry::{Entry, Placement};
use crate::error::{IoContext, StoreError};
use crate::guard::{expand_home, PathGuard};
use crate::names::{allocate, CollisionScheme};
use crate::search::{search_scopes, SearchHit};
use crate::tool::ToolScope;
use crate::walker::{copy_file, copy_subtree, list_tree};

/// Sandboxed file store rooted at a single workspace directory.
/// 限制在單一工作區根目錄內的檔案儲存。
///
/// All operations are synchronous. The store holds no locks: callers that
/// share one instance across threads must serialise [`WorkspaceStore::set_root`]
/// against other calls themselves, and concurrent creates of the same name may
/// both observe it as free.
#[derive(Debug, Clone)]
pub struct WorkspaceStore {
    guard: PathGuard,
}

impl WorkspaceStore {
    /// Opens the store at `root`, creating the root and every tool scope.
    /// 開啟工作區並建立根目錄與所有工具子資料夾。
    pub fn open(root: impl AsRef<Path>) -> Result<Self, StoreError> {
        let guard = PathGuard::new(root)?;
        prepare_root(&guard)?;
        tracing::info!(root = %guard.root().display(), "workspace opened");
        Ok(Self { guard })
    }

    pub fn root(&self) -> &Path {
        self.guard.root()
    }

    pub fn guard(&self) -> &PathGuard {
        &self.guard
    }

    /// Switches to a new root. A leading `~` expands to the home directory.
    /// The previous root is left untouched on disk.
    /// 切換工作區根目錄；開頭的 `~` 會展開為家目錄。
    pub fn set_root(&mut self, root: &str) -> Result<(), StoreError> {
        let guard = PathGuard::new(expand_home(root))?;
        prepare_root(&guard)?;
        tracing::info!(
            from = %self.guard.root().display(),
            to = %guard.root().display(),
            "workspace root changed"
        );
        self.guard = guard;
        Ok(())
    }

    /// Absolute directory of a tool scope.
    pub fn scope_dir(&self, tool: ToolScope) -> PathBuf {
        self.guard.root().join(tool.as_str())
    }

    /// Lists the full tree of a tool scope, creating the scope when missing.
    /// 列出指定工具子資料夾的完整樹狀結構。
    pub fn list(&self, tool: ToolScope) -> Result<Vec<Entry>, StoreError> {
        let dir = self.scope_dir(tool);
        fs::create_dir_all(&dir).context_with(|| format!("create directory {}", dir.display()))?;
        list_tree(&self.guard, &dir)
    }

    /// Lists the tree below an arbitrary directory inside the workspace.
    pub fn list_dir(&self, path: impl AsRef<Path>) -> Result<Vec<Entry>, StoreError> {
        let dir = self.guard.resolve(path)?;
        if !dir.is_dir() {
            return Err(StoreError::NotFound { path: dir });
        }
        list_tree(&self.guard, &dir)
    }

    /// Creates an empty file, suffixing `name_N` on collision.
    /// 建立空白檔案；若名稱衝突則自動加上 `_N` 後綴。
    pub fn create_file(
        &self,
        tool: ToolScope,
        parent: &str,
        desired: &str,
    ) -> Result<Entry, StoreError> {
        validate_name(desired)?;
        let dir = self.target_dir(tool, parent)?;
        let name = allocate(&dir, desired, false, CollisionScheme::Numbered);
        let path = dir.join(&name);
        // never truncates an existing file
        OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .context_with(|| format!("create file {}", path.display()))?;
        tracing::info!(path = %path.display(), "file created");
        Ok(Entry::file(self.guard.identity(&path), name, path))
    }

    /// Creates an empty folder, suffixing `name_N` on collision.
    /// 建立空白資料夾；若名稱衝突則自動加上 `_N` 後綴。
    pub fn create_folder(
        &self,
        tool: ToolScope,
        parent: &str,
        desired: &str,
    ) -> Result<Entry, StoreError> {
        validate_name(desired)?;
        let dir = self.target_dir(tool, parent)?;
        let name = allocate(&dir, desired, true, CollisionScheme::Numbered);
        let path = dir.join(&name);
        fs::create_dir(&path).context_with(|| format!("create folder {}", path.display()))?;
        tracing::info!(path = %path.display(), "folder created");
        Ok(Entry::folder(self.guard.identity(&path), name, path, Vec::new()).with_expanded(true))
    }

    /// Renames an entry in place. Never auto-suffixes.
    /// 重新命名；若同層已有相同名稱則失敗。
    pub fn rename(&self, path: &str, new_name: &str) -> Result<Placement, StoreError> {
        validate_name(new_name)?;
        let src = self.guard.resolve_child(path)?;
        ensure_exists(&src)?;
        let parent = parent_of(&src)?;
        let target = self.guard.resolve(parent.join(new_name))?;
        if exists(&target) {
            return Err(StoreError::AlreadyExists { path: target });
        }
        fs::rename(&src, &target).context_with(|| {
            format!("rename {} to {}", src.display(), target.display())
        })?;
        tracing::info!(from = %src.display(), to = %target.display(), "entry renamed");
        Ok(self.placement(target, new_name.to_string()))
    }

    /// Removes a file, or a folder with everything beneath it.
    /// 刪除檔案，或刪除資料夾及其所有內容。
    pub fn delete(&self, path: &str) -> Result<(), StoreError> {
        let target = self.guard.resolve_child(path)?;
        let metadata = match fs::symlink_metadata(&target) {
            Ok(metadata) => metadata,
            Err(err) if err.kind() == IoErrorKind::NotFound => {
                tracing::debug!(path = %target.display(), "delete target missing");
                return Err(StoreError::NotFound { path: target });
            }
            Err(err) => {
                return Err(StoreError::io(format!("inspect {}", target.display()), err));
            }
        };
        let removed = if metadata.is_dir() {
            fs::remove_dir_all(&target)
        } else {
            fs::remove_file(&target)
        };
        removed.context_with(|| format!("delete {}", target.display()))?;
        tracing::info!(path = %target.display(), "entry deleted");
        Ok(())
    }

    /// Copies `src` to `dst`, suffixing `name_copy_N` when `dst` is taken.
    /// 複製項目；若目的名稱已存在則加上 `_copy_N` 後綴。
    pub fn copy(&self, src: &str, dst: &str) -> Result<Placement, StoreError> {
        let src = self.guard.resolve_child(src)?;
        let dst = self.guard.resolve_child(dst)?;
        let metadata = match fs::metadata(&src) {
            Ok(metadata) => metadata,
            Err(err) if err.kind() == IoErrorKind::NotFound => {
                return Err(StoreError::NotFound { path: src });
            }
            Err(err) => return Err(StoreError::io(format!("inspect {}", src.display()), err)),
        };
        let is_dir = metadata.is_dir();

        let dest_dir = parent_of(&dst)?;
        let desired = file_name_of(&dst)?;
        let name = allocate(dest_dir, &desired, is_dir, CollisionScheme::Copy);
        let final_path = dest_dir.join(&name);

        if is_dir {
            if final_path.starts_with(&src) {
                return Err(StoreError::IntoItself { path: src });
            }
            copy_subtree(&src, &final_path)?;
        } else {
            copy_file(&src, &final_path)?;
        }
        tracing::info!(from = %src.display(), to = %final_path.display(), "entry copied");
        Ok(self.placement(final_path, name))
    }

    /// Copies `src` next to itself (`name_copy_1`, `name_copy_2`, ...).
    pub fn duplicate(&self, src: &str) -> Result<Placement, StoreError> {
        self.copy(src, src)
    }

    /// Moves `src` into the directory `dest_dir`. Never auto-suffixes.
    /// 將項目移動到指定資料夾；目的地已有同名項目時失敗。
    pub fn move_item(&self, src: &str, dest_dir: &str) -> Result<Placement, StoreError> {
        let src = self.guard.resolve_child(src)?;
        let dest_dir = self.guard.resolve(dest_dir)?;
        ensure_exists(&src)?;
        if !dest_dir.is_dir() {
            return Err(StoreError::NotFound { path: dest_dir });
        }
        if src.is_dir() && dest_dir.starts_with(&src) {
            return Err(StoreError::IntoItself { path: src });
        }
        let name = file_name_of(&src)?;
        let target = dest_dir.join(&name);
        if exists(&target) {
            return Err(StoreError::AlreadyExists { path: target });
        }
        fs::rename(&src, &target)
            .context_with(|| format!("move {} to {}", src.display(), target.display()))?;
        tracing::info!(from = %src.display(), to = %target.display(), "entry moved");
        Ok(self.placement(target, name))
    }

    /// Reads a file as UTF-8 text.
    pub fn read(&self, path: &str) -> Result<String, StoreError> {
        let target = self.guard.resolve(path)?;
        ensure_exists(&target)?;
        fs::read_to_string(&target).context_with(|| format!("read file {}", target.display()))
    }

    /// Replaces the content of a file, creating it when absent.
    pub fn write(&self, path: &str, content: &str) -> Result<(), StoreError> {
        let target = self.guard.resolve_child(path)?;
        fs::write(&target, content.as_bytes())
            .context_with(|| format!("save file {}", target.display()))?;
        tracing::info!(path = %target.display(), bytes = content.len(), "file saved");
        Ok(())
    }

    /// Case-insensitive substring search over every tool scope.
    /// 在所有工具子資料夾中進行不分大小寫的搜尋。
    pub fn search(&self, query: &str) -> Vec<SearchHit> {
        search_scopes(&self.guard, query)
    }

    fn target_dir(&self, tool: ToolScope, parent: &str) -> Result<PathBuf, StoreError> {
        let dir = if parent.trim().is_empty() {
            self.scope_dir(tool)
        } else {
            self.guard.resolve(parent)?
        };
        fs::create_dir_all(&dir).context_with(|| format!("create directory {}", dir.display()))?;
        Ok(dir)
    }

    fn placement(&self, path: PathBuf, name: String) -> Placement {
        Placement {
            id: self.guard.identity(&path),
            path,
            name,
        }
    }
}

fn prepare_root(guard: &PathGuard) -> Result<(), StoreError> {
    for tool in ToolScope::ALL {
        let dir = guard.root().join(tool.as_str());
        fs::create_dir_all(&dir).context_with(|| format!("create directory {}", dir.display()))?;
    }
    Ok(())
}

fn validate_name(name: &str) -> Result<(), StoreError> {
    let invalid = name.trim().is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\', '\0']);
    if invalid {
        return Err(StoreError::InvalidName {
            name: name.to_string(),
        });
    }
    Ok(())
}

fn exists(path: &Path) -> bool {
    path.symlink_metadata().is_ok()
}

fn ensure_exists(path: &Path) -> Result<(), StoreError> {
    if exists(path) {
        Ok(())
    } else {
        Err(StoreError::NotFound {
            path: path.to_path_buf(),
        })
    }
}

fn parent_of(path: &Path) -> Result<&Path, StoreError> {
    path.parent().ok_or_else(|| StoreError::NoParent {
        path: path.to_path_buf(),
    })
}

fn file_name_of(path: &Path) -> Result<String, StoreError> {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| StoreError::NoParent {
            path: path.to_path_buf(),
        })
}
