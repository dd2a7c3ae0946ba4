use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Kind of a workspace entry.
/// 工作區條目的類型。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Folder,
}

/// Snapshot of a file or folder inside the workspace.
/// 工作區中檔案或資料夾的快照。
///
/// `id` is the `/`-joined path relative to the workspace root and is the only
/// value callers should hold on to across calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub path: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Entry>>,
    #[serde(default)]
    pub expanded: bool,
}

impl Entry {
    pub fn file(id: impl Into<String>, name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: EntryKind::File,
            path: path.into(),
            children: None,
            expanded: false,
        }
    }

    pub fn folder(
        id: impl Into<String>,
        name: impl Into<String>,
        path: impl Into<PathBuf>,
        children: Vec<Entry>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: EntryKind::Folder,
            path: path.into(),
            children: Some(children),
            expanded: false,
        }
    }

    pub fn with_expanded(mut self, expanded: bool) -> Self {
        self.expanded = expanded;
        self
    }

    pub fn is_folder(&self) -> bool {
        self.kind == EntryKind::Folder
    }

    pub fn children(&self) -> &[Entry] {
        self.children.as_deref().unwrap_or(&[])
    }

    /// Depth-first search for an entry by identity.
    pub fn find(&self, id: &str) -> Option<&Entry> {
        if self.id == id {
            return Some(self);
        }
        self.children().iter().find_map(|child| child.find(id))
    }
}

/// Where an entry ended up after a rename, copy, or move.
/// 重新命名、複製或移動後條目的新位置。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub id: String,
    pub path: PathBuf,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_serializes_with_type_tag() {
        let entry = Entry::folder("json/a", "a", "/root/json/a", vec![Entry::file(
            "json/a/x.json",
            "x.json",
            "/root/json/a/x.json",
        )]);
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["type"], "folder");
        assert_eq!(value["children"][0]["type"], "file");
        assert!(value["children"][0].get("children").is_none());
        assert_eq!(value["expanded"], false);
    }

    #[test]
    fn find_walks_nested_children() {
        let tree = Entry::folder("json", "json", "/r/json", vec![Entry::folder(
            "json/a",
            "a",
            "/r/json/a",
            vec![Entry::file("json/a/b.json", "b.json", "/r/json/a/b.json")],
        )]);
        assert_eq!(tree.find("json/a/b.json").map(|e| e.name.as_str()), Some("b.json"));
        assert!(tree.find("json/missing").is_none());
    }
}
