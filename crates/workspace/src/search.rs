//! Case-insensitive text search across every tool scope.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use crate::guard::PathGuard;
use crate::tool::ToolScope;
use crate::walker::is_hidden;

/// One file containing at least one match.
/// 至少含有一筆符合結果的檔案。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    pub file_id: String,
    pub file_name: String,
    pub tool_name: ToolScope,
    pub count: usize,
}

/// Counts non-overlapping, case-insensitive occurrences of `needle`, scanning
/// left to right. An empty needle never matches.
pub fn count_occurrences(haystack: &str, needle: &str) -> usize {
    if needle.is_empty() {
        return 0;
    }
    let haystack = haystack.to_lowercase();
    let needle = needle.to_lowercase();
    haystack.matches(needle.as_str()).count()
}

/// Searches every non-hidden file under each tool scope of `guard`'s root.
///
/// Results are grouped by scope in [`ToolScope::ALL`] order and sorted by
/// path inside a scope. Files that cannot be read are skipped.
pub(crate) fn search_scopes(guard: &PathGuard, query: &str) -> Vec<SearchHit> {
    let mut hits = Vec::new();
    if query.is_empty() {
        return hits;
    }
    for scope in ToolScope::ALL {
        let scope_root = guard.root().join(scope.as_str());
        search_scope(guard, scope, &scope_root, query, &mut hits);
    }
    hits
}

fn search_scope(
    guard: &PathGuard,
    scope: ToolScope,
    scope_root: &Path,
    query: &str,
    hits: &mut Vec<SearchHit>,
) {
    if !scope_root.is_dir() {
        return;
    }
    let walker = WalkDir::new(scope_root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|dirent| {
            dirent.depth() == 0 || !is_hidden(&dirent.file_name().to_string_lossy())
        });

    for dirent in walker {
        let dirent = match dirent {
            Ok(dirent) => dirent,
            Err(err) => {
                tracing::warn!(error = %err, "search skipped an unreadable entry");
                continue;
            }
        };
        if !dirent.file_type().is_file() {
            continue;
        }
        let bytes = match fs::read(dirent.path()) {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::warn!(
                    path = %dirent.path().display(),
                    error = %err,
                    "search skipped an unreadable file"
                );
                continue;
            }
        };
        let count = count_occurrences(&String::from_utf8_lossy(&bytes), query);
        if count > 0 {
            hits.push(SearchHit {
                file_id: guard.identity(dirent.path()),
                file_name: dirent.file_name().to_string_lossy().into_owned(),
                tool_name: scope,
                count,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_are_case_insensitive() {
        assert_eq!(count_occurrences("Needle needle NEEDLE", "needle"), 3);
        assert_eq!(count_occurrences("haystack", "needle"), 0);
    }

    #[test]
    fn counts_do_not_overlap() {
        assert_eq!(count_occurrences("aaaa", "aa"), 2);
        assert_eq!(count_occurrences("abababa", "aba"), 2);
    }

    #[test]
    fn empty_needle_never_matches() {
        assert_eq!(count_occurrences("anything", ""), 0);
    }

    #[test]
    fn hit_serializes_camel_case() {
        let hit = SearchHit {
            file_id: "json/f1.json".into(),
            file_name: "f1.json".into(),
            tool_name: ToolScope::Json,
            count: 2,
        };
        let value = serde_json::to_value(hit).unwrap();
        assert_eq!(value["fileId"], "json/f1.json");
        assert_eq!(value["toolName"], "json");
    }
}
