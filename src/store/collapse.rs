//! Persisted collapse state: the set of folder paths whose children are
//! hidden in the rendered tree. Absence means expanded.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Set of collapsed folder paths.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CollapseStore {
    paths: BTreeSet<String>,
}

impl CollapseStore {
    pub fn is_collapsed(&self, path: &str) -> bool {
        self.paths.contains(path)
    }

    /// Flip a folder's collapse flag. Returns the new state
    /// (`true` = now collapsed).
    pub fn toggle(&mut self, path: &str) -> bool {
        if self.paths.remove(path) {
            false
        } else {
            self.paths.insert(path.to_string());
            true
        }
    }

    /// Bulk collapse or expand. Returns whether any entry changed, so
    /// callers can gate persistence and refresh on it.
    pub fn set_all<'a, I>(&mut self, paths: I, collapsed: bool) -> bool
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut changed = false;
        for path in paths {
            if collapsed {
                changed |= self.paths.insert(path.to_string());
            } else {
                changed |= self.paths.remove(path);
            }
        }
        changed
    }

    /// Rewrite every stored path equal to `old_path`, or under it, to use
    /// `new_path` as its prefix. The whole set is rebuilt in one pass so a
    /// `new_path` that itself matches the old prefix cannot interfere.
    pub fn rewrite_prefix(&mut self, old_path: &str, new_path: &str) {
        let child_prefix = format!("{}/", old_path);
        self.paths = self
            .paths
            .iter()
            .map(|path| {
                if path == old_path {
                    new_path.to_string()
                } else if let Some(rest) = path.strip_prefix(&child_prefix) {
                    format!("{}/{}", new_path, rest)
                } else {
                    path.clone()
                }
            })
            .collect();
    }

    #[cfg(test)]
    fn as_vec(&self) -> Vec<&str> {
        self.paths.iter().map(|s| s.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_of(paths: &[&str]) -> CollapseStore {
        let mut store = CollapseStore::default();
        store.set_all(paths.iter().copied(), true);
        store
    }

    #[test]
    fn toggle_adds_then_removes() {
        let mut store = CollapseStore::default();
        assert!(!store.is_collapsed("A"));
        assert!(store.toggle("A"));
        assert!(store.is_collapsed("A"));
        assert!(!store.toggle("A"));
        assert!(!store.is_collapsed("A"));
    }

    #[test]
    fn set_all_reports_changes() {
        let mut store = CollapseStore::default();
        assert!(store.set_all(["A", "B"], true));
        // Already collapsed: nothing changes
        assert!(!store.set_all(["A", "B"], true));
        assert!(store.set_all(["A"], false));
        assert!(!store.set_all(["A"], false));
        assert!(store.is_collapsed("B"));
    }

    #[test]
    fn rewrite_prefix_rewrites_self_and_descendants() {
        let mut store = store_of(&["A", "A/x", "C"]);
        store.rewrite_prefix("A", "B");
        assert_eq!(store.as_vec(), vec!["B", "B/x", "C"]);
    }

    #[test]
    fn rewrite_prefix_requires_full_component_match() {
        let mut store = store_of(&["A", "AB", "AB/x"]);
        store.rewrite_prefix("A", "Z");
        assert_eq!(store.as_vec(), vec!["AB", "AB/x", "Z"]);
    }

    #[test]
    fn rewrite_prefix_handles_overlapping_new_prefix() {
        // New path is itself a prefix-match target; the single-pass rebuild
        // must not rewrite already-rewritten entries.
        let mut store = store_of(&["A", "A/A", "A/A/x"]);
        store.rewrite_prefix("A", "A/A");
        assert_eq!(store.as_vec(), vec!["A/A", "A/A/A", "A/A/A/x"]);
    }

    #[test]
    fn rewrite_prefix_deep_rename() {
        let mut store = store_of(&["Old", "Old/sub", "Old/sub/deep", "Other"]);
        store.rewrite_prefix("Old", "New");
        assert_eq!(
            store.as_vec(),
            vec!["New", "New/sub", "New/sub/deep", "Other"]
        );
    }

    #[test]
    fn serializes_as_sequence() {
        let store = store_of(&["B", "A"]);
        let json = serde_json::to_string(&store).unwrap();
        assert_eq!(json, r#"["A","B"]"#);
        let back: CollapseStore = serde_json::from_str(&json).unwrap();
        assert_eq!(back, store);
    }
}
