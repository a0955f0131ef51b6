//! Persisted manual orderings: one name sequence per folder path.
//!
//! A folder without a record falls back to alphabetical order. A record may
//! reference names that no longer exist (stale entries after a delete) and
//! may omit names that do (entries created while the record was absent);
//! `resolve_order` tolerates both.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Alphabetical comparison standing in for a locale compare:
/// case-insensitive, with a case-sensitive tie-break for stability.
pub fn name_cmp(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Mapping from folder path to the explicit ordering of its child names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderStore {
    records: BTreeMap<String, Vec<String>>,
}

impl OrderStore {
    /// The recorded ordering for a folder, if any.
    pub fn get_order(&self, folder: &str) -> Option<&[String]> {
        self.records.get(folder).map(|v| v.as_slice())
    }

    /// Overwrite the full ordering for a folder. Callers always pass a
    /// complete reconstruction of the current child order, never a patch.
    pub fn set_order(&mut self, folder: &str, names: Vec<String>) {
        self.records.insert(folder.to_string(), names);
    }

    /// Synthesize an alphabetical default ordering for a folder that has
    /// none yet. Existing records are left untouched.
    pub fn ensure_default(&mut self, folder: &str, sibling_names: &[String]) {
        if self.records.contains_key(folder) {
            return;
        }
        let mut names = sibling_names.to_vec();
        names.sort_by(|a, b| name_cmp(a, b));
        self.records.insert(folder.to_string(), names);
    }

    /// Append `name` to a folder's order, or move it to the end if already
    /// present. New entries always sort last until manually reordered.
    pub fn append_or_move_to_end(&mut self, folder: &str, name: &str) {
        let record = self.records.entry(folder.to_string()).or_default();
        record.retain(|n| n != name);
        record.push(name.to_string());
    }

    /// Rekey a folder's own record after the folder itself was renamed.
    /// The record moves; nothing is left under the old key. Records of
    /// nested folders are keyed by their own paths and are not touched.
    pub fn rename_key(&mut self, old_folder: &str, new_folder: &str) {
        if let Some(record) = self.records.remove(old_folder) {
            self.records.insert(new_folder.to_string(), record);
        }
    }

    /// Replace the first occurrence of `old_name` in a folder's record with
    /// `new_name`, preserving its position. No-op when the folder has no
    /// record or the name is absent.
    pub fn rename_entry(&mut self, folder: &str, old_name: &str, new_name: &str) {
        if let Some(record) = self.records.get_mut(folder) {
            if let Some(slot) = record.iter_mut().find(|n| n.as_str() == old_name) {
                *slot = new_name.to_string();
            }
        }
    }
}

/// Produce the final rendering order for a folder's live children.
///
/// Names found in the record come first, in record position; names not found
/// follow, alphabetically among themselves. Pure function of its inputs.
pub fn resolve_order(children: &[String], record: Option<&[String]>) -> Vec<String> {
    let mut out = children.to_vec();
    match record {
        Some(record) => out.sort_by(|a, b| {
            let ia = record.iter().position(|n| n == a);
            let ib = record.iter().position(|n| n == b);
            match (ia, ib) {
                (Some(x), Some(y)) => x.cmp(&y),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => name_cmp(a, b),
            }
        }),
        None => out.sort_by(|a, b| name_cmp(a, b)),
    }
    out
}
