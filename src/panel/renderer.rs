//! Tree rendering: turns the live vault hierarchy plus the persisted stores
//! into a flat row list for the widget layer.
//!
//! Rows are ephemeral and rebuilt wholesale on every refresh; nothing here
//! mutates the stores. Interaction is resolved elsewhere by row index and
//! routed back into the stores, the reconciler, or the sync engine.

use std::collections::BTreeMap;

use crate::error::Result;
use crate::panel::badge::{badge_for_extension, Badge};
use crate::store::collapse::CollapseStore;
use crate::store::order::{resolve_order, OrderStore};
use crate::vault::{Entry, Vault, ROOT_PATH};

/// What a row is and the affordances it carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowKind {
    Folder {
        collapsed: bool,
        /// Only folders with at least one sub-folder child show the
        /// collapse affordance; files don't count.
        collapsible: bool,
    },
    File {
        badge: Option<Badge>,
    },
}

/// One rendered tree row. Depth 1 rows are top-level "cards".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub path: String,
    pub name: String,
    /// Path of the containing folder.
    pub folder: String,
    pub depth: usize,
    pub kind: RowKind,
    /// Positional accent index for depth-1 folders, counting only folders
    /// in rendered order. The widget wraps it around the palette, so
    /// reordering cards reassigns colors.
    pub accent: Option<usize>,
    pub active: bool,
}

impl Row {
    pub fn is_folder(&self) -> bool {
        matches!(self.kind, RowKind::Folder { .. })
    }
}

/// Renders a vault subtree into rows, applying order records, collapse
/// visibility, and active-row highlighting.
pub struct TreeRenderer<'a> {
    vault: &'a dyn Vault,
    order: &'a OrderStore,
    collapse: &'a CollapseStore,
}

impl<'a> TreeRenderer<'a> {
    pub fn new(vault: &'a dyn Vault, order: &'a OrderStore, collapse: &'a CollapseStore) -> Self {
        Self {
            vault,
            order,
            collapse,
        }
    }

    /// Build the full row list from the vault root. The root itself is not
    /// rendered as a row.
    pub fn build(&self, active_path: Option<&str>) -> Result<Vec<Row>> {
        let mut rows = Vec::new();
        let mut accent = 0usize;
        let entries = self.vault.list_children(ROOT_PATH)?;
        self.walk(ROOT_PATH, entries, 0, &mut accent, active_path, &mut rows);
        Ok(rows)
    }

    fn walk(
        &self,
        folder: &str,
        entries: Vec<Entry>,
        depth: usize,
        accent: &mut usize,
        active_path: Option<&str>,
        rows: &mut Vec<Row>,
    ) {
        let names: Vec<String> = entries.iter().map(|e| e.name.clone()).collect();
        let mut by_name: BTreeMap<String, Entry> =
            entries.into_iter().map(|e| (e.name.clone(), e)).collect();

        for name in resolve_order(&names, self.order.get_order(folder)) {
            let Some(entry) = by_name.remove(&name) else {
                continue;
            };
            let child_depth = depth + 1;
            let accent_idx = if child_depth == 1 && entry.is_folder {
                let idx = *accent;
                *accent += 1;
                Some(idx)
            } else {
                None
            };
            let active = active_path == Some(entry.path.as_str());

            if entry.is_folder {
                // A folder vanishing mid-walk just renders empty.
                let children = self.vault.list_children(&entry.path).unwrap_or_default();
                let collapsible = children.iter().any(|c| c.is_folder);
                let collapsed = self.collapse.is_collapsed(&entry.path);
                rows.push(Row {
                    path: entry.path.clone(),
                    name: entry.name,
                    folder: folder.to_string(),
                    depth: child_depth,
                    kind: RowKind::Folder {
                        collapsed,
                        collapsible,
                    },
                    accent: accent_idx,
                    active,
                });
                if !collapsed {
                    self.walk(&entry.path, children, child_depth, accent, active_path, rows);
                }
            } else {
                rows.push(Row {
                    path: entry.path,
                    name: entry.name,
                    folder: folder.to_string(),
                    depth: child_depth,
                    kind: RowKind::File {
                        badge: badge_for_extension(&entry.extension),
                    },
                    accent: None,
                    active,
                });
            }
        }
    }
}

/// Names of a folder's rendered children, in visual order. Used to rebuild
/// complete order records after a drop.
pub fn visual_names(rows: &[Row], folder: &str) -> Vec<String> {
    rows.iter()
        .filter(|r| r.folder == folder)
        .map(|r| r.name.clone())
        .collect()
}

/// Row index of a path, if it is currently rendered.
pub fn find_row(rows: &[Row], path: &str) -> Option<usize> {
    rows.iter().position(|r| r.path == path)
}

/// Paths of the vault's top-level folders, used by the collapse/expand-all
/// control.
pub fn top_level_folders(vault: &dyn Vault) -> Result<Vec<String>> {
    Ok(vault
        .list_children(ROOT_PATH)?
        .into_iter()
        .filter(|e| e.is_folder)
        .map(|e| e.path)
        .collect())
}

/// Aggregate state of the collapse/expand-all control, recomputed fresh on
/// every render rather than cached.
pub fn any_top_level_expanded(vault: &dyn Vault, collapse: &CollapseStore) -> Result<bool> {
    Ok(top_level_folders(vault)?
        .iter()
        .any(|path| !collapse.is_collapsed(path)))
}
