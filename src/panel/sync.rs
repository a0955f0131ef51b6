//! Out-of-band change handling: keeps the order and collapse stores
//! consistent when the vault mutates underneath the panel.

use crate::error::Result;
use crate::store::collapse::CollapseStore;
use crate::store::order::OrderStore;
use crate::vault::{base_name, parent_folder, Vault};

/// What the app loop must do after a vault event was absorbed: persist
/// first, then refresh, then reveal, so a refreshed view never reflects
/// unsaved state.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SyncOutcome {
    pub persist: bool,
    pub refresh: bool,
    pub reveal: Option<String>,
}

impl SyncOutcome {
    fn refresh_only() -> Self {
        Self {
            refresh: true,
            ..Self::default()
        }
    }
}

/// Reacts to vault create/rename/delete events.
#[derive(Debug, Default)]
pub struct SyncEngine {
    /// Reentrancy guard: a rename in progress suppresses the create and
    /// delete handlers that can fire for the same logical operation.
    rename_in_progress: bool,
}

impl SyncEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// A new entry appeared. New files always land at the end of their
    /// folder's order; a folder that never had a record first gets a
    /// default one synthesized from the other siblings, alphabetically.
    /// Folders just trigger a refresh and sort in unrecorded.
    pub fn handle_created(
        &mut self,
        order: &mut OrderStore,
        vault: &dyn Vault,
        path: &str,
    ) -> Result<SyncOutcome> {
        if self.rename_in_progress {
            return Ok(SyncOutcome::default());
        }
        if vault.is_folder(path) {
            return Ok(SyncOutcome::refresh_only());
        }

        let parent = parent_folder(path);
        let name = base_name(path);
        if order.get_order(&parent).is_none() {
            let siblings: Vec<String> = vault
                .list_children(&parent)?
                .into_iter()
                .map(|e| e.name)
                .filter(|n| n != name)
                .collect();
            order.ensure_default(&parent, &siblings);
        }
        order.append_or_move_to_end(&parent, name);

        Ok(SyncOutcome {
            persist: true,
            refresh: true,
            reveal: Some(path.to_string()),
        })
    }

    /// An entry moved from `old_path` to `path`. Rewrites the active path,
    /// the parent folder's order entry, and for folders also the collapse
    /// prefixes and the folder's own order key. The guard is set before any
    /// side effect and cleared unconditionally afterwards.
    pub fn handle_renamed(
        &mut self,
        order: &mut OrderStore,
        collapse: &mut CollapseStore,
        active_path: &mut Option<String>,
        vault: &dyn Vault,
        path: &str,
        old_path: &str,
    ) -> SyncOutcome {
        self.rename_in_progress = true;
        let outcome = Self::apply_rename(order, collapse, active_path, vault, path, old_path);
        self.rename_in_progress = false;
        outcome
    }

    fn apply_rename(
        order: &mut OrderStore,
        collapse: &mut CollapseStore,
        active_path: &mut Option<String>,
        vault: &dyn Vault,
        path: &str,
        old_path: &str,
    ) -> SyncOutcome {
        if active_path.as_deref() == Some(old_path) {
            *active_path = Some(path.to_string());
        }

        if vault.is_folder(path) {
            collapse.rewrite_prefix(old_path, path);
            // Only the folder's own key moves; nested records are keyed by
            // their own paths and tolerate the stale ancestor prefix.
            order.rename_key(old_path, path);
        }

        order.rename_entry(&parent_folder(path), base_name(old_path), base_name(path));

        SyncOutcome {
            persist: true,
            refresh: true,
            reveal: None,
        }
    }

    /// An entry disappeared. Stale order and collapse entries are tolerated
    /// as dead data; only a re-render is needed.
    pub fn handle_removed(&mut self) -> SyncOutcome {
        if self.rename_in_progress {
            return SyncOutcome::default();
        }
        SyncOutcome::refresh_only()
    }
}
