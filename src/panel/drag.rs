//! Drop reconciliation: after a grab-and-drop completes, rebuild and persist
//! the affected folders' order records and relocate the entry when it
//! crossed folders.

use crate::error::Result;
use crate::store::order::OrderStore;
use crate::vault::{base_name, join_child, Vault};

/// A completed drop, described by the final visual state the user produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropEvent {
    /// Path of the moved entry, still under its source folder.
    pub item_path: String,
    pub source_folder: String,
    pub dest_folder: String,
    /// Full child-name list of the destination folder, in visual order
    /// after the drop (includes the moved item).
    pub dest_order: Vec<String>,
    /// Full child-name list of the source folder after the drop. Ignored
    /// when source and destination are the same folder.
    pub source_order: Vec<String>,
}

/// Apply a drop to the order store and, for cross-folder drops, to the vault.
///
/// Returns the moved entry's new path when a vault move was performed.
/// If the vault move fails, both order records are rolled back to their
/// pre-drop state so the panel never shows an order the file system
/// contradicts, and the error is propagated.
pub fn reconcile(
    order: &mut OrderStore,
    vault: &dyn Vault,
    drop: &DropEvent,
) -> Result<Option<String>> {
    let snapshot = order.clone();

    order.set_order(&drop.dest_folder, drop.dest_order.clone());
    if drop.source_folder == drop.dest_folder {
        return Ok(None);
    }
    order.set_order(&drop.source_folder, drop.source_order.clone());

    let new_path = join_child(&drop.dest_folder, base_name(&drop.item_path));
    if let Err(e) = vault.move_or_rename(&drop.item_path, &new_path) {
        *order = snapshot;
        return Err(e);
    }
    Ok(Some(new_path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::vault::Entry;
    use std::cell::RefCell;

    /// Vault double that records move requests and can be made to fail them.
    struct MockVault {
        moves: RefCell<Vec<(String, String)>>,
        fail_moves: bool,
    }

    impl MockVault {
        fn new(fail_moves: bool) -> Self {
            Self {
                moves: RefCell::new(Vec::new()),
                fail_moves,
            }
        }
    }

    impl Vault for MockVault {
        fn list_children(&self, _folder: &str) -> Result<Vec<Entry>> {
            Ok(Vec::new())
        }

        fn create_file(&self, path: &str) -> Result<Entry> {
            Err(AppError::Vault(format!("unexpected create: {}", path)))
        }

        fn create_folder(&self, path: &str) -> Result<Entry> {
            Err(AppError::Vault(format!("unexpected create: {}", path)))
        }

        fn move_or_rename(&self, path: &str, new_path: &str) -> Result<()> {
            if self.fail_moves {
                return Err(AppError::Vault("move failed".into()));
            }
            self.moves
                .borrow_mut()
                .push((path.to_string(), new_path.to_string()));
            Ok(())
        }

        fn is_folder(&self, _path: &str) -> bool {
            true
        }
    }

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn same_folder_drop_rewrites_order_without_move() {
        let mut order = OrderStore::default();
        order.set_order("Notes", names(&["a.md", "b.md", "c.md"]));
        let vault = MockVault::new(false);

        let moved = reconcile(
            &mut order,
            &vault,
            &DropEvent {
                item_path: "Notes/c.md".into(),
                source_folder: "Notes".into(),
                dest_folder: "Notes".into(),
                dest_order: names(&["c.md", "a.md", "b.md"]),
                source_order: Vec::new(),
            },
        )
        .unwrap();

        assert_eq!(moved, None);
        assert_eq!(
            order.get_order("Notes").unwrap(),
            names(&["c.md", "a.md", "b.md"])
        );
        assert!(vault.moves.borrow().is_empty());
    }

    #[test]
    fn cross_folder_drop_updates_both_orders_and_moves() {
        let mut order = OrderStore::default();
        order.set_order("A", names(&["x.md", "y.md"]));
        order.set_order("B", names(&["p.md"]));
        let vault = MockVault::new(false);

        let moved = reconcile(
            &mut order,
            &vault,
            &DropEvent {
                item_path: "A/x.md".into(),
                source_folder: "A".into(),
                dest_folder: "B".into(),
                dest_order: names(&["p.md", "x.md"]),
                source_order: names(&["y.md"]),
            },
        )
        .unwrap();

        assert_eq!(moved.as_deref(), Some("B/x.md"));
        assert_eq!(order.get_order("A").unwrap(), names(&["y.md"]));
        assert_eq!(order.get_order("B").unwrap(), names(&["p.md", "x.md"]));
        assert_eq!(
            vault.moves.borrow().as_slice(),
            &[("A/x.md".to_string(), "B/x.md".to_string())]
        );
    }

    #[test]
    fn drop_into_root_joins_without_prefix() {
        let mut order = OrderStore::default();
        order.set_order("A", names(&["x.md"]));
        let vault = MockVault::new(false);

        let moved = reconcile(
            &mut order,
            &vault,
            &DropEvent {
                item_path: "A/x.md".into(),
                source_folder: "A".into(),
                dest_folder: "/".into(),
                dest_order: names(&["inbox.md", "x.md"]),
                source_order: Vec::new(),
            },
        )
        .unwrap();

        assert_eq!(moved.as_deref(), Some("x.md"));
    }

    #[test]
    fn failed_move_rolls_back_both_orders() {
        let mut order = OrderStore::default();
        order.set_order("A", names(&["x.md", "y.md"]));
        let vault = MockVault::new(true);

        let result = reconcile(
            &mut order,
            &vault,
            &DropEvent {
                item_path: "A/x.md".into(),
                source_folder: "A".into(),
                dest_folder: "B".into(),
                dest_order: names(&["x.md"]),
                source_order: names(&["y.md"]),
            },
        );

        assert!(result.is_err());
        // Pre-drop state restored: A untouched, B never materialized
        assert_eq!(order.get_order("A").unwrap(), names(&["x.md", "y.md"]));
        assert!(order.get_order("B").is_none());
    }
}
