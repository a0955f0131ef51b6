//! Filesystem watcher: turns raw notify events into classified
//! [`VaultEvent`]s keyed by vault-relative paths.
//!
//! Rename halves arrive as separate From/To notifications on Linux; the
//! watcher pairs them up before forwarding. App-initiated operations apply
//! their sync handling directly and let the echoed event through; the
//! handlers absorb it idempotently. Pause/resume backs the manual watch
//! toggle only.

use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use notify::event::{ModifyKind, RenameMode};
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::error::Result;
use crate::event::Event;
use crate::vault::VaultEvent;

/// Path components that never belong to the visible vault.
pub const DEFAULT_IGNORE_PATTERNS: &[&str] = &["node_modules", "__pycache__", "target"];

/// A classified change, still carrying absolute paths.
#[derive(Debug, Clone, PartialEq, Eq)]
enum RawChange {
    Created(PathBuf),
    Renamed { path: PathBuf, old_path: PathBuf },
    Removed(PathBuf),
    Changed(PathBuf),
}

/// Watches a vault root recursively and forwards classified changes.
pub struct VaultWatcher {
    /// Whether the watcher is currently forwarding events.
    active: Arc<AtomicBool>,
    /// Dropped to stop watching.
    _watcher: RecommendedWatcher,
}

impl VaultWatcher {
    /// Watch `root` recursively, sending classified events via `event_tx`.
    /// Paths matching `ignore_patterns` (or with hidden components) are
    /// silently dropped.
    pub fn new(
        root: &Path,
        ignore_patterns: Vec<String>,
        event_tx: mpsc::UnboundedSender<Event>,
    ) -> Result<Self> {
        let active = Arc::new(AtomicBool::new(true));
        let active_clone = active.clone();
        let root_path = root.to_path_buf();
        let mut pending_rename: Option<PathBuf> = None;

        let mut watcher = notify::recommended_watcher(
            move |result: notify::Result<notify::Event>| {
                // If paused, silently drop events
                if !active_clone.load(Ordering::Relaxed) {
                    pending_rename = None;
                    return;
                }
                let Ok(event) = result else {
                    return;
                };
                for change in classify(&event, &mut pending_rename) {
                    let Some(vault_event) =
                        to_vault_event(&root_path, &ignore_patterns, change)
                    else {
                        continue;
                    };
                    let _ = event_tx.send(Event::Vault(vault_event));
                }
            },
        )?;
        watcher.watch(root, RecursiveMode::Recursive)?;

        Ok(Self {
            active,
            _watcher: watcher,
        })
    }

    /// Pause event forwarding (watcher stays alive to avoid re-creating
    /// inotify watches).
    pub fn pause(&self) {
        self.active.store(false, Ordering::Relaxed);
    }

    /// Resume event forwarding.
    pub fn resume(&self) {
        self.active.store(true, Ordering::Relaxed);
    }

    /// Check if the watcher is currently forwarding events.
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Relaxed)
    }
}

/// Classify one notify event, pairing rename halves through `pending_rename`.
fn classify(event: &notify::Event, pending_rename: &mut Option<PathBuf>) -> Vec<RawChange> {
    let mut out = Vec::new();

    if let EventKind::Modify(ModifyKind::Name(RenameMode::To)) = event.kind {
        if let Some(path) = event.paths.first() {
            match pending_rename.take() {
                Some(old_path) => out.push(RawChange::Renamed {
                    path: path.clone(),
                    old_path,
                }),
                // A To with no From half: the entry came in from outside
                // the watched tree.
                None => out.push(RawChange::Created(path.clone())),
            }
        }
        return out;
    }

    // Any other event means a stashed From half will never pair up: the
    // entry left the watched tree.
    if let Some(old_path) = pending_rename.take() {
        out.push(RawChange::Removed(old_path));
    }

    match &event.kind {
        EventKind::Create(_) => {
            if let Some(path) = event.paths.first() {
                out.push(RawChange::Created(path.clone()));
            }
        }
        EventKind::Remove(_) => {
            if let Some(path) = event.paths.first() {
                out.push(RawChange::Removed(path.clone()));
            }
        }
        EventKind::Modify(ModifyKind::Name(RenameMode::From)) => {
            *pending_rename = event.paths.first().cloned();
        }
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => {
            if let [old_path, path] = event.paths.as_slice() {
                out.push(RawChange::Renamed {
                    path: path.clone(),
                    old_path: old_path.clone(),
                });
            }
        }
        EventKind::Modify(ModifyKind::Name(_)) => {
            // Unspecified rename half; resolve by existence.
            if let Some(path) = event.paths.first() {
                if path.exists() {
                    out.push(RawChange::Created(path.clone()));
                } else {
                    out.push(RawChange::Removed(path.clone()));
                }
            }
        }
        EventKind::Modify(_) => {
            if let Some(path) = event.paths.first() {
                out.push(RawChange::Changed(path.clone()));
            }
        }
        _ => {}
    }
    out
}

/// Convert a classified change into a vault event with relative paths.
/// Returns `None` when any involved path is outside the vault or ignored.
fn to_vault_event(
    root: &Path,
    ignore_patterns: &[String],
    change: RawChange,
) -> Option<VaultEvent> {
    let rel = |p: &Path| rel_path(root, ignore_patterns, p);
    match change {
        RawChange::Created(p) => Some(VaultEvent::Created(rel(&p)?)),
        RawChange::Removed(p) => Some(VaultEvent::Removed(rel(&p)?)),
        RawChange::Changed(p) => Some(VaultEvent::Changed(rel(&p)?)),
        RawChange::Renamed { path, old_path } => {
            match (rel(&path), rel(&old_path)) {
                (Some(path), Some(old_path)) => Some(VaultEvent::Renamed { path, old_path }),
                // Moved into the vault from an ignored or external location
                (Some(path), None) => Some(VaultEvent::Created(path)),
                // Moved out of it
                (None, Some(old_path)) => Some(VaultEvent::Removed(old_path)),
                (None, None) => None,
            }
        }
    }
}

/// Vault-relative path with `/` separators, or `None` when the path is
/// outside the root, hidden, or matches an ignore pattern.
fn rel_path(root: &Path, ignore_patterns: &[String], path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let mut parts = Vec::new();
    for component in rel.components() {
        let Component::Normal(name) = component else {
            return None;
        };
        let name = name.to_str()?;
        if name.starts_with('.') || ignore_patterns.iter().any(|p| p == name) {
            return None;
        }
        parts.push(name);
    }
    if parts.is_empty() {
        return None;
    }
    Some(parts.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, RemoveKind};

    fn ev(kind: EventKind, paths: &[&str]) -> notify::Event {
        let mut event = notify::Event::new(kind);
        for p in paths {
            event = event.add_path(PathBuf::from(p));
        }
        event
    }

    fn patterns() -> Vec<String> {
        DEFAULT_IGNORE_PATTERNS.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn create_and_remove_classify_directly() {
        let mut pending = None;
        assert_eq!(
            classify(&ev(EventKind::Create(CreateKind::File), &["/v/a.md"]), &mut pending),
            vec![RawChange::Created(PathBuf::from("/v/a.md"))]
        );
        assert_eq!(
            classify(&ev(EventKind::Remove(RemoveKind::File), &["/v/a.md"]), &mut pending),
            vec![RawChange::Removed(PathBuf::from("/v/a.md"))]
        );
    }

    #[test]
    fn rename_halves_pair_into_one_change() {
        let mut pending = None;
        let from = ev(
            EventKind::Modify(ModifyKind::Name(RenameMode::From)),
            &["/v/old.md"],
        );
        assert!(classify(&from, &mut pending).is_empty());
        assert_eq!(pending, Some(PathBuf::from("/v/old.md")));

        let to = ev(
            EventKind::Modify(ModifyKind::Name(RenameMode::To)),
            &["/v/new.md"],
        );
        assert_eq!(
            classify(&to, &mut pending),
            vec![RawChange::Renamed {
                path: PathBuf::from("/v/new.md"),
                old_path: PathBuf::from("/v/old.md"),
            }]
        );
        assert_eq!(pending, None);
    }

    #[test]
    fn unpaired_to_becomes_create() {
        let mut pending = None;
        let to = ev(
            EventKind::Modify(ModifyKind::Name(RenameMode::To)),
            &["/v/in.md"],
        );
        assert_eq!(
            classify(&to, &mut pending),
            vec![RawChange::Created(PathBuf::from("/v/in.md"))]
        );
    }

    #[test]
    fn stale_from_flushes_as_remove() {
        let mut pending = Some(PathBuf::from("/v/gone.md"));
        let changes = classify(&ev(EventKind::Create(CreateKind::File), &["/v/b.md"]), &mut pending);
        assert_eq!(
            changes,
            vec![
                RawChange::Removed(PathBuf::from("/v/gone.md")),
                RawChange::Created(PathBuf::from("/v/b.md")),
            ]
        );
        assert_eq!(pending, None);
    }

    #[test]
    fn both_mode_carries_old_and_new() {
        let mut pending = None;
        let both = ev(
            EventKind::Modify(ModifyKind::Name(RenameMode::Both)),
            &["/v/old.md", "/v/new.md"],
        );
        assert_eq!(
            classify(&both, &mut pending),
            vec![RawChange::Renamed {
                path: PathBuf::from("/v/new.md"),
                old_path: PathBuf::from("/v/old.md"),
            }]
        );
    }

    #[test]
    fn rel_path_converts_and_filters() {
        let root = Path::new("/vault");
        let pats = patterns();
        assert_eq!(
            rel_path(root, &pats, Path::new("/vault/Notes/a.md")),
            Some("Notes/a.md".to_string())
        );
        // Outside the root
        assert_eq!(rel_path(root, &pats, Path::new("/other/a.md")), None);
        // The root itself
        assert_eq!(rel_path(root, &pats, Path::new("/vault")), None);
        // Hidden (including the panel's own state file)
        assert_eq!(rel_path(root, &pats, Path::new("/vault/.notetree.json")), None);
        assert_eq!(rel_path(root, &pats, Path::new("/vault/.git/HEAD")), None);
        // Ignore patterns match exact components only
        assert_eq!(rel_path(root, &pats, Path::new("/vault/target/x")), None);
        assert_eq!(
            rel_path(root, &pats, Path::new("/vault/target2/x")),
            Some("target2/x".to_string())
        );
    }

    #[test]
    fn cross_boundary_rename_degrades_to_create_or_remove() {
        let root = Path::new("/vault");
        let pats = patterns();
        let into = to_vault_event(
            root,
            &pats,
            RawChange::Renamed {
                path: PathBuf::from("/vault/a.md"),
                old_path: PathBuf::from("/elsewhere/a.md"),
            },
        );
        assert_eq!(into, Some(VaultEvent::Created("a.md".to_string())));

        let out_of = to_vault_event(
            root,
            &pats,
            RawChange::Renamed {
                path: PathBuf::from("/elsewhere/a.md"),
                old_path: PathBuf::from("/vault/a.md"),
            },
        );
        assert_eq!(out_of, Some(VaultEvent::Removed("a.md".to_string())));
    }
}
