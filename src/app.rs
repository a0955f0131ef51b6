use std::path::Path;
use std::time::Instant;

use crate::error::Result;
use crate::panel::drag::{self, DropEvent};
use crate::panel::renderer::{
    any_top_level_expanded, find_row, top_level_folders, visual_names, Row, RowKind, TreeRenderer,
};
use crate::panel::sync::{SyncEngine, SyncOutcome};
use crate::store::collapse::CollapseStore;
use crate::store::order::{resolve_order, OrderStore};
use crate::store::persist::{PanelState, PanelStore};
use crate::vault::{
    base_name, extension_of, join_child, parent_folder, FsVault, Vault, VaultEvent, ROOT_PATH,
};

/// The kind of dialog being displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogKind {
    CreateFile,
    CreateFolder,
    Rename { original: String },
    Error { message: String },
}

/// Application mode.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub enum AppMode {
    #[default]
    Normal,
    Dialog(DialogKind),
}

/// State for a dialog's text input.
#[derive(Debug, Default)]
pub struct DialogState {
    pub input: String,
    pub cursor_position: usize,
}

/// Main application state.
pub struct App {
    pub vault: FsVault,
    pub order: OrderStore,
    pub collapse: CollapseStore,
    /// Blank lines after each top-level card's subtree.
    pub row_padding: u16,
    /// Columns of indent per nesting level.
    pub indentation: u16,
    pub rainbow_colors: Vec<String>,

    store: PanelStore,
    sync: SyncEngine,

    pub rows: Vec<Row>,
    pub selected_index: usize,
    /// The note currently marked active in the panel.
    pub active_path: Option<String>,
    /// An entry picked up for a keyboard move, waiting for its drop target.
    pub grabbed: Option<String>,
    /// A path to select once it appears in the rebuilt rows.
    pending_reveal: Option<String>,

    pub mode: AppMode,
    pub dialog_state: DialogState,
    pub status_message: Option<(String, Instant)>,
    pub should_quit: bool,
    pub watcher_active: bool,
}

impl App {
    /// Create a new App for the vault rooted at the given path.
    pub fn new(root: &Path) -> Result<Self> {
        let vault = FsVault::new(root)?;
        let store = PanelStore::new(root);
        let state = store.load();
        let mut app = Self {
            vault,
            order: state.order,
            collapse: state.collapsed_state,
            row_padding: state.row_padding,
            indentation: state.indentation,
            rainbow_colors: state.rainbow_colors,
            store,
            sync: SyncEngine::new(),
            rows: Vec::new(),
            selected_index: 0,
            active_path: None,
            grabbed: None,
            pending_reveal: None,
            mode: AppMode::Normal,
            dialog_state: DialogState::default(),
            status_message: None,
            should_quit: false,
            watcher_active: true,
        };
        app.refresh();
        Ok(app)
    }

    /// Rebuild the row list from the vault and stores, then resolve any
    /// pending reveal and clamp the selection.
    pub fn refresh(&mut self) {
        if let Some(path) = self.pending_reveal.clone() {
            self.prepare_reveal(&path);
        }
        let built = TreeRenderer::new(&self.vault, &self.order, &self.collapse)
            .build(self.active_path.as_deref());
        match built {
            Ok(rows) => self.rows = rows,
            Err(e) => {
                self.set_status_message(format!("Refresh failed: {}", e));
                return;
            }
        }
        if let Some(path) = self.pending_reveal.take() {
            if let Some(index) = find_row(&self.rows, &path) {
                self.selected_index = index;
            }
        }
        if self.selected_index >= self.rows.len() {
            self.selected_index = self.rows.len().saturating_sub(1);
        }
        // A grabbed entry that no longer exists cannot be dropped.
        if let Some(grabbed) = &self.grabbed {
            if find_row(&self.rows, grabbed).is_none() {
                self.grabbed = None;
            }
        }
    }

    /// Make a path about to be revealed actually reachable: expand every
    /// collapsed ancestor folder (persisting when that changed anything)
    /// and mark revealed files as the active note. Runs before the row
    /// rebuild so the revealed row exists to be selected.
    fn prepare_reveal(&mut self, path: &str) {
        let mut expanded = false;
        let mut ancestor = parent_folder(path);
        while ancestor != ROOT_PATH {
            if self.collapse.is_collapsed(&ancestor) {
                self.collapse.toggle(&ancestor);
                expanded = true;
            }
            ancestor = parent_folder(&ancestor);
        }
        if !self.vault.is_folder(path) {
            self.active_path = Some(path.to_string());
        }
        if expanded {
            self.persist_state();
        }
    }

    /// Write the full panel state through to disk.
    pub fn persist_state(&mut self) {
        let state = PanelState {
            order: self.order.clone(),
            collapsed_state: self.collapse.clone(),
            row_padding: self.row_padding,
            indentation: self.indentation,
            rainbow_colors: self.rainbow_colors.clone(),
        };
        if let Err(e) = self.store.save(&state) {
            self.set_status_message(format!("Failed to save panel state: {}", e));
        }
    }

    fn apply_outcome(&mut self, outcome: SyncOutcome) {
        // Persist before re-rendering; the view never shows unsaved state.
        if outcome.persist {
            self.persist_state();
        }
        if let Some(path) = outcome.reveal {
            self.pending_reveal = Some(path);
        }
        if outcome.refresh {
            self.refresh();
        }
    }

    pub fn selected_row(&self) -> Option<&Row> {
        self.rows.get(self.selected_index)
    }

    // ── Selection ───────────────────────────────────────────────────────────

    pub fn select_next(&mut self) {
        let len = self.rows.len();
        if len > 0 && self.selected_index < len - 1 {
            self.selected_index += 1;
        }
    }

    pub fn select_previous(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }

    pub fn select_first(&mut self) {
        self.selected_index = 0;
    }

    pub fn select_last(&mut self) {
        if !self.rows.is_empty() {
            self.selected_index = self.rows.len() - 1;
        }
    }

    // ── Collapse ────────────────────────────────────────────────────────────

    /// Toggle the selected folder's collapse state. Folders without a
    /// sub-folder child carry no collapse affordance and are left alone.
    pub fn toggle_collapse_selected(&mut self) {
        let Some(row) = self.selected_row() else {
            return;
        };
        if !matches!(
            row.kind,
            RowKind::Folder {
                collapsible: true,
                ..
            }
        ) {
            return;
        }
        let path = row.path.clone();
        self.collapse.toggle(&path);
        self.persist_state();
        self.refresh();
    }

    /// Collapse every top-level folder, or expand them all when none is
    /// expanded. Mirrors the aggregate chevron in the panel title.
    pub fn toggle_collapse_all(&mut self) {
        let folders = match top_level_folders(&self.vault) {
            Ok(f) => f,
            Err(e) => {
                self.set_status_message(format!("Refresh failed: {}", e));
                return;
            }
        };
        let collapse_them = match any_top_level_expanded(&self.vault, &self.collapse) {
            Ok(expanded) => expanded,
            Err(e) => {
                self.set_status_message(format!("Refresh failed: {}", e));
                return;
            }
        };
        let changed = self
            .collapse
            .set_all(folders.iter().map(|p| p.as_str()), collapse_them);
        if changed {
            self.persist_state();
            self.refresh();
        }
    }

    /// Enter on a row: folders toggle, files become the active note.
    pub fn open_selected(&mut self) {
        let Some(row) = self.selected_row() else {
            return;
        };
        if row.is_folder() {
            self.toggle_collapse_selected();
        } else {
            self.active_path = Some(row.path.clone());
            self.refresh();
        }
    }

    // ── Grab and drop ───────────────────────────────────────────────────────

    /// Pick up the selected entry, or drop a previously grabbed one onto the
    /// current selection.
    pub fn grab_or_drop(&mut self) {
        if self.grabbed.is_some() {
            self.drop_grabbed();
        } else if let Some(row) = self.selected_row() {
            self.grabbed = Some(row.path.clone());
        }
    }

    pub fn cancel_grab(&mut self) {
        self.grabbed = None;
    }

    fn drop_grabbed(&mut self) {
        let Some(grabbed) = self.grabbed.take() else {
            return;
        };
        let Some(target) = self.selected_row().cloned() else {
            return;
        };
        if target.path == grabbed {
            return;
        }

        let Some(event) = self.build_drop_event(&grabbed, &target) else {
            return;
        };
        if event.dest_folder == grabbed
            || event.dest_folder.starts_with(&format!("{}/", grabbed))
        {
            self.set_status_message("Cannot move a folder into itself".into());
            return;
        }

        match drag::reconcile(&mut self.order, &self.vault, &event) {
            Ok(moved) => {
                self.pending_reveal = Some(moved.unwrap_or(grabbed));
                self.persist_state();
                self.refresh();
            }
            Err(e) => self.set_status_message(format!("Move failed: {}", e)),
        }
    }

    /// Describe the drop by its final visual orders. Dropping onto a folder
    /// row moves the entry into that folder, at the end; dropping onto a
    /// file row slots it in before that file.
    fn build_drop_event(&self, grabbed: &str, target: &Row) -> Option<DropEvent> {
        let source_folder = parent_folder(grabbed);
        let name = base_name(grabbed).to_string();

        let (dest_folder, dest_order) = if target.is_folder() && target.path != source_folder {
            let dest_folder = target.path.clone();
            let children: Vec<String> = self
                .vault
                .list_children(&dest_folder)
                .ok()?
                .into_iter()
                .map(|e| e.name)
                .collect();
            let mut order = resolve_order(&children, self.order.get_order(&dest_folder));
            order.retain(|n| n != &name);
            order.push(name.clone());
            (dest_folder, order)
        } else {
            let dest_folder = target.folder.clone();
            let mut order = visual_names(&self.rows, &dest_folder);
            order.retain(|n| n != &name);
            let at = order
                .iter()
                .position(|n| n == &target.name)
                .unwrap_or(order.len());
            order.insert(at, name.clone());
            (dest_folder, order)
        };

        let source_order = if source_folder == dest_folder {
            Vec::new()
        } else {
            let mut order = visual_names(&self.rows, &source_folder);
            order.retain(|n| n != &name);
            order
        };

        Some(DropEvent {
            item_path: grabbed.to_string(),
            source_folder,
            dest_folder,
            dest_order,
            source_order,
        })
    }

    // ── Create and rename ───────────────────────────────────────────────────

    /// Folder that newly created entries land in: the selected folder, or
    /// the selected file's parent, or the vault root.
    pub fn create_target_folder(&self) -> String {
        match self.selected_row() {
            Some(row) if row.is_folder() => row.path.clone(),
            Some(row) => row.folder.clone(),
            None => ROOT_PATH.to_string(),
        }
    }

    /// Create a note with the given name. Extension-less names become
    /// markdown notes.
    pub fn create_file(&mut self, name: &str) {
        let name = if extension_of(name).is_empty() {
            format!("{}.md", name)
        } else {
            name.to_string()
        };
        let path = join_child(&self.create_target_folder(), &name);
        match self.vault.create_file(&path) {
            Ok(entry) => {
                match self.sync.handle_created(&mut self.order, &self.vault, &entry.path) {
                    Ok(outcome) => self.apply_outcome(outcome),
                    Err(e) => self.set_status_message(format!("Create failed: {}", e)),
                }
            }
            Err(e) => self.open_dialog(DialogKind::Error {
                message: format!("Create failed: {}", e),
            }),
        }
    }

    pub fn create_folder(&mut self, name: &str) {
        let path = join_child(&self.create_target_folder(), name);
        match self.vault.create_folder(&path) {
            Ok(entry) => {
                match self.sync.handle_created(&mut self.order, &self.vault, &entry.path) {
                    Ok(outcome) => {
                        self.pending_reveal = Some(entry.path);
                        self.apply_outcome(outcome);
                    }
                    Err(e) => self.set_status_message(format!("Create failed: {}", e)),
                }
            }
            Err(e) => self.open_dialog(DialogKind::Error {
                message: format!("Create failed: {}", e),
            }),
        }
    }

    /// Rename an entry in place, keeping its position in the parent order.
    pub fn rename(&mut self, old_path: &str, new_name: &str) {
        let new_path = join_child(&parent_folder(old_path), new_name);
        if new_path == old_path {
            return;
        }
        if let Err(e) = self.vault.move_or_rename(old_path, &new_path) {
            self.open_dialog(DialogKind::Error {
                message: format!("Rename failed: {}", e),
            });
            return;
        }
        let mut active = self.active_path.take();
        let outcome = self.sync.handle_renamed(
            &mut self.order,
            &mut self.collapse,
            &mut active,
            &self.vault,
            &new_path,
            old_path,
        );
        self.active_path = active;
        self.pending_reveal = Some(new_path);
        self.apply_outcome(outcome);
    }

    // ── Watcher events ──────────────────────────────────────────────────────

    /// Absorb a change observed out-of-band. Handlers are idempotent, so an
    /// echo of an app-initiated operation does no harm.
    pub fn handle_vault_event(&mut self, event: VaultEvent) {
        match event {
            VaultEvent::Created(path) => {
                match self.sync.handle_created(&mut self.order, &self.vault, &path) {
                    Ok(outcome) => self.apply_outcome(outcome),
                    Err(e) => self.set_status_message(format!("Refresh failed: {}", e)),
                }
            }
            VaultEvent::Renamed { path, old_path } => {
                let mut active = self.active_path.take();
                let outcome = self.sync.handle_renamed(
                    &mut self.order,
                    &mut self.collapse,
                    &mut active,
                    &self.vault,
                    &path,
                    &old_path,
                );
                self.active_path = active;
                self.apply_outcome(outcome);
            }
            VaultEvent::Removed(path) => {
                if self.active_path.as_deref() == Some(path.as_str()) {
                    self.active_path = None;
                }
                let outcome = self.sync.handle_removed();
                self.apply_outcome(outcome);
            }
            VaultEvent::Changed(_) => self.refresh(),
        }
    }

    // ── Dialogs ─────────────────────────────────────────────────────────────

    /// Open a dialog of the given kind.
    pub fn open_dialog(&mut self, kind: DialogKind) {
        self.dialog_state = DialogState::default();
        if let DialogKind::Rename { ref original } = kind {
            let name = base_name(original).to_string();
            self.dialog_state.cursor_position = name.len();
            self.dialog_state.input = name;
        }
        self.mode = AppMode::Dialog(kind);
    }

    /// Close the current dialog and return to normal mode.
    pub fn close_dialog(&mut self) {
        self.mode = AppMode::Normal;
        self.dialog_state = DialogState::default();
    }

    /// Insert a character at the current cursor position.
    pub fn dialog_input_char(&mut self, c: char) {
        self.dialog_state
            .input
            .insert(self.dialog_state.cursor_position, c);
        self.dialog_state.cursor_position += c.len_utf8();
    }

    /// Delete the character before the cursor (backspace).
    pub fn dialog_delete_char(&mut self) {
        if self.dialog_state.cursor_position > 0 {
            let byte_pos = self.dialog_state.cursor_position;
            let prev_char = self.dialog_state.input[..byte_pos]
                .chars()
                .next_back()
                .expect("cursor > 0 guarantees at least one char");
            self.dialog_state.cursor_position -= prev_char.len_utf8();
            self.dialog_state
                .input
                .remove(self.dialog_state.cursor_position);
        }
    }

    /// Move cursor left by one character.
    pub fn dialog_move_cursor_left(&mut self) {
        if self.dialog_state.cursor_position > 0 {
            let prev_char = self.dialog_state.input[..self.dialog_state.cursor_position]
                .chars()
                .next_back()
                .expect("cursor > 0 guarantees at least one char");
            self.dialog_state.cursor_position -= prev_char.len_utf8();
        }
    }

    /// Move cursor right by one character.
    pub fn dialog_move_cursor_right(&mut self) {
        if self.dialog_state.cursor_position < self.dialog_state.input.len() {
            let next_char = self.dialog_state.input[self.dialog_state.cursor_position..]
                .chars()
                .next()
                .expect("cursor < len guarantees at least one char");
            self.dialog_state.cursor_position += next_char.len_utf8();
        }
    }

    pub fn dialog_cursor_home(&mut self) {
        self.dialog_state.cursor_position = 0;
    }

    pub fn dialog_cursor_end(&mut self) {
        self.dialog_state.cursor_position = self.dialog_state.input.len();
    }

    // ── Status ──────────────────────────────────────────────────────────────

    /// Set a status message with current timestamp.
    pub fn set_status_message(&mut self, msg: String) {
        self.status_message = Some((msg, Instant::now()));
    }

    /// Clear the status message if it has been displayed for more than 3 seconds.
    pub fn clear_expired_status(&mut self) {
        if let Some((_, ref created)) = self.status_message {
            if created.elapsed().as_secs() > 3 {
                self.status_message = None;
            }
        }
    }

    /// Quit the application.
    pub fn quit(&mut self) {
        self.should_quit = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::persist::STATE_FILE_NAME;
    use std::fs::{self, File};
    use tempfile::TempDir;

    fn setup_app() -> (TempDir, App) {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("Notes")).unwrap();
        fs::create_dir(dir.path().join("Notes/sub")).unwrap();
        fs::create_dir(dir.path().join("Archive")).unwrap();
        File::create(dir.path().join("Notes/a.md")).unwrap();
        File::create(dir.path().join("Notes/b.md")).unwrap();
        File::create(dir.path().join("inbox.md")).unwrap();
        let app = App::new(dir.path()).unwrap();
        (dir, app)
    }

    fn row_names(app: &App) -> Vec<&str> {
        app.rows.iter().map(|r| r.path.as_str()).collect()
    }

    #[test]
    fn initial_rows_are_alphabetical() {
        let (_dir, app) = setup_app();
        assert_eq!(
            row_names(&app),
            vec![
                "Archive",
                "inbox.md",
                "Notes",
                "Notes/a.md",
                "Notes/b.md",
                "Notes/sub"
            ]
        );
    }

    #[test]
    fn selection_moves_and_clamps() {
        let (_dir, mut app) = setup_app();
        app.select_next();
        assert_eq!(app.selected_index, 1);
        app.select_last();
        assert_eq!(app.selected_index, app.rows.len() - 1);
        app.select_next();
        assert_eq!(app.selected_index, app.rows.len() - 1);
        app.select_first();
        app.select_previous();
        assert_eq!(app.selected_index, 0);
    }

    #[test]
    fn toggle_collapse_hides_children_and_persists() {
        let (dir, mut app) = setup_app();
        app.selected_index = app.rows.iter().position(|r| r.path == "Notes").unwrap();
        app.toggle_collapse_selected();
        assert!(!row_names(&app).contains(&"Notes/a.md"));

        let blob = fs::read_to_string(dir.path().join(STATE_FILE_NAME)).unwrap();
        assert!(blob.contains("Notes"));
        // Fresh app picks the collapse state back up
        let reloaded = App::new(dir.path()).unwrap();
        assert!(reloaded.collapse.is_collapsed("Notes"));
    }

    #[test]
    fn toggle_collapse_ignores_folders_without_subfolders() {
        let (_dir, mut app) = setup_app();
        app.selected_index = app.rows.iter().position(|r| r.path == "Archive").unwrap();
        let before = app.rows.len();
        app.toggle_collapse_selected();
        assert_eq!(app.rows.len(), before);
        assert!(!app.collapse.is_collapsed("Archive"));
    }

    #[test]
    fn collapse_all_then_expand_all() {
        let (_dir, mut app) = setup_app();
        app.toggle_collapse_all();
        assert!(app.collapse.is_collapsed("Notes"));
        assert!(app.collapse.is_collapsed("Archive"));
        assert!(!row_names(&app).contains(&"Notes/a.md"));

        app.toggle_collapse_all();
        assert!(!app.collapse.is_collapsed("Notes"));
        assert!(row_names(&app).contains(&"Notes/a.md"));
    }

    #[test]
    fn open_file_marks_it_active() {
        let (_dir, mut app) = setup_app();
        app.selected_index = app.rows.iter().position(|r| r.path == "Notes/a.md").unwrap();
        app.open_selected();
        assert_eq!(app.active_path.as_deref(), Some("Notes/a.md"));
        let active: Vec<&Row> = app.rows.iter().filter(|r| r.active).collect();
        assert_eq!(active.len(), 1);
    }

    #[test]
    fn grab_and_drop_reorders_within_folder() {
        let (_dir, mut app) = setup_app();
        // Grab b.md, drop it onto a.md: b lands before a
        app.selected_index = app.rows.iter().position(|r| r.path == "Notes/b.md").unwrap();
        app.grab_or_drop();
        assert_eq!(app.grabbed.as_deref(), Some("Notes/b.md"));
        app.selected_index = app.rows.iter().position(|r| r.path == "Notes/a.md").unwrap();
        app.grab_or_drop();

        assert_eq!(
            app.order.get_order("Notes").unwrap(),
            &["b.md".to_string(), "a.md".to_string(), "sub".to_string()]
        );
        assert!(app.grabbed.is_none());
        // Selection follows the moved entry
        assert_eq!(app.rows[app.selected_index].path, "Notes/b.md");
    }

    #[test]
    fn drop_onto_folder_moves_into_it() {
        let (_dir, mut app) = setup_app();
        app.selected_index = app.rows.iter().position(|r| r.path == "inbox.md").unwrap();
        app.grab_or_drop();
        app.selected_index = app.rows.iter().position(|r| r.path == "Notes").unwrap();
        app.grab_or_drop();

        assert!(app.vault.is_folder("Notes"));
        assert!(row_names(&app).contains(&"Notes/inbox.md"));
        assert_eq!(
            app.order.get_order("Notes").unwrap().last().unwrap(),
            "inbox.md"
        );
    }

    #[test]
    fn dropping_folder_into_its_descendant_is_refused() {
        let (_dir, mut app) = setup_app();
        app.selected_index = app.rows.iter().position(|r| r.path == "Notes").unwrap();
        app.grab_or_drop();
        app.selected_index = app.rows.iter().position(|r| r.path == "Notes/sub").unwrap();
        app.grab_or_drop();

        assert!(app.status_message.is_some());
        assert!(row_names(&app).contains(&"Notes"));
        assert!(!row_names(&app).contains(&"Notes/sub/Notes"));
    }

    #[test]
    fn esc_cancels_a_grab() {
        let (_dir, mut app) = setup_app();
        app.grab_or_drop();
        assert!(app.grabbed.is_some());
        app.cancel_grab();
        assert!(app.grabbed.is_none());
    }

    #[test]
    fn create_file_appends_to_order_and_reveals() {
        let (_dir, mut app) = setup_app();
        app.selected_index = app.rows.iter().position(|r| r.path == "Notes").unwrap();
        app.create_file("zzz");

        assert!(row_names(&app).contains(&"Notes/zzz.md"));
        assert_eq!(
            app.order.get_order("Notes").unwrap(),
            &[
                "a.md".to_string(),
                "b.md".to_string(),
                "sub".to_string(),
                "zzz.md".to_string()
            ]
        );
        assert_eq!(app.rows[app.selected_index].path, "Notes/zzz.md");
    }

    #[test]
    fn create_in_collapsed_folder_expands_ancestors_and_activates() {
        let (dir, mut app) = setup_app();
        app.selected_index = app.rows.iter().position(|r| r.path == "Notes").unwrap();
        app.toggle_collapse_selected();
        assert!(!row_names(&app).contains(&"Notes/a.md"));

        app.create_file("hidden");

        assert!(!app.collapse.is_collapsed("Notes"));
        assert!(row_names(&app).contains(&"Notes/hidden.md"));
        assert_eq!(app.rows[app.selected_index].path, "Notes/hidden.md");
        assert_eq!(app.active_path.as_deref(), Some("Notes/hidden.md"));
        // The expansion is written through with the rest of the state
        let reloaded = App::new(dir.path()).unwrap();
        assert!(!reloaded.collapse.is_collapsed("Notes"));
    }

    #[test]
    fn reveal_expands_nested_collapsed_ancestors() {
        let (dir, mut app) = setup_app();
        File::create(dir.path().join("Notes/sub/deep.md")).unwrap();
        app.collapse.toggle("Notes");
        app.collapse.toggle("Notes/sub");
        app.refresh();
        assert!(!row_names(&app).contains(&"Notes/sub"));

        app.handle_vault_event(VaultEvent::Created("Notes/sub/deep.md".into()));

        assert!(!app.collapse.is_collapsed("Notes"));
        assert!(!app.collapse.is_collapsed("Notes/sub"));
        assert_eq!(app.rows[app.selected_index].path, "Notes/sub/deep.md");
    }

    #[test]
    fn create_existing_file_opens_error_dialog() {
        let (_dir, mut app) = setup_app();
        app.select_first();
        app.create_file("inbox.md");
        assert!(matches!(
            app.mode,
            AppMode::Dialog(DialogKind::Error { .. })
        ));
    }

    #[test]
    fn rename_keeps_position_and_follows_active() {
        let (_dir, mut app) = setup_app();
        app.order.set_order(
            "Notes",
            vec!["b.md".into(), "a.md".into(), "sub".into()],
        );
        app.active_path = Some("Notes/b.md".into());
        app.refresh();

        app.rename("Notes/b.md", "renamed.md");
        assert_eq!(
            app.order.get_order("Notes").unwrap(),
            &[
                "renamed.md".to_string(),
                "a.md".to_string(),
                "sub".to_string()
            ]
        );
        assert_eq!(app.active_path.as_deref(), Some("Notes/renamed.md"));
        assert_eq!(app.rows[app.selected_index].path, "Notes/renamed.md");
    }

    #[test]
    fn watcher_create_event_lands_at_end_of_order() {
        let (dir, mut app) = setup_app();
        File::create(dir.path().join("Notes/new.md")).unwrap();
        app.handle_vault_event(VaultEvent::Created("Notes/new.md".into()));
        assert_eq!(
            app.order.get_order("Notes").unwrap().last().unwrap(),
            "new.md"
        );
        assert!(row_names(&app).contains(&"Notes/new.md"));
    }

    #[test]
    fn watcher_remove_event_clears_active_and_refreshes() {
        let (dir, mut app) = setup_app();
        app.active_path = Some("inbox.md".into());
        fs::remove_file(dir.path().join("inbox.md")).unwrap();
        app.handle_vault_event(VaultEvent::Removed("inbox.md".into()));
        assert!(app.active_path.is_none());
        assert!(!row_names(&app).contains(&"inbox.md"));
    }

    #[test]
    fn removing_grabbed_entry_cancels_the_grab() {
        let (dir, mut app) = setup_app();
        app.selected_index = app.rows.iter().position(|r| r.path == "inbox.md").unwrap();
        app.grab_or_drop();
        fs::remove_file(dir.path().join("inbox.md")).unwrap();
        app.handle_vault_event(VaultEvent::Removed("inbox.md".into()));
        assert!(app.grabbed.is_none());
    }

    #[test]
    fn dialog_editing_round_trip() {
        let (_dir, mut app) = setup_app();
        app.open_dialog(DialogKind::CreateFile);
        app.dialog_input_char('a');
        app.dialog_input_char('b');
        app.dialog_move_cursor_left();
        app.dialog_input_char('x');
        assert_eq!(app.dialog_state.input, "axb");
        app.dialog_cursor_end();
        app.dialog_delete_char();
        assert_eq!(app.dialog_state.input, "ax");
        app.close_dialog();
        assert_eq!(app.mode, AppMode::Normal);
        assert!(app.dialog_state.input.is_empty());
    }

    #[test]
    fn rename_dialog_prefills_name() {
        let (_dir, mut app) = setup_app();
        app.open_dialog(DialogKind::Rename {
            original: "Notes/a.md".into(),
        });
        assert_eq!(app.dialog_state.input, "a.md");
        assert_eq!(app.dialog_state.cursor_position, 4);
    }

    #[test]
    fn status_message_expiry() {
        let (_dir, mut app) = setup_app();
        app.set_status_message("fresh".into());
        app.clear_expired_status();
        assert!(app.status_message.is_some());
        app.status_message = Some((
            "old".into(),
            Instant::now() - std::time::Duration::from_secs(5),
        ));
        app.clear_expired_status();
        assert!(app.status_message.is_none());
    }

    #[test]
    fn quit_sets_flag() {
        let (_dir, mut app) = setup_app();
        app.quit();
        assert!(app.should_quit);
    }
}
