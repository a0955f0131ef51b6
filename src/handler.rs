use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};

use crate::app::{App, AppMode, DialogKind};
use crate::panel::renderer::{find_row, RowKind};
use crate::vault::parent_folder;

/// Handle a key event.
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    match app.mode.clone() {
        AppMode::Normal => handle_normal_key(app, key),
        AppMode::Dialog(kind) => handle_dialog_key(app, kind, key),
    }
}

fn handle_normal_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit(),

        KeyCode::Char('j') | KeyCode::Down => app.select_next(),
        KeyCode::Char('k') | KeyCode::Up => app.select_previous(),
        KeyCode::Char('g') | KeyCode::Home => app.select_first(),
        KeyCode::Char('G') | KeyCode::End => app.select_last(),

        KeyCode::Enter => app.open_selected(),
        KeyCode::Char('h') | KeyCode::Left => collapse_or_jump_to_parent(app),
        KeyCode::Char('l') | KeyCode::Right => expand_selected(app),
        KeyCode::Char('z') => app.toggle_collapse_all(),

        KeyCode::Char(' ') => app.grab_or_drop(),
        KeyCode::Esc => app.cancel_grab(),

        KeyCode::Char('a') => app.open_dialog(DialogKind::CreateFile),
        KeyCode::Char('A') => app.open_dialog(DialogKind::CreateFolder),
        KeyCode::Char('r') => {
            if let Some(row) = app.selected_row() {
                let original = row.path.clone();
                app.open_dialog(DialogKind::Rename { original });
            }
        }

        KeyCode::Char('R') => app.refresh(),
        KeyCode::Char('w') => {
            app.watcher_active = !app.watcher_active;
        }
        _ => {}
    }
}

/// `h`: collapse an expanded folder, otherwise jump to the parent row.
fn collapse_or_jump_to_parent(app: &mut App) {
    let Some(row) = app.selected_row() else {
        return;
    };
    if matches!(
        row.kind,
        RowKind::Folder {
            collapsed: false,
            collapsible: true,
        }
    ) {
        app.toggle_collapse_selected();
        return;
    }
    let parent = parent_folder(&row.path);
    if let Some(index) = find_row(&app.rows, &parent) {
        app.selected_index = index;
    }
}

/// `l`: expand a collapsed folder.
fn expand_selected(app: &mut App) {
    let Some(row) = app.selected_row() else {
        return;
    };
    if matches!(
        row.kind,
        RowKind::Folder {
            collapsed: true,
            collapsible: true,
        }
    ) {
        app.toggle_collapse_selected();
    }
}

fn handle_dialog_key(app: &mut App, kind: DialogKind, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.close_dialog(),
        KeyCode::Enter => {
            let input = app.dialog_state.input.trim().to_string();
            app.close_dialog();
            match kind {
                DialogKind::CreateFile if !input.is_empty() => app.create_file(&input),
                DialogKind::CreateFolder if !input.is_empty() => app.create_folder(&input),
                DialogKind::Rename { original } if !input.is_empty() => {
                    app.rename(&original, &input)
                }
                _ => {}
            }
        }
        KeyCode::Char(c) if !matches!(kind, DialogKind::Error { .. }) => app.dialog_input_char(c),
        KeyCode::Backspace => app.dialog_delete_char(),
        KeyCode::Left => app.dialog_move_cursor_left(),
        KeyCode::Right => app.dialog_move_cursor_right(),
        KeyCode::Home => app.dialog_cursor_home(),
        KeyCode::End => app.dialog_cursor_end(),
        _ => {}
    }
}

/// Handle a mouse event (scroll wheel moves the selection).
pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent) {
    if app.mode != AppMode::Normal {
        return;
    }
    match mouse.kind {
        MouseEventKind::ScrollDown => app.select_next(),
        MouseEventKind::ScrollUp => app.select_previous(),
        _ => {}
    }
}
