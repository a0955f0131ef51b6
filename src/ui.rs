use ratatui::{
    layout::{Constraint, Layout},
    widgets::{Block, Borders},
    Frame,
};

use crate::app::{App, AppMode};
use crate::components::dialog::DialogWidget;
use crate::components::status_bar::StatusBarWidget;
use crate::components::tree::TreeWidget;
use crate::panel::renderer::any_top_level_expanded;
use crate::theme::ThemeColors;

/// Render the application UI: the tree panel with a one-line status bar,
/// plus any dialog overlay.
pub fn render(app: &mut App, theme: &ThemeColors, frame: &mut Frame) {
    let [tree_area, status_area] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(frame.area());

    // Aggregate chevron in the title: recomputed fresh on every render.
    let chevron = match any_top_level_expanded(&app.vault, &app.collapse) {
        Ok(true) | Err(_) => "▾",
        Ok(false) => "▸",
    };
    let block = Block::default()
        .title(format!(" {} {} ", app.vault.name(), chevron))
        .borders(Borders::ALL)
        .border_style(ratatui::style::Style::default().fg(theme.border_fg));

    let tree = TreeWidget::new(&app.rows, app.selected_index, theme)
        .rainbow(&app.rainbow_colors)
        .grabbed(app.grabbed.as_deref())
        .spacing(app.row_padding, app.indentation)
        .block(block);
    frame.render_widget(tree, tree_area);

    let selected_path = app
        .selected_row()
        .map(|r| r.path.as_str())
        .unwrap_or("")
        .to_string();
    let mut status = StatusBarWidget::new(&selected_path, theme)
        .grabbed(app.grabbed.as_deref())
        .watcher_off(!app.watcher_active);
    if let Some((msg, _)) = &app.status_message {
        status = status.status_message(msg);
    }
    frame.render_widget(status, status_area);

    if let AppMode::Dialog(_) = app.mode {
        frame.render_widget(
            DialogWidget::new(&app.mode, &app.dialog_state, theme),
            frame.area(),
        );
    }
}
