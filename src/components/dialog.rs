use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Padding, Widget},
};

use crate::app::{AppMode, DialogKind, DialogState};
use crate::theme::ThemeColors;

/// Dialog widget that renders a centered modal overlay.
pub struct DialogWidget<'a> {
    mode: &'a AppMode,
    dialog_state: &'a DialogState,
    theme: &'a ThemeColors,
}

impl<'a> DialogWidget<'a> {
    pub fn new(mode: &'a AppMode, dialog_state: &'a DialogState, theme: &'a ThemeColors) -> Self {
        Self {
            mode,
            dialog_state,
            theme,
        }
    }

    /// Calculate a centered rectangle within the given area.
    fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
        let x = area.x + area.width.saturating_sub(width) / 2;
        let y = area.y + area.height.saturating_sub(height) / 2;
        let w = width.min(area.width);
        let h = height.min(area.height);
        Rect::new(x, y, w, h)
    }
}

impl<'a> Widget for DialogWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let kind = match &self.mode {
            AppMode::Dialog(kind) => kind,
            _ => return,
        };

        match kind {
            DialogKind::CreateFile => {
                render_input_dialog("New Note", self.dialog_state, self.theme, area, buf);
            }
            DialogKind::CreateFolder => {
                render_input_dialog("New Folder", self.dialog_state, self.theme, area, buf);
            }
            DialogKind::Rename { .. } => {
                render_input_dialog("Rename", self.dialog_state, self.theme, area, buf);
            }
            DialogKind::Error { message } => {
                render_error_dialog(message, self.theme, area, buf);
            }
        }
    }
}

fn render_input_dialog(
    title: &str,
    state: &DialogState,
    theme: &ThemeColors,
    area: Rect,
    buf: &mut Buffer,
) {
    let dialog_width = 50.min(area.width.saturating_sub(4));
    let dialog_height = 5;
    let rect = DialogWidget::centered_rect(dialog_width, dialog_height, area);

    Clear.render(rect, buf);
    buf.set_style(rect, Style::default().bg(theme.dialog_bg));

    let block = Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.dialog_border_fg))
        .padding(Padding::horizontal(1));

    let inner = block.inner(rect);
    block.render(rect, buf);

    if inner.height == 0 || inner.width == 0 {
        return;
    }

    // Render input line with cursor
    let input = &state.input;
    let cursor_pos = state.cursor_position;
    let max_width = inner.width as usize;

    let (before, cursor_char, after) = if cursor_pos < input.len() {
        let ch = &input[cursor_pos..cursor_pos + 1];
        (&input[..cursor_pos], ch, &input[cursor_pos + 1..])
    } else {
        (input.as_str(), " ", "")
    };

    // Truncate from left if input is too long
    let total_len = before.len() + 1 + after.len();
    let before_display = if total_len > max_width && before.len() > max_width.saturating_sub(2) {
        let skip = before.len().saturating_sub(max_width.saturating_sub(2));
        &before[skip..]
    } else {
        before
    };

    let input_style = Style::default().fg(Color::White);
    let cursor_style = Style::default()
        .bg(Color::White)
        .fg(Color::Black)
        .add_modifier(Modifier::BOLD);

    let spans = vec![
        Span::styled(before_display, input_style),
        Span::styled(cursor_char, cursor_style),
        Span::styled(after, input_style),
    ];

    let line = Line::from(spans);
    buf.set_line(inner.x, inner.y + inner.height / 2, &line, inner.width);

    // Render hint at bottom
    let hint = "[Enter] Confirm  [Esc] Cancel";
    let hint_style = Style::default().fg(theme.dim_fg).add_modifier(Modifier::DIM);
    let hint_line = Line::from(Span::styled(hint, hint_style));
    if inner.height > 1 {
        buf.set_line(inner.x, inner.y + inner.height - 1, &hint_line, inner.width);
    }
}

fn render_error_dialog(message: &str, theme: &ThemeColors, area: Rect, buf: &mut Buffer) {
    let dialog_width = (message.len() as u16 + 6)
        .max(30)
        .min(area.width.saturating_sub(4));
    let dialog_height = 5;
    let rect = DialogWidget::centered_rect(dialog_width, dialog_height, area);

    Clear.render(rect, buf);
    buf.set_style(rect, Style::default().bg(theme.dialog_bg));

    let block = Block::default()
        .title(" Error ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.error_fg))
        .padding(Padding::horizontal(1));

    let inner = block.inner(rect);
    block.render(rect, buf);

    if inner.height == 0 || inner.width == 0 {
        return;
    }

    let msg_line = Line::from(Span::styled(message, Style::default().fg(theme.error_fg)));
    buf.set_line(inner.x, inner.y + inner.height / 2, &msg_line, inner.width);

    let hint = "[Enter/Esc] Dismiss";
    let hint_style = Style::default().fg(theme.dim_fg).add_modifier(Modifier::DIM);
    let hint_line = Line::from(Span::styled(hint, hint_style));
    if inner.height > 1 {
        buf.set_line(inner.x, inner.y + inner.height - 1, &hint_line, inner.width);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::dark_theme;

    fn buffer_to_string(buf: &Buffer, area: Rect) -> String {
        let mut s = String::new();
        for y in area.y..area.y + area.height {
            for x in area.x..area.x + area.width {
                s.push_str(buf.cell((x, y)).unwrap().symbol());
            }
            s.push('\n');
        }
        s
    }

    #[test]
    fn input_dialog_renders_title_and_input() {
        let mode = AppMode::Dialog(DialogKind::CreateFile);
        let state = DialogState {
            input: "meeting notes".to_string(),
            cursor_position: 13,
        };
        let tc = dark_theme();
        let widget = DialogWidget::new(&mode, &state, &tc);
        let area = Rect::new(0, 0, 80, 24);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);

        let content = buffer_to_string(&buf, area);
        assert!(content.contains("New Note"));
        assert!(content.contains("meeting notes"));
    }

    #[test]
    fn folder_dialog_renders() {
        let mode = AppMode::Dialog(DialogKind::CreateFolder);
        let state = DialogState::default();
        let tc = dark_theme();
        let widget = DialogWidget::new(&mode, &state, &tc);
        let area = Rect::new(0, 0, 80, 24);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);

        assert!(buffer_to_string(&buf, area).contains("New Folder"));
    }

    #[test]
    fn rename_dialog_renders_prefilled_name() {
        let mode = AppMode::Dialog(DialogKind::Rename {
            original: "Notes/old_name.md".to_string(),
        });
        let state = DialogState {
            input: "old_name.md".to_string(),
            cursor_position: 11,
        };
        let tc = dark_theme();
        let widget = DialogWidget::new(&mode, &state, &tc);
        let area = Rect::new(0, 0, 80, 24);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);

        let content = buffer_to_string(&buf, area);
        assert!(content.contains("Rename"));
        assert!(content.contains("old_name.md"));
    }

    #[test]
    fn error_dialog_renders_message() {
        let mode = AppMode::Dialog(DialogKind::Error {
            message: "destination already exists".to_string(),
        });
        let state = DialogState::default();
        let tc = dark_theme();
        let widget = DialogWidget::new(&mode, &state, &tc);
        let area = Rect::new(0, 0, 80, 24);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);

        let content = buffer_to_string(&buf, area);
        assert!(content.contains("Error"));
        assert!(content.contains("destination already exists"));
    }

    #[test]
    fn no_dialog_mode_is_a_noop() {
        let mode = AppMode::Normal;
        let state = DialogState::default();
        let tc = dark_theme();
        let widget = DialogWidget::new(&mode, &state, &tc);
        let area = Rect::new(0, 0, 80, 24);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);

        assert!(buffer_to_string(&buf, area).trim().is_empty());
    }
}
