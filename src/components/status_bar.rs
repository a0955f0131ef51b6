use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

use crate::theme::ThemeColors;

/// Status bar widget: selected path on the left, transient messages, the
/// grabbed-entry indicator, and key hints on the right.
pub struct StatusBarWidget<'a> {
    path_str: &'a str,
    theme: &'a ThemeColors,
    status_message: Option<&'a str>,
    grabbed: Option<&'a str>,
    watcher_off: bool,
}

impl<'a> StatusBarWidget<'a> {
    pub fn new(path_str: &'a str, theme: &'a ThemeColors) -> Self {
        Self {
            path_str,
            theme,
            status_message: None,
            grabbed: None,
            watcher_off: false,
        }
    }

    pub fn status_message(mut self, msg: &'a str) -> Self {
        self.status_message = Some(msg);
        self
    }

    pub fn grabbed(mut self, grabbed: Option<&'a str>) -> Self {
        self.grabbed = grabbed;
        self
    }

    pub fn watcher_off(mut self, off: bool) -> Self {
        self.watcher_off = off;
        self
    }
}

impl<'a> Widget for StatusBarWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }
        buf.set_style(area, Style::default().bg(self.theme.status_bg));

        let width = area.width as usize;

        if let Some(msg) = self.status_message {
            // Truncation counts chars, never bytes: messages can carry
            // non-ASCII file names.
            let mut display: String = msg.chars().take(width).collect();
            let used = display.chars().count();
            if used < width {
                display.push_str(&" ".repeat(width - used));
            }
            let line = Line::from(Span::styled(
                display,
                Style::default().fg(self.theme.info_fg),
            ));
            buf.set_line(area.x, area.y, &line, area.width);
            return;
        }

        let key_hints = " a:note  A:folder  r:ren  z:fold  Space:move ";
        let hints_len = key_hints.len();
        let remaining = width.saturating_sub(hints_len);

        let path_chars = self.path_str.chars().count();
        let path_display = if path_chars > remaining {
            if remaining > 3 {
                let tail: String = self
                    .path_str
                    .chars()
                    .skip(path_chars - (remaining - 3))
                    .collect();
                format!("...{}", tail)
            } else {
                self.path_str.chars().take(remaining).collect()
            }
        } else {
            self.path_str.to_string()
        };

        let mut spans = vec![Span::styled(
            path_display.clone(),
            Style::default().fg(self.theme.status_fg),
        )];

        if let Some(grabbed) = self.grabbed {
            spans.push(Span::raw(" "));
            spans.push(Span::styled(
                format!("● moving {}", grabbed),
                Style::default()
                    .fg(self.theme.info_fg)
                    .add_modifier(Modifier::BOLD),
            ));
        }

        if self.watcher_off {
            spans.push(Span::raw(" "));
            spans.push(Span::styled(
                "[watch off]",
                Style::default()
                    .fg(self.theme.error_fg)
                    .add_modifier(Modifier::BOLD),
            ));
        }

        let used: usize = spans.iter().map(|s| s.content.chars().count()).sum();
        let pad = width.saturating_sub(used).saturating_sub(hints_len);
        if pad > 0 {
            spans.push(Span::raw(" ".repeat(pad)));
        }
        spans.push(Span::styled(
            key_hints,
            Style::default()
                .fg(self.theme.dim_fg)
                .add_modifier(Modifier::DIM),
        ));

        let line = Line::from(spans);
        buf.set_line(area.x, area.y, &line, area.width);
    }
}
