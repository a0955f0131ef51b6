use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Widget},
};

use crate::panel::renderer::{Row, RowKind};
use crate::theme::{rainbow_color, ThemeColors};

/// Tree widget that renders the panel rows with card accents, collapse
/// chevrons, and file-type badges.
pub struct TreeWidget<'a> {
    rows: &'a [Row],
    selected: usize,
    theme: &'a ThemeColors,
    rainbow: &'a [String],
    grabbed: Option<&'a str>,
    row_padding: u16,
    indentation: u16,
    block: Option<Block<'a>>,
}

impl<'a> TreeWidget<'a> {
    pub fn new(rows: &'a [Row], selected: usize, theme: &'a ThemeColors) -> Self {
        Self {
            rows,
            selected,
            theme,
            rainbow: &[],
            grabbed: None,
            row_padding: 0,
            indentation: 2,
            block: None,
        }
    }

    pub fn rainbow(mut self, palette: &'a [String]) -> Self {
        self.rainbow = palette;
        self
    }

    pub fn grabbed(mut self, grabbed: Option<&'a str>) -> Self {
        self.grabbed = grabbed;
        self
    }

    pub fn spacing(mut self, row_padding: u16, indentation: u16) -> Self {
        self.row_padding = row_padding;
        self.indentation = indentation;
        self
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = block.into();
        self
    }

    fn row_line(&self, index: usize, row: &Row) -> Line<'static> {
        let selected = index == self.selected;
        let grabbed = self.grabbed == Some(row.path.as_str());

        let overlay = if selected {
            Style::default()
                .bg(self.theme.tree_selected_bg)
                .fg(self.theme.tree_selected_fg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };

        let mut spans: Vec<Span<'static>> = Vec::new();

        // Card accent bar for top-level folders, from the rainbow palette.
        if let Some(accent) = row.accent {
            let color = rainbow_color(self.rainbow, accent, self.theme.folder_fg);
            spans.push(Span::styled(
                "▌",
                if selected {
                    overlay.fg(color)
                } else {
                    Style::default().fg(color)
                },
            ));
        } else {
            spans.push(Span::styled(" ", overlay));
        }

        let indent = " ".repeat(row.depth.saturating_sub(1) * self.indentation as usize);
        spans.push(Span::styled(indent, overlay));

        if grabbed {
            spans.push(Span::styled(
                "● ",
                if selected {
                    overlay.fg(self.theme.info_fg)
                } else {
                    Style::default().fg(self.theme.info_fg)
                },
            ));
        }

        match &row.kind {
            RowKind::Folder {
                collapsed,
                collapsible,
            } => {
                let chevron = match (collapsible, collapsed) {
                    (true, true) => "▸ ",
                    (true, false) => "▾ ",
                    (false, _) => "  ",
                };
                spans.push(Span::styled(chevron.to_string(), overlay));
                let mut style = if selected {
                    overlay
                } else {
                    Style::default()
                        .fg(self.theme.folder_fg)
                        .add_modifier(Modifier::BOLD)
                };
                if grabbed {
                    style = style.add_modifier(Modifier::ITALIC);
                }
                spans.push(Span::styled(row.name.clone(), style));
            }
            RowKind::File { badge } => {
                spans.push(Span::styled("  ", overlay));
                let mut style = if selected {
                    overlay
                } else {
                    Style::default().fg(self.theme.file_fg)
                };
                if row.active {
                    style = style.add_modifier(Modifier::UNDERLINED);
                }
                if grabbed {
                    style = style.add_modifier(Modifier::ITALIC);
                }
                spans.push(Span::styled(row.name.clone(), style));
                if let Some(badge) = badge {
                    let badge_style = if selected {
                        overlay.fg(badge.color)
                    } else {
                        Style::default().fg(badge.color)
                    };
                    spans.push(Span::styled(format!(" {}", badge.label), badge_style));
                }
            }
        }

        Line::from(spans)
    }
}

/// Map rows to display lines: `Some(row index)` per row, `None` for each
/// spacer line after a top-level card's subtree.
pub fn display_lines(rows: &[Row], row_padding: u16) -> Vec<Option<usize>> {
    let mut lines = Vec::new();
    for (i, _) in rows.iter().enumerate() {
        lines.push(Some(i));
        let card_ends = rows.get(i + 1).map_or(true, |next| next.depth == 1);
        if card_ends {
            for _ in 0..row_padding {
                lines.push(None);
            }
        }
    }
    lines
}

/// Scroll offset keeping the selected display line roughly centered.
pub fn scroll_offset(total: usize, selected_line: usize, height: usize) -> usize {
    if height == 0 || total <= height {
        return 0;
    }
    selected_line
        .saturating_sub(height / 2)
        .min(total - height)
}

impl<'a> Widget for TreeWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner_area = if let Some(block) = &self.block {
            let inner = block.inner(area);
            block.clone().render(area, buf);
            inner
        } else {
            area
        };

        let height = inner_area.height as usize;
        if self.rows.is_empty() || height == 0 {
            return;
        }
        buf.set_style(inner_area, Style::default().fg(self.theme.tree_fg));

        let lines = display_lines(self.rows, self.row_padding);
        let selected_line = lines
            .iter()
            .position(|l| *l == Some(self.selected))
            .unwrap_or(0);
        let scroll = scroll_offset(lines.len(), selected_line, height);

        for (i, entry) in lines.iter().skip(scroll).take(height).enumerate() {
            let Some(row_index) = entry else {
                continue;
            };
            let row = &self.rows[*row_index];
            let line = self.row_line(*row_index, row);
            buf.set_line(inner_area.x, inner_area.y + i as u16, &line, inner_area.width);
        }
    }
}
