//! Theme data model: built-in palettes and resolution from config.
//!
//! Two built-in palettes (dark and light) with custom color overrides from
//! the config file. The rainbow accent palette for top-level cards is not
//! part of the theme; it is per-vault state and travels with the vault.

use ratatui::style::Color;

use crate::config::{ThemeColorsConfig, ThemeConfig};

/// All runtime colors used in the UI.
///
/// Constructed from a config-level `ThemeConfig` via `resolve_theme()`.
#[derive(Debug, Clone)]
pub struct ThemeColors {
    // Tree panel
    pub tree_fg: Color,
    pub tree_selected_bg: Color,
    pub tree_selected_fg: Color,
    pub folder_fg: Color,
    pub file_fg: Color,

    // Status bar
    pub status_bg: Color,
    pub status_fg: Color,

    // Borders & chrome
    pub border_fg: Color,

    // Dialogs
    pub dialog_bg: Color,
    pub dialog_border_fg: Color,

    // Semantic colors (not configurable, consistent across themes)
    pub error_fg: Color,
    pub info_fg: Color,
    pub dim_fg: Color,
}

/// Dark theme using Catppuccin Mocha palette.
pub fn dark_theme() -> ThemeColors {
    ThemeColors {
        tree_fg: Color::Rgb(205, 214, 244),       // #cdd6f4 (text)
        tree_selected_bg: Color::Rgb(69, 71, 90), // #45475a (surface1)
        tree_selected_fg: Color::Rgb(205, 214, 244),
        folder_fg: Color::Rgb(137, 180, 250), // #89b4fa (blue)
        file_fg: Color::Rgb(205, 214, 244),

        status_bg: Color::Rgb(30, 30, 46), // #1e1e2e (base)
        status_fg: Color::Rgb(205, 214, 244),

        border_fg: Color::Rgb(88, 91, 112), // #585b70 (surface2)

        dialog_bg: Color::Rgb(49, 50, 68), // #313244 (surface0)
        dialog_border_fg: Color::Rgb(137, 180, 250),

        error_fg: Color::Rgb(243, 139, 168), // #f38ba8 (red)
        info_fg: Color::Rgb(137, 180, 250),   // #89b4fa (blue)
        dim_fg: Color::Rgb(108, 112, 134),    // #6c7086 (overlay0)
    }
}

/// Light theme (Catppuccin Latte).
pub fn light_theme() -> ThemeColors {
    ThemeColors {
        tree_fg: Color::Rgb(76, 79, 105), // #4c4f69 (text)
        tree_selected_bg: Color::Rgb(204, 208, 218), // #ccd0da (surface1)
        tree_selected_fg: Color::Rgb(76, 79, 105),
        folder_fg: Color::Rgb(30, 102, 245), // #1e66f5 (blue)
        file_fg: Color::Rgb(76, 79, 105),

        status_bg: Color::Rgb(239, 241, 245), // #eff1f5 (base)
        status_fg: Color::Rgb(76, 79, 105),

        border_fg: Color::Rgb(172, 176, 190), // #acb0be (surface2)

        dialog_bg: Color::Rgb(230, 233, 239), // #e6e9ef (surface0)
        dialog_border_fg: Color::Rgb(30, 102, 245),

        error_fg: Color::Rgb(210, 15, 57), // #d20f39 (red)
        info_fg: Color::Rgb(30, 102, 245),
        dim_fg: Color::Rgb(156, 160, 176), // #9ca0b0 (overlay0)
    }
}

/// Parse a hex color string like `"#aabbcc"` into a `ratatui::style::Color`.
/// Returns `None` for malformed input.
pub fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

/// Resolve the accent color for a top-level card from the rainbow palette,
/// wrapping the positional index around it. Malformed entries fall back to
/// the theme's folder color.
pub fn rainbow_color(palette: &[String], index: usize, fallback: Color) -> Color {
    if palette.is_empty() {
        return fallback;
    }
    parse_hex_color(&palette[index % palette.len()]).unwrap_or(fallback)
}

/// Resolve the final `ThemeColors` from config.
///
/// - `"dark"` (default): dark Catppuccin palette
/// - `"light"`: light Catppuccin palette
/// - `"custom"`: start from dark palette, then override with custom hex values
pub fn resolve_theme(config: &ThemeConfig) -> ThemeColors {
    let scheme = config.scheme.as_deref().unwrap_or("dark");
    match scheme {
        "light" => light_theme(),
        "custom" => {
            let mut theme = dark_theme();
            if let Some(custom) = &config.custom {
                apply_custom_colors(&mut theme, custom);
            }
            theme
        }
        _ => dark_theme(), // "dark" or any unrecognized value
    }
}

/// Apply custom hex color overrides on top of an existing theme.
fn apply_custom_colors(theme: &mut ThemeColors, custom: &ThemeColorsConfig) {
    let parse_or = |hex: &Option<String>, fallback: Color| {
        hex.as_deref().and_then(parse_hex_color).unwrap_or(fallback)
    };
    theme.tree_fg = parse_or(&custom.tree_fg, theme.tree_fg);
    theme.tree_selected_bg = parse_or(&custom.tree_selected_bg, theme.tree_selected_bg);
    theme.tree_selected_fg = parse_or(&custom.tree_selected_fg, theme.tree_selected_fg);
    theme.folder_fg = parse_or(&custom.folder_fg, theme.folder_fg);
    theme.file_fg = parse_or(&custom.file_fg, theme.file_fg);
    theme.status_bg = parse_or(&custom.status_bg, theme.status_bg);
    theme.status_fg = parse_or(&custom.status_fg, theme.status_fg);
    theme.border_fg = parse_or(&custom.border_fg, theme.border_fg);
    theme.dialog_bg = parse_or(&custom.dialog_bg, theme.dialog_bg);
    theme.dialog_border_fg = parse_or(&custom.dialog_border_fg, theme.dialog_border_fg);
}
