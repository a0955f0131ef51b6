//! Extension badges for file rows: short label plus a muted color.

use ratatui::style::Color;

/// A file-type badge shown at the end of a file row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    pub label: String,
    pub color: Color,
}

impl Badge {
    fn new(label: &str, color: Color) -> Self {
        Self {
            label: label.to_string(),
            color,
        }
    }
}

/// Badge for a file extension. Markdown notes are the vault's native format
/// and carry no badge; unknown extensions fall back to the uppercased
/// extension on a neutral color.
pub fn badge_for_extension(extension: &str) -> Option<Badge> {
    let ext = extension.to_lowercase();
    let badge = match ext.as_str() {
        "" | "md" => return None,
        "pdf" => Badge::new("PDF", Color::Rgb(0x4b, 0x85, 0x85)),
        "png" | "jpg" | "jpeg" | "gif" | "svg" | "webp" => {
            Badge::new("IMG", Color::Rgb(0x7d, 0x6a, 0x96))
        }
        "doc" | "docx" => Badge::new("DOC", Color::Rgb(0x5b, 0x7d, 0xb1)),
        "ppt" | "pptx" => Badge::new("PPT", Color::Rgb(0xc2, 0x65, 0x65)),
        "xls" | "xlsx" | "csv" => Badge::new("XLS", Color::Rgb(0x6a, 0x9c, 0x65)),
        "mp4" | "mov" | "avi" | "mkv" => Badge::new("MOV", Color::Rgb(0xa8, 0x65, 0x88)),
        "py" | "js" | "r" | "css" | "html" | "java" | "cpp" | "rs" => {
            Badge::new("CODE", Color::Rgb(0x66, 0x88, 0xaa))
        }
        "txt" => Badge::new("TXT", Color::Rgb(0x66, 0x66, 0x66)),
        _ => Badge::new(&extension.to_uppercase(), Color::Rgb(0x75, 0x75, 0x75)),
    };
    Some(badge)
}
