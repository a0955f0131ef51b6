//! Persisted panel state: the JSON blob holding order records, collapse
//! state, and visual settings.
//!
//! The blob is versionless; missing fields merge with defaults on load, so
//! new fields can be added without a migration. State lives in a dotfile at
//! the vault root (`.notetree.json`) and is written through after every
//! mutation; the save completes before any dependent re-render.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::store::collapse::CollapseStore;
use crate::store::order::OrderStore;

/// File name of the panel state blob inside the vault root.
pub const STATE_FILE_NAME: &str = ".notetree.json";

fn default_row_padding() -> u16 {
    1
}

fn default_indentation() -> u16 {
    2
}

/// Accent palette cycled across top-level folders, in card order.
fn default_rainbow_colors() -> Vec<String> {
    [
        "#ff7875", "#ff9c6e", "#fadb14", "#95de64", "#5cdbd3", "#69c0ff", "#b37feb", "#ff85c0",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Everything the panel persists between sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PanelState {
    pub order: OrderStore,
    pub collapsed_state: CollapseStore,
    /// Blank lines after each top-level card's subtree.
    pub row_padding: u16,
    /// Columns of indent per nesting level.
    pub indentation: u16,
    pub rainbow_colors: Vec<String>,
}

impl Default for PanelState {
    fn default() -> Self {
        Self {
            order: OrderStore::default(),
            collapsed_state: CollapseStore::default(),
            row_padding: default_row_padding(),
            indentation: default_indentation(),
            rainbow_colors: default_rainbow_colors(),
        }
    }
}

/// Handle to the on-disk state file.
pub struct PanelStore {
    path: PathBuf,
}

impl PanelStore {
    /// Store handle for a vault rooted at `vault_root`.
    pub fn new(vault_root: &Path) -> Self {
        Self {
            path: vault_root.join(STATE_FILE_NAME),
        }
    }

    /// Load the persisted state, merging with defaults.
    ///
    /// A missing file yields pure defaults; a malformed file does the same
    /// with a warning on stderr rather than refusing to start.
    pub fn load(&self) -> PanelState {
        let content = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(_) => return PanelState::default(),
        };
        match serde_json::from_str::<PanelState>(&content) {
            Ok(state) => state,
            Err(e) => {
                eprintln!(
                    "Warning: failed to parse state file {}: {}",
                    self.path.display(),
                    e
                );
                PanelState::default()
            }
        }
    }

    /// Write the full state to disk.
    pub fn save(&self, state: &PanelState) -> Result<()> {
        let json = serde_json::to_string_pretty(state)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}
