//! Vault collaborator: the hierarchical note storage this panel displays.
//!
//! The panel never owns the file system. It reads entries through the
//! [`Vault`] trait and requests create/move operations on it; everything
//! else (ordering, collapse state, rendering) lives in the panel's own
//! stores, keyed by the vault-relative paths defined here.
//!
//! Path convention: vault-relative strings with `/` separators. The root
//! folder is `"/"`; children of the root carry no leading slash
//! (`"Notes"`, `"Notes/a.md"`).

pub mod watcher;

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{AppError, Result};

/// Path of the vault root folder.
pub const ROOT_PATH: &str = "/";

/// Join a folder path and a child name into the child's full path.
pub fn join_child(folder: &str, name: &str) -> String {
    if folder == ROOT_PATH {
        name.to_string()
    } else {
        format!("{}/{}", folder, name)
    }
}

/// The path of the folder containing `path` (`"/"` for top-level entries).
pub fn parent_folder(path: &str) -> String {
    match path.rsplit_once('/') {
        Some((parent, _)) => parent.to_string(),
        None => ROOT_PATH.to_string(),
    }
}

/// The final name component of a path.
pub fn base_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// The extension of a file name (empty when there is none).
pub fn extension_of(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => ext,
        _ => "",
    }
}

/// A file or folder in the vault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Vault-relative path.
    pub path: String,
    /// Final name component, including any extension.
    pub name: String,
    pub is_folder: bool,
    /// File extension without the dot; empty for folders.
    pub extension: String,
}

/// A change observed in the vault, already classified by kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VaultEvent {
    /// A new entry appeared at this path.
    Created(String),
    /// An entry moved from `old_path` to `path` (rename or cross-folder move).
    Renamed { path: String, old_path: String },
    /// The entry at this path is gone.
    Removed(String),
    /// Contents changed somewhere under this path; a refresh is enough.
    Changed(String),
}

/// Read/write access to the vault hierarchy.
pub trait Vault {
    /// List the direct children of a folder, in no particular order.
    fn list_children(&self, folder: &str) -> Result<Vec<Entry>>;

    /// Create an empty file. Fails if the path already exists.
    fn create_file(&self, path: &str) -> Result<Entry>;

    /// Create a folder. Fails if the path already exists.
    fn create_folder(&self, path: &str) -> Result<Entry>;

    /// Move or rename an entry to a new vault-relative path.
    fn move_or_rename(&self, path: &str, new_path: &str) -> Result<()>;

    /// Whether the entry at this path exists and is a folder.
    fn is_folder(&self, path: &str) -> bool;
}

/// A vault backed by a directory on the local file system.
pub struct FsVault {
    root: PathBuf,
}

impl FsVault {
    /// Create a vault rooted at an existing directory.
    pub fn new(root: &Path) -> Result<Self> {
        if !root.is_dir() {
            return Err(AppError::InvalidPath(format!(
                "{} is not a directory",
                root.display()
            )));
        }
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    /// The absolute root directory of this vault.
    pub fn root_dir(&self) -> &Path {
        &self.root
    }

    /// The display name of the vault (its root directory name).
    pub fn name(&self) -> String {
        self.root
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.root.to_string_lossy().to_string())
    }

    fn abs(&self, path: &str) -> PathBuf {
        if path == ROOT_PATH {
            self.root.clone()
        } else {
            self.root.join(path)
        }
    }

    fn entry_at(&self, path: &str, is_folder: bool) -> Entry {
        let name = base_name(path).to_string();
        let extension = if is_folder {
            String::new()
        } else {
            extension_of(&name).to_string()
        };
        Entry {
            path: path.to_string(),
            name,
            is_folder,
            extension,
        }
    }
}

impl Vault for FsVault {
    /// Dotfiles (including the panel's own state file) are not part of the
    /// visible vault and are skipped.
    fn list_children(&self, folder: &str) -> Result<Vec<Entry>> {
        let mut entries = Vec::new();
        for dir_entry in fs::read_dir(self.abs(folder))? {
            let dir_entry = match dir_entry {
                Ok(e) => e,
                Err(_) => continue,
            };
            let name = dir_entry.file_name().to_string_lossy().to_string();
            if name.starts_with('.') {
                continue;
            }
            let is_folder = dir_entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            entries.push(self.entry_at(&join_child(folder, &name), is_folder));
        }
        Ok(entries)
    }

    fn create_file(&self, path: &str) -> Result<Entry> {
        fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(self.abs(path))?;
        Ok(self.entry_at(path, false))
    }

    fn create_folder(&self, path: &str) -> Result<Entry> {
        fs::create_dir(self.abs(path))?;
        Ok(self.entry_at(path, true))
    }

    fn move_or_rename(&self, path: &str, new_path: &str) -> Result<()> {
        let dest = self.abs(new_path);
        if dest.exists() {
            return Err(AppError::Vault(format!(
                "destination already exists: {}",
                new_path
            )));
        }
        fs::rename(self.abs(path), dest)?;
        Ok(())
    }

    fn is_folder(&self, path: &str) -> bool {
        self.abs(path).is_dir()
    }
}
