//! Ratatui widgets for the panel UI.

pub mod dialog;
pub mod status_bar;
pub mod tree;
