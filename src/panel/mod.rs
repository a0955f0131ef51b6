//! The tree panel proper: row rendering, drop reconciliation, file-type
//! badges, and reaction to out-of-band vault changes.

pub mod badge;
pub mod drag;
pub mod renderer;
pub mod sync;
