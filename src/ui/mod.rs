//! Terminal-facing shell for the manager pane.
//!
//! Key mapping, line rendering and terminal setup live here so the event
//! loop only sees intents and never touches the terminal directly.

pub mod keys;
pub mod render;
pub mod settings;
pub mod terminal;
