//! Hardcoded glyphs, colors and timings for the manager pane.
//!
//! This is the single place to tweak how the tree looks.

use crate::domain::Status;
use crossterm::style::Color;

// ---------------------------------------------------------------------------
// Layout / glyphs
// ---------------------------------------------------------------------------

pub const INDENT_1: &str = "  ";
pub const INDENT_2: &str = "    ";

pub const TITLE: &str = "Codely";
pub const GLYPH_SELECTED: &str = "› ";
pub const GLYPH_UNSELECTED: &str = "  ";
pub const GLYPH_EXPANDED: &str = "▾";
pub const GLYPH_COLLAPSED: &str = "▸";
pub const GLYPH_VISIBLE: &str = "●";
pub const GLYPH_SHED: &str = "☁";

pub const LABEL_ERROR: &str = "error:";
pub const HINT_FOOTER: &str = "? help  q quit";
pub const HINT_PICKER: &str = "enter select  / filter  esc back";
pub const HINT_SHED_PICKER: &str = "enter attach  c create  S start  / filter  esc back";
pub const HINT_NO_ANCHOR: &str = "anchor pane not found; press r to retry";

pub const HELP_LINES: &[&str] = &[
    "↑/k ↓/j   move",
    "←/h →/l   collapse / expand",
    "space     toggle project",
    "enter     focus or show session",
    "n         new project from folder",
    "N         attach shed project",
    "t         add terminal to project",
    "z         hide visible session",
    "x         close session / project",
    "X         close project",
    "S / s     start / stop shed",
    "r         refresh",
    "?         close help",
    "q         quit",
];

// ---------------------------------------------------------------------------
// Timing
// ---------------------------------------------------------------------------

pub const INPUT_POLL_MS: u64 = 80;

// ---------------------------------------------------------------------------
// Colors
// ---------------------------------------------------------------------------

pub const COLOR_TITLE: Color = Color::Cyan;
pub const COLOR_SELECTED: Color = Color::Yellow;
pub const COLOR_MUTED: Color = Color::DarkGrey;
pub const COLOR_ERROR: Color = Color::Red;
pub const COLOR_PROMPT: Color = Color::Yellow;

pub fn status_color(status: Status) -> Color {
    match status {
        Status::Waiting => Color::Yellow,
        Status::Error => Color::Red,
        Status::Thinking | Status::Executing => Color::Cyan,
        Status::Idle => Color::Green,
        Status::Unknown | Status::Exited | Status::Stopped => Color::DarkGrey,
    }
}
