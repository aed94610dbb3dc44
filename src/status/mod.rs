//! Pane text to [`Status`] classification.
//!
//! `classify` is pure: control sequences are stripped, the last few non-empty
//! lines form a window, and an ordered rule table picks the status. The
//! generic table never reports `waiting`; only tool tables that can tell a
//! pending decision apart from an idle prompt do.

pub mod ansi;
pub mod rules;
pub mod tools;

use crate::domain::{Command, Status, ToolMode};
use rules::{RuleSet, Window};

/// Lines of scrollback captured per poll.
pub const CAPTURE_LINES: usize = 15;

/// Rule table used for an already-resolved tool mode.
///
/// `Auto` with no command identity behaves like `Generic`.
pub fn rule_set(mode: ToolMode) -> &'static RuleSet {
    match mode {
        ToolMode::Auto | ToolMode::Generic => &rules::GENERIC,
        ToolMode::Claude => &tools::CLAUDE,
        ToolMode::OpenCode => &tools::OPENCODE,
        ToolMode::Codex => &tools::CODEX,
        ToolMode::Shell => &tools::SHELL,
    }
}

/// Classify raw captured terminal text.
pub fn classify(content: &str, mode: ToolMode) -> Status {
    let plain = ansi::strip(content);
    if plain.trim().is_empty() {
        return Status::Unknown;
    }
    let set = rule_set(mode);
    set.evaluate(&Window::new(&plain, set.window))
}

/// Classify text produced by `command`, resolving `auto` against its id and
/// executable.
pub fn classify_for(content: &str, command: &Command) -> Status {
    classify(content, command.tool_mode())
}
