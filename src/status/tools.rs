//! Rule sets tuned for specific coding tools.
//!
//! Each follows the same tiers: busy markers yield `thinking`, decision
//! prompts yield `waiting`, crash signatures yield `error`, anything else is
//! `executing`. The shell set is the generic prompt/crash subset on a
//! shorter window.

use super::rules::{
    ends_with_shell_prompt, has_fatal_signature, recent_line_ends_with, Rule, RuleSet, Window,
    BRAILLE_SPINNER,
};
use crate::domain::Status;

const FATAL: Rule = Rule {
    name: "fatal_error",
    matches: has_fatal_signature,
    status: Status::Error,
};

// ---------------------------------------------------------------------------
// Claude
// ---------------------------------------------------------------------------

const CLAUDE_EXTRA_SPINNER: &[char] = &['✳', '✽', '✶', '✢'];

const CLAUDE_FRAME_GLYPHS: &[char] = &[
    '│', '├', '└', '─', '┌', '┐', '┘', '┤', '┬', '┴', '┼', '╭', '╰', '╮', '╯',
];

const CLAUDE_PERMISSION_PHRASES: &[&str] = &[
    "No, and tell Claude what to do differently",
    "Yes, allow once",
    "Yes, allow always",
    "Allow once",
    "Allow always",
    "│ Do you want",
    "│ Would you like",
    "│ Allow",
    "❯ Yes",
    "❯ No",
    "❯ Allow",
    "Do you trust the files in this folder?",
    "Allow this MCP server",
    "Run this command?",
    "Execute this?",
    "Action Required",
    "Waiting for user confirmation",
    "Allow execution of",
    "Use arrow keys to navigate",
    "Press Enter to select",
];

const YES_NO_PHRASES: &[&str] = &[
    "Continue?",
    "Proceed?",
    "(Y/n)",
    "(y/N)",
    "[Y/n]",
    "[y/N]",
    "(yes/no)",
    "[yes/no]",
    "Approve this plan?",
    "Execute plan?",
];

const COMPLETION_PHRASES: &[&str] = &[
    "task completed",
    "done!",
    "finished",
    "what would you like",
    "what else",
    "anything else",
    "let me know if",
];

fn is_bare_marker(line: &str) -> bool {
    matches!(line.trim(), ">" | "❯")
}

fn claude_interrupt_hint(w: &Window) -> bool {
    let lower = w.lower();
    lower.contains("ctrl+c to interrupt") || lower.contains("esc to interrupt")
}

/// Spinner glyph in the last ten lines, ignoring lines that are part of a
/// drawn frame (dialog borders reuse similar glyphs).
fn claude_spinner(w: &Window) -> bool {
    w.tail(10).iter().any(|line| {
        let framed = line
            .chars()
            .next()
            .is_some_and(|c| CLAUDE_FRAME_GLYPHS.contains(&c));
        !framed
            && line
                .chars()
                .any(|c| BRAILLE_SPINNER.contains(&c) || CLAUDE_EXTRA_SPINNER.contains(&c))
    })
}

fn claude_token_progress(w: &Window) -> bool {
    let lower = w.lower();
    lower.contains("tokens")
        && (lower.contains('…') || lower.contains("thinking") || lower.contains("connecting"))
}

fn claude_permission_dialog(w: &Window) -> bool {
    w.contains_any(CLAUDE_PERMISSION_PHRASES)
}

/// The input box is empty or holds a short draft.
fn claude_input_line(w: &Window) -> bool {
    let Some(last) = w.lines().last() else {
        return false;
    };
    if is_bare_marker(last) {
        return true;
    }
    (last.starts_with("> ") || last.starts_with("❯ "))
        && !last.contains("esc")
        && last.chars().count() < 100
}

fn claude_recent_marker(w: &Window) -> bool {
    w.tail(5).iter().any(|line| {
        is_bare_marker(line) || line.starts_with("❯ Try ") || line.starts_with("> Try ")
    })
}

fn yes_no_question(w: &Window) -> bool {
    w.contains_any(YES_NO_PHRASES)
}

fn claude_completion_then_marker(w: &Window) -> bool {
    let lower = w.lower();
    COMPLETION_PHRASES.iter().any(|p| lower.contains(p))
        && w.tail(3).iter().any(|line| is_bare_marker(line))
}

pub const CLAUDE: RuleSet = RuleSet {
    name: "claude",
    window: 15,
    rules: &[
        Rule {
            name: "interrupt_hint",
            matches: claude_interrupt_hint,
            status: Status::Thinking,
        },
        Rule {
            name: "spinner",
            matches: claude_spinner,
            status: Status::Thinking,
        },
        Rule {
            name: "token_progress",
            matches: claude_token_progress,
            status: Status::Thinking,
        },
        Rule {
            name: "permission_dialog",
            matches: claude_permission_dialog,
            status: Status::Waiting,
        },
        Rule {
            name: "input_line",
            matches: claude_input_line,
            status: Status::Waiting,
        },
        Rule {
            name: "recent_marker",
            matches: claude_recent_marker,
            status: Status::Waiting,
        },
        Rule {
            name: "yes_no_question",
            matches: yes_no_question,
            status: Status::Waiting,
        },
        Rule {
            name: "completion_then_marker",
            matches: claude_completion_then_marker,
            status: Status::Waiting,
        },
        FATAL,
    ],
    fallback: Status::Executing,
};

// ---------------------------------------------------------------------------
// OpenCode
// ---------------------------------------------------------------------------

const OPENCODE_PULSE: &[char] = &['█', '▓', '▒', '░'];

const OPENCODE_BUSY_PHRASES: &[&str] = &[
    "Thinking...",
    "Generating...",
    "Building tool call...",
    "Waiting for tool response...",
    "Loading...",
];

const OPENCODE_PROMPT_PHRASES: &[&str] = &["press enter to send", "Ask anything", "open code"];

fn opencode_interrupt_hint(w: &Window) -> bool {
    w.contains_any(&["esc interrupt", "esc to exit"])
}

fn opencode_pulse(w: &Window) -> bool {
    w.text().chars().any(|c| OPENCODE_PULSE.contains(&c))
}

fn opencode_busy_phrase(w: &Window) -> bool {
    w.contains_any(OPENCODE_BUSY_PHRASES)
}

fn opencode_prompt_phrase(w: &Window) -> bool {
    w.contains_any(OPENCODE_PROMPT_PHRASES)
}

fn trailing_angle(w: &Window) -> bool {
    recent_line_ends_with(w, ">")
}

pub const OPENCODE: RuleSet = RuleSet {
    name: "opencode",
    window: 15,
    rules: &[
        Rule {
            name: "interrupt_hint",
            matches: opencode_interrupt_hint,
            status: Status::Thinking,
        },
        Rule {
            name: "pulse",
            matches: opencode_pulse,
            status: Status::Thinking,
        },
        Rule {
            name: "busy_phrase",
            matches: opencode_busy_phrase,
            status: Status::Thinking,
        },
        Rule {
            name: "prompt_phrase",
            matches: opencode_prompt_phrase,
            status: Status::Waiting,
        },
        Rule {
            name: "trailing_angle",
            matches: trailing_angle,
            status: Status::Waiting,
        },
        FATAL,
    ],
    fallback: Status::Executing,
};

// ---------------------------------------------------------------------------
// Codex
// ---------------------------------------------------------------------------

fn codex_prompt(w: &Window) -> bool {
    w.contains_any(&["codex>", "Continue?"])
}

pub const CODEX: RuleSet = RuleSet {
    name: "codex",
    window: 15,
    rules: &[
        Rule {
            name: "codex_prompt",
            matches: codex_prompt,
            status: Status::Waiting,
        },
        Rule {
            name: "trailing_angle",
            matches: trailing_angle,
            status: Status::Waiting,
        },
        FATAL,
    ],
    fallback: Status::Executing,
};

// ---------------------------------------------------------------------------
// Shell
// ---------------------------------------------------------------------------

pub const SHELL: RuleSet = RuleSet {
    name: "shell",
    window: 10,
    rules: &[
        Rule {
            name: "shell_prompt",
            matches: ends_with_shell_prompt,
            status: Status::Idle,
        },
        FATAL,
    ],
    fallback: Status::Executing,
};
