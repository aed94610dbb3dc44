//! Ordered rule tables and the shared predicates they are built from.
//!
//! A rule set is an ordered slice of `predicate -> Status` entries evaluated
//! against a window of recent lines. The first matching rule wins, so the
//! slice order is the precedence order.

use crate::domain::Status;
use once_cell::sync::Lazy;
use regex::Regex;

/// Recent non-empty lines of stripped pane text.
#[derive(Debug)]
pub struct Window {
    lines: Vec<String>,
    joined: String,
    lower: String,
}

impl Window {
    /// Keep the last `size` non-empty trimmed lines, preserving order.
    pub fn new(plain: &str, size: usize) -> Self {
        let mut lines: Vec<String> = plain
            .lines()
            .rev()
            .map(|line| line.replace('\u{a0}', " ").trim().to_string())
            .filter(|line| !line.is_empty())
            .take(size)
            .collect();
        lines.reverse();
        let joined = lines.join("\n");
        let lower = joined.to_lowercase();
        Self {
            lines,
            joined,
            lower,
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// The last `n` lines of the window.
    pub fn tail(&self, n: usize) -> &[String] {
        let start = self.lines.len().saturating_sub(n);
        &self.lines[start..]
    }

    pub fn text(&self) -> &str {
        &self.joined
    }

    pub fn lower(&self) -> &str {
        &self.lower
    }

    pub fn contains_any(&self, needles: &[&str]) -> bool {
        needles.iter().any(|n| self.joined.contains(n))
    }
}

/// One classification rule.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    pub matches: fn(&Window) -> bool,
    pub status: Status,
}

/// Window size plus ordered rules plus the status used when nothing matches.
#[derive(Debug, Clone, Copy)]
pub struct RuleSet {
    pub name: &'static str,
    pub window: usize,
    pub rules: &'static [Rule],
    pub fallback: Status,
}

impl RuleSet {
    pub fn first_match(&self, window: &Window) -> Option<&'static Rule> {
        self.rules.iter().find(|rule| (rule.matches)(window))
    }

    pub fn evaluate(&self, window: &Window) -> Status {
        self.first_match(window)
            .map(|rule| rule.status)
            .unwrap_or(self.fallback)
    }
}

// ---------------------------------------------------------------------------
// Shared predicates
// ---------------------------------------------------------------------------

pub(crate) const BRAILLE_SPINNER: &[char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

const THINKING_WORDS: &[&str] = &[
    "thinking",
    "analyzing",
    "reading",
    "processing",
    "generating",
    "working",
    "loading",
];

const FATAL_SIGNATURES: &[&str] = &[
    "panic:",
    "Traceback",
    "Segmentation fault",
    "core dumped",
    "fatal error:",
    "FATAL:",
];

const TUI_BOX_GLYPHS: &[char] = &['│', '┌', '└', '┐', '┘', '─'];
const TUI_KEYWORDS: &[&str] = &["Status", "Files", "Branches", "Commits"];

static PROMPT_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"^[>$#%]\s*$",
        r"^claude[>:]\s*$",
        r"^opencode[>:]\s*$",
        r"^\(.*\)[>$]\s*$",
        r"^[A-Za-z0-9_]+@[A-Za-z0-9_-]+[:#].*[$#]\s*$",
    ]
    .iter()
    .filter_map(|pattern| Regex::new(pattern).ok())
    .collect()
});

pub(crate) fn has_braille_spinner(w: &Window) -> bool {
    w.lines()
        .iter()
        .any(|line| line.chars().any(|c| BRAILLE_SPINNER.contains(&c)))
}

pub(crate) fn has_thinking_text(w: &Window) -> bool {
    w.lines().iter().any(|line| {
        let lower = line.to_lowercase();
        THINKING_WORDS
            .iter()
            .any(|word| lower.starts_with(word) || lower.contains(&format!("{word}...")))
    })
}

/// Full-screen git-style TUI: at least three boxed lines plus a panel title.
pub(crate) fn looks_like_interactive_tui(w: &Window) -> bool {
    let boxed = w
        .lines()
        .iter()
        .filter(|line| line.chars().any(|c| TUI_BOX_GLYPHS.contains(&c)))
        .count();
    boxed >= 3 && w.contains_any(TUI_KEYWORDS)
}

pub(crate) fn ends_with_shell_prompt(w: &Window) -> bool {
    w.tail(3).iter().any(|line| {
        PROMPT_PATTERNS
            .iter()
            .any(|pattern| pattern.is_match(line))
    })
}

pub(crate) fn has_fatal_signature(w: &Window) -> bool {
    w.contains_any(FATAL_SIGNATURES)
}

/// Any of the last five lines ends with `suffix`.
pub(crate) fn recent_line_ends_with(w: &Window, suffix: &str) -> bool {
    w.tail(5).iter().any(|line| line.ends_with(suffix))
}

// ---------------------------------------------------------------------------
// Generic rule set
// ---------------------------------------------------------------------------

pub const GENERIC: RuleSet = RuleSet {
    name: "generic",
    window: 15,
    rules: &[
        Rule {
            name: "spinner",
            matches: has_braille_spinner,
            status: Status::Thinking,
        },
        Rule {
            name: "thinking_text",
            matches: has_thinking_text,
            status: Status::Thinking,
        },
        Rule {
            name: "interactive_tui",
            matches: looks_like_interactive_tui,
            status: Status::Idle,
        },
        Rule {
            name: "shell_prompt",
            matches: ends_with_shell_prompt,
            status: Status::Idle,
        },
        Rule {
            name: "fatal_error",
            matches: has_fatal_signature,
            status: Status::Error,
        },
    ],
    fallback: Status::Executing,
};

#[cfg(test)]
mod tests {
    use super::*;

    fn window(text: &str) -> Window {
        Window::new(text, 15)
    }

    #[test]
    fn window_keeps_last_non_empty_lines_in_order() {
        let w = Window::new("a\n\n b \nc\n\n", 2);
        assert_eq!(w.lines(), &["b".to_string(), "c".to_string()]);
    }

    #[test]
    fn all_prompt_patterns_compile() {
        assert_eq!(PROMPT_PATTERNS.len(), 5);
    }

    #[test]
    fn shell_prompt_forms() {
        for prompt in ["$", "#", "%", ">", "claude>", "opencode:", "(venv)$", "me@box-1:~/src$"] {
            assert!(ends_with_shell_prompt(&window(prompt)), "{prompt}");
        }
        assert!(!ends_with_shell_prompt(&window("cost: $5 total")));
    }

    #[test]
    fn prompt_only_counts_in_last_three_lines() {
        let w = window("$\none\ntwo\nthree");
        assert!(!ends_with_shell_prompt(&w));
    }

    #[test]
    fn thinking_text_requires_prefix_or_ellipsis() {
        assert!(has_thinking_text(&window("Reading files")));
        assert!(has_thinking_text(&window("step 2: analyzing...")));
        assert!(!has_thinking_text(&window("done reading")));
    }

    #[test]
    fn interactive_tui_needs_boxes_and_keyword() {
        let tui = "┌─ Status ─┐\n│ repo     │\n└──────────┘";
        assert!(looks_like_interactive_tui(&window(tui)));
        assert!(!looks_like_interactive_tui(&window("│ a\n│ b\n│ c")));
    }

    #[test]
    fn generic_order_spinner_beats_prompt() {
        let w = window("⠙ compiling\n$");
        assert_eq!(GENERIC.first_match(&w).map(|r| r.name), Some("spinner"));
        assert_eq!(GENERIC.evaluate(&w), Status::Thinking);
    }

    #[test]
    fn generic_order_prompt_beats_fatal() {
        let w = window("panic: boom\n$");
        assert_eq!(GENERIC.evaluate(&w), Status::Idle);
    }

    #[test]
    fn generic_falls_back_to_executing() {
        assert_eq!(GENERIC.evaluate(&window("compiling crate foo")), Status::Executing);
    }
}
