//! Unified error types for codely.

use crate::domain::PaneOp;
use std::fmt;

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Errors when loading or parsing configuration.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Toml(toml::de::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "io: {e}"),
            Self::Toml(e) => write!(f, "toml: {e}"),
            Self::Invalid(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        Self::Toml(e)
    }
}

// ---------------------------------------------------------------------------
// MuxError
// ---------------------------------------------------------------------------

/// Failures talking to the terminal multiplexer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MuxError {
    /// Not running inside a tmux client.
    NotInTmux,
    /// The process could not be started at all.
    Spawn(String),
    /// tmux ran and reported a failure.
    CommandFailed { op: &'static str, detail: String },
    /// tmux output did not have the expected shape.
    Parse(String),
}

impl fmt::Display for MuxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotInTmux => write!(f, "not running inside tmux"),
            Self::Spawn(msg) => write!(f, "failed to run tmux: {msg}"),
            Self::CommandFailed { op, detail } => write!(f, "tmux {op} failed: {detail}"),
            Self::Parse(msg) => write!(f, "unexpected tmux output: {msg}"),
        }
    }
}

impl std::error::Error for MuxError {}

// ---------------------------------------------------------------------------
// ShedError
// ---------------------------------------------------------------------------

/// Failures from the remote-container CLI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShedError {
    /// `shed` is not installed or disabled in config.
    Unavailable,
    CommandFailed { action: String, detail: String },
    Parse { action: String, detail: String },
}

impl fmt::Display for ShedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable => write!(f, "shed is not available"),
            Self::CommandFailed { action, detail } => write!(f, "shed {action} failed: {detail}"),
            Self::Parse { action, detail } => {
                write!(f, "failed to parse shed {action} output: {detail}")
            }
        }
    }
}

impl std::error::Error for ShedError {}

// ---------------------------------------------------------------------------
// StoreError
// ---------------------------------------------------------------------------

/// Errors from the persistent project store.
#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    Json(serde_json::Error),
    ProjectNotFound(String),
    SessionNotFound(String),
    DuplicateProject(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "io: {e}"),
            Self::Json(e) => write!(f, "json: {e}"),
            Self::ProjectNotFound(id) => write!(f, "project not found: {id}"),
            Self::SessionNotFound(id) => write!(f, "session not found: {id}"),
            Self::DuplicateProject(id) => write!(f, "project already exists: {id}"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

// ---------------------------------------------------------------------------
// OrchestratorError
// ---------------------------------------------------------------------------

/// A pane lifecycle operation that is not legal from the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidTransition {
    pub from: &'static str,
    pub op: PaneOp,
}

impl fmt::Display for InvalidTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cannot {} a session in state {}", self.op, self.from)
    }
}

impl std::error::Error for InvalidTransition {}

/// Errors from pane visibility operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrchestratorError {
    Mux(MuxError),
    Shed(ShedError),
    /// The controlling pane could not be found; pane creation is disabled.
    NoAnchor,
    /// The session has no live pane to act on.
    NoPane(String),
    /// Another operation for this session has not finished yet.
    Busy(String),
    InvalidTransition(InvalidTransition),
}

impl fmt::Display for OrchestratorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mux(e) => write!(f, "{e}"),
            Self::Shed(e) => write!(f, "{e}"),
            Self::NoAnchor => write!(f, "anchor pane not found; run refresh to retry"),
            Self::NoPane(id) => write!(f, "session {id} has no pane"),
            Self::Busy(id) => write!(f, "session {id} is busy with another operation"),
            Self::InvalidTransition(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for OrchestratorError {}

impl From<MuxError> for OrchestratorError {
    fn from(e: MuxError) -> Self {
        Self::Mux(e)
    }
}

impl From<ShedError> for OrchestratorError {
    fn from(e: ShedError) -> Self {
        Self::Shed(e)
    }
}

impl From<InvalidTransition> for OrchestratorError {
    fn from(e: InvalidTransition) -> Self {
        Self::InvalidTransition(e)
    }
}

// ---------------------------------------------------------------------------
// CodelyError
// ---------------------------------------------------------------------------

/// Top-level error type for the binary.
#[derive(Debug)]
pub enum CodelyError {
    Config(ConfigError),
    Store(StoreError),
    Mux(MuxError),
    /// stdin or stdout is not a terminal.
    NotInteractive,
    Terminal(std::io::Error),
}

impl fmt::Display for CodelyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Store(e) => write!(f, "store: {e}"),
            Self::Mux(e) => write!(f, "{e}"),
            Self::NotInteractive => write!(f, "codely needs an interactive terminal"),
            Self::Terminal(e) => write!(f, "terminal: {e}"),
        }
    }
}

impl std::error::Error for CodelyError {}

impl From<ConfigError> for CodelyError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<StoreError> for CodelyError {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}

impl From<MuxError> for CodelyError {
    fn from(e: MuxError) -> Self {
        Self::Mux(e)
    }
}

impl From<std::io::Error> for CodelyError {
    fn from(e: std::io::Error) -> Self {
        Self::Terminal(e)
    }
}
