//! Projects, sessions and launchable commands.

use super::{PaneId, PaneState, Status, ToolMode};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

/// Where a project's sessions run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectKind {
    Local,
    #[serde(rename = "shed")]
    Remote,
}

/// Named remote container plus the server hosting it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteTarget {
    pub name: String,
    #[serde(default)]
    pub server: String,
}

/// A program that can be launched into a session pane.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Command {
    pub id: String,
    pub display_name: String,
    pub exec: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub env: BTreeMap<String, String>,
    #[serde(default)]
    pub status_detection: ToolMode,
}

impl Command {
    /// Classifier rule set for this command.
    pub fn tool_mode(&self) -> ToolMode {
        self.status_detection.resolve(&self.id, &self.exec)
    }
}

/// One launched command inside a project.
///
/// Only identity and the command are persisted. Pane state, status and exit
/// code describe the live multiplexer and reset on reload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub project_id: String,
    pub command: Command,
    #[serde(skip)]
    pub pane: PaneState,
    #[serde(skip)]
    pub status: Status,
    #[serde(skip)]
    pub started_at_millis: u64,
    #[serde(skip)]
    pub exit_code: Option<i32>,
}

impl Session {
    pub fn new(project_id: &str, command: Command) -> Self {
        Self {
            id: generate_id(),
            project_id: project_id.to_string(),
            command,
            pane: PaneState::NoPane,
            status: Status::Unknown,
            started_at_millis: now_unix_millis(),
            exit_code: None,
        }
    }

    pub fn pane_id(&self) -> Option<PaneId> {
        self.pane.pane_id()
    }

    pub fn is_visible(&self) -> bool {
        self.pane.is_visible()
    }
}

/// A working directory or remote container grouping sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub kind: ProjectKind,
    #[serde(default)]
    pub directory: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote: Option<RemoteTarget>,
    #[serde(default)]
    pub sessions: Vec<Session>,
    #[serde(skip)]
    pub expanded: bool,
}

impl Project {
    pub fn local(name: &str, directory: &str) -> Self {
        Self {
            id: generate_id(),
            name: name.to_string(),
            kind: ProjectKind::Local,
            directory: directory.to_string(),
            remote: None,
            sessions: Vec::new(),
            expanded: true,
        }
    }

    pub fn remote(shed_name: &str, server: &str) -> Self {
        Self {
            id: generate_id(),
            name: shed_name.to_string(),
            kind: ProjectKind::Remote,
            directory: String::new(),
            remote: Some(RemoteTarget {
                name: shed_name.to_string(),
                server: server.to_string(),
            }),
            sessions: Vec::new(),
            expanded: true,
        }
    }

    pub fn is_remote(&self) -> bool {
        self.kind == ProjectKind::Remote
    }

    /// Short location label: the directory, or `shed:<server>`.
    pub fn display_path(&self) -> String {
        match (&self.kind, &self.remote) {
            (ProjectKind::Remote, Some(target)) => format!("shed:{}", target.server),
            _ => self.directory.clone(),
        }
    }

    pub fn session(&self, session_id: &str) -> Option<&Session> {
        self.sessions.iter().find(|s| s.id == session_id)
    }

    pub fn session_mut(&mut self, session_id: &str) -> Option<&mut Session> {
        self.sessions.iter_mut().find(|s| s.id == session_id)
    }
}

/// Current Unix timestamp in milliseconds.
pub fn now_unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Generate an opaque hex id (`xxxx-xxxx-xxxx-xxxx`).
pub fn generate_id() -> String {
    let mut bytes = [0u8; 8];
    OsRng.fill_bytes(&mut bytes);
    let hex = format!("{:016x}", u64::from_be_bytes(bytes));
    format!(
        "{}-{}-{}-{}",
        &hex[0..4],
        &hex[4..8],
        &hex[8..12],
        &hex[12..16]
    )
}
