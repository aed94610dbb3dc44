//! Remote-container (shed) capability and its CLI driver.

mod client;

pub use client::ShedClient;

use crate::error::ShedError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Lifecycle state reported by `shed list`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ShedState {
    Running,
    Stopped,
    #[default]
    Unknown,
}

impl From<String> for ShedState {
    fn from(value: String) -> Self {
        match value.as_str() {
            "running" => Self::Running,
            "stopped" => Self::Stopped,
            _ => Self::Unknown,
        }
    }
}

impl From<ShedState> for String {
    fn from(value: ShedState) -> Self {
        match value {
            ShedState::Running => "running",
            ShedState::Stopped => "stopped",
            ShedState::Unknown => "unknown",
        }
        .to_string()
    }
}

/// One remote development container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shed {
    pub name: String,
    #[serde(default)]
    pub server: String,
    #[serde(default)]
    pub status: ShedState,
    #[serde(default)]
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend: Option<String>,
}

/// A host that runs sheds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Server {
    pub name: String,
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub default: bool,
}

/// Optional knobs for `shed create`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateOpts {
    pub repo: Option<String>,
    pub server: Option<String>,
    pub image: Option<String>,
    pub backend: Option<String>,
}

/// Program plus arguments that run `command` inside a shed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub exec: String,
    pub args: Vec<String>,
}

/// `shed exec NAME COMMAND ARGS...`
pub fn exec_invocation(name: &str, command: &str, args: &[String]) -> Invocation {
    let mut full = vec!["exec".to_string(), name.to_string(), command.to_string()];
    full.extend(args.iter().cloned());
    Invocation {
        exec: "shed".to_string(),
        args: full,
    }
}

/// Operations against the remote-container CLI.
#[async_trait]
pub trait ShedDriver: Send + Sync {
    fn available(&self) -> bool;
    async fn list(&self) -> Result<Vec<Shed>, ShedError>;
    async fn list_servers(&self) -> Result<Vec<Server>, ShedError>;
    async fn create(&self, name: &str, opts: &CreateOpts) -> Result<(), ShedError>;
    async fn start(&self, name: &str) -> Result<(), ShedError>;
    async fn stop(&self, name: &str) -> Result<(), ShedError>;
    async fn delete(&self, name: &str, force: bool) -> Result<(), ShedError>;
    fn build_exec_invocation(&self, name: &str, command: &str, args: &[String]) -> Invocation {
        exec_invocation(name, command, args)
    }
}
