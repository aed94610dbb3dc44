//! `shed` CLI driver speaking its `--json` output.

use super::{CreateOpts, Server, Shed, ShedDriver};
use crate::error::ShedError;
use crate::process::{on_path, run_process, ExecOutput};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct ActionResult {
    #[serde(default)]
    status: String,
}

#[derive(Debug, Deserialize)]
struct JsonError {
    #[serde(default)]
    error: String,
}

/// Drives the `shed` binary found on `PATH`.
#[derive(Debug, Clone)]
pub struct ShedClient {
    program: String,
    enabled: bool,
}

impl ShedClient {
    pub fn new(enabled: bool) -> Self {
        Self {
            program: "shed".to_string(),
            enabled,
        }
    }

    async fn run(&self, action: &str, args: Vec<String>) -> Result<ExecOutput, ShedError> {
        debug!(action, ?args, "shed");
        let output = run_process(&self.program, &args)
            .await
            .map_err(|e| ShedError::CommandFailed {
                action: action.to_string(),
                detail: e.to_string(),
            })?;
        if output.exit_code != 0 {
            return Err(exec_error(action, &output));
        }
        Ok(output)
    }

    async fn run_json<T: DeserializeOwned>(
        &self,
        action: &str,
        args: Vec<String>,
    ) -> Result<T, ShedError> {
        let output = self.run(action, args).await?;
        serde_json::from_str(&output.stdout).map_err(|e| ShedError::Parse {
            action: action.to_string(),
            detail: e.to_string(),
        })
    }

    async fn run_action(&self, action: &str, args: Vec<String>) -> Result<(), ShedError> {
        let result: ActionResult = self.run_json(action, args).await?;
        check_action_status(action, &result.status)
    }
}

fn check_action_status(action: &str, status: &str) -> Result<(), ShedError> {
    if status == "ok" {
        Ok(())
    } else {
        Err(ShedError::Parse {
            action: action.to_string(),
            detail: format!("unexpected status {status:?}"),
        })
    }
}

/// Prefer the `{"error": ...}` payload shed writes to stderr.
pub(crate) fn exec_error(action: &str, output: &ExecOutput) -> ShedError {
    let stderr = output.stderr.trim();
    let detail = match serde_json::from_str::<JsonError>(stderr) {
        Ok(parsed) if !parsed.error.is_empty() => parsed.error,
        _ if !stderr.is_empty() => stderr.to_string(),
        _ if !output.stdout.trim().is_empty() => output.stdout.trim().to_string(),
        _ => format!("exit status {}", output.exit_code),
    };
    ShedError::CommandFailed {
        action: action.to_string(),
        detail,
    }
}

pub(crate) fn create_args(name: &str, opts: &CreateOpts) -> Vec<String> {
    let mut args = vec!["create".to_string(), name.to_string(), "--json".to_string()];
    let optional = [
        ("--repo", &opts.repo),
        ("--server", &opts.server),
        ("--image", &opts.image),
        ("--backend", &opts.backend),
    ];
    for (flag, value) in optional {
        if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
            args.push(flag.to_string());
            args.push(value.to_string());
        }
    }
    args
}

fn args(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|p| p.to_string()).collect()
}

#[async_trait]
impl ShedDriver for ShedClient {
    fn available(&self) -> bool {
        self.enabled && on_path(&self.program)
    }

    async fn list(&self) -> Result<Vec<Shed>, ShedError> {
        self.run_json("list", args(&["list", "--all", "--json"])).await
    }

    async fn list_servers(&self) -> Result<Vec<Server>, ShedError> {
        self.run_json("server list", args(&["server", "list", "--json"]))
            .await
    }

    async fn create(&self, name: &str, opts: &CreateOpts) -> Result<(), ShedError> {
        self.run_action("create", create_args(name, opts)).await
    }

    async fn start(&self, name: &str) -> Result<(), ShedError> {
        self.run_action("start", args(&["start", name, "--json"]))
            .await
    }

    async fn stop(&self, name: &str) -> Result<(), ShedError> {
        self.run_action("stop", args(&["stop", name, "--json"])).await
    }

    async fn delete(&self, name: &str, force: bool) -> Result<(), ShedError> {
        if force {
            return self
                .run_action("delete", args(&["delete", name, "--force", "--json"]))
                .await;
        }
        self.run("delete", args(&["delete", name])).await.map(|_| ())
    }
}
