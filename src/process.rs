//! Child-process helpers shared by the tmux and shed drivers.

use std::collections::BTreeMap;
use std::process::Stdio;
use tokio::process::Command;

/// Captured result of one external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

/// Spawn and wait for a process with piped output.
pub async fn run_process(program: &str, args: &[String]) -> std::io::Result<ExecOutput> {
    let mut cmd = Command::new(program);
    // Aborted tasks drop their futures; take the child down with them.
    cmd.kill_on_drop(true);
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let output = cmd.output().await?;
    Ok(ExecOutput {
        exit_code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    })
}

/// Turn a non-zero exit into the most useful detail text available.
pub fn ensure_success(output: ExecOutput) -> Result<ExecOutput, String> {
    if output.exit_code == 0 {
        return Ok(output);
    }
    let mut details = if output.stderr.trim().is_empty() {
        output.stdout.trim().to_string()
    } else {
        output.stderr.trim().to_string()
    };
    if details.is_empty() {
        details = format!("command exited with {}", output.exit_code);
    }
    Err(details)
}

/// Quote one word for `sh`, leaving plain words readable.
pub fn shell_quote(s: &str) -> String {
    if s.is_empty() {
        return "''".into();
    }
    let safe = s
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '/' | ':' | '@' | '='));
    if safe {
        s.to_string()
    } else {
        format!("'{}'", s.replace('\'', "'\\''"))
    }
}

/// Build a single shell command line, prefixing `env K=V` when overrides exist.
pub fn command_line(exec: &str, args: &[String], env: &BTreeMap<String, String>) -> String {
    let mut parts = Vec::with_capacity(args.len() + env.len() + 2);
    if !env.is_empty() {
        parts.push("env".to_string());
        for (key, value) in env {
            parts.push(shell_quote(&format!("{key}={value}")));
        }
    }
    parts.push(shell_quote(exec));
    parts.extend(args.iter().map(|arg| shell_quote(arg)));
    parts.join(" ")
}

/// Whether `program` resolves to an executable on `PATH`.
pub fn on_path(program: &str) -> bool {
    let Some(paths) = std::env::var_os("PATH") else {
        return false;
    };
    std::env::split_paths(&paths).any(|dir| dir.join(program).is_file())
}
