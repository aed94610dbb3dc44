//! tmux CLI driver.

use super::{Launch, MuxDriver, PaneInfo};
use crate::domain::PaneId;
use crate::error::MuxError;
use crate::process::{command_line, ensure_success, run_process, ExecOutput};
use async_trait::async_trait;
use tracing::{debug, warn};

const LIST_PANES_FORMAT: &str =
    "#{pane_id}:#{pane_current_command}:#{pane_active}:#{window_id}:#{pane_dead}:#{pane_dead_status}";

/// Drives a tmux server by shelling out to the `tmux` binary.
#[derive(Debug, Clone)]
pub struct TmuxClient {
    program: String,
    in_tmux: bool,
    pane_env: Option<String>,
}

impl TmuxClient {
    /// Build from `$TMUX` and `$TMUX_PANE`.
    pub fn from_env() -> Self {
        Self::new(
            std::env::var("TMUX").ok().filter(|v| !v.is_empty()).is_some(),
            std::env::var("TMUX_PANE").ok(),
        )
    }

    pub fn new(in_tmux: bool, pane_env: Option<String>) -> Self {
        Self {
            program: "tmux".to_string(),
            in_tmux,
            pane_env,
        }
    }

    async fn run(&self, op: &'static str, args: Vec<String>) -> Result<ExecOutput, MuxError> {
        debug!(op, ?args, "tmux");
        let output = run_process(&self.program, &args)
            .await
            .map_err(|e| MuxError::Spawn(e.to_string()))?;
        ensure_success(output).map_err(|detail| MuxError::CommandFailed { op, detail })
    }

    async fn run_for_pane(&self, op: &'static str, args: Vec<String>) -> Result<PaneId, MuxError> {
        let output = self.run(op, args).await?;
        parse_pane_id(&output.stdout)
    }
}

fn s(value: &str) -> String {
    value.to_string()
}

fn target(pane: PaneId) -> String {
    pane.to_string()
}

pub(crate) fn parse_pane_id(stdout: &str) -> Result<PaneId, MuxError> {
    stdout.trim().parse::<PaneId>().map_err(MuxError::Parse)
}

pub(crate) fn split_args(target_pane: Option<PaneId>, vertical: bool, launch: &Launch) -> Vec<String> {
    if launch.exec.contains([' ', '\t']) {
        warn!(exec = %launch.exec, "command exec contains whitespace; use exec + args instead");
    }
    let mut args = vec![
        s("split-window"),
        s(if vertical { "-v" } else { "-h" }),
    ];
    if let Some(pane) = target_pane {
        args.push(s("-t"));
        args.push(target(pane));
    }
    args.extend([s("-P"), s("-F"), s("#{pane_id}")]);
    if let Some(dir) = launch.dir.as_deref().filter(|d| !d.is_empty()) {
        args.push(s("-c"));
        args.push(s(dir));
    }
    args.push(command_line(&launch.exec, &launch.args, &launch.env));
    args
}

pub(crate) fn join_args(pane: PaneId, anchor: PaneId, print_id: bool) -> Vec<String> {
    let mut args = vec![
        s("join-pane"),
        s("-s"),
        target(pane),
        s("-t"),
        target(anchor),
        s("-h"),
    ];
    if print_id {
        args.extend([s("-P"), s("-F"), s("#{pane_id}")]);
    }
    args
}

/// Parse `list-panes -F LIST_PANES_FORMAT` output, skipping malformed rows.
pub(crate) fn parse_list_panes(stdout: &str) -> Vec<PaneInfo> {
    stdout
        .lines()
        .filter_map(|line| {
            let line = line.trim();
            if line.is_empty() {
                return None;
            }
            // The command may itself contain ':', so the fixed fields are
            // taken from both ends.
            let parts: Vec<&str> = line.split(':').collect();
            if parts.len() < 6 {
                return None;
            }
            let id = parts[0].parse::<PaneId>().ok()?;
            let [active, window_id, dead, dead_status] = parts[parts.len() - 4..] else {
                return None;
            };
            let dead = dead == "1";
            let dead_status = if dead {
                dead_status.parse::<i32>().ok().filter(|code| *code != -1)
            } else {
                None
            };
            Some(PaneInfo {
                id,
                command: parts[1..parts.len() - 4].join(":"),
                active: active == "1",
                window_id: window_id.to_string(),
                dead,
                dead_status,
            })
        })
        .collect()
}

#[async_trait]
impl MuxDriver for TmuxClient {
    fn in_workspace(&self) -> bool {
        self.in_tmux
    }

    async fn anchor_pane(&self) -> Result<Option<PaneId>, MuxError> {
        if let Some(id) = self
            .pane_env
            .as_deref()
            .and_then(|raw| raw.parse::<PaneId>().ok())
        {
            return Ok(Some(id));
        }
        let panes = self.list_panes().await?;
        Ok(panes.iter().find(|p| p.active).map(|p| p.id))
    }

    async fn split_from_anchor(
        &self,
        anchor: Option<PaneId>,
        launch: &Launch,
    ) -> Result<PaneId, MuxError> {
        match anchor {
            Some(pane) => self.split_from_pane(pane, false, launch).await,
            None => {
                self.run_for_pane("split-window", split_args(None, false, launch))
                    .await
            }
        }
    }

    async fn split_from_pane(
        &self,
        target_pane: PaneId,
        vertical: bool,
        launch: &Launch,
    ) -> Result<PaneId, MuxError> {
        self.run_for_pane("split-window", split_args(Some(target_pane), vertical, launch))
            .await
    }

    async fn detach_to_background(&self, pane: PaneId) -> Result<PaneId, MuxError> {
        self.run("select-pane", vec![s("select-pane"), s("-t"), target(pane)])
            .await?;
        self.run_for_pane(
            "break-pane",
            vec![s("break-pane"), s("-d"), s("-P"), s("-F"), s("#{pane_id}")],
        )
        .await
    }

    async fn attach_to_foreground(
        &self,
        pane: PaneId,
        anchor: PaneId,
    ) -> Result<PaneId, MuxError> {
        match self.run_for_pane("join-pane", join_args(pane, anchor, true)).await {
            Err(MuxError::CommandFailed { detail, .. }) if detail.contains("unknown flag -P") => {
                // Older tmux cannot print the joined id; the caller re-lists.
                self.run("join-pane", join_args(pane, anchor, false)).await?;
                Ok(pane)
            }
            other => other,
        }
    }

    async fn kill(&self, pane: PaneId) -> Result<(), MuxError> {
        self.run("kill-pane", vec![s("kill-pane"), s("-t"), target(pane)])
            .await
            .map(|_| ())
    }

    async fn capture_text(&self, pane: PaneId, lines: usize) -> Result<String, MuxError> {
        let output = self
            .run(
                "capture-pane",
                vec![
                    s("capture-pane"),
                    s("-t"),
                    target(pane),
                    s("-p"),
                    s("-S"),
                    format!("-{lines}"),
                ],
            )
            .await?;
        Ok(output.stdout)
    }

    async fn list_panes(&self) -> Result<Vec<PaneInfo>, MuxError> {
        let output = self
            .run(
                "list-panes",
                vec![s("list-panes"), s("-a"), s("-F"), s(LIST_PANES_FORMAT)],
            )
            .await?;
        Ok(parse_list_panes(&output.stdout))
    }

    async fn resize(&self, pane: PaneId, width: u16) -> Result<(), MuxError> {
        self.run(
            "resize-pane",
            vec![s("resize-pane"), s("-t"), target(pane), s("-x"), width.to_string()],
        )
        .await
        .map(|_| ())
    }

    async fn toggle_zoom(&self, pane: PaneId) -> Result<(), MuxError> {
        self.run(
            "resize-pane",
            vec![s("resize-pane"), s("-Z"), s("-t"), target(pane)],
        )
        .await
        .map(|_| ())
    }

    async fn focus(&self, pane: PaneId) -> Result<(), MuxError> {
        self.run("select-pane", vec![s("select-pane"), s("-t"), target(pane)])
            .await
            .map(|_| ())
    }

    async fn status_right(&self) -> Result<String, MuxError> {
        let output = self
            .run(
                "show-option",
                vec![s("show-option"), s("-gqv"), s("status-right")],
            )
            .await?;
        Ok(output.stdout.trim_end_matches('\n').to_string())
    }

    async fn set_status_right(&self, value: &str) -> Result<(), MuxError> {
        self.run(
            "set-option",
            vec![s("set-option"), s("-g"), s("status-right"), s(value)],
        )
        .await
        .map(|_| ())
    }

    async fn bind_jump_key(&self, key: u8, pane: PaneId) -> Result<(), MuxError> {
        self.run(
            "bind-key",
            vec![
                s("bind-key"),
                key.to_string(),
                s("select-pane"),
                s("-t"),
                target(pane),
            ],
        )
        .await
        .map(|_| ())
    }

    async fn unbind_jump_key(&self, key: u8) -> Result<(), MuxError> {
        self.run("unbind-key", vec![s("unbind-key"), key.to_string()])
            .await?;
        // Put back tmux's stock "jump to window N" binding.
        self.run(
            "bind-key",
            vec![
                s("bind-key"),
                key.to_string(),
                s("select-window"),
                s("-t"),
                format!(":{key}"),
            ],
        )
        .await
        .map(|_| ())
    }
}
