//! Multiplexer capability used by the orchestrator, plus the tmux driver.

mod client;

pub use client::TmuxClient;

use crate::domain::PaneId;
use crate::error::MuxError;
use async_trait::async_trait;
use std::collections::BTreeMap;

/// One row of `list-panes`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaneInfo {
    pub id: PaneId,
    pub command: String,
    pub active: bool,
    pub window_id: String,
    pub dead: bool,
    pub dead_status: Option<i32>,
}

/// What to run in a new pane and where.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Launch {
    pub dir: Option<String>,
    pub exec: String,
    pub args: Vec<String>,
    pub env: BTreeMap<String, String>,
}

/// Window hosting `pane`, if it is live.
pub fn window_of<'a>(panes: &'a [PaneInfo], pane: PaneId) -> Option<&'a str> {
    panes
        .iter()
        .find(|p| p.id == pane)
        .map(|p| p.window_id.as_str())
}

/// Panes sharing the anchor's window, excluding the anchor itself.
pub fn anchor_neighbours(panes: &[PaneInfo], anchor: PaneId) -> Vec<PaneId> {
    let Some(window) = window_of(panes, anchor) else {
        return Vec::new();
    };
    panes
        .iter()
        .filter(|p| p.window_id == window && p.id != anchor)
        .map(|p| p.id)
        .collect()
}

/// Discrete operations against an existing multiplexer server.
#[async_trait]
pub trait MuxDriver: Send + Sync {
    /// Whether this process runs inside a multiplexer client.
    fn in_workspace(&self) -> bool;
    /// The pane hosting this process, if it can be determined.
    async fn anchor_pane(&self) -> Result<Option<PaneId>, MuxError>;
    /// Split next to the anchor (or the current window when `None`).
    async fn split_from_anchor(
        &self,
        anchor: Option<PaneId>,
        launch: &Launch,
    ) -> Result<PaneId, MuxError>;
    async fn split_from_pane(
        &self,
        target: PaneId,
        vertical: bool,
        launch: &Launch,
    ) -> Result<PaneId, MuxError>;
    /// Move a pane into its own background window. Returns its new id.
    async fn detach_to_background(&self, pane: PaneId) -> Result<PaneId, MuxError>;
    /// Join a background pane next to `anchor`. Returns its new id, which
    /// some tmux versions cannot report reliably.
    async fn attach_to_foreground(&self, pane: PaneId, anchor: PaneId)
        -> Result<PaneId, MuxError>;
    async fn kill(&self, pane: PaneId) -> Result<(), MuxError>;
    async fn capture_text(&self, pane: PaneId, lines: usize) -> Result<String, MuxError>;
    async fn list_panes(&self) -> Result<Vec<PaneInfo>, MuxError>;
    async fn pane_exists(&self, pane: PaneId) -> Result<bool, MuxError> {
        Ok(self.list_panes().await?.iter().any(|p| p.id == pane))
    }
    async fn resize(&self, pane: PaneId, width: u16) -> Result<(), MuxError>;
    async fn toggle_zoom(&self, pane: PaneId) -> Result<(), MuxError>;
    async fn focus(&self, pane: PaneId) -> Result<(), MuxError>;
    async fn status_right(&self) -> Result<String, MuxError>;
    async fn set_status_right(&self, value: &str) -> Result<(), MuxError>;
    async fn bind_jump_key(&self, key: u8, pane: PaneId) -> Result<(), MuxError>;
    async fn unbind_jump_key(&self, key: u8) -> Result<(), MuxError>;
}
