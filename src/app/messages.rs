//! Messages delivered to the event loop and the work it hands out.
//!
//! Every async task produces exactly one [`Msg`]. The loop answers each
//! message with zero or more [`Effect`]s, which the task layer turns back
//! into async work.

use crate::domain::{PaneId, Status};
use crate::error::{OrchestratorError, ShedError};
use crate::notify::AttentionItem;
use crate::orchestrator::{
    CreateOutcome, CreatePlan, HideOutcome, HidePlan, KillOutcome, KillPlan, ReconcileOutcome,
    ShowOutcome, ShowPlan,
};
use crate::shed::{CreateOpts, Shed};
use crossterm::event::KeyEvent;
use std::path::PathBuf;

/// User-level actions, produced from key presses by the UI layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    MoveUp,
    MoveDown,
    Expand,
    Collapse,
    Toggle,
    /// Enter on the selected row.
    Activate,
    NewProject,
    AttachShed,
    AddTerminal,
    /// Move the visible session to the background.
    Hide,
    /// Close the selected session, or the project when a project row is selected.
    Close,
    CloseProject,
    StartShed,
    StopShed,
    Refresh,
    Help,
    Quit,
    // Modal input
    Up,
    Down,
    Accept,
    Cancel,
    Confirm,
    Input(char),
    Backspace,
    /// Begin filtering or naming inside a picker.
    BeginInput,
    /// Create a new remote container from the shed picker.
    CreateShed,
}

/// Remote-container lifecycle actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShedAction {
    Start,
    Stop,
    Delete,
}

impl ShedAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Delete => "delete",
        }
    }
}

/// What a poll found for one session's pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusUpdate {
    pub session_id: String,
    /// Pane the status was read from. Ignored if the session moved since.
    pub pane: PaneId,
    pub status: Status,
    pub exit_code: Option<i32>,
}

/// Inputs for polling one session, captured on the loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollTarget {
    pub session_id: String,
    pub pane: PaneId,
    pub command: crate::domain::Command,
    /// Remote container name for shed projects.
    pub shed: Option<String>,
}

#[derive(Debug)]
pub enum Msg {
    /// Raw key press from the input thread, mapped against the current mode.
    Key(KeyEvent),
    /// Terminal size changed; only triggers a redraw.
    Resize,
    Intent(Intent),
    /// Periodic timer.
    Tick,
    StatusPolled(Vec<StatusUpdate>),
    PaneCreated(CreateOutcome),
    PanesSwapped(ShowOutcome),
    PaneHidden(HideOutcome),
    PaneKilled(KillOutcome),
    VisibilityReconciled(Result<ReconcileOutcome, OrchestratorError>),
    FoldersLoaded(Vec<PathBuf>),
    ShedsLoaded(Result<Vec<Shed>, ShedError>),
    ShedActionDone {
        name: String,
        action: ShedAction,
        result: Result<(), ShedError>,
    },
    ShedCreated {
        name: String,
        server: String,
        result: Result<(), ShedError>,
    },
    /// A fire-and-forget multiplexer call failed.
    TaskFailed(String),
}

/// Async work requested by the loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Create(CreatePlan),
    Show(ShowPlan),
    Hide(HidePlan),
    Kill(KillPlan),
    Reconcile,
    Poll(Vec<PollTarget>),
    /// Kill a pane produced for a session that no longer exists.
    KillOrphan(PaneId),
    Focus(PaneId),
    Notify(Vec<AttentionItem>),
    LoadFolders(Vec<PathBuf>),
    LoadSheds,
    Shed(ShedAction, String),
    CreateShed { name: String, opts: CreateOpts },
    Save,
}
