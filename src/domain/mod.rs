//! Core entities shared by the store, tree, orchestrator and event loop.

mod pane;
mod project;
mod status;

pub use pane::{PaneId, PaneOp, PaneState};
pub use project::{
    generate_id, now_unix_millis, Command, Project, ProjectKind, RemoteTarget, Session,
};
pub use status::{Status, ToolMode};
