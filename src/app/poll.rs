//! Status polling.
//!
//! The poll task reads pane state and classifies captured text off-loop;
//! only [`apply_updates`] writes statuses into the model.

use super::messages::{PollTarget, StatusUpdate};
use crate::domain::{PaneId, Project, Status};
use crate::shed::{ShedDriver, ShedState};
use crate::status::{classify_for, CAPTURE_LINES};
use crate::tmux::{MuxDriver, PaneInfo};
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// Every session that currently holds a pane.
pub fn targets(projects: &[Project]) -> Vec<PollTarget> {
    projects
        .iter()
        .flat_map(|project| {
            let shed = project.remote.as_ref().map(|r| r.name.clone());
            project.sessions.iter().filter_map(move |session| {
                Some(PollTarget {
                    session_id: session.id.clone(),
                    pane: session.pane_id()?,
                    command: session.command.clone(),
                    shed: shed.clone(),
                })
            })
        })
        .collect()
}

pub async fn poll_statuses(
    mux: &dyn MuxDriver,
    shed: Option<&dyn ShedDriver>,
    targets: Vec<PollTarget>,
) -> Vec<StatusUpdate> {
    if targets.is_empty() {
        return Vec::new();
    }
    let panes: Option<HashMap<PaneId, PaneInfo>> = match mux.list_panes().await {
        Ok(panes) => Some(panes.into_iter().map(|p| (p.id, p)).collect()),
        Err(e) => {
            warn!(error = %e, "list-panes failed during poll");
            None
        }
    };
    let stopped = stopped_sheds(shed, &targets).await;

    let mut updates = Vec::with_capacity(targets.len());
    for target in targets {
        let (status, exit_code) = poll_one(mux, panes.as_ref(), &stopped, &target).await;
        updates.push(StatusUpdate {
            session_id: target.session_id,
            pane: target.pane,
            status,
            exit_code,
        });
    }
    debug!(count = updates.len(), "polled statuses");
    updates
}

async fn stopped_sheds(shed: Option<&dyn ShedDriver>, targets: &[PollTarget]) -> HashSet<String> {
    let Some(shed) = shed else {
        return HashSet::new();
    };
    if targets.iter().all(|t| t.shed.is_none()) || !shed.available() {
        return HashSet::new();
    }
    match shed.list().await {
        Ok(sheds) => sheds
            .into_iter()
            .filter(|s| s.status == ShedState::Stopped)
            .map(|s| s.name)
            .collect(),
        Err(e) => {
            debug!(error = %e, "shed list failed during poll");
            HashSet::new()
        }
    }
}

async fn poll_one(
    mux: &dyn MuxDriver,
    panes: Option<&HashMap<PaneId, PaneInfo>>,
    stopped: &HashSet<String>,
    target: &PollTarget,
) -> (Status, Option<i32>) {
    if target.shed.as_ref().is_some_and(|name| stopped.contains(name)) {
        return (Status::Stopped, None);
    }
    if let Some(panes) = panes {
        match panes.get(&target.pane) {
            None => return (Status::Exited, None),
            Some(info) if info.dead => {
                let status = match info.dead_status {
                    Some(code) if code != 0 => Status::Error,
                    _ => Status::Exited,
                };
                return (status, info.dead_status);
            }
            Some(_) => {}
        }
    }
    match mux.capture_text(target.pane, CAPTURE_LINES).await {
        Ok(content) => (classify_for(&content, &target.command), None),
        Err(e) => {
            debug!(pane = %target.pane, error = %e, "capture failed");
            match mux.pane_exists(target.pane).await {
                Ok(false) => (Status::Exited, None),
                _ => (Status::Error, None),
            }
        }
    }
}

/// Write polled statuses into the model. Updates read from a pane the
/// session no longer holds are dropped.
pub fn apply_updates(projects: &mut [Project], updates: &[StatusUpdate]) -> usize {
    let by_id: HashMap<&str, &StatusUpdate> = updates
        .iter()
        .map(|u| (u.session_id.as_str(), u))
        .collect();
    let mut applied = 0;
    for session in projects.iter_mut().flat_map(|p| p.sessions.iter_mut()) {
        let Some(update) = by_id.get(session.id.as_str()) else {
            continue;
        };
        if session.pane_id() != Some(update.pane) {
            continue;
        }
        session.status = update.status;
        if update.exit_code.is_some() {
            session.exit_code = update.exit_code;
        }
        applied += 1;
    }
    applied
}
