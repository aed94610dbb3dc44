//! Folding operation outcomes back into the project model.
//!
//! These functions run on the event loop and are the only writers of pane
//! state. Visibility is always assigned by first demoting every session and
//! then promoting exactly one, so a stale or duplicated flag can never
//! survive an update.

use super::{CreateOutcome, HiddenPane, HideOutcome, KillOutcome, ReconcileOutcome, ShowOutcome};
use crate::domain::{PaneId, PaneState, Project, Session, Status};
use crate::error::OrchestratorError;
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// What happened when an outcome was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    Done,
    /// The session vanished while the operation ran. A pane it produced, if
    /// any, is orphaned and should be killed.
    Stale { orphan: Option<PaneId> },
    Failed(OrchestratorError),
}

/// Locate a session anywhere in the model.
pub fn find_session<'a>(projects: &'a [Project], session_id: &str) -> Option<(&'a Project, &'a Session)> {
    projects.iter().find_map(|project| {
        project
            .session(session_id)
            .map(|session| (project, session))
    })
}

pub fn find_session_mut<'a>(projects: &'a mut [Project], session_id: &str) -> Option<&'a mut Session> {
    projects
        .iter_mut()
        .find_map(|project| project.session_mut(session_id))
}

/// The visible session, if any.
pub fn visible_session(projects: &[Project]) -> Option<&Session> {
    projects
        .iter()
        .flat_map(|p| p.sessions.iter())
        .find(|s| s.is_visible())
}

pub fn visible_count(projects: &[Project]) -> usize {
    projects
        .iter()
        .flat_map(|p| p.sessions.iter())
        .filter(|s| s.is_visible())
        .count()
}

fn clear_visibility(projects: &mut [Project]) {
    for session in projects.iter_mut().flat_map(|p| p.sessions.iter_mut()) {
        session.pane = session.pane.demoted();
    }
}

/// Record the new ids of panes that were moved to the background. The
/// owning session is found by the id it had before the move.
fn apply_hidden(projects: &mut [Project], hidden: &[HiddenPane]) {
    for moved in hidden {
        let owner = projects
            .iter_mut()
            .flat_map(|p| p.sessions.iter_mut())
            .find(|s| s.pane_id() == Some(moved.previous));
        let Some(session) = owner else {
            debug!(pane = %moved.previous, "detached an untracked pane");
            continue;
        };
        let next = match session.pane {
            PaneState::Visible(_) => session.pane.hidden(moved.new),
            other => other.reconciled(moved.new, false),
        };
        match next {
            Ok(state) => session.pane = state,
            Err(e) => warn!(session = %session.id, error = %e, "ignoring hidden pane update"),
        }
    }
}

/// Make `session_id` the only visible session using `transition`.
fn promote(
    projects: &mut [Project],
    session_id: &str,
    transition: impl FnOnce(PaneState) -> Result<PaneState, crate::error::InvalidTransition>,
) -> Result<(), OrchestratorError> {
    let current = find_session_mut(projects, session_id)
        .map(|s| s.pane)
        .ok_or_else(|| OrchestratorError::NoPane(session_id.to_string()))?;
    let next = transition(current.demoted())?;
    clear_visibility(projects);
    if let Some(session) = find_session_mut(projects, session_id) {
        session.pane = next;
    }
    Ok(())
}

pub fn apply_created(projects: &mut [Project], outcome: &CreateOutcome) -> Applied {
    // Whatever was hidden before a failure is still hidden.
    apply_hidden(projects, &outcome.hidden);
    let pane = match &outcome.result {
        Ok(pane) => *pane,
        Err(e) => return Applied::Failed(e.clone()),
    };
    if find_session(projects, &outcome.session_id).is_none() {
        info!(session = %outcome.session_id, pane = %pane, "discarding pane for closed session");
        return Applied::Stale { orphan: Some(pane) };
    }
    match promote(projects, &outcome.session_id, |state| state.created(pane)) {
        Ok(()) => {
            if let Some(session) = find_session_mut(projects, &outcome.session_id) {
                session.status = Status::Unknown;
                session.exit_code = None;
            }
            Applied::Done
        }
        Err(e) => Applied::Failed(e),
    }
}

pub fn apply_shown(projects: &mut [Project], outcome: &ShowOutcome) -> Applied {
    apply_hidden(projects, &outcome.hidden);
    let pane = match &outcome.result {
        Ok(pane) => *pane,
        Err(e) => return Applied::Failed(e.clone()),
    };
    if find_session(projects, &outcome.session_id).is_none() {
        return Applied::Stale { orphan: Some(pane) };
    }
    match promote(projects, &outcome.session_id, |state| state.shown(pane)) {
        Ok(()) => Applied::Done,
        Err(e) => Applied::Failed(e),
    }
}

pub fn apply_hidden_outcome(projects: &mut [Project], outcome: &HideOutcome) -> Applied {
    let pane = match &outcome.result {
        Ok(pane) => *pane,
        Err(e) => return Applied::Failed(e.clone()),
    };
    let Some(session) = find_session_mut(projects, &outcome.session_id) else {
        return Applied::Stale { orphan: Some(pane) };
    };
    match session.pane.hidden(pane) {
        Ok(state) => {
            session.pane = state;
            Applied::Done
        }
        Err(e) => Applied::Failed(e.into()),
    }
}

/// Remove the killed session. The pane is gone either way.
pub fn apply_killed(projects: &mut [Project], outcome: &KillOutcome) -> Applied {
    let Some(project) = projects.iter_mut().find(|p| p.id == outcome.project_id) else {
        return Applied::Stale { orphan: None };
    };
    let Some(index) = project
        .sessions
        .iter()
        .position(|s| s.id == outcome.session_id)
    else {
        return Applied::Stale { orphan: None };
    };
    if let Err(e) = project.sessions[index].pane.killed() {
        warn!(session = %outcome.session_id, error = %e, "kill on destroyed session");
    }
    project.sessions.remove(index);
    Applied::Done
}

/// Summary of a reconcile pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub removed: Vec<String>,
    pub visible: Option<String>,
}

/// Drop sessions whose pane no longer exists and re-derive which session is
/// visible from the anchor window's actual contents.
pub fn apply_reconciled(projects: &mut [Project], outcome: &ReconcileOutcome) -> ReconcileReport {
    let live: HashSet<PaneId> = outcome.panes.iter().map(|p| p.id).collect();
    let mut report = ReconcileReport::default();

    for project in projects.iter_mut() {
        project.sessions.retain(|s| match s.pane_id() {
            Some(id) if !live.contains(&id) => {
                info!(session = %s.id, pane = %id, "pane vanished; removing session");
                report.removed.push(s.id.clone());
                false
            }
            _ => true,
        });
    }

    let in_anchor_window: HashSet<PaneId> = match &outcome.anchor_window {
        Some(window) => outcome
            .panes
            .iter()
            .filter(|p| &p.window_id == window && Some(p.id) != outcome.anchor)
            .map(|p| p.id)
            .collect(),
        None => HashSet::new(),
    };

    clear_visibility(projects);
    for session in projects.iter_mut().flat_map(|p| p.sessions.iter_mut()) {
        let Some(id) = session.pane_id() else {
            continue;
        };
        let visible = report.visible.is_none() && in_anchor_window.contains(&id);
        if let Ok(state) = session.pane.reconciled(id, visible) {
            session.pane = state;
        }
        if visible {
            report.visible = Some(session.id.clone());
        }
    }
    report
}
