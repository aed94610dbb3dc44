//! Persistent project/session store backed by one JSON file.
//!
//! The store owns the authoritative project list behind a read/write lock so
//! the exit path can save while the event loop is still mutating. Only
//! identity, names, locations and command specs are written; pane handles,
//! status and visibility are runtime state and come back empty on load.

use crate::domain::{PaneId, Project, Session};
use crate::error::StoreError;
use crate::tmux::MuxDriver;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info};

/// On-disk schema version for [`PersistedState`].
const STATE_FILE_VERSION: u32 = 1;
/// tmux session name recorded for new state files.
pub const DEFAULT_TMUX_SESSION: &str = "codely";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PersistedState {
    #[serde(default)]
    version: u32,
    #[serde(default = "default_tmux_session")]
    tmux_session: String,
    #[serde(default)]
    projects: Vec<Project>,
}

fn default_tmux_session() -> String {
    DEFAULT_TMUX_SESSION.to_string()
}

#[derive(Debug, Default)]
struct State {
    projects: Vec<Project>,
    tmux_session: String,
}

/// Thread-safe project store.
#[derive(Debug)]
pub struct Store {
    path: PathBuf,
    state: RwLock<State>,
}

impl Store {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            state: RwLock::new(State {
                projects: Vec::new(),
                tmux_session: default_tmux_session(),
            }),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> RwLockReadGuard<'_, State> {
        self.state.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, State> {
        self.state
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Load state from disk. A missing or empty file yields an empty store.
    pub fn load(&self) -> Result<(), StoreError> {
        ensure_private_dir(&self.path)?;
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(e) => return Err(e.into()),
        };
        let mut state = self.write();
        if raw.trim().is_empty() {
            state.projects.clear();
            state.tmux_session = default_tmux_session();
            return Ok(());
        }
        let persisted: PersistedState = serde_json::from_str(&raw)?;
        debug!(
            version = persisted.version,
            projects = persisted.projects.len(),
            "loaded state"
        );
        state.projects = persisted.projects;
        state.tmux_session = persisted.tmux_session;
        Ok(())
    }

    /// Write state atomically with owner-only permissions.
    pub fn save(&self) -> Result<(), StoreError> {
        let payload = {
            let state = self.read();
            PersistedState {
                version: STATE_FILE_VERSION,
                tmux_session: state.tmux_session.clone(),
                projects: state.projects.clone(),
            }
        };
        let json = serde_json::to_vec_pretty(&payload)?;
        ensure_private_dir(&self.path)?;
        // Write a sibling temp file first so a crash never truncates the
        // last good state.
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, json)?;
        restrict_file(&tmp_path)?;
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    pub fn tmux_session(&self) -> String {
        self.read().tmux_session.clone()
    }

    /// Snapshot of all projects in insertion order.
    pub fn projects(&self) -> Vec<Project> {
        self.read().projects.clone()
    }

    /// Run `f` with shared access to the project list.
    pub fn with_projects<R>(&self, f: impl FnOnce(&[Project]) -> R) -> R {
        f(&self.read().projects)
    }

    /// Run `f` with exclusive access to the project list.
    pub fn with_projects_mut<R>(&self, f: impl FnOnce(&mut Vec<Project>) -> R) -> R {
        f(&mut self.write().projects)
    }

    pub fn add_project(&self, project: Project) -> Result<(), StoreError> {
        let mut state = self.write();
        if state.projects.iter().any(|p| p.id == project.id) {
            return Err(StoreError::DuplicateProject(project.id));
        }
        state.projects.push(project);
        Ok(())
    }

    pub fn remove_project(&self, id: &str) -> Result<Project, StoreError> {
        let mut state = self.write();
        let index = state
            .projects
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| StoreError::ProjectNotFound(id.to_string()))?;
        Ok(state.projects.remove(index))
    }

    pub fn project(&self, id: &str) -> Result<Project, StoreError> {
        self.read()
            .projects
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| StoreError::ProjectNotFound(id.to_string()))
    }

    pub fn update_project(&self, project: Project) -> Result<(), StoreError> {
        let mut state = self.write();
        let slot = state
            .projects
            .iter_mut()
            .find(|p| p.id == project.id)
            .ok_or_else(|| StoreError::ProjectNotFound(project.id.clone()))?;
        *slot = project;
        Ok(())
    }

    pub fn add_session(&self, project_id: &str, session: Session) -> Result<(), StoreError> {
        let mut state = self.write();
        let project = state
            .projects
            .iter_mut()
            .find(|p| p.id == project_id)
            .ok_or_else(|| StoreError::ProjectNotFound(project_id.to_string()))?;
        project.sessions.push(session);
        Ok(())
    }

    pub fn remove_session(&self, project_id: &str, session_id: &str) -> Result<Session, StoreError> {
        let mut state = self.write();
        let project = state
            .projects
            .iter_mut()
            .find(|p| p.id == project_id)
            .ok_or_else(|| StoreError::ProjectNotFound(project_id.to_string()))?;
        let index = project
            .sessions
            .iter()
            .position(|s| s.id == session_id)
            .ok_or_else(|| StoreError::SessionNotFound(session_id.to_string()))?;
        Ok(project.sessions.remove(index))
    }

    pub fn session(&self, project_id: &str, session_id: &str) -> Result<Session, StoreError> {
        let state = self.read();
        let project = state
            .projects
            .iter()
            .find(|p| p.id == project_id)
            .ok_or_else(|| StoreError::ProjectNotFound(project_id.to_string()))?;
        project
            .session(session_id)
            .cloned()
            .ok_or_else(|| StoreError::SessionNotFound(session_id.to_string()))
    }

    /// Drop sessions whose pane is missing from `live`. Returns the number
    /// of sessions removed.
    pub fn retain_live_sessions(&self, live: &HashSet<PaneId>) -> usize {
        self.with_projects_mut(|projects| {
            let mut removed = 0;
            for project in projects.iter_mut() {
                let before = project.sessions.len();
                project
                    .sessions
                    .retain(|s| s.pane_id().is_some_and(|id| live.contains(&id)));
                removed += before - project.sessions.len();
            }
            removed
        })
    }

    /// Drop every session that has no pane or whose pane tmux no longer
    /// lists. After a restart that is all of them, since pane handles are
    /// not persisted.
    pub async fn reconcile_against_live_panes(
        &self,
        mux: &dyn MuxDriver,
    ) -> usize {
        let live: HashSet<PaneId> = match mux.list_panes().await {
            Ok(panes) => panes.into_iter().map(|p| p.id).collect(),
            Err(e) => {
                debug!(error = %e, "list-panes failed during reconnect; treating as empty");
                HashSet::new()
            }
        };
        let removed = self.retain_live_sessions(&live);
        if removed > 0 {
            info!(removed, "dropped sessions without live panes");
        }
        removed
    }
}

fn ensure_private_dir(path: &Path) -> Result<(), StoreError> {
    let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) else {
        return Ok(());
    };
    if dir.exists() {
        return Ok(());
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        fs::DirBuilder::new()
            .recursive(true)
            .mode(0o700)
            .create(dir)?;
    }
    #[cfg(not(unix))]
    fs::create_dir_all(dir)?;
    Ok(())
}

fn restrict_file(path: &Path) -> Result<(), StoreError> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    }
    #[cfg(not(unix))]
    let _ = path;
    Ok(())
}
