//! Shared test fixtures: temp dirs and in-memory multiplexer/shed drivers.
//!
//! `FakeMux` behaves like a small tmux server. Every detach or attach hands
//! the pane a fresh id, the same way real tmux can, so tests exercise the
//! renumbering paths rather than assuming stable ids.

use crate::domain::PaneId;
use crate::error::{MuxError, ShedError};
use crate::shed::{CreateOpts, Server, Shed, ShedDriver, ShedState};
use crate::tmux::{Launch, MuxDriver, PaneInfo};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

static TEST_DIR_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Temporary directory fixture with best-effort cleanup.
#[derive(Debug)]
pub struct TestTempDir {
    path: PathBuf,
}

impl TestTempDir {
    pub fn new(prefix: &str) -> Self {
        let suffix = TEST_DIR_COUNTER.fetch_add(1, Ordering::Relaxed);
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();
        let dir = std::env::temp_dir().join(format!("codely-{prefix}-{millis}-{suffix}"));
        fs::create_dir_all(&dir).expect("failed to create temporary fixture directory");
        Self { path: dir }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn child(&self, relative: &str) -> PathBuf {
        self.path.join(relative)
    }

    /// Write UTF-8 text to a child path, creating parent directories as needed.
    pub fn write_text(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.child(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("failed to create parent directories for fixture");
        }
        fs::write(&path, content).expect("failed to write fixture file");
        path
    }
}

impl Drop for TestTempDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

// ---------------------------------------------------------------------------
// FakeMux
// ---------------------------------------------------------------------------

/// Window that hosts the anchor pane.
pub const ANCHOR_WINDOW: &str = "@0";
/// Id of the pane running the manager.
pub const ANCHOR: PaneId = PaneId(0);

#[derive(Debug, Clone)]
struct FakePane {
    id: PaneId,
    window: String,
    command: String,
    content: String,
    dead_status: Option<i32>,
}

#[derive(Debug)]
struct FakeState {
    panes: Vec<FakePane>,
    next_pane: u32,
    next_window: u32,
    zoomed: bool,
    /// Detach fails while the anchor window is zoomed.
    zoom_blocks_detach: bool,
    /// Attach reports the source id instead of the renumbered one.
    attach_reports_stale_id: bool,
    failures: HashMap<&'static str, usize>,
    calls: Vec<String>,
    status_right: String,
    bindings: BTreeMap<u8, String>,
}

#[derive(Debug)]
pub struct FakeMux {
    state: Mutex<FakeState>,
}

impl Default for FakeMux {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeMux {
    /// One window holding only the anchor pane `%0`.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(FakeState {
                panes: vec![FakePane {
                    id: ANCHOR,
                    window: ANCHOR_WINDOW.to_string(),
                    command: "codely".into(),
                    content: String::new(),
                    dead_status: None,
                }],
                next_pane: 1,
                next_window: 1,
                zoomed: false,
                zoom_blocks_detach: false,
                attach_reports_stale_id: false,
                failures: HashMap::new(),
                calls: Vec::new(),
                status_right: String::new(),
                bindings: BTreeMap::new(),
            }),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().expect("fake mux lock poisoned")
    }

    /// Make the next `count` calls of `op` fail.
    pub fn fail_next(&self, op: &'static str, count: usize) {
        self.lock().failures.insert(op, count);
    }

    pub fn set_zoomed(&self, zoomed: bool) {
        let mut state = self.lock();
        state.zoomed = zoomed;
        state.zoom_blocks_detach = zoomed;
    }

    pub fn set_attach_reports_stale_id(&self, stale: bool) {
        self.lock().attach_reports_stale_id = stale;
    }

    pub fn set_content(&self, pane: PaneId, content: &str) {
        if let Some(p) = self.lock().panes.iter_mut().find(|p| p.id == pane) {
            p.content = content.to_string();
        }
    }

    pub fn mark_dead(&self, pane: PaneId, status: i32) {
        if let Some(p) = self.lock().panes.iter_mut().find(|p| p.id == pane) {
            p.dead_status = Some(status);
        }
    }

    /// Add a pane in its own window, as if created outside codely.
    pub fn add_background_pane(&self, id: PaneId) {
        let mut state = self.lock();
        let window = format!("@{}", 100 + id.0);
        state.panes.push(FakePane {
            id,
            window,
            command: "zsh".into(),
            content: String::new(),
            dead_status: None,
        });
        state.next_pane = state.next_pane.max(id.0 + 1);
    }

    /// Remove a pane behind codely's back.
    pub fn vanish(&self, pane: PaneId) {
        self.lock().panes.retain(|p| p.id != pane);
    }

    /// Move a pane into the anchor window behind codely's back.
    pub fn move_to_anchor_window(&self, pane: PaneId) {
        if let Some(p) = self.lock().panes.iter_mut().find(|p| p.id == pane) {
            p.window = ANCHOR_WINDOW.to_string();
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    pub fn pane_ids(&self) -> Vec<PaneId> {
        self.lock().panes.iter().map(|p| p.id).collect()
    }

    /// Non-anchor panes currently in the anchor window.
    pub fn anchor_window_panes(&self) -> Vec<PaneId> {
        self.lock()
            .panes
            .iter()
            .filter(|p| p.window == ANCHOR_WINDOW && p.id != ANCHOR)
            .map(|p| p.id)
            .collect()
    }

    pub fn status_right_value(&self) -> String {
        self.lock().status_right.clone()
    }

    pub fn set_status_right_value(&self, value: &str) {
        self.lock().status_right = value.to_string();
    }

    pub fn bindings(&self) -> BTreeMap<u8, String> {
        self.lock().bindings.clone()
    }

    fn begin(&self, op: &'static str, detail: String) -> Result<std::sync::MutexGuard<'_, FakeState>, MuxError> {
        let mut state = self.lock();
        state.calls.push(format!("{op} {detail}").trim_end().to_string());
        if let Some(remaining) = state.failures.get_mut(op) {
            if *remaining > 0 {
                *remaining -= 1;
                return Err(MuxError::CommandFailed {
                    op,
                    detail: "injected failure".into(),
                });
            }
        }
        Ok(state)
    }
}

fn missing(op: &'static str, pane: PaneId) -> MuxError {
    MuxError::CommandFailed {
        op,
        detail: format!("can't find pane: {pane}"),
    }
}

fn renumber(state: &mut FakeState, pane: PaneId, window: Option<String>) -> Option<PaneId> {
    let new_id = PaneId(state.next_pane);
    state.next_pane += 1;
    let new_window = match window {
        Some(w) => w,
        None => {
            let w = format!("@{}", state.next_window);
            state.next_window += 1;
            w
        }
    };
    let p = state.panes.iter_mut().find(|p| p.id == pane)?;
    p.id = new_id;
    p.window = new_window;
    Some(new_id)
}

#[async_trait]
impl MuxDriver for FakeMux {
    fn in_workspace(&self) -> bool {
        true
    }

    async fn anchor_pane(&self) -> Result<Option<PaneId>, MuxError> {
        Ok(self
            .lock()
            .panes
            .iter()
            .any(|p| p.id == ANCHOR)
            .then_some(ANCHOR))
    }

    async fn split_from_anchor(
        &self,
        anchor: Option<PaneId>,
        launch: &Launch,
    ) -> Result<PaneId, MuxError> {
        match anchor {
            Some(a) => self.split_from_pane(a, false, launch).await,
            None => self.split_from_pane(ANCHOR, false, launch).await,
        }
    }

    async fn split_from_pane(
        &self,
        target: PaneId,
        _vertical: bool,
        launch: &Launch,
    ) -> Result<PaneId, MuxError> {
        let mut state = self.begin("split-window", format!("{target} {}", launch.exec))?;
        let window = state
            .panes
            .iter()
            .find(|p| p.id == target)
            .map(|p| p.window.clone())
            .ok_or_else(|| missing("split-window", target))?;
        let id = PaneId(state.next_pane);
        state.next_pane += 1;
        state.panes.push(FakePane {
            id,
            window,
            command: launch.exec.clone(),
            content: String::new(),
            dead_status: None,
        });
        Ok(id)
    }

    async fn detach_to_background(&self, pane: PaneId) -> Result<PaneId, MuxError> {
        let mut state = self.begin("break-pane", pane.to_string())?;
        if state.zoom_blocks_detach && state.zoomed {
            return Err(MuxError::CommandFailed {
                op: "break-pane",
                detail: "window is zoomed".into(),
            });
        }
        renumber(&mut state, pane, None).ok_or_else(|| missing("break-pane", pane))
    }

    async fn attach_to_foreground(
        &self,
        pane: PaneId,
        anchor: PaneId,
    ) -> Result<PaneId, MuxError> {
        let mut state = self.begin("join-pane", format!("{pane} {anchor}"))?;
        let window = state
            .panes
            .iter()
            .find(|p| p.id == anchor)
            .map(|p| p.window.clone())
            .ok_or_else(|| missing("join-pane", anchor))?;
        let new_id =
            renumber(&mut state, pane, Some(window)).ok_or_else(|| missing("join-pane", pane))?;
        if state.attach_reports_stale_id {
            Ok(pane)
        } else {
            Ok(new_id)
        }
    }

    async fn kill(&self, pane: PaneId) -> Result<(), MuxError> {
        let mut state = self.begin("kill-pane", pane.to_string())?;
        let before = state.panes.len();
        state.panes.retain(|p| p.id != pane);
        if state.panes.len() == before {
            return Err(missing("kill-pane", pane));
        }
        Ok(())
    }

    async fn capture_text(&self, pane: PaneId, _lines: usize) -> Result<String, MuxError> {
        let state = self.begin("capture-pane", pane.to_string())?;
        state
            .panes
            .iter()
            .find(|p| p.id == pane)
            .map(|p| p.content.clone())
            .ok_or_else(|| missing("capture-pane", pane))
    }

    async fn list_panes(&self) -> Result<Vec<PaneInfo>, MuxError> {
        let state = self.begin("list-panes", String::new())?;
        Ok(state
            .panes
            .iter()
            .map(|p| PaneInfo {
                id: p.id,
                command: p.command.clone(),
                active: p.id == ANCHOR,
                window_id: p.window.clone(),
                dead: p.dead_status.is_some(),
                dead_status: p.dead_status,
            })
            .collect())
    }

    async fn resize(&self, pane: PaneId, width: u16) -> Result<(), MuxError> {
        self.begin("resize-pane", format!("{pane} {width}"))?;
        Ok(())
    }

    async fn toggle_zoom(&self, pane: PaneId) -> Result<(), MuxError> {
        let mut state = self.begin("zoom", pane.to_string())?;
        state.zoomed = !state.zoomed;
        Ok(())
    }

    async fn focus(&self, pane: PaneId) -> Result<(), MuxError> {
        self.begin("select-pane", pane.to_string())?;
        Ok(())
    }

    async fn status_right(&self) -> Result<String, MuxError> {
        let state = self.begin("show-option", String::new())?;
        Ok(state.status_right.clone())
    }

    async fn set_status_right(&self, value: &str) -> Result<(), MuxError> {
        let mut state = self.begin("set-option", value.to_string())?;
        state.status_right = value.to_string();
        Ok(())
    }

    async fn bind_jump_key(&self, key: u8, pane: PaneId) -> Result<(), MuxError> {
        let mut state = self.begin("bind-key", format!("{key} {pane}"))?;
        state.bindings.insert(key, pane.to_string());
        Ok(())
    }

    async fn unbind_jump_key(&self, key: u8) -> Result<(), MuxError> {
        let mut state = self.begin("unbind-key", key.to_string())?;
        state.bindings.remove(&key);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// FakeShed
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct FakeShed {
    sheds: Mutex<Vec<Shed>>,
    calls: Mutex<Vec<String>>,
}

impl FakeShed {
    pub fn with_sheds(sheds: &[(&str, &str, ShedState)]) -> Self {
        let list = sheds
            .iter()
            .map(|(name, server, status)| Shed {
                name: name.to_string(),
                server: server.to_string(),
                status: *status,
                created_at: String::new(),
                repo: None,
                backend: None,
            })
            .collect();
        Self {
            sheds: Mutex::new(list),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("fake shed lock").clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().expect("fake shed lock").push(call);
    }

    fn set_state(&self, name: &str, status: ShedState) -> Result<(), ShedError> {
        let mut sheds = self.sheds.lock().expect("fake shed lock");
        let shed = sheds
            .iter_mut()
            .find(|s| s.name == name)
            .ok_or_else(|| ShedError::CommandFailed {
                action: "lookup".into(),
                detail: format!("shed {name} not found"),
            })?;
        shed.status = status;
        Ok(())
    }
}

#[async_trait]
impl ShedDriver for FakeShed {
    fn available(&self) -> bool {
        true
    }

    async fn list(&self) -> Result<Vec<Shed>, ShedError> {
        Ok(self.sheds.lock().expect("fake shed lock").clone())
    }

    async fn list_servers(&self) -> Result<Vec<Server>, ShedError> {
        Ok(vec![Server {
            name: "local".into(),
            host: "localhost".into(),
            status: "online".into(),
            default: true,
        }])
    }

    async fn create(&self, name: &str, opts: &CreateOpts) -> Result<(), ShedError> {
        self.record(format!("create {name}"));
        self.sheds.lock().expect("fake shed lock").push(Shed {
            name: name.to_string(),
            server: opts.server.clone().unwrap_or_else(|| "local".into()),
            status: ShedState::Running,
            created_at: String::new(),
            repo: opts.repo.clone(),
            backend: opts.backend.clone(),
        });
        Ok(())
    }

    async fn start(&self, name: &str) -> Result<(), ShedError> {
        self.record(format!("start {name}"));
        self.set_state(name, ShedState::Running)
    }

    async fn stop(&self, name: &str) -> Result<(), ShedError> {
        self.record(format!("stop {name}"));
        self.set_state(name, ShedState::Stopped)
    }

    async fn delete(&self, name: &str, force: bool) -> Result<(), ShedError> {
        self.record(format!("delete {name} force={force}"));
        self.sheds
            .lock()
            .expect("fake shed lock")
            .retain(|s| s.name != name);
        Ok(())
    }
}
