//! Event loop and command scheduler.
//!
//! All model mutation happens in [`App::update`], one message at a time.
//! Anything that talks to tmux or shed is returned as an [`Effect`] and run
//! by [`tasks::spawn_effect`] on the tokio runtime; each task reports back
//! with exactly one [`Msg`].

pub mod inflight;
pub mod messages;
pub mod mode;
pub mod poll;
pub mod tasks;
mod update;

use crate::config::Config;
use crate::domain::Project;
use crate::notify::Notifier;
use crate::orchestrator::Orchestrator;
use crate::shed::Shed;
use crate::store::Store;
use crate::tree::Tree;
use inflight::InFlight;
pub use messages::{Effect, Intent, Msg, PollTarget, ShedAction, StatusUpdate};
pub use mode::{ConfirmAction, Mode, Picker, PickerItem, PickerKind};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, info, warn};

/// State owned by the event loop.
pub struct App {
    store: Arc<Store>,
    config: Config,
    orch: Orchestrator,
    tree: Tree,
    mode: Mode,
    in_flight: InFlight,
    last_error: Option<String>,
    sheds: Vec<Shed>,
    folders: Vec<PathBuf>,
    poll_in_flight: bool,
    quitting: bool,
}

impl App {
    pub fn new(store: Arc<Store>, config: Config, orch: Orchestrator) -> Self {
        if config.ui.auto_expand_projects {
            store.with_projects_mut(|projects| {
                for project in projects.iter_mut() {
                    project.expanded = true;
                }
            });
        }
        let tree = store.with_projects(Tree::new);
        Self {
            store,
            config,
            orch,
            tree,
            mode: Mode::Normal,
            in_flight: InFlight::new(),
            last_error: None,
            sheds: Vec::new(),
            folders: Vec::new(),
            poll_in_flight: false,
            quitting: false,
        }
    }

    /// Work to start before the first key press.
    pub fn startup_effects(&self) -> Vec<Effect> {
        let mut effects = vec![
            Effect::Reconcile,
            Effect::LoadFolders(self.config.expanded_workspace_roots()),
        ];
        if self.shed_available() {
            effects.push(Effect::LoadSheds);
        }
        effects
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn sheds(&self) -> &[Shed] {
        &self.sheds
    }

    pub fn projects(&self) -> Vec<Project> {
        self.store.projects()
    }

    pub fn with_projects<R>(&self, f: impl FnOnce(&[Project]) -> R) -> R {
        self.store.with_projects(f)
    }

    pub fn is_quitting(&self) -> bool {
        self.quitting
    }

    pub fn has_anchor(&self) -> bool {
        self.orch.anchor().is_some()
    }

    fn shed_available(&self) -> bool {
        self.config.shed.enabled && self.orch.shed().is_some_and(|s| s.available())
    }

    fn set_error(&mut self, error: impl fmt::Display) {
        let message = error.to_string();
        warn!(error = %message, "operation failed");
        self.last_error = Some(message);
    }

    fn rebuild_tree(&mut self) {
        let tree = &mut self.tree;
        self.store.with_projects(|projects| tree.rebuild(projects));
    }
}

/// Everything a spawned task needs. Cheap to clone.
#[derive(Clone)]
pub struct TaskContext {
    pub orch: Orchestrator,
    pub store: Arc<Store>,
    pub notifier: Arc<Mutex<Notifier>>,
    pub manager_width: u16,
    pub tx: mpsc::UnboundedSender<Msg>,
}

/// Drive the loop until a quit intent arrives or every sender is gone.
///
/// Key presses arrive on `rx` from the input thread alongside task results;
/// `render` is called after every handled message.
pub async fn run(
    mut app: App,
    ctx: TaskContext,
    mut rx: mpsc::UnboundedReceiver<Msg>,
    mut render: impl FnMut(&App),
) {
    for effect in app.startup_effects() {
        tasks::spawn_effect(effect, &ctx);
    }
    let mut ticker = tokio::time::interval(app.config.poll_interval());
    render(&app);

    loop {
        let msg = tokio::select! {
            Some(msg) = rx.recv() => msg,
            _ = ticker.tick() => Msg::Tick,
            else => break,
        };
        for effect in app.update(msg) {
            tasks::spawn_effect(effect, &ctx);
        }
        if app.is_quitting() {
            break;
        }
        render(&app);
    }

    info!(in_flight = app.in_flight.len(), "event loop stopped");
    ctx.notifier.lock().await.clear(ctx.orch.mux().as_ref()).await;
    match ctx.store.save() {
        Ok(()) => debug!(path = %ctx.store.path().display(), "saved state"),
        Err(e) => warn!(error = %e, "failed to save state on exit"),
    }
}
