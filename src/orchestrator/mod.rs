//! Pane visibility orchestration.
//!
//! Keeps exactly one session terminal next to the anchor pane. Work is split
//! in three steps so the event loop stays the only mutator of the model:
//!
//! 1. `plan_*` reads the model and captures immutable inputs (pane ids,
//!    command line, directory) for one operation.
//! 2. The async operation runs the multiplexer calls off-loop and returns an
//!    outcome value. It never touches the model.
//! 3. `apply_*` (see [`apply`]) folds the outcome back in on the loop.
//!
//! tmux may renumber a pane when it is detached or attached, so every outcome
//! carries the ids tmux reported after the move, and the id of a freshly
//! attached pane is re-derived by listing the anchor window.

pub mod apply;

use crate::domain::{PaneId, PaneOp, PaneState, Project, ProjectKind};
use crate::error::{InvalidTransition, OrchestratorError, ShedError};
use crate::shed::ShedDriver;
use crate::tmux::{anchor_neighbours, window_of, Launch, MuxDriver, PaneInfo};
use apply::find_session;
use std::sync::{Arc, RwLock};
use tracing::{debug, info, warn};

pub use apply::{
    apply_created, apply_hidden_outcome, apply_killed, apply_reconciled, apply_shown, Applied,
    ReconcileReport,
};

/// A pane moved to the background, before and after ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HiddenPane {
    pub previous: PaneId,
    pub new: PaneId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePlan {
    pub project_id: String,
    pub session_id: String,
    pub launch: Launch,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateOutcome {
    pub project_id: String,
    pub session_id: String,
    pub hidden: Vec<HiddenPane>,
    pub result: Result<PaneId, OrchestratorError>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowPlan {
    pub session_id: String,
    pub pane: PaneId,
    /// Currently visible session and its pane, swapped out first.
    pub visible: Option<(String, PaneId)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowOutcome {
    pub session_id: String,
    pub swapped_out: Option<String>,
    pub hidden: Vec<HiddenPane>,
    pub result: Result<PaneId, OrchestratorError>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HidePlan {
    pub session_id: String,
    pub pane: PaneId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HideOutcome {
    pub session_id: String,
    pub result: Result<PaneId, OrchestratorError>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KillPlan {
    pub project_id: String,
    pub session_id: String,
    pub pane: Option<PaneId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KillOutcome {
    pub project_id: String,
    pub session_id: String,
    pub error: Option<OrchestratorError>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileOutcome {
    pub anchor: Option<PaneId>,
    pub anchor_window: Option<String>,
    pub panes: Vec<PaneInfo>,
}

/// Issues multiplexer operations on behalf of the event loop.
///
/// Clones share the anchor, so an anchor adopted on the loop is the one the
/// spawned tasks split from and attach to.
#[derive(Clone)]
pub struct Orchestrator {
    mux: Arc<dyn MuxDriver>,
    shed: Option<Arc<dyn ShedDriver>>,
    anchor: Arc<RwLock<Option<PaneId>>>,
}

impl Orchestrator {
    pub fn new(
        mux: Arc<dyn MuxDriver>,
        shed: Option<Arc<dyn ShedDriver>>,
        anchor: Option<PaneId>,
    ) -> Self {
        Self {
            mux,
            shed,
            anchor: Arc::new(RwLock::new(anchor)),
        }
    }

    pub fn mux(&self) -> &Arc<dyn MuxDriver> {
        &self.mux
    }

    pub fn shed(&self) -> Option<&Arc<dyn ShedDriver>> {
        self.shed.as_ref()
    }

    pub fn anchor(&self) -> Option<PaneId> {
        *self
            .anchor
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Adopt the anchor found by a reconcile pass.
    pub fn set_anchor(&self, anchor: Option<PaneId>) {
        *self
            .anchor
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = anchor;
    }

    // -----------------------------------------------------------------------
    // Planning
    // -----------------------------------------------------------------------

    /// Capture everything a pane creation needs, so later edits to the
    /// project cannot change what the in-flight operation launches.
    pub fn plan_create(
        &self,
        projects: &[Project],
        session_id: &str,
    ) -> Result<CreatePlan, OrchestratorError> {
        if self.anchor().is_none() {
            return Err(OrchestratorError::NoAnchor);
        }
        let (project, session) = find_session(projects, session_id)
            .ok_or_else(|| OrchestratorError::NoPane(session_id.to_string()))?;
        if session.pane != PaneState::NoPane {
            return Err(InvalidTransition {
                from: session.pane.name(),
                op: PaneOp::Create,
            }
            .into());
        }
        let command = &session.command;
        let launch = match (project.kind, &project.remote) {
            (ProjectKind::Local, _) => Launch {
                dir: Some(project.directory.clone()).filter(|d| !d.is_empty()),
                exec: command.exec.clone(),
                args: command.args.clone(),
                env: command.env.clone(),
            },
            (ProjectKind::Remote, Some(target)) => {
                let shed = self
                    .shed
                    .as_ref()
                    .ok_or(OrchestratorError::Shed(ShedError::Unavailable))?;
                let invocation =
                    shed.build_exec_invocation(&target.name, &command.exec, &command.args);
                Launch {
                    dir: None,
                    exec: invocation.exec,
                    args: invocation.args,
                    env: Default::default(),
                }
            }
            (ProjectKind::Remote, None) => {
                return Err(OrchestratorError::Shed(ShedError::Unavailable));
            }
        };
        Ok(CreatePlan {
            project_id: project.id.clone(),
            session_id: session.id.clone(),
            launch,
        })
    }

    /// Plan bringing a hidden session forward, swapping out the visible one.
    pub fn plan_show(
        &self,
        projects: &[Project],
        session_id: &str,
    ) -> Result<ShowPlan, OrchestratorError> {
        if self.anchor().is_none() {
            return Err(OrchestratorError::NoAnchor);
        }
        let (_, session) = find_session(projects, session_id)
            .ok_or_else(|| OrchestratorError::NoPane(session_id.to_string()))?;
        let PaneState::Hidden(pane) = session.pane else {
            return Err(InvalidTransition {
                from: session.pane.name(),
                op: PaneOp::Show,
            }
            .into());
        };
        let visible = apply::visible_session(projects)
            .filter(|s| s.id != session_id)
            .and_then(|s| s.pane_id().map(|p| (s.id.clone(), p)));
        Ok(ShowPlan {
            session_id: session_id.to_string(),
            pane,
            visible,
        })
    }

    pub fn plan_hide(
        &self,
        projects: &[Project],
        session_id: &str,
    ) -> Result<HidePlan, OrchestratorError> {
        let (_, session) = find_session(projects, session_id)
            .ok_or_else(|| OrchestratorError::NoPane(session_id.to_string()))?;
        match session.pane {
            PaneState::Visible(pane) => Ok(HidePlan {
                session_id: session_id.to_string(),
                pane,
            }),
            other => Err(InvalidTransition {
                from: other.name(),
                op: PaneOp::Hide,
            }
            .into()),
        }
    }

    pub fn plan_kill(
        &self,
        projects: &[Project],
        session_id: &str,
    ) -> Result<KillPlan, OrchestratorError> {
        let (project, session) = find_session(projects, session_id)
            .ok_or_else(|| OrchestratorError::NoPane(session_id.to_string()))?;
        Ok(KillPlan {
            project_id: project.id.clone(),
            session_id: session.id.clone(),
            pane: session.pane_id(),
        })
    }

    // -----------------------------------------------------------------------
    // Operations
    // -----------------------------------------------------------------------

    /// Detach a pane, unzooming the anchor and retrying once on failure.
    async fn detach_with_zoom_retry(&self, pane: PaneId) -> Result<PaneId, OrchestratorError> {
        match self.mux.detach_to_background(pane).await {
            Ok(new_id) => Ok(new_id),
            Err(first) => {
                let Some(anchor) = self.anchor() else {
                    return Err(first.into());
                };
                debug!(pane = %pane, error = %first, "break-pane failed; unzooming and retrying");
                if let Err(e) = self.mux.toggle_zoom(anchor).await {
                    warn!(error = %e, "toggle zoom failed");
                }
                Ok(self.mux.detach_to_background(pane).await?)
            }
        }
    }

    /// Move every non-anchor pane out of the anchor window.
    async fn clear_anchor_window(
        &self,
        anchor: PaneId,
        hidden: &mut Vec<HiddenPane>,
    ) -> Result<(), OrchestratorError> {
        let panes = match self.mux.list_panes().await {
            Ok(panes) => panes,
            Err(e) => {
                warn!(error = %e, "list-panes failed before create; assuming empty window");
                Vec::new()
            }
        };
        for previous in anchor_neighbours(&panes, anchor) {
            let new = self.detach_with_zoom_retry(previous).await?;
            debug!(previous = %previous, new = %new, "hid pane");
            hidden.push(HiddenPane { previous, new });
        }
        Ok(())
    }

    /// The one non-anchor pane in the anchor window, after an attach.
    async fn resolve_visible_pane(&self, anchor: PaneId) -> Option<PaneId> {
        let panes = self.mux.list_panes().await.ok()?;
        anchor_neighbours(&panes, anchor).into_iter().next()
    }

    /// Hide whatever is visible, then split a new pane off the anchor.
    pub async fn create(&self, plan: CreatePlan) -> CreateOutcome {
        let mut hidden = Vec::new();
        let result = self.run_create(&plan, &mut hidden).await;
        if let Ok(pane) = &result {
            info!(session = %plan.session_id, pane = %pane, exec = %plan.launch.exec, "created pane");
        }
        CreateOutcome {
            project_id: plan.project_id,
            session_id: plan.session_id,
            hidden,
            result,
        }
    }

    async fn run_create(
        &self,
        plan: &CreatePlan,
        hidden: &mut Vec<HiddenPane>,
    ) -> Result<PaneId, OrchestratorError> {
        let anchor = self.anchor().ok_or(OrchestratorError::NoAnchor)?;
        self.clear_anchor_window(anchor, hidden).await?;
        Ok(self
            .mux
            .split_from_anchor(Some(anchor), &plan.launch)
            .await?)
    }

    /// Swap a hidden session in, or plainly attach it when nothing is visible.
    pub async fn show(&self, plan: ShowPlan) -> ShowOutcome {
        let mut hidden = Vec::new();
        let result = self.run_show(&plan, &mut hidden).await;
        if let Ok(pane) = &result {
            info!(session = %plan.session_id, pane = %pane, "showed pane");
        }
        ShowOutcome {
            session_id: plan.session_id,
            swapped_out: plan.visible.map(|(id, _)| id),
            hidden,
            result,
        }
    }

    async fn run_show(
        &self,
        plan: &ShowPlan,
        hidden: &mut Vec<HiddenPane>,
    ) -> Result<PaneId, OrchestratorError> {
        let anchor = self.anchor().ok_or(OrchestratorError::NoAnchor)?;
        if let Some((_, previous)) = &plan.visible {
            let new = self.detach_with_zoom_retry(*previous).await?;
            hidden.push(HiddenPane {
                previous: *previous,
                new,
            });
        }
        let joined = self.mux.attach_to_foreground(plan.pane, anchor).await?;
        Ok(self.resolve_visible_pane(anchor).await.unwrap_or(joined))
    }

    pub async fn hide(&self, plan: HidePlan) -> HideOutcome {
        let result = self.detach_with_zoom_retry(plan.pane).await;
        if let Ok(pane) = &result {
            info!(session = %plan.session_id, pane = %pane, "hid pane");
        }
        HideOutcome {
            session_id: plan.session_id,
            result,
        }
    }

    /// Terminate the session's pane if it has one. The session is destroyed
    /// regardless of what tmux says.
    pub async fn kill(&self, plan: KillPlan) -> KillOutcome {
        let error = match plan.pane {
            Some(pane) => self.mux.kill(pane).await.err().map(|e| {
                warn!(pane = %pane, error = %e, "kill-pane failed");
                OrchestratorError::from(e)
            }),
            None => None,
        };
        KillOutcome {
            project_id: plan.project_id,
            session_id: plan.session_id,
            error,
        }
    }

    /// Snapshot the live panes and the anchor's window.
    pub async fn reconcile(&self) -> Result<ReconcileOutcome, OrchestratorError> {
        let panes = self.mux.list_panes().await?;
        let anchor = match self.anchor().filter(|a| panes.iter().any(|p| p.id == *a)) {
            Some(anchor) => Some(anchor),
            None => self.mux.anchor_pane().await?,
        };
        let anchor_window = anchor.and_then(|a| window_of(&panes, a).map(str::to_string));
        Ok(ReconcileOutcome {
            anchor,
            anchor_window,
            panes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::apply::visible_count;
    use super::*;
    use crate::domain::{Command, Session};
    use crate::shed::ShedState;
    use crate::testsupport::{FakeMux, FakeShed, ANCHOR};

    fn command(id: &str) -> Command {
        Command {
            id: id.into(),
            display_name: id.into(),
            exec: id.into(),
            ..Default::default()
        }
    }

    /// One local project holding sessions `a` and `b`, neither launched.
    fn model() -> Vec<Project> {
        let mut project = Project::local("web", "/tmp/web");
        project.id = "p1".into();
        for id in ["a", "b"] {
            let mut session = Session::new("p1", command("bash"));
            session.id = id.into();
            project.sessions.push(session);
        }
        vec![project]
    }

    fn setup() -> (Arc<FakeMux>, Orchestrator) {
        let mux = Arc::new(FakeMux::new());
        let orch = Orchestrator::new(mux.clone(), None, Some(ANCHOR));
        (mux, orch)
    }

    fn pane(projects: &[Project], id: &str) -> PaneState {
        find_session(projects, id).map(|(_, s)| s.pane).unwrap()
    }

    async fn create(orch: &Orchestrator, projects: &mut [Project], id: &str) -> Applied {
        let plan = orch.plan_create(projects, id).unwrap();
        let outcome = orch.create(plan).await;
        apply_created(projects, &outcome)
    }

    async fn show(orch: &Orchestrator, projects: &mut [Project], id: &str) -> Applied {
        let plan = orch.plan_show(projects, id).unwrap();
        let outcome = orch.show(plan).await;
        apply_shown(projects, &outcome)
    }

    async fn reconcile(orch: &Orchestrator, projects: &mut [Project]) -> ReconcileReport {
        let outcome = orch.reconcile().await.unwrap();
        apply_reconciled(projects, &outcome)
    }

    #[tokio::test]
    async fn create_hides_the_visible_session() {
        let (mux, orch) = setup();
        let mut projects = model();

        assert_eq!(create(&orch, &mut projects, "a").await, Applied::Done);
        let a_first = pane(&projects, "a").pane_id().unwrap();
        assert_eq!(pane(&projects, "a"), PaneState::Visible(a_first));

        assert_eq!(create(&orch, &mut projects, "b").await, Applied::Done);
        let PaneState::Hidden(a_hidden) = pane(&projects, "a") else {
            panic!("a should be hidden");
        };
        assert_ne!(a_hidden, a_first, "break-pane renumbers the pane");
        let PaneState::Visible(b_pane) = pane(&projects, "b") else {
            panic!("b should be visible");
        };
        assert_eq!(mux.anchor_window_panes(), vec![b_pane]);
        assert_eq!(visible_count(&projects), 1);

        // A later reconcile keeps a, since its renumbered pane is live.
        let report = reconcile(&orch, &mut projects).await;
        assert!(report.removed.is_empty());
        assert_eq!(report.visible.as_deref(), Some("b"));
        assert_eq!(pane(&projects, "a"), PaneState::Hidden(a_hidden));

        mux.vanish(a_hidden);
        let report = reconcile(&orch, &mut projects).await;
        assert_eq!(report.removed, vec!["a".to_string()]);
        assert!(find_session(&projects, "a").is_none());
    }

    #[tokio::test]
    async fn reconcile_is_idempotent() {
        let (mux, orch) = setup();
        let mut projects = model();
        create(&orch, &mut projects, "a").await;
        create(&orch, &mut projects, "b").await;
        // Something outside codely swapped the panes around.
        let a_pane = pane(&projects, "a").pane_id().unwrap();
        mux.move_to_anchor_window(a_pane);
        let b_pane = pane(&projects, "b").pane_id().unwrap();
        mux.detach_to_background(b_pane).await.unwrap();

        let first = reconcile(&orch, &mut projects).await;
        let snapshot: Vec<PaneState> = projects[0].sessions.iter().map(|s| s.pane).collect();
        let second = reconcile(&orch, &mut projects).await;
        let again: Vec<PaneState> = projects[0].sessions.iter().map(|s| s.pane).collect();

        assert_eq!(first.removed, vec!["b".to_string()]);
        assert_eq!(first.visible.as_deref(), Some("a"));
        assert_eq!(second, ReconcileReport { removed: vec![], visible: Some("a".into()) });
        assert_eq!(snapshot, again);
    }

    #[tokio::test]
    async fn zoomed_anchor_is_unzoomed_before_retrying() {
        let (mux, orch) = setup();
        let mut projects = model();
        create(&orch, &mut projects, "a").await;
        mux.set_zoomed(true);

        assert_eq!(create(&orch, &mut projects, "b").await, Applied::Done);
        assert!(mux.calls().contains(&format!("zoom {ANCHOR}")));
        assert!(matches!(pane(&projects, "a"), PaneState::Hidden(_)));
        assert_eq!(visible_count(&projects), 1);
    }

    #[tokio::test]
    async fn show_resolves_renumbered_pane_when_join_reports_stale_id() {
        let (mux, orch) = setup();
        let mut projects = model();
        create(&orch, &mut projects, "a").await;
        create(&orch, &mut projects, "b").await;
        mux.set_attach_reports_stale_id(true);

        assert_eq!(show(&orch, &mut projects, "a").await, Applied::Done);
        let live = mux.anchor_window_panes();
        assert_eq!(live.len(), 1);
        assert_eq!(pane(&projects, "a"), PaneState::Visible(live[0]));
        assert!(matches!(pane(&projects, "b"), PaneState::Hidden(_)));
    }

    #[tokio::test]
    async fn hide_then_show_round_trip() {
        let (mux, orch) = setup();
        let mut projects = model();
        create(&orch, &mut projects, "a").await;

        let plan = orch.plan_hide(&projects, "a").unwrap();
        let outcome = orch.hide(plan).await;
        assert_eq!(apply_hidden_outcome(&mut projects, &outcome), Applied::Done);
        assert_eq!(visible_count(&projects), 0);
        assert!(mux.anchor_window_panes().is_empty());

        assert_eq!(show(&orch, &mut projects, "a").await, Applied::Done);
        assert_eq!(visible_count(&projects), 1);
        assert_eq!(mux.anchor_window_panes().len(), 1);
    }

    #[tokio::test]
    async fn result_for_removed_session_reports_orphan() {
        let (_mux, orch) = setup();
        let mut projects = model();
        let plan = orch.plan_create(&projects, "a").unwrap();
        let outcome = orch.create(plan).await;
        projects[0].sessions.retain(|s| s.id != "a");

        let pane = *outcome.result.as_ref().unwrap();
        assert_eq!(
            apply_created(&mut projects, &outcome),
            Applied::Stale { orphan: Some(pane) }
        );
        assert_eq!(visible_count(&projects), 0);
    }

    #[tokio::test]
    async fn failed_split_still_commits_the_hidden_pane() {
        let (mux, orch) = setup();
        let mut projects = model();
        create(&orch, &mut projects, "a").await;
        mux.fail_next("split-window", 1);

        let applied = create(&orch, &mut projects, "b").await;
        assert!(matches!(applied, Applied::Failed(OrchestratorError::Mux(_))));
        let PaneState::Hidden(a_pane) = pane(&projects, "a") else {
            panic!("a should stay hidden");
        };
        assert!(mux.pane_ids().contains(&a_pane));
        assert_eq!(pane(&projects, "b"), PaneState::NoPane);
        assert_eq!(visible_count(&projects), 0);
    }

    #[tokio::test]
    async fn kill_removes_session_and_pane() {
        let (mux, orch) = setup();
        let mut projects = model();
        create(&orch, &mut projects, "a").await;
        let a_pane = pane(&projects, "a").pane_id().unwrap();

        let plan = orch.plan_kill(&projects, "a").unwrap();
        let outcome = orch.kill(plan).await;
        assert_eq!(outcome.error, None);
        assert_eq!(apply_killed(&mut projects, &outcome), Applied::Done);
        assert!(find_session(&projects, "a").is_none());
        assert!(!mux.pane_ids().contains(&a_pane));
    }

    #[tokio::test]
    async fn kill_of_vanished_pane_still_removes_session() {
        let (mux, orch) = setup();
        let mut projects = model();
        create(&orch, &mut projects, "a").await;
        mux.vanish(pane(&projects, "a").pane_id().unwrap());

        let outcome = orch.kill(orch.plan_kill(&projects, "a").unwrap()).await;
        assert!(outcome.error.is_some());
        assert_eq!(apply_killed(&mut projects, &outcome), Applied::Done);
        assert_eq!(projects[0].sessions.len(), 1);
    }

    #[test]
    fn plans_reject_invalid_transitions() {
        let (_mux, orch) = setup();
        let mut projects = model();
        projects[0].sessions[0].pane = PaneState::Visible(PaneId(4));

        assert!(matches!(
            orch.plan_create(&projects, "a"),
            Err(OrchestratorError::InvalidTransition(_))
        ));
        assert!(matches!(
            orch.plan_show(&projects, "b"),
            Err(OrchestratorError::InvalidTransition(_))
        ));
        assert!(matches!(
            orch.plan_hide(&projects, "b"),
            Err(OrchestratorError::InvalidTransition(_))
        ));
        assert!(matches!(
            orch.plan_kill(&projects, "missing"),
            Err(OrchestratorError::NoPane(_))
        ));
    }

    #[test]
    fn create_requires_an_anchor() {
        let orch = Orchestrator::new(Arc::new(FakeMux::new()), None, None);
        assert_eq!(
            orch.plan_create(&model(), "a"),
            Err(OrchestratorError::NoAnchor)
        );
    }

    #[tokio::test]
    async fn clones_share_the_anchor_adopted_after_reconcile() {
        let mux = Arc::new(FakeMux::new());
        let on_loop = Orchestrator::new(mux.clone(), None, None);
        let in_task = on_loop.clone();

        let outcome = in_task.reconcile().await.unwrap();
        assert_eq!(outcome.anchor, Some(ANCHOR));
        on_loop.set_anchor(outcome.anchor);
        assert_eq!(in_task.anchor(), Some(ANCHOR));

        let mut projects = model();
        let plan = on_loop.plan_create(&projects, "a").unwrap();
        let created = in_task.create(plan).await;
        assert!(created.result.is_ok());
        assert_eq!(apply_created(&mut projects, &created), Applied::Done);
        assert_eq!(mux.anchor_window_panes().len(), 1);
    }

    #[test]
    fn remote_sessions_launch_through_shed_exec() {
        let mut project = Project::remote("dev", "box");
        let mut session = Session::new(&project.id, command("claude"));
        session.command.args = vec!["--resume".into()];
        let session_id = session.id.clone();
        project.sessions.push(session);
        let projects = vec![project];

        let without = Orchestrator::new(Arc::new(FakeMux::new()), None, Some(ANCHOR));
        assert_eq!(
            without.plan_create(&projects, &session_id),
            Err(OrchestratorError::Shed(ShedError::Unavailable))
        );

        let shed = Arc::new(FakeShed::with_sheds(&[("dev", "box", ShedState::Running)]));
        let with = Orchestrator::new(Arc::new(FakeMux::new()), Some(shed), Some(ANCHOR));
        let plan = with.plan_create(&projects, &session_id).unwrap();
        assert_eq!(plan.launch.exec, "shed");
        assert_eq!(plan.launch.args, vec!["exec", "dev", "claude", "--resume"]);
        assert_eq!(plan.launch.dir, None);
    }

    /// Drive a fixed pseudo-random sequence of operations and check the
    /// model against the fake after each step.
    #[tokio::test]
    async fn random_operations_keep_one_visible_pane() {
        let (mux, orch) = setup();
        let mut projects = model();
        let mut seed: u64 = 0x2545_f491_4f6c_dd1d;
        for _ in 0..200 {
            seed ^= seed << 13;
            seed ^= seed >> 7;
            seed ^= seed << 17;
            let id = if seed & 1 == 0 { "a" } else { "b" };
            step(&orch, &mut projects, (seed >> 1) % 5, id).await;
            assert!(visible_count(&projects) <= 1);
            assert_eq!(visible_count(&projects), mux.anchor_window_panes().len());
        }
    }

    async fn step(orch: &Orchestrator, projects: &mut Vec<Project>, op: u64, id: &str) {
        match op {
            0 => {
                if let Ok(plan) = orch.plan_create(projects, id) {
                    let outcome = orch.create(plan).await;
                    apply_created(projects, &outcome);
                }
            }
            1 => {
                if let Ok(plan) = orch.plan_show(projects, id) {
                    let outcome = orch.show(plan).await;
                    apply_shown(projects, &outcome);
                }
            }
            2 => {
                if let Ok(plan) = orch.plan_hide(projects, id) {
                    let outcome = orch.hide(plan).await;
                    apply_hidden_outcome(projects, &outcome);
                }
            }
            3 => {
                if let Ok(plan) = orch.plan_kill(projects, id) {
                    let outcome = orch.kill(plan).await;
                    apply_killed(projects, &outcome);
                }
                // Keep both ids available for later steps.
                if find_session(projects, id).is_none() {
                    let mut session = Session::new("p1", command("bash"));
                    session.id = id.into();
                    projects[0].sessions.push(session);
                }
            }
            _ => {
                let outcome = orch.reconcile().await.unwrap();
                apply_reconciled(projects, &outcome);
            }
        }
    }

    #[cfg(feature = "fuzz-tests")]
    mod prop_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn at_most_one_session_is_visible(ops in prop::collection::vec((0u64..5, any::<bool>()), 1..60)) {
                let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
                runtime.block_on(async {
                    let (mux, orch) = setup();
                    let mut projects = model();
                    for (op, pick) in ops {
                        let id = if pick { "a" } else { "b" };
                        step(&orch, &mut projects, op, id).await;
                        assert!(visible_count(&projects) <= 1);
                        assert_eq!(visible_count(&projects), mux.anchor_window_panes().len());
                    }
                });
            }
        }
    }
}
