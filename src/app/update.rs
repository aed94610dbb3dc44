//! Message handling: the only place the model changes.

use super::messages::{Effect, Intent, Msg, ShedAction};
use super::mode::{ConfirmAction, Mode, Picker, PickerItem, PickerKind};
use super::{poll, App};
use crate::domain::{PaneState, Project, Session};
use crate::error::{OrchestratorError, ShedError};
use crate::notify;
use crate::orchestrator::apply::{find_session, visible_session};
use crate::orchestrator::{
    apply_created, apply_hidden_outcome, apply_killed, apply_reconciled, apply_shown, Applied,
    CreateOutcome, HideOutcome, KillOutcome, ReconcileOutcome, ShowOutcome,
};
use crate::paths::display_name;
use crate::shed::{CreateOpts, Shed, ShedState};
use crate::tree::Row;
use crate::ui::keys;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const CLOSE_ONLY: &str = "close";
const CLOSE_AND_STOP: &str = "stop";
const CLOSE_AND_DELETE: &str = "delete";

impl App {
    /// Fold one message into the model and return the work it triggers.
    pub fn update(&mut self, msg: Msg) -> Vec<Effect> {
        match msg {
            Msg::Key(key) => match keys::intent_for(&key, &self.mode) {
                Some(intent) => self.update(Msg::Intent(intent)),
                None => Vec::new(),
            },
            Msg::Resize => Vec::new(),
            Msg::Intent(intent) => {
                self.last_error = None;
                self.on_intent(intent)
            }
            Msg::Tick => self.poll_effect().into_iter().collect(),
            Msg::StatusPolled(updates) => {
                self.poll_in_flight = false;
                let (applied, items) = self.store.with_projects_mut(|projects| {
                    let applied = poll::apply_updates(projects, &updates);
                    (applied, notify::collect_items(projects))
                });
                debug!(applied, attention = items.len(), "statuses applied");
                vec![Effect::Notify(items)]
            }
            Msg::PaneCreated(outcome) => self.on_created(outcome),
            Msg::PanesSwapped(outcome) => self.on_shown(outcome),
            Msg::PaneHidden(outcome) => self.on_hidden(outcome),
            Msg::PaneKilled(outcome) => self.on_killed(outcome),
            Msg::VisibilityReconciled(result) => self.on_reconciled(result),
            Msg::FoldersLoaded(folders) => {
                self.folders = folders;
                let items = folder_items(&self.folders);
                if let Mode::Picker(picker) = &mut self.mode {
                    if picker.kind == PickerKind::Folder {
                        picker.replace_items(items);
                    }
                }
                Vec::new()
            }
            Msg::ShedsLoaded(result) => {
                match result {
                    Ok(sheds) => {
                        self.sheds = sheds;
                        let items = shed_items(&self.sheds);
                        if let Mode::Picker(picker) = &mut self.mode {
                            if picker.kind == PickerKind::Shed {
                                picker.replace_items(items);
                            }
                        }
                    }
                    Err(e) => self.set_error(e),
                }
                Vec::new()
            }
            Msg::ShedActionDone { name, action, result } => {
                match result {
                    Ok(()) => info!(shed = %name, action = action.as_str(), "shed action finished"),
                    Err(e) => self.set_error(e),
                }
                vec![Effect::LoadSheds]
            }
            Msg::ShedCreated { name, server, result } => {
                let mut effects = vec![Effect::LoadSheds];
                match result {
                    Ok(()) => effects.extend(self.attach_shed(&name, &server)),
                    Err(e) => self.set_error(e),
                }
                effects
            }
            Msg::TaskFailed(message) => {
                self.set_error(message);
                Vec::new()
            }
        }
    }

    // -----------------------------------------------------------------------
    // Intents
    // -----------------------------------------------------------------------

    fn on_intent(&mut self, intent: Intent) -> Vec<Effect> {
        match std::mem::take(&mut self.mode) {
            Mode::Normal => self.normal_intent(intent),
            Mode::Help => {
                if !matches!(intent, Intent::Help | Intent::Cancel | Intent::Quit) {
                    self.mode = Mode::Help;
                }
                Vec::new()
            }
            Mode::Picker(picker) => self.picker_intent(picker, intent),
            Mode::Confirm { prompt, action } => match intent {
                Intent::Confirm => self.confirmed(action),
                Intent::Cancel => Vec::new(),
                _ => {
                    self.mode = Mode::Confirm { prompt, action };
                    Vec::new()
                }
            },
            Mode::NameShed { input } => self.name_shed_intent(input, intent),
        }
    }

    fn normal_intent(&mut self, intent: Intent) -> Vec<Effect> {
        match intent {
            Intent::MoveUp | Intent::Up => self.tree.move_up(),
            Intent::MoveDown | Intent::Down => self.tree.move_down(),
            Intent::Expand => {
                let tree = &mut self.tree;
                self.store.with_projects_mut(|projects| tree.expand(projects));
            }
            Intent::Collapse => {
                let tree = &mut self.tree;
                self.store.with_projects_mut(|projects| tree.collapse(projects));
            }
            Intent::Toggle => {
                let tree = &mut self.tree;
                self.store
                    .with_projects_mut(|projects| tree.toggle_expand(projects));
            }
            Intent::Activate | Intent::Accept => return self.activate(),
            Intent::NewProject => {
                let picker = Picker::new(PickerKind::Folder, "Open folder", folder_items(&self.folders));
                self.mode = Mode::Picker(picker);
                return vec![Effect::LoadFolders(self.config.expanded_workspace_roots())];
            }
            Intent::AttachShed => {
                if !self.shed_available() {
                    self.set_error(ShedError::Unavailable);
                    return Vec::new();
                }
                let picker = Picker::new(PickerKind::Shed, "Attach shed", shed_items(&self.sheds));
                self.mode = Mode::Picker(picker);
                return vec![Effect::LoadSheds];
            }
            Intent::AddTerminal => {
                if let Some(project_id) = self.selected_project_id() {
                    self.open_command_picker(&project_id);
                }
            }
            Intent::Hide => {
                let visible = self
                    .store
                    .with_projects(|projects| visible_session(projects).map(|s| s.id.clone()));
                if let Some(session_id) = visible {
                    return self.begin_hide(&session_id);
                }
            }
            Intent::Close => match self.tree.selected().cloned() {
                Some(Row::Session { session_id, .. }) => {
                    let label = self.session_label(&session_id);
                    self.mode = Mode::Confirm {
                        prompt: format!("Close {label}?"),
                        action: ConfirmAction::CloseSession { session_id },
                    };
                }
                Some(Row::Project { project_id }) => return self.request_close_project(&project_id),
                None => {}
            },
            Intent::CloseProject => {
                if let Some(project_id) = self.selected_project_id() {
                    return self.request_close_project(&project_id);
                }
            }
            Intent::StartShed => return self.selected_shed_action(ShedAction::Start),
            Intent::StopShed => return self.selected_shed_action(ShedAction::Stop),
            Intent::Refresh => {
                let mut effects: Vec<Effect> = self.poll_effect().into_iter().collect();
                if self.in_flight.is_empty() {
                    effects.push(Effect::Reconcile);
                } else {
                    debug!(in_flight = self.in_flight.len(), "skipping reconcile while busy");
                }
                if self.shed_available() {
                    effects.push(Effect::LoadSheds);
                }
                return effects;
            }
            Intent::Help => self.mode = Mode::Help,
            Intent::Quit => self.quitting = true,
            Intent::Cancel
            | Intent::Confirm
            | Intent::Input(_)
            | Intent::Backspace
            | Intent::BeginInput
            | Intent::CreateShed => {}
        }
        Vec::new()
    }

    fn picker_intent(&mut self, mut picker: Picker, intent: Intent) -> Vec<Effect> {
        if picker.is_filtering() {
            match intent {
                Intent::Input(c) => picker.push_char(c),
                Intent::Backspace => picker.pop_char(),
                Intent::Accept | Intent::Cancel => picker.end_filter(),
                Intent::Up | Intent::MoveUp => picker.move_up(),
                Intent::Down | Intent::MoveDown => picker.move_down(),
                _ => {}
            }
            self.mode = Mode::Picker(picker);
            return Vec::new();
        }
        match intent {
            Intent::Up | Intent::MoveUp => picker.move_up(),
            Intent::Down | Intent::MoveDown => picker.move_down(),
            Intent::BeginInput => picker.begin_filter(),
            Intent::Cancel | Intent::Quit => return Vec::new(),
            Intent::Accept | Intent::Activate => return self.picker_accept(picker),
            Intent::CreateShed if picker.kind == PickerKind::Shed => {
                self.mode = Mode::NameShed {
                    input: String::new(),
                };
                return Vec::new();
            }
            Intent::StartShed if picker.kind == PickerKind::Shed => {
                let name = picker.current().map(|item| item.value.clone());
                self.mode = Mode::Picker(picker);
                return name
                    .map(|name| Effect::Shed(ShedAction::Start, name))
                    .into_iter()
                    .collect();
            }
            _ => {}
        }
        self.mode = Mode::Picker(picker);
        Vec::new()
    }

    fn picker_accept(&mut self, picker: Picker) -> Vec<Effect> {
        let Some(value) = picker.current().map(|item| item.value.clone()) else {
            self.mode = Mode::Picker(picker);
            return Vec::new();
        };
        match picker.kind.clone() {
            PickerKind::Folder => self.open_folder(Path::new(&value)),
            PickerKind::Command { project_id } => self.launch(&project_id, &value),
            PickerKind::Shed => {
                let Some(shed) = self.sheds.iter().find(|s| s.name == value).cloned() else {
                    self.mode = Mode::Picker(picker);
                    return Vec::new();
                };
                if shed.status == ShedState::Stopped {
                    info!(shed = %shed.name, "starting stopped shed before attaching");
                    self.mode = Mode::Picker(picker);
                    return vec![Effect::Shed(ShedAction::Start, shed.name)];
                }
                self.attach_shed(&shed.name, &shed.server)
            }
            PickerKind::ShedClose { project_id } => match value.as_str() {
                CLOSE_AND_STOP => self.close_project(&project_id, Some(ShedAction::Stop)),
                CLOSE_AND_DELETE => {
                    let name = self.project_name(&project_id);
                    self.mode = Mode::Confirm {
                        prompt: format!("Delete shed {name}? This cannot be undone."),
                        action: ConfirmAction::DeleteShed { project_id },
                    };
                    Vec::new()
                }
                _ => self.close_project(&project_id, None),
            },
        }
    }

    fn name_shed_intent(&mut self, mut input: String, intent: Intent) -> Vec<Effect> {
        match intent {
            Intent::Input(c) => input.push(c),
            Intent::Backspace => {
                input.pop();
            }
            Intent::Cancel => return Vec::new(),
            Intent::Accept => {
                let name = input.trim().to_string();
                if !valid_shed_name(&name) {
                    self.set_error(format!(
                        "invalid shed name {name:?}: use letters, digits and dashes"
                    ));
                    self.mode = Mode::NameShed { input };
                    return Vec::new();
                }
                let server = self.config.shed.default_server.trim();
                let opts = CreateOpts {
                    server: (!server.is_empty()).then(|| server.to_string()),
                    ..CreateOpts::default()
                };
                return vec![Effect::CreateShed { name, opts }];
            }
            _ => {}
        }
        self.mode = Mode::NameShed { input };
        Vec::new()
    }

    fn confirmed(&mut self, action: ConfirmAction) -> Vec<Effect> {
        match action {
            ConfirmAction::CloseSession { session_id } => self.begin_kill(&session_id),
            ConfirmAction::CloseProject { project_id } => self.close_project(&project_id, None),
            ConfirmAction::DeleteShed { project_id } => {
                self.close_project(&project_id, Some(ShedAction::Delete))
            }
        }
    }

    // -----------------------------------------------------------------------
    // Scheduling
    // -----------------------------------------------------------------------

    fn poll_effect(&mut self) -> Option<Effect> {
        if self.poll_in_flight {
            return None;
        }
        self.poll_in_flight = true;
        Some(Effect::Poll(self.store.with_projects(poll::targets)))
    }

    fn activate(&mut self) -> Vec<Effect> {
        match self.tree.selected().cloned() {
            Some(Row::Project { .. }) => {
                let tree = &mut self.tree;
                self.store
                    .with_projects_mut(|projects| tree.toggle_expand(projects));
                Vec::new()
            }
            Some(Row::Session { session_id, .. }) => {
                let pane = self.store.with_projects(|projects| {
                    find_session(projects, &session_id).map(|(_, s)| s.pane)
                });
                match pane {
                    Some(PaneState::Visible(id)) => vec![Effect::Focus(id)],
                    Some(PaneState::Hidden(_)) => self.begin_show(&session_id),
                    Some(PaneState::NoPane) => self.begin_create(&session_id),
                    Some(PaneState::Destroyed) | None => Vec::new(),
                }
            }
            None => Vec::new(),
        }
    }

    fn visible_other_than(&self, session_id: &str) -> Option<String> {
        self.store.with_projects(|projects| {
            visible_session(projects)
                .filter(|s| s.id != session_id)
                .map(|s| s.id.clone())
        })
    }

    fn begin_create(&mut self, session_id: &str) -> Vec<Effect> {
        let visible = self.visible_other_than(session_id);
        let others: Vec<&str> = visible.iter().map(String::as_str).collect();
        if let Err(e) = self.in_flight.claim(session_id, &others) {
            self.set_error(e);
            return Vec::new();
        }
        let orch = &self.orch;
        match self
            .store
            .with_projects(|projects| orch.plan_create(projects, session_id))
        {
            Ok(plan) => vec![Effect::Create(plan)],
            Err(e) => self.reject(session_id, e),
        }
    }

    fn begin_show(&mut self, session_id: &str) -> Vec<Effect> {
        let visible = self.visible_other_than(session_id);
        let others: Vec<&str> = visible.iter().map(String::as_str).collect();
        if let Err(e) = self.in_flight.claim(session_id, &others) {
            self.set_error(e);
            return Vec::new();
        }
        let orch = &self.orch;
        match self
            .store
            .with_projects(|projects| orch.plan_show(projects, session_id))
        {
            Ok(plan) => vec![Effect::Show(plan)],
            Err(e) => self.reject(session_id, e),
        }
    }

    fn begin_hide(&mut self, session_id: &str) -> Vec<Effect> {
        if let Err(e) = self.in_flight.claim(session_id, &[]) {
            self.set_error(e);
            return Vec::new();
        }
        let orch = &self.orch;
        match self
            .store
            .with_projects(|projects| orch.plan_hide(projects, session_id))
        {
            Ok(plan) => vec![Effect::Hide(plan)],
            Err(e) => self.reject(session_id, e),
        }
    }

    fn begin_kill(&mut self, session_id: &str) -> Vec<Effect> {
        if let Err(e) = self.in_flight.claim(session_id, &[]) {
            self.set_error(e);
            return Vec::new();
        }
        let orch = &self.orch;
        match self
            .store
            .with_projects(|projects| orch.plan_kill(projects, session_id))
        {
            Ok(plan) => vec![Effect::Kill(plan)],
            Err(e) => self.reject(session_id, e),
        }
    }

    fn reject(&mut self, session_id: &str, error: OrchestratorError) -> Vec<Effect> {
        self.in_flight.release(session_id);
        self.set_error(error);
        Vec::new()
    }

    // -----------------------------------------------------------------------
    // Projects
    // -----------------------------------------------------------------------

    fn selected_project_id(&self) -> Option<String> {
        self.tree.selected().map(|row| row.project_id().to_string())
    }

    fn project_name(&self, project_id: &str) -> String {
        self.store
            .project(project_id)
            .map(|p| p.name)
            .unwrap_or_else(|_| project_id.to_string())
    }

    fn session_label(&self, session_id: &str) -> String {
        self.store.with_projects(|projects| {
            find_session(projects, session_id)
                .map(|(project, session)| format!("{}/{}", project.name, session.command.display_name))
                .unwrap_or_else(|| session_id.to_string())
        })
    }

    fn open_command_picker(&mut self, project_id: &str) {
        let items = self
            .config
            .command_ids()
            .into_iter()
            .filter_map(|id| self.config.command(&id))
            .map(|cmd| PickerItem::new(cmd.display_name.clone(), cmd.id.clone()).with_detail(cmd.exec))
            .collect();
        let title = format!("Launch in {}", self.project_name(project_id));
        let picker = Picker::new(
            PickerKind::Command {
                project_id: project_id.to_string(),
            },
            title,
            items,
        )
        .preselect(&self.config.default_command);
        self.mode = Mode::Picker(picker);
    }

    fn open_folder(&mut self, path: &Path) -> Vec<Effect> {
        let name = display_name(path);
        let project = Project::local(&name, &path.display().to_string());
        let project_id = project.id.clone();
        if let Err(e) = self.store.add_project(project) {
            self.set_error(e);
            return Vec::new();
        }
        info!(project = %name, "opened project");
        self.rebuild_tree();
        self.tree.select_project(&project_id);
        self.open_command_picker(&project_id);
        vec![Effect::Save]
    }

    fn attach_shed(&mut self, name: &str, server: &str) -> Vec<Effect> {
        let existing = self.store.with_projects(|projects| {
            projects
                .iter()
                .find(|p| p.remote.as_ref().is_some_and(|r| r.name == name))
                .map(|p| p.id.clone())
        });
        if let Some(project_id) = existing {
            self.tree.select_project(&project_id);
            self.open_command_picker(&project_id);
            return Vec::new();
        }
        let project = Project::remote(name, server);
        let project_id = project.id.clone();
        if let Err(e) = self.store.add_project(project) {
            self.set_error(e);
            return Vec::new();
        }
        info!(shed = %name, server = %server, "attached shed project");
        self.rebuild_tree();
        self.tree.select_project(&project_id);
        self.open_command_picker(&project_id);
        vec![Effect::Save]
    }

    /// Add a session for `command_id` and start creating its pane.
    fn launch(&mut self, project_id: &str, command_id: &str) -> Vec<Effect> {
        let Some(command) = self.config.command(command_id) else {
            self.set_error(format!("unknown command: {command_id}"));
            return Vec::new();
        };
        let session = Session::new(project_id, command);
        let session_id = session.id.clone();
        if let Err(e) = self.store.add_session(project_id, session) {
            self.set_error(e);
            return Vec::new();
        }
        self.store.with_projects_mut(|projects| {
            if let Some(project) = projects.iter_mut().find(|p| p.id == project_id) {
                project.expanded = true;
            }
        });
        self.rebuild_tree();
        self.tree.select_session(project_id, &session_id);
        let mut effects = vec![Effect::Save];
        effects.extend(self.begin_create(&session_id));
        effects
    }

    fn request_close_project(&mut self, project_id: &str) -> Vec<Effect> {
        let Ok(project) = self.store.project(project_id) else {
            return Vec::new();
        };
        if project.is_remote() {
            let items = vec![
                PickerItem::new("Close", CLOSE_ONLY).with_detail("keep the shed running"),
                PickerItem::new("Close and stop", CLOSE_AND_STOP).with_detail("stop the shed"),
                PickerItem::new("Close and delete", CLOSE_AND_DELETE).with_detail("delete the shed"),
            ];
            let picker = Picker::new(
                PickerKind::ShedClose {
                    project_id: project_id.to_string(),
                },
                format!("Close {}", project.name),
                items,
            );
            self.mode = Mode::Picker(picker);
            return Vec::new();
        }
        if project.sessions.is_empty() {
            return self.close_project(project_id, None);
        }
        self.mode = Mode::Confirm {
            prompt: format!(
                "Close {} and its {} session(s)?",
                project.name,
                project.sessions.len()
            ),
            action: ConfirmAction::CloseProject {
                project_id: project_id.to_string(),
            },
        };
        Vec::new()
    }

    /// Kill every pane of the project, drop it, then run `shed_action` on its
    /// container. Outcomes still in flight for its sessions come back stale.
    fn close_project(&mut self, project_id: &str, shed_action: Option<ShedAction>) -> Vec<Effect> {
        let project = match self.store.remove_project(project_id) {
            Ok(project) => project,
            Err(e) => {
                self.set_error(e);
                return Vec::new();
            }
        };
        let mut effects: Vec<Effect> = project
            .sessions
            .iter()
            .filter_map(|session| session.pane_id())
            .map(Effect::KillOrphan)
            .collect();
        info!(project = %project.name, killed = effects.len(), "closed project");
        if let (Some(action), Some(remote)) = (shed_action, project.remote.as_ref()) {
            effects.push(Effect::Shed(action, remote.name.clone()));
        }
        self.rebuild_tree();
        effects.push(Effect::Save);
        effects
    }

    fn selected_shed_action(&mut self, action: ShedAction) -> Vec<Effect> {
        let Some(project_id) = self.selected_project_id() else {
            return Vec::new();
        };
        let remote = self
            .store
            .project(&project_id)
            .ok()
            .and_then(|p| p.remote.map(|r| r.name));
        match remote {
            Some(name) if self.shed_available() => vec![Effect::Shed(action, name)],
            Some(_) => {
                self.set_error(ShedError::Unavailable);
                Vec::new()
            }
            None => Vec::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Outcomes
    // -----------------------------------------------------------------------

    fn on_created(&mut self, outcome: CreateOutcome) -> Vec<Effect> {
        self.in_flight.release(&outcome.session_id);
        let applied = self
            .store
            .with_projects_mut(|projects| apply_created(projects, &outcome));
        self.rebuild_tree();
        match applied {
            Applied::Done => match &outcome.result {
                Ok(pane) => {
                    self.tree
                        .select_session(&outcome.project_id, &outcome.session_id);
                    vec![Effect::Focus(*pane)]
                }
                Err(_) => Vec::new(),
            },
            other => self.settle(other),
        }
    }

    fn on_shown(&mut self, outcome: ShowOutcome) -> Vec<Effect> {
        self.in_flight.release(&outcome.session_id);
        let applied = self
            .store
            .with_projects_mut(|projects| apply_shown(projects, &outcome));
        match (applied, &outcome.result) {
            (Applied::Done, Ok(pane)) => vec![Effect::Focus(*pane)],
            (other, _) => self.settle(other),
        }
    }

    fn on_hidden(&mut self, outcome: HideOutcome) -> Vec<Effect> {
        self.in_flight.release(&outcome.session_id);
        let applied = self
            .store
            .with_projects_mut(|projects| apply_hidden_outcome(projects, &outcome));
        self.settle(applied)
    }

    fn on_killed(&mut self, outcome: KillOutcome) -> Vec<Effect> {
        self.in_flight.release(&outcome.session_id);
        if let Some(e) = &outcome.error {
            debug!(session = %outcome.session_id, error = %e, "kill reported an error");
        }
        let applied = self
            .store
            .with_projects_mut(|projects| apply_killed(projects, &outcome));
        self.rebuild_tree();
        let mut effects = self.settle(applied);
        effects.push(Effect::Save);
        effects
    }

    fn on_reconciled(&mut self, result: Result<ReconcileOutcome, OrchestratorError>) -> Vec<Effect> {
        let outcome = match result {
            Ok(outcome) => outcome,
            Err(e) => {
                self.set_error(e);
                return Vec::new();
            }
        };
        if self.orch.anchor() != outcome.anchor {
            info!(anchor = ?outcome.anchor, "anchor pane updated");
            self.orch.set_anchor(outcome.anchor);
        }
        let report = self
            .store
            .with_projects_mut(|projects| apply_reconciled(projects, &outcome));
        self.rebuild_tree();
        debug!(removed = report.removed.len(), visible = ?report.visible, "reconciled");
        if report.removed.is_empty() {
            Vec::new()
        } else {
            vec![Effect::Save]
        }
    }

    /// Effects for an outcome that did not simply succeed.
    fn settle(&mut self, applied: Applied) -> Vec<Effect> {
        match applied {
            Applied::Done | Applied::Stale { orphan: None } => Vec::new(),
            Applied::Stale { orphan: Some(pane) } => vec![Effect::KillOrphan(pane)],
            Applied::Failed(e) => {
                self.set_error(e);
                Vec::new()
            }
        }
    }
}

fn folder_items(folders: &[PathBuf]) -> Vec<PickerItem> {
    folders
        .iter()
        .map(|path| {
            let detail = path
                .parent()
                .map(|parent| parent.display().to_string())
                .unwrap_or_default();
            PickerItem::new(display_name(path), path.display().to_string()).with_detail(detail)
        })
        .collect()
}

fn shed_items(sheds: &[Shed]) -> Vec<PickerItem> {
    sheds
        .iter()
        .map(|shed| {
            let state: String = shed.status.into();
            PickerItem::new(shed.name.clone(), shed.name.clone())
                .with_detail(format!("{} {}", shed.server, state))
        })
        .collect()
}

fn valid_shed_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('-')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
