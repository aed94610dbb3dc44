//! Flattened, navigable tree of projects and their sessions.
//!
//! The row list is derived data: it is rebuilt from the project list after
//! every structural change and never edited in place. Rows carry ids rather
//! than references so the tree can outlive any one borrow of the store.

use crate::domain::Project;

/// One visible line of the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Row {
    Project {
        project_id: String,
    },
    Session {
        project_id: String,
        session_id: String,
    },
}

impl Row {
    pub fn project_id(&self) -> &str {
        match self {
            Self::Project { project_id } | Self::Session { project_id, .. } => project_id,
        }
    }

    pub fn session_id(&self) -> Option<&str> {
        match self {
            Self::Project { .. } => None,
            Self::Session { session_id, .. } => Some(session_id),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Tree {
    rows: Vec<Row>,
    selected: usize,
}

impl Tree {
    pub fn new(projects: &[Project]) -> Self {
        let mut tree = Self::default();
        tree.rebuild(projects);
        tree
    }

    /// Recompute rows and clamp the selection into range.
    pub fn rebuild(&mut self, projects: &[Project]) {
        self.rows.clear();
        for project in projects {
            self.rows.push(Row::Project {
                project_id: project.id.clone(),
            });
            if project.expanded {
                self.rows
                    .extend(project.sessions.iter().map(|session| Row::Session {
                        project_id: project.id.clone(),
                        session_id: session.id.clone(),
                    }));
            }
        }
        self.selected = self.selected.min(self.rows.len().saturating_sub(1));
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Selected row index, `None` for an empty tree.
    pub fn selected_index(&self) -> Option<usize> {
        (!self.rows.is_empty()).then_some(self.selected)
    }

    pub fn selected(&self) -> Option<&Row> {
        self.rows.get(self.selected)
    }

    pub fn move_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        if self.selected + 1 < self.rows.len() {
            self.selected += 1;
        }
    }

    fn selected_project<'a>(&self, projects: &'a mut [Project]) -> Option<&'a mut Project> {
        let id = self.selected()?.project_id().to_string();
        projects.iter_mut().find(|p| p.id == id)
    }

    /// Flip the expanded flag of the selected row's project. Toggling from a
    /// session row collapses its project and selects the project row.
    pub fn toggle_expand(&mut self, projects: &mut [Project]) {
        let Some(project) = self.selected_project(projects) else {
            return;
        };
        project.expanded = !project.expanded;
        let project_id = project.id.clone();
        self.rebuild(projects);
        self.select_project(&project_id);
    }

    pub fn expand(&mut self, projects: &mut [Project]) {
        if !matches!(self.selected(), Some(Row::Project { .. })) {
            return;
        }
        if let Some(project) = self.selected_project(projects) {
            if !project.expanded {
                project.expanded = true;
                self.rebuild(projects);
            }
        }
    }

    /// Collapse a project row; on a session row, jump to its project.
    pub fn collapse(&mut self, projects: &mut [Project]) {
        match self.selected().cloned() {
            Some(Row::Project { .. }) => {
                if let Some(project) = self.selected_project(projects) {
                    if project.expanded {
                        project.expanded = false;
                        self.rebuild(projects);
                    }
                }
            }
            Some(Row::Session { project_id, .. }) => self.select_project(&project_id),
            None => {}
        }
    }

    pub fn select_project(&mut self, project_id: &str) {
        if let Some(index) = self
            .rows
            .iter()
            .position(|row| matches!(row, Row::Project { project_id: id } if id == project_id))
        {
            self.selected = index;
        }
    }

    pub fn select_session(&mut self, project_id: &str, session_id: &str) {
        if let Some(index) = self.rows.iter().position(|row| {
            row.project_id() == project_id && row.session_id() == Some(session_id)
        }) {
            self.selected = index;
        }
    }
}
