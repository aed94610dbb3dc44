//! Attention notifications in the tmux status bar.
//!
//! Sessions that are waiting for input or have failed are listed in a
//! `Codely:` segment appended to the user's own `status-right`, and the digit
//! keys `1..=6` are bound to jump straight to their panes.

use crate::domain::{PaneId, Project, Status};
use crate::tmux::MuxDriver;
use std::collections::BTreeMap;
use tracing::{debug, warn};

pub const SEGMENT_PREFIX: &str = "Codely:";
pub const MAX_ITEMS: usize = 6;

const SEPARATOR: &str = " | ";

/// One session that needs the user's attention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttentionItem {
    pub label: String,
    pub pane: PaneId,
    pub status: Status,
}

/// Sessions with a live pane whose status needs attention, in tree order.
pub fn collect_items(projects: &[Project]) -> Vec<AttentionItem> {
    projects
        .iter()
        .flat_map(|project| {
            project.sessions.iter().filter_map(move |session| {
                let pane = session.pane_id()?;
                session.status.needs_attention().then(|| AttentionItem {
                    label: format!("{}/{}", project.name, session.command.id),
                    pane,
                    status: session.status,
                })
            })
        })
        .collect()
}

/// Render the segment and the jump-key map for `items`.
pub fn format_segment(items: &[AttentionItem]) -> (String, BTreeMap<u8, PaneId>) {
    if items.is_empty() {
        return (String::new(), BTreeMap::new());
    }
    let mut parts = Vec::with_capacity(items.len().min(MAX_ITEMS) + 1);
    let mut keys = BTreeMap::new();
    for (key, item) in (1u8..).zip(items.iter().take(MAX_ITEMS)) {
        keys.insert(key, item.pane);
        let marker = if item.status == Status::Error { "! " } else { "" };
        parts.push(format!("[{key}] {marker}{}", item.label));
    }
    if items.len() > MAX_ITEMS {
        parts.push(format!("+{}", items.len() - MAX_ITEMS));
    }
    (format!("{SEGMENT_PREFIX} {}", parts.join(" ")), keys)
}

/// Remove a previously appended segment, keeping the user's own content.
pub fn strip_segment(status_right: &str) -> String {
    let Some(index) = status_right.find(SEGMENT_PREFIX) else {
        return status_right.trim().to_string();
    };
    let before = &status_right[..index];
    before
        .strip_suffix(SEPARATOR)
        .unwrap_or(before)
        .trim()
        .to_string()
}

/// Append `segment` to `base`.
pub fn compose(base: &str, segment: &str) -> String {
    match (base.is_empty(), segment.is_empty()) {
        (_, true) => base.to_string(),
        (true, false) => segment.to_string(),
        (false, false) => format!("{base}{SEPARATOR}{segment}"),
    }
}

/// Tracks bound jump keys so unchanged bindings are left alone.
#[derive(Debug, Default)]
pub struct Notifier {
    keys: BTreeMap<u8, PaneId>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bound_keys(&self) -> &BTreeMap<u8, PaneId> {
        &self.keys
    }

    pub async fn update(&mut self, mux: &dyn MuxDriver, items: &[AttentionItem]) {
        let (segment, keys) = format_segment(items);
        self.write_status(mux, &segment).await;
        self.write_keys(mux, keys).await;
    }

    /// Remove the segment and every jump key.
    pub async fn clear(&mut self, mux: &dyn MuxDriver) {
        self.write_status(mux, "").await;
        self.write_keys(mux, BTreeMap::new()).await;
    }

    async fn write_status(&self, mux: &dyn MuxDriver, segment: &str) {
        let current = match mux.status_right().await {
            Ok(current) => current,
            Err(e) => {
                debug!(error = %e, "could not read status-right");
                return;
            }
        };
        let next = compose(&strip_segment(&current), segment);
        if current == next {
            return;
        }
        if let Err(e) = mux.set_status_right(&next).await {
            warn!(error = %e, "could not update status-right");
        }
    }

    async fn write_keys(&mut self, mux: &dyn MuxDriver, keys: BTreeMap<u8, PaneId>) {
        for (key, pane) in &keys {
            if self.keys.get(key) == Some(pane) {
                continue;
            }
            if let Err(e) = mux.bind_jump_key(*key, *pane).await {
                warn!(key, pane = %pane, error = %e, "could not bind jump key");
            }
        }
        for key in self.keys.keys().filter(|k| !keys.contains_key(k)) {
            if let Err(e) = mux.unbind_jump_key(*key).await {
                warn!(key, error = %e, "could not unbind jump key");
            }
        }
        self.keys = keys;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Command, PaneState, Session};
    use crate::testsupport::FakeMux;

    fn item(label: &str, pane: u32, status: Status) -> AttentionItem {
        AttentionItem {
            label: label.into(),
            pane: PaneId(pane),
            status,
        }
    }

    #[test]
    fn segment_lists_items_with_error_marker() {
        let items = vec![
            item("a/claude", 3, Status::Waiting),
            item("b/bash", 5, Status::Error),
        ];
        let (segment, keys) = format_segment(&items);
        assert_eq!(segment, "Codely: [1] a/claude [2] ! b/bash");
        assert_eq!(keys.get(&1), Some(&PaneId(3)));
        assert_eq!(keys.get(&2), Some(&PaneId(5)));
    }

    #[test]
    fn segment_overflow_is_counted() {
        let items: Vec<_> = (0..8)
            .map(|i| item(&format!("p/{i}"), i, Status::Waiting))
            .collect();
        let (segment, keys) = format_segment(&items);
        assert!(segment.ends_with("[6] p/5 +2"), "{segment}");
        assert_eq!(keys.len(), MAX_ITEMS);
    }

    #[test]
    fn empty_items_yield_empty_segment() {
        assert_eq!(format_segment(&[]), (String::new(), BTreeMap::new()));
    }

    #[test]
    fn strip_removes_previous_segment() {
        assert_eq!(strip_segment("%H:%M | Codely: [1] a/claude"), "%H:%M");
        assert_eq!(strip_segment("Codely: [1] a/claude"), "");
        assert_eq!(strip_segment("  %H:%M "), "%H:%M");
    }

    #[test]
    fn compose_joins_with_separator() {
        assert_eq!(compose("%H:%M", "Codely: [1] x"), "%H:%M | Codely: [1] x");
        assert_eq!(compose("", "Codely: [1] x"), "Codely: [1] x");
        assert_eq!(compose("%H:%M", ""), "%H:%M");
    }

    #[test]
    fn collect_skips_sessions_without_panes() {
        let mut project = Project::local("web", "/tmp/web");
        let command = Command {
            id: "claude".into(),
            exec: "claude".into(),
            ..Default::default()
        };
        let mut live = Session::new(&project.id, command.clone());
        live.pane = PaneState::Hidden(PaneId(7));
        live.status = Status::Waiting;
        let mut gone = Session::new(&project.id, command);
        gone.status = Status::Error;
        project.sessions = vec![live, gone];

        let items = collect_items(&[project]);
        assert_eq!(items, vec![item("web/claude", 7, Status::Waiting)]);
    }

    #[tokio::test]
    async fn notifier_preserves_user_status_and_rebinds_keys() {
        let mux = FakeMux::new();
        mux.set_status_right_value("%H:%M");
        let mut notifier = Notifier::new();

        notifier
            .update(&mux, &[item("a/claude", 3, Status::Waiting)])
            .await;
        assert_eq!(mux.status_right_value(), "%H:%M | Codely: [1] a/claude");
        assert_eq!(mux.bindings().get(&1).map(String::as_str), Some("%3"));

        let before = mux.calls().len();
        notifier
            .update(&mux, &[item("a/claude", 3, Status::Waiting)])
            .await;
        let repeated: Vec<_> = mux.calls()[before..].to_vec();
        assert_eq!(repeated, vec!["show-option".to_string()]);

        notifier.clear(&mux).await;
        assert_eq!(mux.status_right_value(), "%H:%M");
        assert!(mux.bindings().is_empty());
        assert!(notifier.bound_keys().is_empty());
    }
}
