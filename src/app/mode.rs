//! Modal UI state owned by the event loop.

/// What the tree view is currently doing with key presses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Normal,
    Help,
    Picker(Picker),
    Confirm {
        prompt: String,
        action: ConfirmAction,
    },
    /// Typing the name of a new remote container.
    NameShed { input: String },
}

impl Mode {
    pub fn is_normal(&self) -> bool {
        matches!(self, Self::Normal)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    CloseSession { session_id: String },
    CloseProject { project_id: String },
    /// Close a shed project and delete the container.
    DeleteShed { project_id: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerKind {
    Folder,
    /// Pick a command to launch in `project_id`.
    Command { project_id: String },
    Shed,
    /// Close / close+stop / close+delete for a shed project.
    ShedClose { project_id: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerItem {
    pub label: String,
    pub value: String,
    pub detail: String,
}

impl PickerItem {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            detail: String::new(),
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = detail.into();
        self
    }
}

/// A filterable single-choice list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Picker {
    pub kind: PickerKind,
    pub title: String,
    items: Vec<PickerItem>,
    filter: String,
    filtering: bool,
    selected: usize,
}

impl Picker {
    pub fn new(kind: PickerKind, title: impl Into<String>, items: Vec<PickerItem>) -> Self {
        Self {
            kind,
            title: title.into(),
            items,
            filter: String::new(),
            filtering: false,
            selected: 0,
        }
    }

    /// Start with the item whose value is `value` selected, if present.
    pub fn preselect(mut self, value: &str) -> Self {
        if let Some(index) = self.visible().iter().position(|item| item.value == value) {
            self.selected = index;
        }
        self
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn is_filtering(&self) -> bool {
        self.filtering
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Items matching the filter, case-insensitively, in original order.
    pub fn visible(&self) -> Vec<&PickerItem> {
        let needle = self.filter.to_lowercase();
        self.items
            .iter()
            .filter(|item| needle.is_empty() || item.label.to_lowercase().contains(&needle))
            .collect()
    }

    pub fn current(&self) -> Option<&PickerItem> {
        self.visible().get(self.selected).copied()
    }

    pub fn move_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        let len = self.visible().len();
        if self.selected + 1 < len {
            self.selected += 1;
        }
    }

    pub fn begin_filter(&mut self) {
        self.filtering = true;
    }

    pub fn end_filter(&mut self) {
        self.filtering = false;
    }

    pub fn push_char(&mut self, c: char) {
        self.filter.push(c);
        self.selected = 0;
    }

    pub fn pop_char(&mut self) {
        self.filter.pop();
        self.selected = 0;
    }

    pub fn replace_items(&mut self, items: Vec<PickerItem>) {
        self.items = items;
        let len = self.visible().len();
        self.selected = self.selected.min(len.saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn picker() -> Picker {
        Picker::new(
            PickerKind::Folder,
            "Folders",
            vec![
                PickerItem::new("alpha", "/w/alpha"),
                PickerItem::new("beta", "/w/beta"),
                PickerItem::new("Alpine", "/w/Alpine"),
            ],
        )
    }

    #[test]
    fn movement_is_clamped() {
        let mut p = picker();
        p.move_up();
        assert_eq!(p.selected(), 0);
        p.move_down();
        p.move_down();
        p.move_down();
        assert_eq!(p.selected(), 2);
    }

    #[test]
    fn filter_is_case_insensitive_and_resets_selection() {
        let mut p = picker();
        p.move_down();
        p.push_char('A');
        p.push_char('l');
        assert_eq!(p.selected(), 0);
        let labels: Vec<_> = p.visible().iter().map(|i| i.label.as_str()).collect();
        assert_eq!(labels, vec!["alpha", "Alpine"]);
        p.move_down();
        assert_eq!(p.current().map(|i| i.value.as_str()), Some("/w/Alpine"));
        p.pop_char();
        p.pop_char();
        assert_eq!(p.visible().len(), 3);
    }

    #[test]
    fn preselect_finds_value() {
        let p = picker().preselect("/w/beta");
        assert_eq!(p.current().map(|i| i.label.as_str()), Some("beta"));
    }

    #[test]
    fn empty_filter_result_has_no_current() {
        let mut p = picker();
        p.push_char('z');
        assert!(p.current().is_none());
    }
}
