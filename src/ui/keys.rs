//! Key bindings: crossterm key events to intents, per mode.

use crate::app::{Intent, Mode};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Map one key press to an intent. Releases and unbound keys map to `None`.
pub fn intent_for(key: &KeyEvent, mode: &Mode) -> Option<Intent> {
    if key.kind != KeyEventKind::Press && key.kind != KeyEventKind::Repeat {
        return None;
    }
    let ctrl_c =
        key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL);
    match mode {
        Mode::Normal if ctrl_c => Some(Intent::Quit),
        _ if ctrl_c => Some(Intent::Cancel),
        Mode::Normal => normal(key.code),
        Mode::Help => match key.code {
            KeyCode::Char('?') => Some(Intent::Help),
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => Some(Intent::Cancel),
            _ => None,
        },
        Mode::Picker(picker) if picker.is_filtering() => text_entry(key.code),
        Mode::Picker(_) => match key.code {
            KeyCode::Up | KeyCode::Char('k') => Some(Intent::Up),
            KeyCode::Down | KeyCode::Char('j') => Some(Intent::Down),
            KeyCode::Enter => Some(Intent::Accept),
            KeyCode::Esc | KeyCode::Char('q') => Some(Intent::Cancel),
            KeyCode::Char('/') => Some(Intent::BeginInput),
            KeyCode::Char('c') => Some(Intent::CreateShed),
            KeyCode::Char('S') => Some(Intent::StartShed),
            _ => None,
        },
        Mode::Confirm { .. } => match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => Some(Intent::Confirm),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Some(Intent::Cancel),
            _ => None,
        },
        Mode::NameShed { .. } => text_entry(key.code),
    }
}

fn normal(code: KeyCode) -> Option<Intent> {
    let intent = match code {
        KeyCode::Up | KeyCode::Char('k') => Intent::MoveUp,
        KeyCode::Down | KeyCode::Char('j') => Intent::MoveDown,
        KeyCode::Left | KeyCode::Char('h') => Intent::Collapse,
        KeyCode::Right | KeyCode::Char('l') => Intent::Expand,
        KeyCode::Char(' ') => Intent::Toggle,
        KeyCode::Enter => Intent::Activate,
        KeyCode::Char('n') => Intent::NewProject,
        KeyCode::Char('N') => Intent::AttachShed,
        KeyCode::Char('t') => Intent::AddTerminal,
        KeyCode::Char('z') => Intent::Hide,
        KeyCode::Char('x') => Intent::Close,
        KeyCode::Char('X') => Intent::CloseProject,
        KeyCode::Char('S') => Intent::StartShed,
        KeyCode::Char('s') => Intent::StopShed,
        KeyCode::Char('r') => Intent::Refresh,
        KeyCode::Char('?') => Intent::Help,
        KeyCode::Char('q') => Intent::Quit,
        _ => return None,
    };
    Some(intent)
}

fn text_entry(code: KeyCode) -> Option<Intent> {
    match code {
        KeyCode::Char(c) => Some(Intent::Input(c)),
        KeyCode::Backspace => Some(Intent::Backspace),
        KeyCode::Enter => Some(Intent::Accept),
        KeyCode::Esc => Some(Intent::Cancel),
        KeyCode::Up => Some(Intent::Up),
        KeyCode::Down => Some(Intent::Down),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{ConfirmAction, Picker, PickerKind};

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn normal_mode_bindings() {
        let mode = Mode::Normal;
        assert_eq!(intent_for(&press(KeyCode::Char('j')), &mode), Some(Intent::MoveDown));
        assert_eq!(intent_for(&press(KeyCode::Left), &mode), Some(Intent::Collapse));
        assert_eq!(intent_for(&press(KeyCode::Enter), &mode), Some(Intent::Activate));
        assert_eq!(intent_for(&press(KeyCode::Char('N')), &mode), Some(Intent::AttachShed));
        assert_eq!(intent_for(&press(KeyCode::Char('X')), &mode), Some(Intent::CloseProject));
        assert_eq!(intent_for(&press(KeyCode::Char('Q')), &mode), None);
    }

    #[test]
    fn ctrl_c_quits_only_from_normal_mode() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(intent_for(&ctrl_c, &Mode::Normal), Some(Intent::Quit));
        assert_eq!(intent_for(&ctrl_c, &Mode::Help), Some(Intent::Cancel));
    }

    #[test]
    fn releases_are_ignored() {
        let mut key = press(KeyCode::Char('q'));
        key.kind = KeyEventKind::Release;
        assert_eq!(intent_for(&key, &Mode::Normal), None);
    }

    #[test]
    fn filtering_picker_takes_text() {
        let mut picker = Picker::new(PickerKind::Folder, "Open folder", Vec::new());
        assert_eq!(
            intent_for(&press(KeyCode::Char('j')), &Mode::Picker(picker.clone())),
            Some(Intent::Down)
        );
        picker.begin_filter();
        let mode = Mode::Picker(picker);
        assert_eq!(intent_for(&press(KeyCode::Char('j')), &mode), Some(Intent::Input('j')));
        assert_eq!(intent_for(&press(KeyCode::Esc), &mode), Some(Intent::Cancel));
    }

    #[test]
    fn confirm_accepts_y_and_rejects_n() {
        let mode = Mode::Confirm {
            prompt: "Close?".into(),
            action: ConfirmAction::CloseSession {
                session_id: "a".into(),
            },
        };
        assert_eq!(intent_for(&press(KeyCode::Char('y')), &mode), Some(Intent::Confirm));
        assert_eq!(intent_for(&press(KeyCode::Char('n')), &mode), Some(Intent::Cancel));
        assert_eq!(intent_for(&press(KeyCode::Char('x')), &mode), None);
    }
}
