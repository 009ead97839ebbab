use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::session::{Command, SessionController};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    ToggleReveal,
    Judge(bool),
    Advance,
    TryAgain,
    Sync,
    EditDeck,
    Dismiss,
    Quit,
}

/// Where keystrokes go. Shortcuts are suspended while a text field has focus.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Focus {
    Study,
    TextInput,
}

pub struct KeyboardRouter {
    sync_wired: bool,
}

impl KeyboardRouter {
    pub fn new(sync_wired: bool) -> Self {
        Self { sync_wired }
    }

    pub fn route(&self, key: &KeyEvent, focus: Focus) -> Option<Action> {
        if key.kind != KeyEventKind::Press {
            return None;
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let code = match key.code {
            KeyCode::Char(ch) => KeyCode::Char(ch.to_ascii_lowercase()),
            other => other,
        };

        if ctrl && code == KeyCode::Char('c') {
            return Some(Action::Quit);
        }
        if focus == Focus::TextInput {
            return None;
        }
        if ctrl {
            return match code {
                KeyCode::Char('s') if self.sync_wired => Some(Action::Sync),
                _ => None,
            };
        }

        match code {
            KeyCode::Char(' ') => Some(Action::ToggleReveal),
            KeyCode::Char('x') => Some(Action::Judge(false)),
            KeyCode::Char('c') => Some(Action::Judge(true)),
            KeyCode::Char('n') => Some(Action::Advance),
            KeyCode::Char('r') => Some(Action::TryAgain),
            KeyCode::Char('d') => Some(Action::EditDeck),
            KeyCode::Char('q') => Some(Action::Quit),
            KeyCode::Esc => Some(Action::Dismiss),
            _ => None,
        }
    }
}

/// Apply a session action. Actions whose control is disabled return no
/// commands. `EditDeck` and `Quit` belong to the host and are ignored here.
pub fn apply(controller: &mut SessionController, action: Action) -> Vec<Command> {
    match action {
        Action::ToggleReveal => {
            controller.toggle_reveal();
            Vec::new()
        }
        Action::Judge(correct) => controller.judge(correct),
        Action::Advance => controller.advance(),
        Action::TryAgain => controller.try_again(),
        Action::Sync => controller.sync(),
        Action::Dismiss => {
            controller.dismiss_notification();
            Vec::new()
        }
        Action::EditDeck | Action::Quit => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;
    use crate::session::{ControllerSettings, SessionPhase};

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(ch: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL)
    }

    #[test]
    fn maps_study_shortcuts_case_insensitively() {
        let router = KeyboardRouter::new(true);
        let cases = [
            (press(KeyCode::Char(' ')), Action::ToggleReveal),
            (press(KeyCode::Char('x')), Action::Judge(false)),
            (press(KeyCode::Char('X')), Action::Judge(false)),
            (press(KeyCode::Char('c')), Action::Judge(true)),
            (press(KeyCode::Char('C')), Action::Judge(true)),
            (press(KeyCode::Char('n')), Action::Advance),
            (press(KeyCode::Char('N')), Action::Advance),
            (ctrl('s'), Action::Sync),
            (ctrl('c'), Action::Quit),
        ];
        for (key, expected) in cases {
            assert_eq!(router.route(&key, Focus::Study), Some(expected), "{key:?}");
        }
    }

    #[test]
    fn text_input_focus_suppresses_shortcuts() {
        let router = KeyboardRouter::new(true);
        for ch in [' ', 'x', 'c', 'n', 'q'] {
            assert_eq!(router.route(&press(KeyCode::Char(ch)), Focus::TextInput), None);
        }
        assert_eq!(router.route(&ctrl('s'), Focus::TextInput), None);
        assert_eq!(router.route(&ctrl('c'), Focus::TextInput), Some(Action::Quit));
    }

    #[test]
    fn ctrl_s_unwired_without_sync() {
        let router = KeyboardRouter::new(false);
        assert_eq!(router.route(&ctrl('s'), Focus::Study), None);
        // Plain `s` is not a shortcut either.
        assert_eq!(router.route(&press(KeyCode::Char('s')), Focus::Study), None);
    }

    #[test]
    fn release_events_are_ignored() {
        let router = KeyboardRouter::new(true);
        let mut key = press(KeyCode::Char('c'));
        key.kind = KeyEventKind::Release;
        assert_eq!(router.route(&key, Focus::Study), None);
    }

    #[test]
    fn disabled_controls_are_silent_no_ops() {
        let mut controller = SessionController::new(ControllerSettings::default(), Instant::now());
        // Still loading: nothing to judge, reveal or skip.
        for action in [
            Action::Judge(true),
            Action::Judge(false),
            Action::ToggleReveal,
            Action::Advance,
            Action::TryAgain,
            Action::Dismiss,
        ] {
            assert!(apply(&mut controller, action).is_empty());
            assert_eq!(controller.phase(), SessionPhase::Loading);
        }
    }
}
