use super::{
    Action,
    ActivateAction,
    Screen,
};
use crossterm::event::{
    KeyCode,
    KeyEvent,
    KeyModifiers,
};
use derive_more::{
    Deref,
    DerefMut,
};
use std::collections::HashMap;

/// Key sequences and the action each one triggers.
pub(crate) type Keymap = HashMap<Vec<KeyEvent>, Action>;

#[derive(Clone, Debug, Deref, DerefMut)]
pub(crate) struct KeyBindings(pub HashMap<Screen, Keymap>);

impl Default for KeyBindings {
    fn default() -> Self {
        let mut bindings = HashMap::new();
        bindings.insert(Screen::Dashboard, global_keymap());
        bindings.insert(Screen::Logs, global_keymap());
        Self(bindings)
    }
}

fn global_keymap() -> Keymap {
    let mut keymap = Keymap::new();
    for quit in [
        key(KeyCode::Char('q'), KeyModifiers::NONE),
        key(KeyCode::Char('Q'), KeyModifiers::SHIFT),
        key(KeyCode::Esc, KeyModifiers::NONE),
        key(KeyCode::Char('c'), KeyModifiers::CONTROL),
    ] {
        keymap.insert(vec![quit], Action::Quit);
    }
    keymap.insert(vec![key(KeyCode::Char('z'), KeyModifiers::CONTROL)], Action::Suspend);
    keymap.insert(
        vec![key(KeyCode::Char('1'), KeyModifiers::NONE)],
        Action::Activate(ActivateAction::Dashboard),
    );
    keymap.insert(
        vec![key(KeyCode::Char('2'), KeyModifiers::NONE)],
        Action::Activate(ActivateAction::Logs),
    );
    keymap
}

fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
    KeyEvent::new(code, modifiers)
}
