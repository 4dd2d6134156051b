use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::snake::Direction::{self, *};
use crate::speed::Speed;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum KeyAction {
    Steer(Direction),
    Preset(Speed),
    Confirm,
    Pause,
    Quit,
    None,
}

pub fn map_key(key: &KeyEvent) -> KeyAction {
    if is_ctrl_c(key) {
        return KeyAction::Quit;
    }

    match key.code {
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => KeyAction::Steer(Up),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => KeyAction::Steer(Down),
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => KeyAction::Steer(Left),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => KeyAction::Steer(Right),
        KeyCode::Char('1') => KeyAction::Preset(Speed::Slug),
        KeyCode::Char('2') => KeyAction::Preset(Speed::Snake),
        KeyCode::Char('3') => KeyAction::Preset(Speed::Python),
        KeyCode::Enter | KeyCode::Char(' ') => KeyAction::Confirm,
        KeyCode::Esc => KeyAction::Pause,
        _ => KeyAction::None,
    }
}

fn is_ctrl_c(key: &KeyEvent) -> bool {
    key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
}
