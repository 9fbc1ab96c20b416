use winit::event::ElementState;
use winit::keyboard::{KeyCode, PhysicalKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    MoveUpLeft,
    MoveUpRight,
    MoveDownLeft,
    MoveDownRight,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyActionKind {
    Press,
    Repeat,
    Release,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputEvent {
    pub action: InputAction,
    pub kind: KeyActionKind,
}

impl InputEvent {
    pub fn press(action: InputAction) -> Self {
        Self {
            action,
            kind: KeyActionKind::Press,
        }
    }

    pub fn is_press(&self) -> bool {
        self.kind == KeyActionKind::Press
    }
}

pub(crate) fn action_for_physical_key(key: PhysicalKey) -> Option<InputAction> {
    let PhysicalKey::Code(code) = key else {
        return None;
    };
    let action = match code {
        KeyCode::KeyW | KeyCode::ArrowUp => InputAction::MoveUp,
        KeyCode::KeyS | KeyCode::ArrowDown => InputAction::MoveDown,
        KeyCode::KeyA | KeyCode::ArrowLeft => InputAction::MoveLeft,
        KeyCode::KeyD | KeyCode::ArrowRight => InputAction::MoveRight,
        KeyCode::KeyQ => InputAction::MoveUpLeft,
        KeyCode::KeyE => InputAction::MoveUpRight,
        KeyCode::KeyZ => InputAction::MoveDownLeft,
        KeyCode::KeyX => InputAction::MoveDownRight,
        KeyCode::Escape => InputAction::Quit,
        _ => return None,
    };
    Some(action)
}

pub(crate) fn key_action_kind(state: ElementState, repeat: bool) -> KeyActionKind {
    match state {
        ElementState::Pressed if repeat => KeyActionKind::Repeat,
        ElementState::Pressed => KeyActionKind::Press,
        ElementState::Released => KeyActionKind::Release,
    }
}

pub(crate) fn input_event_from_key(
    key: PhysicalKey,
    state: ElementState,
    repeat: bool,
) -> Option<InputEvent> {
    let action = action_for_physical_key(key)?;
    Some(InputEvent {
        action,
        kind: key_action_kind(state, repeat),
    })
}
