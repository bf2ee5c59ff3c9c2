use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};

/// Where a gesture came from. The drag surface never branches on this; it
/// exists so alternative input adapters stay interchangeable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerKind {
    Mouse,
    Touch,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerAction {
    Down,
    Move,
    Up,
    Cancel,
}

/// A single kind-tagged pointer sample in terminal cell coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PointerEvent {
    pub action: PointerAction,
    pub kind: PointerKind,
    pub column: u16,
    pub row: u16,
}

impl PointerEvent {
    pub fn new(action: PointerAction, kind: PointerKind, column: u16, row: u16) -> Self {
        Self {
            action,
            kind,
            column,
            row,
        }
    }

    pub fn mouse(action: PointerAction, column: u16, row: u16) -> Self {
        Self::new(action, PointerKind::Mouse, column, row)
    }

    pub fn touch(action: PointerAction, column: u16, row: u16) -> Self {
        Self::new(action, PointerKind::Touch, column, row)
    }
}

/// Translate a crossterm mouse event into the pointer model. Only the left
/// button forms gestures; scroll and other buttons are not gesture input.
pub fn from_mouse_event(ev: &MouseEvent) -> Option<PointerEvent> {
    let action = match ev.kind {
        MouseEventKind::Down(MouseButton::Left) => PointerAction::Down,
        MouseEventKind::Drag(MouseButton::Left) => PointerAction::Move,
        MouseEventKind::Up(MouseButton::Left) => PointerAction::Up,
        MouseEventKind::Moved => PointerAction::Move,
        _ => return None,
    };

    Some(PointerEvent::mouse(action, ev.column, ev.row))
}
