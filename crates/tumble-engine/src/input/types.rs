use std::fmt;
use std::time::Instant;

/// Identifies one pointer for the lifetime of a press.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum PointerId {
    /// The primary mouse button acting as a pointer.
    Mouse,
    /// A touch contact, with the platform's finger id.
    Touch(u64),
}

impl fmt::Display for PointerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PointerId::Mouse => f.write_str("mouse"),
            PointerId::Touch(id) => write!(f, "touch#{id}"),
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PointerAction {
    Down,
    Up,
    Move,
}

/// A single pointer event in physical pixels, stamped on arrival.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointerEvent {
    pub pointer: PointerId,
    pub action: PointerAction,
    pub x: f32,
    pub y: f32,
    pub time: Instant,
}

impl PointerEvent {
    pub fn new(pointer: PointerId, action: PointerAction, x: f32, y: f32, time: Instant) -> Self {
        Self {
            pointer,
            action,
            x,
            y,
            time,
        }
    }
}
