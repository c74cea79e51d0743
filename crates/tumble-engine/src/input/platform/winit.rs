use std::time::Instant;

use winit::event::{ElementState, MouseButton, Touch, TouchPhase, WindowEvent};

use crate::input::{PointerAction, PointerEvent, PointerId};

/// Translates winit window events into pointer events.
///
/// Touch contacts map one-to-one. The left mouse button is treated as one
/// more pointer: its moves are only reported while it is held, the same way
/// a finger only moves while it is down. Positions stay in physical pixels.
#[derive(Debug, Default)]
pub struct PointerTranslator {
    cursor: Option<(f32, f32)>,
    mouse_down: bool,
}

impl PointerTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `None` for events the input subsystem does not represent.
    pub fn translate(&mut self, event: &WindowEvent, now: Instant) -> Option<PointerEvent> {
        match event {
            WindowEvent::Touch(Touch {
                phase, location, id, ..
            }) => Some(self.touch(*id, *phase, location.x as f32, location.y as f32, now)),

            WindowEvent::CursorMoved { position, .. } => {
                self.cursor_moved(position.x as f32, position.y as f32, now)
            }

            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => self.mouse_button(*state == ElementState::Pressed, now),

            // A drag cannot survive losing the cursor or focus.
            WindowEvent::CursorLeft { .. } | WindowEvent::Focused(false) => {
                self.mouse_button(false, now)
            }

            _ => None,
        }
    }

    pub fn touch(
        &mut self,
        id: u64,
        phase: TouchPhase,
        x: f32,
        y: f32,
        now: Instant,
    ) -> PointerEvent {
        let action = match phase {
            TouchPhase::Started => PointerAction::Down,
            TouchPhase::Moved => PointerAction::Move,
            TouchPhase::Ended | TouchPhase::Cancelled => PointerAction::Up,
        };
        PointerEvent::new(PointerId::Touch(id), action, x, y, now)
    }

    pub fn cursor_moved(&mut self, x: f32, y: f32, now: Instant) -> Option<PointerEvent> {
        self.cursor = Some((x, y));
        self.mouse_down
            .then(|| PointerEvent::new(PointerId::Mouse, PointerAction::Move, x, y, now))
    }

    /// Press/release of the left button; repeated states are ignored.
    pub fn mouse_button(&mut self, pressed: bool, now: Instant) -> Option<PointerEvent> {
        if pressed == self.mouse_down {
            return None;
        }
        self.mouse_down = pressed;

        let (x, y) = self.cursor.unwrap_or((0.0, 0.0));
        let action = if pressed {
            PointerAction::Down
        } else {
            PointerAction::Up
        };
        Some(PointerEvent::new(PointerId::Mouse, action, x, y, now))
    }
}
