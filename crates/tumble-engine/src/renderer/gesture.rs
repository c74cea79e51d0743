use std::time::Instant;

use crate::input::{PointerAction, PointerEvent, PointerId};

/// Drag-derived animation input. Written only by input handling, read only
/// by the frame transform.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct AnimationState {
    pub rotation_speed: f32,
}

/// A drag in progress, owned by the pointer that started it.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DragGesture {
    pub pointer: PointerId,
    pub start_y: f32,
    pub start_time: Instant,
}

impl DragGesture {
    pub fn begin(ev: &PointerEvent) -> Self {
        Self {
            pointer: ev.pointer,
            start_y: ev.y,
            start_time: ev.time,
        }
    }
}

/// Vertical drag velocity in pixels per second since the gesture began.
///
/// `None` for other pointers and when no time has elapsed.
pub fn compute_velocity(gesture: &DragGesture, event: &PointerEvent) -> Option<f32> {
    if event.pointer != gesture.pointer {
        return None;
    }
    let elapsed = event
        .time
        .saturating_duration_since(gesture.start_time)
        .as_secs_f32();
    if elapsed <= 0.0 {
        return None;
    }
    Some((event.y - gesture.start_y) / elapsed)
}

/// Turns pointer events into [`AnimationState`] updates.
///
/// Every pointer-down starts a new gesture for that pointer and stops the
/// rotation; only moves of the gesture's own pointer change the speed.
#[derive(Debug, Default)]
pub struct GestureTracker {
    active: Option<DragGesture>,
}

impl GestureTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<&DragGesture> {
        self.active.as_ref()
    }

    pub fn apply(&mut self, ev: &PointerEvent, anim: &mut AnimationState) {
        match ev.action {
            PointerAction::Down => {
                anim.rotation_speed = 0.0;
                self.active = Some(DragGesture::begin(ev));
                log::debug!("({}, {}, {}) pointer down", ev.pointer, ev.x, ev.y);
            }
            PointerAction::Up => {
                log::debug!("({}, {}, {}) pointer up", ev.pointer, ev.x, ev.y);
            }
            PointerAction::Move => {
                let velocity = self.active.as_ref().and_then(|g| compute_velocity(g, ev));
                if let Some(v) = velocity {
                    anim.rotation_speed = v;
                }
                log::trace!("({}, {}, {}) pointer move -> {:?}", ev.pointer, ev.x, ev.y, velocity);
            }
        }
    }
}
