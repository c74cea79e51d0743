use super::types::PointerEvent;

/// Batch of pointer events collected by the host between frames.
///
/// The host pushes; the consumer reads [`events`](Self::events) once per
/// frame and calls [`clear`](Self::clear) when done so the allocation is
/// reused for the next batch.
#[derive(Debug, Default)]
pub struct InputQueue {
    events: Vec<PointerEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, ev: PointerEvent) {
        self.events.push(ev);
    }

    /// Events in arrival order.
    pub fn events(&self) -> &[PointerEvent] {
        &self.events
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
