use crate::coords::Viewport;

/// Outcome of a render-area update.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum AreaChange {
    /// Surface size matches the last observed size.
    Unchanged,
    /// Surface size changed; the viewport now covers the full surface.
    Resized(Viewport),
}

/// Tracks the drawable surface size and what depends on it.
///
/// The size starts out unknown, so the first update always reports a
/// resize. Each distinct size is reported exactly once.
#[derive(Debug, Clone, Default)]
pub struct RenderArea {
    size: Option<(u32, u32)>,
    viewport: Viewport,
    projection_dirty: bool,
}

impl RenderArea {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the queried surface size.
    pub fn update(&mut self, width: u32, height: u32) -> AreaChange {
        if self.size == Some((width, height)) {
            return AreaChange::Unchanged;
        }

        self.size = Some((width, height));
        self.viewport = Viewport::full(width, height);
        self.projection_dirty = true;

        AreaChange::Resized(self.viewport)
    }

    /// Forgets the current size so the next update recomputes everything.
    pub fn invalidate(&mut self) {
        self.size = None;
    }

    /// Last known size, `None` until the first successful query.
    pub fn size(&self) -> Option<(u32, u32)> {
        self.size
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// True when there is nothing to draw into (unknown or zero-sized).
    pub fn is_empty(&self) -> bool {
        !matches!(self.size, Some((w, h)) if w > 0 && h > 0)
    }

    /// Width over height, or `None` while the area is empty.
    pub fn aspect_ratio(&self) -> Option<f32> {
        match self.size {
            Some((w, h)) if w > 0 && h > 0 => Some(w as f32 / h as f32),
            _ => None,
        }
    }

    /// Returns whether the projection must be rebuilt, clearing the flag.
    pub fn take_projection_dirty(&mut self) -> bool {
        std::mem::take(&mut self.projection_dirty)
    }

    pub fn projection_dirty(&self) -> bool {
        self.projection_dirty
    }
}
