use std::sync::Arc;

use winit::window::Window;

use crate::input::InputQueue;

/// Per-frame context passed to `core::App::on_frame`.
pub struct FrameCtx<'a> {
    pub window: &'a Arc<Window>,

    /// Pointer events received since the previous frame. The app is
    /// expected to drain it.
    pub input: &'a mut InputQueue,

    /// Frames delivered so far, starting at 0.
    pub frame_index: u64,
}
