use std::sync::Arc;

use anyhow::Result;
use winit::event::WindowEvent;
use winit::window::Window;

use super::ctx::FrameCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract driven by [`Runtime`](crate::window::Runtime).
pub trait App {
    /// Called once the window exists. An error here ends the run.
    fn init(&mut self, window: Arc<Window>) -> Result<()>;

    /// The platform handed a drawable window back after [`App::suspended`].
    fn resumed(&mut self) -> Result<()> {
        Ok(())
    }

    /// The window can no longer be drawn into.
    fn suspended(&mut self) {}

    /// Called for every window event, after input translation.
    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        let _ = event;
        AppControl::Continue
    }

    /// Called once per redraw. An error here ends the run.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_>) -> Result<AppControl>;

    /// Release everything. May be called more than once.
    fn shutdown(&mut self) {}
}
