//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and Window, feeds pointer input to the app and
//! drives one frame per redraw.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig};
