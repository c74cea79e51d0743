//! Input subsystem.
//!
//! Public API is platform-agnostic: pointer events (touch contacts and the
//! primary mouse button) collected into a per-frame [`InputQueue`].
//! [`platform`] translates winit window events into them.

pub mod platform;
mod queue;
mod types;

pub use queue::InputQueue;
pub use types::{PointerAction, PointerEvent, PointerId};
