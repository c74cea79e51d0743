//! Frame orchestration.
//!
//! [`Renderer`] is the top-level [`App`](crate::core::App): it owns the
//! render context and scene, consumes pointer input and draws each frame as
//! `projection * view * model`, where the model rotates about +Y by the
//! current drag speed.

mod camera;
mod config;
mod gesture;
mod orchestrator;

pub use camera::{frame_transform, model_rotation, Camera};
pub use config::RendererConfig;
pub use gesture::{compute_velocity, AnimationState, DragGesture, GestureTracker};
pub use orchestrator::Renderer;
