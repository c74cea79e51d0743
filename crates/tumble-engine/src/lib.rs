//! Tumble engine crate.
//!
//! A small real-time 3-D renderer: a wgpu render context bound to a winit
//! window, a validated figure shader, textured meshes, and a frame
//! orchestrator that spins the scene with pointer drags.

pub mod device;
pub mod window;
pub mod input;
pub mod core;

pub mod logging;
pub mod coords;
pub mod shader;
pub mod figure;
pub mod texture;
pub mod renderer;
