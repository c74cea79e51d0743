//! GPU device + surface management.
//!
//! This module is responsible for:
//! - negotiating a framebuffer configuration (color + depth formats)
//! - creating the wgpu Instance/Adapter/Device/Queue and the window Surface
//! - tracking the render area and acquiring/presenting frames
//! - releasing everything in a fixed order at shutdown

mod config;
mod context;
mod error;
mod frame;
mod init;
mod render_area;

pub use config::{choose_config, enumerate_configs, FramebufferConfig, DEPTH_FORMATS};
pub use context::RenderContext;
pub use error::SurfaceErrorAction;
pub use frame::GpuFrame;
pub use init::GpuInit;
pub use render_area::{AreaChange, RenderArea};
