//! Core engine-facing contracts.
//!
//! This module defines the interface between the runtime (platform loop)
//! and the renderer, and the per-frame context handed across it.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::FrameCtx;
