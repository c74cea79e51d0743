//! Screen-space geometry shared by the device and renderer layers.
//!
//! Canonical space: physical pixels, origin top-left.

mod viewport;

pub use viewport::Viewport;
