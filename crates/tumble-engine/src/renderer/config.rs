use crate::device::GpuInit;
use crate::texture::AssetSource;

use super::camera::Camera;

/// Renderer tunables. `Default` reproduces the stock tumbling crate scene.
#[derive(Debug, Clone)]
pub struct RendererConfig {
    pub gpu: GpuInit,
    pub camera: Camera,
    pub clear_color: wgpu::Color,

    /// Radians of rotation per unit of drag speed.
    pub rotation_multiplier: f32,

    pub assets: AssetSource,
    pub texture_name: String,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            gpu: GpuInit::default(),
            camera: Camera::default(),
            clear_color: wgpu::Color::WHITE,
            rotation_multiplier: 10.0,
            assets: AssetSource::default(),
            texture_name: "crate.png".to_string(),
        }
    }
}
