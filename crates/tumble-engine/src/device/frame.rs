/// Represents a single acquired frame.
///
/// This object is short-lived and must be handed back to
/// [`RenderContext::present`](super::RenderContext::present) promptly. Holding
/// the surface texture prevents acquisition of subsequent frames.
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub depth_view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}
