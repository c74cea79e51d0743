use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use winit::window::Window;

use super::config::{choose_config, enumerate_configs, FramebufferConfig};
use super::render_area::{AreaChange, RenderArea};
use super::{GpuFrame, GpuInit, SurfaceErrorAction};

/// Adapter, logical device and queue; the "context" part of the triple.
struct GpuDevice {
    adapter: wgpu::Adapter,
    device: wgpu::Device,
    queue: wgpu::Queue,
}

struct DepthTarget {
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
}

impl DepthTarget {
    fn new(device: &wgpu::Device, format: wgpu::TextureFormat, width: u32, height: u32) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("tumble depth target"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            _texture: texture,
            view,
        }
    }
}

/// Owns the instance/surface/device triple bound to one window.
///
/// - negotiates a [`FramebufferConfig`] at creation
/// - tracks the render area and keeps surface + depth target sized to it
/// - acquires and presents frames
///
/// The surface may be released and recreated on its own (suspend/resume).
/// [`RenderContext::shutdown`] releases device, surface and instance in that
/// order; it is also run on drop and is safe to call more than once.
pub struct RenderContext {
    /// wgpu instance; the "display". Outlives surface recreation.
    instance: Option<wgpu::Instance>,

    /// Surface bound to the window. `None` while suspended.
    surface: Option<wgpu::Surface<'static>>,

    gpu: Option<GpuDevice>,

    window: Arc<Window>,
    framebuffer: FramebufferConfig,

    /// Active surface configuration. Width/height follow the render area.
    config: wgpu::SurfaceConfiguration,

    depth: Option<DepthTarget>,
    area: RenderArea,
}

impl RenderContext {
    /// Creates the context for `window` and configures its surface.
    ///
    /// Any failure here is fatal for the renderer; there is no degraded mode.
    pub async fn initialize(window: Arc<Window>, init: GpuInit) -> Result<Self> {
        let GpuInit {
            backends,
            power_preference,
            present_mode,
            alpha_mode,
            required_features,
            required_limits,
            desired_maximum_frame_latency,
        } = init;

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends,
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("failed to create wgpu surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("failed to find a suitable GPU adapter")?;

        let caps = surface.get_capabilities(&adapter);
        let candidates = enumerate_configs(&caps);
        let framebuffer = choose_config(&candidates).ok_or_else(|| {
            anyhow!(
                "no framebuffer configuration with 8-bit RGB and 24-bit depth \
                 ({} candidates offered)",
                candidates.len()
            )
        })?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("tumble device"),
                required_features,
                required_limits: required_limits.using_resolution(adapter.limits()),
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to create wgpu device/queue")?;

        let alpha_mode = alpha_mode
            .filter(|m| caps.alpha_modes.contains(m))
            .or_else(|| caps.alpha_modes.first().copied())
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let size = window.inner_size();
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: framebuffer.color_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency,
        };

        surface.configure(&device, &config);

        log::info!(
            "GPU context ready: adapter=\"{}\" backend={:?} color={:?} depth={:?}",
            adapter.get_info().name,
            adapter.get_info().backend,
            framebuffer.color_format,
            framebuffer.depth_format,
        );

        Ok(Self {
            instance: Some(instance),
            surface: Some(surface),
            gpu: Some(GpuDevice {
                adapter,
                device,
                queue,
            }),
            window,
            framebuffer,
            config,
            depth: None,
            // Unknown until the first update; that update sizes everything.
            area: RenderArea::new(),
        })
    }

    /// Queries the surface size and, on change, resizes surface, depth target
    /// and viewport and marks the projection for recomputation.
    ///
    /// Call once per frame before drawing.
    pub fn update_render_area(&mut self) -> Result<AreaChange> {
        let (Some(surface), Some(gpu)) = (self.surface.as_ref(), self.gpu.as_ref()) else {
            bail!("render area queried without a live surface");
        };

        let size = self.window.inner_size();
        let change = self.area.update(size.width, size.height);

        if let AreaChange::Resized(viewport) = change {
            if self.area.is_empty() {
                // Zero-sized surfaces cannot be configured; wait for a real size.
                self.depth = None;
            } else {
                self.config.width = size.width;
                self.config.height = size.height;
                surface.configure(&gpu.device, &self.config);
                self.depth = Some(DepthTarget::new(
                    &gpu.device,
                    self.framebuffer.depth_format,
                    size.width,
                    size.height,
                ));
            }
            log::debug!(
                "render area now {}x{} (viewport {:?})",
                size.width,
                size.height,
                viewport
            );
        }

        Ok(change)
    }

    /// Acquires the next surface texture and creates an encoder.
    ///
    /// Returns `Ok(None)` when there is nothing to draw this frame: the area
    /// is empty, or the surface went stale and was reconfigured.
    pub fn begin_frame(&mut self) -> Result<Option<GpuFrame>> {
        let (Some(surface), Some(gpu)) = (self.surface.as_ref(), self.gpu.as_ref()) else {
            bail!("frame requested without a live surface");
        };
        let Some(depth) = self.depth.as_ref() else {
            return Ok(None);
        };

        let surface_texture = match surface.get_current_texture() {
            Ok(t) => t,
            Err(err) => match SurfaceErrorAction::classify(&err) {
                SurfaceErrorAction::Reconfigured => {
                    log::debug!("surface {err:?}; reconfiguring");
                    surface.configure(&gpu.device, &self.config);
                    self.area.invalidate();
                    return Ok(None);
                }
                SurfaceErrorAction::Fatal => {
                    return Err(
                        anyhow::Error::new(err).context("failed to acquire surface texture")
                    );
                }
            },
        };

        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("tumble frame encoder"),
            });

        Ok(Some(GpuFrame {
            surface_texture,
            view,
            depth_view: depth.view.clone(),
            encoder,
        }))
    }

    /// Submits the recorded commands and presents the frame.
    pub fn present(&self, frame: GpuFrame) -> Result<()> {
        let gpu = self.gpu()?;
        let GpuFrame {
            surface_texture,
            view,
            depth_view,
            encoder,
        } = frame;

        gpu.queue.submit(std::iter::once(encoder.finish()));
        drop(view);
        drop(depth_view);

        self.window.pre_present_notify();
        surface_texture.present();
        Ok(())
    }

    /// Releases the surface only; device and instance stay alive.
    pub fn suspend_surface(&mut self) {
        self.depth = None;
        if self.surface.take().is_some() {
            log::info!("surface released");
        }
        self.area.invalidate();
    }

    /// Recreates the surface released by [`suspend_surface`](Self::suspend_surface).
    pub fn resume_surface(&mut self) -> Result<()> {
        if self.surface.is_some() {
            return Ok(());
        }
        let (Some(instance), Some(gpu)) = (self.instance.as_ref(), self.gpu.as_ref()) else {
            bail!("cannot recreate a surface on a released context");
        };

        let surface = instance
            .create_surface(self.window.clone())
            .context("failed to recreate wgpu surface")?;

        let caps = surface.get_capabilities(&gpu.adapter);
        anyhow::ensure!(
            caps.formats.contains(&self.framebuffer.color_format),
            "recreated surface no longer supports {:?}",
            self.framebuffer.color_format
        );

        let size = self.window.inner_size();
        self.config.width = size.width.max(1);
        self.config.height = size.height.max(1);
        surface.configure(&gpu.device, &self.config);

        self.surface = Some(surface);
        self.area.invalidate();
        log::info!("surface recreated");
        Ok(())
    }

    /// Releases device, surface and instance, in that order.
    ///
    /// Parts already released are skipped.
    pub fn shutdown(&mut self) {
        self.depth = None;
        if self.gpu.take().is_some() {
            log::debug!("GPU device released");
        }
        if self.surface.take().is_some() {
            log::debug!("surface released");
        }
        if self.instance.take().is_some() {
            log::debug!("instance released");
        }
    }

    pub fn has_surface(&self) -> bool {
        self.surface.is_some()
    }

    /// Returns the logical device, or an error after shutdown.
    pub fn device(&self) -> Result<&wgpu::Device> {
        Ok(&self.gpu()?.device)
    }

    /// Returns the command queue, or an error after shutdown.
    pub fn queue(&self) -> Result<&wgpu::Queue> {
        Ok(&self.gpu()?.queue)
    }

    pub fn framebuffer(&self) -> FramebufferConfig {
        self.framebuffer
    }

    pub fn area(&self) -> &RenderArea {
        &self.area
    }

    /// Returns whether the projection must be rebuilt, clearing the flag.
    pub fn take_projection_dirty(&mut self) -> bool {
        self.area.take_projection_dirty()
    }

    fn gpu(&self) -> Result<&GpuDevice> {
        self.gpu
            .as_ref()
            .ok_or_else(|| anyhow!("GPU context used after shutdown"))
    }
}

impl Drop for RenderContext {
    fn drop(&mut self) {
        self.shutdown();
    }
}
