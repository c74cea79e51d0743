use std::sync::Arc;

use anyhow::{bail, Context, Result};
use glam::Mat4;
use winit::window::Window;

use crate::core::{App, AppControl, FrameCtx};
use crate::device::RenderContext;
use crate::figure::{Figure, CUBE};
use crate::input::InputQueue;
use crate::shader::{figure_program, Shader, ShaderTargets};
use crate::texture::TextureAsset;

use super::camera::{frame_transform, model_rotation};
use super::config::RendererConfig;
use super::gesture::{AnimationState, GestureTracker};

/// Everything that only exists once the GPU is up.
struct Scene {
    context: RenderContext,
    shader: Shader,
    figures: Vec<Figure>,
    projection: Mat4,
    view: Mat4,
}

enum RendererState {
    Uninitialized,
    Running(Box<Scene>),
}

/// Drives the scene: owns the render context, the figure shader and the
/// figures, and turns pointer drags into rotation.
pub struct Renderer {
    config: RendererConfig,
    state: RendererState,
    animation: AnimationState,
    gestures: GestureTracker,
}

impl Renderer {
    pub fn new(config: RendererConfig) -> Self {
        Self {
            config,
            state: RendererState::Uninitialized,
            animation: AnimationState::default(),
            gestures: GestureTracker::new(),
        }
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, RendererState::Running(_))
    }

    pub fn rotation_speed(&self) -> f32 {
        self.animation.rotation_speed
    }

    /// Brings up the context, compiles the figure shader, loads the texture
    /// and builds the cube figure.
    ///
    /// On error the renderer stays uninitialized and anything already
    /// created is released.
    pub fn init_renderer(&mut self, window: Arc<Window>) -> Result<()> {
        if self.is_running() {
            bail!("renderer already initialized");
        }

        let context = pollster::block_on(RenderContext::initialize(window, self.config.gpu.clone()))
            .context("failed to initialize render context")?;

        let framebuffer = context.framebuffer();
        let device = context.device()?;
        let queue = context.queue()?;

        let targets = ShaderTargets {
            color_format: framebuffer.color_format,
            depth_format: framebuffer.depth_format,
        };
        let shader = Shader::compile(device, &figure_program(), targets)
            .context("failed to build figure shader")?;

        let texture = TextureAsset::load_asset(
            device,
            queue,
            &self.config.assets,
            &self.config.texture_name,
        )?;
        let cube = Figure::new(device, &shader, texture, &CUBE).context("invalid cube geometry")?;

        log::info!(
            "renderer initialized ({:?} color, {:?} depth)",
            framebuffer.color_format,
            framebuffer.depth_format
        );

        let view = self.config.camera.view();
        self.state = RendererState::Running(Box::new(Scene {
            context,
            shader,
            figures: vec![cube],
            projection: Mat4::IDENTITY,
            view,
        }));
        Ok(())
    }

    /// Applies queued pointer events to the animation state, then empties
    /// the queue.
    pub fn handle_input(&mut self, queue: &mut InputQueue) {
        for ev in queue.events() {
            self.gestures.apply(ev, &mut self.animation);
        }
        queue.clear();
    }

    /// Renders one frame.
    ///
    /// Frames are skipped (not errors) while the surface is suspended, the
    /// area is empty, or the surface was just reconfigured.
    pub fn render(&mut self) -> Result<()> {
        let RendererState::Running(scene) = &mut self.state else {
            bail!("render called before the renderer was initialized");
        };
        if !scene.context.has_surface() {
            return Ok(());
        }

        scene.context.update_render_area()?;
        let Some(aspect) = scene.context.area().aspect_ratio() else {
            return Ok(());
        };
        if scene.context.take_projection_dirty() {
            scene.projection = self.config.camera.projection(aspect);
        }

        let Some(mut frame) = scene.context.begin_frame()? else {
            return Ok(());
        };

        {
            let mut pass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("tumble figure pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &frame.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.config.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &frame.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });
            scene.context.area().viewport().apply(&mut pass);

            let queue = scene.context.queue()?;
            let mut active = scene.shader.activate(&mut pass);
            for figure in &scene.figures {
                let model = model_rotation(
                    self.animation.rotation_speed,
                    self.config.rotation_multiplier,
                );
                let transform = frame_transform(scene.projection, scene.view, model);
                active.draw(queue, figure, &transform);
            }
            active.deactivate();
        }

        scene.context.present(frame)
    }

    /// Releases the surface while the platform has no window to draw into.
    pub fn suspend(&mut self) {
        if let RendererState::Running(scene) = &mut self.state {
            scene.context.suspend_surface();
        }
    }

    pub fn resume(&mut self) -> Result<()> {
        match &mut self.state {
            RendererState::Running(scene) => scene.context.resume_surface(),
            RendererState::Uninitialized => Ok(()),
        }
    }

    /// Drops figures and shader, then tears the context down. No-op when
    /// uninitialized.
    pub fn shutdown(&mut self) {
        let RendererState::Running(scene) =
            std::mem::replace(&mut self.state, RendererState::Uninitialized)
        else {
            return;
        };

        let Scene {
            mut context,
            shader,
            figures,
            ..
        } = *scene;
        drop(figures);
        drop(shader);
        context.shutdown();
        log::info!("renderer shut down");
    }
}

impl App for Renderer {
    fn init(&mut self, window: Arc<Window>) -> Result<()> {
        self.init_renderer(window)
    }

    fn resumed(&mut self) -> Result<()> {
        self.resume()
    }

    fn suspended(&mut self) {
        self.suspend();
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_>) -> Result<AppControl> {
        self.handle_input(ctx.input);
        self.render()?;
        Ok(AppControl::Continue)
    }

    fn shutdown(&mut self) {
        Renderer::shutdown(self);
    }
}
