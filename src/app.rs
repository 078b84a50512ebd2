use glam::Vec2;

use crate::config::DemoConfig;
use crate::controller::{FrameLoop, InputEvent};
use crate::model::{Environment, SceneGeometry, TouchpadSkin};
use crate::ui::{self, PendingTextures, SkinTextures};
use crate::view::{GpuContext, RenderState, UiFrame};

/// Owns the GPU context, the frame loop and everything drawn with them.
/// Shared by the native and web entry points.
pub struct DemoApp {
    pub gpu: GpuContext,
    pub frame_loop: FrameLoop,
    render: RenderState,
    egui_ctx: egui::Context,
    skin_textures: SkinTextures,
    pending_textures: PendingTextures,
    width: u32,
    height: u32,
}

impl DemoApp {
    pub fn init(gpu: GpuContext, config: &DemoConfig, skin: &TouchpadSkin) -> Self {
        let width = gpu.config.width;
        let height = gpu.config.height;

        let knob_size = Vec2::new(skin.knob.width as f32, skin.knob.height as f32);
        let frame_loop = FrameLoop::new(config, width, height, knob_size);

        let render = RenderState::new(
            gpu.device.as_ref(),
            gpu.format,
            &SceneGeometry::from_config(config),
            &Environment::from_config(config),
            config.clear_color,
            width,
            height,
        );

        let egui_ctx = egui::Context::default();
        let skin_textures = SkinTextures::upload(&egui_ctx, skin);

        tracing::info!("demo initialized at {}x{}", width, height);

        Self {
            gpu,
            frame_loop,
            render,
            egui_ctx,
            skin_textures,
            pending_textures: PendingTextures::default(),
            width,
            height,
        }
    }

    pub fn egui_ctx(&self) -> &egui::Context {
        &self.egui_ctx
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Apply a window resize. Zero sizes update the viewports but leave the
    /// surface and depth buffer at their last valid size.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.frame_loop.resize(width, height);
        self.gpu.resize(width, height);
        self.render.resize(self.gpu.device.as_ref(), width, height);
    }

    pub fn handle_event(&mut self, event: &InputEvent) -> bool {
        self.frame_loop.handle_event(event)
    }

    pub fn toggle_debug(&mut self) {
        self.frame_loop.show_debug = !self.frame_loop.show_debug;
        tracing::debug!("debug overlay {}", if self.frame_loop.show_debug { "on" } else { "off" });
    }

    /// Run one frame: simulate, build the overlay and draw both passes.
    pub fn tick(&mut self, dt: f32, mut raw_input: egui::RawInput) -> Result<egui::PlatformOutput, wgpu::SurfaceError> {
        let snapshot = self.frame_loop.advance(dt);

        if self.width == 0 || self.height == 0 {
            return Ok(egui::PlatformOutput::default());
        }

        raw_input.time = Some(snapshot.ui_time);
        let full_output = ui::build_ui(
            &self.egui_ctx,
            raw_input,
            &snapshot.overlay,
            &self.skin_textures,
            &snapshot.stats,
            self.frame_loop.show_debug,
        );

        // egui emits each texture upload once; queued until a frame consumes it
        self.pending_textures.push(full_output.textures_delta);

        let pixels_per_point = full_output.pixels_per_point;
        let primitives = self.egui_ctx.tessellate(full_output.shapes, pixels_per_point);

        self.render.draw_frame(
            self.gpu.device.as_ref(),
            self.gpu.queue.as_ref(),
            &self.gpu.surface,
            &snapshot,
            UiFrame { primitives, pixels_per_point },
            &mut self.pending_textures,
        )?;

        Ok(full_output.platform_output)
    }

    /// Release GPU resources. Dropping the app has the same effect.
    pub fn shutdown(self) {
        tracing::info!("shutting down");
        drop(self);
    }
}
