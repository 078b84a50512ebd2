use egui::{Color32, Context, Pos2, Rect, TextureHandle, TextureOptions};

use crate::controller::{FrameStats, OverlayLayout, PixelRect};
use crate::model::{SkinDrawable, SkinImage, TouchpadSkin};

/// egui textures for the touchpad drawables
pub struct SkinTextures {
    pub background: TextureHandle,
    pub knob: TextureHandle,
}

impl SkinTextures {
    pub fn upload(ctx: &Context, skin: &TouchpadSkin) -> Self {
        let load = |drawable: SkinDrawable| {
            ctx.load_texture(drawable.name(), color_image(skin.get(drawable)), TextureOptions::LINEAR)
        };
        Self {
            background: load(SkinDrawable::Background),
            knob: load(SkinDrawable::Knob),
        }
    }
}

/// Texture changes egui has emitted that the renderer has not applied yet.
/// Deltas from frames that never reached the GPU are merged into the next one.
#[derive(Default)]
pub struct PendingTextures {
    delta: egui::TexturesDelta,
}

impl PendingTextures {
    pub fn push(&mut self, delta: egui::TexturesDelta) {
        self.delta.append(delta);
    }

    pub fn take(&mut self) -> egui::TexturesDelta {
        std::mem::take(&mut self.delta)
    }

    pub fn is_empty(&self) -> bool {
        self.delta.is_empty()
    }
}

/// Input for a canvas of `width` x `height` physical pixels at the given device pixel ratio
pub fn canvas_input(width: u32, height: u32, pixels_per_point: f32) -> egui::RawInput {
    let ppp = if pixels_per_point > 0.0 { pixels_per_point } else { 1.0 };
    let mut raw_input = egui::RawInput {
        screen_rect: Some(Rect::from_min_size(
            Pos2::ZERO,
            egui::vec2(width as f32 / ppp, height as f32 / ppp),
        )),
        ..Default::default()
    };
    raw_input
        .viewports
        .entry(egui::ViewportId::ROOT)
        .or_default()
        .native_pixels_per_point = Some(ppp);
    raw_input
}

fn color_image(img: &SkinImage) -> egui::ColorImage {
    egui::ColorImage::from_rgba_unmultiplied([img.width as usize, img.height as usize], &img.rgba)
}

/// Build the complete UI and return egui output
pub fn build_ui(
    egui_ctx: &Context,
    raw_input: egui::RawInput,
    overlay: &OverlayLayout,
    textures: &SkinTextures,
    stats: &FrameStats,
    show_debug: bool,
) -> egui::FullOutput {
    egui_ctx.run(raw_input, |ctx| {
        draw_touchpad(ctx, overlay, textures);
        if show_debug {
            draw_debug_window(ctx, stats);
        }
    })
}

fn draw_touchpad(ctx: &Context, overlay: &OverlayLayout, textures: &SkinTextures) {
    let painter = ctx.layer_painter(egui::LayerId::new(egui::Order::Background, egui::Id::new("touchpad")));
    let ppp = ctx.pixels_per_point();
    let uv = Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0));

    // background first, knob on top
    if let Some(rect) = overlay.background {
        painter.image(textures.background.id(), to_points(rect, ppp), uv, Color32::WHITE);
    }
    if let Some(rect) = overlay.knob {
        painter.image(textures.knob.id(), to_points(rect, ppp), uv, Color32::WHITE);
    }
}

fn to_points(rect: PixelRect, pixels_per_point: f32) -> Rect {
    Rect::from_min_max(
        Pos2::new(rect.min.x / pixels_per_point, rect.min.y / pixels_per_point),
        Pos2::new(rect.max.x / pixels_per_point, rect.max.y / pixels_per_point),
    )
}

fn draw_debug_window(ctx: &Context, stats: &FrameStats) {
    let pos = stats.position;
    egui::Window::new("Debug")
        .default_pos([8.0, 8.0])
        .default_size([140.0, 80.0])
        .show(ctx, |ui| {
            ui.label(egui::RichText::new(format!("FPS: {:.0}", stats.fps)).small());
            ui.label(egui::RichText::new(format!("Pos: {:.2}, {:.2}, {:.2}", pos.x, pos.y, pos.z)).small());
            ui.label(egui::RichText::new(format!("Knob: {:.2}, {:.2}", stats.input.x, stats.input.y)).small());
            ui.separator();
            ui.label(egui::RichText::new("F3 - Toggle debug").small());
        });
}
