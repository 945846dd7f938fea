use eframe::egui;

use crate::renderer::frame_store::FrameStore;

/// Draws the engine's newest frame, letter-boxed into the available space.
pub struct VideoPlayer {
    frames: FrameStore,
    texture: Option<egui::TextureHandle>,
}

impl VideoPlayer {
    pub fn new(frames: FrameStore) -> Self {
        Self {
            frames,
            texture: None,
        }
    }

    /// Upload the newest frame, if one arrived since the last call.
    pub fn update_texture(&mut self, ctx: &egui::Context) {
        let Some(frame) = self.frames.take() else {
            return;
        };
        let image = egui::ColorImage::from_rgba_unmultiplied(
            [frame.width as usize, frame.height as usize],
            &frame.data,
        );
        match &mut self.texture {
            Some(texture) => texture.set(image, egui::TextureOptions::LINEAR),
            None => {
                self.texture =
                    Some(ctx.load_texture("video_frame", image, egui::TextureOptions::LINEAR));
            }
        }
    }

    pub fn clear(&mut self) {
        self.frames.clear();
        self.texture = None;
    }

    pub fn show(&self, ui: &mut egui::Ui) {
        let area = ui.max_rect();
        if let Some(texture) = &self.texture {
            let size = letterbox(texture.size_vec2(), area.size());
            let target = egui::Rect::from_center_size(area.center(), size);
            ui.put(target, egui::Image::new((texture.id(), size)));
        }
    }
}

/// Largest size with the frame's aspect ratio that fits inside `area`.
pub fn letterbox(frame: egui::Vec2, area: egui::Vec2) -> egui::Vec2 {
    if frame.x <= 0.0 || frame.y <= 0.0 {
        return egui::Vec2::ZERO;
    }
    let scale = (area.x / frame.x).min(area.y / frame.y).max(0.0);
    frame * scale
}
