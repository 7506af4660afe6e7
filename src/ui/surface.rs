use crate::player::VideoFrame;
use egui::{ColorImage, Context, TextureHandle, TextureOptions, Ui, Vec2};

/// The rectangle the current video frame is drawn into.
#[derive(Default)]
pub struct VideoSurface {
    texture: Option<TextureHandle>,
    size: (u32, u32),
}

impl VideoSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the displayed frame.
    pub fn upload(&mut self, ctx: &Context, frame: VideoFrame) {
        let image = ColorImage::from_rgba_unmultiplied(
            [frame.width as usize, frame.height as usize],
            &frame.rgba,
        );
        self.size = (frame.width, frame.height);

        match self.texture {
            Some(ref mut texture) => texture.set(image, TextureOptions::LINEAR),
            None => {
                self.texture = Some(ctx.load_texture("video_frame", image, TextureOptions::LINEAR))
            }
        }
    }

    pub fn clear(&mut self) {
        self.texture = None;
        self.size = (0, 0);
    }

    pub fn has_frame(&self) -> bool {
        self.texture.is_some()
    }

    /// Draw the frame scaled to fit the available space.
    pub fn show(&self, ui: &mut Ui) {
        let Some(texture) = self.texture.as_ref() else {
            return;
        };
        let video = Vec2::new(self.size.0 as f32, self.size.1 as f32);
        let display_size = fit_size(video, ui.available_size());

        ui.centered_and_justified(|ui| {
            ui.image((texture.id(), display_size));
        });
    }
}

/// Largest size with the video's aspect ratio that fits in `available`.
fn fit_size(video: Vec2, available: Vec2) -> Vec2 {
    if video.x <= 0.0 || video.y <= 0.0 || available.x <= 0.0 || available.y <= 0.0 {
        return Vec2::ZERO;
    }

    let aspect = video.x / video.y;
    let available_aspect = available.x / available.y;

    if aspect > available_aspect {
        Vec2::new(available.x, available.x / aspect)
    } else {
        Vec2::new(available.y * aspect, available.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wide_video_fills_width() {
        let size = fit_size(Vec2::new(1920.0, 1080.0), Vec2::new(800.0, 800.0));
        assert_eq!(size.x, 800.0);
        assert!((size.y - 450.0).abs() < 1e-3);
    }

    #[test]
    fn tall_video_fills_height() {
        let size = fit_size(Vec2::new(1080.0, 1920.0), Vec2::new(800.0, 960.0));
        assert!((size.x - 540.0).abs() < 1e-3);
        assert_eq!(size.y, 960.0);
    }

    #[test]
    fn degenerate_sizes_collapse() {
        assert_eq!(fit_size(Vec2::ZERO, Vec2::new(100.0, 100.0)), Vec2::ZERO);
        assert_eq!(fit_size(Vec2::new(16.0, 9.0), Vec2::ZERO), Vec2::ZERO);
    }
}
