use eframe::egui::{pos2, Pos2};
use image::imageops::{self, FilterType};
use image::RgbaImage;

pub const ZOOM_STEP: f32 = 1.25;
pub const MIN_SCALE: f32 = 0.2;
pub const MAX_SCALE: f32 = 5.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewState {
    scale: f32,
}

impl Default for ViewState {
    fn default() -> Self {
        Self { scale: 1.0 }
    }
}

impl ViewState {
    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn set_zoom(&mut self, scale: f32) {
        self.scale = scale.clamp(MIN_SCALE, MAX_SCALE);
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom(self.scale * ZOOM_STEP);
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom(self.scale / ZOOM_STEP);
    }

    /// Size of the resampled image, never below 1x1.
    pub fn display_size(&self, width: u32, height: u32) -> [u32; 2] {
        let scaled = |v: u32| ((v as f32 * self.scale) as u32).max(1);
        [scaled(width), scaled(height)]
    }

    /// Maps a point on the displayed image back into image pixels.
    pub fn to_image(&self, display: Pos2) -> Pos2 {
        pos2(display.x / self.scale, display.y / self.scale)
    }

    pub fn render(&self, image: &RgbaImage) -> RgbaImage {
        let [width, height] = self.display_size(image.width(), image.height());
        if (width, height) == image.dimensions() {
            return image.clone();
        }
        imageops::resize(image, width, height, FilterType::Triangle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn zoom_round_trip_restores_scale() {
        let mut view = ViewState::default();
        view.set_zoom(1.7);
        view.zoom_in();
        view.zoom_out();
        assert!((view.scale() - 1.7).abs() < 1e-5);
    }

    #[test]
    fn zoom_clamps_at_bounds() {
        let mut view = ViewState::default();
        view.set_zoom(5.0);
        view.zoom_in();
        assert_eq!(view.scale(), MAX_SCALE);

        view.set_zoom(0.2);
        view.zoom_out();
        assert_eq!(view.scale(), MIN_SCALE);

        view.set_zoom(100.0);
        assert_eq!(view.scale(), MAX_SCALE);
    }

    #[test]
    fn display_size_never_collapses() {
        let mut view = ViewState::default();
        view.set_zoom(MIN_SCALE);
        assert_eq!(view.display_size(3, 100), [1, 20]);
    }

    #[test]
    fn render_is_idempotent() {
        let mut image = RgbaImage::from_pixel(40, 30, Rgba([20, 40, 60, 255]));
        image.put_pixel(5, 5, Rgba([255, 0, 0, 255]));
        let mut view = ViewState::default();
        view.zoom_in();

        let first = view.render(&image);
        let second = view.render(&image);
        assert_eq!(first.dimensions(), (50, 37));
        assert_eq!(first.as_raw(), second.as_raw());
    }

    #[test]
    fn render_does_not_touch_source() {
        let image = RgbaImage::from_pixel(10, 10, Rgba([1, 2, 3, 255]));
        let before = image.clone();
        let mut view = ViewState::default();
        view.set_zoom(2.0);
        let shown = view.render(&image);
        assert_eq!(shown.dimensions(), (20, 20));
        assert_eq!(image, before);
    }
}
