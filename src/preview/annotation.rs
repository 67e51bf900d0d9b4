//! Freehand annotation drawn destructively into a working copy of the capture.

use eframe::egui::Pos2;
use image::{Rgba, RgbaImage};

use super::view::ViewState;
use crate::config::AppConfig;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pen {
    pub color: Rgba<u8>,
    pub width: f32,
}

impl Pen {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            color: Rgba(config.stroke_color),
            width: config.stroke_width.max(1.0),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StrokeState {
    Idle,
    /// `last` is in image coordinates.
    Stroking { last: Pos2 },
}

pub struct Annotator {
    base: RgbaImage,
    annotated: RgbaImage,
    stroke: StrokeState,
    pen: Pen,
}

impl Annotator {
    pub fn new(capture: RgbaImage, pen: Pen) -> Self {
        Self {
            annotated: capture.clone(),
            base: capture,
            stroke: StrokeState::Idle,
            pen,
        }
    }

    /// The annotated working copy, at capture resolution.
    pub fn image(&self) -> &RgbaImage {
        &self.annotated
    }

    pub fn is_modified(&self) -> bool {
        self.annotated != self.base
    }

    pub fn stroke(&self) -> StrokeState {
        self.stroke
    }

    pub fn begin_stroke(&mut self, display: Pos2, view: &ViewState) {
        self.stroke = StrokeState::Stroking {
            last: view.to_image(display),
        };
    }

    /// Draws one segment from the last point. Returns whether pixels changed.
    pub fn continue_stroke(&mut self, display: Pos2, view: &ViewState) -> bool {
        let StrokeState::Stroking { last } = self.stroke else {
            return false;
        };
        let current = view.to_image(display);
        if current == last {
            return false;
        }
        draw_segment(&mut self.annotated, last, current, self.pen);
        self.stroke = StrokeState::Stroking { last: current };
        true
    }

    pub fn end_stroke(&mut self) {
        self.stroke = StrokeState::Idle;
    }
}

/// Stamps round dabs of the pen along `from -> to`, clipped to the image.
pub fn draw_segment(image: &mut RgbaImage, from: Pos2, to: Pos2, pen: Pen) {
    let delta = to - from;
    let steps = (delta.length() * 2.0).ceil().max(1.0) as u32;
    for i in 0..=steps {
        let t = i as f32 / steps as f32;
        stamp(image, from + delta * t, pen);
    }
}

fn stamp(image: &mut RgbaImage, center: Pos2, pen: Pen) {
    let radius = pen.width / 2.0;
    let (w, h) = (image.width() as i64, image.height() as i64);
    let x0 = (center.x - radius).floor() as i64;
    let x1 = (center.x + radius).ceil() as i64;
    let y0 = (center.y - radius).floor() as i64;
    let y1 = (center.y + radius).ceil() as i64;
    let (cx, cy) = (center.x.floor() as i64, center.y.floor() as i64);

    for py in y0..=y1 {
        for px in x0..=x1 {
            if px < 0 || py < 0 || px >= w || py >= h {
                continue;
            }
            let dx = px as f32 + 0.5 - center.x;
            let dy = py as f32 + 0.5 - center.y;
            // The pixel under the center is always covered so thin pens still draw.
            if dx * dx + dy * dy <= radius * radius || (px, py) == (cx, cy) {
                image.put_pixel(px as u32, py as u32, pen.color);
            }
        }
    }
}
