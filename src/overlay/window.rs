use eframe::egui;
use image::RgbaImage;
use std::time::{Duration, Instant};

use super::selector::{Effect, Selector, SelectorInput};
use crate::capture::{capture_region, ScreenPoint, ScreenRegion};
use crate::config::AppConfig;
use crate::lifecycle::WindowStatus;

/// Receives the captured bitmap once a selection completes.
pub type CaptureCallback = Box<dyn FnMut(RgbaImage)>;

/// Full-screen translucent surface driving a [`Selector`].
pub struct SelectorWindow {
    id: egui::ViewportId,
    selector: Selector,
    overlay_alpha: f32,
    hidden: bool,
    on_capture: CaptureCallback,
}

impl SelectorWindow {
    pub fn new(id: egui::ViewportId, config: &AppConfig, on_capture: CaptureCallback) -> Self {
        Self {
            id,
            selector: Selector::new(Duration::from_millis(config.capture_delay_ms)),
            overlay_alpha: config.overlay_alpha.clamp(0.0, 1.0),
            hidden: false,
            on_capture,
        }
    }

    pub fn id(&self) -> egui::ViewportId {
        self.id
    }

    /// Runs one frame. Only called while the window is registered, so a
    /// pending capture never fires for a surface that was already closed.
    pub fn show(&mut self, ctx: &egui::Context) -> WindowStatus {
        if let Some(due) = self.selector.capture_due() {
            let now = Instant::now();
            if let Effect::Capture(region) = self.selector.handle(SelectorInput::Tick(now), now) {
                return self.capture(region);
            }
            ctx.request_repaint_after(due.saturating_duration_since(now));
        }

        let builder = egui::ViewportBuilder::default()
            .with_title("Screenshot Selector")
            .with_transparent(true)
            .with_decorations(false)
            .with_always_on_top()
            .with_fullscreen(true)
            .with_visible(!self.hidden);

        ctx.show_viewport_immediate(self.id, builder, |ctx, _class| self.ui(ctx))
    }

    fn ui(&mut self, ctx: &egui::Context) -> WindowStatus {
        if ctx.input(|i| i.viewport().close_requested()) {
            self.selector.handle(SelectorInput::Cancel, Instant::now());
            return WindowStatus::Closed;
        }

        let mut status = WindowStatus::Open;
        for input in self.collect_inputs(ctx) {
            match self.selector.handle(input, Instant::now()) {
                Effect::Close => status = WindowStatus::Closed,
                Effect::Hide => {
                    self.hidden = true;
                    ctx.send_viewport_cmd(egui::ViewportCommand::Visible(false));
                    ctx.request_repaint();
                }
                Effect::Redraw => ctx.request_repaint(),
                Effect::Capture(_) | Effect::None => {}
            }
        }
        if status == WindowStatus::Closed {
            return status;
        }

        let fill = egui::Color32::from_black_alpha((self.overlay_alpha * 255.0).round() as u8);
        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(fill))
            .show(ctx, |ui| {
                ctx.set_cursor_icon(egui::CursorIcon::Crosshair);
                let painter = ui.painter();
                match self.selector.outline() {
                    Some(rect) => {
                        painter.rect_stroke(rect, 0.0, egui::Stroke::new(2.0, egui::Color32::RED));
                    }
                    None if !self.hidden => {
                        painter.text(
                            ui.max_rect().center(),
                            egui::Align2::CENTER_CENTER,
                            "Drag to capture, Esc to cancel",
                            egui::FontId::proportional(24.0),
                            egui::Color32::WHITE,
                        );
                    }
                    None => {}
                }
            });
        status
    }

    /// Translates this frame's raw pointer and key events into selector inputs.
    fn collect_inputs(&self, ctx: &egui::Context) -> Vec<SelectorInput> {
        ctx.input(|i| {
            let origin = i
                .viewport()
                .inner_rect
                .map(|r| r.min)
                .unwrap_or(egui::Pos2::ZERO);
            let to_screen = |local: egui::Pos2| {
                ScreenPoint::new(
                    (origin.x + local.x).round() as i32,
                    (origin.y + local.y).round() as i32,
                )
            };

            let mut inputs = Vec::new();
            if i.key_pressed(egui::Key::Escape)
                || i.pointer.button_pressed(egui::PointerButton::Secondary)
            {
                inputs.push(SelectorInput::Cancel);
                return inputs;
            }

            let latest = i.pointer.latest_pos();
            if i.pointer.primary_pressed() {
                if let Some(local) = i.pointer.press_origin().or(latest) {
                    inputs.push(SelectorInput::Press {
                        local,
                        screen: to_screen(local),
                    });
                }
            }
            if let Some(local) = latest {
                if i.pointer.primary_down() {
                    inputs.push(SelectorInput::Drag { local });
                }
                if i.pointer.primary_released() {
                    inputs.push(SelectorInput::Release {
                        screen: to_screen(local),
                    });
                }
            }
            inputs
        })
    }

    fn capture(&mut self, region: ScreenRegion) -> WindowStatus {
        match capture_region(&region) {
            Ok(image) => {
                log::info!(
                    "Captured {}x{} at ({}, {})",
                    image.width(),
                    image.height(),
                    region.left,
                    region.top
                );
                (self.on_capture)(image);
            }
            Err(e) => log::error!("Capture aborted: {}", e),
        }
        WindowStatus::Closed
    }
}
