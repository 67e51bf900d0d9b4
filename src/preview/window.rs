use crossbeam_channel::Sender;
use eframe::egui;
use image::RgbaImage;

use super::annotation::{Annotator, Pen, StrokeState};
use super::save::{prompt_save_path, save_image};
use super::view::ViewState;
use crate::config::AppConfig;
use crate::lifecycle::{AppRequest, WindowStatus};

const MIN_WIDTH: f32 = 140.0;
const MIN_HEIGHT: f32 = 90.0;
const BUTTON_PADDING: f32 = 24.0;
const BUTTON_MARGIN: f32 = 10.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Action {
    Save,
    ZoomIn,
    ZoomOut,
    CaptureAgain,
}

/// Shows one capture and lets the user annotate, zoom and save it.
pub struct PreviewWindow {
    id: egui::ViewportId,
    annotator: Annotator,
    view: ViewState,
    texture: Option<egui::TextureHandle>,
    dirty: bool,
    min_size: egui::Vec2,
    default_extension: String,
    requests: Sender<AppRequest>,
}

impl PreviewWindow {
    pub fn new(
        id: egui::ViewportId,
        capture: RgbaImage,
        config: &AppConfig,
        requests: Sender<AppRequest>,
    ) -> Self {
        Self {
            id,
            annotator: Annotator::new(capture, Pen::from_config(config)),
            view: ViewState::default(),
            texture: None,
            dirty: true,
            min_size: egui::vec2(MIN_WIDTH, MIN_HEIGHT),
            default_extension: config.default_extension.clone(),
            requests,
        }
    }

    pub fn id(&self) -> egui::ViewportId {
        self.id
    }

    fn display_size(&self) -> egui::Vec2 {
        let image = self.annotator.image();
        let [w, h] = self.view.display_size(image.width(), image.height());
        egui::vec2(w as f32, h as f32)
    }

    fn window_size(&self) -> egui::Vec2 {
        self.display_size().max(self.min_size)
    }

    fn title(&self) -> String {
        let marker = if self.annotator.is_modified() { "*" } else { "" };
        format!(
            "{}Screenshot Preview ({:.0}%)",
            marker,
            self.view.scale() * 100.0
        )
    }

    pub fn show(&mut self, ctx: &egui::Context) -> WindowStatus {
        let builder = egui::ViewportBuilder::default()
            .with_title(self.title())
            .with_inner_size(self.window_size())
            .with_resizable(false);

        ctx.show_viewport_immediate(self.id, builder, |ctx, _class| self.ui(ctx))
    }

    fn ui(&mut self, ctx: &egui::Context) -> WindowStatus {
        if ctx.input(|i| i.viewport().close_requested()) {
            return WindowStatus::Closed;
        }

        let mut actions = self.shortcuts(ctx);
        self.render(ctx);

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                let image_rect = egui::Rect::from_min_size(ui.max_rect().min, self.display_size());
                if let Some(texture) = &self.texture {
                    ui.painter().image(
                        texture.id(),
                        image_rect,
                        egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                        egui::Color32::WHITE,
                    );
                }

                let response =
                    ui.interact(ui.max_rect(), egui::Id::new("preview_canvas"), egui::Sense::click());
                self.annotate(ctx, &response, image_rect.min);

                response.context_menu(|ui| {
                    if ui.button("Save image").clicked() {
                        actions.push(Action::Save);
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Zoom in").clicked() {
                        actions.push(Action::ZoomIn);
                        ui.close_menu();
                    }
                    if ui.button("Zoom out").clicked() {
                        actions.push(Action::ZoomOut);
                        ui.close_menu();
                    }
                });
            });

        let button = egui::Area::new(egui::Id::new("capture_again"))
            .anchor(
                egui::Align2::RIGHT_BOTTOM,
                egui::vec2(-BUTTON_MARGIN, -BUTTON_MARGIN),
            )
            .show(ctx, |ui| ui.button("Capture again"))
            .inner;
        if button.clicked() {
            actions.push(Action::CaptureAgain);
        }
        self.min_size = egui::vec2(
            MIN_WIDTH.max(button.rect.width() + BUTTON_PADDING),
            MIN_HEIGHT.max(button.rect.height() + BUTTON_PADDING),
        );

        for action in actions {
            self.apply(action);
        }
        if self.dirty {
            ctx.request_repaint();
        }
        WindowStatus::Open
    }

    fn shortcuts(&self, ctx: &egui::Context) -> Vec<Action> {
        ctx.input_mut(|i| {
            let mut actions = Vec::new();
            if i.consume_key(egui::Modifiers::COMMAND, egui::Key::S) {
                actions.push(Action::Save);
            }
            if i.consume_key(egui::Modifiers::COMMAND, egui::Key::Plus)
                || i.consume_key(egui::Modifiers::COMMAND, egui::Key::Equals)
            {
                actions.push(Action::ZoomIn);
            }
            if i.consume_key(egui::Modifiers::COMMAND, egui::Key::Minus) {
                actions.push(Action::ZoomOut);
            }
            actions
        })
    }

    /// Ctrl + primary drag draws; release ends the stroke.
    fn annotate(&mut self, ctx: &egui::Context, canvas: &egui::Response, origin: egui::Pos2) {
        let (pressed, down, released, ctrl, pos) = ctx.input(|i| {
            (
                i.pointer.primary_pressed(),
                i.pointer.primary_down(),
                i.pointer.primary_released(),
                i.modifiers.command,
                i.pointer.latest_pos(),
            )
        });
        let Some(pos) = pos else {
            return;
        };
        let display = (pos - origin).to_pos2();

        if pressed && ctrl && canvas.hovered() {
            self.annotator.begin_stroke(display, &self.view);
        } else if (down || released) && ctrl && self.annotator.stroke() != StrokeState::Idle {
            // Motion delivered with the release still ends at the release point.
            if self.annotator.continue_stroke(display, &self.view) {
                self.dirty = true;
            }
        }
        if released {
            self.annotator.end_stroke();
        }
    }

    /// Uploads the resampled image if scale or pixels changed since the last frame.
    fn render(&mut self, ctx: &egui::Context) {
        if !self.dirty && self.texture.is_some() {
            return;
        }
        let shown = self.view.render(self.annotator.image());
        let color_image = egui::ColorImage::from_rgba_unmultiplied(
            [shown.width() as usize, shown.height() as usize],
            shown.as_raw(),
        );
        match &mut self.texture {
            Some(texture) => texture.set(color_image, egui::TextureOptions::NEAREST),
            None => {
                self.texture = Some(ctx.load_texture(
                    "preview_capture",
                    color_image,
                    egui::TextureOptions::NEAREST,
                ));
            }
        }
        self.dirty = false;
    }

    fn apply(&mut self, action: Action) {
        match action {
            Action::Save => self.save(),
            Action::ZoomIn => {
                self.view.zoom_in();
                self.dirty = true;
                log::debug!("Zoom {:.2}", self.view.scale());
            }
            Action::ZoomOut => {
                self.view.zoom_out();
                self.dirty = true;
                log::debug!("Zoom {:.2}", self.view.scale());
            }
            Action::CaptureAgain => {
                let _ = self.requests.send(AppRequest::StartCapture);
            }
        }
    }

    fn save(&self) {
        let Some(path) = prompt_save_path(&self.default_extension) else {
            return;
        };
        match save_image(self.annotator.image(), &path) {
            Ok(()) => log::info!("Saved {}", path.display()),
            Err(e) => log::error!("{:#}", e),
        }
    }
}
