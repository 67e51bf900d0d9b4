use crossbeam_channel::{unbounded, Receiver, Sender};
use eframe::egui;
use image::RgbaImage;
use std::time::Duration;

use crate::config::AppConfig;
use crate::lifecycle::{AppRequest, WindowSet, WindowStatus};
use crate::overlay::SelectorWindow;
use crate::preview::PreviewWindow;

/// Application root. Owns every window and decides when the process ends.
///
/// The root viewport is a 1x1 transparent stub; selectors and previews are
/// immediate viewports drawn from its `update`.
pub struct WindowManager {
    config: AppConfig,
    windows: WindowSet,
    selectors: Vec<SelectorWindow>,
    previews: Vec<PreviewWindow>,
    requests_tx: Sender<AppRequest>,
    requests_rx: Receiver<AppRequest>,
    next_window: u64,
}

impl WindowManager {
    pub fn new(config: AppConfig) -> Self {
        let (requests_tx, requests_rx) = unbounded();
        let quit_tx = requests_tx.clone();
        Self {
            config,
            windows: WindowSet::new(move || {
                let _ = quit_tx.send(AppRequest::Quit);
            }),
            selectors: Vec::new(),
            previews: Vec::new(),
            requests_tx,
            requests_rx,
            next_window: 0,
        }
    }

    fn next_id(&mut self, kind: &str) -> egui::ViewportId {
        self.next_window += 1;
        egui::ViewportId::from_hash_of((kind, self.next_window))
    }

    pub fn start_capture(&mut self) {
        let id = self.next_id("selector");
        let tx = self.requests_tx.clone();
        let on_capture = Box::new(move |image: RgbaImage| {
            let _ = tx.send(AppRequest::ShowPreview(image));
        });
        self.windows.register(id);
        self.selectors
            .push(SelectorWindow::new(id, &self.config, on_capture));
        log::info!("Selector opened ({} windows)", self.windows.len());
    }

    pub fn show_preview(&mut self, image: RgbaImage) {
        let id = self.next_id("preview");
        self.windows.register(id);
        self.previews.push(PreviewWindow::new(
            id,
            image,
            &self.config,
            self.requests_tx.clone(),
        ));
        log::info!("Preview opened ({} windows)", self.windows.len());
    }

    fn retire(&mut self, closed: &[egui::ViewportId]) {
        if closed.is_empty() {
            return;
        }
        self.selectors.retain(|s| !closed.contains(&s.id()));
        self.previews.retain(|p| !closed.contains(&p.id()));
        for &id in closed {
            self.windows.unregister(id);
        }
    }

    /// Opens requested windows. Returns `true` once the last window has closed.
    fn drain_requests(&mut self) -> bool {
        let mut quit = false;
        while let Ok(request) = self.requests_rx.try_recv() {
            match request {
                AppRequest::StartCapture => self.start_capture(),
                AppRequest::ShowPreview(image) => self.show_preview(image),
                AppRequest::Quit => quit = true,
            }
        }
        quit
    }
}

impl eframe::App for WindowManager {
    fn clear_color(&self, _visuals: &egui::Visuals) -> [f32; 4] {
        [0.0, 0.0, 0.0, 0.0]
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let mut closed = Vec::new();
        for selector in &mut self.selectors {
            // A selector torn down earlier must not run its pending capture.
            if !self.windows.contains(selector.id()) {
                continue;
            }
            if selector.show(ctx) == WindowStatus::Closed {
                closed.push(selector.id());
            }
        }
        for preview in &mut self.previews {
            if preview.show(ctx) == WindowStatus::Closed {
                closed.push(preview.id());
            }
        }

        // Open what this frame asked for before retiring closed windows, so a
        // selector handing its capture to a new preview never empties the set.
        self.drain_requests();
        self.retire(&closed);

        if self.drain_requests() {
            log::info!("Last window closed, exiting");
            ctx.send_viewport_cmd_to(egui::ViewportId::ROOT, egui::ViewportCommand::Close);
            return;
        }
        ctx.request_repaint_after(Duration::from_millis(16));
    }
}
