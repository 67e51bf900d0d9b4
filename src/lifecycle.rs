use eframe::egui::ViewportId;
use image::RgbaImage;
use std::collections::HashSet;

/// What a window reports back after drawing a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WindowStatus {
    Open,
    Closed,
}

/// Requests windows send to the application root.
pub enum AppRequest {
    StartCapture,
    ShowPreview(RgbaImage),
    Quit,
}

/// Set of open windows. Calls `on_empty` each time the last one goes away.
pub struct WindowSet {
    open: HashSet<ViewportId>,
    on_empty: Box<dyn FnMut()>,
}

impl WindowSet {
    pub fn new(on_empty: impl FnMut() + 'static) -> Self {
        Self {
            open: HashSet::new(),
            on_empty: Box::new(on_empty),
        }
    }

    pub fn register(&mut self, id: ViewportId) {
        if self.open.insert(id) {
            log::debug!("Registered window {:?} ({} open)", id, self.open.len());
        }
    }

    /// Unknown ids are ignored, so a window closed twice fires the hook once.
    pub fn unregister(&mut self, id: ViewportId) {
        if !self.open.remove(&id) {
            return;
        }
        log::debug!("Unregistered window {:?} ({} open)", id, self.open.len());
        if self.open.is_empty() {
            (self.on_empty)();
        }
    }

    pub fn contains(&self, id: ViewportId) -> bool {
        self.open.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.open.len()
    }
}
