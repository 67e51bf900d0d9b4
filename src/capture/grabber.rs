use image::RgbaImage;
use screenshots::Screen;

use super::region::{ScreenPoint, ScreenRegion};

#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("No screen found at ({x}, {y})")]
    NoScreen { x: i32, y: i32 },

    #[error("Screen capture failed: {0}")]
    Capture(String),
}

/// Grabs the current contents of `region` from the screen holding its
/// top-left corner.
pub fn capture_region(region: &ScreenRegion) -> Result<RgbaImage, CaptureError> {
    let screen = Screen::from_point(region.left, region.top).map_err(|_| CaptureError::NoScreen {
        x: region.left,
        y: region.top,
    })?;
    let info = &screen.display_info;
    let local = region.relative_to(ScreenPoint::new(info.x, info.y));

    log::debug!(
        "Grabbing {}x{} at ({}, {}) on display {}",
        local.width(),
        local.height(),
        local.left,
        local.top,
        info.id
    );

    screen
        .capture_area(
            local.left,
            local.top,
            local.width() as u32,
            local.height() as u32,
        )
        .map_err(|e| CaptureError::Capture(e.to_string()))
}
