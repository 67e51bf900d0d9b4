/// Selections narrower or shorter than this are treated as a cancel.
pub const MIN_SELECTION_SIZE: i32 = 2;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScreenPoint {
    pub x: i32,
    pub y: i32,
}

impl ScreenPoint {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Rectangle in screen coordinates with `left <= right` and `top <= bottom`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScreenRegion {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl ScreenRegion {
    /// Bounding box of two corners, in any drag direction.
    ///
    /// Returns `None` when the box is smaller than [`MIN_SELECTION_SIZE`]
    /// in either dimension.
    pub fn from_corners(a: ScreenPoint, b: ScreenPoint) -> Option<Self> {
        let region = Self {
            left: a.x.min(b.x),
            top: a.y.min(b.y),
            right: a.x.max(b.x),
            bottom: a.y.max(b.y),
        };
        if region.width() < MIN_SELECTION_SIZE || region.height() < MIN_SELECTION_SIZE {
            return None;
        }
        Some(region)
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    /// Same region expressed relative to an origin (e.g. a monitor's top-left).
    pub fn relative_to(&self, origin: ScreenPoint) -> Self {
        Self {
            left: self.left - origin.x,
            top: self.top - origin.y,
            right: self.right - origin.x,
            bottom: self.bottom - origin.y,
        }
    }
}
