pub mod grabber;
pub mod region;

pub use grabber::capture_region;
pub use region::{ScreenPoint, ScreenRegion};
