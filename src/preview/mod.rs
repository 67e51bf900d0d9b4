pub mod annotation;
pub mod save;
pub mod view;
pub mod window;

pub use window::PreviewWindow;
