pub mod selector;
pub mod window;

pub use window::SelectorWindow;
