//! View rendering modules

mod picker;

pub use picker::render_picker;
