pub mod convert;
pub mod environment;
pub mod error;
pub mod format;
pub mod lazy;
pub mod render;
pub mod reuse;

pub use convert::convert;
pub use environment::Environment;
pub use error::RenderError;
pub use format::format_value;
pub use lazy::{DEFAULT_PLACEHOLDER, render_selected};
pub use render::render;
pub use reuse::{Binder, Formatter};
