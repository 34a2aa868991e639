pub mod emitter;
pub mod qr;

pub use emitter::{emit, render_to_bytes};
pub use qr::qr_png;
