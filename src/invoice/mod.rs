//! Invoice pipeline: normalize the raw order, lay out one page of draw
//! instructions, emit through the PDF backend.

pub mod format;
pub mod normalize;
pub mod text;

pub use normalize::normalize;
