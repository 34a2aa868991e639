pub mod api;
pub mod core;
pub mod invoice;
pub mod layout;
pub mod models;
pub mod pdf;
pub mod storage;

pub use crate::core::config::RenderConfig;
pub use invoice::normalize;
pub use layout::{layout, LayoutPreset};
pub use models::{CanonicalInvoice, OrderInput};
