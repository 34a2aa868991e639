pub mod invoice;
pub mod order;

pub use invoice::{CanonicalInvoice, LineItem};
pub use order::{OrderInput, WebhookEvent};
