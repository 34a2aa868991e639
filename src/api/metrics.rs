use once_cell::sync::Lazy;
use prometheus::{register_int_counter, IntCounter};

pub static INVOICES_GENERATED: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "invoices_generated_total",
        "Invoices rendered and delivered successfully"
    )
    .expect("metric registration")
});

pub static INVOICES_FAILED: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "invoices_failed_total",
        "Invoice requests that ended in an error response"
    )
    .expect("metric registration")
});

pub static WEBHOOKS_SKIPPED: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "webhooks_skipped_total",
        "Webhook deliveries skipped by status or idempotency checks"
    )
    .expect("metric registration")
});
