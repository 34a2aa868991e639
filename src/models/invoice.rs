use chrono::{DateTime, Utc};
use serde::Serialize;

/// One normalized product line. `line_total` is always `quantity * unit_price`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineItem {
    pub name: String,
    pub notes: Option<String>,
    pub quantity: f64,
    pub unit_price: f64,
    pub line_total: f64,
}

/// The canonical, default-filled representation of an order.
///
/// Built exactly once per request by the normalizer and never mutated
/// afterwards; the layout engine reads it, the emitter never sees it.
/// All monetary fields are non-negative except `grand_total`, which may go
/// negative when a discount exceeds the subtotal (pass-through, not clamped).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CanonicalInvoice {
    pub id: String,
    /// Human-facing order number; falls back to `id`.
    pub display_number: String,
    pub customer_name: String,
    pub phone: String,
    pub address: String,
    pub issued_at: DateTime<Utc>,
    pub payment_method: String,
    pub line_items: Vec<LineItem>,
    pub subtotal: f64,
    pub delivery_fee: f64,
    pub discount: f64,
    pub tax_percent: f64,
    pub tax_amount: f64,
    pub grand_total: f64,
    pub notes: Option<String>,
}

impl CanonicalInvoice {
    /// Stable identifier string embedded in the QR code.
    pub fn qr_payload(&self) -> String {
        format!("order:{}", self.id)
    }
}
