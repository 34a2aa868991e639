//! Order normalization: heterogeneous order payload in, canonical invoice out.
//!
//! `normalize` is a total function. Every missing or malformed field resolves
//! to a documented default; nothing in here can fail or panic on untrusted
//! input. Field aliasing is expressed as ordered candidate-key lists so the
//! fallback chains live in one place instead of leaking into layout code.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde_json::Value;

use crate::models::{CanonicalInvoice, LineItem, OrderInput};

// Resolution order is a fixed contract: first present key wins.
const ID_KEYS: &[&str] = &["id"];
const ORDER_NUMBER_KEYS: &[&str] = &["order_number", "orderNumber"];
const CUSTOMER_KEYS: &[&str] = &["customer_name", "customer", "guest_customer_name"];
const PHONE_KEYS: &[&str] = &["phone", "guest_phone"];
const ADDRESS_KEYS: &[&str] = &["address", "full_address", "user_address"];
const DATE_KEYS: &[&str] = &["date", "created_at"];
const PAYMENT_KEYS: &[&str] = &["payment_method"];
const NOTES_KEYS: &[&str] = &["notes"];
const DELIVERY_KEYS: &[&str] = &["delivery_price", "delivery_fee"];
const DISCOUNT_KEYS: &[&str] = &["discount"];
const TAX_KEYS: &[&str] = &["vat_percent", "tax_percent"];
const TOTAL_OVERRIDE_KEYS: &[&str] = &["total_price", "total"];

const ITEM_NAME_KEYS: &[&str] = &["name"];
const ITEM_NOTES_KEYS: &[&str] = &["notes"];
const ITEM_QTY_KEYS: &[&str] = &["qty", "quantity"];
const ITEM_PRICE_KEYS: &[&str] = &["price", "unit_price"];

pub const DEFAULT_ID: &str = "-";
pub const DEFAULT_CUSTOMER_NAME: &str = "زبون التطبيق";
pub const DEFAULT_PHONE: &str = "-";
pub const DEFAULT_ADDRESS: &str = "بدون عنوان";
pub const DEFAULT_PAYMENT_METHOD: &str = "الدفع عند الاستلام";
pub const UNNAMED_ITEM: &str = "صنف بدون اسم";

/// Resolve the order id without normalizing the whole payload. The HTTP
/// layer rejects id-less orders before rendering; inside the pipeline a
/// missing id still renders as the dash placeholder.
pub fn order_id(raw: &OrderInput) -> Option<String> {
    raw.text(ID_KEYS)
}

/// Build the canonical invoice model from a raw order payload.
///
/// Deterministic for a given input except for the documented fallback to the
/// current time when the order carries no parsable timestamp.
pub fn normalize(raw: &OrderInput) -> CanonicalInvoice {
    let id = raw.text(ID_KEYS).unwrap_or_else(|| DEFAULT_ID.to_string());
    let display_number = raw.text(ORDER_NUMBER_KEYS).unwrap_or_else(|| id.clone());

    let line_items: Vec<LineItem> = raw.items().iter().map(normalize_item).collect();
    let subtotal: f64 = line_items.iter().map(|item| item.line_total).sum();

    let delivery_fee = raw.number(DELIVERY_KEYS).unwrap_or(0.0).max(0.0);
    let discount = raw.number(DISCOUNT_KEYS).unwrap_or(0.0).max(0.0);
    let tax_percent = raw.number(TAX_KEYS).unwrap_or(0.0).max(0.0);

    let after_delivery = subtotal + delivery_fee - discount;
    let tax_amount = after_delivery * tax_percent / 100.0;

    // A caller-supplied total wins over the computed one: upstream sometimes
    // adjusts prices after the fact and the invoice must agree with what was
    // actually charged.
    let grand_total = raw
        .number(TOTAL_OVERRIDE_KEYS)
        .unwrap_or(after_delivery + tax_amount);

    CanonicalInvoice {
        id,
        display_number,
        customer_name: raw
            .text(CUSTOMER_KEYS)
            .unwrap_or_else(|| DEFAULT_CUSTOMER_NAME.to_string()),
        phone: raw
            .text(PHONE_KEYS)
            .unwrap_or_else(|| DEFAULT_PHONE.to_string()),
        address: raw
            .text(ADDRESS_KEYS)
            .unwrap_or_else(|| DEFAULT_ADDRESS.to_string()),
        issued_at: resolve_timestamp(raw.field(DATE_KEYS)),
        payment_method: raw
            .text(PAYMENT_KEYS)
            .unwrap_or_else(|| DEFAULT_PAYMENT_METHOD.to_string()),
        line_items,
        subtotal,
        delivery_fee,
        discount,
        tax_percent,
        tax_amount,
        grand_total,
        notes: raw.text(NOTES_KEYS),
    }
}

fn normalize_item(item: &Value) -> LineItem {
    let item = OrderInput::new(item.clone());

    // Missing quantity means one unit ordered; a present but malformed
    // quantity coerces to 0 like every other numeric field.
    let quantity = item.number(ITEM_QTY_KEYS).unwrap_or(1.0).max(0.0);
    let unit_price = item.number(ITEM_PRICE_KEYS).unwrap_or(0.0).max(0.0);

    LineItem {
        name: item
            .text(ITEM_NAME_KEYS)
            .unwrap_or_else(|| UNNAMED_ITEM.to_string()),
        notes: item.text(ITEM_NOTES_KEYS),
        quantity,
        unit_price,
        line_total: quantity * unit_price,
    }
}

/// Parse the order timestamp. RFC 3339, bare `YYYY-MM-DD HH:MM:SS`, and
/// epoch milliseconds are all seen in the wild; anything else falls back to
/// the current time.
fn resolve_timestamp(value: Option<&Value>) -> DateTime<Utc> {
    match value {
        Some(Value::String(s)) => {
            if let Ok(parsed) = DateTime::parse_from_rfc3339(s) {
                return parsed.with_timezone(&Utc);
            }
            if let Ok(parsed) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
                return Utc.from_utc_datetime(&parsed);
            }
            Utc::now()
        }
        Some(Value::Number(n)) => n
            .as_i64()
            .and_then(|millis| Utc.timestamp_millis_opt(millis).single())
            .unwrap_or_else(Utc::now),
        _ => Utc::now(),
    }
}
