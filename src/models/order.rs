use serde::Deserialize;
use serde_json::Value;

/// Untrusted, heterogeneous order payload.
///
/// Orders arrive from several upstream producers that never agreed on field
/// names (`qty` vs `quantity`, `price` vs `unit_price`, three spellings of
/// the customer address). Rather than scattering fallback chains through the
/// rendering code, this wrapper offers alias-aware lookups; the normalizer
/// owns the ordered candidate-key list for each logical field.
#[derive(Debug, Clone)]
pub struct OrderInput(Value);

impl OrderInput {
    pub fn new(raw: Value) -> Self {
        OrderInput(raw)
    }

    /// First present, non-null value among the candidate keys.
    /// Key order is the resolution contract: earlier keys win.
    fn first_present(&self, keys: &[&str]) -> Option<&Value> {
        let obj = self.0.as_object()?;
        keys.iter()
            .filter_map(|k| obj.get(*k))
            .find(|v| !v.is_null())
    }

    /// Resolve a text field. Empty and whitespace-only strings count as
    /// absent and the chain continues to the next candidate key, matching
    /// the falsy fallbacks of the upstream producers. Numeric values
    /// stringify, so a numeric order id still resolves.
    pub fn text(&self, keys: &[&str]) -> Option<String> {
        let obj = self.0.as_object()?;
        keys.iter()
            .filter_map(|k| obj.get(*k))
            .find_map(value_to_text)
    }

    /// Resolve a numeric field. `None` means the field was absent under
    /// every candidate key; a present but malformed value coerces to 0.
    pub fn number(&self, keys: &[&str]) -> Option<f64> {
        self.first_present(keys).map(coerce_number)
    }

    /// Raw value lookup, for fields that are not plain text or numbers
    /// (timestamps, the item array).
    pub fn field(&self, keys: &[&str]) -> Option<&Value> {
        self.first_present(keys)
    }

    /// The line item array. Absence yields an empty slice, never a failure.
    pub fn items(&self) -> &[Value] {
        self.first_present(&["items"])
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

impl From<Value> for OrderInput {
    fn from(raw: Value) -> Self {
        OrderInput::new(raw)
    }
}

pub(crate) fn value_to_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Coerce a JSON value into a non-NaN float. Malformed input becomes 0
/// rather than failing: a broken price must not block invoice delivery.
pub(crate) fn coerce_number(value: &Value) -> f64 {
    let n = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    if n.is_finite() {
        n
    } else {
        0.0
    }
}

/// Database-change event delivered to the webhook endpoint. Shaped like the
/// row-change payloads the hosted database emits: the changed row rides in
/// `record`.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEvent {
    #[serde(rename = "type", default)]
    pub change_type: Option<String>,
    pub record: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn alias_order_is_first_present_wins() {
        let order = OrderInput::new(json!({ "qty": 3, "quantity": 9 }));
        assert_eq!(order.number(&["qty", "quantity"]), Some(3.0));

        let order = OrderInput::new(json!({ "quantity": 9 }));
        assert_eq!(order.number(&["qty", "quantity"]), Some(9.0));
    }

    #[test]
    fn zero_is_present_not_absent() {
        // Presence-based resolution: an explicit 0 must not fall through to
        // a later alias the way falsy lookups upstream did.
        let order = OrderInput::new(json!({ "qty": 0, "quantity": 5 }));
        assert_eq!(order.number(&["qty", "quantity"]), Some(0.0));
    }

    #[test]
    fn malformed_numbers_coerce_to_zero() {
        let order = OrderInput::new(json!({ "price": "abc" }));
        assert_eq!(order.number(&["price"]), Some(0.0));

        let order = OrderInput::new(json!({ "price": {"nested": 1} }));
        assert_eq!(order.number(&["price"]), Some(0.0));
    }

    #[test]
    fn numeric_strings_parse() {
        let order = OrderInput::new(json!({ "price": " 12.5 " }));
        assert_eq!(order.number(&["price"]), Some(12.5));
    }

    #[test]
    fn empty_strings_are_absent_for_text() {
        let order = OrderInput::new(json!({ "customer_name": "  ", "customer": "Lina" }));
        assert_eq!(
            order.text(&["customer_name", "customer"]),
            Some("Lina".to_string())
        );
    }

    #[test]
    fn all_blank_candidates_resolve_to_none() {
        let order = OrderInput::new(json!({ "customer_name": "", "customer": "  " }));
        assert_eq!(order.text(&["customer_name", "customer"]), None);
    }

    #[test]
    fn numeric_id_stringifies() {
        let order = OrderInput::new(json!({ "id": 4182 }));
        assert_eq!(order.text(&["id"]), Some("4182".to_string()));
    }

    #[test]
    fn missing_items_yield_empty_slice() {
        let order = OrderInput::new(json!({ "id": "x" }));
        assert!(order.items().is_empty());
    }
}
