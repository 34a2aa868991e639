use actix_web::{web, HttpResponse};
use serde_json::{json, Value};

use super::error::{ApiError, ApiResult};
use super::metrics;
use super::state::ApiState;
use crate::invoice::normalize::{self, normalize};
use crate::layout::layout;
use crate::models::{OrderInput, WebhookEvent};
use crate::pdf;

/// Direct generation: raw order JSON in, PDF on the local invoice directory.
pub async fn generate(
    body: web::Json<Value>,
    state: web::Data<ApiState>,
) -> ApiResult<HttpResponse> {
    let order = OrderInput::new(body.into_inner());

    let order_id = match normalize::order_id(&order) {
        Some(id) => id,
        None => {
            metrics::INVOICES_FAILED.inc();
            return Err(ApiError::bad_request("order id is required"));
        }
    };

    let invoice = normalize(&order);
    let instructions = layout(
        &invoice,
        qr_bitmap(&invoice.qr_payload()),
        &state.preset,
        &state.render,
    );

    let output_path = state
        .config
        .invoice_dir
        .join(format!("invoice-{}.pdf", order_id));

    let render = state.render.clone();
    let path_for_emit = output_path.clone();
    let result = web::block(move || pdf::emit(&instructions, &path_for_emit, &render)).await?;

    if let Err(e) = result {
        metrics::INVOICES_FAILED.inc();
        tracing::error!(order_id = %order_id, error = %e, "invoice generation failed");
        return Err(e.into());
    }

    metrics::INVOICES_GENERATED.inc();
    tracing::info!(order_id = %order_id, path = %output_path.display(), "invoice written");

    Ok(HttpResponse::Ok().json(json!({
        "message": "invoice generated",
        "pdf_path": output_path.display().to_string(),
        "order_id": order_id
    })))
}

/// Database-change webhook: render a completed order, upload the PDF, and
/// record its URL on the order row.
pub async fn webhook(
    event: web::Json<WebhookEvent>,
    state: web::Data<ApiState>,
) -> ApiResult<HttpResponse> {
    let event = event.into_inner();

    let record = match event.record {
        Some(record) => record,
        None => {
            metrics::WEBHOOKS_SKIPPED.inc();
            return Ok(HttpResponse::Ok().json(json!({
                "message": "no record in event, nothing to do"
            })));
        }
    };

    let order = OrderInput::new(record);

    let status = order.text(&["status"]).unwrap_or_default();
    if status != "completed" {
        metrics::WEBHOOKS_SKIPPED.inc();
        return Ok(HttpResponse::Ok().json(json!({
            "message": "order not completed, skipped",
            "status": status
        })));
    }

    let order_id = match normalize::order_id(&order) {
        Some(id) => id,
        None => {
            metrics::INVOICES_FAILED.inc();
            return Err(ApiError::bad_request("order id is required"));
        }
    };

    // Idempotency: a URL on the incoming record, or one already persisted,
    // means this order was invoiced by an earlier delivery.
    if order.text(&["invoice_url"]).is_some() {
        metrics::WEBHOOKS_SKIPPED.inc();
        return Ok(HttpResponse::Ok().json(json!({
            "message": "invoice already generated, skipped",
            "order_id": order_id
        })));
    }

    let store = state
        .store
        .clone()
        .ok_or_else(|| ApiError::service_unavailable("order store not configured"))?;
    let object_storage = state
        .object_storage
        .clone()
        .ok_or_else(|| ApiError::service_unavailable("object storage not configured"))?;

    if let Some(url) = store.invoice_url(&order_id).await? {
        metrics::WEBHOOKS_SKIPPED.inc();
        return Ok(HttpResponse::Ok().json(json!({
            "message": "invoice already generated, skipped",
            "order_id": order_id,
            "pdf_url": url
        })));
    }

    // Change events may carry only the touched columns; fall back to the
    // mirrored row when the item list is missing.
    let order = if order.items().is_empty() {
        store.fetch_order(&order_id).await?.unwrap_or(order)
    } else {
        order
    };

    let invoice = normalize(&order);
    let instructions = layout(
        &invoice,
        qr_bitmap(&invoice.qr_payload()),
        &state.preset,
        &state.render,
    );

    let render = state.render.clone();
    let bytes = web::block(move || pdf::render_to_bytes(&instructions, &render))
        .await?
        .map_err(|e| {
            metrics::INVOICES_FAILED.inc();
            ApiError::from(e)
        })?;

    let key = format!("invoices/invoice-{}.pdf", order_id);
    let url = object_storage
        .put_object(
            &state.config.s3_bucket_invoices,
            &key,
            bytes,
            "application/pdf",
        )
        .await
        .map_err(|e| {
            metrics::INVOICES_FAILED.inc();
            ApiError::from(e)
        })?;

    store.set_invoice_url(&order_id, &url).await?;

    metrics::INVOICES_GENERATED.inc();
    tracing::info!(order_id = %order_id, url = %url, "invoice uploaded");

    Ok(HttpResponse::Ok().json(json!({
        "message": "invoice generated",
        "pdf_url": url,
        "order_id": order_id
    })))
}

/// QR failure degrades to a page without a QR, never a failed invoice.
fn qr_bitmap(payload: &str) -> Option<Vec<u8>> {
    match pdf::qr_png(payload) {
        Ok(bytes) => Some(bytes),
        Err(e) => {
            tracing::warn!(error = %e, "QR generation failed, rendering without it");
            None
        }
    }
}
