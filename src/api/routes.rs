use actix_cors::Cors;
use actix_web::{web, HttpResponse};
use tracing_actix_web::TracingLogger;

use super::handlers;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/metrics", web::get().to(metrics_endpoint))
        .route("/generate", web::post().to(handlers::generate))
        .route("/webhook", web::post().to(handlers::webhook));
}

/// CORS and request logging for the externally reachable server; kept out of
/// `configure_routes` so handler tests run without the middleware stack.
pub fn cors_policy() -> Cors {
    Cors::default()
        .allowed_origin_fn(|origin, _req_head| {
            origin.as_bytes().starts_with(b"http://localhost")
                || origin.as_bytes().starts_with(b"https://")
        })
        .allowed_methods(vec!["GET", "POST"])
        .allowed_headers(vec!["Content-Type"])
        .max_age(3600)
}

pub fn request_logger() -> TracingLogger<tracing_actix_web::DefaultRootSpanBuilder> {
    TracingLogger::default()
}

async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy"
    }))
}

async fn metrics_endpoint() -> HttpResponse {
    use prometheus::{Encoder, TextEncoder};

    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = vec![];

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return HttpResponse::InternalServerError().body(e.to_string());
    }

    HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(buffer)
}
