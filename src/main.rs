use std::env;
use std::path::PathBuf;

use actix_web::{middleware, web, App, HttpServer};
use anyhow::Result;
use invoice_generator::api::routes::{cors_policy, request_logger};
use invoice_generator::api::{configure_routes, ApiState, AppConfig};
use invoice_generator::RenderConfig;
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Starting Invoice Generator API");

    prometheus::default_registry().register(Box::new(
        prometheus::process_collector::ProcessCollector::for_self(),
    ))?;

    let (config, render) = load_config()?;
    std::fs::create_dir_all(&config.invoice_dir)?;

    let state = web::Data::new(ApiState::new(config, render).await?);

    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = env::var("PORT")
        .unwrap_or_else(|_| "8080".to_string())
        .parse::<u16>()?;

    tracing::info!("Starting server on {}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(request_logger())
            .wrap(cors_policy())
            .wrap(middleware::NormalizePath::trim())
            .configure(configure_routes)
    })
    .bind((host.as_str(), port))?
    .run()
    .await?;

    Ok(())
}

fn load_config() -> Result<(AppConfig, RenderConfig)> {
    let config = AppConfig {
        invoice_dir: PathBuf::from(
            env::var("INVOICE_DIR").unwrap_or_else(|_| "invoices".to_string()),
        ),
        s3_bucket_invoices: env::var("S3_BUCKET_INVOICES")
            .unwrap_or_else(|_| "invoices".to_string()),
        database_url: env::var("DATABASE_URL").ok(),
        layout_preset: env::var("LAYOUT_PRESET").unwrap_or_else(|_| "classic".to_string()),
        enable_uploads: env::var("ENABLE_UPLOADS")
            .unwrap_or_else(|_| "false".to_string())
            .parse::<bool>()
            .unwrap_or(false),
    };

    let mut render = RenderConfig::builder();
    if let Ok(font) = env::var("FONT_PATH") {
        render = render.font_path(font);
    }
    if let Ok(logo) = env::var("LOGO_PATH") {
        render = render.logo_path(logo);
    }

    Ok((config, render.build()))
}
