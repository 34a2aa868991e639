use std::path::PathBuf;
use std::sync::Arc;

use crate::core::config::RenderConfig;
use crate::layout::LayoutPreset;
use crate::storage::{OrderStore, S3Client};

/// Shared application state. Object storage and the order store are both
/// optional: the direct `/generate` path only needs the filesystem, while
/// the webhook path answers 503 until both are configured.
#[derive(Clone)]
pub struct ApiState {
    pub config: Arc<AppConfig>,
    pub render: Arc<RenderConfig>,
    pub preset: LayoutPreset,
    pub store: Option<OrderStore>,
    pub object_storage: Option<Arc<S3Client>>,
}

#[derive(Clone)]
pub struct AppConfig {
    pub invoice_dir: PathBuf,
    pub s3_bucket_invoices: String,
    pub database_url: Option<String>,
    pub layout_preset: String,
    pub enable_uploads: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            invoice_dir: PathBuf::from("invoices"),
            s3_bucket_invoices: "invoices".to_string(),
            database_url: None,
            layout_preset: "classic".to_string(),
            enable_uploads: false,
        }
    }
}

impl ApiState {
    pub async fn new(config: AppConfig, render: RenderConfig) -> anyhow::Result<Self> {
        let preset = LayoutPreset::by_name(&config.layout_preset).unwrap_or_default();

        let store = match &config.database_url {
            Some(url) => Some(OrderStore::connect(url).await?),
            None => None,
        };

        let object_storage = if config.enable_uploads {
            let client = match r2_credentials() {
                Some((account_id, access_key_id, secret_access_key)) => {
                    S3Client::new_for_r2(account_id, access_key_id, secret_access_key).await?
                }
                None => S3Client::new().await?,
            };
            Some(Arc::new(client))
        } else {
            None
        };

        Ok(ApiState {
            config: Arc::new(config),
            render: Arc::new(render),
            preset,
            store,
            object_storage,
        })
    }

    /// State for the filesystem-only paths, used by handler tests.
    pub fn local_only(config: AppConfig, render: RenderConfig) -> Self {
        let preset = LayoutPreset::by_name(&config.layout_preset).unwrap_or_default();
        ApiState {
            config: Arc::new(config),
            render: Arc::new(render),
            preset,
            store: None,
            object_storage: None,
        }
    }
}

/// R2 credentials from the environment. All three must be present for the
/// R2 endpoint to win over the default S3 provider chain.
fn r2_credentials() -> Option<(String, String, String)> {
    let account_id = std::env::var("R2_ACCOUNT_ID").ok()?;
    let access_key_id = std::env::var("R2_ACCESS_KEY_ID").ok()?;
    let secret_access_key = std::env::var("R2_SECRET_ACCESS_KEY").ok()?;
    Some((account_id, access_key_id, secret_access_key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn r2_requires_all_three_credentials() {
        std::env::set_var("R2_ACCOUNT_ID", "acct");
        std::env::set_var("R2_ACCESS_KEY_ID", "key");
        std::env::remove_var("R2_SECRET_ACCESS_KEY");
        assert!(r2_credentials().is_none());

        std::env::set_var("R2_SECRET_ACCESS_KEY", "secret");
        assert_eq!(
            r2_credentials(),
            Some(("acct".into(), "key".into(), "secret".into()))
        );

        std::env::remove_var("R2_ACCOUNT_ID");
        std::env::remove_var("R2_ACCESS_KEY_ID");
        std::env::remove_var("R2_SECRET_ACCESS_KEY");
    }
}
