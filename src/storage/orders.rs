use anyhow::Result;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Row, SqlitePool};

use crate::models::OrderInput;

/// Order rows as mirrored from the upstream database: the raw JSON payload
/// plus the invoice URL once one has been generated. The URL column doubles
/// as the idempotency marker for the webhook path.
#[derive(Clone)]
pub struct OrderStore {
    pool: SqlitePool,
}

impl OrderStore {
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS orders (
                id TEXT PRIMARY KEY,
                payload TEXT NOT NULL,
                invoice_url TEXT
            )",
        )
        .execute(&pool)
        .await?;

        Ok(OrderStore { pool })
    }

    pub async fn fetch_order(&self, id: &str) -> Result<Option<OrderInput>> {
        let row = sqlx::query("SELECT payload FROM orders WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let payload: String = row.try_get("payload")?;
                Ok(Some(OrderInput::new(serde_json::from_str(&payload)?)))
            }
            None => Ok(None),
        }
    }

    pub async fn invoice_url(&self, id: &str) -> Result<Option<String>> {
        let row = sqlx::query("SELECT invoice_url FROM orders WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(row.try_get("invoice_url")?),
            None => Ok(None),
        }
    }

    pub async fn set_invoice_url(&self, id: &str, url: &str) -> Result<()> {
        sqlx::query(
            "INSERT INTO orders (id, payload, invoice_url) VALUES (?, '{}', ?)
             ON CONFLICT(id) DO UPDATE SET invoice_url = excluded.invoice_url",
        )
        .bind(id)
        .bind(url)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn upsert_payload(&self, id: &str, payload: &serde_json::Value) -> Result<()> {
        sqlx::query(
            "INSERT INTO orders (id, payload) VALUES (?, ?)
             ON CONFLICT(id) DO UPDATE SET payload = excluded.payload",
        )
        .bind(id)
        .bind(payload.to_string())
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // A pooled in-memory database gives every connection its own empty
    // schema; tests go through a file-backed database instead.
    async fn file_store(dir: &tempfile::TempDir) -> OrderStore {
        let url = format!("sqlite://{}/orders.db?mode=rwc", dir.path().display());
        OrderStore::connect(&url).await.unwrap()
    }

    #[actix_rt::test]
    async fn url_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = file_store(&dir).await;
        assert_eq!(store.invoice_url("A1").await.unwrap(), None);

        store
            .set_invoice_url("A1", "https://cdn.example/invoices/A1.pdf")
            .await
            .unwrap();
        assert_eq!(
            store.invoice_url("A1").await.unwrap().as_deref(),
            Some("https://cdn.example/invoices/A1.pdf")
        );
    }

    #[actix_rt::test]
    async fn fetch_parses_stored_payload() {
        let dir = tempfile::tempdir().unwrap();
        let store = file_store(&dir).await;
        store
            .upsert_payload("A2", &json!({"id": "A2", "items": []}))
            .await
            .unwrap();

        let order = store.fetch_order("A2").await.unwrap().unwrap();
        assert_eq!(order.text(&["id"]).as_deref(), Some("A2"));
        assert!(store.fetch_order("missing").await.unwrap().is_none());
    }
}
