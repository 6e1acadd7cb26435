//! # Backend API Client
//!
//! Thin typed wrapper over the backend REST endpoints.
//!
//! ## Endpoints
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────────┐
//! │  GET    /api/catalogo               product catalog                     │
//! │  GET    /api/rangos                 price thresholds per group          │
//! │  GET    /api/stock/actual           stock levels       {success, rows}  │
//! │  GET    /api/stock/ingresos         stock ingresses    {success, rows}  │
//! │  POST   /api/stock/ingresos         record an ingress                   │
//! │  PUT    /api/stock/ingresos/{id}    edit an ingress                     │
//! │  DELETE /api/stock/ingresos/{id}    delete an ingress                   │
//! │  GET    /api/ventas                 pending sales      [ ... ]          │
//! │  POST   /api/ventas                 add a pending sale                  │
//! │  PUT    /api/ventas/{index}         edit a pending sale                 │
//! │  DELETE /api/ventas/{index}         delete a pending sale               │
//! │  DELETE /api/ventas                 clear pending sales                 │
//! │  POST   /api/exportar               export pending sales to history     │
//! │  GET    /api/historial              exported history   {date: [...]}    │
//! └──────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Response Handling
//! - Non-2xx: the `{error}` (or `{message}`) body becomes the error message.
//!   404 maps to [`ClientError::NotFound`].
//! - 2xx with `{success: false}`: [`ClientError::Rejected`].

use mostrador_core::bands::LoadedRanges;
use mostrador_core::dashboard::History;
use mostrador_core::sale::SaleRecord;
use mostrador_core::stock::{rows_from_response, StockIngress, StockLevel};
use mostrador_core::{Catalog, CoreError, PriceRanges};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// Result of `POST /api/exportar`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOutcome {
    pub message: Option<String>,
}

/// Client for the backend REST API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Builds a client from validated configuration.
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        config.validate()?;
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(ApiClient {
            client,
            base_url: config.base_url().to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    // =========================================================================
    // Transport
    // =========================================================================

    async fn send(&self, request: RequestBuilder) -> ClientResult<Value> {
        let response = request.send().await?;
        let status = response.status();
        let url = response.url().path().to_string();
        let text = response.text().await?;
        debug!(%url, status = status.as_u16(), bytes = text.len(), "Backend response");

        let body: Option<Value> = if text.trim().is_empty() {
            Some(Value::Null)
        } else {
            serde_json::from_str(&text).ok()
        };

        if !status.is_success() {
            let message = body
                .as_ref()
                .and_then(error_message)
                .unwrap_or_else(|| fallback_message(status, &text));
            return Err(match status {
                StatusCode::NOT_FOUND => ClientError::NotFound(message),
                _ => ClientError::Api {
                    status: status.as_u16(),
                    message,
                },
            });
        }

        let body = match body {
            Some(body) => body,
            None => serde_json::from_str(&text)?,
        };
        if body.get("success").and_then(Value::as_bool) == Some(false) {
            let message = error_message(&body).unwrap_or_else(|| "operación fallida".to_string());
            return Err(ClientError::Rejected(message));
        }
        Ok(body)
    }

    async fn get(&self, path: &str) -> ClientResult<Value> {
        self.send(self.client.get(self.url(path))).await
    }

    async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ClientResult<Value> {
        self.send(self.client.post(self.url(path)).json(body)).await
    }

    async fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ClientResult<Value> {
        self.send(self.client.put(self.url(path)).json(body)).await
    }

    async fn delete(&self, path: &str) -> ClientResult<Value> {
        self.send(self.client.delete(self.url(path))).await
    }

    // =========================================================================
    // Catalog & Ranges
    // =========================================================================

    pub async fn catalog(&self) -> ClientResult<Catalog> {
        let body = self.get("/api/catalogo").await?;
        let catalog = Catalog::from_response(&body)?;
        info!(products = catalog.len(), "Catalog loaded");
        Ok(catalog)
    }

    /// Price thresholds. Invalid groups are returned in
    /// [`LoadedRanges::rejected`] rather than failing the whole table.
    pub async fn price_ranges(&self) -> ClientResult<LoadedRanges> {
        let body = self.get("/api/rangos").await?;
        let loaded = PriceRanges::from_response(&body)?;
        info!(
            groups = loaded.ranges.len(),
            rejected = loaded.rejected.len(),
            "Price ranges loaded"
        );
        Ok(loaded)
    }

    // =========================================================================
    // Stock
    // =========================================================================

    pub async fn stock_levels(&self) -> ClientResult<Vec<StockLevel>> {
        let body = self.get("/api/stock/actual").await?;
        Ok(rows_from_response(&body)?)
    }

    pub async fn stock_ingresses(&self) -> ClientResult<Vec<StockIngress>> {
        let body = self.get("/api/stock/ingresos").await?;
        Ok(rows_from_response(&body)?)
    }

    pub async fn create_ingress(&self, ingress: &StockIngress) -> ClientResult<()> {
        info!(article_id = %ingress.article_id, quantity = ingress.quantity, "Recording stock ingress");
        self.post("/api/stock/ingresos", ingress).await?;
        Ok(())
    }

    pub async fn update_ingress(&self, id: i64, ingress: &StockIngress) -> ClientResult<()> {
        info!(id, article_id = %ingress.article_id, "Updating stock ingress");
        self.put(&format!("/api/stock/ingresos/{id}"), ingress).await?;
        Ok(())
    }

    pub async fn delete_ingress(&self, id: i64) -> ClientResult<()> {
        info!(id, "Deleting stock ingress");
        self.delete(&format!("/api/stock/ingresos/{id}")).await?;
        Ok(())
    }

    // =========================================================================
    // Pending Sales
    // =========================================================================

    /// Pending (not yet exported) sales, in backend order. Unreadable rows
    /// are skipped with a warning.
    pub async fn sales(&self) -> ClientResult<Vec<SaleRecord>> {
        let body = self.get("/api/ventas").await?;
        let rows = match body {
            Value::Array(rows) => rows,
            Value::Null => Vec::new(),
            _ => {
                return Err(CoreError::UnexpectedPayload(
                    "sales response is not a JSON array".to_string(),
                )
                .into())
            }
        };

        let mut sales = Vec::with_capacity(rows.len());
        for (index, row) in rows.into_iter().enumerate() {
            match serde_json::from_value::<SaleRecord>(row) {
                Ok(sale) => sales.push(sale),
                Err(e) => warn!(index, error = %e, "Skipping unreadable pending sale"),
            }
        }
        Ok(sales)
    }

    pub async fn add_sale(&self, sale: &SaleRecord) -> ClientResult<()> {
        info!(id = %sale.id, units = sale.units, "Adding pending sale");
        self.post("/api/ventas", sale).await?;
        Ok(())
    }

    pub async fn update_sale(&self, index: usize, sale: &SaleRecord) -> ClientResult<()> {
        info!(index, id = %sale.id, "Updating pending sale");
        self.put(&format!("/api/ventas/{index}"), sale).await?;
        Ok(())
    }

    pub async fn delete_sale(&self, index: usize) -> ClientResult<()> {
        info!(index, "Deleting pending sale");
        self.delete(&format!("/api/ventas/{index}")).await?;
        Ok(())
    }

    pub async fn clear_sales(&self) -> ClientResult<()> {
        info!("Clearing pending sales");
        self.delete("/api/ventas").await?;
        Ok(())
    }

    // =========================================================================
    // Export & History
    // =========================================================================

    /// Exports the pending sales to the history, then clears the pending
    /// list. A failure to clear after a successful export only warns.
    pub async fn export(&self) -> ClientResult<ExportOutcome> {
        let body = self.post("/api/exportar", &serde_json::json!({})).await?;
        let message = body
            .get("message")
            .or_else(|| body.get("mensaje"))
            .and_then(Value::as_str)
            .map(str::to_string);
        info!(?message, "Pending sales exported");

        if let Err(e) = self.clear_sales().await {
            warn!(error = %e, "Export succeeded but clearing pending sales failed");
        }
        Ok(ExportOutcome { message })
    }

    pub async fn history(&self) -> ClientResult<History> {
        let body = self.get("/api/historial").await?;
        let history = History::from_response(&body)?;
        if history.skipped > 0 {
            warn!(skipped = history.skipped, "History contained unreadable entries");
        }
        Ok(history)
    }
}

fn error_message(body: &Value) -> Option<String> {
    ["error", "message", "mensaje"]
        .iter()
        .find_map(|key| body.get(key).and_then(Value::as_str))
        .map(str::to_string)
}

fn fallback_message(status: StatusCode, text: &str) -> String {
    let text = text.trim();
    if text.is_empty() {
        status.canonical_reason().unwrap_or("error").to_string()
    } else {
        text.chars().take(200).collect()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
