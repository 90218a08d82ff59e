//! HTTP client for the hosted record store

use crate::core::Config;
use crate::store::{ErrorBody, RecordStore, StoreError, StoreResult};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::Client;
use serde::de::DeserializeOwned;
use shared::models::{NewOrder, OrderPatch, OrderRecord};

/// HTTP client against the store's REST surface
///
/// Every request carries the project API key both as `apikey` and as a
/// bearer token; writes ask for the created/updated representation back
/// via the `Prefer` header.
#[derive(Debug, Clone)]
pub struct HttpStore {
    client: Client,
    base_url: String,
    api_key: String,
    table: String,
}

impl HttpStore {
    /// Create a new HTTP store from configuration
    pub fn new(config: &Config) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_millis(config.request_timeout_ms))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: config.store_url.trim_end_matches('/').to_string(),
            api_key: config.store_api_key.clone(),
            table: config.store_table.clone(),
        }
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, self.table)
    }

    fn authed(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .header(
                reqwest::header::AUTHORIZATION,
                format!("Bearer {}", self.api_key),
            )
            .header(reqwest::header::CONTENT_TYPE, "application/json")
    }

    /// Make a filtered GET against the orders table
    async fn select<T: DeserializeOwned>(&self, query: &[(&str, String)]) -> StoreResult<T> {
        let request = self.authed(self.client.get(self.table_url()).query(query));
        let response = request.send().await?;
        Self::handle_response(response).await
    }

    /// Handle the HTTP response
    ///
    /// Non-success statuses carry a structured JSON error body; parse
    /// it best-effort so policy rejections (code `42501`) surface with
    /// their message intact.
    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> StoreResult<T> {
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await?;
            let body = serde_json::from_str::<ErrorBody>(&text).unwrap_or_else(|_| ErrorBody {
                message: Some(text),
                ..Default::default()
            });
            return Err(StoreError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        response.json().await.map_err(Into::into)
    }

    fn single(rows: Vec<OrderRecord>, id: Option<i64>) -> StoreResult<OrderRecord> {
        match (rows.into_iter().next(), id) {
            (Some(row), _) => Ok(row),
            (None, Some(id)) => Err(StoreError::NotFound(id)),
            (None, None) => Err(StoreError::NoRows),
        }
    }
}

#[async_trait]
impl RecordStore for HttpStore {
    async fn select_pending(&self) -> StoreResult<Vec<OrderRecord>> {
        self.select(&[
            ("select", "*".into()),
            ("status", "eq.pending".into()),
            ("order", "created_at.desc".into()),
        ])
        .await
    }

    async fn select_historical(&self, since: DateTime<Utc>) -> StoreResult<Vec<OrderRecord>> {
        let cutoff = since.to_rfc3339_opts(SecondsFormat::Millis, true);
        self.select(&[
            ("select", "*".into()),
            ("status", "in.(completed,cancelled)".into()),
            ("created_at", format!("gte.{cutoff}")),
            ("order", "created_at.desc".into()),
        ])
        .await
    }

    async fn fetch_order(&self, id: i64) -> StoreResult<OrderRecord> {
        let rows: Vec<OrderRecord> = self
            .select(&[("select", "*".into()), ("id", format!("eq.{id}"))])
            .await?;
        Self::single(rows, Some(id))
    }

    async fn insert_order(&self, order: &NewOrder) -> StoreResult<OrderRecord> {
        let request = self
            .authed(self.client.post(self.table_url()).json(order))
            .header("Prefer", "return=representation");
        let response = request.send().await?;
        let rows: Vec<OrderRecord> = Self::handle_response(response).await?;
        Self::single(rows, None)
    }

    async fn update_order(&self, id: i64, patch: &OrderPatch) -> StoreResult<OrderRecord> {
        let request = self
            .authed(
                self.client
                    .patch(self.table_url())
                    .query(&[("id", format!("eq.{id}"))])
                    .json(patch),
            )
            .header("Prefer", "return=representation");
        let response = request.send().await?;
        let rows: Vec<OrderRecord> = Self::handle_response(response).await?;
        Self::single(rows, Some(id))
    }
}
