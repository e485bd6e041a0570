use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::json;
use tracing::{error, info, warn};

use crate::config::AppConfig;
use crate::errors::ServiceError;
use crate::models::ItemTrace;
use crate::query::PassportQuery;
use crate::sources::{RecordSource, ScanRecorder};

/// Client for the item-trace API (a Directus-style REST backend).
#[derive(Debug, Clone)]
pub struct ItemTraceApi {
    client: Client,
    base_url: String,
    access_token: Option<String>,
    timeout: Duration,
}

impl ItemTraceApi {
    /// Builds a client from configuration with the configured request
    /// timeout applied to every call.
    pub fn new(config: &AppConfig) -> Result<Self, ServiceError> {
        let timeout = config.request_timeout();
        let client = Client::builder()
            .timeout(timeout)
            .gzip(true)
            .build()
            .map_err(ServiceError::Http)?;

        Ok(Self::with_client(
            client,
            &config.api_url,
            config.api_access_token.clone(),
            timeout,
        ))
    }

    /// Build from an existing client (useful for testing).
    pub fn with_client(
        client: Client,
        base_url: &str,
        access_token: Option<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token: access_token.filter(|token| !token.is_empty()),
            timeout,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let builder = builder.timeout(self.timeout);
        match &self.access_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    fn send_error(&self, err: reqwest::Error) -> ServiceError {
        if err.is_timeout() {
            ServiceError::Timeout(self.timeout.as_millis() as u64)
        } else {
            ServiceError::from(err)
        }
    }

    /// `GET /itemtrace?gtin=..&serial=..`. Only a 200 response is accepted
    /// and nothing is retried.
    pub async fn fetch_item_trace(&self, gtin: &str, serial: &str) -> Result<ItemTrace, ServiceError> {
        info!(gtin, serial, "Fetching item trace");

        let url = format!("{}/itemtrace", self.base_url);
        let response = self
            .request(self.client.get(&url))
            .query(&[("gtin", gtin), ("serial", serial)])
            .send()
            .await
            .map_err(|err| self.send_error(err))
            .map_err(|err| {
                error!(gtin, serial, error = %err, "Item trace request failed");
                err
            })?;

        let status = response.status();
        info!(status = status.as_u16(), "Item trace API responded");

        if status != StatusCode::OK {
            error!(gtin, serial, status = status.as_u16(), "Item trace API returned an error status");
            return Err(ServiceError::ApiRequestFailed {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|err| self.send_error(err))?;
        let record: ItemTrace = serde_json::from_slice(&body)?;
        Ok(record)
    }
}

#[async_trait]
impl RecordSource for ItemTraceApi {
    async fn fetch(&self, query: &PassportQuery) -> Result<ItemTrace, ServiceError> {
        match (query.gtin.as_deref(), query.serial.as_deref()) {
            (Some(gtin), Some(serial)) => self.fetch_item_trace(gtin, serial).await,
            (None, Some(_)) => Err(ServiceError::AuthenticationRequired),
            _ => Err(ServiceError::InvalidInput(
                "both gtin and serial are required".to_string(),
            )),
        }
    }
}

#[async_trait]
impl ScanRecorder for ItemTraceApi {
    /// `PATCH /items/scan_event/{scan_id}` with the visitor's client id.
    async fn update_scan_with_user(&self, scan_id: &str, client_id: &str) {
        let url = format!("{}/items/scan_event/{}", self.base_url, scan_id);
        let result = self
            .request(self.client.patch(&url))
            .json(&json!({ "client_id": client_id }))
            .send()
            .await;

        match result {
            Ok(response) => {
                let status = response.status();
                if status == StatusCode::OK || status == StatusCode::NO_CONTENT {
                    info!(scan_id, client_id, "Updated scan with returning user");
                } else {
                    warn!(scan_id, status = status.as_u16(), "Unexpected status updating scan");
                }
            }
            Err(err) => {
                let err = self.send_error(err);
                error!(scan_id, client_id, error = %err, "Failed to update scan with user");
            }
        }
    }
}
