use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::DashboardConfig;
use crate::fetch::{BasicClient, HttpClient};
use crate::record::{ApiEmissionRecord, EmissionRecord};
use crate::services::emissions_api::{EmissionsApi, ImportCsvResponse};

/// Failures reported by the backend itself (as opposed to transport errors).
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Failed to fetch emissions data (status {0})")]
    Fetch(StatusCode),

    #[error("{message}")]
    Import { status: StatusCode, message: String },
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

pub struct BackendClient<C = BasicClient> {
    base_url: String,
    http: C,
}

impl BackendClient<BasicClient> {
    /// Creates a client for the backend described by `config`.
    pub fn new(config: &DashboardConfig) -> Result<Self> {
        let http = BasicClient::with_timeout(config.request_timeout())?;
        Ok(Self::with_client(config.base_url(), http))
    }
}

impl<C: HttpClient> BackendClient<C> {
    pub fn with_client(base_url: impl Into<String>, http: C) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl<C: HttpClient> EmissionsApi for BackendClient<C> {
    #[tracing::instrument(skip(self), fields(base_url = %self.base_url))]
    async fn list_records(&self) -> Result<Vec<EmissionRecord>> {
        let url = format!("{}/emissions/", self.base_url);
        let req = reqwest::Request::new(reqwest::Method::GET, url.parse()?);

        let response = self
            .http
            .execute(req)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to send request: {}", e))?;

        if !response.status().is_success() {
            return Err(ApiError::Fetch(response.status()).into());
        }

        let raw: Vec<ApiEmissionRecord> = response
            .json()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to parse response: {}", e))?;
        debug!(count = raw.len(), "Emission records received");

        let records = raw
            .into_iter()
            .map(EmissionRecord::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        info!(count = records.len(), "Emission records fetched");
        Ok(records)
    }

    #[tracing::instrument(skip(self, path), fields(base_url = %self.base_url, path = %path.display()))]
    async fn import_csv(&self, path: &Path) -> Result<ImportCsvResponse> {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload.csv")
            .to_string();

        let part = Part::bytes(bytes).file_name(file_name).mime_str("text/csv")?;
        let form = Form::new().part("file", part);

        // Only used to encode the multipart body; the request runs on `self.http`.
        let req = reqwest::Client::new()
            .post(format!("{}/emissions/import_csv/", self.base_url))
            .multipart(form)
            .build()?;

        let response = self
            .http
            .execute(req)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to send request: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.error)
                .unwrap_or_else(|| "Failed to import CSV".to_string());
            return Err(ApiError::Import { status, message }.into());
        }

        let report: ImportCsvResponse = response
            .json()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to parse import response: {}", e))?;

        info!(
            created = report.created,
            updated = report.updated,
            errors = report.errors.len(),
            "CSV imported"
        );
        Ok(report)
    }
}
