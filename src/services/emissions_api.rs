//! Trait and types for talking to the emissions dashboard backend.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::record::EmissionRecord;

/// Outcome of a CSV import, as reported by the backend's `import_csv` endpoint.
///
/// The local validator in [`crate::import`] produces the same shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportCsvResponse {
    pub message: String,
    pub created: usize,
    pub updated: usize,
    #[serde(default)]
    pub errors: Vec<String>,
    pub total_processed: usize,
}

/// Abstraction over a source of emission records that also accepts CSV uploads.
#[async_trait::async_trait]
pub trait EmissionsApi {
    /// Returns every stored record.
    async fn list_records(&self) -> Result<Vec<EmissionRecord>>;

    /// Uploads a CSV file for import and returns the backend's report.
    async fn import_csv(&self, path: &Path) -> Result<ImportCsvResponse>;
}
