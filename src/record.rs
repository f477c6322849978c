//! The canonical emissions record and its API wire form.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::parser::normalize_decimal;

/// One company/year/sector measurement of energy consumption and CO₂ emissions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmissionRecord {
    pub company: String,
    pub year: i32,
    pub sector: String,
    pub energy_consumption_mwh: f64,
    pub co2_emissions_tons: f64,
}

/// A record as returned by the backend's `emissions/` endpoint.
///
/// Decimal columns are serialized by the backend as strings (`"1000.50"`).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiEmissionRecord {
    pub id: i64,
    pub company: String,
    pub year: i32,
    pub sector: String,
    pub energy_consumption_mwh: String,
    pub co2_emissions_tons: String,
}

#[derive(Debug, Error, PartialEq)]
pub enum RecordError {
    #[error("record {id}: invalid {field} value '{value}'")]
    InvalidNumber {
        id: i64,
        field: &'static str,
        value: String,
    },
}

impl TryFrom<ApiEmissionRecord> for EmissionRecord {
    type Error = RecordError;

    fn try_from(api: ApiEmissionRecord) -> Result<Self, Self::Error> {
        let parse = |field: &'static str, value: &str| {
            normalize_decimal(value)
                .filter(|v| v.is_finite())
                .ok_or_else(|| RecordError::InvalidNumber {
                    id: api.id,
                    field,
                    value: value.to_string(),
                })
        };

        let energy = parse("energy_consumption_mwh", &api.energy_consumption_mwh)?;
        let emissions = parse("co2_emissions_tons", &api.co2_emissions_tons)?;

        Ok(EmissionRecord {
            company: api.company,
            year: api.year,
            sector: api.sector,
            energy_consumption_mwh: energy,
            co2_emissions_tons: emissions,
        })
    }
}

impl EmissionRecord {
    /// Key used to detect the same measurement across imports.
    pub fn key(&self) -> (&str, i32, &str) {
        (&self.company, self.year, &self.sector)
    }
}
