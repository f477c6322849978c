//! Strict CSV import validation.
//!
//! Where [`crate::parser`] quietly drops anything it cannot read, this module
//! applies the upload rules the backend enforces: exact headers, a report line
//! for every rejected row, and one record per `(company, year, sector)`.
//! It lets a file be checked before it is sent anywhere.

use csv::{ReaderBuilder, StringRecord};
use std::collections::{HashMap, HashSet};
use thiserror::Error;
use tracing::{debug, info};

use crate::parser::normalize_decimal;
use crate::record::EmissionRecord;
use crate::services::emissions_api::ImportCsvResponse;

/// Required header names, in the column order the dashboard exports.
pub const CSV_HEADERS: [&str; 5] = [
    "Empresa",
    "Ano",
    "Setor",
    "Consumo de Energia (MWh)",
    "Emissões de CO2 (toneladas)",
];

/// Reasons a whole file is rejected.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("CSV file is empty")]
    Empty,

    #[error("Missing required CSV headers: {}", .0.join(", "))]
    MissingHeaders(Vec<String>),

    #[error("No valid rows found in CSV")]
    NoValidRows { errors: Vec<String> },

    #[error("Could not read CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// Records that passed validation plus the import report.
#[derive(Debug)]
pub struct ImportOutcome {
    pub records: Vec<EmissionRecord>,
    pub response: ImportCsvResponse,
}

/// Validates `text` and reconciles it against `existing` records.
///
/// Rows whose key is already in `existing` count as updates, the rest as
/// creations. Within the file, duplicate keys keep the row with the larger
/// energy + emissions sum; on a tie the earlier row wins.
pub fn validate_import(text: &str, existing: &[EmissionRecord]) -> Result<ImportOutcome, ImportError> {
    if text.trim().is_empty() {
        return Err(ImportError::Empty);
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let columns = header_columns(reader.headers()?)?;

    let mut errors = Vec::new();
    let mut kept: Vec<(usize, EmissionRecord)> = Vec::new();
    let mut by_key: HashMap<(String, i32, String), usize> = HashMap::new();

    for (i, result) in reader.records().enumerate() {
        // The header is row 1.
        let row = i + 2;

        let record = result?;

        let record = match parse_row(&record, &columns) {
            Ok(r) => r,
            Err(reason) => {
                errors.push(format!("Row {row}: {reason}"));
                continue;
            }
        };

        let key = (record.company.clone(), record.year, record.sector.clone());
        match by_key.get(&key) {
            Some(&slot) => {
                let (_, current) = &kept[slot];
                if magnitude(&record) > magnitude(current) {
                    kept[slot] = (row, record);
                }
                errors.push(format!(
                    "Row {row}: Duplicate entry for {}/{}/{}; kept the row with higher emissions/energy values",
                    key.0, key.1, key.2
                ));
            }
            None => {
                by_key.insert(key, kept.len());
                kept.push((row, record));
            }
        }
    }

    if kept.is_empty() {
        return Err(ImportError::NoValidRows { errors });
    }

    let existing_keys: HashSet<(&str, i32, &str)> = existing.iter().map(|r| r.key()).collect();
    let updated = kept
        .iter()
        .filter(|(_, r)| existing_keys.contains(&r.key()))
        .count();
    let created = kept.len() - updated;

    info!(created, updated, errors = errors.len(), "CSV import validated");

    let records: Vec<EmissionRecord> = kept.into_iter().map(|(_, r)| r).collect();
    Ok(ImportOutcome {
        records,
        response: ImportCsvResponse {
            message: "CSV import completed".to_string(),
            created,
            updated,
            errors,
            total_processed: created + updated,
        },
    })
}

/// Maps each required header to its column index, or lists the missing ones.
fn header_columns(headers: &StringRecord) -> Result<[usize; 5], ImportError> {
    let names: Vec<&str> = headers
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim())
        .collect();
    debug!(?names, "CSV headers");

    let mut columns = [0usize; 5];
    let mut missing = Vec::new();

    for (slot, required) in CSV_HEADERS.iter().enumerate() {
        match names.iter().position(|n| n == required) {
            Some(i) => columns[slot] = i,
            None => missing.push((*required).to_string()),
        }
    }

    if missing.is_empty() {
        Ok(columns)
    } else {
        Err(ImportError::MissingHeaders(missing))
    }
}

fn parse_row(record: &StringRecord, columns: &[usize; 5]) -> Result<EmissionRecord, String> {
    let fields: Vec<&str> = columns
        .iter()
        .map(|&i| record.get(i).unwrap_or_default().trim())
        .collect();

    if fields.iter().any(|f| f.is_empty()) {
        return Err("Missing required fields".to_string());
    }

    let year: i32 = fields[1]
        .parse()
        .map_err(|_| format!("Invalid data format (year '{}')", fields[1]))?;
    let energy = strict_decimal(fields[3])
        .ok_or_else(|| format!("Invalid data format (energy '{}')", fields[3]))?;
    let emissions = strict_decimal(fields[4])
        .ok_or_else(|| format!("Invalid data format (emissions '{}')", fields[4]))?;

    Ok(EmissionRecord {
        company: fields[0].to_string(),
        year,
        sector: fields[2].to_string(),
        energy_consumption_mwh: energy,
        co2_emissions_tons: emissions,
    })
}

fn strict_decimal(raw: &str) -> Option<f64> {
    normalize_decimal(raw).filter(|v| v.is_finite())
}

fn magnitude(record: &EmissionRecord) -> f64 {
    record.energy_consumption_mwh + record.co2_emissions_tons
}
