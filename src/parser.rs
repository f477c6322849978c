//! Permissive CSV parser for dashboard uploads.
//!
//! Expected layout (header line is discarded):
//!
//! ```text
//! Empresa,Ano,Setor,Consumo de Energia (MWh),Emissões de CO2 (toneladas)
//! "Acme, Inc",2022,Energy,"1.234,56","98,7"
//! ```
//!
//! Lines with fewer than five fields are skipped without complaint. Numeric
//! fields that fail to parse do not abort the import; they surface as
//! sentinels on [`ParsedRow`] and the row is dropped by [`parse_records`].

use csv::ReaderBuilder;
use tracing::{debug, warn};

use crate::record::EmissionRecord;

/// Number of columns a data line must provide.
pub const FIELD_COUNT: usize = 5;

/// A data line as recovered from the CSV, before validity filtering.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRow {
    /// 1-based line number in the source text.
    pub line: u64,
    pub company: String,
    /// `None` when the year column is not an integer.
    pub year: Option<i32>,
    pub sector: String,
    /// `NaN` when the column is not a number.
    pub energy_consumption_mwh: f64,
    /// `NaN` when the column is not a number.
    pub co2_emissions_tons: f64,
}

impl ParsedRow {
    /// Converts into an [`EmissionRecord`] if every numeric field is usable.
    pub fn into_record(self) -> Option<EmissionRecord> {
        let year = self.year?;
        if !self.energy_consumption_mwh.is_finite() || !self.co2_emissions_tons.is_finite() {
            return None;
        }
        Some(EmissionRecord {
            company: self.company,
            year,
            sector: self.sector,
            energy_consumption_mwh: self.energy_consumption_mwh,
            co2_emissions_tons: self.co2_emissions_tons,
        })
    }
}

/// Parses a decimal written with either `.` or `,` as the fractional separator.
///
/// When a comma is present it is the fractional separator and any dots are
/// thousands separators, so `"1.234,56"` reads as `1234.56`. Text without a
/// comma is parsed unchanged. A comma followed by a dot (`"1,234.56"`) is
/// ambiguous and yields `None`.
pub fn normalize_decimal(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    match (raw.rfind(','), raw.rfind('.')) {
        (Some(comma), Some(dot)) if comma < dot => None,
        (Some(_), _) => raw.replace('.', "").replace(',', ".").parse().ok(),
        (None, _) => raw.parse().ok(),
    }
}

/// Splits CSV text into rows, skipping the header and any short or unreadable line.
///
/// A blank company or sector counts as a missing field, so the line is skipped
/// the same way a short one is.
pub fn parse_csv(text: &str) -> Vec<ParsedRow> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();

    for result in reader.records() {
        let Ok(record) = result else {
            continue;
        };
        if record.len() < FIELD_COUNT {
            debug!(fields = record.len(), "Skipping short CSV line");
            continue;
        }

        let line = record.position().map(|p| p.line()).unwrap_or_default();
        let field = |i: usize| record.get(i).unwrap_or_default();

        let company = field(0).trim();
        let sector = field(2).trim();
        if company.is_empty() || sector.is_empty() {
            debug!(line, "Skipping CSV line with blank company or sector");
            continue;
        }

        rows.push(ParsedRow {
            line,
            company: company.to_string(),
            year: field(1).trim().parse().ok(),
            sector: sector.to_string(),
            energy_consumption_mwh: normalize_decimal(field(3)).unwrap_or(f64::NAN),
            co2_emissions_tons: normalize_decimal(field(4)).unwrap_or(f64::NAN),
        });
    }

    rows
}

/// Parses CSV text and keeps only rows whose year and numbers are valid.
///
/// Invalid rows are logged and dropped so they cannot poison aggregate sums.
pub fn parse_records(text: &str) -> Vec<EmissionRecord> {
    let rows = parse_csv(text);
    let parsed = rows.len();

    let mut records = Vec::with_capacity(parsed);
    for row in rows {
        let line = row.line;
        match row.into_record() {
            Some(record) => records.push(record),
            None => warn!(line, "Dropping CSV row with invalid numeric field"),
        }
    }

    debug!(parsed, kept = records.len(), "CSV parsed");
    records
}
