//! Chart-ready projections produced by the aggregation pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::stats::DashboardStats;

/// Total emissions for a single year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearTotal {
    pub year: i32,
    pub total: f64,
}

/// Mean energy consumption across all of a company's records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyAverage {
    pub company: String,
    pub average: f64,
}

/// Total emissions for a company, used for top-N ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyTotal {
    pub company: String,
    pub total: f64,
}

/// Emissions per unit of energy (tonnes CO₂ / MWh). Higher is worse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyEfficiency {
    pub company: String,
    pub efficiency: f64,
}

/// Emission and energy totals for a sector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorAggregate {
    pub sector: String,
    pub emissions: f64,
    pub energy: f64,
}

/// Every projection the dashboard renders, built from one record set.
#[derive(Debug, Serialize)]
pub struct Dashboard {
    pub generated_at: DateTime<Utc>,
    pub record_count: usize,
    pub summary: DashboardStats,
    pub emissions_by_year: Vec<YearTotal>,
    pub average_energy: Vec<CompanyAverage>,
    pub top_emitters: Vec<CompanyTotal>,
    pub energy_efficiency: Vec<CompanyEfficiency>,
    pub emissions_by_sector: Vec<SectorAggregate>,
}
