use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::analyzers::utility::ratio_or_zero;
use crate::record::EmissionRecord;

/// Headline figures shown above the dashboard charts.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    /// Tonnes of CO₂ across every record.
    pub total_emissions: f64,
    /// MWh consumed across every record.
    pub total_energy: f64,
    pub unique_companies: usize,
    pub avg_emissions_per_company: f64,
}

impl DashboardStats {
    pub fn from_records(records: &[EmissionRecord]) -> Self {
        let mut s = DashboardStats::default();
        let mut companies = HashSet::new();

        for r in records {
            s.total_emissions += r.co2_emissions_tons;
            s.total_energy += r.energy_consumption_mwh;
            companies.insert(r.company.as_str());
        }

        s.unique_companies = companies.len();
        s.avg_emissions_per_company = ratio_or_zero(s.total_emissions, s.unique_companies as f64);
        s
    }
}
