use crate::analyzers::aggregate::{
    average_energy_by_company, emissions_by_sector, energy_efficiency, top_emitters,
    total_emissions_by_year,
};
use crate::analyzers::types::Dashboard;
use crate::record::EmissionRecord;
use crate::stats::DashboardStats;
use tracing::info;

/// Number of companies shown in the ranked charts unless asked otherwise.
pub const DEFAULT_TOP_N: usize = 5;

/// Runs every aggregator over `records` and bundles the results.
pub fn build_dashboard(records: &[EmissionRecord], top_n: usize) -> Dashboard {
    let dashboard = Dashboard {
        generated_at: chrono::Utc::now(),
        record_count: records.len(),
        summary: DashboardStats::from_records(records),
        emissions_by_year: total_emissions_by_year(records),
        average_energy: average_energy_by_company(records),
        top_emitters: top_emitters(records, top_n),
        energy_efficiency: energy_efficiency(records, top_n),
        emissions_by_sector: emissions_by_sector(records),
    };

    info!(
        records = dashboard.record_count,
        companies = dashboard.summary.unique_companies,
        years = dashboard.emissions_by_year.len(),
        sectors = dashboard.emissions_by_sector.len(),
        "Dashboard built"
    );

    dashboard
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(company: &str, year: i32, sector: &str, energy: f64, emissions: f64) -> EmissionRecord {
        EmissionRecord {
            company: company.to_string(),
            year,
            sector: sector.to_string(),
            energy_consumption_mwh: energy,
            co2_emissions_tons: emissions,
        }
    }

    #[test]
    fn test_build_dashboard() {
        let records = vec![
            record("A", 2020, "Energy", 100.0, 10.0),
            record("A", 2020, "Energy", 50.0, 5.0),
            record("B", 2021, "Tech", 200.0, 40.0),
        ];
        let dashboard = build_dashboard(&records, 1);

        assert_eq!(dashboard.record_count, 3);
        assert_eq!(dashboard.summary.unique_companies, 2);
        assert_eq!(dashboard.emissions_by_year.len(), 2);
        assert_eq!(dashboard.average_energy.len(), 2);
        assert_eq!(dashboard.top_emitters.len(), 1);
        assert_eq!(dashboard.top_emitters[0].company, "B");
        assert_eq!(dashboard.energy_efficiency.len(), 1);
        assert_eq!(dashboard.emissions_by_sector[0].sector, "Tech");
    }

    #[test]
    fn test_build_dashboard_serializes() {
        let dashboard = build_dashboard(&[], DEFAULT_TOP_N);
        let json = serde_json::to_value(&dashboard).unwrap();
        assert_eq!(json["record_count"], 0);
        assert!(json["emissions_by_year"].as_array().unwrap().is_empty());
        assert!(json["generated_at"].is_string());
    }
}
