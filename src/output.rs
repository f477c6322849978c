//! Output formatting and persistence for dashboard reports.
//!
//! Supports pretty-printing, JSON serialization, and per-projection CSV export.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info};

use crate::analyzers::types::Dashboard;
use csv::WriterBuilder;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Logs a dashboard using Rust's debug pretty-print format.
pub fn print_pretty(dashboard: &Dashboard) {
    debug!("{:#?}", dashboard);
}

/// Logs any serializable value as pretty-printed JSON.
pub fn print_json(value: &impl Serialize) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Logs the dashboard as a short human-readable summary.
pub fn print_summary(dashboard: &Dashboard) {
    let s = &dashboard.summary;
    info!(
        total_emissions = %format!("{:.2}", s.total_emissions),
        total_energy = %format!("{:.2}", s.total_energy),
        companies = s.unique_companies,
        avg_emissions_per_company = %format!("{:.2}", s.avg_emissions_per_company),
        "Summary"
    );
    for y in &dashboard.emissions_by_year {
        info!(year = y.year, total = %format!("{:.2}", y.total), "Emissions by year");
    }
    for t in &dashboard.top_emitters {
        info!(company = %t.company, total = %format!("{:.2}", t.total), "Top emitter");
    }
    for e in &dashboard.energy_efficiency {
        info!(company = %e.company, tonnes_per_mwh = %format!("{:.4}", e.efficiency), "Efficiency");
    }
    for sector in &dashboard.emissions_by_sector {
        info!(
            sector = %sector.sector,
            emissions = %format!("{:.2}", sector.emissions),
            energy = %format!("{:.2}", sector.energy),
            "Sector"
        );
    }
}

/// Writes `rows` to a new CSV file at `path`, replacing any existing file.
pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    debug!(path = %path.display(), rows = rows.len(), "Writing CSV");

    let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(file);

    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(())
}

/// Writes one CSV per projection into `dir`, creating it if needed.
///
/// Returns the paths written.
pub fn export_dashboard(dir: &Path, dashboard: &Dashboard) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;

    let written = vec![
        write_rows(dir, "emissions_by_year.csv", &dashboard.emissions_by_year)?,
        write_rows(dir, "average_energy.csv", &dashboard.average_energy)?,
        write_rows(dir, "top_emitters.csv", &dashboard.top_emitters)?,
        write_rows(dir, "energy_efficiency.csv", &dashboard.energy_efficiency)?,
        write_rows(dir, "emissions_by_sector.csv", &dashboard.emissions_by_sector)?,
    ];

    info!(dir = %dir.display(), files = written.len(), "Dashboard exported");
    Ok(written)
}

fn write_rows<T: Serialize>(dir: &Path, name: &str, rows: &[T]) -> Result<PathBuf> {
    let path = dir.join(name);
    write_csv(&path, rows).with_context(|| format!("Failed to export {name}"))?;
    Ok(path)
}
