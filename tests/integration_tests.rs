use emissions_dashboard::analyzers::aggregate::{
    average_energy_by_company, emissions_by_sector, energy_efficiency, top_emitters,
    total_emissions_by_year,
};
use emissions_dashboard::analyzers::analyzer::build_dashboard;
use emissions_dashboard::import::validate_import;
use emissions_dashboard::parser::{parse_csv, parse_records};

const FIXTURE: &str = include_str!("fixtures/emissions.csv");

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn test_full_pipeline() {
    // The short Delta Foods line is dropped by the parser, the Cobalt row
    // with a bad energy value is dropped by the validity filter.
    assert_eq!(parse_csv(FIXTURE).len(), 6);
    let records = parse_records(FIXTURE);
    assert_eq!(records.len(), 5);

    let years = total_emissions_by_year(&records);
    let years: Vec<i32> = years.iter().map(|y| y.year).collect();
    assert_eq!(years, vec![2021, 2022, 2023]);

    let top = top_emitters(&records, 2);
    assert_eq!(top.len(), 2);
    assert_eq!(top[0].company, "Borealis");
    assert!(close(top[0].total, 1800.5));
    assert_eq!(top[1].company, "Acme, Inc");

    let averages = average_energy_by_company(&records);
    assert_eq!(averages[0].company, "Borealis");
    assert!(close(averages[0].average, 1750.5));

    // Evergreen consumed no energy, so its ratio is pinned to zero.
    let efficiency = energy_efficiency(&records, 10);
    let evergreen = efficiency.iter().find(|e| e.company == "Evergreen").unwrap();
    assert_eq!(evergreen.efficiency, 0.0);
    assert_eq!(efficiency.last().unwrap().company, "Evergreen");

    let sectors = emissions_by_sector(&records);
    let sector_total: f64 = sectors.iter().map(|s| s.emissions).sum();
    let input_total: f64 = records.iter().map(|r| r.co2_emissions_tons).sum();
    assert!(close(sector_total, input_total));
    assert_eq!(sectors[0].sector, "Manufacturing");

    let dashboard = build_dashboard(&records, 3);
    assert_eq!(dashboard.record_count, 5);
    assert_eq!(dashboard.summary.unique_companies, 4);
    assert_eq!(dashboard.top_emitters.len(), 3);
}

#[test]
fn test_strict_import_reports_what_the_parser_skips() {
    let outcome = validate_import(FIXTURE, &[]).unwrap();

    assert_eq!(outcome.response.created, 5);
    assert_eq!(outcome.response.updated, 0);
    assert_eq!(outcome.response.errors.len(), 2);
    assert!(outcome.response.errors[0].starts_with("Row 6"));
    assert!(outcome.response.errors[0].contains("Invalid data format"));
    assert!(outcome.response.errors[1].starts_with("Row 7"));
    assert!(outcome.response.errors[1].contains("Missing required fields"));
}
