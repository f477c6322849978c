use crate::analyzers::types::{
    CompanyAverage, CompanyEfficiency, CompanyTotal, SectorAggregate, YearTotal,
};
use crate::analyzers::utility::{mean, ratio_or_zero};
use crate::record::EmissionRecord;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

/// Running sums for one group of records.
#[derive(Debug, Default, Clone, Copy)]
struct Totals {
    energy: f64,
    emissions: f64,
    records: usize,
}

/// Groups records by a string key, keeping groups in first-encounter order.
///
/// Sums are accumulated in input order, so results are reproducible.
fn totals_by<'a>(
    records: &'a [EmissionRecord],
    key: impl Fn(&'a EmissionRecord) -> &'a str,
) -> Vec<(&'a str, Totals)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(&str, Totals)> = Vec::new();

    for record in records {
        let k = key(record);
        let slot = *index.entry(k).or_insert_with(|| {
            groups.push((k, Totals::default()));
            groups.len() - 1
        });

        let totals = &mut groups[slot].1;
        totals.energy += record.energy_consumption_mwh;
        totals.emissions += record.co2_emissions_tons;
        totals.records += 1;
    }

    groups
}

/// Sorts descending by `metric`; equal values keep first-encounter order.
///
/// `0.0` and `-0.0` compare equal. Inputs are NaN-free (the parser filters them).
fn rank_descending<T>(items: Vec<T>, metric: impl Fn(&T) -> f64) -> Vec<T> {
    let mut ranked: Vec<(usize, T)> = items.into_iter().enumerate().collect();
    ranked.sort_by(|(ia, a), (ib, b)| {
        metric(b)
            .partial_cmp(&metric(a))
            .unwrap_or(Ordering::Equal)
            .then(ia.cmp(ib))
    });
    ranked.into_iter().map(|(_, item)| item).collect()
}

/// Sums CO₂ emissions per year, ascending by year.
pub fn total_emissions_by_year(records: &[EmissionRecord]) -> Vec<YearTotal> {
    let mut years: BTreeMap<i32, f64> = BTreeMap::new();
    for record in records {
        *years.entry(record.year).or_default() += record.co2_emissions_tons;
    }

    years
        .into_iter()
        .map(|(year, total)| YearTotal { year, total })
        .collect()
}

/// Mean energy consumption per company (sum over record count), descending.
pub fn average_energy_by_company(records: &[EmissionRecord]) -> Vec<CompanyAverage> {
    let averages = totals_by(records, |r| r.company.as_str())
        .into_iter()
        .map(|(company, t)| CompanyAverage {
            company: company.to_string(),
            average: mean(t.energy, t.records),
        })
        .collect();

    rank_descending(averages, |a| a.average)
}

/// The `limit` companies with the highest summed emissions.
///
/// A `limit` beyond the number of companies returns all of them.
pub fn top_emitters(records: &[EmissionRecord], limit: usize) -> Vec<CompanyTotal> {
    let totals = totals_by(records, |r| r.company.as_str())
        .into_iter()
        .map(|(company, t)| CompanyTotal {
            company: company.to_string(),
            total: t.emissions,
        })
        .collect();

    let mut ranked = rank_descending(totals, |t| t.total);
    ranked.truncate(limit);
    ranked
}

/// Emissions per MWh for each company, highest (least efficient) first.
///
/// A company whose summed energy is exactly zero gets a ratio of zero.
pub fn energy_efficiency(records: &[EmissionRecord], limit: usize) -> Vec<CompanyEfficiency> {
    let ratios = totals_by(records, |r| r.company.as_str())
        .into_iter()
        .map(|(company, t)| CompanyEfficiency {
            company: company.to_string(),
            efficiency: ratio_or_zero(t.emissions, t.energy),
        })
        .collect();

    let mut ranked = rank_descending(ratios, |e| e.efficiency);
    ranked.truncate(limit);
    ranked
}

/// Emission and energy totals for every sector, descending by emissions.
pub fn emissions_by_sector(records: &[EmissionRecord]) -> Vec<SectorAggregate> {
    let sectors = totals_by(records, |r| r.sector.as_str())
        .into_iter()
        .map(|(sector, t)| SectorAggregate {
            sector: sector.to_string(),
            emissions: t.emissions,
            energy: t.energy,
        })
        .collect();

    rank_descending(sectors, |s| s.emissions)
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

    fn sample() -> Vec<EmissionRecord> {
        vec![
            record("A", 2020, "Energy", 100.0, 10.0),
            record("A", 2020, "Energy", 50.0, 5.0),
            record("B", 2021, "Tech", 200.0, 40.0),
        ]
    }

    #[test]
    fn test_year_totals_ascending() {
        assert_eq!(
            total_emissions_by_year(&sample()),
            vec![
                YearTotal { year: 2020, total: 15.0 },
                YearTotal { year: 2021, total: 40.0 },
            ]
        );
    }

    #[test]
    fn test_year_totals_sorted_even_when_input_is_not() {
        let records = vec![
            record("A", 2022, "X", 1.0, 3.0),
            record("A", 2019, "X", 1.0, 1.0),
            record("B", 2022, "X", 1.0, 2.0),
        ];
        let years: Vec<_> = total_emissions_by_year(&records)
            .into_iter()
            .map(|y| (y.year, y.total))
            .collect();
        assert_eq!(years, vec![(2019, 1.0), (2022, 5.0)]);
    }

    #[test]
    fn test_company_averages_divide_by_record_count() {
        assert_eq!(
            average_energy_by_company(&sample()),
            vec![
                CompanyAverage { company: "B".into(), average: 200.0 },
                CompanyAverage { company: "A".into(), average: 75.0 },
            ]
        );
    }

    #[test]
    fn test_top_emitters_limit() {
        assert_eq!(
            top_emitters(&sample(), 1),
            vec![CompanyTotal { company: "B".into(), total: 40.0 }]
        );
    }

    #[test]
    fn test_top_emitters_limit_beyond_company_count_returns_all() {
        let top = top_emitters(&sample(), 10);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].company, "B");
        assert_eq!(top[1].company, "A");
        assert_eq!(top[1].total, 15.0);
    }

    #[test]
    fn test_top_emitters_zero_limit_is_empty() {
        assert!(top_emitters(&sample(), 0).is_empty());
    }

    #[test]
    fn test_ties_keep_first_encounter_order() {
        let records = vec![
            record("C", 2020, "X", 1.0, 5.0),
            record("A", 2020, "X", 1.0, 9.0),
            record("B", 2020, "X", 1.0, 5.0),
            record("D", 2020, "X", 1.0, 5.0),
        ];
        let names: Vec<_> = top_emitters(&records, 3)
            .into_iter()
            .map(|t| t.company)
            .collect();
        assert_eq!(names, vec!["A", "C", "B"]);

        let names: Vec<_> = average_energy_by_company(&records)
            .into_iter()
            .map(|a| a.company)
            .collect();
        assert_eq!(names, vec!["C", "A", "B", "D"]);
    }

    #[test]
    fn test_efficiency_ratio_and_zero_energy_sentinel() {
        let records = vec![
            record("A", 2020, "X", 100.0, 10.0),
            record("Z", 2020, "X", 0.0, 500.0),
            record("B", 2020, "X", 200.0, 40.0),
        ];
        assert_eq!(
            energy_efficiency(&records, 5),
            vec![
                CompanyEfficiency { company: "B".into(), efficiency: 0.2 },
                CompanyEfficiency { company: "A".into(), efficiency: 0.1 },
                CompanyEfficiency { company: "Z".into(), efficiency: 0.0 },
            ]
        );
    }

    #[test]
    fn test_signed_zero_ratios_tie_in_encounter_order() {
        let records = vec![
            record("First", 2020, "X", -5.0, 0.0),
            record("Second", 2020, "X", 0.0, 9.0),
        ];
        let names: Vec<_> = energy_efficiency(&records, 5)
            .into_iter()
            .map(|e| e.company)
            .collect();
        assert_eq!(names, vec!["First", "Second"]);
    }

    #[test]
    fn test_efficiency_respects_limit() {
        let top = energy_efficiency(&sample(), 1);
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].company, "B");
    }

    #[test]
    fn test_sector_totals_descending_by_emissions() {
        assert_eq!(
            emissions_by_sector(&sample()),
            vec![
                SectorAggregate { sector: "Tech".into(), emissions: 40.0, energy: 200.0 },
                SectorAggregate { sector: "Energy".into(), emissions: 15.0, energy: 150.0 },
            ]
        );
    }

    #[test]
    fn test_sector_totals_conserve_emissions() {
        let records = vec![
            record("A", 2020, "Energy", 12.5, 3.25),
            record("B", 2021, "Tech", 7.0, 1.5),
            record("C", 2021, "Energy", 1.0, 0.25),
            record("D", 2022, "Retail", 4.0, 8.0),
        ];
        let input: f64 = records.iter().map(|r| r.co2_emissions_tons).sum();
        let sectors: f64 = emissions_by_sector(&records).iter().map(|s| s.emissions).sum();
        assert_eq!(input, sectors);
    }

    #[test]
    fn test_empty_input_gives_empty_outputs() {
        assert!(total_emissions_by_year(&[]).is_empty());
        assert!(average_energy_by_company(&[]).is_empty());
        assert!(top_emitters(&[], 5).is_empty());
        assert!(energy_efficiency(&[], 5).is_empty());
        assert!(emissions_by_sector(&[]).is_empty());
    }

    #[test]
    fn test_aggregators_are_idempotent() {
        let records = sample();
        let before = records.clone();

        assert_eq!(total_emissions_by_year(&records), total_emissions_by_year(&records));
        assert_eq!(average_energy_by_company(&records), average_energy_by_company(&records));
        assert_eq!(top_emitters(&records, 2), top_emitters(&records, 2));
        assert_eq!(energy_efficiency(&records, 2), energy_efficiency(&records, 2));
        assert_eq!(emissions_by_sector(&records), emissions_by_sector(&records));
        assert_eq!(records, before);
    }
}
