//! Emissions aggregation.
//!
//! Groups records by year, company, or sector and reduces each group to the
//! projections the dashboard charts consume.

pub mod aggregate;
pub mod analyzer;
pub mod types;
pub mod utility;
