#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Derived metrics over normalized yearly records.
//!
//! Everything here is a pure function of its inputs: per-capita rates,
//! year-over-year changes, trend series, headline KPIs, comparison tables,
//! category shares, choropleth rows and display formatting. The sample
//! dataset used when upstream cannot answer lives in [`sample`].

pub mod breakdown;
pub mod format;
pub mod kpi;
pub mod record;
pub mod sample;
pub mod state_map;
pub mod trend;
pub mod yoy;

use crime_explorer_stats_models::YearOverYearChange;

pub use breakdown::build_demographic_breakdown;
pub use format::{format_kpi_value, format_number, format_percent, format_rate};
pub use kpi::{build_kpi, build_rate_kpi, compute_latest_comparison, yearly_kpis};
pub use record::YearlyRecord;
pub use state_map::state_map_entry;
pub use trend::build_trend_data;
pub use yoy::build_yoy_rows;

/// Population base for per-capita rates.
pub const RATE_PER: f64 = 100_000.0;

/// Offenses per 100,000 residents, `0` when `population` is not positive.
#[must_use]
pub fn compute_rate(count: f64, population: f64) -> f64 {
    if population > 0.0 {
        count / population * RATE_PER
    } else {
        0.0
    }
}

/// Percentage change from `previous` to `current`, `0` when `previous` is
/// not positive.
#[must_use]
pub fn percent_change(current: f64, previous: f64) -> f64 {
    if previous > 0.0 {
        (current - previous) / previous * 100.0
    } else {
        0.0
    }
}

/// Absolute and relative change from `previous` to `current`.
#[must_use]
pub fn year_over_year_change(current: f64, previous: f64) -> YearOverYearChange {
    YearOverYearChange {
        delta: current - previous,
        percent: percent_change(current, previous),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_per_hundred_thousand() {
        assert!((compute_rate(500.0, 1_000_000.0) - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn zero_population_gives_zero_rate() {
        assert!(compute_rate(123.0, 0.0).abs() < f64::EPSILON);
        assert!(compute_rate(123.0, -5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn change_against_zero_previous_is_zero_percent() {
        let change = year_over_year_change(42.0, 0.0);
        assert!((change.delta - 42.0).abs() < f64::EPSILON);
        assert!(change.percent.abs() < f64::EPSILON);
    }

    #[test]
    fn change_percent() {
        let change = year_over_year_change(90.0, 120.0);
        assert!((change.delta + 30.0).abs() < f64::EPSILON);
        assert!((change.percent + 25.0).abs() < f64::EPSILON);
    }
}
