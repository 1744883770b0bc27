use crime_explorer_stats_models::{YearlyAggregate, YoyRow};

use crate::percent_change;
use crate::record::newest_first;

/// Number of prior years compared against the latest one.
pub const PRIOR_YEARS: usize = 3;

/// Compares the latest year's count against up to [`PRIOR_YEARS`] prior
/// years, newest first.
///
/// Each row's `change` is `latest - row` and `percent_change` is relative to
/// the row's count. Empty when fewer than two years are available.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn build_yoy_rows(aggregates: &[YearlyAggregate]) -> Vec<YoyRow> {
    let sorted = newest_first(aggregates);
    let Some((latest, prior)) = sorted.split_first() else {
        return Vec::new();
    };

    let latest_count = latest.count as f64;
    prior
        .iter()
        .take(PRIOR_YEARS)
        .map(|row| {
            let count = row.count as f64;
            YoyRow {
                year: row.year,
                count: row.count,
                rate: row.rate,
                change: latest_count - count,
                percent_change: percent_change(latest_count, count),
            }
        })
        .collect()
}
