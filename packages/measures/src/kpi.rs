//! Headline metrics comparing the latest year with the one before it.

use crime_explorer_stats_models::{
    AggregateField, KpiFormat, KpiMetric, LatestComparison, YearlyAggregate,
};

use crate::record::{YearlyRecord, newest_first};
use crate::{compute_rate, percent_change};

/// The latest and previous values of one column.
///
/// `current` is `0` when `records` is empty or the latest record does not
/// carry the column. `previous` is `None` when fewer than two years are
/// available.
#[must_use]
pub fn compute_latest_comparison<R: YearlyRecord>(
    records: &[R],
    field: R::Field,
) -> LatestComparison {
    let sorted = newest_first(records);
    let current = sorted
        .first()
        .and_then(|r| r.value(field))
        .unwrap_or(0.0);
    let previous = sorted.get(1).map(|r| r.value(field).unwrap_or(0.0));

    LatestComparison {
        current,
        previous,
        pct_change: previous.map_or(0.0, |prev| percent_change(current, prev)),
    }
}

/// Builds a KPI for one column.
#[must_use]
pub fn build_kpi<R: YearlyRecord>(
    records: &[R],
    field: R::Field,
    label: &str,
    format: KpiFormat,
) -> KpiMetric {
    let comparison = compute_latest_comparison(records, field);
    KpiMetric {
        label: label.to_string(),
        value: comparison.current,
        previous_value: comparison.previous,
        format,
        invert_color: false,
    }
}

/// Builds a KPI for one column expressed per 100,000 residents.
#[must_use]
pub fn build_rate_kpi<R: YearlyRecord>(records: &[R], field: R::Field, label: &str) -> KpiMetric {
    let sorted = newest_first(records);
    let rate_of = |r: &&R| compute_rate(r.value(field).unwrap_or(0.0), r.population());

    KpiMetric {
        label: label.to_string(),
        value: sorted.first().map_or(0.0, rate_of),
        previous_value: sorted.get(1).map(rate_of),
        format: KpiFormat::Rate,
        invert_color: false,
    }
}

/// Count, rate and clearance KPIs for a summarized series.
#[must_use]
pub fn yearly_kpis(aggregates: &[YearlyAggregate]) -> Vec<KpiMetric> {
    vec![
        build_kpi(aggregates, AggregateField::Count, "Total Offenses", KpiFormat::Number),
        build_kpi(aggregates, AggregateField::Rate, "Rate per 100K", KpiFormat::Rate),
        build_kpi(aggregates, AggregateField::Clearances, "Clearances", KpiFormat::Number),
    ]
}
