//! Column access shared by the two yearly record shapes.

use crime_explorer_crime_models::{CrimeSummary, SummaryField};
use crime_explorer_stats_models::{AggregateField, YearlyAggregate};

/// A per-year record with selectable numeric columns.
///
/// Implemented for the denormalized [`CrimeSummary`] rows of the estimate
/// endpoints and the [`YearlyAggregate`] rows of the summarized endpoint, so
/// the trend and KPI builders work on either.
pub trait YearlyRecord {
    /// Column selector.
    type Field: Copy;

    fn year(&self) -> i32;

    /// The column's value, `None` when the record does not carry it.
    fn value(&self, field: Self::Field) -> Option<f64>;

    /// Population the record's counts are relative to.
    fn population(&self) -> f64;
}

impl YearlyRecord for CrimeSummary {
    type Field = SummaryField;

    fn year(&self) -> i32 {
        self.year
    }

    #[allow(clippy::cast_precision_loss)]
    fn value(&self, field: SummaryField) -> Option<f64> {
        self.get(field).map(|v| v as f64)
    }

    #[allow(clippy::cast_precision_loss)]
    fn population(&self) -> f64 {
        self.population as f64
    }
}

impl YearlyRecord for YearlyAggregate {
    type Field = AggregateField;

    fn year(&self) -> i32 {
        self.year
    }

    fn value(&self, field: AggregateField) -> Option<f64> {
        Some(self.get(field))
    }

    #[allow(clippy::cast_precision_loss)]
    fn population(&self) -> f64 {
        self.population as f64
    }
}

/// References to `records` ordered newest first.
pub(crate) fn newest_first<R: YearlyRecord>(records: &[R]) -> Vec<&R> {
    let mut sorted: Vec<&R> = records.iter().collect();
    sorted.sort_by_key(|r| std::cmp::Reverse(r.year()));
    sorted
}
