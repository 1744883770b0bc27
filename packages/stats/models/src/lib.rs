#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Normalized yearly records and derived-metric result types.
//!
//! The normalizer produces [`YearlyAggregate`] and [`HateCrimeYearly`]
//! sequences from upstream payloads; the measures crate turns those into
//! [`TrendPoint`]s, [`KpiMetric`]s and comparison rows. All of these are
//! serialized as JSON for the proxy API.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// One calendar year of a summarized (scope, crime type) query.
///
/// `rate` is the mean of the monthly upstream rate samples for the year. It
/// is never recomputed from `count` and `population`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyAggregate {
    pub year: i32,
    /// Sum of monthly offense counts.
    pub count: u64,
    /// Mean monthly rate per 100,000, rounded to 2 decimals.
    pub rate: f64,
    /// Sum of monthly clearance counts.
    pub clearances: u64,
    /// Mean monthly population, rounded to the nearest integer.
    pub population: u64,
}

/// Numeric columns of a [`YearlyAggregate`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AggregateField {
    Count,
    Rate,
    Clearances,
    Population,
}

impl YearlyAggregate {
    /// Reads one numeric column as `f64`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn get(&self, field: AggregateField) -> f64 {
        match field {
            AggregateField::Count => self.count as f64,
            AggregateField::Rate => self.rate,
            AggregateField::Clearances => self.clearances as f64,
            AggregateField::Population => self.population as f64,
        }
    }
}

/// Hate-crime totals for one year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HateCrimeYearly {
    pub year: i32,
    /// Sum of incidents across bias categories.
    #[serde(default)]
    pub incidents: u64,
    /// Sum of offenses across offense types.
    #[serde(default)]
    pub offenses: u64,
    /// Sum of victims across victim types.
    #[serde(default)]
    pub victims: u64,
}

/// A labelled count, e.g. one bias motivation or one offense type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    pub category: String,
    pub count: u64,
}

/// Parsed hate-crime response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HateCrimeBreakdown {
    /// Per-year totals, ascending by year.
    pub yearly: Vec<HateCrimeYearly>,
    /// Incident counts by bias motivation, descending by count.
    pub bias_categories: Vec<CategoryBreakdown>,
    /// Non-zero offense counts by offense type, descending by count.
    pub offense_types: Vec<CategoryBreakdown>,
}

/// A single point of a trend chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub year: i32,
    pub value: f64,
    /// Value per 100,000 residents; absent when population is unknown.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate: Option<f64>,
}

/// How a KPI value should be displayed.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum KpiFormat {
    /// Integer with thousands separators.
    #[default]
    Number,
    /// One decimal place.
    Rate,
    /// Signed percentage with one decimal place.
    Percent,
}

/// A headline metric comparing the latest year against the year before.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiMetric {
    pub label: String,
    pub value: f64,
    /// Absent when fewer than two years are available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_value: Option<f64>,
    pub format: KpiFormat,
    /// `true` when an increase is good news.
    #[serde(default)]
    pub invert_color: bool,
}

/// Difference between two values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearOverYearChange {
    /// `current - previous`.
    pub delta: f64,
    /// Percentage change, `0` when `previous` is not positive.
    pub percent: f64,
}

/// Latest-versus-previous values of one column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestComparison {
    pub current: f64,
    pub previous: Option<f64>,
    pub pct_change: f64,
}

/// One comparison row of a year-over-year table.
///
/// `change` and `percent_change` compare the latest year against `year`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YoyRow {
    pub year: i32,
    pub count: u64,
    pub rate: f64,
    pub change: f64,
    pub percent_change: f64,
}

/// A category's share of a total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemographicBreakdown {
    pub category: String,
    pub value: u64,
    /// Share of the total in percent, `0` when the total is `0`.
    pub percentage: f64,
}

/// A reporting agency from the upstream roster.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgencyListItem {
    /// Unique agency identifier (ORI).
    pub ori: String,
    pub agency_name: String,
    pub agency_type_name: String,
    pub state_abbr: String,
    pub state_name: String,
    pub county_name: String,
    pub division_name: String,
    pub region_name: String,
    pub region_desc: String,
    /// Whether the agency reports incident-level (NIBRS) data.
    pub nibrs: bool,
    pub latitude: f64,
    pub longitude: f64,
}

/// Where a displayed dataset came from.
///
/// "Upstream answered with nothing" and "upstream could not be reached" are
/// different states and are reported separately.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum DataOrigin {
    /// Upstream returned data.
    Live,
    /// Upstream answered but had no rows for the query.
    NoData,
    /// Upstream failed or could not be reached.
    Unavailable,
}

impl DataOrigin {
    /// Whether a display should substitute sample data.
    #[must_use]
    pub const fn is_fallback(self) -> bool {
        !matches!(self, Self::Live)
    }
}
