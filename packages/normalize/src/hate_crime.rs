//! Parsers for the `/hate-crime/` endpoint family.
//!
//! ```text
//! {
//!   "bias_section": {
//!     "offense_type": { "Intimidation": 23576, ... },
//!     "victim_type": { "Individual": 51234, ... }
//!   },
//!   "incident_section": {
//!     "bias": { "Anti-Black or African American": 17382, ... },
//!     "bias_category": { "Race/Ethnicity/Ancestry": 6460, ... }
//!   },
//!   "_yearly": [ { "year": 2020, "incidents": 8263, ... }, ... ]
//! }
//! ```
//!
//! The upstream endpoint only ever returns a range aggregate. Per-year
//! totals are built by querying each year separately, reducing each answer
//! with [`summarize_hate_crime_year`], merging with
//! [`merge_hate_crime_years`] and attaching the result under
//! [`YEARLY_FIELD`].

use std::collections::BTreeMap;

use crime_explorer_stats_models::{CategoryBreakdown, HateCrimeBreakdown, HateCrimeYearly};
use serde_json::{Map, Value};

use crate::values::{as_count, as_year, object_at, sum_values};

/// Side-channel field carrying the merged per-year totals.
pub const YEARLY_FIELD: &str = "_yearly";

/// Parses a hate-crime response into per-year totals and range breakdowns.
///
/// Never fails. Malformed `_yearly` entries are skipped; a non-object input
/// gives an empty breakdown.
#[must_use]
pub fn parse_hate_crime_response(raw: &Value) -> HateCrimeBreakdown {
    if !raw.is_object() {
        return HateCrimeBreakdown::default();
    }

    let yearly = raw
        .get(YEARLY_FIELD)
        .and_then(Value::as_array)
        .map(|entries| {
            merge_hate_crime_years(entries.iter().filter_map(parse_yearly_entry).collect())
        })
        .unwrap_or_default();

    let bias_categories = categories(object_at(raw, &["incident_section", "bias"]), false);
    let offense_types = categories(object_at(raw, &["bias_section", "offense_type"]), true);

    HateCrimeBreakdown {
        yearly,
        bias_categories,
        offense_types,
    }
}

fn parse_yearly_entry(entry: &Value) -> Option<HateCrimeYearly> {
    let obj = entry.as_object()?;
    let year = obj.get("year").and_then(as_year)?;
    let count = |name: &str| obj.get(name).map_or(0, as_count);

    Some(HateCrimeYearly {
        year,
        incidents: count("incidents"),
        offenses: count("offenses"),
        victims: count("victims"),
    })
}

/// Flattens a label → count map into descending-count pairs. Ties keep
/// upstream order.
fn categories(map: Option<&Map<String, Value>>, skip_zero: bool) -> Vec<CategoryBreakdown> {
    let Some(map) = map else {
        return Vec::new();
    };

    let mut out: Vec<CategoryBreakdown> = map
        .iter()
        .map(|(category, value)| CategoryBreakdown {
            category: category.clone(),
            count: as_count(value),
        })
        .filter(|c| !skip_zero || c.count > 0)
        .collect();

    out.sort_by(|a, b| b.count.cmp(&a.count));
    out
}

/// Reduces a single-year hate-crime response to its totals.
///
/// `incidents` sums `incident_section.bias_category`, `offenses` sums
/// `bias_section.offense_type` and `victims` sums `bias_section.victim_type`.
#[must_use]
pub fn summarize_hate_crime_year(year: i32, raw: &Value) -> HateCrimeYearly {
    HateCrimeYearly {
        year,
        incidents: sum_values(object_at(raw, &["incident_section", "bias_category"])),
        offenses: sum_values(object_at(raw, &["bias_section", "offense_type"])),
        victims: sum_values(object_at(raw, &["bias_section", "victim_type"])),
    }
}

/// Merges independently fetched per-year totals into one ascending,
/// year-unique sequence. When a year appears twice the first one wins.
#[must_use]
pub fn merge_hate_crime_years(years: Vec<HateCrimeYearly>) -> Vec<HateCrimeYearly> {
    let mut by_year: BTreeMap<i32, HateCrimeYearly> = BTreeMap::new();
    for entry in years {
        by_year.entry(entry.year).or_insert(entry);
    }
    by_year.into_values().collect()
}

/// Attaches merged per-year totals to a range aggregate under
/// [`YEARLY_FIELD`].
///
/// A non-object aggregate (e.g. upstream returned `null`) is replaced by an
/// object carrying only the per-year totals.
#[must_use]
pub fn attach_yearly(aggregate: Value, yearly: &[HateCrimeYearly]) -> Value {
    let mut obj = match aggregate {
        Value::Object(obj) => obj,
        _ => Map::new(),
    };
    let yearly = yearly
        .iter()
        .map(|y| {
            serde_json::json!({
                "year": y.year,
                "incidents": y.incidents,
                "offenses": y.offenses,
                "victims": y.victims,
            })
        })
        .collect();
    obj.insert(YEARLY_FIELD.to_string(), Value::Array(yearly));
    Value::Object(obj)
}
