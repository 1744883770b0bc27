//! Parser for the `/summarized/` endpoint family.
//!
//! Response structure (national scope shown; the labels embed the scope
//! name):
//!
//! ```text
//! {
//!   "offenses": {
//!     "rates": {
//!       "United States Offenses":   { "01-2020": 29.04, ... },
//!       "United States Clearances": { "01-2020": 12.49, ... }
//!     },
//!     "actuals": {
//!       "United States Offenses":   { "01-2020": 93386, ... },
//!       "United States Clearances": { "01-2020": 40185, ... }
//!     }
//!   },
//!   "populations": {
//!     "population": { "United States": { "01-2020": 332726731, ... } },
//!     "participated_population": { ... }
//!   }
//! }
//! ```
//!
//! Monthly buckets are folded into one [`YearlyAggregate`] per year. Counts
//! are summed; rates and populations are averaged over the months that
//! carry a numeric sample. The yearly rate is the mean of the upstream
//! monthly rates and is never derived from count and population, since the
//! two are sourced independently and months can be missing from either.
//!
//! A monthly rate or population that is `null` or not a number is left out
//! of its mean rather than counted as zero, so reporting gaps never pull
//! the yearly average down.

use std::collections::BTreeMap;

use crime_explorer_stats_models::YearlyAggregate;
use serde_json::{Map, Value};

use crate::keys::KeyMatcher;
use crate::period::parse_period_year;
use crate::values::{as_number, object_at, to_count};

/// Running totals for one year.
#[derive(Debug, Default, Clone, Copy)]
struct YearAccumulator {
    count: f64,
    clearances: f64,
    rate_sum: f64,
    rate_samples: u32,
    population_sum: f64,
    population_samples: u32,
}

impl YearAccumulator {
    fn finish(self, year: i32) -> YearlyAggregate {
        let rate = if self.rate_samples > 0 {
            round_to_cents(self.rate_sum / f64::from(self.rate_samples))
        } else {
            0.0
        };
        let population = if self.population_samples > 0 {
            to_count(self.population_sum / f64::from(self.population_samples))
        } else {
            0
        };

        YearlyAggregate {
            year,
            count: to_count(self.count),
            rate,
            clearances: to_count(self.clearances),
            population,
        }
    }
}

fn round_to_cents(n: f64) -> f64 {
    (n * 100.0).round() / 100.0
}

/// Picks one monthly series out of a label-keyed container.
fn select_series<'a>(
    container: Option<&'a Map<String, Value>>,
    matcher: KeyMatcher,
) -> Option<&'a Map<String, Value>> {
    let (found, value) = matcher.find(container?)?;
    log::trace!("series '{}' selected ({:?})", found.key, found.stage);
    value.as_object()
}

/// Feeds every parseable `MM-YYYY` bucket of `series` into `apply`.
fn fold_series<F>(
    years: &mut BTreeMap<i32, YearAccumulator>,
    series: Option<&Map<String, Value>>,
    mut apply: F,
) where
    F: FnMut(&mut YearAccumulator, &Value),
{
    let Some(series) = series else {
        return;
    };
    for (period, value) in series {
        let Some(year) = parse_period_year(period) else {
            log::trace!("skipping unparseable period '{period}'");
            continue;
        };
        apply(years.entry(year).or_default(), value);
    }
}

/// Parses a `/summarized/` response into yearly aggregates, ascending by
/// year.
///
/// Returns an empty sequence when `raw` is not an object or lacks the
/// `offenses` or `populations` containers. Never fails: unparseable periods
/// are skipped and missing values are zero-filled.
#[must_use]
pub fn parse_summarized_response(raw: &Value) -> Vec<YearlyAggregate> {
    if object_at(raw, &["offenses"]).is_none() || object_at(raw, &["populations"]).is_none() {
        return Vec::new();
    }

    let actuals = object_at(raw, &["offenses", "actuals"]);
    let rates = object_at(raw, &["offenses", "rates"]);
    let population = object_at(raw, &["populations", "population"]);

    let monthly_counts = select_series(actuals, KeyMatcher::OFFENSES);
    let monthly_clearances = select_series(actuals, KeyMatcher::CLEARANCES);
    let monthly_rates = select_series(rates, KeyMatcher::OFFENSES);
    let monthly_population = select_series(population, KeyMatcher::ANY);

    let mut years: BTreeMap<i32, YearAccumulator> = BTreeMap::new();

    fold_series(&mut years, monthly_counts, |acc, v| {
        acc.count += as_number(v).unwrap_or(0.0);
    });
    fold_series(&mut years, monthly_clearances, |acc, v| {
        acc.clearances += as_number(v).unwrap_or(0.0);
    });
    fold_series(&mut years, monthly_rates, |acc, v| {
        if let Some(rate) = as_number(v) {
            acc.rate_sum += rate;
            acc.rate_samples += 1;
        }
    });
    fold_series(&mut years, monthly_population, |acc, v| {
        if let Some(pop) = as_number(v) {
            acc.population_sum += pop;
            acc.population_samples += 1;
        }
    });

    years
        .into_iter()
        .map(|(year, acc)| acc.finish(year))
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn yearly(year: i32, count: u64, rate: f64, clearances: u64, population: u64) -> YearlyAggregate {
        YearlyAggregate {
            year,
            count,
            rate,
            clearances,
            population,
        }
    }

    #[test]
    fn end_to_end_single_year() {
        let raw = json!({
            "offenses": {
                "actuals": {
                    "X Offenses": { "01-2020": 100, "02-2020": 100 },
                    "X Clearances": { "01-2020": 40 }
                },
                "rates": {
                    "X Offenses": { "01-2020": 30, "02-2020": 34 }
                }
            },
            "populations": {
                "population": {
                    "X": { "01-2020": 300_000, "02-2020": 300_000 }
                }
            }
        });

        assert_eq!(
            parse_summarized_response(&raw),
            vec![yearly(2020, 200, 32.0, 40, 300_000)]
        );
    }

    #[test]
    fn rate_is_mean_of_monthly_samples_not_sum() {
        let raw = json!({
            "offenses": {
                "actuals": {},
                "rates": { "US Offenses": { "01-2019": 10, "02-2019": 20, "03-2019": 30 } }
            },
            "populations": {}
        });
        let parsed = parse_summarized_response(&raw);
        assert_eq!(parsed.len(), 1);
        assert!((parsed[0].rate - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn count_is_sum_of_monthly_counts() {
        let raw = json!({
            "offenses": {
                "actuals": { "US Offenses": { "01-2019": 100, "02-2019": 150, "03-2019": 50 } }
            },
            "populations": {}
        });
        assert_eq!(parse_summarized_response(&raw)[0].count, 300);
    }

    #[test]
    fn rate_is_rounded_to_two_decimals() {
        let raw = json!({
            "offenses": {
                "rates": { "US Offenses": { "01-2019": 10, "02-2019": 10, "03-2019": 11 } }
            },
            "populations": {}
        });
        assert!((parse_summarized_response(&raw)[0].rate - 10.33).abs() < 1e-9);
    }

    #[test]
    fn population_is_rounded_mean() {
        let raw = json!({
            "offenses": {},
            "populations": {
                "population": { "Texas": { "01-2021": 100, "02-2021": 101 } }
            }
        });
        assert_eq!(parse_summarized_response(&raw)[0].population, 101);
    }

    #[test]
    fn clearances_never_cross_into_counts() {
        let raw = json!({
            "offenses": {
                "actuals": {
                    "State Clearances": { "01-2020": 7 },
                    "State Offenses": { "01-2020": 90 }
                },
                "rates": {
                    "State Clearances": { "01-2020": 1.5 },
                    "State Offenses": { "01-2020": 12.25 }
                }
            },
            "populations": {}
        });
        let parsed = parse_summarized_response(&raw);
        assert_eq!(parsed[0].count, 90);
        assert_eq!(parsed[0].clearances, 7);
        assert!((parsed[0].rate - 12.25).abs() < f64::EPSILON);
    }

    #[test]
    fn missing_clearance_series_leaves_zero() {
        let raw = json!({
            "offenses": { "actuals": { "State Offenses": { "01-2020": 90 } } },
            "populations": {}
        });
        assert_eq!(parse_summarized_response(&raw)[0].clearances, 0);
    }

    #[test]
    fn missing_containers_yield_empty() {
        assert!(parse_summarized_response(&json!(null)).is_empty());
        assert!(parse_summarized_response(&json!([1, 2, 3])).is_empty());
        assert!(parse_summarized_response(&json!("offenses")).is_empty());
        assert!(parse_summarized_response(&json!({})).is_empty());
        assert!(
            parse_summarized_response(&json!({
                "offenses": { "actuals": { "X Offenses": { "01-2020": 1 } } }
            }))
            .is_empty()
        );
        assert!(
            parse_summarized_response(&json!({
                "populations": { "population": { "X": { "01-2020": 1 } } }
            }))
            .is_empty()
        );
    }

    #[test]
    fn malformed_period_keys_are_skipped() {
        let raw = json!({
            "offenses": {
                "actuals": {
                    "X Offenses": { "01-2020": 5, "2020-02": 1000, "total": 9999 }
                }
            },
            "populations": {}
        });
        let parsed = parse_summarized_response(&raw);
        assert_eq!(parsed, vec![yearly(2020, 5, 0.0, 0, 0)]);
    }

    #[test]
    fn out_of_order_buckets_sort_ascending() {
        let raw = json!({
            "offenses": {
                "actuals": {
                    "X Offenses": { "06-2021": 3, "01-2020": 1, "03-2022": 4, "02-2020": 1 }
                }
            },
            "populations": {}
        });
        let years: Vec<i32> = parse_summarized_response(&raw)
            .iter()
            .map(|y| y.year)
            .collect();
        assert_eq!(years, vec![2020, 2021, 2022]);
    }

    #[test]
    fn year_only_in_population_is_zero_filled() {
        let raw = json!({
            "offenses": { "actuals": { "X Offenses": { "01-2020": 10 } } },
            "populations": { "population": { "X": { "01-2019": 500 } } }
        });
        assert_eq!(
            parse_summarized_response(&raw),
            vec![yearly(2019, 0, 0.0, 0, 500), yearly(2020, 10, 0.0, 0, 0)]
        );
    }

    #[test]
    fn null_monthly_samples_do_not_dilute_means() {
        let raw = json!({
            "offenses": {
                "rates": { "X Offenses": { "01-2020": 30, "02-2020": null } }
            },
            "populations": {
                "population": { "X": { "01-2020": 1000, "02-2020": null } }
            }
        });
        let parsed = parse_summarized_response(&raw);
        assert!((parsed[0].rate - 30.0).abs() < f64::EPSILON);
        assert_eq!(parsed[0].population, 1000);
    }

    #[test]
    fn numeric_strings_are_accepted() {
        let raw = json!({
            "offenses": { "actuals": { "X Offenses": { "01-2020": "12", "02-2020": "8" } } },
            "populations": {}
        });
        assert_eq!(parse_summarized_response(&raw)[0].count, 20);
    }

    #[test]
    fn parsing_is_idempotent() {
        let raw = json!({
            "offenses": {
                "actuals": {
                    "X Offenses": { "01-2020": 100, "05-2021": 7 },
                    "X Clearances": { "01-2020": 40 }
                },
                "rates": { "X Offenses": { "01-2020": 30, "05-2021": 2.5 } }
            },
            "populations": { "population": { "X": { "01-2020": 300_000 } } }
        });
        assert_eq!(
            parse_summarized_response(&raw),
            parse_summarized_response(&raw)
        );
    }
}
