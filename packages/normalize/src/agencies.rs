//! Parser for the `/agency/byStateAbbr/{abbr}` roster.
//!
//! The roster groups agencies by county:
//!
//! ```text
//! {
//!   "BERNALILLO": [ { "ori": "NM0010100", "agency_name": "...", ... } ],
//!   "SANTA FE":   [ ... ]
//! }
//! ```
//!
//! Field names drift between deployments (`counties` vs `county_name`,
//! `is_nibrs` vs `nibrs`); the first present name wins.

use crime_explorer_stats_models::AgencyListItem;
use serde_json::{Map, Value};

use crate::values::{flag_field, number_field, text_field};

fn parse_agency(obj: &Map<String, Value>) -> AgencyListItem {
    AgencyListItem {
        ori: text_field(obj, &["ori"]),
        agency_name: text_field(obj, &["agency_name"]),
        agency_type_name: text_field(obj, &["agency_type_name"]),
        state_abbr: text_field(obj, &["state_abbr"]),
        state_name: text_field(obj, &["state_name"]),
        county_name: text_field(obj, &["counties", "county_name"]),
        division_name: text_field(obj, &["division_name"]),
        region_name: text_field(obj, &["region_name"]),
        region_desc: text_field(obj, &["region_desc"]),
        nibrs: flag_field(obj, &["is_nibrs", "nibrs"]),
        latitude: number_field(obj, &["latitude"]),
        longitude: number_field(obj, &["longitude"]),
    }
}

fn parse_group(group: &[Value], out: &mut Vec<AgencyListItem>) {
    out.extend(group.iter().filter_map(Value::as_object).map(parse_agency));
}

/// Flattens a county-grouped roster into one list, in upstream order.
///
/// A bare array of agencies is accepted as well. Non-array groups and
/// non-object entries are ignored.
#[must_use]
pub fn flatten_agencies(raw: &Value) -> Vec<AgencyListItem> {
    let mut out = Vec::new();
    match raw {
        Value::Array(group) => parse_group(group, &mut out),
        Value::Object(counties) => {
            for group in counties.values().filter_map(Value::as_array) {
                parse_group(group, &mut out);
            }
        }
        _ => {}
    }
    out
}

/// Filters agencies by a case-insensitive substring of name, ORI, county,
/// agency type or state name, returning at most `limit` matches.
///
/// A blank query returns the first `limit` agencies.
#[must_use]
pub fn search_agencies<'a>(
    agencies: &'a [AgencyListItem],
    query: &str,
    limit: usize,
) -> Vec<&'a AgencyListItem> {
    let query = query.trim().to_lowercase();
    agencies
        .iter()
        .filter(|a| {
            query.is_empty()
                || [
                    &a.agency_name,
                    &a.ori,
                    &a.county_name,
                    &a.agency_type_name,
                    &a.state_name,
                ]
                .iter()
                .any(|field| field.to_lowercase().contains(&query))
        })
        .take(limit)
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn roster() -> Value {
        json!({
            "BERNALILLO": [
                {
                    "ori": "NM0010100",
                    "agency_name": "Albuquerque Police Department",
                    "agency_type_name": "City",
                    "state_abbr": "NM",
                    "state_name": "New Mexico",
                    "counties": "BERNALILLO",
                    "is_nibrs": true,
                    "latitude": 35.08,
                    "longitude": -106.65
                }
            ],
            "SANTA FE": [
                {
                    "ori": "NM0260000",
                    "agency_name": "Santa Fe County Sheriff's Office",
                    "agency_type_name": "County",
                    "state_abbr": "NM",
                    "state_name": "New Mexico",
                    "county_name": "SANTA FE",
                    "nibrs": false
                },
                "not an agency"
            ],
            "meta": { "count": 2 }
        })
    }

    #[test]
    fn flattens_county_groups_in_order() {
        let agencies = flatten_agencies(&roster());
        let oris: Vec<&str> = agencies.iter().map(|a| a.ori.as_str()).collect();
        assert_eq!(oris, vec!["NM0010100", "NM0260000"]);
    }

    #[test]
    fn applies_field_fallbacks() {
        let agencies = flatten_agencies(&roster());
        assert_eq!(agencies[0].county_name, "BERNALILLO");
        assert!(agencies[0].nibrs);
        assert!((agencies[0].latitude - 35.08).abs() < f64::EPSILON);

        assert_eq!(agencies[1].county_name, "SANTA FE");
        assert!(!agencies[1].nibrs);
        assert!(agencies[1].longitude.abs() < f64::EPSILON);
    }

    #[test]
    fn accepts_bare_array_and_rejects_scalars() {
        let agencies = flatten_agencies(&json!([{ "ori": "TX0000000" }]));
        assert_eq!(agencies.len(), 1);
        assert!(flatten_agencies(&json!(null)).is_empty());
        assert!(flatten_agencies(&json!("NM")).is_empty());
    }

    #[test]
    fn search_matches_any_text_column() {
        let agencies = flatten_agencies(&roster());
        assert_eq!(search_agencies(&agencies, "albuquerque", 100).len(), 1);
        assert_eq!(search_agencies(&agencies, "nm0260", 100).len(), 1);
        assert_eq!(search_agencies(&agencies, "county", 100).len(), 1);
        assert_eq!(search_agencies(&agencies, "new mexico", 100).len(), 2);
        assert!(search_agencies(&agencies, "texas", 100).is_empty());
    }

    #[test]
    fn blank_search_is_limited() {
        let agencies = flatten_agencies(&roster());
        assert_eq!(search_agencies(&agencies, "  ", 1).len(), 1);
        assert_eq!(search_agencies(&agencies, "", 100).len(), 2);
    }
}
