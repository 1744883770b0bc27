//! Parser for the `/estimate/national/{crime}` and
//! `/estimate/state/{abbr}/{crime}` endpoints.
//!
//! These return one denormalized row per year carrying every offense
//! column. Depending on the deployment the array is returned bare or
//! wrapped under `results` or `data`.

use std::collections::BTreeMap;

use crime_explorer_crime_models::CrimeSummary;
use serde_json::{Map, Value};

use crate::values::{as_count, as_year};

/// Wrapper fields the row array may be nested under.
const WRAPPERS: [&str; 2] = ["results", "data"];

fn rows(raw: &Value) -> Option<&Vec<Value>> {
    if let Some(rows) = raw.as_array() {
        return Some(rows);
    }
    WRAPPERS
        .iter()
        .find_map(|key| raw.get(*key).and_then(Value::as_array))
}

fn count(obj: &Map<String, Value>, names: &[&str]) -> u64 {
    names
        .iter()
        .find_map(|name| obj.get(*name).filter(|v| !v.is_null()))
        .map_or(0, as_count)
}

fn parse_row(row: &Value) -> Option<CrimeSummary> {
    let obj = row.as_object()?;
    let year = obj.get("year").or_else(|| obj.get("data_year")).and_then(as_year)?;

    let state_abbr = obj
        .get("state_abbr")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_uppercase);

    let arson = obj
        .get("arson")
        .filter(|v| !v.is_null())
        .map(as_count);

    Some(CrimeSummary {
        year,
        state_abbr,
        population: count(obj, &["population"]),
        violent_crime: count(obj, &["violent_crime"]),
        homicide: count(obj, &["homicide"]),
        rape_revised: count(obj, &["rape_revised", "rape_legacy"]),
        robbery: count(obj, &["robbery"]),
        aggravated_assault: count(obj, &["aggravated_assault"]),
        property_crime: count(obj, &["property_crime"]),
        burglary: count(obj, &["burglary"]),
        larceny: count(obj, &["larceny"]),
        motor_vehicle_theft: count(obj, &["motor_vehicle_theft"]),
        arson,
    })
}

/// Parses an estimate response into rows ascending by year.
///
/// Rows without a parseable year are skipped. When the same year appears
/// more than once the first row wins. Unknown shapes give `[]`.
#[must_use]
pub fn parse_estimate_response(raw: &Value) -> Vec<CrimeSummary> {
    let Some(rows) = rows(raw) else {
        return Vec::new();
    };

    let mut by_year: BTreeMap<i32, CrimeSummary> = BTreeMap::new();
    for row in rows {
        match parse_row(row) {
            Some(summary) => {
                by_year.entry(summary.year).or_insert(summary);
            }
            None => log::trace!("skipping malformed estimate row"),
        }
    }
    by_year.into_values().collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parses_bare_array_ascending() {
        let raw = json!([
            { "year": 2021, "population": 1000, "violent_crime": 5, "arson": 2 },
            { "year": 2020, "population": 990, "violent_crime": "4" }
        ]);
        let parsed = parse_estimate_response(&raw);
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].year, 2020);
        assert_eq!(parsed[0].violent_crime, 4);
        assert_eq!(parsed[0].arson, None);
        assert_eq!(parsed[1].arson, Some(2));
    }

    #[test]
    fn unwraps_results_and_data() {
        let row = json!({ "year": 2019, "homicide": 7, "state_abbr": "tx" });
        for wrapper in ["results", "data"] {
            let raw = json!({ wrapper: [row.clone()] });
            let parsed = parse_estimate_response(&raw);
            assert_eq!(parsed.len(), 1, "{wrapper}");
            assert_eq!(parsed[0].homicide, 7);
            assert_eq!(parsed[0].state_abbr.as_deref(), Some("TX"));
        }
    }

    #[test]
    fn legacy_rape_column_is_used_when_revised_is_missing() {
        let raw = json!([
            { "year": 1990, "rape_revised": null, "rape_legacy": 102_555 },
            { "year": 2015, "rape_revised": 126_134, "rape_legacy": 90_185 }
        ]);
        let parsed = parse_estimate_response(&raw);
        assert_eq!(parsed[0].rape_revised, 102_555);
        assert_eq!(parsed[1].rape_revised, 126_134);
    }

    #[test]
    fn malformed_rows_and_shapes() {
        let raw = json!([{ "population": 5 }, 42, { "year": 2001 }]);
        let parsed = parse_estimate_response(&raw);
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].year, 2001);
        assert_eq!(parsed[0].population, 0);

        assert!(parse_estimate_response(&json!({ "rows": [] })).is_empty());
        assert!(parse_estimate_response(&json!(null)).is_empty());
    }

    #[test]
    fn accepts_data_year_alias() {
        let parsed = parse_estimate_response(&json!([{ "data_year": 2010, "burglary": 3 }]));
        assert_eq!(parsed[0].year, 2010);
        assert_eq!(parsed[0].burglary, 3);
    }
}
