//! Period label parsing.
//!
//! Monthly buckets from the summarized endpoint are keyed `MM-YYYY`
//! (e.g. `"01-2020"`). Matching is permissive: the first `NN-NNNN` run
//! anywhere in the label is used.

use std::sync::LazyLock;

use regex::Regex;

static MONTH_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]{2})-([0-9]{4})").expect("valid regex"));

/// Extracts the 4-digit year from an `MM-YYYY` period label.
///
/// Returns `None` when the label has no `NN-NNNN` run, or the year is `0000`.
#[must_use]
pub fn parse_period_year(key: &str) -> Option<i32> {
    let caps = MONTH_YEAR.captures(key)?;
    let year: i32 = caps.get(2)?.as_str().parse().ok()?;
    (year > 0).then_some(year)
}

/// Formats the `from` bound of a year range as the upstream expects it
/// (`01-YYYY`).
#[must_use]
pub fn range_start(year: i32) -> String {
    format!("01-{year}")
}

/// Formats the `to` bound of a year range as the upstream expects it
/// (`12-YYYY`).
#[must_use]
pub fn range_end(year: i32) -> String {
    format!("12-{year}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_month_year_keys() {
        assert_eq!(parse_period_year("01-2020"), Some(2020));
        assert_eq!(parse_period_year("12-1985"), Some(1985));
        assert_eq!(parse_period_year("06-2021"), Some(2021));
    }

    #[test]
    fn every_month_of_a_year_maps_to_that_year() {
        for month in 1..=12 {
            let key = format!("{month:02}-2019");
            assert_eq!(parse_period_year(&key), Some(2019), "{key}");
        }
    }

    #[test]
    fn permissive_match_inside_longer_label() {
        assert_eq!(parse_period_year("period 03-2018 (revised)"), Some(2018));
    }

    #[test]
    fn rejects_malformed_keys() {
        assert_eq!(parse_period_year("2020-01"), None);
        assert_eq!(parse_period_year("1-2020"), None);
        assert_eq!(parse_period_year("01/2020"), None);
        assert_eq!(parse_period_year("January 2020"), None);
        assert_eq!(parse_period_year(""), None);
        assert_eq!(parse_period_year("00-0000"), None);
    }

    #[test]
    fn formats_range_bounds() {
        assert_eq!(range_start(2015), "01-2015");
        assert_eq!(range_end(2024), "12-2024");
    }
}
