use crime_explorer_geography_models::{StateMapEntry, states};
use crime_explorer_stats_models::YearlyAggregate;

/// The latest year of a state's aggregates as a choropleth row.
///
/// `None` when `aggregates` is empty. An unknown abbreviation is used as
/// its own display name.
#[must_use]
pub fn state_map_entry(abbr: &str, aggregates: &[YearlyAggregate]) -> Option<StateMapEntry> {
    let latest = aggregates.iter().max_by_key(|a| a.year)?;
    let abbr = abbr.trim().to_uppercase();
    let state_name = states::state_name(&abbr).map_or_else(|| abbr.clone(), str::to_string);

    Some(StateMapEntry {
        state_name,
        state_abbr: abbr,
        value: latest.count,
        rate: latest.rate,
        population: latest.population,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(year: i32, count: u64) -> YearlyAggregate {
        YearlyAggregate {
            year,
            count,
            rate: 4.2,
            clearances: 0,
            population: 1000,
        }
    }

    #[test]
    fn takes_latest_year() {
        let entry = state_map_entry("nm", &[row(2023, 9), row(2022, 7)]).unwrap();
        assert_eq!(entry.state_abbr, "NM");
        assert_eq!(entry.state_name, "New Mexico");
        assert_eq!(entry.value, 9);
    }

    #[test]
    fn empty_aggregates_have_no_entry() {
        assert_eq!(state_map_entry("TX", &[]), None);
    }

    #[test]
    fn unknown_state_uses_abbreviation() {
        let entry = state_map_entry("PR", &[row(2023, 1)]).unwrap();
        assert_eq!(entry.state_name, "PR");
    }
}
