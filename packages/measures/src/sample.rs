//! Deterministic sample data shown when upstream has nothing to offer.
//!
//! Sample rows are only ever substituted through [`live_or_sample`], which
//! records why in a [`DataOrigin`] so a display can label them.

use crime_explorer_crime_models::CrimeSummary;
use crime_explorer_geography_models::{StateMapEntry, states};
use crime_explorer_stats_models::DataOrigin;
use serde::Serialize;

/// First year of the sample national trend.
pub const SAMPLE_START_YEAR: i32 = 1985;

/// Last year of the sample national trend.
pub const SAMPLE_END_YEAR: i32 = 2023;

/// Rows tagged with where they came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sourced<T> {
    pub origin: DataOrigin,
    pub rows: Vec<T>,
}

/// Keeps live rows when there are any, otherwise substitutes `sample`.
///
/// An empty live answer is [`DataOrigin::NoData`]; an error is
/// [`DataOrigin::Unavailable`].
pub fn live_or_sample<T, E, F>(live: Result<Vec<T>, E>, sample: F) -> Sourced<T>
where
    E: std::fmt::Display,
    F: FnOnce() -> Vec<T>,
{
    match live {
        Ok(rows) if !rows.is_empty() => Sourced {
            origin: DataOrigin::Live,
            rows,
        },
        Ok(_) => {
            log::info!("upstream returned no rows, substituting sample data");
            Sourced {
                origin: DataOrigin::NoData,
                rows: sample(),
            }
        }
        Err(e) => {
            log::warn!("upstream unavailable, substituting sample data: {e}");
            Sourced {
                origin: DataOrigin::Unavailable,
                rows: sample(),
            }
        }
    }
}

/// Shape of the sample curve: rising to an early-90s peak, a long decline,
/// and a bump around 2020.
fn cycle_factor(year: i32) -> f64 {
    let y = f64::from(year);
    if year < 1992 {
        (y - 1985.0).mul_add(0.04, 1.0)
    } else if year < 2015 {
        (y - 1992.0).mul_add(-0.025, 1.28)
    } else if year < 2020 {
        (y - 2015.0).mul_add(0.01, 0.7)
    } else if year < 2023 {
        (y - 2020.0).mul_add(0.02, 0.75)
    } else {
        0.72
    }
}

/// Year-dependent wobble in `[0.95, 1.05]`.
fn jitter(year: i32) -> f64 {
    f64::from((year * 37).rem_euclid(11)).mul_add(0.01, 0.95)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn share(total: f64, fraction: f64) -> u64 {
    (total * fraction).round() as u64
}

/// National estimate rows for 1985 through 2023.
#[must_use]
#[allow(clippy::cast_sign_loss)]
pub fn sample_national_trend() -> Vec<CrimeSummary> {
    (SAMPLE_START_YEAR..=SAMPLE_END_YEAR)
        .map(|year| {
            let violent = (1_800_000.0 * cycle_factor(year) * jitter(year)).round();
            let population = 240_000_000 + (year - SAMPLE_START_YEAR) as u64 * 2_500_000;
            CrimeSummary {
                year,
                state_abbr: None,
                population,
                violent_crime: share(violent, 1.0),
                homicide: share(violent, 0.008),
                rape_revised: share(violent, 0.07),
                robbery: share(violent, 0.22),
                aggravated_assault: share(violent, 0.55),
                property_crime: share(violent, 4.2),
                burglary: share(violent, 1.2),
                larceny: share(violent, 2.5),
                motor_vehicle_theft: share(violent, 0.5),
                arson: Some(share(violent, 0.04)),
            }
        })
        .collect()
}

/// `(abbr, violent crimes, rate per 100k, population)` for one sample year.
const SAMPLE_STATES: &[(&str, u64, f64, u64)] = &[
    ("CA", 174_026, 442.0, 39_350_000),
    ("TX", 126_320, 422.0, 29_946_000),
    ("FL", 83_850, 384.0, 21_830_000),
    ("NY", 74_500, 364.0, 20_440_000),
    ("IL", 50_200, 404.0, 12_430_000),
    ("PA", 42_300, 326.0, 12_970_000),
    ("OH", 37_800, 321.0, 11_770_000),
    ("GA", 38_500, 357.0, 10_800_000),
    ("NC", 36_200, 343.0, 10_560_000),
    ("MI", 45_100, 450.0, 10_020_000),
    ("NJ", 22_000, 236.0, 9_320_000),
    ("VA", 19_500, 227.0, 8_600_000),
    ("WA", 26_800, 349.0, 7_690_000),
    ("AZ", 31_000, 425.0, 7_300_000),
    ("MA", 25_800, 366.0, 7_050_000),
    ("TN", 45_600, 653.0, 6_990_000),
    ("IN", 26_100, 384.0, 6_800_000),
    ("MO", 35_200, 573.0, 6_150_000),
    ("MD", 28_000, 454.0, 6_170_000),
    ("WI", 19_800, 339.0, 5_840_000),
    ("CO", 23_500, 406.0, 5_800_000),
    ("MN", 14_800, 261.0, 5_670_000),
    ("SC", 28_400, 549.0, 5_170_000),
    ("AL", 28_500, 572.0, 4_980_000),
    ("LA", 26_200, 564.0, 4_650_000),
    ("KY", 10_300, 230.0, 4_480_000),
    ("OR", 12_900, 307.0, 4_200_000),
    ("OK", 17_900, 450.0, 3_980_000),
    ("CT", 8_200, 228.0, 3_600_000),
    ("UT", 8_600, 261.0, 3_300_000),
    ("IA", 9_100, 286.0, 3_180_000),
    ("NV", 17_200, 551.0, 3_120_000),
    ("AR", 18_400, 608.0, 3_020_000),
    ("MS", 8_100, 275.0, 2_950_000),
    ("KS", 12_100, 413.0, 2_930_000),
    ("NM", 15_600, 740.0, 2_110_000),
    ("NE", 5_900, 303.0, 1_950_000),
    ("ID", 4_100, 215.0, 1_910_000),
    ("WV", 5_600, 316.0, 1_770_000),
    ("HI", 3_800, 268.0, 1_420_000),
    ("NH", 2_200, 161.0, 1_370_000),
    ("ME", 1_700, 126.0, 1_350_000),
    ("MT", 4_100, 374.0, 1_100_000),
    ("RI", 2_400, 220.0, 1_090_000),
    ("DE", 5_200, 527.0, 987_000),
    ("SD", 4_300, 483.0, 890_000),
    ("ND", 2_800, 362.0, 775_000),
    ("AK", 6_100, 838.0, 728_000),
    ("DC", 5_100, 743.0, 686_000),
    ("VT", 1_300, 200.0, 645_000),
    ("WY", 1_300, 224.0, 580_000),
];

/// One violent-crime choropleth row per state.
#[must_use]
pub fn sample_state_map() -> Vec<StateMapEntry> {
    SAMPLE_STATES
        .iter()
        .map(|&(abbr, value, rate, population)| StateMapEntry {
            state_abbr: abbr.to_string(),
            state_name: states::state_name(abbr).unwrap_or(abbr).to_string(),
            value,
            rate,
            population,
        })
        .collect()
}
