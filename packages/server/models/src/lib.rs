#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the crime explorer proxy server.
//!
//! Query parameter structs carry the proxy's defaults: national scope,
//! violent crime, 2015 through 2024. These types are separate from the
//! normalized record types to allow independent evolution of the API
//! contract.

use crime_explorer_crime_models::filter::FilterContext;
use crime_explorer_crime_models::{CrimeSummary, CrimeType, Scope};
use crime_explorer_geography_models::states::is_state_abbr;
use crime_explorer_stats_models::{
    CategoryBreakdown, DataOrigin, DemographicBreakdown, HateCrimeYearly, KpiMetric, TrendPoint,
    YearlyAggregate, YoyRow,
};
use serde::{Deserialize, Serialize};

/// First year queried when a request omits `from`.
pub const DEFAULT_FROM_YEAR: i32 = 2015;

/// Last year queried when a request omits `to`.
pub const DEFAULT_TO_YEAR: i32 = 2024;

/// Last year queried for agency crime when a request omits `to`.
pub const DEFAULT_AGENCY_TO_YEAR: i32 = 2023;

/// Year shown on the state map when a request omits `year`.
pub const DEFAULT_MAP_YEAR: i32 = 2024;

/// Maximum agencies returned by a search.
pub const AGENCY_SEARCH_LIMIT: usize = 100;

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
}

/// Query parameters for the summarized endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummarizedQueryParams {
    /// `national`, `state/{abbr}` or `agency/{ori}`.
    pub scope: Option<Scope>,
    /// Crime type slug.
    pub crime: Option<CrimeType>,
    /// First year (inclusive).
    pub from: Option<i32>,
    /// Last year (inclusive).
    pub to: Option<i32>,
}

impl SummarizedQueryParams {
    #[must_use]
    pub fn scope(&self) -> Scope {
        self.scope.clone().unwrap_or_default()
    }

    #[must_use]
    pub fn crime(&self) -> CrimeType {
        self.crime.unwrap_or_default()
    }

    /// `(from, to)` with defaults applied.
    #[must_use]
    pub fn years(&self) -> (i32, i32) {
        (
            self.from.unwrap_or(DEFAULT_FROM_YEAR),
            self.to.unwrap_or(DEFAULT_TO_YEAR),
        )
    }
}

/// Query parameters for the hate-crime endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HateCrimeQueryParams {
    /// `national`, `state/{abbr}` or `agency/{ori}`.
    pub scope: Option<Scope>,
    /// First year (inclusive).
    pub from: Option<i32>,
    /// Last year (inclusive).
    pub to: Option<i32>,
}

impl HateCrimeQueryParams {
    #[must_use]
    pub fn scope(&self) -> Scope {
        self.scope.clone().unwrap_or_default()
    }

    /// `(from, to)` with defaults applied.
    #[must_use]
    pub fn years(&self) -> (i32, i32) {
        (
            self.from.unwrap_or(DEFAULT_FROM_YEAR),
            self.to.unwrap_or(DEFAULT_TO_YEAR),
        )
    }
}

/// Query parameters for the agencies endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgenciesQueryParams {
    /// State abbreviation, or `all` for every state. Required.
    pub state: Option<String>,
    /// Optional case-insensitive search text.
    pub q: Option<String>,
    /// Maximum search results.
    pub limit: Option<usize>,
}

/// Which roster an agencies request asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgencyRoster {
    /// Every state.
    All,
    /// One state, upper-cased.
    State(String),
}

/// Why an agencies request names no usable roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterError {
    /// `state` is missing or blank.
    Missing,
    /// `state` is not one of the 50 states or DC.
    UnknownState(String),
}

impl std::fmt::Display for RosterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing => f.write_str("state parameter required"),
            Self::UnknownState(abbr) => write!(f, "unknown state abbreviation: {abbr}"),
        }
    }
}

impl std::error::Error for RosterError {}

impl AgenciesQueryParams {
    /// The requested roster.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError`] when `state` is missing, blank, or not a
    /// known state abbreviation.
    pub fn roster(&self) -> Result<AgencyRoster, RosterError> {
        let state = self
            .state
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(RosterError::Missing)?;
        if state.eq_ignore_ascii_case("all") {
            return Ok(AgencyRoster::All);
        }
        let abbr = state.to_uppercase();
        if is_state_abbr(&abbr) {
            Ok(AgencyRoster::State(abbr))
        } else {
            Err(RosterError::UnknownState(abbr))
        }
    }

    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit.unwrap_or(AGENCY_SEARCH_LIMIT)
    }
}

/// Query parameters for the agency crime endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgencyCrimeQueryParams {
    /// Agency ORI. Required.
    pub ori: Option<String>,
    /// Crime type slug.
    #[serde(rename = "type")]
    pub crime_type: Option<CrimeType>,
    /// First year (inclusive).
    pub from: Option<i32>,
    /// Last year (inclusive).
    pub to: Option<i32>,
}

impl AgencyCrimeQueryParams {
    /// The agency scope, `None` when `ori` is missing or blank.
    #[must_use]
    pub fn scope(&self) -> Option<Scope> {
        self.ori
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(Scope::agency)
    }

    #[must_use]
    pub fn crime(&self) -> CrimeType {
        self.crime_type.unwrap_or_default()
    }

    /// `(from, to)` with defaults applied.
    #[must_use]
    pub fn years(&self) -> (i32, i32) {
        (
            self.from.unwrap_or(DEFAULT_FROM_YEAR),
            self.to.unwrap_or(DEFAULT_AGENCY_TO_YEAR),
        )
    }
}

/// Query parameters for the state map endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateMapQueryParams {
    /// Crime type slug.
    pub crime: Option<CrimeType>,
    /// Year to map.
    pub year: Option<i32>,
}

impl StateMapQueryParams {
    #[must_use]
    pub fn crime(&self) -> CrimeType {
        self.crime.unwrap_or_default()
    }

    #[must_use]
    pub fn year(&self) -> i32 {
        self.year.unwrap_or(DEFAULT_MAP_YEAR)
    }
}

/// Query parameters for the national overview endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewQueryParams {
    /// Crime type slug.
    pub crime: Option<CrimeType>,
    /// First year (inclusive).
    pub from: Option<i32>,
    /// Last year (inclusive).
    pub to: Option<i32>,
}

impl OverviewQueryParams {
    /// The national selection this request describes. Unset fields keep
    /// the dashboard defaults.
    #[must_use]
    pub fn filter(&self) -> FilterContext {
        let defaults = FilterContext::default();
        let from = self.from.unwrap_or(defaults.start_year);
        let to = self.to.unwrap_or(defaults.end_year);
        defaults
            .with_crime_type(self.crime.unwrap_or_default())
            .with_years(from, to)
    }
}

/// Normalized summarized data with the derived views a dashboard page
/// needs.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiYearlySummary {
    pub scope: Scope,
    pub crime: CrimeType,
    /// One row per year, ascending.
    pub yearly: Vec<YearlyAggregate>,
    /// Count, rate and clearance headline metrics.
    pub kpis: Vec<KpiMetric>,
    /// Count trend with per-capita rates.
    pub trend: Vec<TrendPoint>,
    /// Latest year against up to three prior years.
    pub yoy: Vec<YoyRow>,
}

/// Parsed hate-crime data with category shares.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHateCrimeBreakdown {
    pub scope: Scope,
    pub yearly: Vec<HateCrimeYearly>,
    pub bias_categories: Vec<CategoryBreakdown>,
    pub offense_types: Vec<CategoryBreakdown>,
    /// `bias_categories` as shares of their total.
    pub bias_shares: Vec<DemographicBreakdown>,
    /// `offense_types` as shares of their total.
    pub offense_shares: Vec<DemographicBreakdown>,
}

/// National estimate overview.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiOverview {
    /// Whether `rows` are live or sample data, and why.
    pub origin: DataOrigin,
    pub crime: CrimeType,
    pub kpis: Vec<KpiMetric>,
    pub trend: Vec<TrendPoint>,
    pub rows: Vec<CrimeSummary>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn summarized_defaults() {
        let params = SummarizedQueryParams::default();
        assert_eq!(params.scope(), Scope::National);
        assert_eq!(params.crime(), CrimeType::ViolentCrime);
        assert_eq!(params.years(), (2015, 2024));
    }

    #[test]
    fn summarized_params_parse_scope_and_crime() {
        let params: SummarizedQueryParams = serde_json::from_value(json!({
            "scope": "state/ca",
            "crime": "motor-vehicle-theft",
            "from": 2018
        }))
        .unwrap();
        assert_eq!(params.scope(), Scope::state("CA"));
        assert_eq!(params.crime(), CrimeType::MotorVehicleTheft);
        assert_eq!(params.years(), (2018, 2024));
    }

    #[test]
    fn invalid_scope_is_rejected() {
        let parsed: Result<SummarizedQueryParams, _> =
            serde_json::from_value(json!({ "scope": "county/foo" }));
        assert!(parsed.is_err());
    }

    #[test]
    fn agency_roster_selection() {
        let params = |state: Option<&str>| AgenciesQueryParams {
            state: state.map(str::to_string),
            ..AgenciesQueryParams::default()
        };
        assert_eq!(params(None).roster(), Err(RosterError::Missing));
        assert_eq!(params(Some("  ")).roster(), Err(RosterError::Missing));
        assert_eq!(params(Some("ALL")).roster(), Ok(AgencyRoster::All));
        assert_eq!(
            params(Some("nm")).roster(),
            Ok(AgencyRoster::State("NM".to_string()))
        );
        assert_eq!(params(None).limit(), 100);
    }

    #[test]
    fn unknown_state_is_rejected() {
        let params = AgenciesQueryParams {
            state: Some("zz".to_string()),
            ..AgenciesQueryParams::default()
        };
        let err = params.roster().unwrap_err();
        assert_eq!(err, RosterError::UnknownState("ZZ".to_string()));
        assert_eq!(err.to_string(), "unknown state abbreviation: ZZ");
        assert_eq!(RosterError::Missing.to_string(), "state parameter required");
    }

    #[test]
    fn agency_crime_defaults_end_in_2023() {
        let params: AgencyCrimeQueryParams =
            serde_json::from_value(json!({ "ori": "NM0130200", "type": "homicide" })).unwrap();
        assert_eq!(params.scope(), Some(Scope::agency("NM0130200")));
        assert_eq!(params.crime(), CrimeType::Homicide);
        assert_eq!(params.years(), (2015, 2023));
        assert_eq!(AgencyCrimeQueryParams::default().scope(), None);
    }

    #[test]
    fn overview_filter_uses_dashboard_defaults() {
        let filter = OverviewQueryParams::default().filter();
        assert_eq!(filter.scope(), Scope::National);
        assert_eq!((filter.start_year, filter.end_year), (1985, 2023));

        let filter = OverviewQueryParams {
            crime: Some(CrimeType::Burglary),
            from: Some(2020),
            to: Some(2010),
        }
        .filter();
        assert_eq!(filter.crime_type, CrimeType::Burglary);
        assert_eq!((filter.start_year, filter.end_year), (2010, 2020));
    }

    #[test]
    fn state_map_defaults() {
        let params = StateMapQueryParams::default();
        assert_eq!(params.crime(), CrimeType::ViolentCrime);
        assert_eq!(params.year(), 2024);
    }
}
