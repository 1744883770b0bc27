//! Typed access to the CDE endpoint families.
//!
//! Upstream query shapes:
//!
//! ```text
//! /summarized/{scope}/{crime}?from=01-YYYY&to=12-YYYY
//! /hate-crime/{scope}?from=01-YYYY&to=12-YYYY
//! /agency/byStateAbbr/{abbr}
//! /estimate/national/{crime}?startYear=YYYY&endYear=YYYY
//! /estimate/state/{abbr}/{crime}?startYear=YYYY&endYear=YYYY
//! ```
//!
//! When an API key is configured it is appended to every request as
//! `API_KEY`.

use std::time::Duration;

use crime_explorer_crime_models::filter::DEFAULT_START_YEAR;
use crime_explorer_crime_models::{CrimeSummary, CrimeType, Scope};
use crime_explorer_geography_models::{StateMapEntry, states::STATE_ABBRS};
use crime_explorer_measures::state_map_entry;
use crime_explorer_normalize::period::{range_end, range_start};
use crime_explorer_normalize::{
    attach_yearly, flatten_agencies, merge_hate_crime_years, parse_estimate_response,
    parse_hate_crime_response, parse_summarized_response, summarize_hate_crime_year,
};
use crime_explorer_stats_models::{AgencyListItem, HateCrimeBreakdown, YearlyAggregate};
use serde_json::Value;

use crate::UpstreamError;
use crate::fan_out::{keep_successes, settle_all};
use crate::retry::send_json;

/// Public CDE deployment.
pub const DEFAULT_BASE_URL: &str = "https://cde.ucr.cjis.gov/LATEST";

/// Sub-requests in flight at once during a fan-out.
pub const DEFAULT_CONCURRENCY: usize = 8;

/// Latest year the upstream is assumed to publish unless configured.
pub const DEFAULT_LATEST_YEAR: i32 = 2024;

/// Per-request timeout.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const USER_AGENT: &str = "crime-explorer/0.1 (https://github.com/BSteffaniak/crime-explorer)";

/// Connection settings for [`CdeClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CdeConfig {
    /// Base URL without a trailing slash.
    pub base_url: String,
    /// Appended as `API_KEY` when set.
    pub api_key: Option<String>,
    /// Fan-out parallelism.
    pub concurrency: usize,
    /// Upper bound of per-year fan-outs.
    pub latest_year: i32,
}

impl Default for CdeConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            concurrency: DEFAULT_CONCURRENCY,
            latest_year: DEFAULT_LATEST_YEAR,
        }
    }
}

impl CdeConfig {
    /// Reads `CDE_BASE_URL`, `FBI_CDE_API_KEY`, `CDE_CONCURRENCY` and
    /// `CDE_LATEST_YEAR`, falling back to the defaults for unset or invalid values.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let base_url = std::env::var("CDE_BASE_URL")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(defaults.base_url);
        let api_key = std::env::var("FBI_CDE_API_KEY")
            .ok()
            .filter(|s| !s.trim().is_empty());
        let concurrency = std::env::var("CDE_CONCURRENCY")
            .ok()
            .and_then(|s| s.parse().ok())
            .filter(|n| *n > 0)
            .unwrap_or(defaults.concurrency);
        let latest_year = std::env::var("CDE_LATEST_YEAR")
            .ok()
            .and_then(|s| s.parse().ok())
            .filter(|y| *y >= DEFAULT_START_YEAR)
            .unwrap_or(defaults.latest_year);

        Self {
            base_url,
            api_key,
            concurrency,
            latest_year,
        }
        .normalized()
    }

    /// Strips a trailing `/` from the base URL and clamps concurrency to at
    /// least one.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.base_url = self.base_url.trim_end_matches('/').to_string();
        self.concurrency = self.concurrency.max(1);
        self
    }
}

/// Result of a per-state choropleth fan-out.
#[derive(Debug, Clone, PartialEq)]
pub struct StateMapOutcome {
    /// One row per state that answered with data, in state-list order.
    pub entries: Vec<StateMapEntry>,
    /// States whose request failed.
    pub failed: usize,
    /// States queried.
    pub attempted: usize,
}

impl StateMapOutcome {
    /// Whether no state could be reached at all.
    #[must_use]
    pub const fn all_failed(&self) -> bool {
        self.attempted > 0 && self.failed == self.attempted
    }
}

/// Published years within `from..=to`, tolerating reversed bounds.
///
/// Empty when the request lies entirely outside
/// `DEFAULT_START_YEAR..=latest`.
fn published_years(from: i32, to: i32, latest: i32) -> std::ops::RangeInclusive<i32> {
    from.min(to).max(DEFAULT_START_YEAR)..=from.max(to).min(latest)
}

fn month_range(from: i32, to: i32) -> Vec<(&'static str, String)> {
    let (from, to) = (from.min(to), from.max(to));
    vec![("from", range_start(from)), ("to", range_end(to))]
}

/// HTTP client for the CDE API.
#[derive(Debug, Clone)]
pub struct CdeClient {
    http: reqwest::Client,
    config: CdeConfig,
}

impl CdeClient {
    /// Builds a client.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError::Http`] if the HTTP client cannot be built.
    pub fn new(config: CdeConfig) -> Result<Self, UpstreamError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            config: config.normalized(),
        })
    }

    #[must_use]
    pub const fn config(&self) -> &CdeConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url, path.trim_start_matches('/'))
    }

    /// GETs `path` with `params` (plus the API key) and parses JSON.
    async fn get_json(
        &self,
        path: &str,
        mut params: Vec<(&'static str, String)>,
    ) -> Result<Value, UpstreamError> {
        if let Some(key) = &self.config.api_key {
            params.push(("API_KEY", key.clone()));
        }
        let url = self.url(path);
        log::debug!("GET {url}");
        send_json(|| self.http.get(&url).query(&params)).await
    }

    /// Raw `/summarized/` payload.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError`] if the request fails.
    pub async fn summarized_raw(
        &self,
        scope: &Scope,
        crime: CrimeType,
        from: i32,
        to: i32,
    ) -> Result<Value, UpstreamError> {
        self.get_json(&format!("summarized/{scope}/{crime}"), month_range(from, to))
            .await
    }

    /// Yearly aggregates for one scope and crime type.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError`] if the request fails.
    pub async fn summarized(
        &self,
        scope: &Scope,
        crime: CrimeType,
        from: i32,
        to: i32,
    ) -> Result<Vec<YearlyAggregate>, UpstreamError> {
        let raw = self.summarized_raw(scope, crime, from, to).await?;
        Ok(parse_summarized_response(&raw))
    }

    async fn hate_crime_range(
        &self,
        scope: &Scope,
        from: i32,
        to: i32,
    ) -> Result<Value, UpstreamError> {
        self.get_json(&format!("hate-crime/{scope}"), month_range(from, to))
            .await
    }

    /// Range aggregate for the whole period plus per-year totals under
    /// `_yearly`.
    ///
    /// Years whose request fails are left out of `_yearly`.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError`] if the range aggregate request fails.
    pub async fn hate_crime_raw(
        &self,
        scope: &Scope,
        from: i32,
        to: i32,
    ) -> Result<Value, UpstreamError> {
        let span = published_years(from, to, self.config.latest_year);
        let aggregate = if span.is_empty() {
            self.hate_crime_range(scope, from, to).await?
        } else {
            self.hate_crime_range(scope, *span.start(), *span.end()).await?
        };

        let settled = settle_all(span, self.config.concurrency, |year| async move {
            let raw = self.hate_crime_range(scope, year, year).await?;
            Ok::<_, UpstreamError>(summarize_hate_crime_year(year, &raw))
        })
        .await;

        let yearly = merge_hate_crime_years(
            keep_successes(settled)
                .into_iter()
                .map(|(_, totals)| totals)
                .collect(),
        );
        log::debug!("hate-crime {scope}: {} yearly totals", yearly.len());

        Ok(attach_yearly(aggregate, &yearly))
    }

    /// Parsed hate-crime breakdown with per-year totals.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError`] if the range aggregate request fails.
    pub async fn hate_crime(
        &self,
        scope: &Scope,
        from: i32,
        to: i32,
    ) -> Result<HateCrimeBreakdown, UpstreamError> {
        let raw = self.hate_crime_raw(scope, from, to).await?;
        Ok(parse_hate_crime_response(&raw))
    }

    /// Agency roster of one state.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError`] if the request fails.
    pub async fn agencies_by_state(
        &self,
        abbr: &str,
    ) -> Result<Vec<AgencyListItem>, UpstreamError> {
        let abbr = abbr.trim().to_uppercase();
        let raw = self
            .get_json(&format!("agency/byStateAbbr/{abbr}"), Vec::new())
            .await?;
        Ok(flatten_agencies(&raw))
    }

    /// Agency rosters of every state, concatenated in state-list order.
    /// States whose request fails are left out.
    pub async fn all_agencies(&self) -> Vec<AgencyListItem> {
        let settled = settle_all(
            STATE_ABBRS.iter().copied(),
            self.config.concurrency,
            |abbr| self.agencies_by_state(abbr),
        )
        .await;

        let mut by_state = keep_successes(settled);
        by_state.sort_by_key(|(abbr, _)| STATE_ABBRS.iter().position(|s| s == abbr));

        let agencies: Vec<AgencyListItem> = by_state
            .into_iter()
            .flat_map(|(_, agencies)| agencies)
            .collect();
        log::info!("loaded {} agencies across all states", agencies.len());
        agencies
    }

    /// National estimate rows.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError`] if the request fails.
    pub async fn national_estimates(
        &self,
        crime: CrimeType,
        from: i32,
        to: i32,
    ) -> Result<Vec<CrimeSummary>, UpstreamError> {
        let raw = self
            .get_json(
                &format!("estimate/national/{crime}"),
                vec![
                    ("startYear", from.min(to).to_string()),
                    ("endYear", from.max(to).to_string()),
                ],
            )
            .await?;
        Ok(parse_estimate_response(&raw))
    }

    /// State estimate rows.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError`] if the request fails.
    pub async fn state_estimates(
        &self,
        abbr: &str,
        crime: CrimeType,
        from: i32,
        to: i32,
    ) -> Result<Vec<CrimeSummary>, UpstreamError> {
        let abbr = abbr.trim().to_uppercase();
        let raw = self
            .get_json(
                &format!("estimate/state/{abbr}/{crime}"),
                vec![
                    ("startYear", from.min(to).to_string()),
                    ("endYear", from.max(to).to_string()),
                ],
            )
            .await?;
        Ok(parse_estimate_response(&raw))
    }

    /// One choropleth row per state for `year`.
    ///
    /// States that fail or have no data for the year are left out.
    pub async fn state_map(&self, crime: CrimeType, year: i32) -> StateMapOutcome {
        let settled = settle_all(
            STATE_ABBRS.iter().copied(),
            self.config.concurrency,
            |abbr| async move {
                let aggregates = self
                    .summarized(&Scope::state(abbr), crime, year, year)
                    .await?;
                Ok::<_, UpstreamError>(state_map_entry(abbr, &aggregates))
            },
        )
        .await;

        let attempted = settled.len();
        let answered = keep_successes(settled);
        let failed = attempted - answered.len();

        let mut entries: Vec<StateMapEntry> =
            answered.into_iter().filter_map(|(_, entry)| entry).collect();
        entries.sort_by_key(|e| STATE_ABBRS.iter().position(|s| *s == e.state_abbr));

        if failed > 0 {
            log::warn!("state map {crime} {year}: {failed}/{attempted} states failed");
        }

        StateMapOutcome {
            entries,
            failed,
            attempted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_normalizes_base_url_and_concurrency() {
        let config = CdeConfig {
            base_url: "http://localhost:9000/LATEST/".to_string(),
            api_key: None,
            concurrency: 0,
            latest_year: DEFAULT_LATEST_YEAR,
        }
        .normalized();
        assert_eq!(config.base_url, "http://localhost:9000/LATEST");
        assert_eq!(config.concurrency, 1);
    }

    #[test]
    fn urls_join_paths() {
        let client = CdeClient::new(CdeConfig::default()).unwrap();
        assert_eq!(
            client.url("summarized/national/violent-crime"),
            "https://cde.ucr.cjis.gov/LATEST/summarized/national/violent-crime"
        );
        assert_eq!(
            client.url("/agency/byStateAbbr/NM"),
            "https://cde.ucr.cjis.gov/LATEST/agency/byStateAbbr/NM"
        );
    }

    #[test]
    fn month_range_tolerates_reversed_years() {
        assert_eq!(
            month_range(2024, 2015),
            vec![("from", "01-2015".to_string()), ("to", "12-2024".to_string())]
        );
        assert_eq!(
            published_years(2021, 2019, DEFAULT_LATEST_YEAR).collect::<Vec<_>>(),
            vec![2019, 2020, 2021]
        );
    }

    #[test]
    fn year_fan_out_is_clamped_to_published_years() {
        let span = published_years(1, 9999, 2024);
        assert_eq!((*span.start(), *span.end()), (1985, 2024));
        assert_eq!(span.count(), 40);

        assert_eq!(published_years(9999, 1, 2023).count(), 39);
        assert!(published_years(2030, 2040, 2024).is_empty());
        assert!(published_years(1900, 1950, 2024).is_empty());
    }

    #[test]
    fn state_map_outcome_all_failed() {
        let outcome = StateMapOutcome {
            entries: Vec::new(),
            failed: 51,
            attempted: 51,
        };
        assert!(outcome.all_failed());
        assert!(
            !StateMapOutcome {
                entries: Vec::new(),
                failed: 0,
                attempted: 0,
            }
            .all_failed()
        );
    }
}
