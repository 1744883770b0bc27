//! Explicit query selection context.
//!
//! A [`FilterContext`] carries the user's current selection (state, year
//! range, crime type, agency) and is passed by value to whatever needs it.
//! There is no process-wide filter state.

use serde::{Deserialize, Serialize};

use crate::{CrimeType, Scope};

/// Earliest year the upstream API publishes.
pub const DEFAULT_START_YEAR: i32 = 1985;

/// Latest year covered by default.
pub const DEFAULT_END_YEAR: i32 = 2023;

/// The current selection of scope, year range and crime type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterContext {
    /// Selected state abbreviation, if any.
    pub state_abbr: Option<String>,
    /// First year of the range (inclusive).
    pub start_year: i32,
    /// Last year of the range (inclusive).
    pub end_year: i32,
    /// Selected offense type.
    pub crime_type: CrimeType,
    /// Selected agency ORI, if any.
    pub agency_ori: Option<String>,
    /// Free-text agency search box contents.
    pub agency_search: String,
}

impl Default for FilterContext {
    fn default() -> Self {
        Self {
            state_abbr: None,
            start_year: DEFAULT_START_YEAR,
            end_year: DEFAULT_END_YEAR,
            crime_type: CrimeType::default(),
            agency_ori: None,
            agency_search: String::new(),
        }
    }
}

impl FilterContext {
    /// Selects a state. Changing the state clears any agency selection and
    /// the agency search text, since agencies belong to a state.
    #[must_use]
    pub fn with_state(mut self, state_abbr: Option<&str>) -> Self {
        self.state_abbr = state_abbr.map(|s| s.trim().to_uppercase());
        self.agency_ori = None;
        self.agency_search.clear();
        self
    }

    /// Sets the inclusive year range. The bounds are swapped if reversed.
    #[must_use]
    pub const fn with_years(mut self, start_year: i32, end_year: i32) -> Self {
        if start_year <= end_year {
            self.start_year = start_year;
            self.end_year = end_year;
        } else {
            self.start_year = end_year;
            self.end_year = start_year;
        }
        self
    }

    /// Sets the crime type.
    #[must_use]
    pub const fn with_crime_type(mut self, crime_type: CrimeType) -> Self {
        self.crime_type = crime_type;
        self
    }

    /// Selects an agency within the current state.
    #[must_use]
    pub fn with_agency(mut self, agency_ori: Option<&str>) -> Self {
        self.agency_ori = agency_ori.map(|s| s.trim().to_string());
        self
    }

    /// Sets the agency search text.
    #[must_use]
    pub fn with_agency_search(mut self, search: &str) -> Self {
        self.agency_search = search.to_string();
        self
    }

    /// The effective query scope: agency overrides state overrides national.
    #[must_use]
    pub fn scope(&self) -> Scope {
        if let Some(ori) = self.agency_ori.as_deref().filter(|s| !s.is_empty()) {
            return Scope::agency(ori);
        }
        if let Some(abbr) = self.state_abbr.as_deref().filter(|s| !s.is_empty()) {
            return Scope::state(abbr);
        }
        Scope::National
    }

    /// Whether `year` falls within the selected range.
    #[must_use]
    pub const fn contains_year(&self, year: i32) -> bool {
        year >= self.start_year && year <= self.end_year
    }
}
