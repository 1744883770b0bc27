#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! US state reference data and the state-level choropleth row type.

pub mod states;

use serde::{Deserialize, Serialize};

/// One state's value for the choropleth map.
///
/// Built from the latest year of a per-state summarized query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateMapEntry {
    /// Two-letter state abbreviation.
    pub state_abbr: String,
    /// Full state name (falls back to the abbreviation).
    pub state_name: String,
    /// Offense count for the year.
    pub value: u64,
    /// Mean monthly rate per 100,000 residents.
    pub rate: f64,
    /// Mean population for the year.
    pub population: u64,
}
