#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Crime type taxonomy, query scopes, and the denormalized per-year
//! summary record.
//!
//! The upstream Crime Data Explorer API identifies offenses by a kebab-case
//! slug (`violent-crime`, `motor-vehicle-theft`, ...) and aggregates them
//! at one of three [`Scope`]s. Everything downstream keys off these types.

pub mod filter;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Offense types the upstream API can be queried for.
///
/// The string form is the upstream slug used in request paths.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum CrimeType {
    /// Aggregate of homicide, rape, robbery and aggravated assault
    #[default]
    ViolentCrime,
    /// Aggregate of burglary, larceny, motor vehicle theft and arson
    PropertyCrime,
    /// Murder and non-negligent manslaughter
    Homicide,
    /// Rape under the revised UCR definition
    RapeRevised,
    /// Taking property by force or threat
    Robbery,
    /// Attack with intent to cause serious bodily harm
    AggravatedAssault,
    /// Unlawful entry to commit a felony or theft
    Burglary,
    /// Unlawful taking of property
    Larceny,
    /// Theft of a motor vehicle
    MotorVehicleTheft,
    /// Intentional destruction of property by fire
    Arson,
}

impl CrimeType {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::ViolentCrime,
            Self::PropertyCrime,
            Self::Homicide,
            Self::RapeRevised,
            Self::Robbery,
            Self::AggravatedAssault,
            Self::Burglary,
            Self::Larceny,
            Self::MotorVehicleTheft,
            Self::Arson,
        ]
    }

    /// Human-readable label, e.g. `"Motor Vehicle Theft"`.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::ViolentCrime => "Violent Crime",
            Self::PropertyCrime => "Property Crime",
            Self::Homicide => "Homicide",
            Self::RapeRevised => "Rape Revised",
            Self::Robbery => "Robbery",
            Self::AggravatedAssault => "Aggravated Assault",
            Self::Burglary => "Burglary",
            Self::Larceny => "Larceny",
            Self::MotorVehicleTheft => "Motor Vehicle Theft",
            Self::Arson => "Arson",
        }
    }

    /// The [`CrimeSummary`] column that carries this offense.
    #[must_use]
    pub const fn summary_field(self) -> SummaryField {
        match self {
            Self::ViolentCrime => SummaryField::ViolentCrime,
            Self::PropertyCrime => SummaryField::PropertyCrime,
            Self::Homicide => SummaryField::Homicide,
            Self::RapeRevised => SummaryField::RapeRevised,
            Self::Robbery => SummaryField::Robbery,
            Self::AggravatedAssault => SummaryField::AggravatedAssault,
            Self::Burglary => SummaryField::Burglary,
            Self::Larceny => SummaryField::Larceny,
            Self::MotorVehicleTheft => SummaryField::MotorVehicleTheft,
            Self::Arson => SummaryField::Arson,
        }
    }
}

/// Numeric columns of a [`CrimeSummary`].
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SummaryField {
    Population,
    ViolentCrime,
    Homicide,
    RapeRevised,
    Robbery,
    AggravatedAssault,
    PropertyCrime,
    Burglary,
    Larceny,
    MotorVehicleTheft,
    Arson,
}

/// A denormalized per-year record carrying every offense column.
///
/// This is the shape returned by the upstream estimate endpoints and used
/// by the sample dataset and multi-offense comparison tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrimeSummary {
    pub year: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_abbr: Option<String>,
    #[serde(default)]
    pub population: u64,
    #[serde(default)]
    pub violent_crime: u64,
    #[serde(default)]
    pub homicide: u64,
    #[serde(default)]
    pub rape_revised: u64,
    #[serde(default)]
    pub robbery: u64,
    #[serde(default)]
    pub aggravated_assault: u64,
    #[serde(default)]
    pub property_crime: u64,
    #[serde(default)]
    pub burglary: u64,
    #[serde(default)]
    pub larceny: u64,
    #[serde(default)]
    pub motor_vehicle_theft: u64,
    /// Not every year reports arson.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arson: Option<u64>,
}

impl CrimeSummary {
    /// Reads one numeric column. Only `arson` can be absent.
    #[must_use]
    pub const fn get(&self, field: SummaryField) -> Option<u64> {
        match field {
            SummaryField::Population => Some(self.population),
            SummaryField::ViolentCrime => Some(self.violent_crime),
            SummaryField::Homicide => Some(self.homicide),
            SummaryField::RapeRevised => Some(self.rape_revised),
            SummaryField::Robbery => Some(self.robbery),
            SummaryField::AggravatedAssault => Some(self.aggravated_assault),
            SummaryField::PropertyCrime => Some(self.property_crime),
            SummaryField::Burglary => Some(self.burglary),
            SummaryField::Larceny => Some(self.larceny),
            SummaryField::MotorVehicleTheft => Some(self.motor_vehicle_theft),
            SummaryField::Arson => self.arson,
        }
    }
}

/// Aggregation level of an upstream query.
///
/// Serialized as the upstream path segment: `national`, `state/{abbr}` or
/// `agency/{ori}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Scope {
    /// The whole United States.
    #[default]
    National,
    /// One state, by two-letter abbreviation (upper-cased).
    State(String),
    /// One reporting agency, by ORI.
    Agency(String),
}

impl Scope {
    /// Builds a state scope, upper-casing the abbreviation.
    #[must_use]
    pub fn state(abbr: &str) -> Self {
        Self::State(abbr.trim().to_uppercase())
    }

    /// Builds an agency scope.
    #[must_use]
    pub fn agency(ori: &str) -> Self {
        Self::Agency(ori.trim().to_string())
    }

    /// Human-readable label used in page headings.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::National => "National".to_string(),
            Self::State(abbr) => format!("State: {abbr}"),
            Self::Agency(ori) => ori.clone(),
        }
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::National => write!(f, "national"),
            Self::State(abbr) => write!(f, "state/{abbr}"),
            Self::Agency(ori) => write!(f, "agency/{ori}"),
        }
    }
}

/// Error returned when a scope string is not `national`, `state/{abbr}` or
/// `agency/{ori}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidScopeError {
    /// The rejected input.
    pub value: String,
}

impl std::fmt::Display for InvalidScopeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid scope '{}': expected national, state/{{abbr}} or agency/{{ori}}",
            self.value
        )
    }
}

impl std::error::Error for InvalidScopeError {}

impl std::str::FromStr for Scope {
    type Err = InvalidScopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("national") {
            return Ok(Self::National);
        }
        let err = || InvalidScopeError {
            value: s.to_string(),
        };
        let (kind, id) = s.split_once('/').ok_or_else(err)?;
        if id.is_empty() || id.contains('/') {
            return Err(err());
        }
        match kind {
            "state" => Ok(Self::state(id)),
            "agency" => Ok(Self::agency(id)),
            _ => Err(err()),
        }
    }
}

impl TryFrom<String> for Scope {
    type Error = InvalidScopeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Scope> for String {
    fn from(scope: Scope) -> Self {
        scope.to_string()
    }
}
