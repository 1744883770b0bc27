#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Normalization of Crime Data Explorer API payloads.
//!
//! The upstream API returns loosely-typed JSON whose keys vary by scope
//! ("United States Offenses" vs "California Offenses"), buckets values by
//! `MM-YYYY` month, and renames fields between endpoint families. The
//! functions here turn those payloads into stable, year-ordered records.
//!
//! Nothing in this crate fails on bad input. Missing containers produce
//! empty sequences, unparseable buckets are skipped, and missing values are
//! zero-filled so the presentation layer can show "no data" instead of
//! erroring.

pub mod agencies;
pub mod estimates;
pub mod hate_crime;
pub mod keys;
pub mod period;
pub mod summarized;
pub mod values;

pub use agencies::{flatten_agencies, search_agencies};
pub use estimates::parse_estimate_response;
pub use hate_crime::{
    attach_yearly, merge_hate_crime_years, parse_hate_crime_response, summarize_hate_crime_year,
};
pub use summarized::parse_summarized_response;
