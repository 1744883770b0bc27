#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Client for the FBI Crime Data Explorer (CDE) API.
//!
//! Every request goes through [`retry::send_json`], which retries rate
//! limited (HTTP 429) responses a bounded number of times. Requests that
//! fan out per year or per state run through [`fan_out::settle_all`] so one
//! failing sub-request never aborts the batch.

pub mod client;
pub mod fan_out;
pub mod retry;

use thiserror::Error;

pub use client::{CdeClient, CdeConfig, StateMapOutcome};

/// Errors that can occur while talking to the upstream API.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// The HTTP request could not be completed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Upstream answered with a non-success status.
    #[error("CDE API error: {status} {message}")]
    Status {
        /// HTTP status code returned by upstream.
        status: u16,
        /// Reason phrase or other detail.
        message: String,
    },

    /// The response body was not valid JSON.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

impl UpstreamError {
    /// The upstream HTTP status, if upstream answered at all.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Http(_) | Self::Json(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_is_exposed_only_for_status_errors() {
        let err = UpstreamError::Status {
            status: 404,
            message: "Not Found".to_string(),
        };
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.to_string(), "CDE API error: 404 Not Found");

        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(UpstreamError::from(json_err).status(), None);
    }
}
