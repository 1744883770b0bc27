//! `Cache-Control` policies for proxied responses.

use actix_web::http::header::{CACHE_CONTROL, HeaderName};

/// How long a proxied response may be cached by browsers and CDNs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
    /// Per-query crime statistics.
    HalfHour,
    /// Agency rosters and the state map, which change rarely.
    Hour,
}

impl CachePolicy {
    /// Lifetime in seconds.
    #[must_use]
    pub const fn max_age(self) -> u32 {
        match self {
            Self::HalfHour => 1800,
            Self::Hour => 3600,
        }
    }

    #[must_use]
    pub fn header_value(self) -> String {
        let age = self.max_age();
        format!("public, max-age={age}, s-maxage={age}")
    }

    /// The header pair for `HttpResponseBuilder::insert_header`.
    #[must_use]
    pub fn header(self) -> (HeaderName, String) {
        (CACHE_CONTROL, self.header_value())
    }
}
