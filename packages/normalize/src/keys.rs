//! Priority-ordered key selection for label-keyed upstream maps.
//!
//! The summarized endpoint keys its series by human-readable labels that
//! embed the scope name, e.g.
//!
//! ```text
//! "actuals": {
//!     "United States Offenses": { "01-2020": 93386, ... },
//!     "United States Clearances": { "01-2020": 40185, ... }
//! }
//! ```
//!
//! A [`KeyMatcher`] picks one of those keys by substring, trying in order:
//!
//! 1. [`MatchStage::Preferred`]: contains `include` and not `exclude`
//! 2. [`MatchStage::IncludeOnly`]: contains `include`
//! 3. [`MatchStage::Fallback`]: the first key that does not contain
//!    `exclude`
//!
//! The fallback never picks a key carrying the excluded label, so the
//! offense series and the clearance series cannot be swapped.

use serde_json::{Map, Value};

/// Which rule of a [`KeyMatcher`] produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MatchStage {
    /// Contains the include label and not the exclude label.
    Preferred,
    /// Contains the include label (and the exclude label too).
    IncludeOnly,
    /// No key contains the include label; first eligible key taken.
    Fallback,
}

/// A key picked by a [`KeyMatcher`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyMatch<'a> {
    pub key: &'a str,
    pub stage: MatchStage,
}

/// Substring-based key selector. See the module docs for the priority
/// order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyMatcher {
    include: Option<&'static str>,
    exclude: Option<&'static str>,
}

impl KeyMatcher {
    /// Matches the first key.
    pub const ANY: Self = Self {
        include: None,
        exclude: None,
    };

    /// Selects the monthly offense series (counts or rates).
    pub const OFFENSES: Self = Self::containing("Offenses").excluding("Clearances");

    /// Selects the monthly clearance series.
    pub const CLEARANCES: Self = Self::containing("Clearances").excluding("Offenses");

    /// Matches keys containing `label`.
    #[must_use]
    pub const fn containing(label: &'static str) -> Self {
        Self {
            include: Some(label),
            exclude: None,
        }
    }

    /// Demotes keys containing `label`.
    #[must_use]
    pub const fn excluding(mut self, label: &'static str) -> Self {
        self.exclude = Some(label);
        self
    }

    fn includes(&self, key: &str) -> bool {
        self.include.is_none_or(|label| key.contains(label))
    }

    fn excludes(&self, key: &str) -> bool {
        self.exclude.is_some_and(|label| key.contains(label))
    }

    /// Picks a key from `keys`, in iteration order within each stage.
    #[must_use]
    pub fn select<'a, I>(&self, keys: I) -> Option<KeyMatch<'a>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let keys: Vec<&'a str> = keys.into_iter().collect();

        let preferred = keys
            .iter()
            .find(|k| self.includes(k) && !self.excludes(k))
            .map(|k| (*k, MatchStage::Preferred));

        let include_only = || {
            keys.iter()
                .find(|k| self.include.is_some() && self.includes(k))
                .map(|k| (*k, MatchStage::IncludeOnly))
        };

        let fallback = || {
            keys.iter()
                .find(|k| !self.excludes(k))
                .map(|k| (*k, MatchStage::Fallback))
        };

        preferred
            .or_else(include_only)
            .or_else(fallback)
            .map(|(key, stage)| KeyMatch { key, stage })
    }

    /// Picks a key from a JSON object and returns its value.
    #[must_use]
    pub fn find<'a>(&self, map: &'a Map<String, Value>) -> Option<(KeyMatch<'a>, &'a Value)> {
        let found = self.select(map.keys().map(String::as_str))?;
        map.get(found.key).map(|value| (found, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(list: &[&'static str]) -> Vec<&'static str> {
        list.to_vec()
    }

    #[test]
    fn national_labels() {
        let k = keys(&["United States Offenses", "United States Clearances"]);
        let offenses = KeyMatcher::OFFENSES.select(k.iter().copied()).unwrap();
        assert_eq!(offenses.key, "United States Offenses");
        assert_eq!(offenses.stage, MatchStage::Preferred);

        let clearances = KeyMatcher::CLEARANCES.select(k.iter().copied()).unwrap();
        assert_eq!(clearances.key, "United States Clearances");
        assert_eq!(clearances.stage, MatchStage::Preferred);
    }

    #[test]
    fn state_labels_listed_clearances_first() {
        let k = keys(&["California Clearances", "California Offenses"]);
        assert_eq!(
            KeyMatcher::OFFENSES.select(k.iter().copied()).unwrap().key,
            "California Offenses"
        );
        assert_eq!(
            KeyMatcher::CLEARANCES.select(k.iter().copied()).unwrap().key,
            "California Clearances"
        );
    }

    #[test]
    fn agency_labels() {
        let k = keys(&[
            "Albuquerque Police Department Offenses",
            "Albuquerque Police Department Clearances",
        ]);
        assert_eq!(
            KeyMatcher::OFFENSES.select(k.iter().copied()).unwrap().key,
            "Albuquerque Police Department Offenses"
        );
    }

    #[test]
    fn unlabelled_series_falls_back_to_first_key() {
        let k = keys(&["United States", "Other"]);
        let found = KeyMatcher::OFFENSES.select(k.iter().copied()).unwrap();
        assert_eq!(found.key, "United States");
        assert_eq!(found.stage, MatchStage::Fallback);
    }

    #[test]
    fn fallback_never_crosses_series() {
        let only_clearances = keys(&["State Clearances"]);
        assert_eq!(KeyMatcher::OFFENSES.select(only_clearances), None);

        let only_offenses = keys(&["State Offenses"]);
        assert_eq!(KeyMatcher::CLEARANCES.select(only_offenses), None);
    }

    #[test]
    fn combined_label_matches_include_only() {
        let k = keys(&["Offenses and Clearances"]);
        let found = KeyMatcher::OFFENSES.select(k).unwrap();
        assert_eq!(found.stage, MatchStage::IncludeOnly);
    }

    #[test]
    fn any_takes_first_key_in_order() {
        let map = serde_json::json!({ "Texas": 1, "Alabama": 2 });
        let (found, value) = KeyMatcher::ANY.find(map.as_object().unwrap()).unwrap();
        assert_eq!(found.key, "Texas");
        assert_eq!(value, &serde_json::json!(1));
    }

    #[test]
    fn empty_map_has_no_match() {
        assert_eq!(KeyMatcher::ANY.select(Vec::<&str>::new()), None);
        assert_eq!(KeyMatcher::OFFENSES.select(Vec::<&str>::new()), None);
    }
}
