use crime_explorer_stats_models::{CategoryBreakdown, DemographicBreakdown};

/// Converts labelled counts into shares of their total, descending by
/// value. Percentages are `0` when the total is `0`; ties keep input order.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn build_demographic_breakdown<I, S>(counts: I) -> Vec<DemographicBreakdown>
where
    I: IntoIterator<Item = (S, u64)>,
    S: Into<String>,
{
    let entries: Vec<(String, u64)> = counts
        .into_iter()
        .map(|(category, value)| (category.into(), value))
        .collect();
    let total: f64 = entries.iter().map(|(_, v)| *v as f64).sum();

    let mut out: Vec<DemographicBreakdown> = entries
        .into_iter()
        .map(|(category, value)| DemographicBreakdown {
            category,
            value,
            percentage: if total > 0.0 {
                value as f64 / total * 100.0
            } else {
                0.0
            },
        })
        .collect();

    out.sort_by(|a, b| b.value.cmp(&a.value));
    out
}

/// Shares of a hate-crime category breakdown.
#[must_use]
pub fn from_categories(categories: &[CategoryBreakdown]) -> Vec<DemographicBreakdown> {
    build_demographic_breakdown(categories.iter().map(|c| (c.category.clone(), c.count)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shares_sum_to_one_hundred() {
        let out = build_demographic_breakdown([("Male", 75_u64), ("Female", 25)]);
        assert_eq!(out[0].category, "Male");
        assert!((out[0].percentage - 75.0).abs() < 1e-9);
        assert!((out[1].percentage - 25.0).abs() < 1e-9);
    }

    #[test]
    fn sorted_descending() {
        let out = build_demographic_breakdown([("a", 1_u64), ("b", 3), ("c", 2)]);
        let order: Vec<&str> = out.iter().map(|d| d.category.as_str()).collect();
        assert_eq!(order, vec!["b", "c", "a"]);
    }

    #[test]
    fn zero_total_gives_zero_percentages() {
        let out = build_demographic_breakdown([("a", 0_u64), ("b", 0)]);
        assert!(out.iter().all(|d| d.percentage.abs() < f64::EPSILON));
    }

    #[test]
    fn huge_counts_do_not_overflow_the_total() {
        let out = build_demographic_breakdown([
            ("a", 10_000_000_000_000_000_000_u64),
            ("b", 10_000_000_000_000_000_000),
        ]);
        assert!((out[0].percentage - 50.0).abs() < 1e-9);
        assert!((out[1].percentage - 50.0).abs() < 1e-9);
    }

    #[test]
    fn converts_category_breakdowns() {
        let out = from_categories(&[
            CategoryBreakdown {
                category: "Anti-Asian".to_string(),
                count: 1,
            },
            CategoryBreakdown {
                category: "Anti-Jewish".to_string(),
                count: 3,
            },
        ]);
        assert_eq!(out[0].category, "Anti-Jewish");
        assert!((out[0].percentage - 75.0).abs() < 1e-9);
    }
}
