//! Plain-text tables for terminal output.

use crime_explorer_geography_models::StateMapEntry;
use crime_explorer_measures::breakdown::from_categories;
use crime_explorer_measures::{
    format_kpi_value, format_number, format_percent, format_rate, percent_change,
};
use crime_explorer_stats_models::{
    AgencyListItem, HateCrimeBreakdown, KpiMetric, YearlyAggregate, YoyRow,
};

/// Number of bias categories and offense types listed.
const TOP_CATEGORIES: usize = 10;

#[allow(clippy::cast_precision_loss)]
fn count(n: u64) -> String {
    format_number(n as f64)
}

#[must_use]
pub fn kpi_lines(kpis: &[KpiMetric]) -> String {
    kpis.iter()
        .map(|kpi| {
            let value = format_kpi_value(kpi.value, kpi.format);
            match kpi.previous_value {
                Some(prev) => format!(
                    "{}: {value} ({} vs prior year)",
                    kpi.label,
                    format_percent(percent_change(kpi.value, prev))
                ),
                None => format!("{}: {value}", kpi.label),
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[must_use]
pub fn yearly_table(rows: &[YearlyAggregate]) -> String {
    let mut lines = vec![
        format!(
            "{:<6} {:>12} {:>10} {:>12} {:>14}",
            "YEAR", "COUNT", "RATE", "CLEARANCES", "POPULATION"
        ),
        "-".repeat(58),
    ];
    lines.extend(rows.iter().map(|row| {
        format!(
            "{:<6} {:>12} {:>10} {:>12} {:>14}",
            row.year,
            count(row.count),
            format_rate(row.rate),
            count(row.clearances),
            count(row.population)
        )
    }));
    lines.join("\n")
}

#[must_use]
pub fn yoy_table(rows: &[YoyRow]) -> String {
    let mut lines = vec![
        format!(
            "{:<6} {:>12} {:>10} {:>12} {:>9}",
            "YEAR", "COUNT", "RATE", "CHANGE", "PCT"
        ),
        "-".repeat(53),
    ];
    lines.extend(rows.iter().map(|row| {
        format!(
            "{:<6} {:>12} {:>10} {:>12} {:>9}",
            row.year,
            count(row.count),
            format_rate(row.rate),
            format_number(row.change),
            format_percent(row.percent_change)
        )
    }));
    lines.join("\n")
}

#[must_use]
pub fn hate_crime_report(breakdown: &HateCrimeBreakdown) -> String {
    let mut lines = vec![
        format!(
            "{:<6} {:>10} {:>10} {:>10}",
            "YEAR", "INCIDENTS", "OFFENSES", "VICTIMS"
        ),
        "-".repeat(39),
    ];
    lines.extend(breakdown.yearly.iter().map(|y| {
        format!(
            "{:<6} {:>10} {:>10} {:>10}",
            y.year,
            count(y.incidents),
            count(y.offenses),
            count(y.victims)
        )
    }));

    for (title, categories) in [
        ("Bias categories", &breakdown.bias_categories),
        ("Offense types", &breakdown.offense_types),
    ] {
        lines.push(String::new());
        lines.push(title.to_string());
        lines.extend(
            from_categories(categories)
                .iter()
                .take(TOP_CATEGORIES)
                .map(|share| {
                    format!(
                        "  {:<48} {:>10} {:>6.1}%",
                        share.category,
                        count(share.value),
                        share.percentage
                    )
                }),
        );
    }

    lines.join("\n")
}

#[must_use]
pub fn state_map_table(entries: &[StateMapEntry]) -> String {
    let mut lines = vec![
        format!(
            "{:<4} {:<22} {:>12} {:>10} {:>14}",
            "ST", "NAME", "COUNT", "RATE", "POPULATION"
        ),
        "-".repeat(66),
    ];
    lines.extend(entries.iter().map(|e| {
        format!(
            "{:<4} {:<22} {:>12} {:>10} {:>14}",
            e.state_abbr,
            e.state_name,
            count(e.value),
            format_rate(e.rate),
            count(e.population)
        )
    }));
    lines.join("\n")
}

#[must_use]
pub fn agency_table(agencies: &[&AgencyListItem]) -> String {
    let mut lines = vec![
        format!("{:<10} {:<40} {:<20} {}", "ORI", "NAME", "TYPE", "COUNTY"),
        "-".repeat(90),
    ];
    lines.extend(agencies.iter().map(|a| {
        format!(
            "{:<10} {:<40} {:<20} {}",
            a.ori, a.agency_name, a.agency_type_name, a.county_name
        )
    }));
    lines.join("\n")
}
