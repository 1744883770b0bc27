//! Display formatting for dashboard values (en-US conventions).

use crime_explorer_stats_models::KpiFormat;

/// Inserts `,` every three digits of an unsigned integer string.
fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Formats with thousands separators and up to three fraction digits,
/// e.g. `1234567` → `"1,234,567"`, `1234.5` → `"1,234.5"`.
#[must_use]
pub fn format_number(n: f64) -> String {
    if !n.is_finite() {
        return n.to_string();
    }

    let rounded = (n * 1000.0).round() / 1000.0;
    let text = format!("{:.3}", rounded.abs());
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let mut out = String::new();
    if rounded < 0.0 {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part));
    if !frac_part.is_empty() {
        out.push('.');
        out.push_str(frac_part);
    }
    out
}

/// One decimal place, e.g. `380.73` → `"380.7"`.
#[must_use]
pub fn format_rate(n: f64) -> String {
    format!("{n:.1}")
}

/// Signed percentage with one decimal place, e.g. `4.26` → `"+4.3%"`.
#[must_use]
pub fn format_percent(n: f64) -> String {
    let sign = if n > 0.0 { "+" } else { "" };
    format!("{sign}{n:.1}%")
}

#[must_use]
pub fn format_kpi_value(value: f64, format: KpiFormat) -> String {
    match format {
        KpiFormat::Number => format_number(value),
        KpiFormat::Rate => format_rate(value),
        KpiFormat::Percent => format_percent(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_get_separators() {
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(999.0), "999");
        assert_eq!(format_number(1000.0), "1,000");
        assert_eq!(format_number(1_234_567.0), "1,234,567");
        assert_eq!(format_number(-45_000.0), "-45,000");
        assert_eq!(format_number(1234.5), "1,234.5");
        assert_eq!(format_number(0.12345), "0.123");
    }

    #[test]
    fn rates_have_one_decimal() {
        assert_eq!(format_rate(380.73), "380.7");
        assert_eq!(format_rate(12.0), "12.0");
    }

    #[test]
    fn percents_are_signed() {
        assert_eq!(format_percent(4.26), "+4.3%");
        assert_eq!(format_percent(-3.0), "-3.0%");
        assert_eq!(format_percent(0.0), "0.0%");
    }

    #[test]
    fn kpi_dispatch() {
        assert_eq!(format_kpi_value(12_345.0, KpiFormat::Number), "12,345");
        assert_eq!(format_kpi_value(12.34, KpiFormat::Rate), "12.3");
        assert_eq!(format_kpi_value(-1.26, KpiFormat::Percent), "-1.3%");
    }
}
