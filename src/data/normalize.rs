//! Cell-level cleanup shared by both tables.
//!
//! Nothing here fails: a value that cannot be interpreted becomes `None` and the
//! caller decides whether that drops the row (years) or marks a gap (metrics).

use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("static regex"));
static ZERO_FRACTION: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.0+$").expect("static regex"));

/// Parse a numeric cell. Empty, non-numeric and non-finite values are missing.
pub fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a year cell, truncating fractional input (`"2020.0"` → 2020).
pub fn parse_year(raw: &str) -> Option<i32> {
    let value = parse_number(raw)?.trunc();
    if value < i32::MIN as f64 || value > i32::MAX as f64 {
        return None;
    }
    Some(value as i32)
}

/// Trim whitespace and enclosing quotes, then collapse internal whitespace runs.
pub fn clean_key(raw: &str) -> String {
    let stripped = raw.trim_matches(|c: char| c.is_whitespace() || c == '\'' || c == '"');
    WHITESPACE_RUN.replace_all(stripped, " ").into_owned()
}

/// [`clean_key`] plus removal of a trailing `.0`, `.00`, … so `16.0` ≡ `16`.
pub fn clean_code(raw: &str) -> String {
    let key = clean_key(raw);
    ZERO_FRACTION.replace(&key, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn years_accept_integer_and_float_text() {
        assert_eq!(parse_year("2020"), Some(2020));
        assert_eq!(parse_year("2020.0"), Some(2020));
        assert_eq!(parse_year(" 2021 "), Some(2021));
        assert_eq!(parse_year("abc"), None);
        assert_eq!(parse_year(""), None);
        assert_eq!(parse_year("NaN"), None);
    }

    #[test]
    fn numbers_coerce_or_go_missing() {
        assert_eq!(parse_number("0.42"), Some(0.42));
        assert_eq!(parse_number("55000"), Some(55000.0));
        assert_eq!(parse_number("n/a"), None);
        assert_eq!(parse_number("inf"), None);
    }

    #[test]
    fn quoted_cip_loses_zero_suffix() {
        assert_eq!(clean_code("'16.0'"), "16");
        assert_eq!(clean_code(" \"16.00\" "), "16");
        assert_eq!(clean_code("13.13"), "13.13");
        assert_eq!(clean_code("30.52"), "30.52");
        assert_eq!(clean_code("10"), "10");
    }

    #[test]
    fn level_whitespace_is_collapsed() {
        assert_eq!(clean_key("  Doctor's \t  degree "), "Doctor's degree");
        assert_eq!(clean_key("'B.A.'"), "B.A.");
    }
}
