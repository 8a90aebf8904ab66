//! Currency codec for the `1.234,56` display format.
//!
//! Formatting never emits a thousands separator; parsing tolerates one. Parsing
//! is lenient: anything unreadable becomes `0.0` and a warning is logged, so a
//! bad cell never aborts the surrounding operation.

use tracing::warn;

/// Suffix appended to a settled month in the tuition grid.
pub const PAID_MARK: &str = " ✅";
/// Suffix appended to a pending or negotiated month in the tuition grid.
pub const DEBTOR_MARK: &str = " ❌";

/// Input accepted by [`parse`]: an already-numeric value or display text.
#[derive(Debug, Clone, Copy)]
pub enum RawAmount<'a> {
    /// Value read from storage or computed
    Number(f64),
    /// Text typed by the operator or copied from a grid cell
    Text(&'a str),
    /// No value at all
    Missing,
}

impl From<f64> for RawAmount<'_> {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl<'a> From<&'a str> for RawAmount<'a> {
    fn from(value: &'a str) -> Self {
        Self::Text(value)
    }
}

impl<'a> From<&'a String> for RawAmount<'a> {
    fn from(value: &'a String) -> Self {
        Self::Text(value.as_str())
    }
}

impl<'a, T: Into<RawAmount<'a>>> From<Option<T>> for RawAmount<'a> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Missing, Into::into)
    }
}

/// Formats an amount with two decimals and a comma separator (`390,10`).
///
/// `None` and non-finite values format as `"0,00"`.
#[must_use]
pub fn format(amount: impl Into<Option<f64>>) -> String {
    match amount.into() {
        Some(value) if value.is_finite() => format!("{value:.2}").replace('.', ","),
        _ => "0,00".to_string(),
    }
}

/// Removes trailing paid/debtor marks and surrounding whitespace.
#[must_use]
pub fn strip_marks(text: &str) -> &str {
    let glyphs = [PAID_MARK.trim(), DEBTOR_MARK.trim()];
    let mut rest = text.trim();
    while let Some(stripped) = glyphs.iter().find_map(|g| rest.strip_suffix(g)) {
        rest = stripped.trim_end();
    }
    rest
}

/// Parses a currency value.
///
/// Text has its marks stripped, `.` removed as a thousands separator and `,`
/// read as the decimal separator. Empty text is zero. Unreadable input is zero
/// and logged.
#[must_use]
pub fn parse<'a>(value: impl Into<RawAmount<'a>>) -> f64 {
    match value.into() {
        RawAmount::Missing => 0.0,
        RawAmount::Number(n) if n.is_finite() => n,
        RawAmount::Number(n) => {
            warn!("Could not use non-finite currency value {n}; treating as 0,00");
            0.0
        }
        RawAmount::Text(text) => parse_text(text),
    }
}

fn parse_text(text: &str) -> f64 {
    let cleaned = strip_marks(text);
    if cleaned.is_empty() {
        return 0.0;
    }
    let normalized = cleaned.replace('.', "").replace(',', ".");
    match normalized.parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => {
            warn!("Could not parse currency text {text:?}; treating as 0,00");
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::init_test_tracing;

    #[test]
    fn test_format() {
        assert_eq!(format(390.1), "390,10");
        assert_eq!(format(1234.5), "1234,50");
        assert_eq!(format(0.0), "0,00");
        assert_eq!(format(None::<f64>), "0,00");
        assert_eq!(format(f64::NAN), "0,00");
    }

    #[test]
    fn test_parse_display_text() {
        assert_eq!(parse("390,10"), 390.1);
        assert_eq!(parse("1.234,56"), 1234.56);
        assert_eq!(parse("  270,18 "), 270.18);
        assert_eq!(parse(""), 0.0);
        assert_eq!(parse(Some("11,00")), 11.0);
        assert_eq!(parse(None::<f64>), 0.0);
        assert_eq!(parse(42.5), 42.5);
    }

    #[test]
    fn test_parse_strips_marks() {
        assert_eq!(parse("390,10 ✅"), 390.1);
        assert_eq!(parse("390,10 ❌"), 390.1);
        assert_eq!(parse("390,10 ❌ ❌"), 390.1);
        assert_eq!(parse(" ✅"), 0.0);
    }

    #[test]
    fn test_parse_is_lenient() {
        init_test_tracing();
        assert_eq!(parse("abc"), 0.0);
        assert_eq!(parse("12,3,4"), 0.0);
        assert_eq!(parse(f64::INFINITY), 0.0);
    }

    #[test]
    fn test_strip_marks() {
        assert_eq!(strip_marks("10,00 ✅"), "10,00");
        assert_eq!(strip_marks("10,00❌"), "10,00");
        assert_eq!(strip_marks("10,00"), "10,00");
    }

    #[test]
    fn test_round_trip() {
        for amount in [0.0, 0.01, 10.0, 11.5, 270.18, 329.46, 390.1, 390.55, 1234.56, 99_999.99] {
            let back = parse(format(amount).as_str());
            assert!((back - amount).abs() < 1e-9, "{amount} came back as {back}");
        }
    }
}
