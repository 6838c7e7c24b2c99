//! Display helpers for amounts and months.

use crate::categories::currency;

pub const SHORT_MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Short month name for a zero-based month index; empty when out of range.
pub fn short_month_name(month0: usize) -> &'static str {
    SHORT_MONTHS.get(month0).copied().unwrap_or("")
}

/// Two-decimal amount with thousands separators and the currency symbol,
/// e.g. `-$1,234.50`. Unknown currency codes are used as a prefix.
/// NaN and infinities print as zero.
pub fn format_currency(amount: f64, code: &str) -> String {
    let amount = if amount.is_finite() { amount } else { 0.0 };
    let symbol = currency(code)
        .map(|c| c.symbol.to_string())
        .unwrap_or_else(|| format!("{code} "));

    let cents = format!("{:.2}", amount.abs());
    let (whole, frac) = cents.split_once('.').unwrap_or((cents.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 && cents != "0.00" { "-" } else { "" };
    format!("{sign}{symbol}{grouped}.{frac}")
}

/// Cut `text` to `max` characters, appending `...` when shortened.
pub fn truncate_text(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max).collect();
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(1234.5, "USD"), "$1,234.50");
        assert_eq!(format_currency(-750.0, "USD"), "-$750.00");
        assert_eq!(format_currency(1_000_000.0, "EUR"), "€1,000,000.00");
        assert_eq!(format_currency(0.004, "GBP"), "£0.00");
        assert_eq!(format_currency(5.0, "CHF"), "CHF 5.00");
    }

    #[test]
    fn test_non_finite_amounts_print_as_zero() {
        assert_eq!(format_currency(f64::NAN, "USD"), "$0.00");
        assert_eq!(format_currency(f64::INFINITY, "USD"), "$0.00");
        assert_eq!(format_currency(f64::NEG_INFINITY, "EUR"), "€0.00");
    }

    #[test]
    fn test_month_names() {
        assert_eq!(short_month_name(0), "Jan");
        assert_eq!(short_month_name(11), "Dec");
        assert_eq!(short_month_name(12), "");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("a longer description", 8), "a longer...");
    }
}
