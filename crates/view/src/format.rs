//! Display formatters for table cells.
//!
//! Dates render as dd/mm/yyyy, datetimes add hh:mm, and amounts use the
//! id-ID convention (dot thousands separator, comma decimals, `Rp` prefix
//! for currency). Values that do not parse pass through unchanged rather
//! than erroring; the sheet contains sentinel strings like "Never Buy".

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

/// dd/mm/yyyy, or the input unchanged when it is not a date.
pub fn format_date(value: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        return String::new();
    }
    match parse_datetime(value) {
        Some(dt) => dt.format("%d/%m/%Y").to_string(),
        None => value.to_owned(),
    }
}

/// dd/mm/yyyy hh:mm, or the input unchanged when it is not a datetime.
pub fn format_datetime(value: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        return String::new();
    }
    match parse_datetime(value) {
        Some(dt) => dt.format("%d/%m/%Y %H:%M").to_string(),
        None => value.to_owned(),
    }
}

/// Dot-separated number with comma decimals: 1234567.5 -> "1.234.567,50".
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return String::new();
    }
    let negative = value < 0.0;
    let total_cents = (value.abs() * 100.0).round() as u64;
    let whole = total_cents / 100;
    let cents = total_cents % 100;

    let mut out = group_thousands(whole);
    if cents > 0 {
        out.push(',');
        out.push_str(&format!("{cents:02}"));
    }
    if negative {
        out.insert(0, '-');
    }
    out
}

/// "Rp "-prefixed [`format_number`].
pub fn format_currency(value: f64) -> String {
    format!("Rp {}", format_number(value))
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_local());
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok().map(|d| d.and_time(NaiveTime::MIN))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2026-01-05"), "05/01/2026");
        assert_eq!(format_date("2026-01-05T08:30:00"), "05/01/2026");
        assert_eq!(format_date(""), "");
    }

    #[test]
    fn test_format_date_passthrough_for_sentinels() {
        assert_eq!(format_date("Never Buy"), "Never Buy");
        assert_eq!(format_date("soon"), "soon");
    }

    #[test]
    fn test_format_datetime() {
        assert_eq!(format_datetime("2026-01-05T08:30:00"), "05/01/2026 08:30");
        assert_eq!(format_datetime("2026-01-05 08:30:00"), "05/01/2026 08:30");
        assert_eq!(format_datetime("2026-01-05"), "05/01/2026 00:00");
    }

    #[test]
    fn test_format_number_groups_thousands() {
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(999.0), "999");
        assert_eq!(format_number(1_000.0), "1.000");
        assert_eq!(format_number(1_234_567.0), "1.234.567");
    }

    #[test]
    fn test_format_number_decimals_and_sign() {
        assert_eq!(format_number(1234.5), "1.234,50");
        assert_eq!(format_number(-50_000.0), "-50.000");
        assert_eq!(format_number(0.995), "1");
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(150_000.0), "Rp 150.000");
    }
}
