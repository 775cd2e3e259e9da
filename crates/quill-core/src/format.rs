//! # Display Formatting
//!
//! Currency and date strings as they appear on the invoice.
//!
//! ```text
//! Money(9000)            ──► "¤90.00"
//! deduction Money(1000)  ──► "-¤10.00"
//! Some(1704067200), +8h  ──► "2024/01/01 08:00"
//! None                   ──► "-"
//! ```

use chrono::{DateTime, FixedOffset};

use crate::money::Money;

/// Rendered in place of any absent value (email, trade number, date, period).
pub const PLACEHOLDER: &str = "-";

/// `YYYY/MM/DD HH:MM`, the layout invoices use regardless of locale.
pub const DATE_FORMAT: &str = "%Y/%m/%d %H:%M";

/// Formats an amount for display.
pub fn format_amount(amount: Money, glyph: &str) -> String {
    amount.format_with(glyph)
}

/// Formats an amount that is subtracted on the invoice (discount, balance).
///
/// The leading `-` is prepended to the formatted value, so a positive
/// deduction of 1000 reads `-¤10.00`.
pub fn format_deduction(amount: Money, glyph: &str) -> String {
    format!("-{}", amount.format_with(glyph))
}

/// Formats an epoch-second timestamp in the given offset.
///
/// Absent or out-of-range timestamps render [`PLACEHOLDER`].
pub fn format_timestamp(timestamp: Option<i64>, offset: &FixedOffset) -> String {
    match timestamp.and_then(|secs| DateTime::from_timestamp(secs, 0)) {
        Some(utc) => utc.with_timezone(offset).format(DATE_FORMAT).to_string(),
        None => PLACEHOLDER.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(Money::from_cents(10000), "¤"), "¤100.00");
        assert_eq!(format_amount(Money::zero(), "¤"), "¤0.00");
        assert_eq!(format_amount(Money::from_cents(1), "¥"), "¥0.01");
    }

    #[test]
    fn test_format_deduction() {
        assert_eq!(format_deduction(Money::from_cents(1000), "¤"), "-¤10.00");
        assert_eq!(format_deduction(Money::from_cents(500), "¤"), "-¤5.00");
    }

    #[test]
    fn test_format_timestamp_utc() {
        assert_eq!(format_timestamp(Some(1704067200), &utc()), "2024/01/01 00:00");
        assert_eq!(format_timestamp(Some(1704070920), &utc()), "2024/01/01 01:02");
    }

    #[test]
    fn test_format_timestamp_with_offset() {
        let shanghai = FixedOffset::east_opt(8 * 3600).unwrap();
        assert_eq!(format_timestamp(Some(1704067200), &shanghai), "2024/01/01 08:00");

        let new_york = FixedOffset::west_opt(5 * 3600).unwrap();
        assert_eq!(format_timestamp(Some(1704067200), &new_york), "2023/12/31 19:00");
    }

    #[test]
    fn test_format_timestamp_absent() {
        assert_eq!(format_timestamp(None, &utc()), "-");
        assert_eq!(format_timestamp(Some(i64::MAX), &utc()), "-");
    }
}
