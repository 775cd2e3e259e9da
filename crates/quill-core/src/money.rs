//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Upstream order APIs send amounts as minor units (cents):              │
//! │    total_amount: 9000   → ¤90.00                                        │
//! │                                                                         │
//! │  If we divided by 100 early and added floats:                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  OUR SOLUTION: amounts stay i64 minor units through every              │
//! │  calculation; only `format_with` splits them into major.minor.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use quill_core::money::Money;
//!
//! let price = Money::from_cents(10000);
//! let discount = Money::from_cents(1000);
//! assert_eq!((price - discount).to_string(), "¤90.00");
//! assert_eq!(price.format_with("$"), "$100.00");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use ts_rs::TS;

/// Currency glyph used when the caller configures none.
pub const DEFAULT_CURRENCY_GLYPH: &str = "¤";

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit.
///
/// ## Design Decisions
/// - **i64 (signed)**: Upstream records are loosely typed and may carry
///   negative adjustments; we keep them visible instead of clamping
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Newtype**: serializes as a bare integer
///
/// ## Where Money Flows
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  OrderRecord.*_amount ──► Order (defaults applied) ──► Breakdown       │
/// │                                                          │              │
/// │  Plan price (f64) ──► Money::from_rounded ───────────────┘              │
/// │                                                          ▼              │
/// │                                        TotalsRow.amount + display       │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from minor units.
    ///
    /// ## Example
    /// ```rust
    /// use quill_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates Money from a possibly fractional minor-unit value, rounding
    /// half away from zero.
    ///
    /// Plan price tables arrive as JSON numbers that are expected to be whole
    /// already; rounding only absorbs float noise such as `9999.999999`.
    /// Returns `None` for NaN and infinities. Values beyond the i64 range
    /// saturate.
    ///
    /// ## Example
    /// ```rust
    /// use quill_core::money::Money;
    ///
    /// assert_eq!(Money::from_rounded(1999.5), Some(Money::from_cents(2000)));
    /// assert_eq!(Money::from_rounded(-2.5), Some(Money::from_cents(-3)));
    /// assert_eq!(Money::from_rounded(f64::NAN), None);
    /// ```
    pub fn from_rounded(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        // f64::round is half-away-from-zero; `as` saturates at the i64 bounds
        Some(Money(value.round() as i64))
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion (truncated toward zero).
    ///
    /// ## Example
    /// ```rust
    /// use quill_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(1099).major(), 10);
    /// assert_eq!(Money::from_cents(-550).major(), -5);
    /// ```
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is strictly greater than zero.
    ///
    /// This is the test that decides whether an adjustment row appears on
    /// the invoice.
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the negated value.
    #[inline]
    pub const fn negate(&self) -> Self {
        Money(self.0.saturating_neg())
    }

    /// Formats the amount with the given currency glyph and two decimals.
    ///
    /// The sign goes after the glyph (`¤-5.50`), the way a glyph prefixed to a
    /// fixed-point string reads. Deduction rows on the invoice add their own
    /// leading `-` to a positive amount instead.
    ///
    /// ## Example
    /// ```rust
    /// use quill_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(1099).format_with("¥"), "¥10.99");
    /// assert_eq!(Money::from_cents(-550).format_with("¤"), "¤-5.50");
    /// assert_eq!(Money::from_cents(-5).format_with("¤"), "¤-0.05");
    /// ```
    pub fn format_with(&self, glyph: &str) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!(
            "{}{}{}.{:02}",
            glyph,
            sign,
            self.major().abs(),
            self.minor_part()
        )
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display uses [`DEFAULT_CURRENCY_GLYPH`].
///
/// ## Note
/// Documents are built with the configured glyph via `format_with`; Display
/// is for logs and debugging.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_with(DEFAULT_CURRENCY_GLYPH))
    }
}

impl From<i64> for Money {
    fn from(cents: i64) -> Self {
        Money(cents)
    }
}

/// Addition of two Money values.
///
/// Saturates at the i64 bounds: records are untrusted and resolution must
/// not panic on absurd amounts.
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

/// Addition assignment (+=).
impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

/// Subtraction of two Money values.
impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

/// Subtraction assignment (-=).
impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
