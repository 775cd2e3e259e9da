//! # Invoice Document
//!
//! The structured, fully-formatted invoice handed to a renderer.
//!
//! ## Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  header      site_name                                    INVOICE       │
//! │  ─────────────────────────────────────────────────────────────────────  │
//! │  bill_to     BILL TO               meta   INVOICE NO   2024010112345    │
//! │              user@example.com             DATE         2024/01/01 08:00 │
//! │                                           STATUS       Completed        │
//! │                                                                         │
//! │  columns     DESCRIPTION        PERIOD       QTY              AMOUNT    │
//! │  line_item   Pro                Monthly       1              ¤100.00    │
//! │                                                                         │
//! │  totals                                   Subtotal           ¤100.00    │
//! │              (only when > 0)              Discount           -¤10.00    │
//! │              (only when > 0)              Balance Used            ..    │
//! │              (only when > 0)              Handling Fee            ..    │
//! │                                           TOTAL               ¤90.00    │
//! │                                                                         │
//! │  paid_stamp  [ PAID  Via: Alipay ]        (status 3 or 4 only)          │
//! │                                                                         │
//! │  footer            Thank you for your business!                         │
//! │                    Generated by site_name                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every string is final display text and every amount is already derived.
//! A renderer only lays things out; it never recomputes a number.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

/// Site name and document title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DocumentHeader {
    pub site_name: String,
    pub title: String,
}

/// Who the invoice is addressed to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BillTo {
    pub label: String,
    pub email: String,
}

/// A heading plus its value, e.g. `INVOICE NO` / `2024010112345`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LabeledValue {
    pub label: String,
    pub value: String,
}

/// Invoice number, date and order status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InvoiceMeta {
    pub number: LabeledValue,
    pub date: LabeledValue,
    pub status: LabeledValue,
}

/// Headings of the line item table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ColumnHeaders {
    pub description: String,
    pub period: String,
    pub quantity: String,
    pub amount: String,
}

/// The single line on the invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineItem {
    pub description: String,
    pub period: String,
    pub quantity: u32,
    /// Equal to the breakdown's `original_price`.
    pub amount: Money,
    pub amount_display: String,
}

/// What a totals row stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum TotalsRowKind {
    Subtotal,
    Discount,
    BalanceUsed,
    HandlingFee,
    Total,
}

impl TotalsRowKind {
    /// Whether the row is subtracted from the subtotal.
    pub const fn is_deduction(self) -> bool {
        matches!(self, TotalsRowKind::Discount | TotalsRowKind::BalanceUsed)
    }

    /// Whether the row appears on every invoice.
    pub const fn is_mandatory(self) -> bool {
        matches!(self, TotalsRowKind::Subtotal | TotalsRowKind::Total)
    }
}

/// One row of the totals block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TotalsRow {
    pub kind: TotalsRowKind,
    pub label: String,
    /// Signed contribution to the total: deductions are negative.
    pub amount: Money,
    pub display: String,
}

/// The totals block, in print order.
///
/// Always starts with Subtotal and ends with Total. Discount, Balance Used
/// and Handling Fee appear between them only when strictly positive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TotalsBlock {
    pub rows: Vec<TotalsRow>,
}

impl TotalsBlock {
    /// Finds the row of the given kind.
    pub fn row(&self, kind: TotalsRowKind) -> Option<&TotalsRow> {
        self.rows.iter().find(|r| r.kind == kind)
    }

    pub fn contains(&self, kind: TotalsRowKind) -> bool {
        self.row(kind).is_some()
    }

    /// Sum of every row except Total. Equals the Total row's amount when the
    /// breakdown reconciles.
    pub fn running_sum(&self) -> Money {
        self.rows
            .iter()
            .filter(|r| r.kind != TotalsRowKind::Total)
            .fold(Money::zero(), |acc, r| acc + r.amount)
    }
}

/// `Via: <name>` under the PAID notice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PaymentMethodLine {
    pub label: String,
    pub name: String,
}

impl PaymentMethodLine {
    pub fn display(&self) -> String {
        format!("{}: {}", self.label, self.name)
    }
}

/// The PAID stamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PaidStamp {
    pub notice: String,
    pub payment_method: Option<PaymentMethodLine>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Footer {
    pub message: String,
    pub generated_by: String,
}

/// A complete invoice, ready to render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InvoiceDocument {
    pub header: DocumentHeader,
    pub bill_to: BillTo,
    pub meta: InvoiceMeta,
    pub columns: ColumnHeaders,
    pub line_item: LineItem,
    pub totals: TotalsBlock,
    /// Present iff the order status is completed or discounted.
    pub paid_stamp: Option<PaidStamp>,
    pub footer: Footer,
}

impl InvoiceDocument {
    pub fn is_paid(&self) -> bool {
        self.paid_stamp.is_some()
    }

    /// Serializes the document as pretty JSON for downstream renderers.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(kind: TotalsRowKind, cents: i64) -> TotalsRow {
        TotalsRow {
            kind,
            label: format!("{kind:?}"),
            amount: Money::from_cents(cents),
            display: Money::from_cents(cents).to_string(),
        }
    }

    #[test]
    fn test_row_kind_flags() {
        assert!(TotalsRowKind::Discount.is_deduction());
        assert!(TotalsRowKind::BalanceUsed.is_deduction());
        assert!(!TotalsRowKind::HandlingFee.is_deduction());
        assert!(TotalsRowKind::Subtotal.is_mandatory());
        assert!(TotalsRowKind::Total.is_mandatory());
        assert!(!TotalsRowKind::Discount.is_mandatory());
    }

    #[test]
    fn test_running_sum_excludes_total() {
        let block = TotalsBlock {
            rows: vec![
                row(TotalsRowKind::Subtotal, 10000),
                row(TotalsRowKind::Discount, -1000),
                row(TotalsRowKind::HandlingFee, 50),
                row(TotalsRowKind::Total, 9050),
            ],
        };
        assert_eq!(block.running_sum(), Money::from_cents(9050));
        assert!(block.contains(TotalsRowKind::HandlingFee));
        assert!(!block.contains(TotalsRowKind::BalanceUsed));
        assert_eq!(
            block.row(TotalsRowKind::Total).map(|r| r.amount),
            Some(Money::from_cents(9050))
        );
    }

    #[test]
    fn test_payment_method_display() {
        let line = PaymentMethodLine {
            label: "Via".to_string(),
            name: "Stripe".to_string(),
        };
        assert_eq!(line.display(), "Via: Stripe");
    }

    #[test]
    fn test_row_kind_serializes_snake_case() {
        let json = serde_json::to_string(&TotalsRowKind::BalanceUsed).unwrap();
        assert_eq!(json, "\"balance_used\"");
    }
}
