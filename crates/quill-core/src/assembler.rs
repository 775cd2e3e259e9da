//! # Document Assembler
//!
//! Turns an order, its breakdown, the customer and a translator into an
//! [`InvoiceDocument`].
//!
//! ## Assembly Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Order ─────────┐                                                       │
//! │  UserRecord ────┤                                                       │
//! │  Breakdown ─────┼──► DocumentAssembler::assemble ──► InvoiceDocument    │
//! │  &dyn Translator┤           │                                           │
//! │  InvoiceSettings┘           ├── header / bill-to / meta                 │
//! │                             ├── line item (amount = original_price)     │
//! │                             ├── totals (conditional rows)               │
//! │                             ├── paid stamp (status 3 | 4)               │
//! │                             └── footer                                  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The document is returned whole; nothing is streamed to the renderer while
//! it is being built.

use chrono::{FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::document::{
    BillTo, ColumnHeaders, DocumentHeader, Footer, InvoiceDocument, InvoiceMeta, LabeledValue,
    LineItem, PaidStamp, PaymentMethodLine, TotalsBlock, TotalsRow, TotalsRowKind,
};
use crate::format::{format_amount, format_deduction, format_timestamp, PLACEHOLDER};
use crate::i18n::{period_label, status_label, text, TextKey, Translator};
use crate::money::{Money, DEFAULT_CURRENCY_GLYPH};
use crate::resolver::MonetaryBreakdown;
use crate::types::{Order, UserRecord};
use crate::{DEFAULT_SITE_NAME, INVOICE_QUANTITY};

// =============================================================================
// Settings
// =============================================================================

/// Presentation settings supplied by the host application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvoiceSettings {
    /// Shown in the header and the footer.
    pub site_name: String,

    /// Prefixed to every amount.
    pub currency_glyph: String,

    /// Offset from UTC applied to invoice dates, in minutes (480 = UTC+8).
    pub utc_offset_minutes: i32,
}

impl Default for InvoiceSettings {
    fn default() -> Self {
        InvoiceSettings {
            site_name: DEFAULT_SITE_NAME.to_string(),
            currency_glyph: DEFAULT_CURRENCY_GLYPH.to_string(),
            utc_offset_minutes: 0,
        }
    }
}

impl InvoiceSettings {
    /// Sets the site name; `None` or blank keeps the placeholder name.
    pub fn with_site_name(mut self, name: Option<&str>) -> Self {
        self.site_name = match name.map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => DEFAULT_SITE_NAME.to_string(),
        };
        self
    }

    /// The configured offset, falling back to UTC when out of range
    /// (beyond ±24h).
    pub fn utc_offset(&self) -> FixedOffset {
        self.utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(|| Utc.fix())
    }
}

// =============================================================================
// Assembler
// =============================================================================

/// Builds invoice documents. Holds only immutable settings, so one instance
/// can serve any number of threads.
#[derive(Debug, Clone, Default)]
pub struct DocumentAssembler {
    settings: InvoiceSettings,
}

impl DocumentAssembler {
    pub fn new(settings: InvoiceSettings) -> Self {
        DocumentAssembler { settings }
    }

    pub fn settings(&self) -> &InvoiceSettings {
        &self.settings
    }

    /// Assembles the full document.
    ///
    /// ## Example
    /// ```rust
    /// use quill_core::assembler::DocumentAssembler;
    /// use quill_core::document::TotalsRowKind;
    /// use quill_core::i18n::NoTranslation;
    /// use quill_core::resolver::resolve;
    /// use quill_core::types::{OrderRecord, UserRecord};
    ///
    /// let order = OrderRecord::from_json_str(r#"{
    ///     "status": 3, "total_amount": 9000, "discount_amount": 1000,
    ///     "plan": {"month_price": 10000}, "period": "month_price"
    /// }"#).unwrap().normalize();
    ///
    /// let breakdown = resolve(&order);
    /// let doc = DocumentAssembler::default()
    ///     .assemble(&order, &UserRecord::default(), &breakdown, &NoTranslation);
    ///
    /// assert_eq!(doc.totals.row(TotalsRowKind::Discount).unwrap().display, "-¤10.00");
    /// assert!(doc.is_paid());
    /// ```
    pub fn assemble(
        &self,
        order: &Order,
        user: &UserRecord,
        breakdown: &MonetaryBreakdown,
        translator: &dyn Translator,
    ) -> InvoiceDocument {
        let glyph = self.settings.currency_glyph.as_str();
        let offset = self.settings.utc_offset();

        let header = DocumentHeader {
            site_name: self.settings.site_name.clone(),
            title: text(translator, TextKey::InvoiceTitle),
        };

        let bill_to = BillTo {
            label: text(translator, TextKey::BillTo),
            email: user.email().unwrap_or(PLACEHOLDER).to_string(),
        };

        let meta = InvoiceMeta {
            number: LabeledValue {
                label: text(translator, TextKey::InvoiceNo),
                value: order.trade_no.as_deref().unwrap_or(PLACEHOLDER).to_string(),
            },
            date: LabeledValue {
                label: text(translator, TextKey::InvoiceDate),
                value: format_timestamp(order.invoice_timestamp(), &offset),
            },
            status: LabeledValue {
                label: text(translator, TextKey::Status),
                value: status_label(translator, order.status_code),
            },
        };

        let columns = ColumnHeaders {
            description: text(translator, TextKey::Description),
            period: text(translator, TextKey::Period),
            quantity: text(translator, TextKey::Quantity),
            amount: text(translator, TextKey::Amount),
        };

        let line_item = LineItem {
            description: describe(order, translator),
            period: period_label(translator, order.period.as_deref()),
            quantity: INVOICE_QUANTITY,
            amount: breakdown.original_price,
            amount_display: format_amount(breakdown.original_price, glyph),
        };

        let totals = self.totals(breakdown, translator);
        let paid_stamp = paid_stamp(order, translator);

        let footer = Footer {
            message: text(translator, TextKey::FooterText),
            generated_by: format!("Generated by {}", self.settings.site_name),
        };

        debug!(
            trade_no = order.trade_no.as_deref().unwrap_or(PLACEHOLDER),
            rows = totals.rows.len(),
            paid = paid_stamp.is_some(),
            "invoice assembled"
        );

        InvoiceDocument {
            header,
            bill_to,
            meta,
            columns,
            line_item,
            totals,
            paid_stamp,
            footer,
        }
    }

    /// Builds the totals block.
    ///
    /// ## Row Policy
    /// ```text
    /// Subtotal       always
    /// Discount       discount_amount > 0   shown as -¤x, amount negative
    /// Balance Used   balance_amount  > 0   shown as -¤x, amount negative
    /// Handling Fee   handling_amount > 0
    /// TOTAL          always
    /// ```
    /// Downstream reconciliation readers rely on absent rows meaning zero.
    fn totals(&self, breakdown: &MonetaryBreakdown, translator: &dyn Translator) -> TotalsBlock {
        let glyph = self.settings.currency_glyph.as_str();
        let mut rows = Vec::with_capacity(5);

        rows.push(TotalsRow {
            kind: TotalsRowKind::Subtotal,
            label: text(translator, TextKey::Subtotal),
            amount: breakdown.original_price,
            display: format_amount(breakdown.original_price, glyph),
        });

        let adjustments: [(TotalsRowKind, TextKey, Money); 3] = [
            (TotalsRowKind::Discount, TextKey::Discount, breakdown.discount_amount),
            (TotalsRowKind::BalanceUsed, TextKey::BalanceUsed, breakdown.balance_amount),
            (TotalsRowKind::HandlingFee, TextKey::HandlingFee, breakdown.handling_amount),
        ];

        for (kind, key, amount) in adjustments {
            if !amount.is_positive() {
                continue;
            }
            let (signed, display) = if kind.is_deduction() {
                (amount.negate(), format_deduction(amount, glyph))
            } else {
                (amount, format_amount(amount, glyph))
            };
            rows.push(TotalsRow {
                kind,
                label: text(translator, key),
                amount: signed,
                display,
            });
        }

        rows.push(TotalsRow {
            kind: TotalsRowKind::Total,
            label: text(translator, TextKey::Total),
            amount: breakdown.final_total,
            display: format_amount(breakdown.final_total, glyph),
        });

        TotalsBlock { rows }
    }
}

/// Line item description: plan name, else the top-up label for deposits,
/// else the placeholder.
fn describe(order: &Order, translator: &dyn Translator) -> String {
    if let Some(name) = order.plan_name() {
        return name.to_string();
    }
    if order.is_deposit() {
        return text(translator, TextKey::DepositTitle);
    }
    PLACEHOLDER.to_string()
}

fn paid_stamp(order: &Order, translator: &dyn Translator) -> Option<PaidStamp> {
    if !order.is_paid() {
        return None;
    }
    let payment_method = order.payment_name.as_ref().map(|name| PaymentMethodLine {
        label: text(translator, TextKey::PaymentMethod),
        name: name.clone(),
    });
    Some(PaidStamp {
        notice: text(translator, TextKey::PaidNotice),
        payment_method,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::{Catalog, NoTranslation};
    use crate::resolver::resolve;
    use crate::types::OrderRecord;
    use proptest::prelude::*;
    use serde_json::json;
    use std::sync::Arc;

    fn order(value: serde_json::Value) -> Order {
        OrderRecord::from_json_value(value).unwrap().normalize()
    }

    fn assemble(order: &Order) -> InvoiceDocument {
        DocumentAssembler::default().assemble(
            order,
            &UserRecord::default(),
            &resolve(order),
            &NoTranslation,
        )
    }

    fn kinds(doc: &InvoiceDocument) -> Vec<TotalsRowKind> {
        doc.totals.rows.iter().map(|r| r.kind).collect()
    }

    #[test]
    fn test_completed_plan_order_with_discount() {
        let order = order(json!({
            "status": 3,
            "total_amount": 9000,
            "discount_amount": 1000,
            "balance_amount": 0,
            "handling_amount": 0,
            "plan": { "month_price": 10000 },
            "period": "month_price"
        }));
        let doc = assemble(&order);

        assert_eq!(
            kinds(&doc),
            vec![
                TotalsRowKind::Subtotal,
                TotalsRowKind::Discount,
                TotalsRowKind::Total
            ]
        );
        let display: Vec<&str> = doc.totals.rows.iter().map(|r| r.display.as_str()).collect();
        assert_eq!(display, vec!["¤100.00", "-¤10.00", "¤90.00"]);
        assert_eq!(doc.line_item.amount_display, "¤100.00");
        assert_eq!(doc.line_item.period, "Monthly");
        assert_eq!(doc.line_item.quantity, 1);
        assert!(doc.is_paid());
        assert_eq!(doc.meta.status.value, "Completed");
    }

    #[test]
    fn test_reconstructed_order_with_balance() {
        let order = order(json!({
            "total_amount": 5000,
            "discount_amount": 0,
            "balance_amount": 500
        }));
        let doc = assemble(&order);

        assert!(!doc.totals.contains(TotalsRowKind::Discount));
        let balance = doc.totals.row(TotalsRowKind::BalanceUsed).unwrap();
        assert_eq!(balance.label, "Balance Used");
        assert_eq!(balance.display, "-¤5.00");
        assert_eq!(balance.amount, Money::from_cents(-500));
        assert_eq!(doc.totals.row(TotalsRowKind::Subtotal).unwrap().display, "¤55.00");
        assert_eq!(doc.totals.row(TotalsRowKind::Total).unwrap().display, "¤50.00");
    }

    #[test]
    fn test_unknown_status_has_no_stamp() {
        let doc = assemble(&order(json!({ "status": 9, "total_amount": 100 })));
        assert_eq!(doc.meta.status.value, "Unknown status");
        assert!(doc.paid_stamp.is_none());
    }

    #[test]
    fn test_unknown_period_renders_raw_code() {
        let doc = assemble(&order(json!({ "period": "zzz" })));
        assert_eq!(doc.line_item.period, "zzz");
        assert_eq!(doc.line_item.description, "-");
    }

    #[test]
    fn test_handling_fee_row() {
        let doc = assemble(&order(json!({
            "status": 4,
            "total_amount": 2000,
            "handling_amount": 60,
            "plan": { "name": "Lite", "quarter_price": 2000 },
            "period": "quarter_price",
            "payment": { "name": "Stripe" }
        })));

        let fee = doc.totals.row(TotalsRowKind::HandlingFee).unwrap();
        assert_eq!(fee.display, "¤0.60");
        assert_eq!(fee.amount, Money::from_cents(60));
        assert_eq!(doc.totals.row(TotalsRowKind::Total).unwrap().display, "¤20.60");

        let stamp = doc.paid_stamp.unwrap();
        assert_eq!(stamp.notice, "PAID");
        assert_eq!(stamp.payment_method.unwrap().display(), "Via: Stripe");
    }

    #[test]
    fn test_paid_without_payment_name() {
        let doc = assemble(&order(json!({ "status": 3 })));
        let stamp = doc.paid_stamp.unwrap();
        assert!(stamp.payment_method.is_none());
    }

    #[test]
    fn test_deposit_description_and_placeholders() {
        let doc = assemble(&order(json!({
            "period": "deposit",
            "total_amount": 10000
        })));
        assert_eq!(doc.line_item.description, "Account top-up");
        assert_eq!(doc.line_item.period, "Top-up");
        assert_eq!(doc.bill_to.email, "-");
        assert_eq!(doc.meta.number.value, "-");
        assert_eq!(doc.meta.date.value, "-");
    }

    #[test]
    fn test_header_and_footer() {
        let settings = InvoiceSettings::default().with_site_name(Some("Nimbus"));
        let order = order(json!({ "trade_no": "T-1", "created_at": 1704067200 }));
        let user = UserRecord {
            email: Some("ada@example.com".to_string()),
        };
        let doc = DocumentAssembler::new(settings).assemble(
            &order,
            &user,
            &resolve(&order),
            &NoTranslation,
        );

        assert_eq!(doc.header.site_name, "Nimbus");
        assert_eq!(doc.header.title, "INVOICE");
        assert_eq!(doc.bill_to.label, "BILL TO");
        assert_eq!(doc.bill_to.email, "ada@example.com");
        assert_eq!(doc.meta.number.value, "T-1");
        assert_eq!(doc.meta.date.value, "2024/01/01 00:00");
        assert_eq!(doc.footer.message, "Thank you for your business!");
        assert_eq!(doc.footer.generated_by, "Generated by Nimbus");
    }

    #[test]
    fn test_default_site_name() {
        let doc = assemble(&Order::default());
        assert_eq!(doc.header.site_name, DEFAULT_SITE_NAME);
        assert_eq!(
            InvoiceSettings::default().with_site_name(Some("  ")).site_name,
            DEFAULT_SITE_NAME
        );
    }

    #[test]
    fn test_paid_at_preferred_over_created_at() {
        let settings = InvoiceSettings {
            utc_offset_minutes: 480,
            ..InvoiceSettings::default()
        };
        let order = order(json!({ "created_at": 1704067200, "paid_at": 1704153600 }));
        let doc = DocumentAssembler::new(settings).assemble(
            &order,
            &UserRecord::default(),
            &resolve(&order),
            &NoTranslation,
        );
        assert_eq!(doc.meta.date.value, "2024/01/02 08:00");
    }

    #[test]
    fn test_translated_document() {
        let catalog = Catalog::from_json_str(
            r#"{
                "invoice": { "subtotal": "小计", "discount": "优惠", "total": "总计", "paid_notice": "已支付" },
                "shop": { "plan": { "price_options": { "month": "月付" } } },
                "payment": { "status": { "completed": "已完成" } }
            }"#,
        )
        .unwrap();
        let order = order(json!({
            "status": 3,
            "total_amount": 9000,
            "discount_amount": 1000,
            "plan": { "month_price": 10000 },
            "period": "month_price"
        }));
        let settings = InvoiceSettings {
            currency_glyph: "¥".to_string(),
            ..InvoiceSettings::default()
        };
        let doc = DocumentAssembler::new(settings).assemble(
            &order,
            &UserRecord::default(),
            &resolve(&order),
            &catalog,
        );

        let labels: Vec<&str> = doc.totals.rows.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["小计", "优惠", "总计"]);
        assert_eq!(doc.totals.row(TotalsRowKind::Discount).unwrap().display, "-¥10.00");
        assert_eq!(doc.line_item.period, "月付");
        assert_eq!(doc.meta.status.value, "已完成");
        assert_eq!(doc.paid_stamp.unwrap().notice, "已支付");
        // Untranslated keys fall back
        assert_eq!(doc.columns.description, "DESCRIPTION");
    }

    #[test]
    fn test_utc_offset_out_of_range_falls_back() {
        let settings = InvoiceSettings {
            utc_offset_minutes: 100_000,
            ..InvoiceSettings::default()
        };
        assert_eq!(settings.utc_offset().local_minus_utc(), 0);
    }

    #[tokio::test]
    async fn test_concurrent_assembly_is_independent() {
        let assembler = Arc::new(DocumentAssembler::default());
        let order = Arc::new(order(json!({
            "status": 3,
            "total_amount": 9000,
            "discount_amount": 1000,
            "plan": { "month_price": 10000 },
            "period": "month_price"
        })));
        let expected = assemble(&order);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let assembler = Arc::clone(&assembler);
                let order = Arc::clone(&order);
                tokio::spawn(async move {
                    assembler.assemble(
                        &order,
                        &UserRecord::default(),
                        &resolve(&order),
                        &NoTranslation,
                    )
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.await.unwrap(), expected);
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: adjustment rows appear iff their amount is > 0, and
        /// Subtotal/Total are always first and last.
        #[test]
        fn conditional_rows_follow_amounts(
            total in -1_000i64..1_000_000,
            discount in -1_000i64..100_000,
            balance in -1_000i64..100_000,
            handling in -1_000i64..10_000,
        ) {
            let doc = assemble(&order(json!({
                "total_amount": total,
                "discount_amount": discount,
                "balance_amount": balance,
                "handling_amount": handling
            })));

            prop_assert_eq!(doc.totals.contains(TotalsRowKind::Discount), discount > 0);
            prop_assert_eq!(doc.totals.contains(TotalsRowKind::BalanceUsed), balance > 0);
            prop_assert_eq!(doc.totals.contains(TotalsRowKind::HandlingFee), handling > 0);
            prop_assert_eq!(doc.totals.rows.first().map(|r| r.kind), Some(TotalsRowKind::Subtotal));
            prop_assert_eq!(doc.totals.rows.last().map(|r| r.kind), Some(TotalsRowKind::Total));
        }

        /// Property: the PAID stamp is present iff status is 3 or 4.
        #[test]
        fn paid_stamp_iff_completed_or_discounted(status in -2i64..12) {
            let doc = assemble(&order(json!({ "status": status })));
            prop_assert_eq!(doc.paid_stamp.is_some(), status == 3 || status == 4);
        }

        /// Property: for non-negative amounts without a plan, the rows add up
        /// to the Total row.
        #[test]
        fn rows_sum_to_total(
            total in 0i64..1_000_000,
            discount in 0i64..100_000,
            balance in 0i64..100_000,
            handling in 0i64..10_000,
        ) {
            let doc = assemble(&order(json!({
                "total_amount": total,
                "discount_amount": discount,
                "balance_amount": balance,
                "handling_amount": handling
            })));
            let total_row = doc.totals.row(TotalsRowKind::Total).map(|r| r.amount);
            prop_assert_eq!(Some(doc.totals.running_sum()), total_row);
        }

        /// Property: assembling twice yields identical documents.
        #[test]
        fn assemble_is_idempotent(status in 0i64..6, total in 0i64..100_000) {
            let normalized = order(json!({ "status": status, "total_amount": total }));
            prop_assert_eq!(assemble(&normalized), assemble(&normalized));
        }
    }
}
