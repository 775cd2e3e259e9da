//! # Amount Resolver
//!
//! Derives the canonical monetary breakdown of an order.
//!
//! ## Derivation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   plan[period] resolves?                                                │
//! │        │                                                                │
//! │        ├── yes ─► original_price = round(plan[period])   (Plan)         │
//! │        │                                                                │
//! │        └── no ──► original_price = total + discount + balance           │
//! │                                                  (Reconstructed)        │
//! │                                                                         │
//! │   order_amount = total                                                  │
//! │   final_total  = order_amount + handling                                │
//! │                                                                         │
//! │   Subtotal  original_price                                              │
//! │ - Discount  discount                                                    │
//! │ - Balance   balance                                                     │
//! │ = Order     order_amount       (holds by construction when              │
//! │ + Handling  handling            reconstructed; checked by `audit`       │
//! │ = Total     final_total         when plan-priced)                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Resolution is total: every numeric field was defaulted during
//! normalization, so there is nothing left to fail on.

use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use crate::money::Money;
use crate::types::{Order, OrderRecord};

/// Which branch produced `original_price`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum PriceSource {
    /// Taken from the plan's price table for the order's period.
    Plan,
    /// Rebuilt as `total + discount + balance` (deposits, missing plans).
    Reconstructed,
}

/// The reconciled amounts printed on an invoice, all in minor units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MonetaryBreakdown {
    /// Subtotal before adjustments; also the line item amount.
    pub original_price: Money,
    pub price_source: PriceSource,
    pub discount_amount: Money,
    /// Wallet balance applied to the order.
    pub balance_amount: Money,
    pub handling_amount: Money,
    /// What the order itself charged (`total_amount`).
    pub order_amount: Money,
    /// `order_amount + handling_amount`.
    pub final_total: Money,
}

impl MonetaryBreakdown {
    /// `original_price - discount - balance`: what the order amount should be
    /// if the subtotal and the adjustments agree.
    pub fn expected_order_amount(&self) -> Money {
        self.original_price - self.discount_amount - self.balance_amount
    }

    /// Whether `final_total == original_price - discount - balance + handling`.
    ///
    /// Always true for [`PriceSource::Reconstructed`]. For plan-priced orders
    /// it is false when the upstream amounts disagree with the plan table.
    pub fn reconciles(&self) -> bool {
        self.final_total == self.expected_order_amount() + self.handling_amount
    }
}

/// Derives the breakdown for a normalized order.
///
/// ## Example
/// ```rust
/// use quill_core::resolver::{resolve, PriceSource};
/// use quill_core::types::OrderRecord;
///
/// let order = OrderRecord::from_json_str(
///     r#"{"total_amount": 5000, "balance_amount": 500}"#,
/// ).unwrap().normalize();
///
/// let breakdown = resolve(&order);
/// assert_eq!(breakdown.price_source, PriceSource::Reconstructed);
/// assert_eq!(breakdown.original_price.cents(), 5500);
/// assert_eq!(breakdown.final_total.cents(), 5000);
/// ```
pub fn resolve(order: &Order) -> MonetaryBreakdown {
    let (original_price, price_source) = match order.plan_price() {
        Some(price) => (price, PriceSource::Plan),
        None => {
            let rebuilt = order.total_amount + order.discount_amount + order.balance_amount;
            debug!(
                period = order.period.as_deref().unwrap_or("-"),
                has_plan = order.plan.is_some(),
                original_price = rebuilt.cents(),
                "no plan price, reconstructing subtotal"
            );
            (rebuilt, PriceSource::Reconstructed)
        }
    };

    let order_amount = order.total_amount;

    MonetaryBreakdown {
        original_price,
        price_source,
        discount_amount: order.discount_amount,
        balance_amount: order.balance_amount,
        handling_amount: order.handling_amount,
        order_amount,
        final_total: order_amount + order.handling_amount,
    }
}

/// Normalizes a raw record and resolves it.
pub fn resolve_record(record: &OrderRecord) -> MonetaryBreakdown {
    resolve(&record.normalize())
}

// =============================================================================
// Unit Tests
// =============================================================================
