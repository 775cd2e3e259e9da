//! # Audit Module
//!
//! Consistency checks over an order and its resolved breakdown.
//!
//! ## Where Audit Sits
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  OrderRecord ──► normalize ──► Order ──► resolve ──► MonetaryBreakdown  │
//! │                                  │                         │            │
//! │                                  └────────► audit ◄────────┘            │
//! │                                               │                         │
//! │                                               ▼                         │
//! │                                     Vec<AuditFinding>                   │
//! │                                               │                         │
//! │                      ┌────────────────────────┴─────────────┐           │
//! │                      ▼                                      ▼           │
//! │              logged as warnings                   rejected (--strict)   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Findings never block assembly. The invoice prints what the record says;
//! the audit reports where the record disagrees with itself.
//!
//! ## Usage
//! ```rust
//! use quill_core::audit::{audit, AuditFinding};
//! use quill_core::resolver::resolve;
//! use quill_core::types::OrderRecord;
//!
//! let order = OrderRecord::from_json_str(r#"{
//!     "total_amount": 8000, "discount_amount": 1000,
//!     "plan": {"month_price": 10000}, "period": "month_price"
//! }"#).unwrap().normalize();
//!
//! let findings = audit(&order, &resolve(&order));
//! assert!(matches!(findings[0], AuditFinding::PlanPriceMismatch { .. }));
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::trace;
use ts_rs::TS;

use crate::money::Money;
use crate::resolver::{MonetaryBreakdown, PriceSource};
use crate::types::Order;

/// Something about an order's amounts a reviewer should look at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[ts(export)]
pub enum AuditFinding {
    /// The plan price minus the adjustments does not equal what the order
    /// charged.
    PlanPriceMismatch {
        plan_price: Money,
        expected_order_amount: Money,
        order_amount: Money,
    },

    /// An amount field was negative in the record.
    NegativeAmount { field: String, amount: Money },

    /// A handling fee sits on an order whose subtotal was reconstructed. The
    /// fee is added to the total but was never part of the rebuilt subtotal.
    HandlingOnReconstructedSubtotal { handling_amount: Money },
}

impl fmt::Display for AuditFinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuditFinding::PlanPriceMismatch {
                plan_price,
                expected_order_amount,
                order_amount,
            } => write!(
                f,
                "Plan price {plan_price} implies order amount {expected_order_amount}, record charged {order_amount}"
            ),
            AuditFinding::NegativeAmount { field, amount } => {
                write!(f, "Negative {field}: {amount}")
            }
            AuditFinding::HandlingOnReconstructedSubtotal { handling_amount } => write!(
                f,
                "Handling fee {handling_amount} on an order without a plan price"
            ),
        }
    }
}

// =============================================================================
// Checks
// =============================================================================

/// Runs every check and returns the findings in a stable order.
pub fn audit(order: &Order, breakdown: &MonetaryBreakdown) -> Vec<AuditFinding> {
    let mut findings = Vec::new();

    if breakdown.price_source == PriceSource::Plan && !breakdown.reconciles() {
        findings.push(AuditFinding::PlanPriceMismatch {
            plan_price: breakdown.original_price,
            expected_order_amount: breakdown.expected_order_amount(),
            order_amount: breakdown.order_amount,
        });
    }

    let amounts = [
        ("total_amount", order.total_amount),
        ("discount_amount", order.discount_amount),
        ("balance_amount", order.balance_amount),
        ("handling_amount", order.handling_amount),
    ];
    for (field, amount) in amounts {
        if amount.is_negative() {
            findings.push(AuditFinding::NegativeAmount {
                field: field.to_string(),
                amount,
            });
        }
    }

    if breakdown.price_source == PriceSource::Reconstructed
        && breakdown.handling_amount.is_positive()
    {
        findings.push(AuditFinding::HandlingOnReconstructedSubtotal {
            handling_amount: breakdown.handling_amount,
        });
    }

    trace!(count = findings.len(), "audit complete");
    findings
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::resolve;
    use crate::types::OrderRecord;
    use serde_json::json;

    fn run(value: serde_json::Value) -> Vec<AuditFinding> {
        let order = OrderRecord::from_json_value(value).unwrap().normalize();
        let breakdown = resolve(&order);
        audit(&order, &breakdown)
    }

    #[test]
    fn test_consistent_order_is_clean() {
        assert!(run(json!({
            "status": 3,
            "total_amount": 9000,
            "discount_amount": 1000,
            "plan": { "month_price": 10000 },
            "period": "month_price"
        }))
        .is_empty());
    }

    #[test]
    fn test_plan_price_mismatch() {
        let findings = run(json!({
            "total_amount": 8000,
            "discount_amount": 1000,
            "plan": { "month_price": 10000 },
            "period": "month_price"
        }));
        assert_eq!(
            findings,
            vec![AuditFinding::PlanPriceMismatch {
                plan_price: Money::from_cents(10000),
                expected_order_amount: Money::from_cents(9000),
                order_amount: Money::from_cents(8000),
            }]
        );
        assert_eq!(
            findings[0].to_string(),
            "Plan price ¤100.00 implies order amount ¤90.00, record charged ¤80.00"
        );
    }

    #[test]
    fn test_negative_amounts() {
        let findings = run(json!({ "total_amount": -100, "balance_amount": -5 }));
        assert_eq!(
            findings,
            vec![
                AuditFinding::NegativeAmount {
                    field: "total_amount".to_string(),
                    amount: Money::from_cents(-100),
                },
                AuditFinding::NegativeAmount {
                    field: "balance_amount".to_string(),
                    amount: Money::from_cents(-5),
                },
            ]
        );
    }

    #[test]
    fn test_handling_on_reconstructed_subtotal() {
        let findings = run(json!({ "total_amount": 5000, "handling_amount": 60 }));
        assert_eq!(
            findings,
            vec![AuditFinding::HandlingOnReconstructedSubtotal {
                handling_amount: Money::from_cents(60),
            }]
        );
    }

    #[test]
    fn test_handling_on_plan_priced_order_is_clean() {
        assert!(run(json!({
            "total_amount": 2000,
            "handling_amount": 60,
            "plan": { "quarter_price": 2000 },
            "period": "quarter_price"
        }))
        .is_empty());
    }

    #[test]
    fn test_finding_serializes_tagged() {
        let value = serde_json::to_value(AuditFinding::HandlingOnReconstructedSubtotal {
            handling_amount: Money::from_cents(60),
        })
        .unwrap();
        assert_eq!(value["kind"], "handling_on_reconstructed_subtotal");
        assert_eq!(value["handling_amount"], 60);
    }
}
