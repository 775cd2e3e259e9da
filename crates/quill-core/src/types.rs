//! # Domain Types
//!
//! Input records and the normalized order used throughout quill-core.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  Externally owned (loose JSON)        Normalized (defaults applied)     │
//! │  ┌─────────────────────┐              ┌─────────────────────┐           │
//! │  │    OrderRecord      │  normalize() │       Order         │           │
//! │  │  ─────────────────  │ ───────────► │  ─────────────────  │           │
//! │  │  trade_no?          │              │  amounts: Money     │           │
//! │  │  *_amount? (i64)    │              │  "" → None          │           │
//! │  │  status? (i64)      │              │  0 timestamp → None │           │
//! │  │  plan? { name, .. } │              │  plan, period       │           │
//! │  └─────────────────────┘              └─────────────────────┘           │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   UserRecord    │   │   OrderStatus   │   │  BillingPeriod  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  email?         │   │  0..=4 codes    │   │  month_price .. │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## One Normalization Step
//! The upstream payloads may omit fields, send `null`, or send empty strings.
//! `Order::from(OrderRecord)` applies every default exactly once so the
//! resolver and assembler never re-check raw fields.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CoreError, CoreResult};
use crate::i18n::TextKey;
use crate::money::Money;

// =============================================================================
// Order Status
// =============================================================================

/// The lifecycle status of an order, decoded from its integer code.
///
/// Codes outside `0..=4` have no variant; callers see `None` from
/// [`OrderStatus::from_code`] and render the "unknown status" label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Awaiting payment.
    Pending,
    /// Paid, service being provisioned.
    Processing,
    /// Cancelled before completion.
    Cancelled,
    /// Paid and fulfilled.
    Completed,
    /// Settled by credit/offset rather than a fresh payment.
    Discounted,
}

impl OrderStatus {
    /// Decodes an upstream status code.
    pub const fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(OrderStatus::Pending),
            1 => Some(OrderStatus::Processing),
            2 => Some(OrderStatus::Cancelled),
            3 => Some(OrderStatus::Completed),
            4 => Some(OrderStatus::Discounted),
            _ => None,
        }
    }

    /// Returns the upstream status code.
    pub const fn code(self) -> i64 {
        match self {
            OrderStatus::Pending => 0,
            OrderStatus::Processing => 1,
            OrderStatus::Cancelled => 2,
            OrderStatus::Completed => 3,
            OrderStatus::Discounted => 4,
        }
    }

    /// Whether an invoice for this status carries the PAID stamp.
    pub const fn is_paid(self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Discounted)
    }

    /// Translation key for the status label.
    pub const fn label_key(self) -> TextKey {
        match self {
            OrderStatus::Pending => TextKey::StatusPending,
            OrderStatus::Processing => TextKey::StatusProcessing,
            OrderStatus::Cancelled => TextKey::StatusCancelled,
            OrderStatus::Completed => TextKey::StatusCompleted,
            OrderStatus::Discounted => TextKey::StatusDiscounted,
        }
    }
}

// =============================================================================
// Billing Period
// =============================================================================

/// Billing cadence or special order category, decoded from the period code.
///
/// The same codes key the plan's price table (`plan.month_price`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BillingPeriod {
    #[serde(rename = "month_price")]
    Monthly,
    #[serde(rename = "quarter_price")]
    Quarterly,
    #[serde(rename = "half_year_price")]
    SemiAnnual,
    #[serde(rename = "year_price")]
    Annual,
    #[serde(rename = "two_year_price")]
    Biennial,
    #[serde(rename = "three_year_price")]
    Triennial,
    #[serde(rename = "onetime_price")]
    OneTime,
    /// Data reset pack bought on top of an active plan.
    #[serde(rename = "reset_price")]
    ResetPack,
    /// Wallet top-up; usually has no plan attached.
    #[serde(rename = "deposit")]
    Deposit,
}

impl BillingPeriod {
    /// Every known period, in display order.
    pub const ALL: [BillingPeriod; 9] = [
        BillingPeriod::Monthly,
        BillingPeriod::Quarterly,
        BillingPeriod::SemiAnnual,
        BillingPeriod::Annual,
        BillingPeriod::Biennial,
        BillingPeriod::Triennial,
        BillingPeriod::OneTime,
        BillingPeriod::ResetPack,
        BillingPeriod::Deposit,
    ];

    /// Decodes a period code. Unknown codes return `None`.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "month_price" => Some(BillingPeriod::Monthly),
            "quarter_price" => Some(BillingPeriod::Quarterly),
            "half_year_price" => Some(BillingPeriod::SemiAnnual),
            "year_price" => Some(BillingPeriod::Annual),
            "two_year_price" => Some(BillingPeriod::Biennial),
            "three_year_price" => Some(BillingPeriod::Triennial),
            "onetime_price" => Some(BillingPeriod::OneTime),
            "reset_price" => Some(BillingPeriod::ResetPack),
            "deposit" => Some(BillingPeriod::Deposit),
            _ => None,
        }
    }

    /// Returns the wire code.
    pub const fn code(self) -> &'static str {
        match self {
            BillingPeriod::Monthly => "month_price",
            BillingPeriod::Quarterly => "quarter_price",
            BillingPeriod::SemiAnnual => "half_year_price",
            BillingPeriod::Annual => "year_price",
            BillingPeriod::Biennial => "two_year_price",
            BillingPeriod::Triennial => "three_year_price",
            BillingPeriod::OneTime => "onetime_price",
            BillingPeriod::ResetPack => "reset_price",
            BillingPeriod::Deposit => "deposit",
        }
    }

    /// Translation key for the period label.
    pub const fn label_key(self) -> TextKey {
        match self {
            BillingPeriod::Monthly => TextKey::PeriodMonthly,
            BillingPeriod::Quarterly => TextKey::PeriodQuarterly,
            BillingPeriod::SemiAnnual => TextKey::PeriodSemiAnnual,
            BillingPeriod::Annual => TextKey::PeriodAnnual,
            BillingPeriod::Biennial => TextKey::PeriodBiennial,
            BillingPeriod::Triennial => TextKey::PeriodTriennial,
            BillingPeriod::OneTime => TextKey::PeriodOneTime,
            BillingPeriod::ResetPack => TextKey::PeriodResetPack,
            BillingPeriod::Deposit => TextKey::PeriodDeposit,
        }
    }
}

// =============================================================================
// Raw Records
// =============================================================================

/// The plan attached to an order: a display name plus a price table keyed by
/// period code.
///
/// Prices are kept as raw JSON values. Upstream sends integers in minor
/// units, but fractional numbers and numeric strings occur in older data and
/// are accepted by [`PlanRecord::price_for`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanRecord {
    #[serde(default)]
    pub name: Option<String>,

    /// Every other key on the plan object. Non-price keys (`id`, `content`,
    /// ...) land here too and are simply never looked up.
    #[serde(flatten)]
    pub prices: BTreeMap<String, Value>,
}

impl PlanRecord {
    /// Looks up the price for a period code.
    ///
    /// ## Resolution Rules
    /// ```text
    /// plan[code] is ...            → result
    /// ─────────────────────────────────────────────────────────
    /// missing / null / false       → None
    /// number 0                     → None   (falsy, not a price)
    /// non-zero integer             → Some(n), exact
    /// non-zero fractional number   → Some(round(n))
    /// "" (empty string)            → None
    /// numeric string "9900"        → Some(round(parse))
    /// numeric string "0"           → None
    /// any other string / object    → None
    /// ```
    pub fn price_for(&self, code: &str) -> Option<Money> {
        match self.prices.get(code)? {
            Value::Number(n) => {
                if let Some(cents) = n.as_i64() {
                    return (cents != 0).then_some(Money::from_cents(cents));
                }
                let value = n.as_f64()?;
                if value == 0.0 {
                    return None;
                }
                Money::from_rounded(value)
            }
            Value::String(s) if !s.is_empty() => {
                let value: f64 = s.trim().parse().ok()?;
                if value == 0.0 {
                    return None;
                }
                Money::from_rounded(value)
            }
            _ => None,
        }
    }
}

/// The payment channel used for an order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRecord {
    #[serde(default)]
    pub name: Option<String>,
}

/// An order as delivered by the upstream API.
///
/// ## Field Conventions
/// - Amounts are integers in minor currency units
/// - Timestamps are epoch seconds
/// - Every field may be absent or `null`
/// - Keys are snake_case; camelCase aliases are accepted
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderRecord {
    #[serde(alias = "tradeNo")]
    pub trade_no: Option<String>,

    #[serde(alias = "createdAt")]
    pub created_at: Option<i64>,

    #[serde(alias = "paidAt")]
    pub paid_at: Option<i64>,

    pub status: Option<i64>,

    pub period: Option<String>,

    pub plan: Option<PlanRecord>,

    #[serde(alias = "totalAmount")]
    pub total_amount: Option<i64>,

    #[serde(alias = "discountAmount")]
    pub discount_amount: Option<i64>,

    #[serde(alias = "balanceAmount")]
    pub balance_amount: Option<i64>,

    #[serde(alias = "handlingAmount")]
    pub handling_amount: Option<i64>,

    pub payment: Option<PaymentRecord>,
}

impl OrderRecord {
    /// Decodes an order from JSON text.
    pub fn from_json_str(json: &str) -> CoreResult<Self> {
        serde_json::from_str(json).map_err(|source| CoreError::MalformedRecord {
            record: "order",
            source,
        })
    }

    /// Decodes an order from an already-parsed JSON value.
    pub fn from_json_value(value: Value) -> CoreResult<Self> {
        serde_json::from_value(value).map_err(|source| CoreError::MalformedRecord {
            record: "order",
            source,
        })
    }

    /// Applies defaults and returns the normalized [`Order`].
    pub fn normalize(&self) -> Order {
        Order::from(self.clone())
    }
}

/// The customer an invoice is billed to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserRecord {
    pub email: Option<String>,
}

impl UserRecord {
    /// Decodes a user from JSON text.
    pub fn from_json_str(json: &str) -> CoreResult<Self> {
        serde_json::from_str(json).map_err(|source| CoreError::MalformedRecord {
            record: "user",
            source,
        })
    }

    /// Decodes a user from an already-parsed JSON value.
    pub fn from_json_value(value: Value) -> CoreResult<Self> {
        serde_json::from_value(value).map_err(|source| CoreError::MalformedRecord {
            record: "user",
            source,
        })
    }

    /// The email to bill, with empty strings treated as absent.
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref().filter(|e| !e.is_empty())
    }
}

// =============================================================================
// Normalized Order
// =============================================================================

/// An order with every default applied.
///
/// ## Normalization Rules
/// - Missing or `null` amounts become `Money::zero()`
/// - Empty strings (`trade_no`, `period`, `payment.name`) become `None`
/// - Zero timestamps become `None` (an epoch-zero date is never meaningful)
/// - The status code is kept raw so unknown codes survive for display
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Order {
    pub trade_no: Option<String>,
    pub created_at: Option<i64>,
    pub paid_at: Option<i64>,
    pub status_code: Option<i64>,
    pub period: Option<String>,
    pub plan: Option<PlanRecord>,
    pub total_amount: Money,
    pub discount_amount: Money,
    pub balance_amount: Money,
    pub handling_amount: Money,
    pub payment_name: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

fn non_zero(ts: Option<i64>) -> Option<i64> {
    ts.filter(|&t| t != 0)
}

fn minor_units(amount: Option<i64>) -> Money {
    Money::from_cents(amount.unwrap_or(0))
}

impl From<OrderRecord> for Order {
    fn from(record: OrderRecord) -> Self {
        Order {
            trade_no: non_empty(record.trade_no),
            created_at: non_zero(record.created_at),
            paid_at: non_zero(record.paid_at),
            status_code: record.status,
            period: non_empty(record.period),
            plan: record.plan,
            total_amount: minor_units(record.total_amount),
            discount_amount: minor_units(record.discount_amount),
            balance_amount: minor_units(record.balance_amount),
            handling_amount: minor_units(record.handling_amount),
            payment_name: non_empty(record.payment.and_then(|p| p.name)),
        }
    }
}

impl Order {
    /// Decoded status, `None` when absent or outside the enumeration.
    pub fn status(&self) -> Option<OrderStatus> {
        self.status_code.and_then(OrderStatus::from_code)
    }

    /// Whether the invoice should carry the PAID stamp.
    pub fn is_paid(&self) -> bool {
        self.status().is_some_and(OrderStatus::is_paid)
    }

    /// Decoded period, `None` when absent or unknown.
    pub fn billing_period(&self) -> Option<BillingPeriod> {
        self.period.as_deref().and_then(BillingPeriod::from_code)
    }

    /// Whether this is a wallet top-up order.
    pub fn is_deposit(&self) -> bool {
        self.period.as_deref() == Some(BillingPeriod::Deposit.code())
    }

    /// Plan name, with empty strings treated as absent.
    pub fn plan_name(&self) -> Option<&str> {
        self.plan
            .as_ref()
            .and_then(|p| p.name.as_deref())
            .filter(|n| !n.is_empty())
    }

    /// The plan's list price for this order's period, if one resolves.
    pub fn plan_price(&self) -> Option<Money> {
        let plan = self.plan.as_ref()?;
        let period = self.period.as_deref()?;
        plan.price_for(period)
    }

    /// The timestamp shown as the invoice date: paid time, else creation time.
    pub fn invoice_timestamp(&self) -> Option<i64> {
        self.paid_at.or(self.created_at)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
