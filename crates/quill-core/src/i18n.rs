//! # Translation
//!
//! Display text lookup with a fixed English fallback for every key.
//!
//! ## Lookup Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  text(translator, TextKey::Discount)                                    │
//! │       │                                                                 │
//! │       ├── translator.lookup("invoice.discount")                         │
//! │       │        │                                                        │
//! │       │        ├── Some("折扣")  → "折扣"                               │
//! │       │        └── None / Some("") ─┐                                   │
//! │       │                             ▼                                   │
//! │       └──────────────────► TextKey::Discount.default_text() → "Discount"│
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The translator is a capability passed in by the caller. Anything that
//! maps a key to an optional string works: a [`Catalog`] loaded from a locale
//! file, a closure, or [`NoTranslation`].

use std::collections::HashMap;

use serde_json::Value;
use tracing::trace;

use crate::error::{CoreError, CoreResult};
use crate::types::{BillingPeriod, OrderStatus};

// =============================================================================
// Translator Capability
// =============================================================================

/// Maps a translation key to display text.
///
/// Returning `None` (or an empty string) means "not translated"; the caller
/// then uses the key's default text.
pub trait Translator: Send + Sync {
    fn lookup(&self, key: &str) -> Option<String>;
}

/// Closures work as translators.
///
/// ```rust
/// use quill_core::i18n::{text, TextKey};
///
/// let upper = |key: &str| (key == "invoice.total").then(|| "GESAMT".to_string());
/// assert_eq!(text(&upper, TextKey::Total), "GESAMT");
/// assert_eq!(text(&upper, TextKey::Subtotal), "Subtotal");
/// ```
impl<F> Translator for F
where
    F: Fn(&str) -> Option<String> + Send + Sync,
{
    fn lookup(&self, key: &str) -> Option<String> {
        self(key)
    }
}

/// A translator that never translates; every key renders its default.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTranslation;

impl Translator for NoTranslation {
    fn lookup(&self, _key: &str) -> Option<String> {
        None
    }
}

// =============================================================================
// Key Table
// =============================================================================

/// Every display string the assembler can ask for.
///
/// Each key owns its wire name ([`TextKey::key`]) and its fixed fallback
/// ([`TextKey::default_text`]). Adding a key is one variant plus one arm in
/// each table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextKey {
    InvoiceTitle,
    BillTo,
    InvoiceNo,
    InvoiceDate,
    Status,
    Description,
    Period,
    Quantity,
    Amount,
    Subtotal,
    Discount,
    BalanceUsed,
    HandlingFee,
    Total,
    PaidNotice,
    PaymentMethod,
    FooterText,
    DepositTitle,
    PeriodMonthly,
    PeriodQuarterly,
    PeriodSemiAnnual,
    PeriodAnnual,
    PeriodBiennial,
    PeriodTriennial,
    PeriodOneTime,
    PeriodResetPack,
    PeriodDeposit,
    StatusPending,
    StatusProcessing,
    StatusCancelled,
    StatusCompleted,
    StatusDiscounted,
    StatusUnknown,
}

impl TextKey {
    pub const ALL: [TextKey; 33] = [
        TextKey::InvoiceTitle,
        TextKey::BillTo,
        TextKey::InvoiceNo,
        TextKey::InvoiceDate,
        TextKey::Status,
        TextKey::Description,
        TextKey::Period,
        TextKey::Quantity,
        TextKey::Amount,
        TextKey::Subtotal,
        TextKey::Discount,
        TextKey::BalanceUsed,
        TextKey::HandlingFee,
        TextKey::Total,
        TextKey::PaidNotice,
        TextKey::PaymentMethod,
        TextKey::FooterText,
        TextKey::DepositTitle,
        TextKey::PeriodMonthly,
        TextKey::PeriodQuarterly,
        TextKey::PeriodSemiAnnual,
        TextKey::PeriodAnnual,
        TextKey::PeriodBiennial,
        TextKey::PeriodTriennial,
        TextKey::PeriodOneTime,
        TextKey::PeriodResetPack,
        TextKey::PeriodDeposit,
        TextKey::StatusPending,
        TextKey::StatusProcessing,
        TextKey::StatusCancelled,
        TextKey::StatusCompleted,
        TextKey::StatusDiscounted,
        TextKey::StatusUnknown,
    ];

    /// The key passed to [`Translator::lookup`].
    pub const fn key(self) -> &'static str {
        match self {
            TextKey::InvoiceTitle => "invoice.title",
            TextKey::BillTo => "invoice.bill_to",
            TextKey::InvoiceNo => "invoice.invoice_no",
            TextKey::InvoiceDate => "invoice.invoice_date",
            TextKey::Status => "invoice.status",
            TextKey::Description => "invoice.description",
            TextKey::Period => "invoice.period",
            TextKey::Quantity => "invoice.qty",
            TextKey::Amount => "invoice.amount",
            TextKey::Subtotal => "invoice.subtotal",
            TextKey::Discount => "invoice.discount",
            TextKey::BalanceUsed => "invoice.balance_used",
            TextKey::HandlingFee => "invoice.handling_fee",
            TextKey::Total => "invoice.total",
            TextKey::PaidNotice => "invoice.paid_notice",
            TextKey::PaymentMethod => "invoice.payment_method",
            TextKey::FooterText => "invoice.footer_text",
            TextKey::DepositTitle => "wallet.deposit.title",
            TextKey::PeriodMonthly => "shop.plan.price_options.month",
            TextKey::PeriodQuarterly => "shop.plan.price_options.quarter",
            TextKey::PeriodSemiAnnual => "shop.plan.price_options.half_year",
            TextKey::PeriodAnnual => "shop.plan.price_options.year",
            TextKey::PeriodBiennial => "shop.plan.price_options.two_year",
            TextKey::PeriodTriennial => "shop.plan.price_options.three_year",
            TextKey::PeriodOneTime => "shop.plan.price_options.onetime",
            TextKey::PeriodResetPack => "payment.period_types.reset_price",
            TextKey::PeriodDeposit => "payment.period_types.deposit",
            TextKey::StatusPending => "payment.status.pending",
            TextKey::StatusProcessing => "payment.status.processing",
            TextKey::StatusCancelled => "payment.status.cancelled",
            TextKey::StatusCompleted => "payment.status.completed",
            TextKey::StatusDiscounted => "payment.status.discounted",
            TextKey::StatusUnknown => "payment.status.unknown",
        }
    }

    /// The English text used when the translator has nothing for this key.
    pub const fn default_text(self) -> &'static str {
        match self {
            TextKey::InvoiceTitle => "INVOICE",
            TextKey::BillTo => "BILL TO",
            TextKey::InvoiceNo => "INVOICE NO",
            TextKey::InvoiceDate => "DATE",
            TextKey::Status => "STATUS",
            TextKey::Description => "DESCRIPTION",
            TextKey::Period => "PERIOD",
            TextKey::Quantity => "QTY",
            TextKey::Amount => "AMOUNT",
            TextKey::Subtotal => "Subtotal",
            TextKey::Discount => "Discount",
            TextKey::BalanceUsed => "Balance Used",
            TextKey::HandlingFee => "Handling Fee",
            TextKey::Total => "TOTAL",
            TextKey::PaidNotice => "PAID",
            TextKey::PaymentMethod => "Via",
            TextKey::FooterText => "Thank you for your business!",
            TextKey::DepositTitle => "Account top-up",
            TextKey::PeriodMonthly => "Monthly",
            TextKey::PeriodQuarterly => "Quarterly",
            TextKey::PeriodSemiAnnual => "Semi-annual",
            TextKey::PeriodAnnual => "Annual",
            TextKey::PeriodBiennial => "Biennial",
            TextKey::PeriodTriennial => "Triennial",
            TextKey::PeriodOneTime => "One-time",
            TextKey::PeriodResetPack => "Data reset pack",
            TextKey::PeriodDeposit => "Top-up",
            TextKey::StatusPending => "Pending",
            TextKey::StatusProcessing => "Processing",
            TextKey::StatusCancelled => "Cancelled",
            TextKey::StatusCompleted => "Completed",
            TextKey::StatusDiscounted => "Discounted",
            TextKey::StatusUnknown => "Unknown status",
        }
    }
}

/// Resolves display text for a key: the translation if there is a non-empty
/// one, else the key's default.
pub fn text(translator: &dyn Translator, key: TextKey) -> String {
    match translator.lookup(key.key()) {
        Some(translated) if !translated.is_empty() => translated,
        _ => {
            trace!(key = key.key(), "no translation, using default");
            key.default_text().to_string()
        }
    }
}

/// Label for a period code.
///
/// ```text
/// known code   → translated period label
/// unknown code → the raw code
/// absent       → "-"
/// ```
pub fn period_label(translator: &dyn Translator, code: Option<&str>) -> String {
    match code {
        Some(code) => match BillingPeriod::from_code(code) {
            Some(period) => text(translator, period.label_key()),
            None => code.to_string(),
        },
        None => "-".to_string(),
    }
}

/// Label for a status code; anything outside the enumeration renders the
/// "unknown status" label.
pub fn status_label(translator: &dyn Translator, code: Option<i64>) -> String {
    match code.and_then(OrderStatus::from_code) {
        Some(status) => text(translator, status.label_key()),
        None => text(translator, TextKey::StatusUnknown),
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// A flat key → text table loaded from a locale file.
///
/// Locale files are nested JSON objects in the usual frontend shape:
/// ```json
/// { "invoice": { "bill_to": "账单寄送", "total": "总计" } }
/// ```
/// which flatten to `invoice.bill_to` and `invoice.total`. Non-string leaves
/// (numbers, arrays) are skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    entries: HashMap<String, String>,
}

impl Catalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Catalog::default()
    }

    /// Parses a nested JSON locale file.
    pub fn from_json_str(json: &str) -> CoreResult<Self> {
        let value: Value = serde_json::from_str(json).map_err(CoreError::MalformedCatalog)?;
        Catalog::from_json_value(&value)
    }

    /// Flattens an already-parsed locale object.
    pub fn from_json_value(value: &Value) -> CoreResult<Self> {
        let root = match value {
            Value::Object(map) => map,
            Value::Array(_) => return Err(CoreError::CatalogNotAnObject { found: "array" }),
            Value::String(_) => return Err(CoreError::CatalogNotAnObject { found: "string" }),
            Value::Number(_) => return Err(CoreError::CatalogNotAnObject { found: "number" }),
            Value::Bool(_) => return Err(CoreError::CatalogNotAnObject { found: "boolean" }),
            Value::Null => return Err(CoreError::CatalogNotAnObject { found: "null" }),
        };

        let mut catalog = Catalog::new();
        let mut stack: Vec<(String, &Value)> = root
            .iter()
            .map(|(k, v)| (k.clone(), v))
            .collect();

        while let Some((path, value)) = stack.pop() {
            match value {
                Value::String(s) => {
                    catalog.entries.insert(path, s.clone());
                }
                Value::Object(children) => {
                    for (k, v) in children {
                        stack.push((format!("{path}.{k}"), v));
                    }
                }
                _ => trace!(key = %path, "skipping non-string catalog entry"),
            }
        }

        Ok(catalog)
    }

    /// Adds or replaces one entry.
    pub fn insert(&mut self, key: impl Into<String>, text: impl Into<String>) {
        self.entries.insert(key.into(), text.into());
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys from [`TextKey::ALL`] this catalog does not cover.
    pub fn missing_keys(&self) -> Vec<TextKey> {
        TextKey::ALL
            .into_iter()
            .filter(|k| !self.entries.contains_key(k.key()))
            .collect()
    }
}

impl Translator for Catalog {
    fn lookup(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
