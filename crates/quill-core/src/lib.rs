//! # quill-core: Invoice Derivation and Assembly
//!
//! This crate turns raw order records into printable invoices. It holds all
//! of the money logic and document layout decisions as pure functions.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Quill Architecture                               │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    quill CLI (apps/cli)                         │   │
//! │  │    config ──► read records ──► render text/json ──► output      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ quill-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │ resolver  │  │ assembler │  │   audit   │  │   │
//! │  │   │   Order   │  │ Breakdown │  │ Document  │  │  Finding  │  │   │
//! │  │   │   Plan    │  │  Money    │  │  i18n     │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO SHARED STATE • PURE FUNCTIONS                     │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Order, plan, payment and user records, and their normalized form
//! - [`money`] - Money type with integer minor units
//! - [`resolver`] - Monetary breakdown of an order
//! - [`i18n`] - Translation keys, fallbacks and catalogs
//! - [`format`] - Currency and date display strings
//! - [`document`] - The structured invoice document
//! - [`assembler`] - Builds the document from an order and its breakdown
//! - [`audit`] - Consistency findings over an order's amounts
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: resolve and assemble are deterministic
//! 2. **No I/O**: reading records and writing output belong to the caller
//! 3. **Integer Money**: every amount is in minor units (i64)
//! 4. **Total Derivation**: once a record is decoded, nothing can fail
//!
//! ## Example Usage
//!
//! ```rust
//! use quill_core::{resolve, DocumentAssembler, NoTranslation, OrderRecord, UserRecord};
//!
//! let order = OrderRecord::from_json_str(r#"{
//!     "trade_no": "2024010112345",
//!     "status": 3,
//!     "total_amount": 9000,
//!     "discount_amount": 1000,
//!     "plan": { "name": "Pro", "month_price": 10000 },
//!     "period": "month_price"
//! }"#).unwrap().normalize();
//!
//! let breakdown = resolve(&order);
//! assert_eq!(breakdown.final_total.cents(), 9000);
//!
//! let doc = DocumentAssembler::default()
//!     .assemble(&order, &UserRecord::default(), &breakdown, &NoTranslation);
//! assert_eq!(doc.line_item.description, "Pro");
//! assert_eq!(doc.line_item.amount_display, "¤100.00");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod assembler;
pub mod audit;
pub mod document;
pub mod error;
pub mod format;
pub mod i18n;
pub mod money;
pub mod resolver;
pub mod types;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use assembler::{DocumentAssembler, InvoiceSettings};
pub use audit::{audit, AuditFinding};
pub use document::InvoiceDocument;
pub use error::{CoreError, CoreResult};
pub use i18n::{Catalog, NoTranslation, TextKey, Translator};
pub use money::Money;
pub use resolver::{resolve, MonetaryBreakdown, PriceSource};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Site name used when the host supplies none.
pub const DEFAULT_SITE_NAME: &str = "EZ-Theme";

/// Every invoice carries exactly one line item of quantity one.
pub const INVOICE_QUANTITY: u32 = 1;
