//! # Error Types
//!
//! Domain-specific error types for quill-core.
//!
//! ## Where Errors Can Happen
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Surface                                   │
//! │                                                                         │
//! │  JSON text ──► decode ──► Order ──► resolve ──► assemble ──► Document   │
//! │                  │                     │            │                   │
//! │             CoreError            (infallible)  (infallible)             │
//! │                                                                         │
//! │  Locale file ──► Catalog::from_json_str                                 │
//! │                       │                                                 │
//! │                  CoreError                                              │
//! │                                                                         │
//! │  Everything after decoding degrades to a documented default instead     │
//! │  of failing: unknown status, unknown period, missing translation.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (which record, which key)
//! 3. Errors are enum variants, never String

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Errors raised while decoding inputs for the core.
///
/// Resolution and assembly never fail; these errors only come from turning
/// text into records or catalogs.
#[derive(Debug, Error)]
pub enum CoreError {
    /// An order or user payload is not valid JSON, or a field has the wrong
    /// JSON type (e.g. `total_amount: "abc"`).
    #[error("Malformed {record} record: {source}")]
    MalformedRecord {
        record: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// A locale catalog is not valid JSON.
    #[error("Malformed locale catalog: {0}")]
    MalformedCatalog(#[source] serde_json::Error),

    /// A locale catalog parsed, but its root is not an object.
    ///
    /// ## When This Occurs
    /// - The file is a bare array or string
    /// - The file was exported with a wrapper the loader does not know
    #[error("Locale catalog root must be an object, found {found}")]
    CatalogNotAnObject { found: &'static str },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_record_names_the_record() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = CoreError::MalformedRecord {
            record: "order",
            source,
        };
        assert!(err.to_string().starts_with("Malformed order record: "));
    }

    #[test]
    fn test_catalog_not_an_object_message() {
        let err = CoreError::CatalogNotAnObject { found: "array" };
        assert_eq!(
            err.to_string(),
            "Locale catalog root must be an object, found array"
        );
    }
}
