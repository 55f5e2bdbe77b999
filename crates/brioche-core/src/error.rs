//! # Error Types
//!
//! Validation errors for brioche-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  brioche-core (this file)                                               │
//! │  └── ValidationError  - Input validation failures                       │
//! │                                                                         │
//! │  brioche-db (separate crate)                                            │
//! │  ├── DbError          - Database operation failures                     │
//! │  ├── CheckoutError    - Business outcomes of the checkout engine        │
//! │  └── CatalogError     - Business outcomes of catalog operations         │
//! │                                                                         │
//! │  HTTP API errors (in server app)                                        │
//! │  └── ApiError         - What clients see (status code + JSON body)      │
//! │                                                                         │
//! │  Flow: ValidationError → CheckoutError/CatalogError → ApiError → Client │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Business-rule failures (product not found, insufficient stock) live with
//! the engine that detects them, in brioche-db; this crate only owns the
//! pure input-validation taxonomy.
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (field name, limits, offending value)
//! 3. Errors are enum variants, never String

use thiserror::Error;

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when request input doesn't meet requirements, before any
/// business logic or I/O runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Invalid format (e.g. invalid UUID, unknown enum label).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Duplicate value (e.g. duplicate SKU within a store).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Unit Tests
// =============================================================================
