//! # Validation Module
//!
//! Input validation utilities for the checkout and catalog surfaces.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP boundary (axum extractors)                               │
//! │  ├── Type validation (deserialization)                                  │
//! │  └── THIS MODULE: business rule validation                              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Repository (brioche-db)                                       │
//! │  ├── Re-validates commands it receives                                  │
//! │  └── Stock / existence checks inside the transaction                    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                             │
//! │  ├── NOT NULL constraints                                               │
//! │  ├── UNIQUE constraints (sku per store, transaction_number)             │
//! │  └── Foreign key constraints                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::MAX_LINE_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a SKU (Stock Keeping Unit).
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 50 characters
/// - Only alphanumeric characters, hyphens, underscores
///
/// ## Example
/// ```rust
/// use brioche_core::validation::validate_sku;
///
/// assert!(validate_sku("ESP-DBL").is_ok());
/// assert!(validate_sku("").is_err());
/// ```
pub fn validate_sku(sku: &str) -> ValidationResult<()> {
    let sku = sku.trim();

    if sku.is_empty() {
        return Err(ValidationError::Required {
            field: "sku".to_string(),
        });
    }

    if sku.len() > 50 {
        return Err(ValidationError::TooLong {
            field: "sku".to_string(),
            max: 50,
        });
    }

    if !sku
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "sku".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 200 characters
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a cart line quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed [`MAX_LINE_QUANTITY`]
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_LINE_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a whole-transaction discount in cents.
///
/// ## Rules
/// - Must be non-negative; zero means no discount
/// - A discount LARGER than the subtotal is intentionally allowed here
pub fn validate_discount(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: "discount".to_string(),
        });
    }

    Ok(())
}

/// Validates a price in cents.
///
/// ## Rules
/// - Must be non-negative (zero allowed, free items exist)
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: "price".to_string(),
        });
    }

    Ok(())
}

/// Validates a stock level for a direct stock update.
///
/// ## Rules
/// - Must be non-negative; checkout is the only path allowed to drive
///   stock toward zero, and it never goes below
pub fn validate_stock_level(stock: i64) -> ValidationResult<()> {
    if stock < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: "stock".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// UUID Validators
// =============================================================================

/// Validates a UUID string format.
///
/// ## Example
/// ```rust
/// use brioche_core::validation::validate_uuid;
///
/// assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_uuid("not-a-uuid").is_err());
/// ```
pub fn validate_uuid(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
