//! # Validation Module
//!
//! Input validation utilities for Tally.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Line item edits                                               │
//! │  ├── Raw text parsed here (quantity, price, tax rate)                   │
//! │  └── Bad input is a no-op, never an error                               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Draft commit                                                  │
//! │  ├── Client name required                                               │
//! │  └── At least one line item                                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Document decode                                               │
//! │  ├── Unknown fields rejected                                            │
//! │  └── Stored totals re-checked against items                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use tally_core::validation::{parse_quantity, validate_client_name};
//!
//! assert!(validate_client_name("Acme Traders").is_ok());
//! assert_eq!(parse_quantity(" 3 ").unwrap(), 3);
//! assert!(parse_quantity("0").is_err());
//! ```

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest product name, and so the longest query that can match one.
pub const MAX_NAME_LEN: usize = 200;

fn present(value: &str, field: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    Ok(())
}

fn required(value: &str, field: &str, max: usize) -> ValidationResult<()> {
    present(value, field)?;

    if value.trim().chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates a SKU (Stock Keeping Unit).
///
/// ## Rules
/// - Must not be empty
/// - Must be between 1 and 50 characters
/// - Should contain only alphanumeric characters, hyphens, underscores
///
/// ## Example
/// ```rust
/// use tally_core::validation::validate_sku;
///
/// assert!(validate_sku("PEN-BLUE").is_ok());
/// assert!(validate_sku("").is_err());
/// assert!(validate_sku("A".repeat(100).as_str()).is_err());
/// ```
pub fn validate_sku(sku: &str) -> ValidationResult<()> {
    required(sku, "sku", 50)?;

    if !sku
        .trim()
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

/// Validates a product name: non-blank, at most [`MAX_NAME_LEN`] characters.
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    required(name, "name", MAX_NAME_LEN)
}

/// Validates a product category: non-blank, at most 100 characters.
pub fn validate_category(category: &str) -> ValidationResult<()> {
    required(category, "category", 100)
}

/// Validates the client an invoice is issued to.
///
/// Whitespace-only names count as missing. There is no length limit.
pub fn validate_client_name(name: &str) -> ValidationResult<()> {
    present(name, "client name")
}

/// Validates the supplier of a purchase.
pub fn validate_supplier_name(name: &str) -> ValidationResult<()> {
    required(name, "supplier name", 200)
}

/// Validates a search query.
///
/// ## Rules
/// - Can be empty (callers decide what an empty query means)
/// - Maximum [`MAX_NAME_LEN`] characters, so any product name can be pasted in
///
/// ## Returns
/// The trimmed query string.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(query.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a quantity value. Must be positive.
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Parses a quantity as typed into a line item row.
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Line item: quantity cell                                               │
/// │                                                                         │
/// │  Operator types: "3"                                                    │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  parse_quantity("3") ← THIS FUNCTION                                    │
/// │       │                                                                 │
/// │       ├── not an integer? → InvalidFormat  (row unchanged)              │
/// │       ├── qty <= 0?       → MustBePositive (row unchanged)              │
/// │       └── OK → quantity and line total updated                          │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn parse_quantity(input: &str) -> ValidationResult<i64> {
    let qty = input
        .trim()
        .parse::<i64>()
        .map_err(|_| ValidationError::InvalidFormat {
            field: "quantity".to_string(),
            reason: "must be a whole number".to_string(),
        })?;

    validate_quantity(qty)?;
    Ok(qty)
}

/// Validates a price in cents.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (free items)
///
/// ## Example
/// ```rust
/// use tally_core::validation::validate_price_cents;
///
/// assert!(validate_price_cents(1099).is_ok());  // $10.99
/// assert!(validate_price_cents(0).is_ok());     // Free item
/// assert!(validate_price_cents(-100).is_err()); // Invalid
/// ```
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
