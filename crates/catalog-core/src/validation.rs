//! # Validation Module
//!
//! Input validation utilities for the catalog.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                              │
//! │                                                                     │
//! │  Layer 1: Caller (service / presentation layer)                     │
//! │  ├── Basic format checks (empty, length)                            │
//! │  └── Immediate user feedback                                        │
//! │           │                                                         │
//! │           ▼                                                         │
//! │  Layer 2: THIS MODULE                                               │
//! │  ├── Argument validation before any query runs                      │
//! │  └── Id preconditions for update/remove                             │
//! │           │                                                         │
//! │           ▼                                                         │
//! │  Layer 3: Database (SQLite)                                         │
//! │  ├── NOT NULL constraints                                           │
//! │  ├── UNIQUE constraints                                             │
//! │  └── Foreign key constraints                                        │
//! │                                                                     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use catalog_core::validation::{validate_category_name, validate_search_keyword};
//!
//! // Validate a name before database insert
//! validate_category_name("Beverages").unwrap();
//!
//! // Validate a keyword before search (empty is allowed)
//! let keyword = validate_search_keyword("  coffee  ").unwrap();
//! assert_eq!(keyword, "coffee");
//! ```

use crate::error::ValidationError;
use crate::{MAX_DESCRIPTION_LEN, MAX_NAME_LEN, MAX_SEARCH_KEYWORD_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

fn validate_name(field: &str, name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if name.len() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates a category name.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 200 characters
///
/// ## Example
/// ```rust
/// use catalog_core::validation::validate_category_name;
///
/// assert!(validate_category_name("Beverages").is_ok());
/// assert!(validate_category_name("").is_err());
/// ```
pub fn validate_category_name(name: &str) -> ValidationResult<()> {
    validate_name("category name", name)
}

/// Validates a product name.
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    validate_name("product name", name)
}

/// Validates an item name.
pub fn validate_item_name(name: &str) -> ValidationResult<()> {
    validate_name("item name", name)
}

/// Validates an optional description.
///
/// ## Rules
/// - `None` is valid
/// - Must be at most 2000 characters
pub fn validate_description(description: Option<&str>) -> ValidationResult<()> {
    if let Some(description) = description {
        if description.len() > MAX_DESCRIPTION_LEN {
            return Err(ValidationError::TooLong {
                field: "description".to_string(),
                max: MAX_DESCRIPTION_LEN,
            });
        }
    }

    Ok(())
}

/// Validates a search keyword.
///
/// ## Rules
/// - Can be empty (matches all items)
/// - Maximum 100 characters
///
/// ## Returns
/// The trimmed keyword string.
pub fn validate_search_keyword(keyword: &str) -> ValidationResult<String> {
    let keyword = keyword.trim();

    if keyword.len() > MAX_SEARCH_KEYWORD_LEN {
        return Err(ValidationError::TooLong {
            field: "keyword".to_string(),
            max: MAX_SEARCH_KEYWORD_LEN,
        });
    }

    Ok(keyword.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a unit cost in cents.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (free items)
///
/// ## Example
/// ```rust
/// use catalog_core::validation::validate_unit_cost_cents;
///
/// assert!(validate_unit_cost_cents(1099).is_ok());  // $10.99
/// assert!(validate_unit_cost_cents(0).is_ok());     // Free item
/// assert!(validate_unit_cost_cents(-100).is_err()); // Invalid
/// ```
pub fn validate_unit_cost_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "unit cost".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// Identity Validators
// =============================================================================

/// Requires an assigned id on an entity, returning it.
///
/// ## Rules
/// - Updates and removals operate on persisted entities only
/// - An entity whose id is `None` has never been persisted
///
/// ## Example
/// ```rust
/// use catalog_core::validation::require_id;
///
/// assert_eq!(require_id("category", Some(7)).unwrap(), 7);
/// assert!(require_id("category", None).is_err());
/// ```
pub fn require_id(entity: &str, id: Option<i64>) -> ValidationResult<i64> {
    id.ok_or_else(|| ValidationError::InvalidFormat {
        field: format!("{entity} id"),
        reason: "entity has not been persisted".to_string(),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_names() {
        assert!(validate_category_name("Beverages").is_ok());
        assert!(validate_product_name("Coffee").is_ok());
        assert!(validate_item_name("Coffee 250g").is_ok());

        assert!(validate_category_name("").is_err());
        assert!(validate_category_name("   ").is_err());
        assert!(validate_item_name(&"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_description() {
        assert!(validate_description(None).is_ok());
        assert!(validate_description(Some("short")).is_ok());
        assert!(validate_description(Some(&"A".repeat(3000))).is_err());
    }

    #[test]
    fn test_validate_search_keyword() {
        assert_eq!(validate_search_keyword("  coffee  ").unwrap(), "coffee");
        assert_eq!(validate_search_keyword("").unwrap(), "");
        assert!(validate_search_keyword(&"A".repeat(200)).is_err());
    }

    #[test]
    fn test_validate_unit_cost_cents() {
        assert!(validate_unit_cost_cents(0).is_ok());
        assert!(validate_unit_cost_cents(1099).is_ok());
        assert!(validate_unit_cost_cents(-100).is_err());
    }

    #[test]
    fn test_require_id() {
        assert_eq!(require_id("product", Some(42)).unwrap(), 42);
        assert!(require_id("product", None).is_err());
    }
}
