//! # catalog-core: Pure Domain Model for the Catalog
//!
//! This crate contains the catalog's domain model as plain types with zero
//! I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Catalog Architecture                           │
//! │                                                                     │
//! │  ┌───────────────────────────────────────────────────────────────┐ │
//! │  │             Upstream service / presentation layer             │ │
//! │  │                       (out of scope)                          │ │
//! │  └─────────────────────────────┬─────────────────────────────────┘ │
//! │                                │                                    │
//! │  ┌─────────────────────────────▼─────────────────────────────────┐ │
//! │  │               ★ catalog-core (THIS CRATE) ★                   │ │
//! │  │                                                               │ │
//! │  │   ┌───────────┐  ┌───────────┐  ┌────────────┐               │ │
//! │  │   │   types   │  │   money   │  │ validation │               │ │
//! │  │   │ Category  │  │   Money   │  │   rules    │               │ │
//! │  │   │ Product   │  │  (cents)  │  │   checks   │               │ │
//! │  │   │   Item    │  └───────────┘  └────────────┘               │ │
//! │  │   └───────────┘                                               │ │
//! │  │                                                               │ │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS          │ │
//! │  └─────────────────────────────┬─────────────────────────────────┘ │
//! │                                │                                    │
//! │  ┌─────────────────────────────▼─────────────────────────────────┐ │
//! │  │                  catalog-db (Database Layer)                  │ │
//! │  │            SQLite queries, migrations, repositories           │ │
//! │  └───────────────────────────────────────────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain entities (Category, Product, Item)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation rules
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in cents (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use catalog_core::Money` instead of
// `use catalog_core::money::Money`

pub use error::ValidationError;
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum length of an entity name (category, product, item)
///
/// ## Why a constant?
/// The cap is shared by every name validator and mirrored by upstream form
/// validation, so it lives in one place.
pub const MAX_NAME_LEN: usize = 200;

/// Maximum length of a free-text description
pub const MAX_DESCRIPTION_LEN: usize = 2000;

/// Maximum length of an item search keyword
///
/// Longer keywords are rejected before reaching the database; an empty
/// keyword is valid and matches every item.
pub const MAX_SEARCH_KEYWORD_LEN: usize = 100;
