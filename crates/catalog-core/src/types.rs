//! # Domain Types
//!
//! Core entity types for the catalog.
//!
//! ## Ownership Chain
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Catalog Entities                            │
//! │                                                                     │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐   │
//! │  │    Category     │   │     Product     │   │      Item       │   │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │   │
//! │  │  id (i64)       │◄──│  id (i64)       │◄──│  id (i64)       │   │
//! │  │  name (unique)  │   │  category (FK)  │   │  product (FK)   │   │
//! │  │  description    │   │  name           │   │  name           │   │
//! │  └─────────────────┘   │  description    │   │  unit_cost      │   │
//! │                        └─────────────────┘   │  image_path     │   │
//! │                                              └─────────────────┘   │
//! │                                                                     │
//! │  A Category owns zero or more Products.                            │
//! │  A Product owns zero or more Items.                                │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity Pattern
//! Every entity carries `id: Option<i64>`:
//! - `None`: the entity is new and has never been persisted
//! - `Some(id)`: storage has assigned the id on insert
//!
//! Updates and removals require `Some(id)`; creates with embedded ancestors
//! persist the ancestor first when its id is `None`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Category
// =============================================================================

/// A top-level grouping of products.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// Storage-assigned identifier. `None` until persisted.
    pub id: Option<i64>,

    /// Unique display name (e.g., "Beverages").
    pub name: String,

    /// Optional description shown on category pages.
    pub description: Option<String>,

    /// When the category was created.
    pub created_at: DateTime<Utc>,

    /// When the category was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Category {
    /// Creates a new, unpersisted category.
    pub fn new(name: impl Into<String>, description: Option<String>) -> Self {
        let now = Utc::now();
        Category {
            id: None,
            name: name.into(),
            description,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether this category has never been persisted.
    #[inline]
    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product sold under a category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Storage-assigned identifier. `None` until persisted.
    pub id: Option<i64>,

    /// Display name (e.g., "Single-Origin Coffee").
    pub name: String,

    /// Optional description for product pages.
    pub description: Option<String>,

    /// Owning category, if any. Carried as a full entity so creates can
    /// persist an unpersisted ancestor before the product itself.
    pub category: Option<Category>,

    /// When the product was created.
    pub created_at: DateTime<Utc>,

    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Creates a new, unpersisted product.
    pub fn new(
        name: impl Into<String>,
        description: Option<String>,
        category: Option<Category>,
    ) -> Self {
        let now = Utc::now();
        Product {
            id: None,
            name: name.into(),
            description,
            category,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether this product has never been persisted.
    #[inline]
    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }

    /// The owning category's id, if the product is attached to one.
    #[inline]
    pub fn category_id(&self) -> Option<i64> {
        self.category.as_ref().and_then(|c| c.id)
    }
}

// =============================================================================
// Item
// =============================================================================

/// A sellable item under a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Storage-assigned identifier. `None` until persisted.
    pub id: Option<i64>,

    /// Display name (e.g., "Single-Origin Coffee 250g").
    pub name: String,

    /// Searchable free-text description.
    pub description: Option<String>,

    /// Path to a display image, relative to the asset root.
    pub image_path: Option<String>,

    /// Unit cost in cents (smallest currency unit).
    pub unit_cost_cents: i64,

    /// Owning product, if any. Carried as a full entity so creates can
    /// persist unpersisted ancestors (product, then its category) first.
    pub product: Option<Product>,

    /// When the item was created.
    pub created_at: DateTime<Utc>,

    /// When the item was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Item {
    /// Creates a new, unpersisted item.
    pub fn new(
        name: impl Into<String>,
        description: Option<String>,
        unit_cost: Money,
        product: Option<Product>,
    ) -> Self {
        let now = Utc::now();
        Item {
            id: None,
            name: name.into(),
            description,
            image_path: None,
            unit_cost_cents: unit_cost.cents(),
            product,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether this item has never been persisted.
    #[inline]
    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }

    /// Returns the unit cost as a Money type.
    #[inline]
    pub fn unit_cost(&self) -> Money {
        Money::from_cents(self.unit_cost_cents)
    }

    /// The owning product's id, if the item is attached to one.
    #[inline]
    pub fn product_id(&self) -> Option<i64> {
        self.product.as_ref().and_then(|p| p.id)
    }
}

// =============================================================================
// Product Detail
// =============================================================================

/// A product together with its item collection.
///
/// Returned by single-product lookups: the item collection is fetched by an
/// explicit query at lookup time, never deferred.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDetail {
    pub product: Product,
    pub items: Vec<Item>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_entities_have_no_id() {
        let category = Category::new("Beverages", None);
        assert!(category.is_new());

        let product = Product::new("Coffee", None, Some(category));
        assert!(product.is_new());
        assert_eq!(product.category_id(), None);

        let item = Item::new("Coffee 250g", None, Money::from_cents(1099), Some(product));
        assert!(item.is_new());
        assert_eq!(item.product_id(), None);
    }

    #[test]
    fn test_item_unit_cost() {
        let item = Item::new("Coffee 250g", None, Money::from_cents(1099), None);
        assert_eq!(item.unit_cost(), Money::from_cents(1099));
        assert_eq!(item.unit_cost_cents, 1099);
    }

    #[test]
    fn test_category_id_resolution() {
        let mut category = Category::new("Beverages", None);
        category.id = Some(7);

        let product = Product::new("Coffee", None, Some(category));
        assert_eq!(product.category_id(), Some(7));
    }
}
