//! # Item Repository
//!
//! Database operations for items.
//!
//! ## Key Operations
//! - CRUD operations with merge-style update
//! - Product-scoped listing
//! - Case-insensitive keyword search over item text
//!
//! ## Keyword Search
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    How Keyword Search Works                         │
//! │                                                                     │
//! │  Caller passes: "DOG"                                               │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  Keyword is trimmed; empty matches every item                       │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  UPPER(name)        LIKE '%' || UPPER('DOG') || '%'                 │
//! │  UPPER(description) LIKE '%' || UPPER('DOG') || '%'                 │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  ┌─────────────────────────────────────────┐                        │
//! │  │ items                                   │                        │
//! │  │                                         │                        │
//! │  │ Dog Collar   | Adjustable nylon collar  │ ← MATCH!               │
//! │  │ dog bed      | Washable cushion         │ ← MATCH!               │
//! │  │ Cat Tree     | Three-level scratcher    │                        │
//! │  └─────────────────────────────────────────┘                        │
//! │                                                                     │
//! │  "DOG" and "dog" yield identical result sets.                       │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::product::{insert_product, joined_product_from_row};
use catalog_core::validation::{
    require_id, validate_description, validate_item_name, validate_search_keyword,
    validate_unit_cost_cents,
};
use catalog_core::{Item, Product};

/// Columns selected for every item query, with the owning product (and its
/// category) resolved through joins.
const ITEM_SELECT: &str = r"
    SELECT
        i.id, i.name, i.description, i.image_path, i.unit_cost_cents,
        i.created_at, i.updated_at,
        p.id AS product_id,
        p.name AS product_name,
        p.description AS product_description,
        p.created_at AS product_created_at,
        p.updated_at AS product_updated_at,
        c.id AS category_id,
        c.name AS category_name,
        c.description AS category_description,
        c.created_at AS category_created_at,
        c.updated_at AS category_updated_at
    FROM items i
    LEFT JOIN products p ON p.id = i.product_id
    LEFT JOIN categories c ON c.id = p.category_id
";

/// Repository for item database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ItemRepository::new(pool);
///
/// // Case-insensitive substring search
/// let hits = repo.search("coffee").await?;
///
/// // Items of one product
/// let items = repo.list_by_product(1).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ItemRepository {
    pool: SqlitePool,
}

impl ItemRepository {
    /// Creates a new ItemRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ItemRepository { pool }
    }

    /// Gets an item by its id, with its product reference resolved.
    ///
    /// ## Returns
    /// * `Ok(Some(Item))` - Item found
    /// * `Ok(None)` - Item not found
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Item>> {
        let query = format!("{ITEM_SELECT} WHERE i.id = ?1");

        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|row| item_from_row(&row)))
    }

    /// Lists items belonging to a product.
    pub async fn list_by_product(&self, product_id: i64) -> DbResult<Vec<Item>> {
        let query = format!("{ITEM_SELECT} WHERE i.product_id = ?1 ORDER BY i.name");

        let rows = sqlx::query(&query)
            .bind(product_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(item_from_row).collect())
    }

    /// Searches items by case-insensitive substring match over name and
    /// description.
    ///
    /// ## Arguments
    /// * `keyword` - Search term; trimmed, and an empty keyword matches all
    ///   items (same result set as [`ItemRepository::list_all`])
    pub async fn search(&self, keyword: &str) -> DbResult<Vec<Item>> {
        let keyword = validate_search_keyword(keyword)?;

        debug!(keyword = %keyword, "Searching items");

        // An empty keyword matches every item.
        if keyword.is_empty() {
            return self.list_all().await;
        }

        let query = format!(
            r"{ITEM_SELECT}
            WHERE UPPER(i.name) LIKE '%' || UPPER(?1) || '%'
               OR UPPER(i.description) LIKE '%' || UPPER(?1) || '%'
            ORDER BY i.name
            "
        );

        let rows = sqlx::query(&query)
            .bind(&keyword)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = rows.len(), "Search returned items");
        Ok(rows.iter().map(item_from_row).collect())
    }

    /// Lists all items, sorted by name.
    pub async fn list_all(&self) -> DbResult<Vec<Item>> {
        let query = format!("{ITEM_SELECT} ORDER BY i.name");

        let rows = sqlx::query(&query).fetch_all(&self.pool).await?;

        Ok(rows.iter().map(item_from_row).collect())
    }

    /// Inserts a new item.
    ///
    /// If the item embeds a product that has not been persisted yet, the
    /// product is inserted first in the same transaction - cascading in turn
    /// to the product's unpersisted category. The whole chain commits or
    /// rolls back as one unit.
    ///
    /// ## Returns
    /// * `Ok(Item)` - Inserted item with assigned ids along the chain
    /// * `Err(DbError::ForeignKeyViolation)` - Attached product id doesn't exist
    pub async fn insert(&self, item: &Item) -> DbResult<Item> {
        validate_item_name(&item.name)?;
        validate_description(item.description.as_deref())?;
        validate_unit_cost_cents(item.unit_cost_cents)?;
        if item.id.is_some() {
            return Err(DbError::InvalidArgument(
                catalog_core::ValidationError::InvalidFormat {
                    field: "item id".to_string(),
                    reason: "entity is already persisted".to_string(),
                },
            ));
        }

        let mut tx = self.pool.begin().await?;

        // Explicit pre-insert existence check on the ancestor entity.
        let product = match &item.product {
            Some(product) if product.is_new() => Some(insert_product(&mut tx, product).await?),
            other => other.clone(),
        };
        let product_id = product.as_ref().and_then(|p| p.id);

        debug!(name = %item.name, "Inserting item");

        let result = sqlx::query(
            r"
            INSERT INTO items (name, description, image_path, unit_cost_cents,
                               product_id, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ",
        )
        .bind(item.name.trim())
        .bind(&item.description)
        .bind(&item.image_path)
        .bind(item.unit_cost_cents)
        .bind(product_id)
        .bind(item.created_at)
        .bind(item.updated_at)
        .execute(&mut *tx)
        .await?;

        let id = result.last_insert_rowid();
        tx.commit().await?;

        Ok(Item {
            id: Some(id),
            name: item.name.trim().to_string(),
            description: item.description.clone(),
            image_path: item.image_path.clone(),
            unit_cost_cents: item.unit_cost_cents,
            product,
            created_at: item.created_at,
            updated_at: item.updated_at,
        })
    }

    /// Updates an existing item.
    ///
    /// ## Merge Semantics
    /// Writes the caller's copy and returns the stored row re-read after the
    /// update. The attached product (if any) must already be persisted;
    /// update never cascades.
    ///
    /// ## Returns
    /// * `Ok(Item)` - The stored copy after the update
    /// * `Err(DbError::NotFound)` - No row with this id exists
    pub async fn update(&self, item: &Item) -> DbResult<Item> {
        let id = require_id("item", item.id)?;
        validate_item_name(&item.name)?;
        validate_description(item.description.as_deref())?;
        validate_unit_cost_cents(item.unit_cost_cents)?;

        let product_id = match &item.product {
            Some(product) => Some(require_id("product", product.id)?),
            None => None,
        };

        debug!(id = %id, "Updating item");

        let now = Utc::now();

        let result = sqlx::query(
            r"
            UPDATE items SET
                name = ?2,
                description = ?3,
                image_path = ?4,
                unit_cost_cents = ?5,
                product_id = ?6,
                updated_at = ?7
            WHERE id = ?1
            ",
        )
        .bind(id)
        .bind(item.name.trim())
        .bind(&item.description)
        .bind(&item.image_path)
        .bind(item.unit_cost_cents)
        .bind(product_id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Item", id));
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Item", id))
    }

    /// Deletes an item by id.
    ///
    /// ## Returns
    /// * `Ok(())` - Item deleted
    /// * `Err(DbError::NotFound)` - No row with this id exists
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id = %id, "Deleting item");

        let result = sqlx::query("DELETE FROM items WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Item", id));
        }

        Ok(())
    }

    /// Deletes a (possibly detached) item instance by its assigned id.
    pub async fn remove(&self, item: &Item) -> DbResult<()> {
        let id = require_id("item", item.id)?;
        self.delete(id).await
    }

    /// Counts total items (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM items")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Row Mapping
// =============================================================================

/// Maps an item row (with `product_*`/`category_*`-aliased join columns) to
/// an Item.
fn item_from_row(row: &SqliteRow) -> Item {
    item_from_flat_row(row, joined_product_from_row(row))
}

/// Maps unaliased `items` columns to an Item with the given product
/// reference.
///
/// Also used by the product repository's eager item fetch, where the owning
/// product is the enclosing detail and the back-reference stays unset.
pub(crate) fn item_from_flat_row(row: &SqliteRow, product: Option<Product>) -> Item {
    Item {
        id: Some(row.get("id")),
        name: row.get("name"),
        description: row.get("description"),
        image_path: row.get("image_path"),
        unit_cost_cents: row.get("unit_cost_cents"),
        product,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::error::DbError;
    use crate::pool::{Database, DbConfig};
    use catalog_core::{Category, Item, Money, Product};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn seed_pet_supplies(db: &Database) {
        let product = db
            .products()
            .insert(&Product::new(
                "Pet Supplies",
                None,
                Some(Category::new("Home", None)),
            ))
            .await
            .unwrap();

        for (name, description, cents) in [
            ("Dog Collar", Some("Adjustable nylon collar"), 1299),
            ("dog bed", Some("Washable cushion"), 3999),
            ("Cat Tree", Some("Three-level scratcher"), 8999),
            ("Food Bowl", Some("Stainless steel, dog and cat"), 899),
        ] {
            db.items()
                .insert(&Item::new(
                    name,
                    description.map(String::from),
                    Money::from_cents(cents),
                    Some(product.clone()),
                ))
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn test_insert_and_get_by_id_resolves_chain() {
        let db = test_db().await;

        let item = Item::new(
            "Coffee 250g",
            Some("Single-origin beans".to_string()),
            Money::from_cents(1099),
            Some(Product::new(
                "Coffee",
                None,
                Some(Category::new("Beverages", None)),
            )),
        );

        let created = db.items().insert(&item).await.unwrap();
        let found = db
            .items()
            .get_by_id(created.id.unwrap())
            .await
            .unwrap()
            .expect("item should exist");

        assert_eq!(found.name, "Coffee 250g");
        assert_eq!(found.unit_cost(), Money::from_cents(1099));

        let product = found.product.expect("product should be resolved");
        assert_eq!(product.name, "Coffee");
        assert_eq!(product.category.unwrap().name, "Beverages");
    }

    #[tokio::test]
    async fn test_insert_cascades_product_and_category() {
        let db = test_db().await;

        let item = Item::new(
            "Coffee 250g",
            None,
            Money::from_cents(1099),
            Some(Product::new(
                "Coffee",
                None,
                Some(Category::new("Beverages", None)),
            )),
        );

        db.items().insert(&item).await.unwrap();

        assert_eq!(db.categories().count().await.unwrap(), 1);
        assert_eq!(db.products().count().await.unwrap(), 1);
        assert_eq!(db.items().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_insert_without_product() {
        let db = test_db().await;

        let created = db
            .items()
            .insert(&Item::new("Loose Item", None, Money::zero(), None))
            .await
            .unwrap();

        let found = db
            .items()
            .get_by_id(created.id.unwrap())
            .await
            .unwrap()
            .unwrap();
        assert!(found.product.is_none());
    }

    #[tokio::test]
    async fn test_insert_rejects_negative_unit_cost() {
        let db = test_db().await;

        let err = db
            .items()
            .insert(&Item::new("Bad", None, Money::from_cents(-1), None))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_list_by_product() {
        let db = test_db().await;
        seed_pet_supplies(&db).await;

        let product = db.products().list_all().await.unwrap().remove(0);
        let items = db
            .items()
            .list_by_product(product.id.unwrap())
            .await
            .unwrap();
        assert_eq!(items.len(), 4);

        let none = db.items().list_by_product(9999).await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive() {
        let db = test_db().await;
        seed_pet_supplies(&db).await;

        let upper = db.items().search("DOG").await.unwrap();
        let lower = db.items().search("dog").await.unwrap();

        let upper_names: Vec<&str> = upper.iter().map(|i| i.name.as_str()).collect();
        let lower_names: Vec<&str> = lower.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(upper_names, lower_names);

        // "Dog Collar" and "dog bed" by name, "Food Bowl" by description.
        assert_eq!(upper_names, vec!["Dog Collar", "Food Bowl", "dog bed"]);
    }

    #[tokio::test]
    async fn test_search_empty_keyword_matches_all() {
        let db = test_db().await;
        seed_pet_supplies(&db).await;

        let all = db.items().list_all().await.unwrap();
        let searched = db.items().search("").await.unwrap();
        let padded = db.items().search("   ").await.unwrap();

        assert_eq!(searched, all);
        assert_eq!(padded, all);
        assert_eq!(all.len(), 4);
    }

    #[tokio::test]
    async fn test_search_no_match() {
        let db = test_db().await;
        seed_pet_supplies(&db).await;

        let hits = db.items().search("aquarium").await.unwrap();
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn test_update_returns_stored_copy() {
        let db = test_db().await;

        let mut item = db
            .items()
            .insert(&Item::new("Coffee 250g", None, Money::from_cents(1099), None))
            .await
            .unwrap();

        item.unit_cost_cents = 1299;
        item.image_path = Some("items/coffee-250.jpg".to_string());

        let updated = db.items().update(&item).await.unwrap();
        assert_eq!(updated.unit_cost(), Money::from_cents(1299));
        assert_eq!(updated.image_path.as_deref(), Some("items/coffee-250.jpg"));
    }

    #[tokio::test]
    async fn test_update_nonexistent_id_is_not_found() {
        let db = test_db().await;

        let mut item = Item::new("Ghost", None, Money::zero(), None);
        item.id = Some(9999);

        let err = db.items().update(&item).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_remove_then_get_returns_none() {
        let db = test_db().await;

        let created = db
            .items()
            .insert(&Item::new("Coffee 250g", None, Money::from_cents(1099), None))
            .await
            .unwrap();

        db.items().remove(&created).await.unwrap();
        assert!(db
            .items()
            .get_by_id(created.id.unwrap())
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_remove_without_id_is_invalid_argument() {
        let db = test_db().await;

        let item = Item::new("Unsaved", None, Money::zero(), None);
        let err = db.items().remove(&item).await.unwrap_err();
        assert!(matches!(err, DbError::InvalidArgument(_)));
    }
}
