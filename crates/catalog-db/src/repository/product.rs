//! # Product Repository
//!
//! Database operations for products.
//!
//! ## Key Operations
//! - CRUD operations with merge-style update
//! - Single-product lookup with its item collection eagerly fetched
//! - Category-scoped listing by category name
//!
//! ## Create Cascade
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                  Persist-If-Unpersisted Cascade                     │
//! │                                                                     │
//! │  insert(product)                                                    │
//! │       │                                                             │
//! │       ├── product.category is Some and has no id?                   │
//! │       │        │                                                    │
//! │       │        ▼                                                    │
//! │       │   INSERT INTO categories ...   ← same transaction           │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  INSERT INTO products (category_id = assigned id)                   │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  COMMIT → exactly one new category and one new product              │
//! │                                                                     │
//! │  The check is an explicit pre-insert existence check on the         │
//! │  ancestor entity - there is no hidden cascade machinery.            │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::category::{insert_category, joined_category_from_row};
use crate::repository::item;
use catalog_core::validation::{require_id, validate_description, validate_product_name};
use catalog_core::{Product, ProductDetail};

/// Columns selected for every product query, with the owning category
/// resolved through a join.
const PRODUCT_SELECT: &str = r"
    SELECT
        p.id, p.name, p.description, p.created_at, p.updated_at,
        c.id AS category_id,
        c.name AS category_name,
        c.description AS category_description,
        c.created_at AS category_created_at,
        c.updated_at AS category_updated_at
    FROM products p
    LEFT JOIN categories c ON c.id = p.category_id
";

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
///
/// // Single product with its items fetched eagerly
/// let detail = repo.get_with_items(1).await?;
///
/// // Products of a named category
/// let products = repo.list_by_category_name("Beverages").await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Gets a product by its id, with its category reference resolved.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Product>> {
        let query = format!("{PRODUCT_SELECT} WHERE p.id = ?1");

        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|row| product_from_row(&row)))
    }

    /// Gets a product by its id together with its item collection.
    ///
    /// The item collection is resolved by an explicit, always-executed
    /// second query - never by a deferred load.
    ///
    /// ## Returns
    /// * `Ok(Some(ProductDetail))` - Product found, items attached
    /// * `Ok(None)` - Product not found
    pub async fn get_with_items(&self, id: i64) -> DbResult<Option<ProductDetail>> {
        let product = match self.get_by_id(id).await? {
            Some(product) => product,
            None => return Ok(None),
        };

        debug!(id = %id, "Fetching item collection for product");

        let rows = sqlx::query(
            r"
            SELECT id, name, description, image_path, unit_cost_cents,
                   created_at, updated_at
            FROM items
            WHERE product_id = ?1
            ORDER BY name
            ",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        // The owning product is the detail itself; the items' back-reference
        // is left unset rather than duplicating the entity per row.
        let items = rows
            .iter()
            .map(|row| item::item_from_flat_row(row, None))
            .collect();

        Ok(Some(ProductDetail { product, items }))
    }

    /// Lists products belonging to the named category.
    ///
    /// ## Arguments
    /// * `category_name` - Unique category name; must be non-empty
    pub async fn list_by_category_name(&self, category_name: &str) -> DbResult<Vec<Product>> {
        // Reuses the category-name rule: non-empty, bounded length.
        catalog_core::validation::validate_category_name(category_name)?;

        let rows = sqlx::query(
            r"
            SELECT
                p.id, p.name, p.description, p.created_at, p.updated_at,
                c.id AS category_id,
                c.name AS category_name,
                c.description AS category_description,
                c.created_at AS category_created_at,
                c.updated_at AS category_updated_at
            FROM products p
            INNER JOIN categories c ON c.id = p.category_id
            WHERE c.name = ?1
            ORDER BY p.name
            ",
        )
        .bind(category_name.trim())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(product_from_row).collect())
    }

    /// Lists all products, sorted by name.
    pub async fn list_all(&self) -> DbResult<Vec<Product>> {
        let query = format!("{PRODUCT_SELECT} ORDER BY p.name");

        let rows = sqlx::query(&query).fetch_all(&self.pool).await?;

        Ok(rows.iter().map(product_from_row).collect())
    }

    /// Inserts a new product.
    ///
    /// If the product embeds a category that has not been persisted yet, the
    /// category is inserted first in the same transaction, so the operation
    /// creates exactly one new category and one new product or nothing.
    ///
    /// ## Returns
    /// * `Ok(Product)` - Inserted product with assigned ids (category included)
    /// * `Err(DbError::ForeignKeyViolation)` - Attached category id doesn't exist
    pub async fn insert(&self, product: &Product) -> DbResult<Product> {
        let mut tx = self.pool.begin().await?;
        let created = insert_product(&mut tx, product).await?;
        tx.commit().await?;
        Ok(created)
    }

    /// Updates an existing product.
    ///
    /// ## Merge Semantics
    /// Writes the caller's copy and returns the stored row re-read after the
    /// update. The attached category (if any) must already be persisted;
    /// update never cascades.
    ///
    /// ## Returns
    /// * `Ok(Product)` - The stored copy after the update
    /// * `Err(DbError::NotFound)` - No row with this id exists
    pub async fn update(&self, product: &Product) -> DbResult<Product> {
        let id = require_id("product", product.id)?;
        validate_product_name(&product.name)?;
        validate_description(product.description.as_deref())?;

        let category_id = match &product.category {
            Some(category) => Some(require_id("category", category.id)?),
            None => None,
        };

        debug!(id = %id, "Updating product");

        let now = Utc::now();

        let result = sqlx::query(
            r"
            UPDATE products SET
                name = ?2,
                description = ?3,
                category_id = ?4,
                updated_at = ?5
            WHERE id = ?1
            ",
        )
        .bind(id)
        .bind(product.name.trim())
        .bind(&product.description)
        .bind(category_id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))
    }

    /// Deletes a product by id.
    ///
    /// ## Returns
    /// * `Ok(())` - Product deleted
    /// * `Err(DbError::NotFound)` - No row with this id exists
    /// * `Err(DbError::ForeignKeyViolation)` - Product still owns items
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id = %id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Deletes a (possibly detached) product instance by its assigned id.
    pub async fn remove(&self, product: &Product) -> DbResult<()> {
        let id = require_id("product", product.id)?;
        self.delete(id).await
    }

    /// Counts total products (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Connection-Level Helpers
// =============================================================================

/// Inserts a product on an explicit connection, cascading to its category
/// when that category has not been persisted yet.
///
/// Used by [`ProductRepository::insert`] and by the item create cascade.
pub(crate) async fn insert_product(
    conn: &mut SqliteConnection,
    product: &Product,
) -> DbResult<Product> {
    validate_product_name(&product.name)?;
    validate_description(product.description.as_deref())?;
    if product.id.is_some() {
        return Err(DbError::InvalidArgument(
            catalog_core::ValidationError::InvalidFormat {
                field: "product id".to_string(),
                reason: "entity is already persisted".to_string(),
            },
        ));
    }

    // Explicit pre-insert existence check on the ancestor entity.
    let category = match &product.category {
        Some(category) if category.is_new() => Some(insert_category(&mut *conn, category).await?),
        other => other.clone(),
    };
    let category_id = category.as_ref().and_then(|c| c.id);

    debug!(name = %product.name, "Inserting product");

    let result = sqlx::query(
        r"
        INSERT INTO products (name, description, category_id, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5)
        ",
    )
    .bind(product.name.trim())
    .bind(&product.description)
    .bind(category_id)
    .bind(product.created_at)
    .bind(product.updated_at)
    .execute(conn)
    .await?;

    Ok(Product {
        id: Some(result.last_insert_rowid()),
        name: product.name.trim().to_string(),
        description: product.description.clone(),
        category,
        created_at: product.created_at,
        updated_at: product.updated_at,
    })
}

// =============================================================================
// Row Mapping
// =============================================================================

/// Maps a product row (with `category_*`-aliased join columns) to a Product.
fn product_from_row(row: &SqliteRow) -> Product {
    Product {
        id: Some(row.get("id")),
        name: row.get("name"),
        description: row.get("description"),
        category: joined_category_from_row(row),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

/// Maps `product_*`-aliased columns of a joined row to an optional Product.
///
/// Returns `None` when the joined `product_id` is NULL. The product's own
/// category is read from the same row's `category_*` aliases.
pub(crate) fn joined_product_from_row(row: &SqliteRow) -> Option<Product> {
    let id: Option<i64> = row.get("product_id");
    id.map(|id| Product {
        id: Some(id),
        name: row.get("product_name"),
        description: row.get("product_description"),
        category: joined_category_from_row(row),
        created_at: row.get("product_created_at"),
        updated_at: row.get("product_updated_at"),
    })
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

    #[tokio::test]
    async fn test_insert_and_get_by_id() {
        let db = test_db().await;

        let created = db
            .products()
            .insert(&Product::new("Coffee", Some("Whole bean".to_string()), None))
            .await
            .unwrap();

        let found = db
            .products()
            .get_by_id(created.id.unwrap())
            .await
            .unwrap()
            .expect("product should exist");

        assert_eq!(found.name, "Coffee");
        assert_eq!(found.description.as_deref(), Some("Whole bean"));
        assert!(found.category.is_none());
    }

    #[tokio::test]
    async fn test_insert_cascades_unpersisted_category() {
        let db = test_db().await;

        let product = Product::new("Coffee", None, Some(Category::new("Beverages", None)));
        let created = db.products().insert(&product).await.unwrap();

        // Exactly one new category and one new product.
        assert_eq!(db.categories().count().await.unwrap(), 1);
        assert_eq!(db.products().count().await.unwrap(), 1);

        let category = created.category.expect("category should be attached");
        assert!(category.id.is_some());

        let found = db
            .products()
            .get_by_id(created.id.unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.category.unwrap().name, "Beverages");
    }

    #[tokio::test]
    async fn test_insert_reuses_persisted_category() {
        let db = test_db().await;

        let category = db
            .categories()
            .insert(&Category::new("Beverages", None))
            .await
            .unwrap();

        db.products()
            .insert(&Product::new("Coffee", None, Some(category.clone())))
            .await
            .unwrap();
        db.products()
            .insert(&Product::new("Tea", None, Some(category)))
            .await
            .unwrap();

        assert_eq!(db.categories().count().await.unwrap(), 1);
        assert_eq!(db.products().count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_insert_with_unknown_category_id_is_fk_violation() {
        let db = test_db().await;

        let mut category = Category::new("Ghost", None);
        category.id = Some(404);

        let err = db
            .products()
            .insert(&Product::new("Coffee", None, Some(category)))
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }

    #[tokio::test]
    async fn test_list_by_category_name() {
        let db = test_db().await;

        let beverages = db
            .categories()
            .insert(&Category::new("Beverages", None))
            .await
            .unwrap();
        let snacks = db
            .categories()
            .insert(&Category::new("Snacks", None))
            .await
            .unwrap();

        db.products()
            .insert(&Product::new("Coffee", None, Some(beverages.clone())))
            .await
            .unwrap();
        db.products()
            .insert(&Product::new("Tea", None, Some(beverages)))
            .await
            .unwrap();
        db.products()
            .insert(&Product::new("Crisps", None, Some(snacks)))
            .await
            .unwrap();

        let products = db
            .products()
            .list_by_category_name("Beverages")
            .await
            .unwrap();
        let names: Vec<&str> = products.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Coffee", "Tea"]);

        let none = db.products().list_by_category_name("Bakery").await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_get_with_items_fetches_collection() {
        let db = test_db().await;

        let product = db
            .products()
            .insert(&Product::new("Coffee", None, None))
            .await
            .unwrap();

        db.items()
            .insert(&Item::new(
                "Coffee 250g",
                None,
                Money::from_cents(1099),
                Some(product.clone()),
            ))
            .await
            .unwrap();
        db.items()
            .insert(&Item::new(
                "Coffee 1kg",
                None,
                Money::from_cents(3499),
                Some(product.clone()),
            ))
            .await
            .unwrap();

        let detail = db
            .products()
            .get_with_items(product.id.unwrap())
            .await
            .unwrap()
            .expect("product should exist");

        assert_eq!(detail.product.name, "Coffee");
        assert_eq!(detail.items.len(), 2);
        let names: Vec<&str> = detail.items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Coffee 1kg", "Coffee 250g"]);
    }

    #[tokio::test]
    async fn test_get_with_items_missing_product_is_none() {
        let db = test_db().await;
        assert!(db.products().get_with_items(404).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_returns_stored_copy() {
        let db = test_db().await;

        let mut product = db
            .products()
            .insert(&Product::new("Coffee", None, None))
            .await
            .unwrap();

        product.name = "Espresso Blend".to_string();
        let updated = db.products().update(&product).await.unwrap();
        assert_eq!(updated.name, "Espresso Blend");
    }

    #[tokio::test]
    async fn test_update_nonexistent_id_is_not_found() {
        let db = test_db().await;

        let mut product = Product::new("Ghost", None, None);
        product.id = Some(9999);

        let err = db.products().update(&product).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_update_rejects_unpersisted_category() {
        let db = test_db().await;

        let mut product = db
            .products()
            .insert(&Product::new("Coffee", None, None))
            .await
            .unwrap();
        product.category = Some(Category::new("Unsaved", None));

        let err = db.products().update(&product).await.unwrap_err();
        assert!(matches!(err, DbError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_delete_then_get_returns_none() {
        let db = test_db().await;

        let created = db
            .products()
            .insert(&Product::new("Coffee", None, None))
            .await
            .unwrap();
        let id = created.id.unwrap();

        db.products().delete(id).await.unwrap();
        assert!(db.products().get_by_id(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_category_with_products_is_fk_violation() {
        let db = test_db().await;

        let created = db
            .products()
            .insert(&Product::new(
                "Coffee",
                None,
                Some(Category::new("Beverages", None)),
            ))
            .await
            .unwrap();

        let category_id = created.category.unwrap().id.unwrap();
        let err = db.categories().delete(category_id).await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }
}
