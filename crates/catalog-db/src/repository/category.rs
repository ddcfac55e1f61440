//! # Category Repository
//!
//! Database operations for categories.
//!
//! ## Key Operations
//! - Lookup by id and by unique name
//! - CRUD operations with merge-style update (returns the stored copy)
//!
//! Categories sit at the root of the ownership chain: products reference them
//! by foreign key, so deleting a category that still owns products fails with
//! a foreign key violation that is surfaced to the caller unchanged.

use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use catalog_core::validation::{require_id, validate_category_name, validate_description};
use catalog_core::Category;

/// Repository for category database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = CategoryRepository::new(pool);
///
/// // Lookup by unique name
/// let category = repo.get_by_name("Beverages").await?;
///
/// // Get by id
/// let category = repo.get_by_id(1).await?;
/// ```
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    pool: SqlitePool,
}

impl CategoryRepository {
    /// Creates a new CategoryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CategoryRepository { pool }
    }

    /// Gets a category by its id.
    ///
    /// ## Returns
    /// * `Ok(Some(Category))` - Category found
    /// * `Ok(None)` - Category not found
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Category>> {
        let row = sqlx::query(
            r"
            SELECT id, name, description, created_at, updated_at
            FROM categories
            WHERE id = ?1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| category_from_row(&row)))
    }

    /// Gets a category by its unique name.
    ///
    /// ## Arguments
    /// * `name` - Category name (e.g., "Beverages"); must be non-empty
    pub async fn get_by_name(&self, name: &str) -> DbResult<Option<Category>> {
        validate_category_name(name)?;

        let row = sqlx::query(
            r"
            SELECT id, name, description, created_at, updated_at
            FROM categories
            WHERE name = ?1
            ",
        )
        .bind(name.trim())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| category_from_row(&row)))
    }

    /// Lists all categories, sorted by name.
    pub async fn list_all(&self) -> DbResult<Vec<Category>> {
        let rows = sqlx::query(
            r"
            SELECT id, name, description, created_at, updated_at
            FROM categories
            ORDER BY name
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(category_from_row).collect())
    }

    /// Inserts a new category.
    ///
    /// ## Arguments
    /// * `category` - Category to insert; its id must be unassigned
    ///
    /// ## Returns
    /// * `Ok(Category)` - Inserted category with its storage-assigned id
    /// * `Err(DbError::UniqueViolation)` - Name already exists
    pub async fn insert(&self, category: &Category) -> DbResult<Category> {
        let mut conn = self.pool.acquire().await?;
        insert_category(&mut conn, category).await
    }

    /// Updates an existing category.
    ///
    /// ## Merge Semantics
    /// The caller's (possibly detached) copy is written to storage and the
    /// stored row is read back, so the returned value always reflects what
    /// the database holds - including the refreshed `updated_at`.
    ///
    /// ## Returns
    /// * `Ok(Category)` - The stored copy after the update
    /// * `Err(DbError::NotFound)` - No row with this id exists
    pub async fn update(&self, category: &Category) -> DbResult<Category> {
        let id = require_id("category", category.id)?;
        validate_category_name(&category.name)?;
        validate_description(category.description.as_deref())?;

        debug!(id = %id, "Updating category");

        let now = Utc::now();

        let result = sqlx::query(
            r"
            UPDATE categories SET
                name = ?2,
                description = ?3,
                updated_at = ?4
            WHERE id = ?1
            ",
        )
        .bind(id)
        .bind(category.name.trim())
        .bind(&category.description)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Category", id));
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Category", id))
    }

    /// Deletes a category by id.
    ///
    /// ## Returns
    /// * `Ok(())` - Category deleted
    /// * `Err(DbError::NotFound)` - No row with this id exists
    /// * `Err(DbError::ForeignKeyViolation)` - Category still owns products
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id = %id, "Deleting category");

        let result = sqlx::query("DELETE FROM categories WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Category", id));
        }

        Ok(())
    }

    /// Deletes a (possibly detached) category instance.
    ///
    /// The instance must carry an assigned id; the row with that id is
    /// removed regardless of any other local modifications.
    pub async fn remove(&self, category: &Category) -> DbResult<()> {
        let id = require_id("category", category.id)?;
        self.delete(id).await
    }

    /// Counts total categories (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Connection-Level Helpers
// =============================================================================

/// Inserts a category on an explicit connection.
///
/// Used by [`CategoryRepository::insert`] and by the product/item create
/// cascades, which persist an unpersisted ancestor category inside the same
/// transaction as the child row.
pub(crate) async fn insert_category(
    conn: &mut SqliteConnection,
    category: &Category,
) -> DbResult<Category> {
    validate_category_name(&category.name)?;
    validate_description(category.description.as_deref())?;
    if category.id.is_some() {
        return Err(DbError::InvalidArgument(
            catalog_core::ValidationError::InvalidFormat {
                field: "category id".to_string(),
                reason: "entity is already persisted".to_string(),
            },
        ));
    }

    debug!(name = %category.name, "Inserting category");

    let result = sqlx::query(
        r"
        INSERT INTO categories (name, description, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4)
        ",
    )
    .bind(category.name.trim())
    .bind(&category.description)
    .bind(category.created_at)
    .bind(category.updated_at)
    .execute(conn)
    .await?;

    Ok(Category {
        id: Some(result.last_insert_rowid()),
        name: category.name.trim().to_string(),
        description: category.description.clone(),
        created_at: category.created_at,
        updated_at: category.updated_at,
    })
}

// =============================================================================
// Row Mapping
// =============================================================================

/// Maps an unaliased `categories` row to a Category.
fn category_from_row(row: &SqliteRow) -> Category {
    Category {
        id: Some(row.get("id")),
        name: row.get("name"),
        description: row.get("description"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

/// Maps `category_*`-aliased columns of a joined row to an optional Category.
///
/// Returns `None` when the joined `category_id` is NULL (the owning side has
/// no category attached).
pub(crate) fn joined_category_from_row(row: &SqliteRow) -> Option<Category> {
    let id: Option<i64> = row.get("category_id");
    id.map(|id| Category {
        id: Some(id),
        name: row.get("category_name"),
        description: row.get("category_description"),
        created_at: row.get("category_created_at"),
        updated_at: row.get("category_updated_at"),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::pool::{Database, DbConfig};
    use catalog_core::{Category, ValidationError};

    use crate::error::DbError;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_insert_then_get_by_id_returns_equal_entity() {
        let db = test_db().await;

        let category = Category::new("Beverages", Some("Drinks and juices".to_string()));
        let created = db.categories().insert(&category).await.unwrap();
        assert!(created.id.is_some());

        let found = db
            .categories()
            .get_by_id(created.id.unwrap())
            .await
            .unwrap()
            .expect("category should exist");

        assert_eq!(found.id, created.id);
        assert_eq!(found.name, "Beverages");
        assert_eq!(found.description.as_deref(), Some("Drinks and juices"));
    }

    #[tokio::test]
    async fn test_get_by_name() {
        let db = test_db().await;

        db.categories()
            .insert(&Category::new("Snacks", None))
            .await
            .unwrap();

        let found = db.categories().get_by_name("Snacks").await.unwrap();
        assert!(found.is_some());

        let missing = db.categories().get_by_name("Bakery").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_get_by_name_requires_nonempty_name() {
        let db = test_db().await;

        let err = db.categories().get_by_name("   ").await.unwrap_err();
        assert!(matches!(err, DbError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_list_all() {
        let db = test_db().await;

        db.categories()
            .insert(&Category::new("Snacks", None))
            .await
            .unwrap();
        db.categories()
            .insert(&Category::new("Beverages", None))
            .await
            .unwrap();

        let all = db.categories().list_all().await.unwrap();
        let names: Vec<&str> = all.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Beverages", "Snacks"]);
    }

    #[tokio::test]
    async fn test_duplicate_name_is_unique_violation() {
        let db = test_db().await;

        db.categories()
            .insert(&Category::new("Beverages", None))
            .await
            .unwrap();

        let err = db
            .categories()
            .insert(&Category::new("Beverages", None))
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_update_returns_stored_copy() {
        let db = test_db().await;

        let mut category = db
            .categories()
            .insert(&Category::new("Beverages", None))
            .await
            .unwrap();

        category.name = "Drinks".to_string();
        category.description = Some("Renamed".to_string());

        let updated = db.categories().update(&category).await.unwrap();
        assert_eq!(updated.name, "Drinks");
        assert_eq!(updated.description.as_deref(), Some("Renamed"));
        assert!(updated.updated_at >= category.created_at);

        let found = db
            .categories()
            .get_by_id(category.id.unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.name, "Drinks");
    }

    #[tokio::test]
    async fn test_update_nonexistent_id_is_not_found() {
        let db = test_db().await;

        let mut category = Category::new("Ghost", None);
        category.id = Some(9999);

        let err = db.categories().update(&category).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_update_without_id_is_invalid_argument() {
        let db = test_db().await;

        let category = Category::new("Unsaved", None);
        let err = db.categories().update(&category).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::InvalidArgument(ValidationError::InvalidFormat { .. })
        ));
    }

    #[tokio::test]
    async fn test_delete_then_get_returns_none() {
        let db = test_db().await;

        let created = db
            .categories()
            .insert(&Category::new("Beverages", None))
            .await
            .unwrap();
        let id = created.id.unwrap();

        db.categories().delete(id).await.unwrap();
        assert!(db.categories().get_by_id(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_remove_detached_instance() {
        let db = test_db().await;

        let created = db
            .categories()
            .insert(&Category::new("Beverages", None))
            .await
            .unwrap();

        // Detached copy with local modifications; only the id matters.
        let mut detached = created.clone();
        detached.name = "Locally renamed".to_string();

        db.categories().remove(&detached).await.unwrap();
        assert!(db
            .categories()
            .get_by_id(created.id.unwrap())
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_count() {
        let db = test_db().await;
        assert_eq!(db.categories().count().await.unwrap(), 0);

        db.categories()
            .insert(&Category::new("Beverages", None))
            .await
            .unwrap();
        assert_eq!(db.categories().count().await.unwrap(), 1);
    }
}
