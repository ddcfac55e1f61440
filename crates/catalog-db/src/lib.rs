//! # catalog-db: Database Layer for the Catalog
//!
//! This crate provides database access for the catalog service.
//! It uses SQLite for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                        Catalog Data Flow                            │
//! │                                                                     │
//! │  Caller (service layer, out of scope)                               │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  ┌───────────────────────────────────────────────────────────────┐ │
//! │  │                   catalog-db (THIS CRATE)                     │ │
//! │  │                                                               │ │
//! │  │   ┌───────────────┐   ┌────────────────┐   ┌──────────────┐  │ │
//! │  │   │   Database    │   │  Repositories  │   │  Migrations  │  │ │
//! │  │   │   (pool.rs)   │   │ (category.rs)  │   │  (embedded)  │  │ │
//! │  │   │               │   │ (product.rs)   │   │              │  │ │
//! │  │   │ SqlitePool    │◄──│ (item.rs)      │   │ 001_init.sql │  │ │
//! │  │   │ Connection    │   │                │   │              │  │ │
//! │  │   │ Management    │   │                │   │              │  │ │
//! │  │   └───────────────┘   └────────────────┘   └──────────────┘  │ │
//! │  │                                                               │ │
//! │  └───────────────────────────────────────────────────────────────┘ │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  ┌───────────────────────────────────────────────────────────────┐ │
//! │  │                     SQLite Database                           │ │
//! │  └───────────────────────────────────────────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (category, product, item)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use catalog_db::{Database, DbConfig};
//!
//! // Create database with default config
//! let config = DbConfig::new("path/to/catalog.db");
//! let db = Database::new(config).await?;
//!
//! // Use repositories
//! let items = db.items().search("coffee").await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::DbError;
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::category::CategoryRepository;
pub use repository::item::ItemRepository;
pub use repository::product::ProductRepository;
